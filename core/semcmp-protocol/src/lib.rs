pub mod ids;
pub mod tags;

// Re-export core types for convenience
pub use ids::TokenId;
pub use tags::*;

pub mod model;
pub use model::*;
