use std::collections::BTreeSet;

use petgraph::graph::{Graph, NodeIndex};
use petgraph::visit::Bfs;
use petgraph::Directed;
use semcmp_protocol::{DepLabel, Sentence, TokenId};

/// Dependency tree of one sentence as a head -> dependent graph.
///
/// Node `i` is the token at position `i`.
pub struct TreeNavigator<'s> {
    sentence: &'s Sentence,
    graph: Graph<TokenId, DepLabel, Directed>,
}

impl<'s> TreeNavigator<'s> {
    pub fn new(sentence: &'s Sentence) -> Self {
        let mut graph = Graph::with_capacity(sentence.len(), sentence.len().saturating_sub(1));
        for token in sentence.tokens() {
            graph.add_node(token.id);
        }
        for token in sentence.tokens() {
            if let Some(head) = token.head {
                graph.add_edge(NodeIndex::new(head.index()), NodeIndex::new(token.id.index()), token.dep);
            }
        }
        Self { sentence, graph }
    }

    pub fn sentence(&self) -> &'s Sentence {
        self.sentence
    }

    /// Ancestors of `token`, nearest first.
    ///
    /// The walk ends after the root, or before a verb that governs another noun: such a verb
    /// belongs to a different clause and is not returned.
    pub fn find_heads(&self, token: TokenId) -> Vec<TokenId> {
        let mut heads: Vec<TokenId> = Vec::new();
        let mut current = token;

        while let Some(head) = self.sentence.token(current).head {
            let candidate = self.sentence.token(head);
            if candidate.is_verb() {
                let governs_other_noun = self.sentence.children(head).iter().any(|&child| {
                    child != token && self.sentence.token(child).is_noun() && !heads.contains(&child)
                });
                if governs_other_noun {
                    break;
                }
            }
            heads.push(head);
            current = head;
        }

        heads
    }

    /// Every descendant of `token`, excluding the token itself.
    pub fn find_children(&self, token: TokenId) -> BTreeSet<TokenId> {
        let mut descendants = BTreeSet::new();
        let mut bfs = Bfs::new(&self.graph, NodeIndex::new(token.index()));
        while let Some(node) = bfs.next(&self.graph) {
            descendants.insert(self.graph[node]);
        }
        descendants.remove(&token);
        descendants
    }
}
