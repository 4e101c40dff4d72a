use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use semcmp_parser::{split_sentences, ParsedCorpus};
use semcmp_similarity::{HashedBagOfWords, VectorTable};
use semcmp_simplifier::{CompareConfig, SemanticComparator};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "semcmp", version, about = "Simplify, align and compare phrases of parsed documents")]
struct Cli {
    /// Comparator settings (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the similarity cutoff from the config
    #[arg(long, global = true)]
    cutoff: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the simplified phrases of a document.
    Phrases {
        /// Dependency parses (CoNLL-U, or JSON when the file ends in .json)
        #[arg(long, value_name = "FILE")]
        parses: PathBuf,
        /// Plain-text document
        #[arg(long, value_name = "FILE")]
        doc: PathBuf,
    },

    /// Bucket the phrases of two documents into shared / only A / only B.
    Compare {
        #[arg(long, value_name = "FILE")]
        parses: PathBuf,
        #[arg(long, value_name = "FILE")]
        doc_a: PathBuf,
        #[arg(long, value_name = "FILE")]
        doc_b: PathBuf,
        /// Precomputed phrase vectors (JSON); hashed bag-of-words otherwise
        #[arg(long, value_name = "FILE")]
        vectors: Option<PathBuf>,
    },

    /// Recombine verbs and objects of two phrases.
    Align {
        #[arg(long, value_name = "FILE")]
        parses: PathBuf,
        phrase_a: String,
        phrase_b: String,
    },

    /// Split a plain-text document into sentences.
    Split {
        #[arg(value_name = "FILE")]
        doc: PathBuf,
    },
}

#[derive(Serialize)]
struct SharedPair<'a> {
    a: &'a str,
    b: &'a str,
    score: Option<f32>,
}

#[derive(Serialize)]
struct CompareReport<'a> {
    phrases_a: &'a [String],
    phrases_b: &'a [String],
    similarity: Vec<Vec<f32>>,
    shared: Vec<SharedPair<'a>>,
    only_a: Vec<&'a str>,
    only_b: Vec<&'a str>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.cutoff)?;
    tracing::debug!(?config, "using config");

    match cli.command {
        Commands::Phrases { parses, doc } => cmd_phrases(config, &parses, &doc),
        Commands::Compare { parses, doc_a, doc_b, vectors } => {
            cmd_compare(config, &parses, &doc_a, &doc_b, vectors.as_deref())
        }
        Commands::Align { parses, phrase_a, phrase_b } => cmd_align(config, &parses, &phrase_a, &phrase_b),
        Commands::Split { doc } => cmd_split(&doc),
    }
}

fn load_config(path: Option<&Path>, cutoff: Option<f32>) -> anyhow::Result<CompareConfig> {
    let mut config = match path {
        Some(path) => CompareConfig::load(path).with_context(|| format!("reading config {}", path.display()))?,
        None => CompareConfig::default(),
    };
    if let Some(cutoff) = cutoff {
        config.cutoff = cutoff;
    }
    Ok(config)
}

fn load_corpus(path: &Path) -> anyhow::Result<ParsedCorpus> {
    let data = fs::read_to_string(path).with_context(|| format!("reading parses {}", path.display()))?;
    let corpus = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => ParsedCorpus::from_json(&data)?,
        _ => ParsedCorpus::from_conllu(&data)?,
    };
    tracing::info!(entries = corpus.len(), path = %path.display(), "loaded parses");
    Ok(corpus)
}

fn read_doc(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading document {}", path.display()))
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn cmd_phrases(config: CompareConfig, parses: &Path, doc: &Path) -> anyhow::Result<()> {
    let comparator = SemanticComparator::with_config(load_corpus(parses)?, config);
    let phrases = comparator.extract_phrases(&read_doc(doc)?)?;
    print_json(&phrases)
}

fn cmd_compare(
    config: CompareConfig,
    parses: &Path,
    doc_a: &Path,
    doc_b: &Path,
    vectors: Option<&Path>,
) -> anyhow::Result<()> {
    let dimension = config.embedding_dimension;
    let mut comparator = SemanticComparator::with_config(load_corpus(parses)?, config);
    match vectors {
        Some(path) => {
            let data = fs::read_to_string(path).with_context(|| format!("reading vectors {}", path.display()))?;
            comparator.load_semantic_model(VectorTable::from_json(&data)?);
        }
        None => comparator.load_semantic_model(HashedBagOfWords::new(dimension)),
    }

    let phrases_a = comparator.extract_phrases(&read_doc(doc_a)?)?;
    let phrases_b = comparator.extract_phrases(&read_doc(doc_b)?)?;
    let similarity = comparator.build_similarity_matrix(&phrases_a, &phrases_b)?;
    let buckets = comparator.bucket_sort(&phrases_a, &phrases_b, &similarity)?;

    let shared = buckets
        .shared
        .iter()
        .map(|(a, b)| {
            let i = phrases_a.iter().position(|phrase| phrase == a);
            let j = phrases_b.iter().position(|phrase| phrase == b);
            SharedPair {
                a: a.as_str(),
                b: b.as_str(),
                score: i.zip(j).and_then(|(i, j)| similarity.get(i, j)),
            }
        })
        .collect();

    print_json(&CompareReport {
        phrases_a: &phrases_a,
        phrases_b: &phrases_b,
        similarity: similarity.to_rows(),
        shared,
        only_a: buckets.only_a.iter().map(String::as_str).collect(),
        only_b: buckets.only_b.iter().map(String::as_str).collect(),
    })
}

fn cmd_align(config: CompareConfig, parses: &Path, phrase_a: &str, phrase_b: &str) -> anyhow::Result<()> {
    let comparator = SemanticComparator::with_config(load_corpus(parses)?, config);
    print_json(&comparator.transform_phrase(phrase_a, phrase_b)?)
}

fn cmd_split(doc: &Path) -> anyhow::Result<()> {
    let text = read_doc(doc)?;
    print_json(&split_sentences(&text))
}
