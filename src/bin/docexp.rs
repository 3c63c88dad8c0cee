//! docexp CLI binary.
//!
//! Loads a small corpus into the in-memory index, expands each document,
//! and prints the top terms of the original, expansion, and combined
//! language models. Corpus lines are `docno<TAB>text`.

use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;
use rayon::prelude::*;

use docexp::config::ExpansionConfig;
use docexp::document::Document;
use docexp::expansion::{DocumentExpander, RetrievalExpander};
use docexp::index::{CollectionStats, SearchIndex};
use docexp::index::memory::MemoryIndex;
use docexp::lm::{LanguageModels, combined_language_model};
use docexp::scoring::{DirichletScorer, ExpansionDocScorer};
use docexp::stop::StopList;

#[derive(Parser, Debug)]
#[command(name = "docexp", version, about = "Pseudo-relevance-feedback document expansion")]
struct DocexpArgs {
    /// Corpus file with one `docno<TAB>text` record per line
    corpus: PathBuf,

    /// Only expand this docno (default: all documents)
    #[arg(short, long)]
    docno: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Interpolation weight given to the original language model
    #[arg(short = 'w', long, default_value_t = 0.7)]
    original_weight: f64,

    /// Number of top terms to print per model
    #[arg(short = 'k', long, default_value_t = 10)]
    top_terms: usize,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = DocexpArgs::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: DocexpArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => ExpansionConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ExpansionConfig::default(),
    };

    let stoplist = config
        .stoplist_path
        .as_ref()
        .map(StopList::from_file)
        .transpose()
        .context("loading stoplist")?;

    let corpus = std::fs::read_to_string(&args.corpus)
        .with_context(|| format!("reading corpus {}", args.corpus.display()))?;
    let mut index = MemoryIndex::new();
    for line in corpus.lines().filter(|l| !l.trim().is_empty()) {
        let (docno, text) = line
            .split_once('\t')
            .with_context(|| format!("corpus line without tab: {line}"))?;
        index.add_document(docno, text);
    }
    let index = Arc::new(index);
    log::info!("indexed {} documents", index.doc_count());

    let mut expander =
        RetrievalExpander::with_params(index.clone(), config.num_terms, stoplist);
    expander.set_max_num_docs(config.max_num_docs);
    let expander = Arc::new(expander);
    let scorer = ExpansionDocScorer::with_params(
        config.mu,
        expander.clone(),
        config.num_docs,
        config.prior,
    );
    let dirichlet = DirichletScorer::with_mu(config.mu, index.clone());
    let models = LanguageModels::new();

    let targets: Vec<Document> = index
        .documents()
        .filter(|(_, docno)| args.docno.as_deref().is_none_or(|d| d == *docno))
        .map(|(doc_id, docno)| {
            let mut doc = Document::new(docno);
            doc.set_doc_id(doc_id);
            doc
        })
        .collect();
    anyhow::ensure!(!targets.is_empty(), "no matching documents in corpus");

    // Expansion retrieval dominates the runtime; documents are independent,
    // so warm the caches in parallel.
    targets.par_iter().for_each(|doc| {
        let mut doc = doc.clone();
        if let Ok(vector) = index.feature_vector(doc.doc_id()) {
            doc.set_vector(vector);
        }
        expander.expand(&doc, config.num_docs);
    });

    for doc in &targets {
        let mut doc = doc.clone();
        doc.set_vector(index.feature_vector(doc.doc_id())?);

        let original = models.original_language_model(&doc, &dirichlet);
        let expansion = models.expansion_language_model(&doc, &scorer, None);
        let combined = combined_language_model(&original, &expansion, args.original_weight);

        println!("=== {} ===", doc.docno());
        print_model("original", &original, args.top_terms);
        print_model("expansion", &expansion, args.top_terms);
        print_model(
            &format!("combined (w = {})", args.original_weight),
            &combined,
            args.top_terms,
        );
    }

    Ok(())
}

fn print_model(label: &str, model: &docexp::vector::TermVector, top_terms: usize) {
    println!("  {label}:");
    for (term, weight) in model.top_terms(top_terms) {
        println!("    {weight:.6}  {term}");
    }
}
