mod logging;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use find_plagiarism::corpus::{Corpus, GroundTruthMap};
use find_plagiarism::evaluate::{CandidatePair, Evaluation, ReportSink};
use find_plagiarism::{Pipeline, PipelineConfig};

#[derive(Parser, Debug)]
#[clap(
    name = "find-plagiarism-minhash",
    about = "A program to find plagiarized documents with MinHash signatures."
)]
struct Args {
    /// File path to a document file, where each line is `<id> <word> <word> ...`.
    #[clap(short = 'i', long)]
    data_path: PathBuf,

    /// File path to known plagiarism pairs, where each line is `<id> <id>`.
    #[clap(short = 'g', long)]
    truth_path: PathBuf,

    /// Number of documents to be read from the document file.
    #[clap(short = 'n', long)]
    num_docs: usize,

    /// Number of hash functions, i.e., the length of MinHash signatures.
    /// The larger this value, the more accurate the estimation,
    /// but the more time and memory it takes.
    #[clap(short = 'k', long, default_value = "10")]
    num_hashes: usize,

    /// Pairs whose estimated Jaccard similarities are greater than this value are reported.
    #[clap(short = 't', long, default_value = "0.5")]
    threshold: f64,

    /// Exact Jaccard similarities are computed for validation only up to this number of documents.
    #[clap(short = 'e', long, default_value = "2500")]
    exact_ceiling: usize,

    /// Number of consecutive words in a shingle (must be more than 0).
    #[clap(short = 'w', long, default_value = "3")]
    window_size: usize,

    /// Seed value for random values.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Disables parallel construction.
    #[clap(short = 'p', long)]
    disable_parallel: bool,

    /// Prints only warnings to the standard error output.
    #[clap(short = 'q', long)]
    quiet: bool,
}

/// Prints candidates as a table to the standard output.
struct ConsoleSink {
    threshold: f64,
    header_printed: bool,
}

impl ReportSink for ConsoleSink {
    fn candidate(&mut self, pair: &CandidatePair) {
        if !self.header_printed {
            self.print_header();
        }
        println!(
            "  {:>5} --> {:>5}   {:.2}     {:.2}",
            pair.left, pair.right, pair.estimated, pair.exact
        );
    }

    fn summary(&mut self, evaluation: &Evaluation) {
        if !self.header_printed {
            self.print_header();
        }
        println!();
        println!(
            "True positives:  {} / {}",
            evaluation.true_positives, evaluation.total_true_pairs
        );
        println!("False positives: {}", evaluation.false_positives);
    }
}

impl ConsoleSink {
    fn print_header(&mut self) {
        println!(
            "List of Document Pairs with J(d1,d2) more than {}",
            self.threshold
        );
        println!("Values shown are the estimated Jaccard similarity and the actual");
        println!("Jaccard similarity.");
        println!();
        println!("                   Est. J   Act. J");
        self.header_printed = true;
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.quiet);

    let config = PipelineConfig {
        num_docs: args.num_docs,
        num_hashes: args.num_hashes,
        threshold: args.threshold,
        exact_ceiling: args.exact_ceiling,
        window_size: args.window_size,
        seed: args.seed,
        parallel: !args.disable_parallel,
    };
    let pipeline = Pipeline::new(config)?;

    let (corpus, truth) = {
        tracing::info!("Loading documents and plagiarism pairs...");
        let start = Instant::now();
        let truth = GroundTruthMap::from_reader(File::open(&args.truth_path)?)?;
        let corpus = Corpus::from_reader(File::open(&args.data_path)?, args.num_docs)?;
        tracing::info!(
            "Loaded {} documents and {} pairs in {} sec",
            corpus.len(),
            truth.num_pairs(),
            start.elapsed().as_secs_f64()
        );
        (corpus, truth)
    };

    let mut sink = ConsoleSink {
        threshold: args.threshold,
        header_printed: false,
    };
    let start = Instant::now();
    let output = pipeline.run(&corpus, &truth, &mut sink)?;
    tracing::info!("Done in {} sec", start.elapsed().as_secs_f64());

    if let Some(validation) = output.validation {
        tracing::info!(
            "Estimation errors: mean {:.4}, max {:.4}",
            validation.mean_absolute_error,
            validation.max_absolute_error
        );
    }
    tracing::info!(
        "Precision {:.4}, recall {:.4}",
        output.evaluation.precision(),
        output.evaluation.recall()
    );

    Ok(())
}
