mod logging;

use std::error::Error;
use std::fs::File;
use std::path::PathBuf;

use clap::Parser;
use find_plagiarism::corpus::Corpus;
use find_plagiarism::exact::ExactSimilarities;
use find_plagiarism::pipeline::Validation;
use find_plagiarism::{JaccardSearcher, Pipeline, PipelineConfig};
use rand::{RngCore, SeedableRng};

#[derive(Parser, Debug)]
#[clap(
    name = "find-plagiarism-minhash_mae",
    about = "A program to measure estimation errors of MinHash for various signature lengths."
)]
struct Args {
    /// File path to a document file, where each line is `<id> <word> <word> ...`.
    #[clap(short = 'i', long)]
    data_path: PathBuf,

    /// Number of documents to be read from the document file.
    #[clap(short = 'n', long)]
    num_docs: usize,

    /// Signature lengths of 1, 2, 5, 10, 20, 50, ... are examined up to this value.
    #[clap(short = 'm', long, default_value = "1000")]
    max_hashes: usize,

    /// Number of independent trials averaged for each signature length.
    #[clap(short = 'r', long, default_value = "1")]
    num_trials: usize,

    /// Number of consecutive words in a shingle (must be more than 0).
    #[clap(short = 'w', long, default_value = "3")]
    window_size: usize,

    /// Seed value for random values.
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// Prints only warnings to the standard error output.
    #[clap(short = 'q', long)]
    quiet: bool,
}

/// Yields 1, 2, 5, 10, 20, 50, ... up to `max`.
fn signature_lengths(max: usize) -> Vec<usize> {
    let mut lengths = vec![];
    let mut base = 1;
    'outer: loop {
        for step in [1, 2, 5] {
            let k = base * step;
            if k > max {
                break 'outer;
            }
            lengths.push(k);
        }
        base *= 10;
    }
    lengths
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.quiet);

    if args.num_trials == 0 {
        return Err("num_trials must be more than 0.".into());
    }

    let mut config = PipelineConfig::new(args.num_docs);
    config.window_size = args.window_size;
    config.seed = args.seed;
    let pipeline = Pipeline::new(config)?;

    let corpus = Corpus::from_reader(File::open(&args.data_path)?, args.num_docs)?;
    let shingle_sets = pipeline.shingle(&corpus)?;
    let exact = ExactSimilarities::compute_in_parallel(&shingle_sets)?;

    let mut seeder =
        rand_xoshiro::SplitMix64::seed_from_u64(args.seed.unwrap_or_else(rand::random::<u64>));

    println!("num_hashes,mean_absolute_error,max_absolute_error");
    for num_hashes in signature_lengths(args.max_hashes) {
        let mut sum_mae = 0.;
        let mut max_error = 0f64;
        for _ in 0..args.num_trials {
            let searcher = JaccardSearcher::new(num_hashes, Some(seeder.next_u64()))?
                .build_signatures_in_parallel(&shingle_sets)
                .compare_signatures_in_parallel()?;
            let estimated = searcher
                .similarities()
                .ok_or("signatures must be compared.")?;
            if let Some(validation) = Validation::compare(exact.matrix(), estimated) {
                sum_mae += validation.mean_absolute_error;
                max_error = max_error.max(validation.max_absolute_error);
            }
        }
        println!(
            "{},{},{}",
            num_hashes,
            sum_mae / args.num_trials as f64,
            max_error
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_lengths() {
        assert_eq!(signature_lengths(0), Vec::<usize>::new());
        assert_eq!(signature_lengths(1), vec![1]);
        assert_eq!(signature_lengths(10), vec![1, 2, 5, 10]);
        assert_eq!(
            signature_lengths(1000),
            vec![1, 2, 5, 10, 20, 50, 100, 200, 500, 1000]
        );
    }
}
