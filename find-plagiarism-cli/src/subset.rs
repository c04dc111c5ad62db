mod logging;

use std::error::Error;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use find_plagiarism::corpus::{read_pairs, GroundTruthMap};
use hashbrown::HashSet;

#[derive(Parser, Debug)]
#[clap(
    name = "find-plagiarism-subset",
    about = "A program to cut out a small dataset keeping some plagiarism pairs."
)]
struct Args {
    /// File path to the full document file.
    #[clap(short = 'i', long)]
    train_path: PathBuf,

    /// File path to the full list of plagiarism pairs.
    #[clap(short = 'g', long)]
    truth_path: PathBuf,

    /// Number of documents in the output.
    #[clap(short = 'n', long, default_value = "1000")]
    num_docs: usize,

    /// Number of plagiarism pairs in the output, taken from the head of the list.
    #[clap(short = 'p', long, default_value = "10")]
    num_pairs: usize,

    /// Directory where `articles_<num_docs>.train` and `articles_<num_docs>.truth` are written.
    #[clap(short = 'o', long, default_value = ".")]
    output_dir: PathBuf,

    /// Prints only warnings to the standard error output.
    #[clap(short = 'q', long)]
    quiet: bool,
}

struct Subset {
    lines: Vec<String>,
    pairs: Vec<(String, String)>,
}

/// Extracts the integer in a document identifier such as `t1234`.
fn numeric_key(id: &str) -> u64 {
    id.chars()
        .filter(char::is_ascii_digit)
        .fold(0u64, |acc, c| {
            acc.wrapping_mul(10)
                .wrapping_add(u64::from(c as u8 - b'0'))
        })
}

fn select<R, T>(
    train: R,
    truth: T,
    num_docs: usize,
    num_pairs: usize,
) -> Result<Subset, Box<dyn Error>>
where
    R: Read,
    T: Read,
{
    let mut all_pairs = GroundTruthMap::new();
    let mut pairs = vec![];
    let mut included = HashSet::new();
    for (lhs, rhs) in read_pairs(truth)? {
        all_pairs.insert(lhs.clone(), rhs.clone());
        if pairs.len() < num_pairs {
            included.insert(lhs.clone());
            included.insert(rhs.clone());
            pairs.push((lhs, rhs));
        }
    }

    let mut num_others = num_docs.saturating_sub(included.len());
    let mut lines = vec![];
    for line in BufReader::new(train).lines() {
        if lines.len() >= num_docs {
            break;
        }
        let line = line?;
        let id = match line.split(' ').next() {
            Some(id) if !id.is_empty() => id,
            _ => continue,
        };
        if included.contains(id) {
            lines.push(line);
        } else if num_others != 0 && all_pairs.get(id).is_none() {
            lines.push(line);
            num_others -= 1;
        }
    }
    lines.sort_by_key(|line| numeric_key(line.split(' ').next().unwrap_or_default()));

    Ok(Subset { lines, pairs })
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.quiet);

    let subset = select(
        File::open(&args.train_path)?,
        File::open(&args.truth_path)?,
        args.num_docs,
        args.num_pairs,
    )?;
    if subset.lines.len() < args.num_docs {
        tracing::warn!(
            "Only {} documents are available, less than {}",
            subset.lines.len(),
            args.num_docs
        );
    }

    let train_path = args
        .output_dir
        .join(format!("articles_{}.train", args.num_docs));
    let mut wtr = BufWriter::new(File::create(&train_path)?);
    for line in &subset.lines {
        writeln!(wtr, "{}", line)?;
    }
    wtr.flush()?;

    let truth_path = args
        .output_dir
        .join(format!("articles_{}.truth", args.num_docs));
    let mut wtr = BufWriter::new(File::create(&truth_path)?);
    for (lhs, rhs) in &subset.pairs {
        writeln!(wtr, "{} {}", lhs, rhs)?;
    }
    wtr.flush()?;

    tracing::info!(
        "Wrote {} documents and {} pairs to {:?}",
        subset.lines.len(),
        subset.pairs.len(),
        args.output_dir
    );
    Ok(())
}
