use find_plagiarism::corpus::{Corpus, Document, GroundTruthMap};
use find_plagiarism::evaluate::{CollectingSink, Evaluation};
use find_plagiarism::{Pipeline, PipelineConfig};
use rand::{Rng, SeedableRng};

const NUM_ORIGINALS: usize = 40;
const NUM_COPIES: usize = 5;
const DOC_LEN: usize = 60;

fn random_tokens<R: Rng>(rng: &mut R) -> Vec<String> {
    (0..DOC_LEN)
        .map(|_| format!("w{}", rng.gen_range(0..500)))
        .collect()
}

/// Builds a corpus where the first `NUM_COPIES` documents are copied with a few edits.
fn synthetic_corpus() -> (String, String) {
    let mut rng = rand_xoshiro::SplitMix64::seed_from_u64(2022);
    let mut lines = vec![];
    let mut truth = vec![];
    let mut originals = vec![];
    for i in 0..NUM_ORIGINALS {
        let tokens = random_tokens(&mut rng);
        lines.push(format!("t{} {}", i, tokens.join(" ")));
        originals.push(tokens);
    }
    for (c, original) in originals.iter().take(NUM_COPIES).enumerate() {
        let mut tokens = original.clone();
        for k in [10, 30, 50] {
            tokens[k] = "edited".to_string();
        }
        let id = NUM_ORIGINALS + c;
        lines.push(format!("t{} {}", id, tokens.join(" ")));
        truth.push(format!("t{c} t{id}"));
    }
    (lines.join("\n"), truth.join("\n"))
}

fn run(parallel: bool) -> (Evaluation, CollectingSink) {
    let (data, truth) = synthetic_corpus();
    let num_docs = NUM_ORIGINALS + NUM_COPIES;
    let corpus = Corpus::from_reader(data.as_bytes(), num_docs).unwrap();
    let truth = GroundTruthMap::from_reader(truth.as_bytes()).unwrap();

    let mut config = PipelineConfig::new(num_docs);
    config.num_hashes = 200;
    config.seed = Some(7);
    config.parallel = parallel;

    let mut sink = CollectingSink::default();
    let output = Pipeline::new(config)
        .unwrap()
        .run(&corpus, &truth, &mut sink)
        .unwrap();
    assert!(output.validation.unwrap().mean_absolute_error < 0.05);
    (output.evaluation, sink)
}

#[test]
fn test_detects_all_copies() {
    let (evaluation, sink) = run(false);
    assert_eq!(
        evaluation,
        Evaluation {
            true_positives: NUM_COPIES,
            false_positives: 0,
            total_true_pairs: NUM_COPIES,
        }
    );
    assert_eq!(sink.evaluation, Some(evaluation));
    for pair in &sink.candidates {
        assert!(pair.is_true_positive);
        assert!(pair.exact > 0.5);
        assert!(pair.i < pair.j);
    }
}

#[test]
fn test_parallel_run() {
    let (seq, seq_sink) = run(false);
    let (par, par_sink) = run(true);
    assert_eq!(seq, par);
    assert_eq!(seq_sink.candidates, par_sink.candidates);
}

#[test]
fn test_custom_shingle_hasher() {
    // FNV-1a
    let fnv = |bytes: &[u8]| -> u32 {
        bytes.iter().fold(0x811c9dc5u32, |h, &b| {
            (h ^ b as u32).wrapping_mul(0x01000193)
        })
    };
    let docs = vec![
        Document::parse("a one two three four five").unwrap(),
        Document::parse("b one two three four six").unwrap(),
        Document::parse("c seven eight nine ten").unwrap(),
    ];
    let corpus = Corpus::from_documents(docs);

    let mut config = PipelineConfig::new(3);
    config.num_hashes = 500;
    config.seed = Some(1);
    config.parallel = true;
    let pipeline = Pipeline::new(config).unwrap();

    let shingle_sets = pipeline.shingle_with_hasher(&corpus, fnv).unwrap();
    assert_eq!(shingle_sets[0].len(), 3);
    assert!(shingle_sets[0].contains(&fnv(b"one two three")));
    assert_eq!(shingle_sets[1].intersection(&shingle_sets[0]).count(), 2);

    let mut truth = GroundTruthMap::new();
    truth.insert("a", "b");
    let mut sink = CollectingSink::default();
    let output = pipeline
        .run_with_hasher(&corpus, fnv, &truth, &mut sink)
        .unwrap();

    // J(a, b) = 2 / 4
    assert_eq!(
        output.evaluation.true_positives + output.evaluation.false_positives,
        sink.candidates.len()
    );
    assert_eq!(output.evaluation.false_positives, 0);
    assert_eq!(output.validation.map(|v| v.max_absolute_error < 0.1), Some(true));
}
