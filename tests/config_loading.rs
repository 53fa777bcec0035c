//! Building scorers from YAML files on disk.

use std::fs;

use docent::{
    CoherenceError, ConfigLoadError, CoverageFold, DocentConfig, Document, DocumentScorer,
    KeyReconciliation, Modification, RhymeError, SearchStep, Sentence,
};
use tempfile::TempDir;

fn write_fixture(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("trace"))
        .with_test_writer()
        .try_init();
}

#[test]
fn scorer_from_yaml_file_uses_dictionary() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let rhymes = write_fixture(
        &dir,
        "rhymes.txt",
        "# word key\nread eed\nread ed\nlive ive\nbroken\n",
    );
    let yaml = format!(
        r#"
version: "1.0"
name: "fixture"
parallel_estimation: true
rhyme:
  max_rhyme_distance: 3
  rhymes_file: "{}"
  coverage: union
  reconciliation: shared_keys
"#,
        rhymes.display()
    );
    let config_path = write_fixture(&dir, "docent.yaml", &yaml);

    let config = DocentConfig::from_file(&config_path).unwrap();
    assert!(config.parallel_estimation);
    assert_eq!(config.rhyme.coverage, CoverageFold::Union);
    assert_eq!(config.rhyme.reconciliation, KeyReconciliation::SharedKeys);

    let scorer = DocumentScorer::from_config(&config).unwrap();
    let classifier = scorer.rhyme_model().classifier();
    assert_eq!(classifier.dictionary().unwrap().skipped_lines(), 1);
    assert_eq!(classifier.rhyme_keys("read"), vec!["eed", "ed", "ead"]);
    assert_eq!(scorer.rhyme_model().max_rhyme_distance(), 3);

    let mut doc = scorer.init(Document::from_lines(
        "dictionary",
        ["I read", "a seed", "the bed", "we need", "a sled"],
    ));
    assert_eq!(doc.rhyme_state().members("eed"), vec![0, 1, 3]);
    assert_eq!(doc.rhyme_state().members("ed"), vec![0, 2, 4]);

    let candidates = scorer.estimate_all(
        &doc,
        vec![
            SearchStep::single(Modification::replace(2, Sentence::from_text("the weed"))),
            SearchStep::single(Modification::remove(4)),
        ],
    );
    let candidate = candidates.into_iter().next().unwrap().unwrap();
    scorer.commit(&mut doc, candidate).unwrap();
    assert_eq!(doc.document().final_word(2), Some("weed"));
}

#[test]
fn unreadable_dictionary_fails_construction() {
    let dir = tempfile::tempdir().unwrap();
    let config = DocentConfig::from_yaml(&format!(
        "version: \"1.0\"\nrhyme:\n  rhymes_file: \"{}\"\n",
        dir.path().join("missing.txt").display()
    ))
    .unwrap();

    let err = DocumentScorer::from_config(&config).unwrap_err();
    assert!(matches!(
        err,
        ConfigLoadError::Coherence(CoherenceError::Rhyme(RhymeError::DictionaryRead { .. }))
    ));
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn invalid_syllable_rule_fails_construction() {
    let config = DocentConfig::from_yaml(
        r#"
version: "1.0"
rhyme:
  syllable_rules:
    - ".*([aeiou"
"#,
    )
    .unwrap();

    assert!(matches!(
        DocumentScorer::from_config(&config),
        Err(ConfigLoadError::Coherence(CoherenceError::Rhyme(
            RhymeError::InvalidRule { .. }
        )))
    ));
}

#[test]
fn custom_rules_replace_the_defaults() {
    let config = DocentConfig::from_yaml(
        r#"
rhyme:
  syllable_rules:
    - ".*([aeiou][^aeiou]*)"
"#,
    )
    .unwrap();
    let scorer = DocumentScorer::from_config(&config).unwrap();
    let classifier = scorer.rhyme_model().classifier();
    assert_eq!(classifier.rules().len(), 1);
    assert_eq!(classifier.rhyme_keys("banner"), vec!["er"]);
}

#[test]
fn unbounded_rhyme_distance_scores_documents() {
    let config = DocentConfig::from_yaml(
        "rhyme:\n  max_rhyme_distance: 18446744073709551615\n",
    )
    .unwrap();
    assert_eq!(config.rhyme.max_rhyme_distance, usize::MAX);

    let scorer = DocumentScorer::from_config(&config).unwrap();
    let mut doc = scorer.init(Document::from_lines("unbounded", ["rain", "pain", "sun"]));
    assert!(doc.scores()[0].is_finite());

    let lines = ["rain", "pain", "sun", "main", "fun", "gain", "run", "done"];
    let bounded = DocumentScorer::from_config(
        &DocentConfig::from_yaml("rhyme:\n  max_rhyme_distance: 8\n").unwrap(),
    )
    .unwrap();
    let wide = scorer.init(Document::from_lines("wide", lines));
    let narrow = bounded.init(Document::from_lines("narrow", lines));
    assert!((wide.scores()[0] - narrow.scores()[0]).abs() < 1e-9);

    let candidate = scorer.estimate(&doc, SearchStep::single(Modification::remove(2))).unwrap();
    scorer.commit(&mut doc, candidate).unwrap();
    assert!(doc.scores()[0].is_finite());
}
