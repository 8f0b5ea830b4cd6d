use std::fs;
use std::path::PathBuf;

use etiqueta::{
    evaluate, MemoryCorpus, ModelStore, PosTagger, TaggedSentence, TaggerConfig, TagsetMapping,
    UniversalCorpus, UniversalPos, UniversalTagger,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "etiqueta-pipeline-{}-{}",
        name,
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn toy_corpus(id: &str) -> MemoryCorpus {
    let sents = vec![
        TaggedSentence::from_tagged("la/D casa/N").unwrap(),
        TaggedSentence::from_tagged("el/D perro/N").unwrap(),
    ];
    MemoryCorpus::new(id, "es-toy", sents)
}

fn projector() -> UniversalPos {
    let mapping = TagsetMapping::from_reader("d DET\nn NOUN\n".as_bytes()).unwrap();
    UniversalPos::new("es-toy", mapping)
}

#[test]
fn test_train_to_order_two_and_tag() {
    let dir = scratch_dir("order-two");
    let store = ModelStore::new(dir.clone());
    let corpus = toy_corpus("toy");

    let config = TaggerConfig::new("toy", false, 2).unwrap();
    let tagger = PosTagger::load(config, &store, &corpus, true).unwrap();

    let tokens = vec!["la".to_string(), "casa".to_string()];
    let tagged = tagger.tag(&tokens);
    assert_eq!(2, tagged.len());
    let words: Vec<&str> = tagged.iter().map(|(w, _)| w.as_str()).collect();
    assert_eq!(vec!["la", "casa"], words);
    assert_eq!(Some("D".to_string()), tagged[0].1);
    assert_eq!(Some("N".to_string()), tagged[1].1);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_persisted_chain_reloads_and_tags_identically() {
    let dir = scratch_dir("reload");
    let store = ModelStore::new(dir.clone());
    let corpus = toy_corpus("toy");

    let config = TaggerConfig::new("toy", true, 2).unwrap();
    let trained = PosTagger::load(config.clone(), &store, &corpus, true).unwrap();

    // A second load with training disallowed must come from the artifacts.
    let reloaded = PosTagger::load(config, &store, &corpus, false).unwrap();

    let tokens = vec![
        "el".to_string(),
        "perro".to_string(),
        "ladra".to_string(),
    ];
    assert_eq!(trained.tag(&tokens), reloaded.tag(&tokens));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_universal_evaluation_end_to_end() {
    let dir = scratch_dir("universal");
    let store = ModelStore::new(dir.clone());
    let corpus = toy_corpus("toy");

    let config = TaggerConfig::new("toy", true, 2).unwrap();
    let tagger = PosTagger::load(config, &store, &corpus, true).unwrap();
    let tagger = UniversalTagger::new(tagger, projector());
    let dataset = UniversalCorpus::new(toy_corpus("toy"), projector());

    let evaluation = evaluate(&tagger, &dataset).unwrap();
    assert_eq!(2, evaluation.n_sents);
    assert_eq!(4, evaluation.counts.total);
    assert_eq!(4, evaluation.counts.evaluated);
    assert_eq!(4, evaluation.counts.matched);
    assert_eq!(Some(1.0), evaluation.coverage());
    assert_eq!(Some(1.0), evaluation.accuracy());
    assert!(tagger.projector().missing().is_empty());
    assert!(dataset.projector().missing().is_empty());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_unmapped_tags_are_reported_not_scored() {
    let dir = scratch_dir("missing");
    let store = ModelStore::new(dir.clone());
    let sents = vec![
        TaggedSentence::from_tagged("la/D casa/N").unwrap(),
        TaggedSentence::from_tagged("sol/X brilla/X").unwrap(),
    ];
    let corpus = MemoryCorpus::new("toy", "es-toy", sents.clone());

    let config = TaggerConfig::new("toy", true, 1).unwrap();
    let tagger = PosTagger::load(config, &store, &corpus, true).unwrap();
    let tagger = UniversalTagger::new(tagger, projector());
    let dataset = UniversalCorpus::new(
        MemoryCorpus::new("toy", "es-toy", sents),
        projector(),
    );

    let evaluation = evaluate(&tagger, &dataset).unwrap();
    // "X" projects to None on both sides: those positions are not evaluated.
    assert_eq!(4, evaluation.counts.total);
    assert_eq!(2, evaluation.counts.evaluated);
    assert_eq!(2, evaluation.counts.matched);
    assert_eq!(Some(0.5), evaluation.coverage());
    assert!(tagger.projector().missing().contains("X"));
    assert!(dataset.projector().missing().contains("X"));

    let _ = fs::remove_dir_all(dir);
}
