use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use etiqueta::{
    evaluate, Corpus, Evaluation, ModelStore, PosTagger, Registry, TaggedFileCorpus,
    TaggerConfig, UniversalCorpus, UniversalPos, UniversalTagger,
};
use log::info;

/// Datasets known to the batch driver: (corpus id, native tagset).
const DATASETS: &[(&str, &str)] = &[("cess_esp", "es-cess"), ("conll2002", "es-conll")];

const NGRAM_ORDERS: &[usize] = &[1, 2, 3];

#[derive(Parser, Debug)]
#[command(about = "A program to run batch evaluations of Etiqueta taggers.")]
struct Args {
    /// Substring pattern selecting the taggers to run
    #[arg(long)]
    taggers: String,

    /// Substring pattern selecting the datasets (all if not set)
    #[arg(long)]
    datasets: Option<String>,

    /// Directory containing {id}.train and {id}.test corpus files
    #[arg(long)]
    data_dir: PathBuf,

    /// Directory containing {tagset}.map universal mapping files
    #[arg(long)]
    mapping_dir: PathBuf,

    /// The directory holding trained model artifacts
    #[arg(long)]
    model_dir: PathBuf,

    /// Fail when a model artifact is missing instead of training it
    #[arg(long)]
    no_train: bool,
}

#[derive(Clone)]
struct DatasetSpec {
    id: String,
    tagset: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let mut datasets: Registry<DatasetSpec> = Registry::new();
    for (id, tagset) in DATASETS {
        datasets.register(
            *id,
            DatasetSpec {
                id: id.to_string(),
                tagset: tagset.to_string(),
            },
        );
    }

    let mut taggers: Registry<TaggerConfig> = Registry::new();
    for (id, _) in DATASETS {
        for use_mwe in [true, false] {
            for &ngrams in NGRAM_ORDERS {
                let config = TaggerConfig::new(*id, use_mwe, ngrams)?;
                taggers.register(config.name(), config);
            }
        }
    }

    let selected_taggers: Vec<TaggerConfig> = taggers
        .select(&args.taggers)
        .map(|(_, c)| c.clone())
        .collect();
    let dataset_pattern = args.datasets.as_deref().unwrap_or("");
    let selected_datasets: Vec<DatasetSpec> = datasets
        .select(dataset_pattern)
        .map(|(_, d)| d.clone())
        .collect();

    println!("Number of taggers: {}", selected_taggers.len());
    println!("Number of datasets: {}", selected_datasets.len());

    let store = ModelStore::new(args.model_dir.clone());
    let mut n_failed = 0usize;

    for config in &selected_taggers {
        for spec in &selected_datasets {
            info!("evaluate tagger {:?} over dataset {:?}", config.name(), spec.id);
            let started = Instant::now();
            match run_pair(&args, &store, &datasets, config, spec) {
                Ok(()) => println!("elapsed: {:.2?}", started.elapsed()),
                Err(e) => {
                    n_failed += 1;
                    eprintln!("pair ({}, {}) failed: {}", config.name(), spec.id, e);
                }
            }
        }
    }

    if n_failed > 0 {
        eprintln!("{n_failed} pair(s) failed");
        std::process::exit(1);
    }
    Ok(())
}

fn run_pair(
    args: &Args,
    store: &ModelStore,
    datasets: &Registry<DatasetSpec>,
    config: &TaggerConfig,
    gold: &DatasetSpec,
) -> Result<(), Box<dyn std::error::Error>> {
    // A tagger trains on the dataset its id names, whatever gold corpus it
    // is evaluated against.
    let train_spec = datasets
        .get(config.id())
        .ok_or_else(|| format!("no dataset registered for tagger id {:?}", config.id()))?;
    let train_corpus = TaggedFileCorpus::new(
        train_spec.id.clone(),
        train_spec.tagset.clone(),
        vec![args.data_dir.join(format!("{}.train", train_spec.id))],
    );
    let tagger = PosTagger::load(config.clone(), store, &train_corpus, !args.no_train)?;
    let tagger = UniversalTagger::new(
        tagger,
        UniversalPos::load(&args.mapping_dir, &train_spec.tagset)?,
    );

    let gold_corpus = TaggedFileCorpus::new(
        gold.id.clone(),
        gold.tagset.clone(),
        vec![args.data_dir.join(format!("{}.test", gold.id))],
    );
    let dataset = UniversalCorpus::new(
        gold_corpus,
        UniversalPos::load(&args.mapping_dir, &gold.tagset)?,
    );

    let evaluation = evaluate(&tagger, &dataset)?;
    print_report(config, gold, &evaluation, &tagger, &dataset);
    Ok(())
}

fn print_report<C>(
    config: &TaggerConfig,
    gold: &DatasetSpec,
    evaluation: &Evaluation,
    tagger: &UniversalTagger,
    dataset: &UniversalCorpus<C>,
) where
    C: Corpus,
{
    fn percent(v: Option<f64>) -> String {
        v.map(|v| format!("{:.2}%", v * 100.0))
            .unwrap_or_else(|| "n/a".to_string())
    }

    println!("==> {} <> {}", config.name(), gold.id);
    println!("sentences: {}", evaluation.n_sents);
    println!(
        "evaluated: {} matched: {} total: {}",
        evaluation.counts.evaluated, evaluation.counts.matched, evaluation.counts.total
    );
    println!("coverage: {}", percent(evaluation.coverage()));
    println!("accuracy on covered: {}", percent(evaluation.covered_accuracy()));
    println!("overall accuracy: {}", percent(evaluation.accuracy()));

    let tagger_missing = tagger.projector().missing();
    if !tagger_missing.is_empty() {
        println!("tagger tags without universal mapping: {:?}", tagger_missing);
    }
    let gold_missing = dataset.projector().missing();
    if !gold_missing.is_empty() {
        println!("gold tags without universal mapping: {:?}", gold_missing);
    }
}
