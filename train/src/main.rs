use std::path::PathBuf;

use clap::Parser;
use etiqueta::{ModelStore, PosTagger, TaggedFileCorpus, TaggerConfig};

#[derive(Parser, Debug)]
#[command(about = "A program to train n-gram backoff taggers of Etiqueta.")]
struct Args {
    /// A tagged training corpus (one sentence per line of word/TAG pairs)
    #[arg(long, required = true)]
    corpus: Vec<PathBuf>,

    /// Corpus identifier, used in model artifact names
    #[arg(long)]
    id: String,

    /// Native tagset name of the corpus
    #[arg(long)]
    tagset: String,

    /// The directory to write the trained model artifacts to
    #[arg(long)]
    model_dir: PathBuf,

    /// The maximum n-gram order of the backoff chain
    #[arg(long, default_value = "2")]
    ngrams: usize,

    /// Train on MWE-expanded text bootstrapped from the MWE-aware unigram model
    #[arg(long)]
    no_mwe: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let corpus = TaggedFileCorpus::new(args.id.clone(), args.tagset, args.corpus);
    let config = TaggerConfig::new(args.id, !args.no_mwe, args.ngrams)?;
    let store = ModelStore::new(args.model_dir);

    eprintln!("Start training...");
    let tagger = PosTagger::train(config, &store, &corpus)?;
    eprintln!("Finish training.");

    let mut model = Some(tagger.model());
    while let Some(m) = model {
        eprintln!("# of contexts (ngram={}): {}", m.order(), m.n_contexts());
        model = m.backoff();
    }

    Ok(())
}
