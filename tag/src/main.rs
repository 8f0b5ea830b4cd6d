use std::io::{prelude::*, stdin};
use std::path::PathBuf;

use clap::Parser;
use etiqueta::{
    MemoryCorpus, ModelStore, PosTagger, TaggedSentence, TaggerConfig, UniversalPos,
    UniversalTagger,
};

#[derive(Parser, Debug)]
#[command(about = "A program to tag tokenized text with a trained Etiqueta model.")]
struct Args {
    /// The directory holding trained model artifacts
    #[arg(long)]
    model_dir: PathBuf,

    /// Corpus identifier of the tagger to load
    #[arg(long)]
    id: String,

    /// The maximum n-gram order of the backoff chain
    #[arg(long, default_value = "2")]
    ngrams: usize,

    /// Use the MWE-expanded model
    #[arg(long)]
    no_mwe: bool,

    /// Directory of {tagset}.map files; projects output onto the universal tagset
    #[arg(long)]
    mapping_dir: Option<PathBuf>,

    /// Native tagset to project from (required with --mapping-dir)
    #[arg(long)]
    tagset: Option<String>,
}

enum Runner {
    Native(PosTagger),
    Universal(UniversalTagger),
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    eprintln!("Loading model artifacts...");
    let store = ModelStore::new(args.model_dir);
    // Artifacts must already exist; this tool never trains, so the corpus
    // behind the load is an unused placeholder.
    let placeholder = MemoryCorpus::new(args.id.clone(), "", vec![]);
    let config = TaggerConfig::new(args.id, !args.no_mwe, args.ngrams)?;
    let tagger = PosTagger::load(config, &store, &placeholder, false)?;

    let runner = match (&args.mapping_dir, &args.tagset) {
        (Some(dir), Some(tagset)) => {
            Runner::Universal(UniversalTagger::new(tagger, UniversalPos::load(dir, tagset)?))
        }
        (None, None) => Runner::Native(tagger),
        _ => return Err("--mapping-dir and --tagset must be given together".into()),
    };

    eprintln!("Start tagging");
    for line in stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        let tagged = match &runner {
            Runner::Native(t) => t.tag(&tokens),
            Runner::Universal(t) => t.tag(&tokens),
        };
        println!("{}", TaggedSentence::from_pairs(tagged).to_tagged_string());
    }

    if let Runner::Universal(t) = &runner {
        let missing = t.projector().missing();
        if !missing.is_empty() {
            eprintln!("Tags without universal mapping: {:?}", missing);
        }
    }

    Ok(())
}
