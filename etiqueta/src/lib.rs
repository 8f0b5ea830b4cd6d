//! # Etiqueta
//!
//! Etiqueta trains and evaluates part-of-speech taggers built from a chain
//! of n-gram models with deterministic backoff. Trained models are persisted
//! per order and reused across runs; corpora annotated with collapsed
//! multi-word expressions can bootstrap MWE-agnostic siblings; and native
//! tags are projected onto a shared universal tagset so taggers trained on
//! different corpora can be compared.
//!
//! ## Examples
//!
//! ```no_run
//! use etiqueta::{ModelStore, PosTagger, TaggedFileCorpus, TaggerConfig};
//!
//! let corpus = TaggedFileCorpus::new("cess_esp", "es-cess", vec!["cess.train".into()]);
//! let store = ModelStore::new("models");
//! let config = TaggerConfig::new("cess_esp", true, 2).unwrap();
//! let tagger = PosTagger::load(config, &store, &corpus, true).unwrap();
//!
//! let tokens: Vec<String> = ["La", "casa", "es", "azul"]
//!     .iter()
//!     .map(|w| w.to_string())
//!     .collect();
//! for (word, tag) in tagger.tag(&tokens) {
//!     println!("{}/{}", word, tag.as_deref().unwrap_or("?"));
//! }
//! ```

mod corpus;
mod errors;
mod evaluate;
mod model;
mod ngram;
mod registry;
mod sentence;
mod storage;
mod tagger;
mod universal;

pub mod mwe;

pub use corpus::{Corpus, MemoryCorpus, SentenceIter, TaggedFileCorpus};
pub use errors::{EtiquetaError, Result};
pub use evaluate::{evaluate, score_sentence, Evaluation, SentenceCounts};
pub use model::ModelData;
pub use ngram::{NgramContext, NgramModel};
pub use registry::Registry;
pub use sentence::TaggedSentence;
pub use storage::ModelStore;
pub use tagger::{PosTagger, TaggerConfig};
pub use universal::{TagsetMapping, UniversalCorpus, UniversalPos, UniversalTagger};
