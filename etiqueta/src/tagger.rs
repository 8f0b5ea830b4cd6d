use log::{debug, info};

use crate::corpus::Corpus;
use crate::errors::{EtiquetaError, Result};
use crate::mwe;
use crate::ngram::NgramModel;
use crate::sentence::TaggedSentence;
use crate::storage::ModelStore;

/// Immutable identity of one tagger: corpus id, MWE policy and maximum
/// n-gram order. Two configs differing in any field never share a persisted
/// model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggerConfig {
    id: String,
    use_mwe: bool,
    max_ngram: usize,
}

impl TaggerConfig {
    /// # Errors
    ///
    /// If `id` is empty or `max_ngram` is zero, an error variant will be
    /// returned.
    pub fn new<S>(id: S, use_mwe: bool, max_ngram: usize) -> Result<Self>
    where
        S: Into<String>,
    {
        let id = id.into();
        if id.is_empty() {
            return Err(EtiquetaError::invalid_argument("id", "must not be empty"));
        }
        if max_ngram == 0 {
            return Err(EtiquetaError::invalid_argument(
                "max_ngram",
                "must be at least 1",
            ));
        }
        Ok(Self {
            id,
            use_mwe,
            max_ngram,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn use_mwe(&self) -> bool {
        self.use_mwe
    }

    pub fn max_ngram(&self) -> usize {
        self.max_ngram
    }

    /// Registry name of this configuration, e.g. `cess_esp-nomwe-2grams`.
    pub fn name(&self) -> String {
        let mwe = if self.use_mwe { "mwe" } else { "nomwe" };
        format!("{}-{}-{}grams", self.id, mwe, self.max_ngram)
    }
}

/// A trained backoff-chain tagger bound to its configuration.
pub struct PosTagger {
    config: TaggerConfig,
    chain: NgramModel,
}

impl PosTagger {
    /// Loads the backoff chain for `config`, order by order.
    ///
    /// Each order is read from `store`; a missing artifact is trained from
    /// `corpus` (with the chain resolved so far as its fallback) and saved,
    /// when `train_if_missing` permits.
    ///
    /// # Errors
    ///
    /// With `train_if_missing` disabled, a missing artifact surfaces as
    /// `ModelNotFound`. Training an empty corpus surfaces as
    /// `InsufficientData`. Store and decode failures are returned as is.
    pub fn load<C>(
        config: TaggerConfig,
        store: &ModelStore,
        corpus: &C,
        train_if_missing: bool,
    ) -> Result<Self>
    where
        C: Corpus,
    {
        info!(
            "load tagger {:?} (mwe={}, ngrams={})",
            config.id, config.use_mwe, config.max_ngram
        );
        let mut training: Option<Vec<TaggedSentence>> = None;
        let mut chain: Option<NgramModel> = None;
        for order in 1..=config.max_ngram {
            let backoff = chain.take();
            chain = Some(Self::resolve_order(
                &config,
                store,
                corpus,
                order,
                backoff,
                train_if_missing,
                &mut training,
            )?);
        }
        match chain {
            Some(chain) => Ok(Self { config, chain }),
            None => Err(EtiquetaError::invalid_argument(
                "max_ngram",
                "must be at least 1",
            )),
        }
    }

    /// Retrains every order from `corpus` and overwrites the persisted
    /// artifacts, ignoring any existing ones.
    pub fn train<C>(config: TaggerConfig, store: &ModelStore, corpus: &C) -> Result<Self>
    where
        C: Corpus,
    {
        info!(
            "train tagger {:?} (use_mwe={}) up to ngram={}",
            config.id, config.use_mwe, config.max_ngram
        );
        let training = Self::training_sents(&config, store, corpus)?;
        let mut chain: Option<NgramModel> = None;
        for order in 1..=config.max_ngram {
            let model = NgramModel::train(order, &training, chain.take())?;
            store.save(&config.id, config.use_mwe, order, &model.to_data())?;
            chain = Some(model);
        }
        match chain {
            Some(chain) => Ok(Self { config, chain }),
            None => Err(EtiquetaError::invalid_argument(
                "max_ngram",
                "must be at least 1",
            )),
        }
    }

    fn resolve_order<C>(
        config: &TaggerConfig,
        store: &ModelStore,
        corpus: &C,
        order: usize,
        backoff: Option<NgramModel>,
        train_if_missing: bool,
        training: &mut Option<Vec<TaggedSentence>>,
    ) -> Result<NgramModel>
    where
        C: Corpus,
    {
        match store.load(&config.id, config.use_mwe, order) {
            Ok(data) => NgramModel::from_data(data, backoff),
            Err(EtiquetaError::ModelNotFound(_)) if train_if_missing => {
                debug!("artifact missing, train model (ngram={})", order);
                if training.is_none() {
                    *training = Some(Self::training_sents(config, store, corpus)?);
                }
                let sents = training.as_deref().unwrap_or(&[]);
                let model = NgramModel::train(order, sents, backoff)?;
                store.save(&config.id, config.use_mwe, order, &model.to_data())?;
                Ok(model)
            }
            Err(e) => Err(e),
        }
    }

    // Training input for one configuration, materialized once per load.
    //
    // The MWE-disabled configurations are bootstrapped in two phases: phase
    // 1 loads (training if missing) the MWE-enabled unigram sibling under
    // its own cache key; phase 2 re-tags the MWE-expanded corpus with it.
    // The sibling load never re-enters this branch, so the recursion is one
    // level deep.
    fn training_sents<C>(
        config: &TaggerConfig,
        store: &ModelStore,
        corpus: &C,
    ) -> Result<Vec<TaggedSentence>>
    where
        C: Corpus,
    {
        info!(
            "cache tagged sentences for {:?} (mwe={})",
            config.id, config.use_mwe
        );
        if config.use_mwe {
            return corpus.tagged_sents()?.collect();
        }
        let base_config = TaggerConfig::new(config.id.clone(), true, 1)?;
        let base = PosTagger::load(base_config, store, corpus, true)?;
        debug!("re-tag mwe-expanded sentences for {:?}", config.id);
        let mut sents = Vec::new();
        for sent in corpus.tagged_sents()? {
            let sent = sent?;
            let tokens = mwe::expand_sentence(&sent);
            sents.push(TaggedSentence::from_pairs(base.tag(&tokens)));
        }
        Ok(sents)
    }

    /// Tags a token sequence with the full backoff chain.
    pub fn tag(&self, tokens: &[String]) -> Vec<(String, Option<String>)> {
        self.chain.tag(tokens)
    }

    /// Tags each sentence independently.
    pub fn tag_sents(&self, sents: &[Vec<String>]) -> Vec<Vec<(String, Option<String>)>> {
        self.chain.tag_sents(sents)
    }

    pub fn config(&self) -> &TaggerConfig {
        &self.config
    }

    /// The top model of the backoff chain.
    pub fn model(&self) -> &NgramModel {
        &self.chain
    }
}
