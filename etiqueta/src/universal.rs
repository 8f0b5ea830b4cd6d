use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use hashbrown::HashMap;
use log::debug;

use crate::corpus::{Corpus, SentenceIter};
use crate::errors::{EtiquetaError, Result};
use crate::sentence::TaggedSentence;
use crate::tagger::PosTagger;

/// Mapping from a tagset's native tags (case-folded) to the shared
/// universal tags. Built once per tagset name; immutable after load.
pub struct TagsetMapping {
    map: HashMap<String, String>,
}

impl TagsetMapping {
    /// Parses the line-oriented mapping resource: two whitespace-separated
    /// fields per line (native tag, universal tag); blank lines and `#`
    /// comments are skipped. Native tags are case-folded on insertion.
    ///
    /// # Errors
    ///
    /// A line with any other field count is rejected.
    pub fn from_reader<R>(rdr: R) -> Result<Self>
    where
        R: BufRead,
    {
        let mut map = HashMap::new();
        for (lineno, line) in rdr.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next(), fields.next()) {
                (Some(native), Some(universal), None) => {
                    map.insert(native.to_lowercase(), universal.to_string());
                }
                _ => {
                    return Err(EtiquetaError::invalid_argument(
                        "mapping",
                        format!(
                            "line {} is not two whitespace-separated fields",
                            lineno + 1
                        ),
                    ));
                }
            }
        }
        Ok(Self { map })
    }

    /// Loads the mapping for `tagset` from `{dir}/{tagset}.map`.
    pub fn load(dir: &Path, tagset: &str) -> Result<Self> {
        let path = dir.join(format!("{tagset}.map"));
        debug!("load tagset mapping from {:?}", path);
        let file = File::open(&path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Looks up an already case-folded native tag.
    pub fn get(&self, native_lower: &str) -> Option<&str> {
        self.map.get(native_lower).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Projects native tags onto the universal tagset, accumulating the native
/// tags that have no mapping for end-of-run reporting.
pub struct UniversalPos {
    tagset: String,
    mapping: TagsetMapping,
    missing: RefCell<BTreeSet<String>>,
}

impl UniversalPos {
    pub fn new<S>(tagset: S, mapping: TagsetMapping) -> Self
    where
        S: Into<String>,
    {
        Self {
            tagset: tagset.into(),
            mapping,
            missing: RefCell::new(BTreeSet::new()),
        }
    }

    /// Loads the mapping for `tagset` from `dir` and wraps it.
    pub fn load(dir: &Path, tagset: &str) -> Result<Self> {
        let mapping = TagsetMapping::load(dir, tagset)?;
        Ok(Self::new(tagset, mapping))
    }

    pub fn tagset(&self) -> &str {
        &self.tagset
    }

    /// Maps a native tag to its universal tag, case-insensitively.
    ///
    /// Never fails: an unmapped tag is recorded in the `missing` diagnostic
    /// set and projected to `None`. The mapping itself is never mutated, so
    /// repeated calls are idempotent.
    pub fn project(&self, tag: &str) -> Option<String> {
        match self.mapping.get(&tag.to_lowercase()) {
            Some(universal) => Some(universal.to_string()),
            None => {
                self.missing.borrow_mut().insert(tag.to_string());
                None
            }
        }
    }

    /// The native tags seen so far that have no universal mapping.
    pub fn missing(&self) -> BTreeSet<String> {
        self.missing.borrow().clone()
    }
}

/// A tagger composed with a projector: every output tag is projected onto
/// the universal tagset, word identity preserved.
pub struct UniversalTagger {
    tagger: PosTagger,
    projector: UniversalPos,
}

impl UniversalTagger {
    pub fn new(tagger: PosTagger, projector: UniversalPos) -> Self {
        Self { tagger, projector }
    }

    pub fn tag(&self, tokens: &[String]) -> Vec<(String, Option<String>)> {
        self.tagger
            .tag(tokens)
            .into_iter()
            .map(|(word, tag)| {
                let universal = tag.and_then(|t| self.projector.project(&t));
                (word, universal)
            })
            .collect()
    }

    /// Lazily tags each sentence; consumed once, sentence at a time.
    pub fn tag_sents<'a>(
        &'a self,
        sents: &'a [Vec<String>],
    ) -> impl Iterator<Item = Vec<(String, Option<String>)>> + 'a {
        sents.iter().map(move |tokens| self.tag(tokens))
    }

    pub fn tagger(&self) -> &PosTagger {
        &self.tagger
    }

    pub fn projector(&self) -> &UniversalPos {
        &self.projector
    }
}

/// A dataset composed with a projector: every gold tag is projected onto
/// the universal tagset, so both sides of an evaluation share a vocabulary.
pub struct UniversalCorpus<C> {
    corpus: C,
    projector: UniversalPos,
}

impl<C> UniversalCorpus<C>
where
    C: Corpus,
{
    pub fn new(corpus: C, projector: UniversalPos) -> Self {
        Self { corpus, projector }
    }

    pub fn corpus(&self) -> &C {
        &self.corpus
    }

    pub fn projector(&self) -> &UniversalPos {
        &self.projector
    }
}

impl<C> Corpus for UniversalCorpus<C>
where
    C: Corpus,
{
    fn id(&self) -> &str {
        self.corpus.id()
    }

    fn tagset(&self) -> &str {
        "universal"
    }

    fn tagged_sents(&self) -> Result<SentenceIter<'_>> {
        let inner = self.corpus.tagged_sents()?;
        Ok(Box::new(inner.map(move |sent| {
            let sent = sent?;
            let pairs = sent
                .into_pairs()
                .into_iter()
                .map(|(word, tag)| {
                    let universal = tag.and_then(|t| self.projector.project(&t));
                    (word, universal)
                })
                .collect();
            Ok(TaggedSentence::from_pairs(pairs))
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::MemoryCorpus;

    const TOY_MAP: &str = "\
# toy mapping
d\tDET
n\tNOUN
v    VERB
";

    fn projector() -> UniversalPos {
        let mapping = TagsetMapping::from_reader(TOY_MAP.as_bytes()).unwrap();
        UniversalPos::new("es-toy", mapping)
    }

    #[test]
    fn test_mapping_parses_fields_and_comments() {
        let mapping = TagsetMapping::from_reader(TOY_MAP.as_bytes()).unwrap();

        assert_eq!(3, mapping.len());
        assert_eq!(Some("DET"), mapping.get("d"));
        assert_eq!(Some("VERB"), mapping.get("v"));
        assert_eq!(None, mapping.get("x"));
    }

    #[test]
    fn test_mapping_rejects_malformed_line() {
        let r = TagsetMapping::from_reader("d DET extra\n".as_bytes());

        assert!(matches!(r, Err(EtiquetaError::InvalidArgument(_))));
    }

    #[test]
    fn test_project_is_case_insensitive() {
        let p = projector();

        assert_eq!(Some("DET".to_string()), p.project("d"));
        assert_eq!(Some("DET".to_string()), p.project("D"));
    }

    #[test]
    fn test_project_records_missing_and_returns_none() {
        let p = projector();

        assert_eq!(None, p.project("zz9"));
        assert_eq!(None, p.project("zz9"));
        let missing = p.missing();
        assert_eq!(1, missing.len());
        assert!(missing.contains("zz9"));
    }

    #[test]
    fn test_universal_corpus_projects_gold_tags() {
        let sents = vec![TaggedSentence::from_tagged("la/D casa/N sol/X").unwrap()];
        let corpus = MemoryCorpus::new("toy", "es-toy", sents);
        let projected = UniversalCorpus::new(corpus, projector());

        let collected: Vec<TaggedSentence> = projected
            .tagged_sents()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            &[
                ("la".to_string(), Some("DET".to_string())),
                ("casa".to_string(), Some("NOUN".to_string())),
                ("sol".to_string(), None),
            ],
            collected[0].pairs()
        );
        assert!(projected.projector().missing().contains("X"));
        assert_eq!("universal", projected.tagset());
    }
}
