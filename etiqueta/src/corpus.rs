use std::fs::{self, File};
use std::io::{BufRead, BufReader, Lines};
use std::path::PathBuf;

use log::debug;

use crate::errors::Result;
use crate::sentence::TaggedSentence;

/// A fresh, lazily-produced sentence stream. Each item is fallible because
/// reading and parsing happen on demand.
pub type SentenceIter<'a> = Box<dyn Iterator<Item = Result<TaggedSentence>> + 'a>;

/// A source of tagged sentences for training and evaluation.
///
/// Implementations must hand out a fresh stream on every
/// [`tagged_sents`](Corpus::tagged_sents) call; a single stream is consumed
/// once per pass.
pub trait Corpus {
    /// Stable identifier; part of persisted model cache keys.
    fn id(&self) -> &str;

    /// Name of the native tagset the corpus is annotated with.
    fn tagset(&self) -> &str;

    /// Starts a new pass over the corpus.
    fn tagged_sents(&self) -> Result<SentenceIter<'_>>;
}

/// Line-oriented tagged corpus: one sentence per line, whitespace-separated
/// `word/TAG` pairs, blank lines skipped. Sentences are read lazily, one
/// file after another in the given order.
pub struct TaggedFileCorpus {
    id: String,
    tagset: String,
    paths: Vec<PathBuf>,
}

impl TaggedFileCorpus {
    pub fn new<S, T>(id: S, tagset: T, paths: Vec<PathBuf>) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            id: id.into(),
            tagset: tagset.into(),
            paths,
        }
    }

    /// Collects corpus files from a directory, sorted by name. When
    /// `selector` is given, only file names containing it are kept (the
    /// file-selector filter of the corpus interface).
    ///
    /// # Errors
    ///
    /// When the directory cannot be read, the error is returned as is.
    pub fn from_dir<S, T>(id: S, tagset: T, dir: &std::path::Path, selector: Option<&str>) -> Result<Self>
    where
        S: Into<String>,
        T: Into<String>,
    {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(selector) = selector {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if !name.contains(selector) {
                    continue;
                }
            }
            paths.push(path);
        }
        paths.sort();
        debug!("corpus from {:?}: {} files", dir, paths.len());
        Ok(Self::new(id, tagset, paths))
    }
}

impl Corpus for TaggedFileCorpus {
    fn id(&self) -> &str {
        &self.id
    }

    fn tagset(&self) -> &str {
        &self.tagset
    }

    fn tagged_sents(&self) -> Result<SentenceIter<'_>> {
        Ok(Box::new(FileSentences {
            paths: self.paths.clone().into_iter(),
            lines: None,
        }))
    }
}

struct FileSentences {
    paths: std::vec::IntoIter<PathBuf>,
    lines: Option<Lines<BufReader<File>>>,
}

impl Iterator for FileSentences {
    type Item = Result<TaggedSentence>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(lines) = &mut self.lines {
                match lines.next() {
                    Some(Ok(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        return Some(TaggedSentence::from_tagged(&line));
                    }
                    Some(Err(e)) => return Some(Err(e.into())),
                    None => {
                        self.lines = None;
                        continue;
                    }
                }
            }
            let path = self.paths.next()?;
            match File::open(&path) {
                Ok(file) => self.lines = Some(BufReader::new(file).lines()),
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}

/// In-memory corpus, mainly for tests and small experiments.
pub struct MemoryCorpus {
    id: String,
    tagset: String,
    sents: Vec<TaggedSentence>,
}

impl MemoryCorpus {
    pub fn new<S, T>(id: S, tagset: T, sents: Vec<TaggedSentence>) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            id: id.into(),
            tagset: tagset.into(),
            sents,
        }
    }
}

impl Corpus for MemoryCorpus {
    fn id(&self) -> &str {
        &self.id
    }

    fn tagset(&self) -> &str {
        &self.tagset
    }

    fn tagged_sents(&self) -> Result<SentenceIter<'_>> {
        Ok(Box::new(self.sents.iter().cloned().map(Ok)))
    }
}
