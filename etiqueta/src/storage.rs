use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::errors::{EtiquetaError, Result};
use crate::model::ModelData;

/// Directory-backed store of persisted model artifacts.
///
/// One artifact per `(id, use_mwe, order)` key; an artifact is only ever read
/// back under the key it was saved with. Artifacts are zstd-compressed
/// bincode.
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new<P>(dir: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { dir: dir.into() }
    }

    /// File name of the artifact for a key, e.g. `cess_esp_nomwe_2grams.model`.
    pub fn model_filename(id: &str, use_mwe: bool, order: usize) -> String {
        let mwe = if use_mwe { "mwe" } else { "nomwe" };
        format!("{id}_{mwe}_{order}grams.model")
    }

    /// Full path of the artifact for a key.
    pub fn model_path(&self, id: &str, use_mwe: bool, order: usize) -> PathBuf {
        self.dir.join(Self::model_filename(id, use_mwe, order))
    }

    /// Loads one order's statistics.
    ///
    /// # Errors
    ///
    /// A missing artifact returns the `ModelNotFound` variant so callers can
    /// fall back to training; any other read or decode failure is returned
    /// as is. An artifact whose recorded order disagrees with the key is
    /// rejected.
    pub fn load(&self, id: &str, use_mwe: bool, order: usize) -> Result<ModelData> {
        let path = self.model_path(id, use_mwe, order);
        debug!("load model (ngram={}) from {:?}", order, path);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(EtiquetaError::model_not_found(id, use_mwe, order));
            }
            Err(e) => return Err(e.into()),
        };
        let mut rdr = zstd::Decoder::new(file)?;
        let data = ModelData::read(&mut rdr)?;
        if data.order() as usize != order {
            return Err(EtiquetaError::invalid_model(format!(
                "artifact {:?} records order {}, expected {}",
                path,
                data.order(),
                order
            )));
        }
        Ok(data)
    }

    /// Saves one order's statistics, overwriting any artifact at the same
    /// key.
    ///
    /// The artifact is written to a temporary file in the store directory
    /// and renamed over the final path, so an aborted write never leaves a
    /// torn artifact visible to later loads.
    ///
    /// # Errors
    ///
    /// When the directory cannot be created or the write fails, the error is
    /// returned as is and the temporary file is removed.
    pub fn save(&self, id: &str, use_mwe: bool, order: usize, data: &ModelData) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.model_path(id, use_mwe, order);
        let tmp = path.with_extension("model.tmp");
        debug!("save model (ngram={}) to {:?}", order, path);
        if let Err(e) = Self::write_artifact(&tmp, data) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Whether an artifact exists for the key.
    pub fn contains(&self, id: &str, use_mwe: bool, order: usize) -> bool {
        self.model_path(id, use_mwe, order).is_file()
    }

    fn write_artifact(path: &Path, data: &ModelData) -> Result<()> {
        let mut wtr = zstd::Encoder::new(File::create(path)?, 19)?;
        data.write(&mut wtr)?;
        wtr.finish()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ngram::NgramModel;
    use crate::sentence::TaggedSentence;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "etiqueta-storage-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn train_unigram(lines: &[&str]) -> NgramModel {
        let sents: Vec<TaggedSentence> = lines
            .iter()
            .map(|l| TaggedSentence::from_tagged(l).unwrap())
            .collect();
        NgramModel::train(1, &sents, None).unwrap()
    }

    #[test]
    fn test_store_load_missing_artifact() {
        let store = ModelStore::new(scratch_dir("missing"));

        let r = store.load("cess_esp", true, 1);
        assert!(matches!(r, Err(EtiquetaError::ModelNotFound(_))));
    }

    #[test]
    fn test_store_save_load_round_trip() {
        let dir = scratch_dir("round-trip");
        let store = ModelStore::new(dir.clone());
        let model = train_unigram(&["la/D casa/N", "el/D perro/N"]);
        let data = model.to_data();

        store.save("cess_esp", true, 1, &data).unwrap();
        assert!(store.contains("cess_esp", true, 1));
        let loaded = store.load("cess_esp", true, 1).unwrap();
        assert_eq!(data, loaded);

        let reloaded = NgramModel::from_data(loaded, None).unwrap();
        let input = vec!["la".to_string(), "gato".to_string()];
        assert_eq!(model.tag(&input), reloaded.tag(&input));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_store_save_overwrites() {
        let dir = scratch_dir("overwrite");
        let store = ModelStore::new(dir.clone());

        let first = train_unigram(&["x/B"]).to_data();
        let second = train_unigram(&["x/A"]).to_data();
        store.save("toy", false, 1, &first).unwrap();
        store.save("toy", false, 1, &second).unwrap();

        assert_eq!(second, store.load("toy", false, 1).unwrap());

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_store_keys_do_not_collide() {
        assert_ne!(
            ModelStore::model_filename("cess_esp", true, 1),
            ModelStore::model_filename("cess_esp", false, 1)
        );
        assert_ne!(
            ModelStore::model_filename("cess_esp", true, 1),
            ModelStore::model_filename("cess_esp", true, 2)
        );
    }
}
