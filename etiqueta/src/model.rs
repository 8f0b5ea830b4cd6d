use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::errors::Result;
use crate::ngram::NgramContext;

/// Persistable statistics of a single n-gram order.
///
/// One artifact holds one order only; backoff links are reassembled from the
/// lower-order artifacts at load time. Entries are kept sorted by context so
/// the same statistics always encode to the same bytes.
#[derive(Debug, PartialEq, Eq, Encode, Decode)]
pub struct ModelData {
    pub(crate) order: u32,
    pub(crate) entries: Vec<(NgramContext, String)>,
}

impl ModelData {
    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<usize>
    where
        W: Write,
    {
        Ok(bincode::encode_into_std_write(
            self,
            wtr,
            bincode::config::standard(),
        )?)
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Returns
    ///
    /// A model data read from `rdr`.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        Ok(bincode::decode_from_std_read(
            rdr,
            bincode::config::standard(),
        )?)
    }

    /// The n-gram order these statistics belong to.
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Number of context entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
