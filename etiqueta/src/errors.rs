//! Definition of errors.

use std::error::Error;
use std::fmt;

pub type Result<T, E = EtiquetaError> = std::result::Result<T, E>;

#[derive(Debug)]
pub enum EtiquetaError {
    ModelNotFound(ModelNotFoundError),
    InvalidModel(InvalidModelError),
    InsufficientData(InsufficientDataError),
    Alignment(AlignmentError),
    InvalidArgument(InvalidArgumentError),
    DecodeError(bincode::error::DecodeError),
    EncodeError(bincode::error::EncodeError),
    IOError(std::io::Error),
}

impl EtiquetaError {
    pub(crate) fn model_not_found<S>(id: S, use_mwe: bool, order: usize) -> Self
    where
        S: Into<String>,
    {
        Self::ModelNotFound(ModelNotFoundError {
            id: id.into(),
            use_mwe,
            order,
        })
    }

    pub(crate) fn invalid_model<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidModel(InvalidModelError { msg: msg.into() })
    }

    pub(crate) fn insufficient_data<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InsufficientData(InsufficientDataError { msg: msg.into() })
    }

    pub(crate) fn alignment<S, T>(position: usize, expected: S, found: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Self::Alignment(AlignmentError {
            position,
            expected: expected.into(),
            found: found.into(),
        })
    }

    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }
}

impl fmt::Display for EtiquetaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ModelNotFound(e) => e.fmt(f),
            Self::InvalidModel(e) => e.fmt(f),
            Self::InsufficientData(e) => e.fmt(f),
            Self::Alignment(e) => e.fmt(f),
            Self::InvalidArgument(e) => e.fmt(f),
            Self::DecodeError(e) => e.fmt(f),
            Self::EncodeError(e) => e.fmt(f),
            Self::IOError(e) => e.fmt(f),
        }
    }
}

impl Error for EtiquetaError {}

/// Error used when a persisted model artifact does not exist.
#[derive(Debug)]
pub struct ModelNotFoundError {
    /// Corpus identifier of the requested model.
    pub(crate) id: String,

    /// Whether the requested model keeps multi-word expressions.
    pub(crate) use_mwe: bool,

    /// The n-gram order of the requested model.
    pub(crate) order: usize,
}

impl fmt::Display for ModelNotFoundError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ModelNotFoundError: no model artifact for id={:?} mwe={} order={}",
            self.id, self.use_mwe, self.order
        )
    }
}

impl Error for ModelNotFoundError {}

/// Error used when a model artifact is inconsistent with its key.
#[derive(Debug)]
pub struct InvalidModelError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidModelError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidModelError: {}", self.msg)
    }
}

impl Error for InvalidModelError {}

/// Error used when the training input is empty or degenerate.
#[derive(Debug)]
pub struct InsufficientDataError {
    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InsufficientDataError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InsufficientDataError: {}", self.msg)
    }
}

impl Error for InsufficientDataError {}

/// Error used when gold and predicted token sequences diverge during
/// evaluation.
#[derive(Debug)]
pub struct AlignmentError {
    /// Position of the first diverging token.
    pub(crate) position: usize,

    /// The gold token at that position.
    pub(crate) expected: String,

    /// The predicted token at that position.
    pub(crate) found: String,
}

impl fmt::Display for AlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "AlignmentError: token mismatch at position {}: expected {:?}, found {:?}",
            self.position, self.expected, self.found
        )
    }
}

impl Error for AlignmentError {}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl Error for InvalidArgumentError {}

impl From<bincode::error::DecodeError> for EtiquetaError {
    fn from(error: bincode::error::DecodeError) -> Self {
        Self::DecodeError(error)
    }
}

impl From<bincode::error::EncodeError> for EtiquetaError {
    fn from(error: bincode::error::EncodeError) -> Self {
        Self::EncodeError(error)
    }
}

impl From<std::io::Error> for EtiquetaError {
    fn from(error: std::io::Error) -> Self {
        Self::IOError(error)
    }
}
