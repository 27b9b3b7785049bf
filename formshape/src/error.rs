use formshape_core::Shape;
use formshape_reflect::ReflectError;
use indexmap::IndexMap;

use crate::ConvertError;

/// A value for one key could not be converted.
#[derive(Debug)]
pub struct ConversionError {
    /// Key from the source map
    pub key: String,

    /// Position within a multi-value key, `None` for single-value fields
    pub index: Option<usize>,

    /// What the converter reported
    pub err: ConvertError,
}

impl core::fmt::Display for ConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.index {
            Some(index) => write!(
                f,
                "error converting value for index {index} of {:?}",
                self.key
            )?,
            None => write!(f, "error converting value for {:?}", self.key)?,
        }
        let detail = self.err.to_string();
        if !detail.is_empty() {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl core::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.err)
    }
}

/// Why a single key failed to decode.
#[derive(Debug)]
pub enum DecodeError {
    /// The key does not lead to a field.
    InvalidPath {
        /// The key, as given
        path: String,
    },

    /// No converter is registered for the field's type, or for the element
    /// type of a list field.
    NoConverter {
        /// The type that needed a converter
        shape: &'static Shape,
    },

    /// A converter rejected a value.
    Conversion(ConversionError),

    /// The key indexes a list of records past the configured limit.
    IndexTooLarge {
        /// The index in the key
        index: usize,
        /// [`crate::DecodeOptions::max_list_len`]
        max: usize,
    },

    /// The destination did not behave the way its shape describes.
    Reflect(ReflectError),
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DecodeError::InvalidPath { path } => write!(f, "invalid path {path:?}"),
            DecodeError::NoConverter { shape } => write!(f, "converter not found for {shape}"),
            DecodeError::Conversion(err) => write!(f, "{err}"),
            DecodeError::IndexTooLarge { index, max } => write!(
                f,
                "index {index} exceeds the maximum list length of {max}"
            ),
            DecodeError::Reflect(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            DecodeError::Conversion(err) => Some(err),
            DecodeError::Reflect(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConversionError> for DecodeError {
    fn from(err: ConversionError) -> Self {
        DecodeError::Conversion(err)
    }
}

impl From<ReflectError> for DecodeError {
    fn from(err: ReflectError) -> Self {
        DecodeError::Reflect(err)
    }
}

/// Every key that failed during one decode, with its error.
///
/// Entries iterate in the order keys were processed, which follows the
/// iteration order of the source.
#[derive(Debug, Default)]
pub struct MultiError {
    errors: IndexMap<String, DecodeError>,
}

impl MultiError {
    /// An empty set of errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the error for `key`, replacing any earlier one.
    pub fn insert(&mut self, key: impl Into<String>, err: DecodeError) {
        self.errors.insert(key.into(), err);
    }

    /// Forgets the error recorded for `key`, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<DecodeError> {
        self.errors.shift_remove(key)
    }

    /// Returns the error recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&DecodeError> {
        self.errors.get(key)
    }

    /// Number of failed keys.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no key failed.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over failed keys and their errors.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DecodeError)> {
        self.errors.iter().map(|(key, err)| (key.as_str(), err))
    }
}

impl<'a> IntoIterator for &'a MultiError {
    type Item = (&'a String, &'a DecodeError);
    type IntoIter = indexmap::map::Iter<'a, String, DecodeError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl core::fmt::Display for MultiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let Some((_, first)) = self.errors.first() else {
            return f.write_str("(0 errors)");
        };
        write!(f, "{first}")?;
        match self.errors.len() {
            1 => Ok(()),
            2 => f.write_str(" (and 1 other error)"),
            n => write!(f, " (and {} other errors)", n - 1),
        }
    }
}

impl core::error::Error for MultiError {}

/// Error returned by [`crate::Decoder::decode`].
#[derive(Debug)]
pub enum Error {
    /// The destination is not a struct, so no key can address it.
    NotAStruct {
        /// Shape of the destination
        shape: &'static Shape,
    },

    /// One or more keys failed; the others were applied.
    Multi(MultiError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::NotAStruct { shape } => {
                write!(f, "destination must be a struct, got {shape}")
            }
            Error::Multi(errors) => write!(f, "{errors}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Error::NotAStruct { .. } => None,
            Error::Multi(errors) => Some(errors),
        }
    }
}

impl From<MultiError> for Error {
    fn from(errors: MultiError) -> Self {
        Error::Multi(errors)
    }
}
