//! String-to-value converters, looked up by exact type.

use core::num::{ParseFloatError, ParseIntError};
use core::str::FromStr;
use std::collections::HashMap;

use formshape_core::{Erased, Shape, Shaped};
use typeid::ConstTypeId;

/// Why a converter rejected its input.
#[derive(Debug)]
pub enum ConvertError {
    /// The converter gave up without saying why. Renders as an empty string.
    Invalid,

    /// An integer was malformed or out of range for its width.
    Int(ParseIntError),

    /// An unsigned integer was written with a sign.
    Signed(String),

    /// A float was malformed.
    Float(ParseFloatError),

    /// A float does not fit its width. Only literal infinities may parse
    /// to an infinite value.
    FloatRange(String),

    /// Not one of the accepted boolean spellings.
    Bool(String),

    /// Error returned by a converter registered with
    /// [`ConverterRegistry::register_error`].
    Custom(Box<dyn core::error::Error + Send + Sync>),
}

impl core::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConvertError::Invalid => Ok(()),
            ConvertError::Int(err) => write!(f, "{err}"),
            ConvertError::Signed(input) => write!(f, "unexpected sign in unsigned value {input:?}"),
            ConvertError::Float(err) => write!(f, "{err}"),
            ConvertError::FloatRange(input) => write!(f, "value {input:?} out of range"),
            ConvertError::Bool(input) => write!(f, "invalid boolean {input:?}"),
            ConvertError::Custom(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            ConvertError::Int(err) => Some(err),
            ConvertError::Float(err) => Some(err),
            ConvertError::Custom(err) => Some(&**err),
            ConvertError::Invalid
            | ConvertError::Signed(_)
            | ConvertError::FloatRange(_)
            | ConvertError::Bool(_) => None,
        }
    }
}

/// A converter with its output type erased. The boxed value is always of the
/// type the converter was registered for.
pub type ErasedConverter =
    Box<dyn Fn(&str) -> Result<Box<Erased>, ConvertError> + Send + Sync + 'static>;

/// Maps exact types to the function that builds them from a string.
pub struct ConverterRegistry {
    converters: HashMap<ConstTypeId, ErasedConverter>,
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterRegistry {
    /// A registry seeded with converters for `bool`, the integer and float
    /// primitives and `String`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    /// A registry with no converters at all.
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    fn register_builtins(&mut self) {
        self.register_from_str::<i8, ParseIntError>();
        self.register_from_str::<i16, ParseIntError>();
        self.register_from_str::<i32, ParseIntError>();
        self.register_from_str::<i64, ParseIntError>();
        self.register_from_str::<i128, ParseIntError>();
        self.register_from_str::<isize, ParseIntError>();
        self.register_error::<u8, _, _>(parse_unsigned);
        self.register_error::<u16, _, _>(parse_unsigned);
        self.register_error::<u32, _, _>(parse_unsigned);
        self.register_error::<u64, _, _>(parse_unsigned);
        self.register_error::<u128, _, _>(parse_unsigned);
        self.register_error::<usize, _, _>(parse_unsigned);
        self.register_error::<f32, _, _>(|s| parse_float(s, f32::is_infinite));
        self.register_error::<f64, _, _>(|s| parse_float(s, f64::is_infinite));
        self.register_error::<bool, _, _>(parse_bool);
        self.register_error::<String, ConvertError, _>(|s| Ok(s.to_owned()));
    }

    /// Binds a converter that either produces a `T` or gives up.
    ///
    /// Registering a type again replaces its converter.
    pub fn register<T, F>(&mut self, convert: F)
    where
        T: Shaped,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.insert::<T>(Box::new(move |s: &str| match convert(s) {
            Some(value) => {
                let value: Box<Erased> = Box::new(value);
                Ok(value)
            }
            None => Err(ConvertError::Invalid),
        }));
    }

    /// Binds a converter whose error explains the failure.
    ///
    /// Registering a type again replaces its converter.
    pub fn register_error<T, E, F>(&mut self, convert: F)
    where
        T: Shaped,
        E: Into<ConvertError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.insert::<T>(Box::new(move |s: &str| match convert(s) {
            Ok(value) => {
                let value: Box<Erased> = Box::new(value);
                Ok(value)
            }
            Err(err) => Err(err.into()),
        }));
    }

    fn register_from_str<T, E>(&mut self)
    where
        T: Shaped + FromStr<Err = E>,
        E: Into<ConvertError>,
    {
        self.register_error::<T, E, _>(|s| s.parse::<T>());
    }

    fn insert<T: Shaped>(&mut self, converter: ErasedConverter) {
        self.converters.insert(T::SHAPE.id, converter);
    }

    /// Returns the converter registered for the type with this id.
    pub fn get(&self, id: ConstTypeId) -> Option<&ErasedConverter> {
        self.converters.get(&id)
    }

    /// Returns the converter registered for the type described by `shape`.
    pub fn get_for(&self, shape: &Shape) -> Option<&ErasedConverter> {
        self.get(shape.id)
    }

    /// Returns true if a converter is registered for `shape`.
    pub fn contains(&self, shape: &Shape) -> bool {
        self.converters.contains_key(&shape.id)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.converters.len()
    }

    /// Returns true if no converter is registered.
    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }
}

impl core::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("len", &self.converters.len())
            .finish_non_exhaustive()
    }
}

impl From<ParseIntError> for ConvertError {
    fn from(err: ParseIntError) -> Self {
        ConvertError::Int(err)
    }
}

impl From<ParseFloatError> for ConvertError {
    fn from(err: ParseFloatError) -> Self {
        ConvertError::Float(err)
    }
}

impl From<String> for ConvertError {
    fn from(message: String) -> Self {
        ConvertError::Custom(message.into())
    }
}

impl From<&str> for ConvertError {
    fn from(message: &str) -> Self {
        ConvertError::Custom(message.into())
    }
}

impl From<Box<dyn core::error::Error + Send + Sync>> for ConvertError {
    fn from(err: Box<dyn core::error::Error + Send + Sync>) -> Self {
        ConvertError::Custom(err)
    }
}

fn parse_unsigned<T: FromStr<Err = ParseIntError>>(s: &str) -> Result<T, ConvertError> {
    if s.starts_with('+') {
        return Err(ConvertError::Signed(s.to_owned()));
    }
    Ok(s.parse()?)
}

/// Overflow parses to an infinity; that is rejected unless the input
/// spells one (`inf`, `-Infinity`, ...).
fn parse_float<T>(s: &str, is_infinite: fn(T) -> bool) -> Result<T, ConvertError>
where
    T: FromStr<Err = ParseFloatError> + Copy,
{
    let value: T = s.parse()?;
    if is_infinite(value) {
        let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
        if !unsigned.eq_ignore_ascii_case("inf") && !unsigned.eq_ignore_ascii_case("infinity") {
            return Err(ConvertError::FloatRange(s.to_owned()));
        }
    }
    Ok(value)
}

/// `1 t T TRUE true True` and `0 f F FALSE false False`.
fn parse_bool(s: &str) -> Result<bool, ConvertError> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ConvertError::Bool(s.to_owned())),
    }
}
