use formshape_core::{Def, Erased, Shaped};
use formshape_reflect::{Poke, ReflectError};

use crate::path::{PathPart, parse_path};
use crate::{
    ConversionError, ConvertError, ConverterRegistry, DecodeError, DecodeOptions, Error,
    MultiError,
};

/// Decodes string maps into structs.
///
/// A decoder owns a [`ConverterRegistry`], seeded with the built-in
/// converters, and a set of [`DecodeOptions`]. Decoding only borrows it, so
/// one decoder can serve many threads; registering converters needs `&mut`.
///
/// ```
/// use formshape::{Decoder, Shaped};
///
/// #[derive(Debug, Default, PartialEq, Shaped)]
/// struct Login {
///     user: String,
///     remember: bool,
/// }
///
/// let decoder = Decoder::new();
/// let mut login = Login::default();
/// decoder
///     .decode(
///         &mut login,
///         [("user", ["ana".to_string()]), ("remember", ["on".to_string()])],
///     )
///     .unwrap_err();
///
/// // the bad key did not prevent the other one from being applied
/// assert_eq!(login.user, "ana");
/// assert!(!login.remember);
/// ```
#[derive(Debug, Default)]
pub struct Decoder {
    converters: ConverterRegistry,
    options: DecodeOptions,
}

impl Decoder {
    /// A decoder with the built-in converters and default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// A decoder with the built-in converters and the given options.
    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            converters: ConverterRegistry::new(),
            options,
        }
    }

    /// The options this decoder was built with.
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// The converters this decoder consults.
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Registers a converter for `T` that gives up with `None`.
    ///
    /// Replaces any converter already registered for `T`, built-ins included.
    pub fn register_converter<T, F>(&mut self, convert: F)
    where
        T: Shaped,
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        self.converters.register(convert);
    }

    /// Registers a converter for `T` whose error ends up in the
    /// [`ConversionError`] of a failed key.
    ///
    /// Replaces any converter already registered for `T`, built-ins included.
    pub fn register_error_converter<T, E, F>(&mut self, convert: F)
    where
        T: Shaped,
        E: Into<ConvertError>,
        F: Fn(&str) -> Result<T, E> + Send + Sync + 'static,
    {
        self.converters.register_error(convert);
    }

    /// Decodes `src` into `dst`.
    ///
    /// Every key is processed, whatever happened to the ones before it. Keys
    /// that fail are reported together in [`Error::Multi`]; the others are
    /// applied to `dst`. A key that appears more than once is reported by its
    /// last occurrence.
    pub fn decode<T, I, K, V>(&self, dst: &mut T, src: I) -> Result<(), Error>
    where
        T: Shaped,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[String]>,
    {
        self.decode_poke(Poke::new(dst), src)
    }

    /// Like [`Decoder::decode`], for a destination that is already behind a
    /// [`Poke`].
    pub fn decode_poke<I, K, V>(&self, mut dst: Poke<'_>, src: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[String]>,
    {
        let shape = dst.shape();
        if !dst.is_struct() {
            return Err(Error::NotAStruct { shape });
        }

        let mut errors = MultiError::new();
        for (key, values) in src {
            let key = key.as_ref();
            match self.decode_key(dst.reborrow(), key, values.as_ref()) {
                Ok(()) => {
                    errors.remove(key);
                }
                Err(DecodeError::InvalidPath { .. }) if self.options.ignore_unknown_keys => {
                    trace!("ignoring unknown key {:?} in {}", key, shape);
                }
                Err(err) => {
                    debug!("key {:?} failed: {}", key, err);
                    errors.insert(key, err);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::Multi(errors))
        }
    }

    fn decode_key(&self, root: Poke<'_>, key: &str, values: &[String]) -> Result<(), DecodeError> {
        let parts = parse_path(key, root.shape())?;
        let target = self.locate(root, key, &parts)?;
        trace!("key {:?} resolved to a {}", key, target.shape());
        self.assign(target, key, values)
    }

    /// Walks `parts` from `root`, allocating absent options and growing lists
    /// of structs on the way, and returns the field they end at.
    fn locate<'mem>(
        &self,
        root: Poke<'mem>,
        key: &str,
        parts: &[PathPart],
    ) -> Result<Poke<'mem>, DecodeError> {
        let mut poke = root;
        for (i, part) in parts.iter().enumerate() {
            for &field in &part.fields {
                poke = poke.into_innermost()?.into_struct()?.into_field(field)?;
            }
            poke = poke.into_innermost()?;

            if i + 1 == parts.len() {
                break;
            }
            let Some(index) = part.index else {
                return Err(DecodeError::InvalidPath {
                    path: key.to_string(),
                });
            };
            let max = self.options.max_list_len;
            if index >= max {
                return Err(DecodeError::IndexTooLarge { index, max });
            }
            let mut list = poke.into_list()?;
            list.grow(index + 1)?;
            poke = list.into_item(index)?;
        }
        Ok(poke)
    }

    /// Converts `values` and stores them in `target`.
    fn assign(&self, mut target: Poke<'_>, key: &str, values: &[String]) -> Result<(), DecodeError> {
        let shape = target.shape();

        if self.converters.contains(shape) || !target.is_list() {
            let convert = self
                .converters
                .get_for(shape)
                .ok_or(DecodeError::NoConverter { shape })?;
            let Some(raw) = values.first() else {
                trace!("no value for {:?}, leaving it untouched", key);
                return Ok(());
            };
            let value = convert(raw.as_str()).map_err(|err| ConversionError {
                key: key.to_string(),
                index: None,
                err,
            })?;
            target.set_boxed(value)?;
            return Ok(());
        }

        let mut list = target.into_list()?;
        let elem = list.def().t;
        let (item, wrap) = match elem.def {
            Def::Option(def) => (def.t, Some(def.vtable.wrap)),
            Def::Pointer(def) => (def.pointee, Some(def.vtable.wrap)),
            _ => (elem, None),
        };
        let convert = self
            .converters
            .get_for(item)
            .ok_or(DecodeError::NoConverter { shape: item })?;

        let mut items: Vec<Option<Box<Erased>>> = Vec::with_capacity(values.len());
        for (index, raw) in values.iter().enumerate() {
            if raw.is_empty() {
                items.push(None);
                continue;
            }
            let value = convert(raw.as_str()).map_err(|err| ConversionError {
                key: key.to_string(),
                index: Some(index),
                err,
            })?;
            let value = match wrap {
                Some(wrap) => {
                    wrap(value).map_err(|_| ReflectError::InvariantViolation { shape: elem })?
                }
                None => value,
            };
            items.push(Some(value));
        }
        list.replace_items(items)?;
        Ok(())
    }
}
