#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

// Lets `#[derive(Shaped)]`, which emits `::formshape::` paths, work in this crate's own tests.
extern crate self as formshape;

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

use std::sync::LazyLock;

pub use formshape_core::{
    Def, Erased, Field, ListDef, OptionDef, PointerDef, Shape, Shaped, StructDef, ValueVTable,
};
pub use formshape_macros::Shaped;
pub use formshape_reflect::{Poke, PokeList, PokeStruct, ReflectError};

mod convert;
pub use convert::*;

mod decode;
pub use decode::*;

mod error;
pub use error::*;

mod options;
pub use options::*;

pub mod path;

static DEFAULT_DECODER: LazyLock<Decoder> = LazyLock::new(Decoder::new);

/// Decodes `src` into `dst` with the built-in converters and default options.
///
/// See [`Decoder::decode`].
pub fn decode<T, I, K, V>(dst: &mut T, src: I) -> Result<(), Error>
where
    T: Shaped,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[String]>,
{
    DEFAULT_DECODER.decode(dst, src)
}

/// Builds a `T` from its default value and decodes `src` into it, with the
/// built-in converters and default options.
///
/// Fails if any key fails; use [`decode`] to keep the keys that did apply.
pub fn from_values<T, I, K, V>(src: I) -> Result<T, Error>
where
    T: Shaped,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[String]>,
{
    let mut value = T::default();
    decode(&mut value, src)?;
    Ok(value)
}
