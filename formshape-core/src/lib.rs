#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]
#![doc = include_str!("../README.md")]

mod types;
pub use types::*;

mod impls;

/// Allows querying the [`Shape`] of a type, which in turn lets the
/// decoder walk and grow values of it through type-erased references.
///
/// Implemented for the primitive scalars, `String`, `Option<T>`, `Box<T>`
/// and `Vec<T>`. Records get it from `#[derive(Shaped)]`.
///
/// The `Default` bound is what "zero value" means here: absent options are
/// filled with `T::default()`, and lists grow with default elements.
pub trait Shaped: Default + 'static {
    /// The shape of this type
    const SHAPE: &'static Shape;
}
