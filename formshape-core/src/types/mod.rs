use core::any::Any;

mod shape;
pub use shape::*;

mod def;
pub use def::*;

mod field;
pub use field::*;

/// A type-erased value. Every vtable in this crate operates on references to it.
pub type Erased = dyn Any;
