use core::fmt;

use typeid::ConstTypeId;

use super::{Def, Erased, StructDef};

/// Schema for reflection of a type: its identity, how it is composed, and
/// the operations that are valid on an erased value of it.
#[derive(Clone, Copy)]
pub struct Shape {
    /// Unique type identifier, provided by the compiler.
    pub id: ConstTypeId,

    /// Short name of the type, without generic parameters (`Vec`, `u8`, `Person`).
    pub type_identifier: &'static str,

    /// What this type is made of: a scalar, a struct, a list, an option...
    pub def: Def,

    /// Operations common to every shape.
    pub vtable: ValueVTable,
}

/// Replaces the value behind an erased reference with a boxed value of the
/// same type. Hands the box back if its type does not match.
pub type ReplaceFn = fn(target: &mut Erased, value: Box<Erased>) -> Result<(), Box<Erased>>;

/// Operations available on any shape.
#[derive(Clone, Copy)]
pub struct ValueVTable {
    /// Overwrite a value in place
    pub replace: ReplaceFn,
}

impl ValueVTable {
    /// Builds the vtable for a sized type.
    pub const fn of<T: 'static>() -> Self {
        Self {
            replace: replace_erased::<T>,
        }
    }
}

fn replace_erased<T: 'static>(target: &mut Erased, value: Box<Erased>) -> Result<(), Box<Erased>> {
    let Some(target) = target.downcast_mut::<T>() else {
        return Err(value);
    };
    *target = *value.downcast::<T>()?;
    Ok(())
}

impl Shape {
    /// Returns the `ConstTypeId` of `T`, for use in `SHAPE` constants.
    pub const fn id_of<T: ?Sized>() -> ConstTypeId {
        ConstTypeId::of::<T>()
    }

    /// Returns the struct definition if this shape is a struct.
    pub const fn struct_def(&self) -> Option<&StructDef> {
        match &self.def {
            Def::Struct(def) => Some(def),
            _ => None,
        }
    }

    /// Returns true if this shape is a single level of indirection
    /// (`Option<T>` or `Box<T>`).
    pub const fn is_indirection(&self) -> bool {
        matches!(self.def, Def::Option(_) | Def::Pointer(_))
    }

    /// Returns the shape reached by stripping one level of indirection, if any.
    pub const fn pointee(&self) -> Option<&'static Shape> {
        match self.def {
            Def::Option(def) => Some(def.t),
            Def::Pointer(def) => Some(def.pointee),
            _ => None,
        }
    }

    /// Strips every level of indirection: `Option<Box<T>>` gives `T`.
    pub fn innermost(&'static self) -> &'static Shape {
        let mut shape = self;
        while let Some(inner) = shape.pointee() {
            shape = inner;
        }
        shape
    }
}

impl PartialEq for Shape {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Shape {}

impl core::hash::Hash for Shape {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.def {
            Def::List(def) => write!(f, "{}<{}>", self.type_identifier, def.t),
            Def::Option(def) => write!(f, "{}<{}>", self.type_identifier, def.t),
            Def::Pointer(def) => write!(f, "{}<{}>", self.type_identifier, def.pointee),
            Def::Scalar | Def::Struct(_) => f.write_str(self.type_identifier),
        }
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({self})")
    }
}
