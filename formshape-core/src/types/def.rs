use super::{Erased, StructDef};
use crate::Shape;

/// The semantic definition of a shape: is it more like a scalar, a struct, a list?
#[derive(Clone, Copy, Debug)]
pub enum Def {
    /// Scalar, not composed of other shapes. Values of these types are
    /// produced by converters.
    ///
    /// e.g. `u32`, `String`, `bool`, or a user enum
    Scalar,

    /// Struct with named fields
    Struct(StructDef),

    /// Ordered list of homogeneous values, variable size
    ///
    /// e.g. `Vec<T>`
    List(ListDef),

    /// Option
    ///
    /// e.g. `Option<T>`
    Option(OptionDef),

    /// Owning pointer
    ///
    /// e.g. `Box<T>`
    Pointer(PointerDef),
}

//////////////////////////////////////////////////////////////////////
// Lists
//////////////////////////////////////////////////////////////////////

/// Fields for list types
#[derive(Clone, Copy, Debug)]
pub struct ListDef {
    /// vtable for interacting with the list
    pub vtable: &'static ListVTable,

    /// shape of the items in the list
    pub t: &'static Shape,
}

impl ListDef {
    /// Construct a `ListDef` from its vtable and element shape.
    pub const fn new(vtable: &'static ListVTable, t: &'static Shape) -> Self {
        Self { vtable, t }
    }
}

/// Get the number of items in the list. `None` if the value is not this list type.
pub type ListLenFn = fn(list: &Erased) -> Option<usize>;

/// Grow the list to at least `len` items, filling new slots with the
/// element's default. Never shrinks. Returns false on a type mismatch.
pub type ListGrowFn = fn(list: &mut Erased, len: usize) -> bool;

/// Get a mutable reference to the item at `index`.
pub type ListGetMutFn = fn(list: &mut Erased, index: usize) -> Option<&mut Erased>;

/// Replace the whole list with the given items, in order. `None` slots
/// become the element's default. On a type mismatch the list is left
/// untouched and false is returned.
pub type ListReplaceItemsFn = fn(list: &mut Erased, items: Vec<Option<Box<Erased>>>) -> bool;

/// Virtual table for a list-like type (like `Vec<T>`)
#[derive(Clone, Copy)]
pub struct ListVTable {
    /// cf. [`ListLenFn`]
    pub len: ListLenFn,

    /// cf. [`ListGrowFn`]
    pub grow: ListGrowFn,

    /// cf. [`ListGetMutFn`]
    pub get_mut: ListGetMutFn,

    /// cf. [`ListReplaceItemsFn`]
    pub replace_items: ListReplaceItemsFn,
}

impl core::fmt::Debug for ListVTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListVTable").finish_non_exhaustive()
    }
}

//////////////////////////////////////////////////////////////////////
// Options
//////////////////////////////////////////////////////////////////////

/// Describes an Option: a vtable to query and alter its state,
/// and the inner shape (the `T` in `Option<T>`).
#[derive(Clone, Copy, Debug)]
pub struct OptionDef {
    /// vtable for interacting with the option
    pub vtable: &'static OptionVTable,

    /// shape of the inner type of the option
    pub t: &'static Shape,
}

impl OptionDef {
    /// Const ctor.
    pub const fn new(vtable: &'static OptionVTable, t: &'static Shape) -> Self {
        Self { vtable, t }
    }
}

/// Check if an option contains a value
pub type OptionIsSomeFn = fn(option: &Erased) -> Option<bool>;

/// Get the contained value, first setting the option to `Some(T::default())`
/// if it was `None`.
pub type OptionGetOrInsertFn = fn(option: &mut Erased) -> Option<&mut Erased>;

/// Wrap a boxed `T` into a boxed `Option<T>`. Hands the box back on a type mismatch.
pub type OptionWrapFn = fn(value: Box<Erased>) -> Result<Box<Erased>, Box<Erased>>;

/// Virtual table for `Option<T>`
#[derive(Clone, Copy)]
pub struct OptionVTable {
    /// cf. [`OptionIsSomeFn`]
    pub is_some: OptionIsSomeFn,

    /// cf. [`OptionGetOrInsertFn`]
    pub get_or_insert_default: OptionGetOrInsertFn,

    /// cf. [`OptionWrapFn`]
    pub wrap: OptionWrapFn,
}

impl core::fmt::Debug for OptionVTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OptionVTable").finish_non_exhaustive()
    }
}

//////////////////////////////////////////////////////////////////////
// Pointers
//////////////////////////////////////////////////////////////////////

/// Describes an owning pointer that always holds a value (`Box<T>`).
#[derive(Clone, Copy, Debug)]
pub struct PointerDef {
    /// vtable for interacting with the pointer
    pub vtable: &'static PointerVTable,

    /// shape of the pointed-to type
    pub pointee: &'static Shape,
}

impl PointerDef {
    /// Const ctor.
    pub const fn new(vtable: &'static PointerVTable, pointee: &'static Shape) -> Self {
        Self { vtable, pointee }
    }
}

/// Borrow the pointee mutably.
pub type PointerDerefMutFn = fn(pointer: &mut Erased) -> Option<&mut Erased>;

/// Wrap a boxed pointee into a boxed pointer. Hands the box back on a type mismatch.
pub type PointerWrapFn = fn(value: Box<Erased>) -> Result<Box<Erased>, Box<Erased>>;

/// Virtual table for owning pointers
#[derive(Clone, Copy)]
pub struct PointerVTable {
    /// cf. [`PointerDerefMutFn`]
    pub deref_mut: PointerDerefMutFn,

    /// cf. [`PointerWrapFn`]
    pub wrap: PointerWrapFn,
}

impl core::fmt::Debug for PointerVTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PointerVTable").finish_non_exhaustive()
    }
}
