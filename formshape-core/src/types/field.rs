use super::Erased;
use crate::Shape;

/// Common fields for struct-like types
#[derive(Clone, Copy, Debug)]
pub struct StructDef {
    /// all fields, in declaration order. Skipped fields are not listed.
    pub fields: &'static [Field],
}

impl StructDef {
    /// Const ctor.
    pub const fn new(fields: &'static [Field]) -> Self {
        Self { fields }
    }

    /// Finds a field by its effective name.
    ///
    /// An exact match wins; otherwise the first field whose name matches
    /// ignoring case is returned.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.name == name)
            .or_else(|| {
                self.fields.iter().position(|f| {
                    f.name
                        .chars()
                        .flat_map(char::to_lowercase)
                        .eq(name.chars().flat_map(char::to_lowercase))
                })
            })
    }
}

/// Borrow a field mutably out of its (erased) parent struct. `None` if the
/// parent is not of the expected type.
pub type FieldGetMutFn = fn(parent: &mut Erased) -> Option<&mut Erased>;

/// Describes a field in a struct
#[derive(Clone, Copy)]
pub struct Field {
    /// key for the struct field, after `#[form(rename = "...")]` is applied
    pub name: &'static str,

    /// shape of the inner type
    ///
    /// the layer of indirection allows for cyclic type definitions
    pub shape: fn() -> &'static Shape,

    /// accessor for the field
    pub get_mut: FieldGetMutFn,
}

impl Field {
    /// Returns the shape of the inner type
    pub fn shape(&self) -> &'static Shape {
        (self.shape)()
    }
}

impl core::fmt::Debug for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("shape", self.shape())
            .finish_non_exhaustive()
    }
}
