use formshape_core::{Field, Shape, StructDef};

use crate::ReflectError;

use super::Poke;

/// Allows mutating the fields of a fully-initialized struct
pub struct PokeStruct<'mem> {
    pub(crate) value: Poke<'mem>,

    /// field list, with names and shapes
    pub(crate) def: StructDef,
}

impl<'mem> PokeStruct<'mem> {
    /// Shape getter
    #[inline(always)]
    pub fn shape(&self) -> &'static Shape {
        self.value.shape()
    }

    /// Gets the struct definition
    pub fn def(&self) -> StructDef {
        self.def
    }

    /// Returns the field at `index`, if any.
    pub fn field(&self, index: usize) -> Option<&'static Field> {
        self.def.fields.get(index)
    }

    /// Returns the index of the field answering to `name`, if any.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.def.field_index(name)
    }

    /// Consumes the struct view and returns a view of the field at `index`.
    pub fn into_field(self, index: usize) -> Result<Poke<'mem>, ReflectError> {
        let shape = self.shape();
        let field = self
            .field(index)
            .ok_or(ReflectError::FieldOutOfBounds { shape, index })?;
        let data = (field.get_mut)(self.value.data)
            .ok_or(ReflectError::InvariantViolation { shape })?;
        Ok(Poke {
            data,
            shape: field.shape(),
        })
    }
}

impl core::fmt::Debug for PokeStruct<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PokeStruct")
            .field("shape", &self.shape())
            .finish_non_exhaustive()
    }
}
