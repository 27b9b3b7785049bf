use formshape_core::{Erased, ListDef, Shape};

use crate::ReflectError;

use super::Poke;

/// Allows growing, indexing and replacing a list
pub struct PokeList<'mem> {
    pub(crate) value: Poke<'mem>,

    pub(crate) def: ListDef,
}

impl<'mem> PokeList<'mem> {
    /// Shape getter
    #[inline(always)]
    pub fn shape(&self) -> &'static Shape {
        self.value.shape()
    }

    /// Gets the def for that list
    #[inline(always)]
    pub fn def(&self) -> &ListDef {
        &self.def
    }

    /// Number of items currently in the list.
    pub fn len(&self) -> Result<usize, ReflectError> {
        (self.def.vtable.len)(self.value.data).ok_or(ReflectError::InvariantViolation {
            shape: self.shape(),
        })
    }

    /// Returns true if the list has no items.
    pub fn is_empty(&self) -> Result<bool, ReflectError> {
        Ok(self.len()? == 0)
    }

    /// Grows the list to at least `len` items. Existing items are kept in
    /// place, new ones are default values. Never shrinks.
    pub fn grow(&mut self, len: usize) -> Result<(), ReflectError> {
        let shape = self.shape();
        let before = self.len()?;
        if before >= len {
            return Ok(());
        }
        trace!("growing {} from {} to {} items", shape, before, len);
        if (self.def.vtable.grow)(self.value.data, len) {
            Ok(())
        } else {
            Err(ReflectError::InvariantViolation { shape })
        }
    }

    /// Consumes the list view and returns a view of the item at `index`.
    pub fn into_item(self, index: usize) -> Result<Poke<'mem>, ReflectError> {
        let shape = self.shape();
        let len = self.len()?;
        let data = (self.def.vtable.get_mut)(self.value.data, index)
            .ok_or(ReflectError::IndexOutOfBounds { shape, index, len })?;
        Ok(Poke {
            data,
            shape: self.def.t,
        })
    }

    /// Replaces the whole list with `items`, in order. `None` slots become
    /// default values. On failure the list is left untouched.
    pub fn replace_items(&mut self, items: Vec<Option<Box<Erased>>>) -> Result<(), ReflectError> {
        if (self.def.vtable.replace_items)(self.value.data, items) {
            Ok(())
        } else {
            Err(ReflectError::InvariantViolation {
                shape: self.shape(),
            })
        }
    }
}

impl core::fmt::Debug for PokeList<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PokeList")
            .field("shape", &self.shape())
            .finish_non_exhaustive()
    }
}
