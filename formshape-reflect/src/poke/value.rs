use formshape_core::{Def, Erased, Shape, Shaped};

use crate::ReflectError;

use super::{PokeList, PokeStruct};

/// A mutable view into a value with runtime type information.
///
/// `Poke` borrows a fully initialized value and lets callers walk into it
/// (struct fields, list items, option and box contents) and overwrite parts
/// of it, driven only by its [`Shape`].
///
/// Walking through an absent `Option` fills it with the default value
/// first, so a `Poke` never points at nothing.
///
/// # Example
///
/// ```
/// use formshape_reflect::Poke;
///
/// let mut slot: Option<Box<u32>> = None;
/// let mut poke = Poke::new(&mut slot).into_innermost().unwrap();
/// poke.set(7u32).unwrap();
/// assert_eq!(slot.as_deref(), Some(&7));
/// ```
pub struct Poke<'mem> {
    /// Underlying data (mutable)
    pub(crate) data: &'mem mut Erased,

    /// Shape of the value
    pub(crate) shape: &'static Shape,
}

impl<'mem> Poke<'mem> {
    /// Creates a mutable view over a `T` value.
    pub fn new<T: Shaped>(value: &'mem mut T) -> Self {
        Self {
            data: value,
            shape: T::SHAPE,
        }
    }

    /// Returns the shape of the value.
    #[inline(always)]
    pub const fn shape(&self) -> &'static Shape {
        self.shape
    }

    /// Returns true if this value is a struct.
    #[inline]
    pub const fn is_struct(&self) -> bool {
        matches!(self.shape.def, Def::Struct(_))
    }

    /// Returns true if this value is a list.
    #[inline]
    pub const fn is_list(&self) -> bool {
        matches!(self.shape.def, Def::List(_))
    }

    /// Converts this into a `PokeStruct` if the value is a struct.
    pub fn into_struct(self) -> Result<PokeStruct<'mem>, ReflectError> {
        match self.shape.def {
            Def::Struct(def) => Ok(PokeStruct { value: self, def }),
            _ => Err(ReflectError::WasNotA {
                expected: "struct",
                actual: self.shape,
            }),
        }
    }

    /// Converts this into a `PokeList` if the value is a list.
    pub fn into_list(self) -> Result<PokeList<'mem>, ReflectError> {
        match self.shape.def {
            Def::List(def) => Ok(PokeList { value: self, def }),
            _ => Err(ReflectError::WasNotA {
                expected: "list",
                actual: self.shape,
            }),
        }
    }

    /// Steps through one level of indirection.
    ///
    /// An `Option` that is `None` is first set to `Some(T::default())`; a
    /// `Box` is dereferenced.
    pub fn into_pointee(self) -> Result<Self, ReflectError> {
        let shape = self.shape;
        let (data, pointee) = match shape.def {
            Def::Option(def) => {
                if (def.vtable.is_some)(self.data) == Some(false) {
                    trace!("allocating {} for absent {}", def.t, shape);
                }
                ((def.vtable.get_or_insert_default)(self.data), def.t)
            }
            Def::Pointer(def) => ((def.vtable.deref_mut)(self.data), def.pointee),
            _ => {
                return Err(ReflectError::WasNotA {
                    expected: "option or pointer",
                    actual: shape,
                });
            }
        };
        let data = data.ok_or(ReflectError::InvariantViolation { shape })?;
        Ok(Self {
            data,
            shape: pointee,
        })
    }

    /// Steps through every level of indirection (`Option<Box<T>>` gives `T`),
    /// allocating absent options along the way. A value without indirection
    /// is returned as is.
    pub fn into_innermost(self) -> Result<Self, ReflectError> {
        let mut poke = self;
        while poke.shape.is_indirection() {
            poke = poke.into_pointee()?;
        }
        Ok(poke)
    }

    /// Overwrites the value with a boxed value of the same shape.
    pub fn set_boxed(&mut self, value: Box<Erased>) -> Result<(), ReflectError> {
        (self.shape.vtable.replace)(self.data, value)
            .map_err(|_| ReflectError::InvariantViolation { shape: self.shape })
    }

    /// Overwrites the value with `value`.
    pub fn set<T: Shaped>(&mut self, value: T) -> Result<(), ReflectError> {
        if self.shape != T::SHAPE {
            return Err(ReflectError::WrongShape {
                expected: self.shape,
                actual: T::SHAPE,
            });
        }
        self.set_boxed(Box::new(value))
    }

    /// Borrows the value as `T`, if that is its type.
    pub fn get<T: Shaped>(&self) -> Result<&T, ReflectError> {
        self.data.downcast_ref::<T>().ok_or(ReflectError::WrongShape {
            expected: T::SHAPE,
            actual: self.shape,
        })
    }

    /// Reborrows this view for a shorter lifetime.
    pub fn reborrow(&mut self) -> Poke<'_> {
        Poke {
            data: &mut *self.data,
            shape: self.shape,
        }
    }
}

impl core::fmt::Debug for Poke<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Poke").field("shape", &self.shape).finish()
    }
}
