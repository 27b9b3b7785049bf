use formshape_core::Shape;

/// Errors that can occur when walking or mutating values through their shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectError {
    /// Attempted an operation that expected a certain kind of value (struct,
    /// list, option...) on a value of another kind.
    WasNotA {
        /// What kind of value was expected
        expected: &'static str,
        /// The actual shape of the value
        actual: &'static Shape,
    },

    /// Tried to get the wrong shape out of a value, e.g. the value is a
    /// `String`, but a `u64` was written to it.
    WrongShape {
        /// The expected shape of the value.
        expected: &'static Shape,
        /// The actual shape of the value.
        actual: &'static Shape,
    },

    /// A field index does not exist on the struct.
    FieldOutOfBounds {
        /// The struct being indexed
        shape: &'static Shape,
        /// The requested field index
        index: usize,
    },

    /// A list index is past the end of the list.
    IndexOutOfBounds {
        /// The list being indexed
        shape: &'static Shape,
        /// The requested item index
        index: usize,
        /// The length of the list
        len: usize,
    },

    /// A vtable refused a value whose shape it claimed to describe.
    InvariantViolation {
        /// The shape whose vtable misbehaved
        shape: &'static Shape,
    },
}

impl core::fmt::Display for ReflectError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ReflectError::WasNotA { expected, actual } => {
                write!(f, "Was not a {expected}: got {actual}")
            }
            ReflectError::WrongShape { expected, actual } => {
                write!(f, "Wrong shape: expected {expected}, but got {actual}")
            }
            ReflectError::FieldOutOfBounds { shape, index } => {
                write!(f, "Field index {index} is out of bounds for {shape}")
            }
            ReflectError::IndexOutOfBounds { shape, index, len } => {
                write!(f, "Index {index} is out of bounds for {shape} of length {len}")
            }
            ReflectError::InvariantViolation { shape } => {
                write!(f, "Invariant violation while operating on {shape}")
            }
        }
    }
}

impl core::error::Error for ReflectError {}
