//! Dotted keys (`"addresses.1.city"`) resolved against a struct's shape.

use formshape_core::{Def, Shape};

/// One step of a resolved key.
///
/// `fields` descends through nested structs, one field index per struct.
/// `index` is set when the last of those fields is a list of structs: the key
/// continues inside the element at that position, with the next part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPart {
    /// Field indices, outermost first
    pub fields: Vec<usize>,

    /// Element to descend into, for lists of structs
    pub index: Option<usize>,
}

/// A key that does not lead to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPath {
    /// The key, as given
    pub path: String,
}

impl core::fmt::Display for InvalidPath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid path {:?}", self.path)
    }
}

impl core::error::Error for InvalidPath {}

impl From<InvalidPath> for crate::DecodeError {
    fn from(err: InvalidPath) -> Self {
        crate::DecodeError::InvalidPath { path: err.path }
    }
}

/// Returns the struct elements of a list of structs, through any `Option` or
/// `Box` around either the list or its elements.
fn struct_elements(shape: &'static Shape) -> Option<&'static Shape> {
    let Def::List(list) = shape.innermost().def else {
        return None;
    };
    let elem = list.t.innermost();
    elem.struct_def().map(|_| elem)
}

/// Resolves `path` against `shape`, which must be a struct (possibly behind
/// `Option`/`Box`).
///
/// Segments are separated by `.` and name fields, exactly or ignoring case.
/// A field holding a list of structs must be followed by a decimal index.
/// The returned list always ends with a part whose `index` is `None`.
pub fn parse_path(path: &str, shape: &'static Shape) -> Result<Vec<PathPart>, InvalidPath> {
    let invalid = || InvalidPath {
        path: path.to_string(),
    };

    let mut parts = Vec::new();
    let mut fields = Vec::new();
    let mut current = shape;
    let mut segments = path.split('.');

    while let Some(segment) = segments.next() {
        let def = current.innermost().struct_def().ok_or_else(invalid)?;
        let index = def.field_index(segment).ok_or_else(invalid)?;
        fields.push(index);
        let field_shape = def.fields[index].shape();

        match struct_elements(field_shape) {
            Some(elem) => {
                let position = segments
                    .next()
                    .and_then(|s| s.parse::<usize>().ok())
                    .ok_or_else(invalid)?;
                parts.push(PathPart {
                    fields: core::mem::take(&mut fields),
                    index: Some(position),
                });
                current = elem;
            }
            None => current = field_shape,
        }
    }

    parts.push(PathPart {
        fields,
        index: None,
    });
    trace!("resolved {:?} to {:?}", path, parts);
    Ok(parts)
}
