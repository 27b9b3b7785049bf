mod value;
pub use value::*;

mod struct_;
pub use struct_::*;

mod list;
pub use list::*;
