use crate::*;

macro_rules! impl_shaped_for_scalar {
    ($($ty:ty => $ident:literal),* $(,)?) => {
        $(
            impl Shaped for $ty {
                const SHAPE: &'static Shape = &const {
                    Shape {
                        id: Shape::id_of::<Self>(),
                        type_identifier: $ident,
                        def: Def::Scalar,
                        vtable: ValueVTable::of::<Self>(),
                    }
                };
            }
        )*
    };
}

impl_shaped_for_scalar! {
    bool => "bool",
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    i128 => "i128",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    u128 => "u128",
    usize => "usize",
    f32 => "f32",
    f64 => "f64",
    char => "char",
    String => "String",
}
