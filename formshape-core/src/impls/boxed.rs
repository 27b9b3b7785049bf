use crate::*;

fn box_deref_mut<T: Shaped>(pointer: &mut Erased) -> Option<&mut Erased> {
    let pointer = pointer.downcast_mut::<Box<T>>()?;
    Some(&mut **pointer as &mut Erased)
}

fn box_wrap<T: Shaped>(value: Box<Erased>) -> Result<Box<Erased>, Box<Erased>> {
    let value = value.downcast::<T>()?;
    let pointer: Box<Erased> = Box::new(value);
    Ok(pointer)
}

impl<T: Shaped> Shaped for Box<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: Shape::id_of::<Self>(),
            type_identifier: "Box",
            def: Def::Pointer(PointerDef::new(
                &const {
                    PointerVTable {
                        deref_mut: box_deref_mut::<T>,
                        wrap: box_wrap::<T>,
                    }
                },
                T::SHAPE,
            )),
            vtable: ValueVTable::of::<Self>(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_boxes_the_pointee() {
        let Def::Pointer(def) = <Box<i64>>::SHAPE.def else {
            panic!("expected a pointer def");
        };
        let wrapped = (def.vtable.wrap)(Box::new(-4i64)).unwrap();
        let wrapped = wrapped.downcast::<Box<i64>>().unwrap();
        assert_eq!(**wrapped, -4);

        assert!((def.vtable.wrap)(Box::new("nope")).is_err());
    }
}
