use crate::*;

fn option_is_some<T: Shaped>(option: &Erased) -> Option<bool> {
    option.downcast_ref::<Option<T>>().map(Option::is_some)
}

fn option_get_or_insert_default<T: Shaped>(option: &mut Erased) -> Option<&mut Erased> {
    let option = option.downcast_mut::<Option<T>>()?;
    Some(option.get_or_insert_with(T::default) as &mut Erased)
}

fn option_wrap<T: Shaped>(value: Box<Erased>) -> Result<Box<Erased>, Box<Erased>> {
    let value = value.downcast::<T>()?;
    let option: Box<Erased> = Box::new(Some(*value));
    Ok(option)
}

impl<T: Shaped> Shaped for Option<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: Shape::id_of::<Self>(),
            type_identifier: "Option",
            def: Def::Option(OptionDef::new(
                &const {
                    OptionVTable {
                        is_some: option_is_some::<T>,
                        get_or_insert_default: option_get_or_insert_default::<T>,
                        wrap: option_wrap::<T>,
                    }
                },
                T::SHAPE,
            )),
            vtable: ValueVTable::of::<Self>(),
        }
    };
}
