use crate::*;

fn vec_len<T: Shaped>(list: &Erased) -> Option<usize> {
    list.downcast_ref::<Vec<T>>().map(Vec::len)
}

fn vec_grow<T: Shaped>(list: &mut Erased, len: usize) -> bool {
    let Some(list) = list.downcast_mut::<Vec<T>>() else {
        return false;
    };
    if list.len() < len {
        list.resize_with(len, T::default);
    }
    true
}

fn vec_get_mut<T: Shaped>(list: &mut Erased, index: usize) -> Option<&mut Erased> {
    let item = list.downcast_mut::<Vec<T>>()?.get_mut(index)?;
    Some(item as &mut Erased)
}

fn vec_replace_items<T: Shaped>(list: &mut Erased, items: Vec<Option<Box<Erased>>>) -> bool {
    let Some(list) = list.downcast_mut::<Vec<T>>() else {
        return false;
    };
    let mut replacement = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Some(item) => match item.downcast::<T>() {
                Ok(item) => replacement.push(*item),
                Err(_) => return false,
            },
            None => replacement.push(T::default()),
        }
    }
    *list = replacement;
    true
}

impl<T: Shaped> Shaped for Vec<T> {
    const SHAPE: &'static Shape = &const {
        Shape {
            id: Shape::id_of::<Self>(),
            type_identifier: "Vec",
            def: Def::List(ListDef::new(
                &const {
                    ListVTable {
                        len: vec_len::<T>,
                        grow: vec_grow::<T>,
                        get_mut: vec_get_mut::<T>,
                        replace_items: vec_replace_items::<T>,
                    }
                },
                T::SHAPE,
            )),
            vtable: ValueVTable::of::<Self>(),
        }
    };
}
