use std::collections::HashMap;

use formshape::{DecodeError, Decoder, Error, MultiError, Shaped};
use formshape_testhelpers::test;

#[derive(Debug, Default, PartialEq, Shaped)]
struct Phone {
    label: String,
    number: String,
}

#[derive(Debug, Default, PartialEq, Shaped)]
struct Address {
    street: String,
    city: String,
    zip: Option<u32>,
}

#[derive(Debug, Default, PartialEq, Shaped)]
struct Person {
    name: String,
    age: u8,
    score: i8,
    ratio: f64,
    active: bool,
    nickname: Option<String>,
    address: Address,
    billing: Option<Box<Address>>,
    tags: Vec<String>,
    lucky: Vec<u16>,
    maybe: Vec<Option<i32>>,
    boxed: Vec<Box<bool>>,
    phones: Vec<Phone>,
    contacts: Option<Vec<Option<Box<Person>>>>,
}

fn src<'a>(pairs: &[(&'a str, &[&str])]) -> Vec<(&'a str, Vec<String>)> {
    pairs
        .iter()
        .map(|(key, values)| (*key, values.iter().map(|v| v.to_string()).collect()))
        .collect()
}

fn multi(result: Result<(), Error>) -> MultiError {
    match result {
        Err(Error::Multi(errors)) => errors,
        other => panic!("expected per-key errors, got {other:?}"),
    }
}

// ── Scalars ─────────────────────────────────────────────────────────

#[test]
fn scalars_are_converted() {
    let mut person = Person::default();
    Decoder::new()
        .decode(
            &mut person,
            src(&[
                ("name", &["Ada"]),
                ("age", &["42"]),
                ("score", &["-7"]),
                ("ratio", &["0.25"]),
                ("active", &["T"]),
            ]),
        )
        .unwrap();

    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 42);
    assert_eq!(person.score, -7);
    assert_eq!(person.ratio, 0.25);
    assert!(person.active);
}

#[test]
fn keys_match_field_names_ignoring_case() {
    let mut person = Person::default();
    Decoder::new()
        .decode(&mut person, src(&[("Age", &["42"]), ("NAME", &["Bob"])]))
        .unwrap();
    assert_eq!(person.age, 42);
    assert_eq!(person.name, "Bob");
}

#[test]
fn only_the_first_value_of_a_scalar_is_used() {
    let mut person = Person::default();
    Decoder::new()
        .decode(&mut person, src(&[("name", &["first", "second"])]))
        .unwrap();
    assert_eq!(person.name, "first");
}

#[test]
fn a_key_without_values_leaves_the_field_alone() {
    let mut person = Person {
        age: 9,
        ..Person::default()
    };
    Decoder::new()
        .decode(&mut person, src(&[("age", &[])]))
        .unwrap();
    assert_eq!(person.age, 9);
}

#[test]
fn absent_options_are_allocated() {
    let mut person = Person::default();
    Decoder::new()
        .decode(
            &mut person,
            src(&[
                ("nickname", &["Countess"]),
                ("billing.city", &["London"]),
                ("address.zip", &["12345"]),
            ]),
        )
        .unwrap();

    assert_eq!(person.nickname.as_deref(), Some("Countess"));
    let billing = person.billing.expect("billing was allocated");
    assert_eq!(billing.city, "London");
    assert_eq!(billing.street, "");
    assert_eq!(person.address.zip, Some(12345));
}

#[test]
fn present_options_are_reused() {
    let mut person = Person {
        billing: Some(Box::new(Address {
            street: "Main St".into(),
            ..Address::default()
        })),
        ..Person::default()
    };
    Decoder::new()
        .decode(&mut person, src(&[("billing.city", &["Paris"])]))
        .unwrap();

    let billing = person.billing.unwrap();
    assert_eq!(billing.street, "Main St");
    assert_eq!(billing.city, "Paris");
}

#[test]
fn empty_source_leaves_the_default() {
    let mut person = Person::default();
    let empty: HashMap<String, Vec<String>> = HashMap::new();
    Decoder::new().decode(&mut person, &empty).unwrap();
    assert_eq!(person, Person::default());
}

// ── Lists of scalars ────────────────────────────────────────────────

#[test]
fn multi_values_fill_a_list_in_order() {
    let mut person = Person::default();
    Decoder::new()
        .decode(
            &mut person,
            src(&[("tags", &["a", "b", "c"]), ("lucky", &["7", "", "13"])]),
        )
        .unwrap();

    assert_eq!(person.tags, ["a", "b", "c"]);
    assert_eq!(person.lucky, [7, 0, 13]);
}

#[test]
fn list_is_replaced_not_appended() {
    let mut person = Person {
        lucky: vec![1, 2, 3, 4, 5],
        ..Person::default()
    };
    Decoder::new()
        .decode(&mut person, src(&[("lucky", &["9"])]))
        .unwrap();
    assert_eq!(person.lucky, [9]);
}

#[test]
fn wrapped_elements_are_wrapped_again() {
    let mut person = Person::default();
    Decoder::new()
        .decode(
            &mut person,
            src(&[("maybe", &["1", "", "-3"]), ("boxed", &["true", "0"])]),
        )
        .unwrap();

    assert_eq!(person.maybe, [Some(1), None, Some(-3)]);
    assert_eq!(person.boxed, [Box::new(true), Box::new(false)]);
}

#[test]
fn a_bad_entry_aborts_the_whole_list() {
    let mut person = Person {
        lucky: vec![4],
        ..Person::default()
    };
    let errors = multi(
        Decoder::new().decode(&mut person, src(&[("lucky", &["1", "2", "x", "4"])])),
    );

    assert_eq!(person.lucky, [4]);
    let Some(DecodeError::Conversion(err)) = errors.get("lucky") else {
        panic!("expected a conversion error, got {errors:?}");
    };
    assert_eq!(err.key, "lucky");
    assert_eq!(err.index, Some(2));
    insta::assert_snapshot!(
        err,
        @r#"error converting value for index 2 of "lucky": invalid digit found in string"#
    );
}

// ── Lists of structs ────────────────────────────────────────────────

#[test]
fn indexed_keys_grow_lists_of_structs() {
    let mut person = Person::default();
    Decoder::new()
        .decode(
            &mut person,
            src(&[("phones.2.number", &["555"]), ("phones.0.label", &["home"])]),
        )
        .unwrap();

    assert_eq!(
        person.phones,
        [
            Phone {
                label: "home".into(),
                number: "".into()
            },
            Phone::default(),
            Phone {
                label: "".into(),
                number: "555".into()
            },
        ]
    );
}

#[test]
fn key_order_does_not_matter() {
    let forward = src(&[
        ("phones.0.label", &["home"]),
        ("phones.0.number", &["111"]),
        ("phones.3.label", &["work"]),
    ]);
    let mut backward = forward.clone();
    backward.reverse();

    let mut a = Person::default();
    let mut b = Person::default();
    Decoder::new().decode(&mut a, forward).unwrap();
    Decoder::new().decode(&mut b, backward).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.phones.len(), 4);
    assert_eq!(a.phones[0].number, "111");
    assert_eq!(a.phones[3].label, "work");
}

#[test]
fn growing_keeps_existing_elements() {
    let mut person = Person {
        phones: vec![Phone {
            label: "kept".into(),
            number: "1".into(),
        }],
        ..Person::default()
    };
    Decoder::new()
        .decode(&mut person, src(&[("phones.1.label", &["new"])]))
        .unwrap();

    assert_eq!(person.phones[0].label, "kept");
    assert_eq!(person.phones[0].number, "1");
    assert_eq!(person.phones[1].label, "new");
}

#[test]
fn lower_index_never_shrinks() {
    let mut person = Person {
        phones: vec![Phone::default(), Phone::default(), Phone::default()],
        ..Person::default()
    };
    Decoder::new()
        .decode(&mut person, src(&[("phones.0.label", &["x"])]))
        .unwrap();
    assert_eq!(person.phones.len(), 3);
    assert_eq!(person.phones[0].label, "x");
}

#[test]
fn recursion_through_wrapped_lists() {
    let mut person = Person::default();
    Decoder::new()
        .decode(
            &mut person,
            src(&[
                ("contacts.1.name", &["Grace"]),
                ("contacts.1.phones.1.number", &["42"]),
                ("contacts.1.billing.city", &["Arlington"]),
            ]),
        )
        .unwrap();

    let contacts = person.contacts.expect("contacts were allocated");
    assert_eq!(contacts.len(), 2);
    assert!(contacts[0].is_none());

    let grace = contacts[1].as_deref().expect("indexed element was allocated");
    assert_eq!(grace.name, "Grace");
    assert_eq!(grace.phones.len(), 2);
    assert_eq!(grace.phones[1].number, "42");
    assert_eq!(grace.billing.as_ref().unwrap().city, "Arlington");
}

// ── Failures ────────────────────────────────────────────────────────

#[test]
fn unknown_keys_are_reported_and_the_rest_applied() {
    let mut person = Person::default();
    let errors = multi(Decoder::new().decode(
        &mut person,
        src(&[("nope", &["1"]), ("name", &["Ada"]), ("address.nope", &["x"])]),
    ));

    assert_eq!(person.name, "Ada");
    assert_eq!(errors.len(), 2);
    assert!(matches!(
        errors.get("nope"),
        Some(DecodeError::InvalidPath { path }) if path == "nope"
    ));
    assert!(matches!(
        errors.get("address.nope"),
        Some(DecodeError::InvalidPath { .. })
    ));
}

#[test]
fn out_of_range_keeps_the_previous_value() {
    let mut person = Person {
        score: 5,
        ..Person::default()
    };
    let errors = multi(Decoder::new().decode(&mut person, src(&[("score", &["999"])])));

    assert_eq!(person.score, 5);
    let Some(DecodeError::Conversion(err)) = errors.get("score") else {
        panic!("expected a conversion error, got {errors:?}");
    };
    assert_eq!(err.key, "score");
    assert_eq!(err.index, None);
    assert!(!err.err.to_string().is_empty());
    insta::assert_snapshot!(
        errors,
        @r#"error converting value for "score": number too large to fit in target type"#
    );
}

#[test]
fn floats_out_of_range_for_their_width_fail() {
    #[derive(Debug, Default, Shaped)]
    struct Reading {
        small: f32,
        big: f64,
        wide: f64,
    }

    let mut reading = Reading {
        small: 1.5,
        big: 2.5,
        ..Reading::default()
    };
    let errors = multi(Decoder::new().decode(
        &mut reading,
        src(&[("small", &["1e39"]), ("big", &["1e400"]), ("wide", &["1e39"])]),
    ));

    assert_eq!(reading.small, 1.5);
    assert_eq!(reading.big, 2.5);
    assert_eq!(reading.wide, 1e39);
    assert_eq!(errors.len(), 2);
    for key in ["small", "big"] {
        let Some(DecodeError::Conversion(err)) = errors.get(key) else {
            panic!("expected a conversion error for {key}, got {errors:?}");
        };
        assert_eq!(err.key, key);
    }
    insta::assert_snapshot!(
        errors.get("small").unwrap(),
        @r#"error converting value for "small": value "1e39" out of range"#
    );
}

#[test]
fn a_repeated_key_is_judged_by_its_last_value() {
    let mut person = Person::default();
    Decoder::new()
        .decode(&mut person, src(&[("age", &["old"]), ("name", &["Ada"]), ("age", &["42"])]))
        .unwrap();
    assert_eq!(person.age, 42);

    let errors = multi(
        Decoder::new().decode(&mut person, src(&[("age", &["7"]), ("age", &["x"])])),
    );
    assert_eq!(person.age, 7);
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors.get("age"), Some(DecodeError::Conversion(_))));
}

#[test]
fn missing_converter_names_the_type() {
    #[derive(Debug, Default, Shaped)]
    struct Letters {
        first: char,
        all: Vec<char>,
        phone: Phone,
    }

    let mut letters = Letters::default();
    let errors = multi(Decoder::new().decode(
        &mut letters,
        src(&[("first", &["a"]), ("all", &["a", "b"]), ("phone", &["555"])]),
    ));

    assert_eq!(errors.len(), 3);
    insta::assert_snapshot!(errors.get("first").unwrap(), @"converter not found for char");
    insta::assert_snapshot!(errors.get("all").unwrap(), @"converter not found for char");
    insta::assert_snapshot!(errors.get("phone").unwrap(), @"converter not found for Phone");
}

#[test]
fn each_key_fails_at_most_once() {
    let mut person = Person::default();
    let errors = multi(Decoder::new().decode(
        &mut person,
        src(&[("age", &["x"]), ("score", &["y"]), ("nope", &[""])]),
    ));
    assert_eq!(errors.len(), 3);
    let keys: Vec<&str> = errors.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, ["age", "score", "nope"]);
    insta::assert_snapshot!(
        errors,
        @r#"error converting value for "age": invalid digit found in string (and 2 other errors)"#
    );
}

#[test]
fn destination_must_be_a_struct() {
    let mut number = 0u32;
    let err = Decoder::new()
        .decode(&mut number, src(&[("x", &["1"])]))
        .unwrap_err();
    assert!(matches!(err, Error::NotAStruct { .. }));
    insta::assert_snapshot!(err, @"destination must be a struct, got u32");
}
