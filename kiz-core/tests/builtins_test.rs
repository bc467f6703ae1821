// kiz-core - Built-in library tests
// Copyright (c) 2026 Tom Waddington. MIT licensed.

//! Tests for the built-in library driven through a minimal host that can
//! only call native functions, which is enough for every method that does
//! not push user bytecode frames.

use kiz_core::builtins::{hash_key, is_child_of, register_builtins};
use kiz_core::{AttrMap, Error, Host, Object, Result, get_attr, magic, prototypes};

/// A host that dispatches native calls directly.
struct TestHost;

impl Host for TestHost {
    fn call(
        &mut self,
        func: &Object,
        args: Vec<Object>,
        self_obj: Option<Object>,
    ) -> Result<Object> {
        let Some((_, native)) = func.native_fn() else {
            return Err(Error::type_error("the test host can only call natives"));
        };
        (*native)(self, self_obj, &args)
    }

    fn print_line(&mut self, _text: &str) {}
}

fn setup() -> (TestHost, AttrMap) {
    let mut builtins = AttrMap::new();
    register_builtins(&mut builtins);
    (TestHost, builtins)
}

/// Resolve a magic method on a value and call it.
fn invoke(host: &mut TestHost, receiver: &Object, method: &str, args: Vec<Object>) -> Result<Object> {
    let func = get_attr(receiver, method)?;
    host.call(&func, args, Some(receiver.clone()))
}

// =============================================================================
// Int
// =============================================================================

#[test]
fn int_add_stays_int() {
    let (mut host, _) = setup();
    let result = invoke(
        &mut host,
        &Object::int_from(2),
        magic::ADD,
        vec![Object::int_from(3)],
    )
    .unwrap();
    assert_eq!(result.int_value().unwrap(), 5.into());
}

#[test]
fn int_plus_decimal_promotes() {
    let (mut host, _) = setup();
    let half = Object::decimal(kiz_core::Decimal::parse("0.5").unwrap());
    let result = invoke(&mut host, &Object::int_from(1), magic::ADD, vec![half]).unwrap();
    assert_eq!(result.decimal_value().unwrap().to_string(), "1.5");
}

#[test]
fn int_division_yields_ten_digit_decimal() {
    let (mut host, _) = setup();
    let result = invoke(
        &mut host,
        &Object::int_from(1),
        magic::DIV,
        vec![Object::int_from(3)],
    )
    .unwrap();
    assert_eq!(result.decimal_value().unwrap().to_string(), "0.3333333333");
}

#[test]
fn int_division_by_zero_raises() {
    let (mut host, _) = setup();
    let result = invoke(
        &mut host,
        &Object::int_from(1),
        magic::DIV,
        vec![Object::int_from(0)],
    );
    match result {
        Err(Error::Raised { name, .. }) => assert_eq!(name, "ZeroDivisionError"),
        other => panic!("expected ZeroDivisionError, got {:?}", other.is_ok()),
    }
}

#[test]
fn int_negative_power_is_decimal() {
    let (mut host, _) = setup();
    let result = invoke(
        &mut host,
        &Object::int_from(2),
        magic::POW,
        vec![Object::int_from(-2)],
    )
    .unwrap();
    assert_eq!(result.decimal_value().unwrap().to_string(), "0.25");
}

#[test]
fn int_bool_is_nonzero() {
    let (mut host, _) = setup();
    let truthy = invoke(&mut host, &Object::int_from(2), magic::BOOL, vec![]).unwrap();
    let falsy = invoke(&mut host, &Object::int_from(0), magic::BOOL, vec![]).unwrap();
    assert_eq!(truthy.bool_value(), Some(true));
    assert_eq!(falsy.bool_value(), Some(false));
}

#[test]
fn is_true_recurses_through_bool_dispatch() {
    let (mut host, _) = setup();
    assert!(host.is_true(&Object::int_from(1)).unwrap());
    assert!(!host.is_true(&Object::int_from(0)).unwrap());
    assert!(!host.is_true(&Object::nil()).unwrap());
    assert!(!host.is_true(&Object::boolean(false)).unwrap());
    assert!(!host.is_true(&Object::string("")).unwrap());
    assert!(host.is_true(&Object::string("x")).unwrap());
}

// =============================================================================
// Str
// =============================================================================

#[test]
fn str_concat_and_repeat() {
    let (mut host, _) = setup();
    let cat = invoke(
        &mut host,
        &Object::string("ab"),
        magic::ADD,
        vec![Object::string("cd")],
    )
    .unwrap();
    assert_eq!(cat.str_value().unwrap(), "abcd");

    let rep = invoke(
        &mut host,
        &Object::string("ab"),
        magic::MUL,
        vec![Object::int_from(2)],
    )
    .unwrap();
    assert_eq!(rep.str_value().unwrap(), "abab");
}

#[test]
fn str_hash_is_deterministic() {
    let (mut host, _) = setup();
    let a = hash_key(&mut host, &Object::string("kiz")).unwrap();
    let b = hash_key(&mut host, &Object::string("kiz")).unwrap();
    let c = hash_key(&mut host, &Object::string("ziq")).unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
}

// =============================================================================
// List iteration protocol
// =============================================================================

#[test]
fn list_next_walks_elements_then_resets() {
    let (mut host, _) = setup();
    let list = Object::list(vec![Object::int_from(1), Object::int_from(2)]);

    let first = invoke(&mut host, &list, magic::NEXT, vec![]).unwrap();
    assert_eq!(first.int_value().unwrap(), 1.into());
    let second = invoke(&mut host, &list, magic::NEXT, vec![]).unwrap();
    assert_eq!(second.int_value().unwrap(), 2.into());

    // Exhaustion yields the Bool(false) sentinel and resets the cursor.
    let sentinel = invoke(&mut host, &list, magic::NEXT, vec![]).unwrap();
    assert_eq!(sentinel.bool_value(), Some(false));
    let cursor = list.get_attr_local(magic::CURRENT_INDEX).unwrap();
    assert_eq!(cursor.int_value().unwrap(), 0.into());

    // Restartable: the walk begins again.
    let again = invoke(&mut host, &list, magic::NEXT, vec![]).unwrap();
    assert_eq!(again.int_value().unwrap(), 1.into());
}

#[test]
fn list_equality_compares_elements() {
    let (mut host, _) = setup();
    let a = Object::list(vec![Object::int_from(1), Object::string("x")]);
    let b = Object::list(vec![Object::int_from(1), Object::string("x")]);
    let c = Object::list(vec![Object::int_from(1)]);

    let same = invoke(&mut host, &a, magic::EQ, vec![b]).unwrap();
    assert_eq!(same.bool_value(), Some(true));
    let shorter = invoke(&mut host, &a, magic::EQ, vec![c]).unwrap();
    assert_eq!(shorter.bool_value(), Some(false));
}

// =============================================================================
// Dict fingerprinting
// =============================================================================

#[test]
fn dict_set_get_round_trip() {
    let (mut host, _) = setup();
    let dict = Object::dict(kiz_core::Dict::new());
    invoke(
        &mut host,
        &dict,
        magic::SET_ITEM,
        vec![Object::string("k"), Object::int_from(9)],
    )
    .unwrap();
    let value = invoke(&mut host, &dict, magic::GET_ITEM, vec![Object::string("k")]).unwrap();
    assert_eq!(value.int_value().unwrap(), 9.into());
}

#[test]
fn dict_miss_is_a_key_error() {
    let (mut host, _) = setup();
    let dict = Object::dict(kiz_core::Dict::new());
    let result = invoke(&mut host, &dict, magic::GET_ITEM, vec![Object::string("k")]);
    match result {
        Err(Error::Raised { name, .. }) => assert_eq!(name, "KeyError"),
        other => panic!("expected KeyError, got ok={}", other.is_ok()),
    }
}

#[test]
fn dict_collides_by_fingerprint_not_equality() {
    // Nil and Bool(false) both hash to 0, so they collide by design.
    let (mut host, _) = setup();
    let dict = Object::dict(kiz_core::Dict::new());
    invoke(
        &mut host,
        &dict,
        magic::SET_ITEM,
        vec![Object::nil(), Object::int_from(1)],
    )
    .unwrap();
    invoke(
        &mut host,
        &dict,
        magic::SET_ITEM,
        vec![Object::boolean(false), Object::int_from(2)],
    )
    .unwrap();
    let value = invoke(&mut host, &dict, magic::GET_ITEM, vec![Object::nil()]).unwrap();
    assert_eq!(value.int_value().unwrap(), 2.into());
}

// =============================================================================
// Prototype membership and free functions
// =============================================================================

#[test]
fn is_child_of_walks_the_chain() {
    let (_, builtins) = setup();
    let protos = prototypes();
    let value = Object::int_from(1);
    assert!(is_child_of(&value, &protos.int));
    assert!(is_child_of(&value, &protos.object));
    assert!(!is_child_of(&value, &protos.string));
    // The builtins table binds the same singletons.
    assert!(builtins.get("Int").unwrap().is(&protos.int));
}

#[test]
fn create_with_parent_links_the_chain() {
    let (mut host, builtins) = setup();
    let create = builtins.get("create").unwrap();
    let parent = host.call(&create, vec![], None).unwrap();
    let child = host.call(&create, vec![parent.clone()], None).unwrap();
    assert!(is_child_of(&child, &parent));
    assert!(is_child_of(&child, &prototypes().object));
}

#[test]
fn error_constructor_sets_name_and_msg() {
    let (mut host, builtins) = setup();
    let error_proto = builtins.get("Error").unwrap();
    let call = get_attr(&error_proto, magic::CALL).unwrap();
    let error = host
        .call(
            &call,
            vec![Object::string("E"), Object::string("boom")],
            Some(error_proto),
        )
        .unwrap();
    assert!(error.is_error());
    assert_eq!(
        error
            .get_attr_local(magic::ERR_NAME)
            .unwrap()
            .str_value()
            .unwrap(),
        "E"
    );
    assert_eq!(
        error
            .get_attr_local(magic::ERR_MSG)
            .unwrap()
            .str_value()
            .unwrap(),
        "boom"
    );
}

#[test]
fn object_default_eq_is_identity() {
    let (mut host, _) = setup();
    let a = Object::plain();
    let b = Object::plain();
    let same = invoke(&mut host, &a, magic::EQ, vec![a.clone()]).unwrap();
    let different = invoke(&mut host, &a, magic::EQ, vec![b]).unwrap();
    assert_eq!(same.bool_value(), Some(true));
    assert_eq!(different.bool_value(), Some(false));
}
