//! Unit tests for host value construction, classification and equality.

use std::rc::Rc;

use super::{Capsule, HostError, HostKey, HostValue};

// ============================================================================
// Construction and classification
// ============================================================================

#[test]
fn test_type_names() {
    assert_eq!(HostValue::None.type_name(), "none");
    assert_eq!(HostValue::Bool(true).type_name(), "bool");
    assert_eq!(HostValue::Int(1).type_name(), "int");
    assert_eq!(HostValue::Float(1.5).type_name(), "float");
    assert_eq!(HostValue::str("x").type_name(), "str");
    assert_eq!(HostValue::bytes(vec![1u8]).type_name(), "bytes");
    assert_eq!(HostValue::list([]).type_name(), "list");
    assert_eq!(HostValue::dict::<&str>([]).type_name(), "dict");
    assert_eq!(HostValue::Capsule(Capsule::new(8)).type_name(), "capsule");
    assert_eq!(
        HostValue::function("f", |_| Ok(HostValue::None)).type_name(),
        "builtin_function"
    );
}

#[test]
fn test_only_objects_are_callable() {
    let func = HostValue::function("f", |_| Ok(HostValue::None));
    assert!(func.is_callable());
    assert!(!HostValue::str("f").is_callable());
    assert!(!HostValue::list([]).is_callable());
    assert!(!HostValue::None.is_callable());
}

#[test]
fn test_numeric_accessors() {
    assert!(HostValue::Int(3).is_number());
    assert!(HostValue::Float(3.0).is_number());
    assert!(!HostValue::Bool(true).is_number());
    assert_eq!(HostValue::Int(3).as_float(), Some(3.0));
    assert_eq!(HostValue::Float(2.5).as_int(), None);
}

#[test]
fn test_from_option() {
    assert_eq!(HostValue::from(None::<i64>), HostValue::None);
    assert_eq!(HostValue::from(Some("x")), HostValue::str("x"));
}

// ============================================================================
// Equality
// ============================================================================

#[test]
fn test_numeric_cross_comparison() {
    assert_eq!(HostValue::Int(5), HostValue::Float(5.0));
    assert_ne!(HostValue::Int(5), HostValue::Float(5.5));
    assert_ne!(HostValue::Bool(true), HostValue::Int(1));
}

#[test]
fn test_nan_is_not_equal_to_itself() {
    assert_ne!(HostValue::Float(f64::NAN), HostValue::Float(f64::NAN));
}

#[test]
fn test_containers_compare_structurally() {
    let a = HostValue::list([HostValue::Int(1), HostValue::str("two")]);
    let b = HostValue::list([HostValue::Float(1.0), HostValue::str("two")]);
    assert_eq!(a, b);
    assert!(!a.same_object(&b));

    let d1 = HostValue::dict([("k", HostValue::Int(1))]);
    let d2 = HostValue::dict([("k", HostValue::Int(1))]);
    assert_eq!(d1, d2);
}

#[test]
fn test_self_referential_list_equals_itself() {
    let list = HostValue::list([]);
    list.as_list().unwrap().borrow_mut().push(list.clone());
    assert_eq!(list, list.clone());
    assert!(list.same_object(&list.as_list().unwrap().borrow()[0]));
}

#[test]
fn test_distinct_cyclic_containers_compare_structurally() {
    let cyclic_list = |head: i64| {
        let list = HostValue::list([HostValue::Int(head)]);
        list.as_list().unwrap().borrow_mut().push(list.clone());
        list
    };
    assert_eq!(cyclic_list(1), cyclic_list(1));
    assert_ne!(cyclic_list(1), cyclic_list(2));

    let cyclic_dict = || {
        let dict = HostValue::dict([("n", HostValue::Int(1))]);
        dict.as_dict()
            .unwrap()
            .borrow_mut()
            .insert(HostKey::from("self"), dict.clone());
        dict
    };
    assert_eq!(cyclic_dict(), cyclic_dict());

    // a -> b -> a against c -> c
    let a = HostValue::list([]);
    let b = HostValue::list([a.clone()]);
    a.as_list().unwrap().borrow_mut().push(b);
    let c = HostValue::list([]);
    c.as_list().unwrap().borrow_mut().push(c.clone());
    assert_eq!(a, c);
}

#[test]
fn test_objects_compare_by_identity() {
    let f = HostValue::function("f", |_| Ok(HostValue::None));
    let g = HostValue::function("f", |_| Ok(HostValue::None));
    assert_eq!(f, f.clone());
    assert_ne!(f, g);
}

#[test]
fn test_identity_is_shared_by_clones() {
    let dict = HostValue::dict([("a", HostValue::Int(1))]);
    let alias = dict.clone();
    assert_eq!(dict.identity(), alias.identity());
    assert!(Rc::ptr_eq(dict.as_dict().unwrap(), alias.as_dict().unwrap()));
    assert_eq!(HostValue::Int(1).identity(), None);
}

// ============================================================================
// Keys and callables
// ============================================================================

#[test]
fn test_key_to_value() {
    assert_eq!(HostKey::from("k").to_value(), HostValue::str("k"));
    assert_eq!(HostKey::from(7).to_value(), HostValue::Int(7));
    assert_eq!(HostKey::from(false).to_value(), HostValue::Bool(false));
}

#[test]
fn test_native_function_call() {
    let add = HostValue::function("add", |args| {
        let total = args.iter().filter_map(HostValue::as_float).sum::<f64>();
        Ok(HostValue::Float(total))
    });
    let result = add.call(&[HostValue::Int(2), HostValue::Float(0.5)]);
    assert_eq!(result, Ok(HostValue::Float(2.5)));
}

#[test]
fn test_native_function_error_propagates() {
    let fail = HostValue::function("fail", |_| Err(HostError::value_error("boom")));
    let err = fail.call(&[]).unwrap_err();
    assert_eq!(err.kind, "ValueError");
    assert_eq!(err.to_string(), "ValueError: boom");
}

#[test]
fn test_calling_non_callable_fails() {
    let err = HostValue::Int(3).call(&[]).unwrap_err();
    assert_eq!(err, HostError::type_error("'int' object is not callable"));
}
