//! Guard clauses for request validation.
//!
//! Each helper returns the supplied `BusinessError` when its precondition
//! does not hold, so handlers can chain them with `?`.

use std::any::{type_name, Any};
use std::collections::HashMap;

use crate::business::BusinessError;

/// Anything that can be "absent"; used by [`any_null`] to check
/// heterogeneous request fields in one call.
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl<T> Presence for Option<T> {
    fn is_present(&self) -> bool { self.is_some() }
}

/// Fail when `expression` holds.
pub fn is_true(expression: bool, err: BusinessError) -> Result<(), BusinessError> {
    if expression {
        return Err(err);
    }
    Ok(())
}

/// Fail when the value is absent; otherwise hand it back unwrapped.
pub fn is_null<T>(value: Option<T>, err: BusinessError) -> Result<T, BusinessError> {
    value.ok_or(err)
}

pub fn any_null(err: BusinessError, values: &[&dyn Presence]) -> Result<(), BusinessError> {
    if values.iter().any(|v| !v.is_present()) {
        return Err(err);
    }
    Ok(())
}

pub fn has_length(text: Option<&str>, err: BusinessError) -> Result<(), BusinessError> {
    match text {
        Some(t) if !t.is_empty() => Ok(()),
        _ => Err(err),
    }
}

/// Requires at least one non-whitespace character.
pub fn has_text(text: Option<&str>, err: BusinessError) -> Result<(), BusinessError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(()),
        _ => Err(err),
    }
}

pub fn does_not_contain(text: &str, substring: &str, err: BusinessError) -> Result<(), BusinessError> {
    if !text.is_empty() && !substring.is_empty() && text.contains(substring) {
        return Err(err);
    }
    Ok(())
}

pub fn not_empty<T>(items: &[T], err: BusinessError) -> Result<(), BusinessError> {
    if items.is_empty() {
        return Err(err);
    }
    Ok(())
}

pub fn not_empty_map<K, V, S>(map: &HashMap<K, V, S>, err: BusinessError) -> Result<(), BusinessError> {
    if map.is_empty() {
        return Err(err);
    }
    Ok(())
}

pub fn no_null_elements<T>(items: &[Option<T>], err: BusinessError) -> Result<(), BusinessError> {
    if items.iter().any(Option::is_none) {
        return Err(err);
    }
    Ok(())
}

/// Fail if any entry is missing, empty or whitespace only.
pub fn is_any_blank(err: BusinessError, values: &[Option<&str>]) -> Result<(), BusinessError> {
    if values.iter().any(|v| v.map_or(true, |s| s.trim().is_empty())) {
        return Err(err);
    }
    Ok(())
}

/// Fail unless `value` holds a `T`. The check uses the runtime type behind
/// the `dyn Any`; an erased value has no printable name, so the message
/// reports it as `unknown`. Use [`is_instance_of_val`] when the concrete type
/// is known and should appear in the message.
pub fn is_instance_of<T: Any>(value: &dyn Any, err: BusinessError) -> Result<(), BusinessError> {
    check_instance::<T>(value, "unknown", err)
}

/// Like [`is_instance_of`], naming `V` in the error message.
pub fn is_instance_of_val<T: Any, V: Any>(value: &V, err: BusinessError) -> Result<(), BusinessError> {
    check_instance::<T>(value, type_name::<V>(), err)
}

fn check_instance<T: Any>(value: &dyn Any, actual: &str, err: BusinessError) -> Result<(), BusinessError> {
    if value.is::<T>() {
        return Ok(());
    }
    let message = instance_check_message(&err.message, actual, type_name::<T>());
    Err(BusinessError { code: err.code, message })
}

fn instance_check_message(msg: &str, actual: &str, expected: &str) -> String {
    let default_text = format!("Object of class [{actual}] must be an instance of {expected}");
    if msg.is_empty() {
        return default_text;
    }
    if ends_with_separator(msg) {
        return format!("{msg} {default_text}");
    }
    message_with_type_name(msg, actual)
}

fn ends_with_separator(msg: &str) -> bool {
    msg.ends_with(':') || msg.ends_with(';') || msg.ends_with(',') || msg.ends_with('.')
}

fn message_with_type_name(msg: &str, type_name: &str) -> String {
    let sep = if msg.ends_with(' ') { "" } else { ": " };
    format!("{msg}{sep}{type_name}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::business::ErrorCode;

    fn params() -> BusinessError { BusinessError::new(ErrorCode::ParamsError) }

    #[test]
    fn is_true_fails_on_true() {
        assert!(is_true(false, params()).is_ok());
        assert_eq!(is_true(true, params()).unwrap_err().code, ErrorCode::ParamsError);
    }

    #[test]
    fn is_null_returns_inner_value() {
        assert_eq!(is_null(Some(7), params()).unwrap(), 7);
        assert!(is_null::<i64>(None, params()).is_err());
    }

    #[test]
    fn any_null_checks_mixed_types() {
        let id: Option<i64> = Some(1);
        let url: Option<String> = None;
        assert!(any_null(params(), &[&id, &url]).is_err());
        let url = Some("https://cdn.example.com/a.png".to_string());
        assert!(any_null(params(), &[&id, &url]).is_ok());
    }

    #[test]
    fn text_checks() {
        assert!(has_length(Some(" "), params()).is_ok());
        assert!(has_length(Some(""), params()).is_err());
        assert!(has_text(Some("  \t"), params()).is_err());
        assert!(has_text(None, params()).is_err());
        assert!(has_text(Some(" x "), params()).is_ok());
        assert!(does_not_contain("select * from", "select", params()).is_err());
        assert!(does_not_contain("hello", "", params()).is_ok());
    }

    #[test]
    fn collection_checks() {
        assert!(not_empty::<i32>(&[], params()).is_err());
        assert!(not_empty(&[1], params()).is_ok());
        let map: HashMap<String, i32> = HashMap::new();
        assert!(not_empty_map(&map, params()).is_err());
        assert!(no_null_elements(&[Some(1), None], params()).is_err());
        assert!(no_null_elements(&[Some(1), Some(2)], params()).is_ok());
    }

    #[test]
    fn any_blank_rejects_missing_and_whitespace() {
        assert!(is_any_blank(params(), &[Some("a"), Some("b")]).is_ok());
        assert!(is_any_blank(params(), &[Some("a"), Some("  ")]).is_err());
        assert!(is_any_blank(params(), &[None]).is_err());
    }

    #[test]
    fn instance_of_composes_message() {
        assert!(is_instance_of_val::<String, _>(&String::new(), params()).is_ok());

        let err = is_instance_of_val::<String, _>(&5_i32, BusinessError::with_message(ErrorCode::ParamsError, "bad value")).unwrap_err();
        assert_eq!(err.message, "bad value: i32");

        let err = is_instance_of_val::<String, _>(&5_i32, BusinessError::with_message(ErrorCode::ParamsError, "bad value.")).unwrap_err();
        assert_eq!(err.message, "bad value. Object of class [i32] must be an instance of alloc::string::String");

        let err = is_instance_of_val::<String, _>(&5_i32, BusinessError::with_message(ErrorCode::ParamsError, "")).unwrap_err();
        assert!(err.message.starts_with("Object of class [i32]"));
    }

    #[test]
    fn instance_of_sees_through_dyn_any() {
        let boxed: Box<dyn Any> = Box::new(String::from("x"));
        assert!(is_instance_of::<String>(boxed.as_ref(), params()).is_ok());

        let err = is_instance_of::<i64>(boxed.as_ref(), params()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ParamsError);
        assert!(err.message.ends_with(": unknown"), "{}", err.message);

        let values: Vec<Box<dyn Any>> = vec![Box::new(1_i64), Box::new("s"), Box::new(2_i64)];
        let ints = values.iter().filter(|v| is_instance_of::<i64>(v.as_ref(), params()).is_ok()).count();
        assert_eq!(ints, 2);
    }
}
