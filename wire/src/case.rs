//! Response key normalization.
//!
//! Portal firmware is inconsistent about casing (`client_state` on some
//! builds, `clientState` on others). Everything read off the wire is
//! rewritten to camelCase before decoding. Only keys change; values, array
//! order and unknown fields are kept.

#[cfg(test)]
#[path = "case_test.rs"]
mod case_test;

use serde_json::{Map, Value};

/// Convert a snake_case or kebab-case key to camelCase.
///
/// A separator is dropped only when it sits between two word characters, and
/// the character after it is upper-cased. Leading underscores, trailing or
/// doubled separators and keys that are already camelCase come through as-is.
#[must_use]
pub fn camel_case_key(key: &str) -> String {
    let body = key.trim_start_matches('_');
    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..key.len() - body.len()]);

    let mut chars = body.chars().peekable();
    let mut seen_word = false;
    let mut upper_next = false;
    while let Some(ch) = chars.next() {
        let is_separator = ch == '_' || ch == '-';
        let next_is_word = chars.peek().is_some_and(|c| c.is_alphanumeric());
        if is_separator && seen_word && next_is_word {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
        seen_word |= ch.is_alphanumeric();
    }
    out
}

/// Rewrite every object key in `value`, recursively, to camelCase.
///
/// When two keys collapse onto the same camelCase name (`client_state` and
/// `clientState` in one object), the one already spelled in camelCase wins.
#[must_use]
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, inner) in map {
                let camel = camel_case_key(&key);
                if camel != key && out.contains_key(&camel) {
                    continue;
                }
                out.insert(camel, normalize_keys(inner));
            }
            Value::Object(out)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_keys).collect()),
        other => other,
    }
}
