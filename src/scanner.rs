//! Lexical extraction of function and class names from JS/TS source.
//!
//! This is deliberately not a parser. A handful of regexes recognize the
//! common declaration shapes; anything they miss is an accepted false
//! negative, and matches inside strings or comments are accepted false
//! positives. The scanner must never fail, whatever the input — malformed
//! or empty text simply produces empty lists.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

use crate::models::ScanResult;

/// `function name(` — named function declarations.
static FUNCTION_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bfunction\s+([A-Za-z0-9_]+)\s*\(").unwrap());

/// `const|let|var name = (` — bindings assigned a parenthesized parameter
/// list, covering both plain function expressions and arrow functions.
static BINDING_FN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:const|let|var)\s+([A-Za-z0-9_]+)\s*=\s*\(").unwrap());

/// `name = ( ... ) =>` — arrow assignment to a bare identifier.
static ARROW_ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z0-9_]+)\s*=\s*\([^)\n]*\)\s*=>").unwrap());

/// `class Name` — class declarations.
static CLASS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bclass\s+([A-Za-z0-9_]+)").unwrap());

/// Extract probable function and class names from arbitrary source text.
///
/// Returned lists are deduplicated and lexicographically sorted. Never
/// panics; unmatched input yields empty lists.
pub fn scan(code: &str) -> ScanResult {
    let mut functions = BTreeSet::new();
    let mut classes = BTreeSet::new();

    for pattern in [&*FUNCTION_DECL, &*BINDING_FN, &*ARROW_ASSIGN] {
        for cap in pattern.captures_iter(code) {
            if let Some(name) = cap.get(1) {
                functions.insert(name.as_str().to_string());
            }
        }
    }

    for cap in CLASS_DECL.captures_iter(code) {
        if let Some(name) = cap.get(1) {
            classes.insert(name.as_str().to_string());
        }
    }

    ScanResult {
        functions: functions.into_iter().collect(),
        classes: classes.into_iter().collect(),
    }
}
