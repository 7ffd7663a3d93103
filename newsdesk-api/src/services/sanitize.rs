//! Boundary input sanitization
//!
//! A pure transform applied to externally-sourced string fields before any
//! core logic sees them: strips HTML tags, null bytes, and path-traversal
//! sequences while preserving normal text. No validation rules imposed.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Sanitize one externally-supplied string
pub fn sanitize_text(input: &str) -> String {
    let without_nul = input.replace('\0', "");
    let without_tags = HTML_TAG.replace_all(&without_nul, "");

    // Repeat until stable so "....//" style nesting cannot survive one pass
    let mut cleaned = without_tags.into_owned();
    loop {
        let next = cleaned.replace("../", "").replace("..\\", "");
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    cleaned.trim().to_string()
}
