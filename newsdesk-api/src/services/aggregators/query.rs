//! Keyword query construction shared by the aggregator clients

const DEFAULT_TIME_RANGE: &str = "180d";

/// Split a comma-separated field into trimmed, non-empty terms
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|term| term.trim().to_string())
        .filter(|term| !term.is_empty())
        .collect()
}

/// Quote a multi-word term unless the caller already quoted it
fn normalize_term(term: &str) -> String {
    let trimmed = term.trim();
    let already_quoted = (trimmed.starts_with('"') && trimmed.ends_with('"'))
        || (trimmed.starts_with('\'') && trimmed.ends_with('\''));
    if already_quoted || !trimmed.contains(' ') {
        trimmed.to_string()
    } else {
        format!("\"{}\"", trimmed)
    }
}

/// A built search query plus the terms recorded on the ingest request row
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub query: String,
    pub and_terms: Vec<String>,
    pub or_terms: Vec<String>,
    pub not_terms: Vec<String>,
}

/// Build a boolean search expression from AND / OR / NOT CSV fields.
///
/// AND terms are joined with spaces, OR terms with " OR " (parenthesized
/// when mixed with AND terms), NOT terms appended with a leading "-".
pub fn build_query(and_csv: &str, or_csv: &str, not_csv: &str) -> BuiltQuery {
    let and_terms = split_csv(and_csv);
    let or_terms = split_csv(or_csv);
    let not_terms = split_csv(not_csv);

    let normalized_and: Vec<String> = and_terms.iter().map(|t| normalize_term(t)).collect();
    let normalized_or: Vec<String> = or_terms.iter().map(|t| normalize_term(t)).collect();
    let normalized_not: Vec<String> = not_terms.iter().map(|t| normalize_term(t)).collect();

    let mut parts = Vec::new();
    if !normalized_and.is_empty() {
        parts.push(normalized_and.join(" "));
    }
    if !normalized_or.is_empty() {
        let expression = normalized_or.join(" OR ");
        if !normalized_and.is_empty() && normalized_or.len() > 1 {
            parts.push(format!("({})", expression));
        } else {
            parts.push(expression);
        }
    }
    for term in &normalized_not {
        parts.push(format!("-{}", term));
    }

    BuiltQuery {
        query: parts.join(" "),
        and_terms,
        or_terms,
        not_terms,
    }
}

/// Validate a "NNd" time range, falling back to the default. Returns the
/// range and whether the supplied value was invalid.
pub fn normalize_time_range(value: &str) -> (String, bool) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return (DEFAULT_TIME_RANGE.to_string(), false);
    }

    let valid = trimmed
        .strip_suffix('d')
        .and_then(|days| days.parse::<u32>().ok())
        .map(|days| days > 0)
        .unwrap_or(false);

    if valid {
        (trimmed.to_string(), false)
    } else {
        (DEFAULT_TIME_RANGE.to_string(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_splitting_trims_and_drops_empties() {
        assert_eq!(split_csv("flood, levee ,, dam "), vec!["flood", "levee", "dam"]);
        assert!(split_csv("").is_empty());
    }

    #[test]
    fn multi_word_terms_are_quoted() {
        let built = build_query("forest fire", "", "");
        assert_eq!(built.query, "\"forest fire\"");

        let pre_quoted = build_query("\"forest fire\"", "", "");
        assert_eq!(pre_quoted.query, "\"forest fire\"");
    }

    #[test]
    fn mixed_and_or_not() {
        let built = build_query("flood", "levee, dam", "sports");
        assert_eq!(built.query, "flood (levee OR dam) -sports");
        assert_eq!(built.and_terms, vec!["flood"]);
        assert_eq!(built.or_terms, vec!["levee", "dam"]);
        assert_eq!(built.not_terms, vec!["sports"]);
    }

    #[test]
    fn lone_or_expression_is_not_parenthesized() {
        let built = build_query("", "levee, dam", "");
        assert_eq!(built.query, "levee OR dam");
    }

    #[test]
    fn time_range_validation() {
        assert_eq!(normalize_time_range(""), ("180d".to_string(), false));
        assert_eq!(normalize_time_range("7d"), ("7d".to_string(), false));
        assert_eq!(normalize_time_range("0d"), ("180d".to_string(), true));
        assert_eq!(normalize_time_range("week"), ("180d".to_string(), true));
    }
}
