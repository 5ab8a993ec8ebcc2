//! Extraction parser for generative-AI receipt replies
//!
//! The model returns free text, typically one `field: value` pair per line
//! with extra prose around it. [`parse`] scans every line with three
//! independent case-insensitive matchers and fills an [`ExtractedRecord`].
//!
//! Absence of a field is expected, not exceptional: each field keeps its
//! default when nothing matches, and the function never fails. When the same
//! field appears on several lines the last occurrence wins (each matching
//! line overwrites the previous value).

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ExtractedRecord;

static DESCRIPTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)description:\s*(.*)").expect("valid regex"));

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)date:\s*(.*)").expect("valid regex"));

// The numeric token is anchored to the end of the line: digits and dots only,
// so "amount: 12.5x" fails the match and the amount keeps its default.
static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:total amount|amount):\s*([0-9.]+)\s*$").expect("valid regex"));

/// Parse a model reply into structured receipt fields
///
/// Total function: any input, including the empty string, yields a complete
/// record. Unmatched fields keep the defaults ("Unknown" / "Unknown" / 0).
pub fn parse(raw_text: &str) -> ExtractedRecord {
    let mut record = ExtractedRecord::default();

    for line in raw_text.lines() {
        if let Some(caps) = DESCRIPTION_RE.captures(line) {
            record.description = caps[1].trim().to_string();
        }
        if let Some(caps) = DATE_RE.captures(line) {
            record.date = caps[1].trim().to_string();
        }
        if let Some(caps) = AMOUNT_RE.captures(line) {
            // A token like "1.2.3" passes the charset but not f64 parsing;
            // it resets the amount to 0 rather than erroring.
            record.amount = match caps[1].parse::<f64>() {
                Ok(v) if v.is_finite() => v,
                _ => 0.0,
            };
        }
    }

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_reply() {
        let reply = "description: Flight to NYC\ndate: 2024-01-05\namount: 450.75";
        let record = parse(reply);
        assert_eq!(record.description, "Flight to NYC");
        assert_eq!(record.date, "2024-01-05");
        assert_eq!(record.amount, 450.75);
    }

    #[test]
    fn test_parse_no_recognizable_lines() {
        let record = parse("the model had nothing useful to say\nat all");
        assert_eq!(record, ExtractedRecord::default());
    }

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse(""), ExtractedRecord::default());
    }

    #[test]
    fn test_parse_case_insensitive() {
        let reply = "Description: Coffee\nDATE: 2024-03-01\nTotal Amount: 4.50";
        let record = parse(reply);
        assert_eq!(record.description, "Coffee");
        assert_eq!(record.date, "2024-03-01");
        assert_eq!(record.amount, 4.50);
    }

    #[test]
    fn test_second_description_line_wins() {
        let reply = "description: first pass\ndescription: second pass";
        let record = parse(reply);
        assert_eq!(record.description, "second pass");
    }

    #[test]
    fn test_second_amount_line_wins() {
        let reply = "amount: 10.00\ntotal amount: 12.50";
        assert_eq!(parse(reply).amount, 12.50);
    }

    #[test]
    fn test_malformed_amount_token_defaults_to_zero() {
        // Trailing garbage fails the pattern entirely
        assert_eq!(parse("total amount: 12.5x").amount, 0.0);
        // Passes the charset but fails float parsing
        assert_eq!(parse("amount: 1.2.3").amount, 0.0);
    }

    #[test]
    fn test_malformed_amount_resets_earlier_value() {
        // A later malformed line still wins, resetting the amount to 0
        let reply = "amount: 42.00\namount: 9.9.9";
        assert_eq!(parse(reply).amount, 0.0);
    }

    #[test]
    fn test_partial_reply_keeps_defaults() {
        let record = parse("date: 2024-06-30");
        assert_eq!(record.description, "Unknown");
        assert_eq!(record.date, "2024-06-30");
        assert_eq!(record.amount, 0.0);
    }

    #[test]
    fn test_field_label_mid_line_matches() {
        // Matchers are unanchored at the start, so prose prefixes don't hide a field
        let record = parse("here you go - description: lunch receipt");
        assert_eq!(record.description, "lunch receipt");
    }

    #[test]
    fn test_empty_value_overwrites_default() {
        // "description:" with nothing after it captures the empty string
        let record = parse("description:");
        assert_eq!(record.description, "");
    }

    #[test]
    fn test_value_whitespace_trimmed() {
        let record = parse("description:   taxi ride   ");
        assert_eq!(record.description, "taxi ride");
    }

    #[test]
    fn test_parse_is_idempotent() {
        let reply = "description: Flight to NYC\namount: 450.75";
        assert_eq!(parse(reply), parse(reply));
    }
}
