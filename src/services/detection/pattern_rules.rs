// Pattern Rules
// Ordered table of structural rules for deterministic PII matching

use crate::models::{Span, SpanSource};
use once_cell::sync::Lazy;
use regex::Regex;

/// One tagged rule. The table is evaluated in order: the most structurally
/// specific categories come first so a broader rule never shadows a region a
/// stricter rule already claimed (final overlap resolution happens in the
/// deduplicator, which favors the earlier entry at equal start).
pub struct PatternRule {
    pub category: &'static str,
    pub regex: Regex,
}

static RULES: Lazy<Vec<PatternRule>> = Lazy::new(|| {
    vec![
        PatternRule {
            category: "nationalId",
            regex: Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").unwrap(),
        },
        PatternRule {
            category: "creditCard",
            regex: Regex::new(r"\b\d{4}[ -]?\d{4}[ -]?\d{4}[ -]?\d{4}\b").unwrap(),
        },
        PatternRule {
            category: "email",
            regex: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
        },
        PatternRule {
            category: "ipAddress",
            regex: Regex::new(r"\b\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}\b").unwrap(),
        },
        PatternRule {
            category: "date",
            regex: Regex::new(r"\b\d{1,4}[/\-.]\d{1,2}[/\-.]\d{1,4}\b").unwrap(),
        },
        PatternRule {
            category: "phone",
            regex: Regex::new(r"\+?\d{0,3}[ .-]?\(?\d{3}\)?[ .-]?\d{3}[ .-]?\d{4}\b").unwrap(),
        },
    ]
});

/// Scan `text` with every rule in table order. Each call creates fresh match
/// cursors, so repeated scans over different inputs never skip matches.
/// Absence of a match is not a failure.
pub fn scan(text: &str) -> Vec<Span> {
    let mut spans = Vec::new();
    for rule in RULES.iter() {
        for m in rule.regex.find_iter(text) {
            spans.push(Span {
                category: rule.category.to_string(),
                value: m.as_str().to_string(),
                start: m.start(),
                end: m.end(),
                source: SpanSource::Pattern,
                confidence: 1.0,
            });
        }
    }
    spans
}

/// Rule categories in evaluation order.
pub fn rule_order() -> Vec<&'static str> {
    RULES.iter().map(|r| r.category).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_order_is_specific_first() {
        assert_eq!(
            rule_order(),
            vec!["nationalId", "creditCard", "email", "ipAddress", "date", "phone"]
        );
    }

    #[test]
    fn test_email_and_phone_both_found() {
        let text = "Contact jane.doe@example.com or 555-123-4567";
        let spans = scan(text);

        let email: Vec<_> = spans.iter().filter(|s| s.category == "email").collect();
        let phone: Vec<_> = spans.iter().filter(|s| s.category == "phone").collect();
        assert_eq!(email.len(), 1);
        assert_eq!(phone.len(), 1);
        assert_eq!(email[0].value, "jane.doe@example.com");
        assert_eq!(&text[email[0].start..email[0].end], "jane.doe@example.com");
        assert_eq!(phone[0].value, "555-123-4567");
    }

    #[test]
    fn test_ssn_also_matched_by_date_rule() {
        // The looser date rule matches SSN-shaped strings too; rule order plus
        // the deduplication tie-break decides which survives downstream.
        let spans = scan("SSN 123-45-6789 on file");
        let categories: Vec<_> = spans.iter().map(|s| s.category.as_str()).collect();
        assert!(categories.contains(&"nationalId"));
        assert!(categories.contains(&"date"));
        let national = spans.iter().position(|s| s.category == "nationalId").unwrap();
        let date = spans.iter().position(|s| s.category == "date").unwrap();
        assert!(national < date);
    }

    #[test]
    fn test_credit_card_grouped_and_plain() {
        let spans = scan("card 4111 1111 1111 1111 or 4222222222222222");
        let cards: Vec<_> = spans.iter().filter(|s| s.category == "creditCard").collect();
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn test_ip_address_found() {
        let spans = scan("host 192.168.10.42 is up");
        let ips: Vec<_> = spans.iter().filter(|s| s.category == "ipAddress").collect();
        assert_eq!(ips.len(), 1);
        assert_eq!(ips[0].value, "192.168.10.42");
    }

    #[test]
    fn test_dates_in_common_forms() {
        let spans = scan("on 2024-08-07 and again 8/7/2024");
        let dates: Vec<_> = spans.iter().filter(|s| s.category == "date").collect();
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn test_rescan_yields_identical_results() {
        let text = "mail root@example.org, ip 10.0.0.1";
        let first = scan(text);
        let second = scan(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        assert!(scan("nothing sensitive here").is_empty());
    }

    #[test]
    fn test_placeholder_matches_no_rule() {
        assert!(scan("[REDACTED_EMAIL] and [REDACTED_SSN]").is_empty());
    }
}
