// Plausibility Filter
// Per-category confidence floors and format sanity checks

use crate::models::Span;
use tracing::debug;

use super::categories::is_identifier_like;

/// Format validators composable per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    EmailShape,
    PhoneShape,
    DateShape,
    AddressShape,
    NationalIdDigits,
    NetworkAddressShape,
}

/// Confidence floor plus the format checks that apply to a category.
pub struct CategoryPolicy {
    pub floor: f64,
    pub checks: &'static [Check],
}

/// Floors are high for high-harm, high-false-positive categories (government
/// id numbers, card numbers, phone numbers) and low for broad ones (city
/// names). Pattern spans carry confidence 1.0 and clear every floor; they are
/// still subject to the same format checks.
fn policy_for(category: &str) -> CategoryPolicy {
    match category {
        "nationalId" => CategoryPolicy { floor: 0.80, checks: &[Check::NationalIdDigits] },
        "creditCard" => CategoryPolicy { floor: 0.80, checks: &[] },
        "phone" => CategoryPolicy { floor: 0.70, checks: &[Check::PhoneShape] },
        "ipAddress" => CategoryPolicy { floor: 0.65, checks: &[Check::NetworkAddressShape] },
        "date" => CategoryPolicy { floor: 0.55, checks: &[Check::DateShape] },
        "email" => CategoryPolicy { floor: 0.50, checks: &[Check::EmailShape] },
        "address" => CategoryPolicy { floor: 0.45, checks: &[Check::AddressShape] },
        "city" => CategoryPolicy { floor: 0.35, checks: &[] },
        _ => CategoryPolicy { floor: 0.50, checks: &[] },
    }
}

/// Short pronoun/noun strings the classifier occasionally labels as email.
const EMAIL_STOPWORDS: &[&str] = &["me", "my", "it", "is", "am", "hi", "ok", "mail", "email"];
const PHONE_SEPARATORS: &[char] = &['-', '.', ' ', '(', ')'];
const DATE_SEPARATORS: &[char] = &['/', '-', '.'];
const TRAILING_SEPARATORS: &[char] = &['/', '-', '.', ' ', ':'];

fn digit_count(value: &str) -> usize {
    value.chars().filter(|c| c.is_ascii_digit()).count()
}

fn looks_like_placeholder(value: &str) -> bool {
    value.starts_with("[REDACTED_") && value.ends_with(']')
}

fn check_passes(check: Check, value: &str) -> bool {
    match check {
        Check::EmailShape => {
            (value.contains('@') || value.contains('.'))
                && !EMAIL_STOPWORDS.contains(&value.trim().to_lowercase().as_str())
        }
        Check::PhoneShape => {
            let digits = digit_count(value);
            let first = value.chars().next();
            let last = value.chars().last();
            (7..=15).contains(&digits)
                && first.map_or(false, |c| !PHONE_SEPARATORS.contains(&c))
                && last.map_or(false, |c| !PHONE_SEPARATORS.contains(&c))
        }
        Check::DateShape => {
            let digits = digit_count(value);
            digits >= 4
                && !value.ends_with(TRAILING_SEPARATORS)
                && (value.contains(DATE_SEPARATORS) || digits >= 6)
        }
        Check::AddressShape => {
            let chars = value.chars().count();
            let all_numeric = !value.is_empty() && value.chars().all(|c| c.is_ascii_digit());
            chars >= 3 && !(all_numeric && chars < 5)
        }
        Check::NationalIdDigits => digit_count(value) >= 9,
        Check::NetworkAddressShape => {
            let prefix_digits = value.chars().take_while(|c| c.is_ascii_digit()).count();
            prefix_digits >= 1 && value.chars().nth(prefix_digits) == Some('.')
        }
    }
}

fn value_plausible(category: &str, value: &str) -> bool {
    if value.chars().count() < 2 {
        return false;
    }
    if looks_like_placeholder(value) {
        return false;
    }
    // Mixed letters and digits without @ or . is tokenization noise for
    // anything that is not an identifier-like category.
    let has_alpha = value.chars().any(|c| c.is_alphabetic());
    let has_digit = value.chars().any(|c| c.is_ascii_digit());
    if has_alpha
        && has_digit
        && !value.contains('@')
        && !value.contains('.')
        && !is_identifier_like(category)
    {
        return false;
    }
    policy_for(category)
        .checks
        .iter()
        .all(|&check| check_passes(check, value))
}

/// True when the span clears its category floor and every applicable format
/// check. Format checks apply regardless of confidence.
pub fn span_passes(span: &Span) -> bool {
    if span.confidence <= policy_for(&span.category).floor {
        return false;
    }
    value_plausible(&span.category, &span.value)
}

pub fn filter_spans(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter(|span| {
            let keep = span_passes(span);
            if !keep {
                debug!(
                    "[FILTER] dropped {} span {:?} (conf {:.2})",
                    span.category, span.value, span.confidence
                );
            }
            keep
        })
        .collect()
}
