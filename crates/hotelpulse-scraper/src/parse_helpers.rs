//! Text-to-number primitives for rating-panel fields.
//!
//! Listing pages render numbers with locale-dependent separators and
//! abbreviations; these helpers normalize them without judging range.

use std::sync::LazyLock;

use regex::Regex;

/// First signed decimal in the text. The fractional separator may be `.` or `,`.
/// Only ASCII digits count; `\d` would also match other scripts' digits.
static RATING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<sign>[-+]?)(?P<int>[0-9]+)(?:(?P<sep>[.,])(?P<frac>[0-9]+))?")
        .expect("valid regex")
});

/// A grouped integer (`1,204`, `12 345`, `1'204`) or a plain number, with an
/// optional `K`/`M` suffix. A letter right after the suffix means the suffix is
/// the start of a word, not a multiplier.
static COUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?P<sign>[-+]?)(?:(?P<grouped>[0-9]{1,3}(?:[,.' \u{A0}\u{202F}][0-9]{3})+)|(?P<plain>[0-9]+(?:[.,][0-9]+)?))\s*(?:(?P<suffix>[kKmM])(?P<tail>\p{L})?)?",
    )
    .expect("valid regex")
});

/// Parses the first decimal number in `text`.
///
/// Handles `"4.3"`, `"4,3"`, `"4.3 stars"`, `"Rated 4.5 out of 5"`. A comma
/// followed by exactly three digits is read as a thousands separator, so
/// `"1,234"` yields `1234.0`.
pub(crate) fn parse_rating(text: &str) -> Option<f64> {
    let caps = RATING_RE.captures(text)?;
    let whole = caps.get(0)?;
    if touches_other_digits(text, whole.start(), whole.end()) {
        return None;
    }
    let sign = &caps["sign"];
    let int = &caps["int"];
    let normalized = match (caps.name("sep").map(|m| m.as_str()), caps.name("frac")) {
        (Some(","), Some(frac)) if frac.as_str().len() == 3 => format!("{sign}{int}{}", frac.as_str()),
        (Some(_), Some(frac)) => format!("{sign}{int}.{}", frac.as_str()),
        _ => format!("{sign}{int}"),
    };
    normalized.parse::<f64>().ok()
}

/// Parses the first review count in `text`.
///
/// Handles `"1,204 reviews"`, `"(980)"`, `"12 345"` (plain, non-breaking, or
/// narrow non-breaking space), `"1.204"`, `"1'204"`, `"1.2K"` and `"3M"`.
/// A fractional number without a `K`/`M` multiplier is not a count.
/// The sign is preserved so the caller can reject negatives as out of range.
pub(crate) fn parse_review_count(text: &str) -> Option<i64> {
    let caps = COUNT_RE.captures(text)?;
    let number = caps.name("grouped").or_else(|| caps.name("plain"))?;
    if touches_other_digits(text, caps.get(0)?.start(), number.end()) {
        return None;
    }
    let negative = &caps["sign"] == "-";
    let multiplier = match (caps.name("suffix"), caps.name("tail")) {
        (Some(suffix), None) if suffix.as_str().eq_ignore_ascii_case("k") => Some(1_000_f64),
        (Some(_), None) => Some(1_000_000_f64),
        _ => None,
    };

    let magnitude = if let Some(grouped) = caps.name("grouped") {
        let digits: String = grouped.as_str().chars().filter(char::is_ascii_digit).collect();
        match multiplier {
            Some(m) => scale(digits.parse::<f64>().ok()?, m)?,
            None => digits.parse::<i64>().ok()?,
        }
    } else {
        let plain = caps.name("plain")?.as_str();
        match multiplier {
            Some(m) => scale(plain.replace(',', ".").parse::<f64>().ok()?, m)?,
            None if plain.chars().all(|c| c.is_ascii_digit()) => plain.parse::<i64>().ok()?,
            None => return None,
        }
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// `true` when the ASCII number at `start..end` continues into non-ASCII
/// digits, directly or across one separator, as in `1,٢٣٤`.
fn touches_other_digits(text: &str, start: usize, end: usize) -> bool {
    leads_to_other_digit(text[end..].chars()) || leads_to_other_digit(text[..start].chars().rev())
}

fn leads_to_other_digit(mut chars: impl Iterator<Item = char>) -> bool {
    let other_digit = |c: char| c.is_numeric() && !c.is_ascii_digit();
    match chars.next() {
        Some(c) if matches!(c, ',' | '.' | '\'' | ' ' | '\u{A0}' | '\u{202F}') => {
            chars.next().is_some_and(other_digit)
        }
        Some(c) => other_digit(c),
        None => false,
    }
}

/// Multiplies an abbreviated count, refusing results an `i64` cannot hold.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scale(value: f64, multiplier: f64) -> Option<i64> {
    let scaled = (value * multiplier).round();
    if !scaled.is_finite() || scaled.abs() >= i64::MAX as f64 {
        return None;
    }
    Some(scaled as i64)
}
