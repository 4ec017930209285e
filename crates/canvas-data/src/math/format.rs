use serde::{Deserialize, Serialize};

/// Magnitudes at or above this are shown in scientific notation.
pub const SCIENTIFIC_NOTATION_MAX_THRESHOLD: f64 = 999_999_999_999.0;
/// Non-zero magnitudes below this are shown in scientific notation.
pub const SCIENTIFIC_NOTATION_MIN_THRESHOLD: f64 = 0.000_000_1;

const DEFAULT_FRACTION_DIGITS: usize = 6;

/// Separators used when rendering numbers for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberLocale {
    pub decimal_separator: char,
    pub grouping_separator: Option<char>,
}

impl NumberLocale {
    pub const ENGLISH: NumberLocale = NumberLocale {
        decimal_separator: '.',
        grouping_separator: Some(','),
    };

    /// Resolves a BCP 47 style tag such as `de`, `fr-FR` or `de_CH`.
    /// Unknown languages fall back to English separators.
    pub fn from_tag(tag: &str) -> Self {
        let normalized = tag.trim().to_lowercase().replace('_', "-");
        let mut parts = normalized.split('-');
        let language = parts.next().unwrap_or_default();
        let region = parts.next().unwrap_or_default();

        match (language, region) {
            ("de" | "it" | "fr", "ch") | ("rm", _) => NumberLocale {
                decimal_separator: '.',
                grouping_separator: Some('’'),
            },
            ("de" | "es" | "it" | "nl" | "pt" | "id" | "tr" | "da", _) => NumberLocale {
                decimal_separator: ',',
                grouping_separator: Some('.'),
            },
            ("fr" | "ru" | "pl" | "cs" | "sk" | "sv" | "fi" | "nb" | "uk", _) => NumberLocale {
                decimal_separator: ',',
                grouping_separator: Some('\u{202f}'),
            },
            _ => NumberLocale::ENGLISH,
        }
    }
}

impl Default for NumberLocale {
    fn default() -> Self {
        NumberLocale::ENGLISH
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Shortest representation that round-trips.
    Unlimited,
    /// At most six fraction digits, trailing zeros dropped.
    Default,
}

/// Renders a number for display, switching to `1.5E12` notation for very
/// large and very small magnitudes.
pub fn format_number(value: f64, precision: Precision, locale: &NumberLocale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let plain_range = SCIENTIFIC_NOTATION_MIN_THRESHOLD..SCIENTIFIC_NOTATION_MAX_THRESHOLD;
    if !plain_range.contains(&value.abs()) {
        return scientific(value, precision, locale);
    }

    let plain = match precision {
        Precision::Unlimited => value.to_string(),
        Precision::Default => {
            trim_fraction(&format!("{value:.prec$}", prec = DEFAULT_FRACTION_DIGITS))
                .to_string()
        }
    };
    localize(&plain, locale, true)
}

fn scientific(value: f64, precision: Precision, locale: &NumberLocale) -> String {
    let raw = match precision {
        Precision::Unlimited => format!("{value:e}"),
        Precision::Default => format!("{value:.prec$e}", prec = DEFAULT_FRACTION_DIGITS),
    };
    let (mantissa, exponent) = raw.split_once('e').unwrap_or((raw.as_str(), "0"));
    format!(
        "{}E{exponent}",
        localize(trim_fraction(mantissa), locale, false)
    )
}

fn trim_fraction(number: &str) -> &str {
    let trimmed = if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    };
    match trimmed {
        "-0" | "" => "0",
        other => other,
    }
}

fn localize(plain: &str, locale: &NumberLocale, grouping: bool) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (unsigned, None),
    };

    let mut output = String::with_capacity(plain.len() + integer.len() / 3 + 1);
    output.push_str(sign);
    match locale.grouping_separator {
        Some(separator) if grouping => {
            let digits = integer.len();
            for (index, digit) in integer.chars().enumerate() {
                if index > 0 && (digits - index) % 3 == 0 {
                    output.push(separator);
                }
                output.push(digit);
            }
        }
        _ => output.push_str(integer),
    }
    if let Some(fraction) = fraction {
        output.push(locale.decimal_separator);
        output.push_str(fraction);
    }
    output
}
