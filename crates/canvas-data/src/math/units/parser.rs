use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::converter::{convert_all, default_conversion, Unit, UnitValue};
use super::data::{BaseUnit, NamedUnit, Prefix};
use crate::math::common::{CharStream, FormatArg, MessageKey, ParseError, ParseResult, STREAM_END};
use crate::math::format::NumberLocale;

static CONVERSION_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) (?:to|in) ").expect("conversion delimiter regex"));

/// Converts `"<value> <unit>... [to|in <unit>]"`, e.g. `"1m 50cm in ft"`.
///
/// With an explicit target every problem is reported as an unsuccessful
/// result. Without one the input is converted to a guessed unit and anything
/// that fails yields `None`.
pub fn parse_unit_conversion(expression: &str) -> Option<ParseResult> {
    parse_unit_conversion_with(expression, &NumberLocale::default())
}

pub fn parse_unit_conversion_with(expression: &str, locale: &NumberLocale) -> Option<ParseResult> {
    if let Some(delimiter) = CONVERSION_DELIMITER.find(expression) {
        let source = &expression[..delimiter.start()];
        let target = &expression[delimiter.end()..];
        let converted = parse_source_values(source).and_then(|values| {
            let target = parse_unit(target)?;
            convert_all(&values, target)
        });
        return Some(match converted {
            Ok(result) => conversion_result(&result, locale),
            Err(error) => ParseResult::failure(&error),
        });
    }

    match guess_conversion(expression) {
        Ok(Some(result)) => Some(conversion_result(&result, locale)),
        Ok(None) => None,
        Err(error) => {
            trace!(target: "canvas_data", %error, "not a unit conversion");
            None
        }
    }
}

fn guess_conversion(expression: &str) -> Result<Option<UnitValue>, ParseError> {
    let values = parse_source_values(expression)?;
    let Some(first) = values.first() else {
        return Ok(None);
    };
    let total = convert_all(&values, first.unit)?;
    Ok(default_conversion(&total))
}

fn conversion_result(value: &UnitValue, locale: &NumberLocale) -> ParseResult {
    ParseResult::new(
        MessageKey::UnitConversionResult,
        vec![FormatArg::Text(value.format(locale))],
        true,
    )
}

/// Splits the source into `(number, unit)` pairs: a run of digits, `.` and
/// `-` followed by everything up to the next such character.
pub fn parse_source_values(source: &str) -> Result<Vec<UnitValue>, ParseError> {
    let mut stream = CharStream::new(source);
    let mut pairs: Vec<(String, String)> = Vec::new();

    loop {
        let mut number = String::new();
        while let digit @ ('0'..='9' | '.' | '-') = stream.current() {
            number.push(digit);
            stream.advance();
        }

        let mut symbol = String::new();
        loop {
            match stream.current() {
                '0'..='9' | '.' | '-' | STREAM_END => break,
                other => symbol.push(other),
            }
            stream.advance();
        }

        pairs.push((number, symbol));
        if stream.is_at_end() {
            break;
        }
    }

    // "1km2" reads as one kilometer squared, not as 1 km followed by a bare 2.
    if pairs.len() > 1 && pairs.last().is_some_and(|(_, symbol)| symbol.is_empty()) {
        if let Some((number, _)) = pairs.pop() {
            if let Some((_, symbol)) = pairs.last_mut() {
                symbol.push_str(&number);
            }
        }
    }

    pairs
        .into_iter()
        .map(|(number, symbol)| {
            let value = number
                .parse::<f64>()
                .map_err(|_| ParseError::NumberFormat(number.clone()))?;
            Ok(UnitValue::new(value, parse_unit(&symbol)?))
        })
        .collect()
}

/// Resolves a unit symbol.
///
/// Lookup order: named units, prefixed units, then both again ignoring case.
/// Named units go first so that `ft` is a foot rather than a femtotonne.
pub fn parse_unit(symbol: &str) -> Result<Unit, ParseError> {
    let symbol: String = symbol.chars().filter(|c| !c.is_whitespace()).collect();

    if let Some(named) = NamedUnit::ALL
        .iter()
        .find(|named| named.symbols().contains(&symbol.as_str()))
    {
        return Ok(Unit::Named(*named));
    }

    for base in BaseUnit::ALL {
        let Some(stem) = base
            .symbols()
            .iter()
            .find_map(|suffix| symbol.strip_suffix(suffix))
        else {
            continue;
        };
        if let Some(prefix) = prefix_exact(stem) {
            return Ok(Unit::prefixed(base, prefix));
        }
    }

    if let Some(named) = NamedUnit::ALL.iter().find(|named| {
        named
            .symbols()
            .iter()
            .any(|candidate| eq_ignore_case(candidate, &symbol))
    }) {
        return Ok(Unit::Named(*named));
    }

    let loose = BaseUnit::ALL.iter().find_map(|base| {
        base.symbols()
            .iter()
            .find_map(|suffix| strip_suffix_ignore_case(&symbol, suffix))
            .map(|stem| (*base, stem))
    });
    if let Some((base, stem)) = loose {
        let prefix = prefix_exact(stem).or_else(|| {
            Prefix::ALL.into_iter().find(|prefix| {
                prefix
                    .symbols()
                    .iter()
                    .any(|candidate| eq_ignore_case(candidate, stem))
            })
        });
        if let Some(prefix) = prefix {
            return Ok(Unit::prefixed(base, prefix));
        }
    }

    Err(ParseError::UnknownUnit(symbol))
}

fn prefix_exact(stem: &str) -> Option<Prefix> {
    Prefix::ALL
        .into_iter()
        .find(|prefix| prefix.symbols().contains(&stem))
}

fn same_char_ignore_case(left: char, right: char) -> bool {
    left == right
        || left.to_uppercase().eq(right.to_uppercase())
        || left.to_lowercase().eq(right.to_lowercase())
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars().count() == right.chars().count()
        && left
            .chars()
            .zip(right.chars())
            .all(|(l, r)| same_char_ignore_case(l, r))
}

fn strip_suffix_ignore_case<'s>(text: &'s str, suffix: &str) -> Option<&'s str> {
    let text_len = text.chars().count();
    let suffix_len = suffix.chars().count();
    if suffix_len > text_len {
        return None;
    }
    let split = text
        .char_indices()
        .nth(text_len - suffix_len)
        .map_or(text.len(), |(index, _)| index);
    let (stem, tail) = text.split_at(split);
    eq_ignore_case(tail, suffix).then_some(stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shown(expression: &str) -> Option<String> {
        parse_unit_conversion(expression)
            .and_then(|result| result.value_text().map(str::to_string))
    }

    #[test]
    fn resolves_named_before_prefixed() {
        assert_eq!(parse_unit("ft"), Ok(Unit::Named(NamedUnit::Foot)));
        assert_eq!(parse_unit("h"), Ok(Unit::Named(NamedUnit::Hour)));
        assert_eq!(parse_unit("c"), Ok(Unit::Named(NamedUnit::Cup)));
        assert_eq!(parse_unit("min"), Ok(Unit::Named(NamedUnit::Minute)));
    }

    #[test]
    fn resolves_prefixed_units() {
        assert_eq!(
            parse_unit("km"),
            Ok(Unit::prefixed(BaseUnit::Meter, Prefix::Kilo))
        );
        assert_eq!(
            parse_unit("kilometers"),
            Ok(Unit::prefixed(BaseUnit::Meter, Prefix::Kilo))
        );
        assert_eq!(parse_unit("m"), Ok(Unit::base(BaseUnit::Meter)));
        assert_eq!(
            parse_unit("ms"),
            Ok(Unit::prefixed(BaseUnit::Second, Prefix::Milli))
        );
        assert_eq!(
            parse_unit("MiB"),
            Ok(Unit::prefixed(BaseUnit::Byte, Prefix::Mebi))
        );
        assert_eq!(
            parse_unit("km2"),
            Ok(Unit::prefixed(BaseUnit::SquareMeter, Prefix::Kilo))
        );
        assert_eq!(
            parse_unit("mL"),
            Ok(Unit::prefixed(BaseUnit::Liter, Prefix::Milli))
        );
    }

    #[test]
    fn falls_back_to_case_insensitive_lookup() {
        assert_eq!(parse_unit("FT"), Ok(Unit::Named(NamedUnit::Foot)));
        assert_eq!(
            parse_unit("KM"),
            Ok(Unit::prefixed(BaseUnit::Meter, Prefix::Kilo))
        );
        assert_eq!(
            parse_unit("KG"),
            Ok(Unit::prefixed(BaseUnit::Gram, Prefix::Kilo))
        );
        // The first base unit with a matching suffix decides; "m" wins here.
        assert!(parse_unit("Kilogram").is_err());
        assert_eq!(
            parse_unit("xyz"),
            Err(ParseError::UnknownUnit("xyz".to_string()))
        );
    }

    #[test]
    fn splits_source_pairs() {
        let values = parse_source_values("1m 50cm").unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1].value, 50.0);
        assert_eq!(values[1].unit, Unit::prefixed(BaseUnit::Meter, Prefix::Centi));

        let folded = parse_source_values("1km2").unwrap();
        assert_eq!(
            folded,
            vec![UnitValue::new(
                1.0,
                Unit::prefixed(BaseUnit::SquareMeter, Prefix::Kilo)
            )]
        );

        assert_eq!(
            parse_source_values("1.2.3 m"),
            Err(ParseError::NumberFormat("1.2.3".to_string()))
        );
        assert_eq!(
            parse_source_values("meter"),
            Err(ParseError::NumberFormat(String::new()))
        );
    }

    #[test]
    fn explicit_targets() {
        assert_eq!(shown("1 m to cm").as_deref(), Some("100 cm"));
        assert_eq!(shown("1m 50cm in cm").as_deref(), Some("150 cm"));
        assert_eq!(shown("2 KiB TO bit").as_deref(), Some("16,384 bit"));
        assert_eq!(shown("30 °C to °F").as_deref(), Some("86 °F"));
        assert_eq!(shown("1 square meter in cm2").as_deref(), Some("10,000 cm²"));
    }

    #[test]
    fn explicit_target_errors_are_shown() {
        let incompatible = parse_unit_conversion("5 m to s").unwrap();
        assert!(!incompatible.successful);
        assert_eq!(incompatible.key, MessageKey::IncompatibleUnits);
        assert_eq!(
            incompatible.args,
            vec![
                FormatArg::Text("m".to_string()),
                FormatArg::Text("length".to_string()),
                FormatArg::Text("s".to_string()),
                FormatArg::Text("time".to_string()),
            ]
        );

        let unknown = parse_unit_conversion("5 m to parsec").unwrap();
        assert_eq!(unknown.key, MessageKey::UnknownUnit);

        let number = parse_unit_conversion("things to do").unwrap();
        assert_eq!(number.key, MessageKey::NumberFormat);
    }

    #[test]
    fn guessed_targets() {
        assert_eq!(shown("90 s").as_deref(), Some("1.5 min"));
        assert_eq!(shown("1km2").as_deref(), Some("1,195,990.046301 yd²"));
        assert_eq!(shown("1 inch").as_deref(), Some("2.54 cm"));
        assert_eq!(shown("5 ft 11 in").as_deref(), Some("1.8034 m"));
    }

    #[test]
    fn guesses_fail_silently() {
        assert_eq!(parse_unit_conversion("hello"), None);
        assert_eq!(parse_unit_conversion("5"), None);
        assert_eq!(parse_unit_conversion("5 m 3 s"), None);
        assert_eq!(parse_unit_conversion(""), None);
    }

    #[test]
    fn localized_results() {
        let german = NumberLocale::from_tag("de");
        let result = parse_unit_conversion_with("1.5 km to m", &german).unwrap();
        assert_eq!(result.value_text(), Some("1.500 m"));
    }
}
