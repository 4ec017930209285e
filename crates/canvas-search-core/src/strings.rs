//! English display strings.

use canvas_data::math::{
    format_number, FormatArg, MessageKey, NumberLocale, ParseResult, Precision, TempoName,
};

use crate::special::SearchProvider;

/// Template for a message key; `{0}`, `{1}`, ... are positional arguments.
pub fn template(key: MessageKey) -> &'static str {
    match key {
        MessageKey::MathResult | MessageKey::UnitConversionResult => "= {0}",
        MessageKey::EndOfInput => "Unexpected end of input",
        MessageKey::UnexpectedCharacter => "Unexpected character: {0}",
        MessageKey::FractionalFactorial => "The factorial of {0} is undefined: not an integer",
        MessageKey::FunctionOfNegative => "{0} is undefined for negative numbers",
        MessageKey::FunctionOfInfinity => "{0} is undefined for infinity",
        MessageKey::FunctionOfGreaterThanOne => "{0} is undefined for numbers greater than 1",
        MessageKey::FunctionOfSmallerThanOne => "{0} is undefined for numbers smaller than 1",
        MessageKey::UnknownVariable => "Unknown variable: {0}",
        MessageKey::UnknownFunction => "Unknown function: {0}({1})",
        MessageKey::LogOfZero => "The logarithm to base 0 is undefined",
        MessageKey::LogOfOne => "The logarithm to base 1 is undefined",
        MessageKey::LogOfInfinityInfinity => {
            "The logarithm of infinity to base infinity is undefined"
        }
        MessageKey::NumberFormat => "Not a number: {0}",
        MessageKey::UnknownUnit => "Unknown unit: {0}",
        MessageKey::IncompatibleUnits => "Cannot convert {0} ({1}) to {2} ({3})",
    }
}

/// Display name of a tempo marking, capitalized as written on a score.
pub fn tempo_name(name: TempoName) -> &'static str {
    match name {
        TempoName::Larghissimo => "Larghissimo",
        TempoName::Grave => "Grave",
        TempoName::Adagio => "Adagio",
        TempoName::Andante => "Andante",
        TempoName::Moderato => "Moderato",
        TempoName::Allegro => "Allegro",
        TempoName::Presto => "Presto",
        TempoName::Prestissimo => "Prestissimo",
    }
}

pub const OPEN_URL: &str = "Open URL";
pub const METRONOME: &str = "Metronome";

/// Label template of an external search entry; `{0}` is the search term.
pub fn external_search(provider: SearchProvider) -> &'static str {
    match provider {
        SearchProvider::Web => "Search the web for “{0}”",
        SearchProvider::Wikipedia => "Search Wikipedia for “{0}”",
        SearchProvider::AppStore => "Search the app store",
    }
}

/// Renders a parse result with its English template.
pub fn render(result: &ParseResult, locale: &NumberLocale) -> String {
    let args: Vec<String> = result
        .args
        .iter()
        .map(|arg| match arg {
            FormatArg::Text(text) => text.clone(),
            FormatArg::Number(value) => format_number(*value, Precision::Unlimited, locale),
        })
        .collect();
    fill(template(result.key), &args)
}

/// Substitutes `{n}` placeholders. Unknown indices are left as they are.
pub fn fill(template: &str, args: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            Some((args.get(index)?, close))
        });
        match replacement {
            Some((arg, close)) => {
                output.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }
    output.push_str(rest);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_data::math::{parse_arithmetic, parse_unit_conversion};

    #[test]
    fn every_key_has_a_template() {
        for key in MessageKey::all() {
            assert!(!template(*key).is_empty(), "{key}");
        }
        for name in TempoName::all() {
            assert!(!tempo_name(*name).is_empty());
        }
    }

    #[test]
    fn fills_positional_arguments() {
        let args = vec!["a".to_string(), "b".to_string()];
        assert_eq!(fill("{1}{0}", &args), "ba");
        assert_eq!(fill("{2} {x} {", &args), "{2} {x} {");
    }

    #[test]
    fn external_search_labels_name_the_term() {
        let term = vec!["cats".to_string()];
        assert_eq!(
            fill(external_search(SearchProvider::Web), &term),
            "Search the web for “cats”"
        );
        assert_eq!(
            fill(external_search(SearchProvider::Wikipedia), &term),
            "Search Wikipedia for “cats”"
        );
        assert_eq!(
            fill(external_search(SearchProvider::AppStore), &term),
            "Search the app store"
        );
        assert_eq!(tempo_name(TempoName::Prestissimo), "Prestissimo");
    }

    #[test]
    fn renders_parse_results() {
        let english = NumberLocale::ENGLISH;
        let sum = parse_arithmetic("2+2").unwrap();
        assert_eq!(render(&sum, &english), "= 4");

        let incompatible = parse_unit_conversion("5 m to s").unwrap();
        assert_eq!(
            render(&incompatible, &english),
            "Cannot convert m (length) to s (time)"
        );

        let factorial = parse_arithmetic("=2.5!").unwrap();
        assert_eq!(
            render(&factorial, &NumberLocale::from_tag("de")),
            "The factorial of 2,5 is undefined: not an integer"
        );
    }
}
