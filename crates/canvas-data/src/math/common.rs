use std::{fmt, str::Chars};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::format::{format_number, NumberLocale, Precision};

/// Sentinel exposed by [`CharStream::current`] once the input is exhausted.
pub const STREAM_END: char = '\0';

/// Whitespace-skipping cursor shared by every parser in this module.
///
/// The current character is never whitespace; it is [`STREAM_END`] once the
/// source has been consumed. The cursor only ever moves forward.
#[derive(Debug, Clone)]
pub struct CharStream<'a> {
    chars: Chars<'a>,
    current: char,
    consumed: usize,
}

impl<'a> CharStream<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut stream = Self {
            chars: source.chars(),
            current: STREAM_END,
            consumed: 0,
        };
        stream.advance();
        stream
    }

    pub fn current(&self) -> char {
        self.current
    }

    pub fn is_at_end(&self) -> bool {
        self.current == STREAM_END
    }

    /// Number of characters read so far, whitespace included.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn advance(&mut self) {
        loop {
            self.current = match self.chars.next() {
                Some(next) => {
                    self.consumed += 1;
                    next
                }
                None => STREAM_END,
            };
            if !self.current.is_whitespace() {
                break;
            }
        }
    }

    /// Consumes `expected` or fails with the error describing the current character.
    pub fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        if self.current != expected {
            return Err(self.unexpected());
        }
        self.advance();
        Ok(())
    }

    /// Error for the character the cursor is currently stuck on.
    pub fn unexpected(&self) -> ParseError {
        if self.is_at_end() {
            ParseError::EndOfInput
        } else {
            ParseError::UnexpectedCharacter(self.current)
        }
    }
}

/// Failures raised while parsing or evaluating calculator, unit and tempo input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    EndOfInput,
    #[error("unexpected character `{0}`")]
    UnexpectedCharacter(char),
    #[error("cannot compute the factorial of the fractional number {0}")]
    FractionalFactorial(f64),
    #[error("{function} is undefined for negative numbers")]
    NegativeArgument { function: &'static str },
    #[error("{function} is undefined for infinity")]
    InfiniteArgument { function: &'static str },
    #[error("{function} is undefined for numbers greater than 1")]
    ArgumentGreaterThanOne { function: &'static str },
    #[error("{function} is undefined for numbers smaller than 1")]
    ArgumentSmallerThanOne { function: &'static str },
    #[error("unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("unknown function `{}` for arguments ({})", .name, join_numbers(.arguments))]
    UnknownFunction { name: String, arguments: Vec<f64> },
    #[error("logarithm to base 0 is undefined")]
    LogBaseZero,
    #[error("logarithm to base 1 is undefined")]
    LogBaseOne,
    #[error("logarithm of infinity to base infinity is undefined")]
    LogInfinityInfinity,
    #[error("`{0}` is not a number")]
    NumberFormat(String),
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("cannot convert {unit} ({unit_type}) to {target} ({target_type})")]
    IncompatibleUnits {
        unit: String,
        unit_type: String,
        target: String,
        target_type: String,
    },
}

impl ParseError {
    pub fn message_key(&self) -> MessageKey {
        match self {
            ParseError::EndOfInput => MessageKey::EndOfInput,
            ParseError::UnexpectedCharacter(_) => MessageKey::UnexpectedCharacter,
            ParseError::FractionalFactorial(_) => MessageKey::FractionalFactorial,
            ParseError::NegativeArgument { .. } => MessageKey::FunctionOfNegative,
            ParseError::InfiniteArgument { .. } => MessageKey::FunctionOfInfinity,
            ParseError::ArgumentGreaterThanOne { .. } => MessageKey::FunctionOfGreaterThanOne,
            ParseError::ArgumentSmallerThanOne { .. } => MessageKey::FunctionOfSmallerThanOne,
            ParseError::UnknownVariable(_) => MessageKey::UnknownVariable,
            ParseError::UnknownFunction { .. } => MessageKey::UnknownFunction,
            ParseError::LogBaseZero => MessageKey::LogOfZero,
            ParseError::LogBaseOne => MessageKey::LogOfOne,
            ParseError::LogInfinityInfinity => MessageKey::LogOfInfinityInfinity,
            ParseError::NumberFormat(_) => MessageKey::NumberFormat,
            ParseError::UnknownUnit(_) => MessageKey::UnknownUnit,
            ParseError::IncompatibleUnits { .. } => MessageKey::IncompatibleUnits,
        }
    }

    /// Positional arguments for the message template of [`Self::message_key`].
    pub fn format_args(&self) -> Vec<FormatArg> {
        match self {
            ParseError::EndOfInput
            | ParseError::LogBaseZero
            | ParseError::LogBaseOne
            | ParseError::LogInfinityInfinity => Vec::new(),
            ParseError::UnexpectedCharacter(character) => {
                vec![FormatArg::Text(character.to_string())]
            }
            ParseError::FractionalFactorial(value) => vec![FormatArg::Number(*value)],
            ParseError::NegativeArgument { function }
            | ParseError::InfiniteArgument { function }
            | ParseError::ArgumentGreaterThanOne { function }
            | ParseError::ArgumentSmallerThanOne { function } => {
                vec![FormatArg::Text((*function).to_string())]
            }
            ParseError::UnknownVariable(name)
            | ParseError::NumberFormat(name)
            | ParseError::UnknownUnit(name) => vec![FormatArg::Text(name.clone())],
            ParseError::UnknownFunction { name, arguments } => match arguments.as_slice() {
                [single] => vec![FormatArg::Text(name.clone()), FormatArg::Number(*single)],
                _ => vec![
                    FormatArg::Text(name.clone()),
                    FormatArg::Text(join_numbers(arguments)),
                ],
            },
            ParseError::IncompatibleUnits {
                unit,
                unit_type,
                target,
                target_type,
            } => vec![
                FormatArg::Text(unit.clone()),
                FormatArg::Text(unit_type.clone()),
                FormatArg::Text(target.clone()),
                FormatArg::Text(target_type.clone()),
            ],
        }
    }
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|value| format_number(*value, Precision::Unlimited, &NumberLocale::default()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Opaque localization key handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageKey {
    #[serde(rename = "math_result")]
    MathResult,
    #[serde(rename = "unit_conversion_result")]
    UnitConversionResult,
    #[serde(rename = "charstream_error_end_of_input")]
    EndOfInput,
    #[serde(rename = "charstream_error_unexpected_character")]
    UnexpectedCharacter,
    #[serde(rename = "math_error_fractional_factorial")]
    FractionalFactorial,
    #[serde(rename = "math_error_fun_of_negative")]
    FunctionOfNegative,
    #[serde(rename = "math_error_fun_of_inf")]
    FunctionOfInfinity,
    #[serde(rename = "math_error_fun_of_greater_1")]
    FunctionOfGreaterThanOne,
    #[serde(rename = "math_error_fun_of_smaller_1")]
    FunctionOfSmallerThanOne,
    #[serde(rename = "math_error_unknown_variable")]
    UnknownVariable,
    #[serde(rename = "math_error_unknown_function")]
    UnknownFunction,
    #[serde(rename = "math_error_log_of_0")]
    LogOfZero,
    #[serde(rename = "math_error_log_of_1")]
    LogOfOne,
    #[serde(rename = "math_error_log_of_inf_inf")]
    LogOfInfinityInfinity,
    #[serde(rename = "unit_conversion_error_number_format")]
    NumberFormat,
    #[serde(rename = "unit_conversion_error_unknown_unit")]
    UnknownUnit,
    #[serde(rename = "unit_conversion_error_incompatible_units")]
    IncompatibleUnits,
}

impl MessageKey {
    pub fn all() -> &'static [MessageKey] {
        &[
            MessageKey::MathResult,
            MessageKey::UnitConversionResult,
            MessageKey::EndOfInput,
            MessageKey::UnexpectedCharacter,
            MessageKey::FractionalFactorial,
            MessageKey::FunctionOfNegative,
            MessageKey::FunctionOfInfinity,
            MessageKey::FunctionOfGreaterThanOne,
            MessageKey::FunctionOfSmallerThanOne,
            MessageKey::UnknownVariable,
            MessageKey::UnknownFunction,
            MessageKey::LogOfZero,
            MessageKey::LogOfOne,
            MessageKey::LogOfInfinityInfinity,
            MessageKey::NumberFormat,
            MessageKey::UnknownUnit,
            MessageKey::IncompatibleUnits,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKey::MathResult => "math_result",
            MessageKey::UnitConversionResult => "unit_conversion_result",
            MessageKey::EndOfInput => "charstream_error_end_of_input",
            MessageKey::UnexpectedCharacter => "charstream_error_unexpected_character",
            MessageKey::FractionalFactorial => "math_error_fractional_factorial",
            MessageKey::FunctionOfNegative => "math_error_fun_of_negative",
            MessageKey::FunctionOfInfinity => "math_error_fun_of_inf",
            MessageKey::FunctionOfGreaterThanOne => "math_error_fun_of_greater_1",
            MessageKey::FunctionOfSmallerThanOne => "math_error_fun_of_smaller_1",
            MessageKey::UnknownVariable => "math_error_unknown_variable",
            MessageKey::UnknownFunction => "math_error_unknown_function",
            MessageKey::LogOfZero => "math_error_log_of_0",
            MessageKey::LogOfOne => "math_error_log_of_1",
            MessageKey::LogOfInfinityInfinity => "math_error_log_of_inf_inf",
            MessageKey::NumberFormat => "unit_conversion_error_number_format",
            MessageKey::UnknownUnit => "unit_conversion_error_unknown_unit",
            MessageKey::IncompatibleUnits => "unit_conversion_error_incompatible_units",
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positional message argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatArg {
    Text(String),
    Number(f64),
}

impl fmt::Display for FormatArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatArg::Text(text) => f.write_str(text),
            FormatArg::Number(value) => f.write_str(&format_number(
                *value,
                Precision::Unlimited,
                &NumberLocale::default(),
            )),
        }
    }
}

/// Outcome of a calculator or unit conversion parse.
///
/// `successful` is false both for displayable errors and for numeric results
/// that are not a number; in the error case `key` names the error message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    pub key: MessageKey,
    pub args: Vec<FormatArg>,
    pub successful: bool,
}

impl ParseResult {
    pub fn new(key: MessageKey, args: Vec<FormatArg>, successful: bool) -> Self {
        Self {
            key,
            args,
            successful,
        }
    }

    pub fn failure(error: &ParseError) -> Self {
        Self::new(error.message_key(), error.format_args(), false)
    }

    /// The formatted value of a result message, if this is one.
    pub fn value_text(&self) -> Option<&str> {
        match (self.key, self.args.first()) {
            (
                MessageKey::MathResult | MessageKey::UnitConversionResult,
                Some(FormatArg::Text(text)),
            ) => Some(text),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        !matches!(
            self.key,
            MessageKey::MathResult | MessageKey::UnitConversionResult
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_skips_whitespace() {
        let mut stream = CharStream::new("  1 +\t2 ");
        assert_eq!(stream.current(), '1');
        stream.advance();
        assert_eq!(stream.current(), '+');
        stream.advance();
        assert_eq!(stream.current(), '2');
        stream.advance();
        assert!(stream.is_at_end());
        stream.advance();
        assert_eq!(stream.current(), STREAM_END);
    }

    #[test]
    fn empty_stream_starts_at_end() {
        assert!(CharStream::new("").is_at_end());
        assert!(CharStream::new(" \n ").is_at_end());
    }

    #[test]
    fn expect_reports_current_character() {
        let mut stream = CharStream::new("(x");
        assert!(stream.expect('(').is_ok());
        assert_eq!(
            stream.expect(')'),
            Err(ParseError::UnexpectedCharacter('x'))
        );
        stream.advance();
        assert_eq!(stream.expect(')'), Err(ParseError::EndOfInput));
    }

    #[test]
    fn errors_map_to_keys_and_arguments() {
        let error = ParseError::IncompatibleUnits {
            unit: "m".to_string(),
            unit_type: "length".to_string(),
            target: "s".to_string(),
            target_type: "time".to_string(),
        };
        assert_eq!(error.message_key().as_str(), "unit_conversion_error_incompatible_units");
        assert_eq!(error.format_args().len(), 4);

        let unknown = ParseError::UnknownFunction {
            name: "foo".to_string(),
            arguments: vec![1.0, 2.5],
        };
        assert_eq!(
            unknown.format_args(),
            vec![
                FormatArg::Text("foo".to_string()),
                FormatArg::Text("1, 2.5".to_string())
            ]
        );
    }

    #[test]
    fn failure_results_are_unsuccessful() {
        let result = ParseResult::failure(&ParseError::LogBaseOne);
        assert!(!result.successful);
        assert!(result.is_error());
        assert_eq!(result.value_text(), None);
    }

    #[test]
    fn message_keys_serialize_as_resource_names() {
        let json = serde_json::to_string(&MessageKey::FunctionOfGreaterThanOne).unwrap();
        assert_eq!(json, "\"math_error_fun_of_greater_1\"");
        for key in MessageKey::all() {
            let json = serde_json::to_string(key).unwrap();
            assert_eq!(json.trim_matches('"'), key.as_str());
        }
    }
}
