//! Calculator grammar, evaluated while it is parsed.
//!
//! ```text
//! term    := ['+'|'-'] product (('+'|'-') ['+'|'-'] product)*
//! product := factor (['*'|'/'|...] factor | '!' | superscript | '^' power)*
//! factor  := number ['%'] | bracket | '|' term '|' | '√' radicand
//!          | name ['(' term (',' term)* ')']
//! ```
//!
//! Every production consumes input for as long as it understands it and hands
//! the first unknown character back to its caller.

use std::f64::consts::{E, PI};

use tracing::trace;

use super::common::{CharStream, FormatArg, MessageKey, ParseError, ParseResult};
use super::format::{format_number, NumberLocale, Precision};

/// Evaluates a calculator expression such as `2(3+4)²` or `=log(8, 2)`.
///
/// Returns `None` when the text is not an expression. A leading `=` switches
/// to showing parse and domain errors as unsuccessful results instead.
pub fn parse_arithmetic(expression: &str) -> Option<ParseResult> {
    parse_arithmetic_with(expression, &NumberLocale::default())
}

pub fn parse_arithmetic_with(expression: &str, locale: &NumberLocale) -> Option<ParseResult> {
    let mut parser = ExpressionParser::new(expression);
    let show_errors = parser.stream.current() == '=';
    if show_errors {
        parser.stream.advance();
    }

    match parser.parse() {
        Ok(value) => Some(ParseResult::new(
            MessageKey::MathResult,
            vec![FormatArg::Text(format_number(
                value,
                Precision::Unlimited,
                locale,
            ))],
            !value.is_nan(),
        )),
        Err(error) if show_errors => Some(ParseResult::failure(&error)),
        Err(error) => {
            trace!(target: "canvas_data", %error, "not an arithmetic expression");
            None
        }
    }
}

/// Evaluates an expression to a number, without any formatting.
pub fn evaluate(expression: &str) -> Result<f64, ParseError> {
    ExpressionParser::new(expression).parse()
}

struct ExpressionParser<'a> {
    stream: CharStream<'a>,
}

/// Pending factors of a product; divisions are remembered per factor and
/// applied when the product is closed, so postfix operators act on the
/// divisor itself.
#[derive(Default)]
struct Factors {
    values: Vec<(f64, bool)>,
    invert_next: bool,
}

impl Factors {
    fn push(&mut self, value: f64) {
        self.values.push((value, self.invert_next));
        self.invert_next = false;
    }

    fn last_mut(&mut self) -> Option<&mut f64> {
        self.values.last_mut().map(|(value, _)| value)
    }

    fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn product(&self) -> f64 {
        self.values.iter().fold(1.0, |product, &(value, inverted)| {
            if inverted {
                product * (1.0 / value)
            } else {
                product * value
            }
        })
    }
}

impl<'a> ExpressionParser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            stream: CharStream::new(source),
        }
    }

    fn parse(&mut self) -> Result<f64, ParseError> {
        let result = self.term(false)?;
        if !self.stream.is_at_end() {
            return Err(self.stream.unexpected());
        }
        Ok(result)
    }

    /// Sum of signed products. `in_absolute` lets a `|` end the term.
    fn term(&mut self, in_absolute: bool) -> Result<f64, ParseError> {
        let mut sum = 0.0;
        let mut has_addend = false;
        loop {
            match self.stream.current() {
                '+' => {
                    self.stream.advance();
                    if self.stream.current() == '-' {
                        self.stream.advance();
                        sum += -self.product(in_absolute)?;
                    } else {
                        sum += self.product(in_absolute)?;
                    }
                }
                '-' => {
                    self.stream.advance();
                    if self.stream.current() == '+' {
                        self.stream.advance();
                        sum += self.product(in_absolute)?;
                    } else {
                        sum += -self.product(in_absolute)?;
                    }
                }
                _ if !has_addend => sum += self.product(in_absolute)?,
                _ => return Ok(sum),
            }
            has_addend = true;
        }
    }

    fn product(&mut self, in_absolute: bool) -> Result<f64, ParseError> {
        let mut factors = Factors::default();
        loop {
            match self.stream.current() {
                '*' | '·' | '×' | '•' | '∙' => self.stream.advance(),
                '/' | '÷' | ':' => {
                    self.stream.advance();
                    factors.invert_next = true;
                }
                '0'..='9' | '.' => {
                    let value = self.number()?;
                    factors.push(value);
                }
                '(' | '[' | '{' => {
                    let value = self.bracket()?;
                    factors.push(value);
                }
                '|' if in_absolute => return self.close(&factors),
                '|' => {
                    let value = self.absolute()?;
                    factors.push(value);
                }
                'a'..='z' | 'A'..='Z' | 'π' | '∞' | '¼'..='¾' | '⅐'..='⅞' => {
                    let value = self.function()?;
                    factors.push(value);
                }
                '!' => {
                    let Some(last) = factors.last_mut() else {
                        return Err(self.stream.unexpected());
                    };
                    *last = factorial(*last)?;
                    self.stream.advance();
                }
                '⁻' | '⁰' | '¹' | '²' | '³' | '⁴'..='⁹' => {
                    if factors.is_empty() {
                        return Err(self.stream.unexpected());
                    }
                    let exponent = self.superscript()?;
                    if let Some(base) = factors.last_mut() {
                        *base = base.powi(exponent);
                    }
                }
                '^' => {
                    if factors.is_empty() {
                        return Err(self.stream.unexpected());
                    }
                    self.stream.advance();
                    let exponent = match self.stream.current() {
                        '0'..='9' => self.number()?,
                        '(' | '[' | '{' => self.bracket()?,
                        _ => return Err(self.stream.unexpected()),
                    };
                    if let Some(base) = factors.last_mut() {
                        *base = base.powf(exponent);
                    }
                }
                '√' => {
                    let value = self.square_root()?;
                    factors.push(value);
                }
                _ => return self.close(&factors),
            }
        }
    }

    fn close(&self, factors: &Factors) -> Result<f64, ParseError> {
        if factors.is_empty() {
            Err(self.stream.unexpected())
        } else {
            Ok(factors.product())
        }
    }

    /// `(...)`, `[...]` or `{...}`; the closing bracket must match the opening one.
    fn bracket(&mut self) -> Result<f64, ParseError> {
        let closing = match self.stream.current() {
            '(' => ')',
            '[' => ']',
            _ => '}',
        };
        self.stream.advance();
        let result = self.term(false)?;
        self.stream.expect(closing)?;
        Ok(result)
    }

    fn absolute(&mut self) -> Result<f64, ParseError> {
        self.stream.advance();
        let result = self.term(true)?;
        self.stream.expect('|')?;
        Ok(result.abs())
    }

    fn square_root(&mut self) -> Result<f64, ParseError> {
        self.stream.advance();
        let radicand = match self.stream.current() {
            '0'..='9' => self.number()?,
            '(' | '[' | '{' => self.bracket()?,
            _ => return Err(self.stream.unexpected()),
        };
        if radicand < 0.0 {
            return Err(ParseError::NegativeArgument { function: "√" });
        }
        Ok(radicand.sqrt())
    }

    /// Unsigned decimal number, optionally followed by `%`.
    fn number(&mut self) -> Result<f64, ParseError> {
        let mut digits = String::new();
        let mut seen_separator = false;
        loop {
            match self.stream.current() {
                digit @ '0'..='9' => digits.push(digit),
                '.' if !seen_separator => {
                    digits.push('.');
                    seen_separator = true;
                }
                '%' => {
                    let value = self.digits_value(&digits)?;
                    self.stream.advance();
                    return Ok(value / 100.0);
                }
                _ => break,
            }
            self.stream.advance();
        }
        self.digits_value(&digits)
    }

    fn digits_value(&self, digits: &str) -> Result<f64, ParseError> {
        if digits.is_empty() || digits == "." {
            return Err(self.stream.unexpected());
        }
        digits.parse().map_err(|_| self.stream.unexpected())
    }

    fn superscript(&mut self) -> Result<i32, ParseError> {
        let mut exponent = String::new();
        if self.stream.current() == '⁻' {
            exponent.push('-');
            self.stream.advance();
        }
        while let Some(digit) = superscript_digit(self.stream.current()) {
            exponent.push(digit);
            self.stream.advance();
        }
        exponent.parse().map_err(|_| self.stream.unexpected())
    }

    /// Named constant or function call; names are case-insensitive.
    fn function(&mut self) -> Result<f64, ParseError> {
        let mut name = String::new();
        loop {
            match self.stream.current() {
                letter @ ('a'..='z' | 'π' | '∞' | '¼'..='¾' | '⅐'..='⅞') => name.push(letter),
                letter @ 'A'..='Z' => name.push(letter.to_ascii_lowercase()),
                _ => break,
            }
            self.stream.advance();
        }

        let mut arguments = Vec::new();
        if self.stream.current() == '(' {
            loop {
                self.stream.advance();
                arguments.push(self.term(false)?);
                if self.stream.current() != ',' {
                    break;
                }
            }
            self.stream.expect(')')?;
        }

        if arguments.is_empty() {
            return constant(&name).ok_or(ParseError::UnknownVariable(name));
        }
        let known = match *arguments.as_slice() {
            [x] => unary(&name, x),
            [x, y] => binary(&name, x, y),
            _ => None,
        };
        match known {
            Some(result) => result,
            None => Err(ParseError::UnknownFunction { name, arguments }),
        }
    }
}

fn superscript_digit(character: char) -> Option<char> {
    Some(match character {
        '⁰' => '0',
        '¹' => '1',
        '²' => '2',
        '³' => '3',
        '⁴' => '4',
        '⁵' => '5',
        '⁶' => '6',
        '⁷' => '7',
        '⁸' => '8',
        '⁹' => '9',
        _ => return None,
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn factorial(value: f64) -> Result<f64, ParseError> {
    if value % 1.0 != 0.0 {
        return Err(ParseError::FractionalFactorial(value));
    }
    let mut result = 1.0;
    for i in 1..=(value as i64) {
        result *= i as f64;
        if result.is_infinite() {
            break;
        }
    }
    Ok(result)
}

fn constant(name: &str) -> Option<f64> {
    Some(match name {
        "inf" | "∞" => f64::INFINITY,
        "pi" | "π" => PI,
        "e" => E,
        "½" => 0.5,
        "⅓" => 1.0 / 3.0,
        "¼" => 0.25,
        "⅕" => 0.2,
        "⅙" => 1.0 / 6.0,
        "⅐" => 1.0 / 7.0,
        "⅛" => 0.125,
        "⅑" => 1.0 / 9.0,
        "⅒" => 0.1,
        "⅔" => 2.0 / 3.0,
        "⅖" => 0.4,
        "¾" => 0.75,
        "⅗" => 0.6,
        "⅜" => 0.375,
        "⅘" => 0.8,
        "⅚" => 5.0 / 6.0,
        "⅝" => 0.625,
        "⅞" => 0.875,
        _ => return None,
    })
}

fn finite(function: &'static str, x: f64) -> Result<f64, ParseError> {
    if x.is_infinite() {
        Err(ParseError::InfiniteArgument { function })
    } else {
        Ok(x)
    }
}

fn at_most_one(function: &'static str, x: f64) -> Result<f64, ParseError> {
    if x.abs() > 1.0 {
        Err(ParseError::ArgumentGreaterThanOne { function })
    } else {
        Ok(x)
    }
}

fn at_least_one(function: &'static str, x: f64) -> Result<f64, ParseError> {
    if x < 1.0 {
        Err(ParseError::ArgumentSmallerThanOne { function })
    } else {
        Ok(x)
    }
}

fn non_negative(function: &'static str, x: f64) -> Result<f64, ParseError> {
    if x < 0.0 {
        Err(ParseError::NegativeArgument { function })
    } else {
        Ok(x)
    }
}

/// `None` when `name` is not a one-argument function.
fn unary(name: &str, x: f64) -> Option<Result<f64, ParseError>> {
    let result = match name {
        "sin" => finite("sin", x).map(f64::sin),
        "asin" => at_most_one("asin", x).map(f64::asin),
        "sinh" => Ok(x.sinh()),
        "asinh" => Ok(x.asinh()),
        "cos" => finite("cos", x).map(f64::cos),
        "acos" => at_most_one("acos", x).map(f64::acos),
        "cosh" => Ok(x.cosh()),
        "acosh" => at_least_one("acosh", x).map(f64::acosh),
        "tan" => finite("tan", x).map(f64::tan),
        "atan" => Ok(x.atan()),
        "tanh" => Ok(x.tanh()),
        "atanh" => at_most_one("atanh", x).map(f64::atanh),
        "sqrt" => non_negative("sqrt", x).map(f64::sqrt),
        "cbrt" => Ok(x.cbrt()),
        "ceil" => Ok(x.ceil()),
        "floor" => Ok(x.floor()),
        "round" => Ok(x.round_ties_even()),
        "ln" => non_negative("ln", x).map(f64::ln),
        "abs" => Ok(x.abs()),
        "sign" => Ok(if x == 0.0 || x.is_nan() { x } else { x.signum() }),
        _ => return None,
    };
    Some(result)
}

/// `None` when `name` is not a two-argument function.
fn binary(name: &str, x: f64, y: f64) -> Option<Result<f64, ParseError>> {
    let result = match name {
        "log" => logarithm(x, y),
        "min" => Ok(if x.is_nan() || y.is_nan() { f64::NAN } else { x.min(y) }),
        "max" => Ok(if x.is_nan() || y.is_nan() { f64::NAN } else { x.max(y) }),
        _ => return None,
    };
    Some(result)
}

fn logarithm(x: f64, base: f64) -> Result<f64, ParseError> {
    if x < 0.0 || base < 0.0 {
        return Err(ParseError::NegativeArgument { function: "log" });
    }
    if base == 0.0 {
        return Err(ParseError::LogBaseZero);
    }
    if base == 1.0 {
        return Err(ParseError::LogBaseOne);
    }
    if x.is_infinite() && base.is_infinite() {
        return Err(ParseError::LogInfinityInfinity);
    }
    Ok(x.ln() / base.ln())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(expression: &str) -> f64 {
        evaluate(expression).unwrap_or_else(|error| panic!("{expression}: {error}"))
    }

    fn shown(expression: &str) -> String {
        parse_arithmetic(expression)
            .and_then(|result| result.value_text().map(str::to_string))
            .unwrap_or_default()
    }

    #[test]
    fn precedence_and_signs() {
        assert_eq!(value("2+2"), 4.0);
        assert_eq!(value("2+3*4"), 14.0);
        assert_eq!(value("-2+5"), 3.0);
        assert_eq!(value("5+-2"), 3.0);
        assert_eq!(value("5-+2"), 3.0);
        assert_eq!(value("10 - 4 - 3"), 3.0);
        assert_eq!(value("8/2/2"), 2.0);
        assert_eq!(value("6 ÷ 3 × 2"), 4.0);
        assert_eq!(value("6:3"), 2.0);
    }

    #[test]
    fn implicit_multiplication() {
        assert_eq!(value("2(3+4)"), 14.0);
        assert_eq!(value("[1+1]{2}"), 4.0);
        assert!((value("2pi") - 2.0 * PI).abs() < 1e-12);
        assert_eq!(value("1.5.5"), 0.75);
    }

    #[test]
    fn percentages() {
        assert_eq!(value("50%"), 0.5);
        assert_eq!(value("200*5%"), 10.0);
        assert!(evaluate("%").is_err());
    }

    #[test]
    fn factorials() {
        assert_eq!(value("3!"), 6.0);
        assert_eq!(value("0!"), 1.0);
        assert_eq!(value("2*3!"), 12.0);
        assert_eq!(value("6/3!"), 1.0);
        assert_eq!(value("-3!"), -6.0);
        assert_eq!(value("200!"), f64::INFINITY);
        assert_eq!(
            evaluate("2.5!"),
            Err(ParseError::FractionalFactorial(2.5))
        );
        assert_eq!(evaluate("!"), Err(ParseError::UnexpectedCharacter('!')));
    }

    #[test]
    fn powers_and_roots() {
        assert_eq!(value("2²"), 4.0);
        assert_eq!(value("2³+1"), 9.0);
        assert_eq!(value("2⁻¹"), 0.5);
        assert_eq!(value("10¹²"), 1e12);
        assert_eq!(value("2^10"), 1024.0);
        assert_eq!(value("2^(1+1)"), 4.0);
        assert_eq!(value("√16"), 4.0);
        assert_eq!(value("√(9)+1"), 4.0);
        assert_eq!(value("8/√4"), 4.0);
        assert_eq!(
            evaluate("√(-4)"),
            Err(ParseError::NegativeArgument { function: "√" })
        );
        assert_eq!(evaluate("2^x"), Err(ParseError::UnexpectedCharacter('x')));
        assert_eq!(evaluate("2⁻"), Err(ParseError::EndOfInput));
        assert_eq!(evaluate("²"), Err(ParseError::UnexpectedCharacter('²')));
    }

    #[test]
    fn absolute_values() {
        assert_eq!(value("|-3|"), 3.0);
        assert_eq!(value("2|1-4|"), 6.0);
        assert_eq!(value("|(|-2|-5)|"), 3.0);
        assert_eq!(evaluate("||"), Err(ParseError::UnexpectedCharacter('|')));
        assert_eq!(evaluate("|2"), Err(ParseError::EndOfInput));
    }

    #[test]
    fn constants_and_functions() {
        assert_eq!(value("½+¼"), 0.75);
        assert_eq!(value("⅞"), 0.875);
        assert_eq!(value("PI"), PI);
        assert_eq!(value("e"), E);
        assert_eq!(value("inf"), f64::INFINITY);
        assert_eq!(value("∞"), f64::INFINITY);
        assert_eq!(value("sqrt(16)"), 4.0);
        assert_eq!(value("Abs(-2)"), 2.0);
        assert_eq!(value("round(2.5)"), 2.0);
        assert_eq!(value("round(3.5)"), 4.0);
        assert_eq!(value("sign(-7)"), -1.0);
        assert_eq!(value("sign(0)"), 0.0);
        assert_eq!(value("log(8, 2)"), 3.0);
        assert_eq!(value("min(3, 1)"), 1.0);
        assert_eq!(value("max(3, 1)"), 3.0);
        assert_eq!(value("floor(2.7)+ceil(2.1)"), 5.0);
    }

    #[test]
    fn domain_errors() {
        assert_eq!(
            evaluate("asin(5)"),
            Err(ParseError::ArgumentGreaterThanOne { function: "asin" })
        );
        assert_eq!(
            evaluate("acosh(0)"),
            Err(ParseError::ArgumentSmallerThanOne { function: "acosh" })
        );
        assert_eq!(
            evaluate("sin(inf)"),
            Err(ParseError::InfiniteArgument { function: "sin" })
        );
        assert_eq!(
            evaluate("ln(-1)"),
            Err(ParseError::NegativeArgument { function: "ln" })
        );
        assert_eq!(evaluate("log(8, 0)"), Err(ParseError::LogBaseZero));
        assert_eq!(evaluate("log(8, 1)"), Err(ParseError::LogBaseOne));
        assert_eq!(
            evaluate("log(inf, inf)"),
            Err(ParseError::LogInfinityInfinity)
        );
        assert_eq!(
            evaluate("log(-8, 2)"),
            Err(ParseError::NegativeArgument { function: "log" })
        );
    }

    #[test]
    fn unknown_names() {
        assert_eq!(
            evaluate("foo"),
            Err(ParseError::UnknownVariable("foo".to_string()))
        );
        assert_eq!(
            evaluate("foo(1)"),
            Err(ParseError::UnknownFunction {
                name: "foo".to_string(),
                arguments: vec![1.0],
            })
        );
        assert_eq!(
            evaluate("sin(1, 2, 3)"),
            Err(ParseError::UnknownFunction {
                name: "sin".to_string(),
                arguments: vec![1.0, 2.0, 3.0],
            })
        );
    }

    #[test]
    fn bracket_mismatch_is_rejected() {
        assert_eq!(evaluate("(1]"), Err(ParseError::UnexpectedCharacter(']')));
        assert_eq!(evaluate("(1"), Err(ParseError::EndOfInput));
        assert_eq!(evaluate("1)"), Err(ParseError::UnexpectedCharacter(')')));
    }

    #[test]
    fn dangling_operators_are_lenient() {
        assert_eq!(value("2*"), 2.0);
        assert_eq!(value("2/"), 2.0);
    }

    #[test]
    fn formatted_results() {
        assert_eq!(shown("2+2"), "4");
        assert_eq!(shown("1/0"), "∞");
        assert_eq!(shown("1000*1000"), "1,000,000");
        assert_eq!(shown("10^12"), "1E12");
        assert_eq!(shown("0.1*0.5"), "0.05");

        let nan = parse_arithmetic("0/0").unwrap();
        assert!(!nan.successful);
        assert_eq!(nan.value_text(), Some("NaN"));
        assert!(!nan.is_error());
    }

    #[test]
    fn errors_only_shown_with_equals_prefix() {
        assert_eq!(parse_arithmetic("asin(5)"), None);
        assert_eq!(parse_arithmetic("hello world"), None);
        assert_eq!(parse_arithmetic(""), None);

        let shown = parse_arithmetic("=asin(5)").unwrap();
        assert!(!shown.successful);
        assert_eq!(shown.key, MessageKey::FunctionOfGreaterThanOne);
        assert_eq!(shown.args, vec![FormatArg::Text("asin".to_string())]);

        let factorial = parse_arithmetic("=2.5!").unwrap();
        assert_eq!(factorial.key, MessageKey::FractionalFactorial);

        let infinity = parse_arithmetic("=1/0").unwrap();
        assert!(infinity.successful);
        assert_eq!(infinity.value_text(), Some("∞"));

        let empty = parse_arithmetic("=").unwrap();
        assert_eq!(empty.key, MessageKey::EndOfInput);
    }

    #[test]
    fn locale_aware_results() {
        let german = NumberLocale::from_tag("de");
        let result = parse_arithmetic_with("1234.5*1", &german).unwrap();
        assert_eq!(result.value_text(), Some("1.234,5"));
    }
}
