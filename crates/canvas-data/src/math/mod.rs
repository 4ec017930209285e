pub mod common;
pub mod expression;
pub mod format;
pub mod metronome;
pub mod units;

pub use common::{CharStream, FormatArg, MessageKey, ParseError, ParseResult, STREAM_END};
pub use expression::{evaluate, parse_arithmetic, parse_arithmetic_with};
pub use format::{format_number, NumberLocale, Precision};
pub use metronome::{bpm_to_tempo_name, parse_metronome, Metronome, TempoName, MAX_BPM, MIN_BPM};
pub use units::{parse_unit_conversion, parse_unit_conversion_with, Unit, UnitType, UnitValue};
