pub mod converter;
pub mod data;
pub mod parser;

pub use converter::{convert_all, default_conversion, Unit, UnitValue};
pub use data::{BaseUnit, Conversion, NamedUnit, Prefix, UnitType};
pub use parser::{
    parse_source_values, parse_unit, parse_unit_conversion, parse_unit_conversion_with,
};
