use std::fmt;

use serde::{Serialize, Serializer};

use super::data::{BaseUnit, NamedUnit, Prefix, UnitType};
use crate::math::common::ParseError;
use crate::math::format::{format_number, NumberLocale, Precision};

/// A concrete unit: either a prefixable base unit with its prefix, or a named unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Unit {
    Prefixed { base: BaseUnit, prefix: Prefix },
    Named(NamedUnit),
}

impl Unit {
    pub fn base(base: BaseUnit) -> Self {
        Unit::Prefixed {
            base,
            prefix: Prefix::Base,
        }
    }

    pub fn prefixed(base: BaseUnit, prefix: Prefix) -> Self {
        Unit::Prefixed { base, prefix }
    }

    pub fn unit_type(&self) -> UnitType {
        match self {
            Unit::Prefixed { base, .. } => base.unit_type(),
            Unit::Named(named) => named.unit_type(),
        }
    }

    pub fn to_base(&self, value: f64) -> f64 {
        match self {
            Unit::Prefixed { base, prefix } => base.to_base(value, *prefix),
            Unit::Named(named) => named.conversion().to_base(value),
        }
    }

    pub fn from_base(&self, value: f64) -> f64 {
        match self {
            Unit::Prefixed { base, prefix } => base.from_base(value, *prefix),
            Unit::Named(named) => named.conversion().from_base(value),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Prefixed { base, prefix } => write!(f, "{}{}", prefix.symbol(), base.symbol()),
            Unit::Named(named) => f.write_str(named.symbol()),
        }
    }
}

impl Serialize for Unit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<NamedUnit> for Unit {
    fn from(named: NamedUnit) -> Self {
        Unit::Named(named)
    }
}

impl From<BaseUnit> for Unit {
    fn from(base: BaseUnit) -> Self {
        Unit::base(base)
    }
}

/// A number tagged with the unit it is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UnitValue {
    pub value: f64,
    pub unit: Unit,
}

impl UnitValue {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Re-expresses the value in `unit`, which must share the dimension.
    pub fn to(&self, unit: Unit) -> UnitValue {
        debug_assert_eq!(self.unit.unit_type(), unit.unit_type());
        if self.unit == unit {
            return *self;
        }
        UnitValue::new(unit.from_base(self.unit.to_base(self.value)), unit)
    }

    pub fn format(&self, locale: &NumberLocale) -> String {
        format!(
            "{} {}",
            format_number(self.value, Precision::Default, locale),
            self.unit
        )
    }
}

impl fmt::Display for UnitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(&NumberLocale::default()))
    }
}

/// Sums `values` in the base unit and expresses the total in `target`.
pub fn convert_all(values: &[UnitValue], target: Unit) -> Result<UnitValue, ParseError> {
    let mut total = 0.0;
    for value in values {
        if value.unit.unit_type() != target.unit_type() {
            return Err(ParseError::IncompatibleUnits {
                unit: value.unit.to_string(),
                unit_type: value.unit.unit_type().to_string(),
                target: target.to_string(),
                target_type: target.unit_type().to_string(),
            });
        }
        total += value.unit.to_base(value.value);
    }
    Ok(UnitValue::new(target.from_base(total), target))
}

/// Lower bound of a magnitude band and the unit used inside it.
type Band = (f64, Unit);

/// Whether the last band of a ladder also accepts an infinite magnitude.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Top {
    Inclusive,
    Exclusive,
}

fn pick(magnitude: f64, bands: &[Band], top: Top) -> Option<Unit> {
    if magnitude.is_nan() || (magnitude.is_infinite() && top == Top::Exclusive) {
        return None;
    }
    bands
        .iter()
        .rev()
        .find(|(from, _)| magnitude >= *from)
        .map(|(_, unit)| *unit)
}

/// Converts to whichever unit of `bands` fits the magnitude measured in `reference`.
fn ladder(value: &UnitValue, reference: Unit, bands: &[Band], top: Top) -> Option<UnitValue> {
    let magnitude = value.to(reference).value.abs();
    pick(magnitude, bands, top).map(|unit| value.to(unit))
}

fn time_ladder(value: &UnitValue) -> Option<UnitValue> {
    ladder(
        value,
        Unit::base(BaseUnit::Second),
        &[
            (0.0, Unit::prefixed(BaseUnit::Second, Prefix::Milli)),
            (60.0, NamedUnit::Minute.into()),
            (3_600.0, NamedUnit::Hour.into()),
            (86_400.0, NamedUnit::Day.into()),
            (31_556_952.0, NamedUnit::Year.into()),
        ],
        Top::Inclusive,
    )
}

fn storage_ladder(value: &UnitValue) -> UnitValue {
    const BYTE_PREFIXES: [Prefix; 9] = [
        Prefix::Kilo,
        Prefix::Mega,
        Prefix::Giga,
        Prefix::Tera,
        Prefix::Peta,
        Prefix::Exa,
        Prefix::Zetta,
        Prefix::Yotta,
        Prefix::Ronna,
    ];

    let bits = value.to(Unit::base(BaseUnit::Bit)).value.abs();
    if (0.0..8.0).contains(&bits) {
        return value.to(Unit::base(BaseUnit::Bit));
    }
    if (8.0..8_000.0).contains(&bits) {
        return value.to(Unit::base(BaseUnit::Byte));
    }
    BYTE_PREFIXES
        .iter()
        .map(|prefix| value.to(Unit::prefixed(BaseUnit::Byte, *prefix)))
        .find(|candidate| candidate.value.abs() < 1000.0)
        .unwrap_or_else(|| value.to(Unit::prefixed(BaseUnit::Byte, Prefix::Quetta)))
}

/// Picks a sensible unit to show `value` in when no target was requested.
///
/// Metric inputs go to imperial units and the other way round, choosing the
/// unit that keeps the number readable. `None` when no guess applies.
pub fn default_conversion(value: &UnitValue) -> Option<UnitValue> {
    use NamedUnit as N;

    let metric = |base: BaseUnit, prefix: Prefix| Unit::prefixed(base, prefix);

    match value.unit {
        Unit::Prefixed { base, .. } => match base {
            BaseUnit::Second => time_ladder(value),
            BaseUnit::Meter => ladder(
                value,
                N::Inch.into(),
                &[
                    (0.0, N::Inch.into()),
                    (12.0, N::Foot.into()),
                    (36.0, N::Yard.into()),
                    (63_360.0, N::Mile.into()),
                ],
                Top::Inclusive,
            ),
            BaseUnit::Gram | BaseUnit::Tonne => ladder(
                value,
                N::Ounce.into(),
                &[
                    (0.0, N::Ounce.into()),
                    (16.0, N::Pound.into()),
                    (32_000.0, N::Ton.into()),
                ],
                Top::Exclusive,
            ),
            BaseUnit::Kelvin => Some(value.to(N::DegreeCelsius.into())),
            BaseUnit::SquareMeter => ladder(
                value,
                N::SquareInch.into(),
                &[
                    (0.0, N::SquareInch.into()),
                    (144.0, N::SquareFoot.into()),
                    (1_296.0, N::SquareYard.into()),
                    (4_014_489_600.0, N::SquareMile.into()),
                ],
                Top::Exclusive,
            ),
            BaseUnit::CubicMeter | BaseUnit::Liter => ladder(
                value,
                N::CubicInch.into(),
                &[
                    (0.0, N::CubicInch.into()),
                    (1_728.0, N::CubicFoot.into()),
                    (46_656.0, N::CubicYard.into()),
                    (2.543_580_6e14, N::CubicMile.into()),
                ],
                Top::Exclusive,
            ),
            BaseUnit::Bit | BaseUnit::Byte => Some(storage_ladder(value)),
        },
        Unit::Named(named) => match named {
            N::Minute | N::Hour | N::Day | N::Year => time_ladder(value),
            N::Radian => Some(value.to(N::Degree.into())),
            N::Degree => Some(value.to(N::Radian.into())),
            N::MetersPerSecond => Some(value.to(N::KilometersPerHour.into())),
            N::KilometersPerHour => Some(value.to(N::MilesPerHour.into())),
            N::MilesPerHour => Some(value.to(N::KilometersPerHour.into())),
            N::DegreeCelsius => Some(value.to(N::DegreeFahrenheit.into())),
            N::DegreeFahrenheit => Some(value.to(N::DegreeCelsius.into())),
            N::Inch | N::Foot | N::Yard | N::Mile => ladder(
                value,
                Unit::base(BaseUnit::Meter),
                &[
                    (0.0, metric(BaseUnit::Meter, Prefix::Milli)),
                    (0.01, metric(BaseUnit::Meter, Prefix::Centi)),
                    (1.0, Unit::base(BaseUnit::Meter)),
                    (1_000.0, metric(BaseUnit::Meter, Prefix::Kilo)),
                ],
                Top::Inclusive,
            ),
            N::SquareInch | N::SquareFoot | N::SquareYard | N::SquareMile | N::Acre
            | N::Hectare => ladder(
                value,
                Unit::base(BaseUnit::SquareMeter),
                &[
                    (0.0, metric(BaseUnit::SquareMeter, Prefix::Milli)),
                    (0.0001, metric(BaseUnit::SquareMeter, Prefix::Centi)),
                    (1.0, Unit::base(BaseUnit::SquareMeter)),
                    (1_000_000.0, metric(BaseUnit::SquareMeter, Prefix::Kilo)),
                ],
                Top::Inclusive,
            ),
            N::CubicInch
            | N::CubicFoot
            | N::CubicYard
            | N::CubicMile
            | N::Teaspoon
            | N::Tablespoon
            | N::FluidOunce
            | N::Cup
            | N::FluidPint
            | N::FluidQuart
            | N::Gallon
            | N::DryPint
            | N::DryQuart
            | N::Peck
            | N::Bushel => ladder(
                value,
                Unit::base(BaseUnit::CubicMeter),
                &[
                    (0.0, metric(BaseUnit::CubicMeter, Prefix::Milli)),
                    (0.000_001, metric(BaseUnit::CubicMeter, Prefix::Centi)),
                    (1.0, Unit::base(BaseUnit::CubicMeter)),
                    (1_000_000_000.0, metric(BaseUnit::CubicMeter, Prefix::Kilo)),
                ],
                Top::Inclusive,
            ),
            N::Ounce | N::Pound | N::Ton => ladder(
                value,
                Unit::base(BaseUnit::Gram),
                &[
                    (0.0, metric(BaseUnit::Gram, Prefix::Milli)),
                    (1.0, Unit::base(BaseUnit::Gram)),
                    (1_000.0, metric(BaseUnit::Gram, Prefix::Kilo)),
                ],
                Top::Inclusive,
            ),
            N::Nibble => Some(storage_ladder(value)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(value: f64, unit: impl Into<Unit>) -> String {
        default_conversion(&UnitValue::new(value, unit.into()))
            .map(|converted| converted.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn display_uses_first_symbols() {
        assert_eq!(Unit::prefixed(BaseUnit::Meter, Prefix::Kilo).to_string(), "km");
        assert_eq!(Unit::base(BaseUnit::Second).to_string(), "s");
        assert_eq!(Unit::prefixed(BaseUnit::Byte, Prefix::Kibi).to_string(), "KiB");
        assert_eq!(Unit::Named(NamedUnit::Pound).to_string(), "lb");
        assert_eq!(
            UnitValue::new(2.5, Unit::base(BaseUnit::Meter)).to_string(),
            "2.5 m"
        );
    }

    #[test]
    fn sums_values_before_converting() {
        let values = [
            UnitValue::new(1.0, Unit::base(BaseUnit::Meter)),
            UnitValue::new(50.0, Unit::prefixed(BaseUnit::Meter, Prefix::Centi)),
        ];
        let total = convert_all(&values, Unit::prefixed(BaseUnit::Meter, Prefix::Centi)).unwrap();
        assert_eq!(total.to_string(), "150 cm");
    }

    #[test]
    fn incompatible_dimensions_are_rejected() {
        let values = [UnitValue::new(5.0, Unit::base(BaseUnit::Meter))];
        let error = convert_all(&values, Unit::base(BaseUnit::Second)).unwrap_err();
        assert_eq!(
            error,
            ParseError::IncompatibleUnits {
                unit: "m".to_string(),
                unit_type: "length".to_string(),
                target: "s".to_string(),
                target_type: "time".to_string(),
            }
        );
    }

    #[test]
    fn time_guesses() {
        assert_eq!(guess(90.0, BaseUnit::Second), "1.5 min");
        assert_eq!(guess(2.0, BaseUnit::Second), "2,000 ms");
        assert_eq!(guess(120.0, NamedUnit::Minute), "2 h");
        assert_eq!(guess(48.0, NamedUnit::Hour), "2 d");
        assert_eq!(guess(730.0, NamedUnit::Day), "1.998672 y");
    }

    #[test]
    fn metric_to_imperial_guesses() {
        assert_eq!(guess(1.0, BaseUnit::Meter), "1.093613 yd");
        assert_eq!(guess(10.0, Unit::prefixed(BaseUnit::Meter, Prefix::Centi)), "3.937008 in");
        assert_eq!(guess(5.0, Unit::prefixed(BaseUnit::Meter, Prefix::Kilo)), "3.106856 mi");
        assert_eq!(guess(1.0, Unit::prefixed(BaseUnit::Gram, Prefix::Kilo)), "2.204623 lb");
        assert_eq!(guess(0.0, BaseUnit::Kelvin), "-273.15 °C");
    }

    #[test]
    fn imperial_to_metric_guesses() {
        assert_eq!(guess(1.0, NamedUnit::Inch), "2.54 cm");
        assert_eq!(guess(3.0, NamedUnit::Mile), "4.828032 km");
        assert_eq!(guess(1.0, NamedUnit::Pound), "453.59237 g");
        assert_eq!(guess(212.0, NamedUnit::DegreeFahrenheit), "100 °C");
        assert_eq!(guess(100.0, NamedUnit::DegreeCelsius), "212 °F");
        assert_eq!(guess(1.0, NamedUnit::Gallon), "3,785.4118 cm³");
    }

    #[test]
    fn storage_guesses() {
        assert_eq!(guess(4.0, BaseUnit::Bit), "4 bit");
        assert_eq!(guess(16.0, BaseUnit::Bit), "2 B");
        assert_eq!(guess(1.0, Unit::prefixed(BaseUnit::Byte, Prefix::Kibi)), "1.024 kB");
        assert_eq!(guess(999.0, BaseUnit::Byte), "999 B");
        assert_eq!(guess(1.0, Unit::prefixed(BaseUnit::Byte, Prefix::Gibi)), "1.073742 GB");
        assert_eq!(guess(3.0, NamedUnit::Nibble), "1.5 B");
    }

    #[test]
    fn infinite_magnitudes_follow_band_tops() {
        assert_eq!(guess(f64::INFINITY, BaseUnit::Second), "∞ y");
        assert_eq!(guess(f64::INFINITY, BaseUnit::Gram), "");
        assert_eq!(guess(f64::NAN, BaseUnit::Meter), "");
    }
}
