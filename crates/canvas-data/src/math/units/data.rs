//! Every unit understood by the converter, with the factors needed to move a
//! value to and from the base unit of its dimension.

use std::{f64::consts::PI, fmt};

use serde::{Deserialize, Serialize};

/// Physical dimension of a unit. Conversions never cross dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// Base unit: second.
    Time,
    /// Base unit: meter.
    Length,
    /// Base unit: gram, so that the prefix system stays uniform.
    Mass,
    /// Base unit: kelvin.
    Temperature,
    /// Base unit: square meter.
    Area,
    /// Base unit: cubic meter.
    Volume,
    /// Base unit: radian.
    Angle,
    /// Base unit: meter per second.
    Speed,
    /// Base unit: bit.
    Storage,
}

impl UnitType {
    pub fn all() -> &'static [UnitType] {
        &[
            UnitType::Time,
            UnitType::Length,
            UnitType::Mass,
            UnitType::Temperature,
            UnitType::Area,
            UnitType::Volume,
            UnitType::Angle,
            UnitType::Speed,
            UnitType::Storage,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            UnitType::Time => "time",
            UnitType::Length => "length",
            UnitType::Mass => "mass",
            UnitType::Temperature => "temperature",
            UnitType::Area => "area",
            UnitType::Volume => "volume",
            UnitType::Angle => "angle",
            UnitType::Speed => "speed",
            UnitType::Storage => "storage",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a named unit relates to the base unit of its dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Conversion {
    /// `base = value * factor`
    Linear(f64),
    /// `base = (value + offset) / divisor`
    Affine { offset: f64, divisor: f64 },
}

impl Conversion {
    pub fn to_base(self, value: f64) -> f64 {
        match self {
            Conversion::Linear(factor) => value * factor,
            Conversion::Affine { offset, divisor } => (value + offset) / divisor,
        }
    }

    pub fn from_base(self, value: f64) -> f64 {
        match self {
            Conversion::Linear(factor) => value / factor,
            Conversion::Affine { offset, divisor } => value * divisor - offset,
        }
    }
}

/// Decimal SI prefixes followed by the binary (IEC) prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    Quecto,
    Ronto,
    Yocto,
    Zepto,
    Atto,
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    Centi,
    Deci,
    Base,
    Deca,
    Hecto,
    Kilo,
    Mega,
    Giga,
    Tera,
    Peta,
    Exa,
    Zetta,
    Yotta,
    Ronna,
    Quetta,
    Kibi,
    Mebi,
    Gibi,
    Tebi,
    Pebi,
    Exbi,
    Zebi,
    Yobi,
    Robi,
    Quebi,
}

impl Prefix {
    pub const ALL: [Prefix; 35] = [
        Prefix::Quecto,
        Prefix::Ronto,
        Prefix::Yocto,
        Prefix::Zepto,
        Prefix::Atto,
        Prefix::Femto,
        Prefix::Pico,
        Prefix::Nano,
        Prefix::Micro,
        Prefix::Milli,
        Prefix::Centi,
        Prefix::Deci,
        Prefix::Base,
        Prefix::Deca,
        Prefix::Hecto,
        Prefix::Kilo,
        Prefix::Mega,
        Prefix::Giga,
        Prefix::Tera,
        Prefix::Peta,
        Prefix::Exa,
        Prefix::Zetta,
        Prefix::Yotta,
        Prefix::Ronna,
        Prefix::Quetta,
        Prefix::Kibi,
        Prefix::Mebi,
        Prefix::Gibi,
        Prefix::Tebi,
        Prefix::Pebi,
        Prefix::Exbi,
        Prefix::Zebi,
        Prefix::Yobi,
        Prefix::Robi,
        Prefix::Quebi,
    ];

    /// Symbols accepted for the prefix; the first one is used for display.
    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            Prefix::Quecto => &["q", "quecto"],
            Prefix::Ronto => &["r", "ronto"],
            Prefix::Yocto => &["y", "yocto"],
            Prefix::Zepto => &["z", "zepto"],
            Prefix::Atto => &["a", "atto"],
            Prefix::Femto => &["f", "femto"],
            Prefix::Pico => &["p", "pico"],
            Prefix::Nano => &["n", "nano"],
            Prefix::Micro => &["μ", "micro"],
            Prefix::Milli => &["m", "milli"],
            Prefix::Centi => &["c", "centi"],
            Prefix::Deci => &["d", "deci"],
            Prefix::Base => &[""],
            Prefix::Deca => &["da", "deca"],
            Prefix::Hecto => &["h", "hecto"],
            Prefix::Kilo => &["k", "kilo"],
            Prefix::Mega => &["M", "mega"],
            Prefix::Giga => &["G", "giga"],
            Prefix::Tera => &["T", "tera"],
            Prefix::Peta => &["P", "peta"],
            Prefix::Exa => &["E", "exa"],
            Prefix::Zetta => &["Z", "zetta"],
            Prefix::Yotta => &["Y", "yotta"],
            Prefix::Ronna => &["R", "ronna"],
            Prefix::Quetta => &["Q", "quetta"],
            Prefix::Kibi => &["Ki", "kibi"],
            Prefix::Mebi => &["Mi", "mebi"],
            Prefix::Gibi => &["Gi", "gibi"],
            Prefix::Tebi => &["Ti", "tebi"],
            Prefix::Pebi => &["Pi", "pebi"],
            Prefix::Exbi => &["Ei", "exbi"],
            Prefix::Zebi => &["Zi", "zebi"],
            Prefix::Yobi => &["Yi", "yobi"],
            Prefix::Robi => &["Ri", "robi"],
            Prefix::Quebi => &["Qi", "quebi"],
        }
    }

    pub fn symbol(self) -> &'static str {
        self.symbols()[0]
    }

    pub fn scale(self) -> f64 {
        match self {
            Prefix::Quecto => 1e-30,
            Prefix::Ronto => 1e-27,
            Prefix::Yocto => 1e-24,
            Prefix::Zepto => 1e-21,
            Prefix::Atto => 1e-18,
            Prefix::Femto => 1e-15,
            Prefix::Pico => 1e-12,
            Prefix::Nano => 1e-9,
            Prefix::Micro => 1e-6,
            Prefix::Milli => 1e-3,
            Prefix::Centi => 1e-2,
            Prefix::Deci => 1e-1,
            Prefix::Base => 1.0,
            Prefix::Deca => 1e1,
            Prefix::Hecto => 1e2,
            Prefix::Kilo => 1e3,
            Prefix::Mega => 1e6,
            Prefix::Giga => 1e9,
            Prefix::Tera => 1e12,
            Prefix::Peta => 1e15,
            Prefix::Exa => 1e18,
            Prefix::Zetta => 1e21,
            Prefix::Yotta => 1e24,
            Prefix::Ronna => 1e27,
            Prefix::Quetta => 1e30,
            Prefix::Kibi => 1024_f64,
            Prefix::Mebi => 1024_f64.powi(2),
            Prefix::Gibi => 1024_f64.powi(3),
            Prefix::Tebi => 1024_f64.powi(4),
            Prefix::Pebi => 1024_f64.powi(5),
            Prefix::Exbi => 1024_f64.powi(6),
            Prefix::Zebi => 1024_f64.powi(7),
            Prefix::Yobi => 1024_f64.powi(8),
            Prefix::Robi => 1024_f64.powi(9),
            Prefix::Quebi => 1024_f64.powi(10),
        }
    }
}

/// Units that accept a [`Prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseUnit {
    Second,
    Meter,
    Gram,
    Tonne,
    Kelvin,
    SquareMeter,
    CubicMeter,
    Liter,
    Bit,
    Byte,
}

impl BaseUnit {
    pub const ALL: [BaseUnit; 10] = [
        BaseUnit::Second,
        BaseUnit::Meter,
        BaseUnit::Gram,
        BaseUnit::Tonne,
        BaseUnit::Kelvin,
        BaseUnit::SquareMeter,
        BaseUnit::CubicMeter,
        BaseUnit::Liter,
        BaseUnit::Bit,
        BaseUnit::Byte,
    ];

    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            BaseUnit::Second => &["s", "second", "seconds"],
            BaseUnit::Meter => &["m", "meter", "metre", "meters", "metres"],
            BaseUnit::Gram => &["g", "gram", "grams"],
            BaseUnit::Tonne => &["t", "tonne", "tonnes"],
            BaseUnit::Kelvin => &["K", "kelvin", "kelvins"],
            BaseUnit::SquareMeter => &[
                "m²",
                "m2",
                "squaremeter",
                "squaremetre",
                "squaremeters",
                "squaremetres",
            ],
            BaseUnit::CubicMeter => &[
                "m³",
                "m3",
                "cubicmeter",
                "cubicmetre",
                "cubicmeters",
                "cubicmetres",
            ],
            BaseUnit::Liter => &["l", "L", "liter", "litre", "liters", "litres"],
            BaseUnit::Bit => &["bit", "bits"],
            BaseUnit::Byte => &["B", "byte", "bytes", "octet", "octets"],
        }
    }

    pub fn symbol(self) -> &'static str {
        self.symbols()[0]
    }

    pub fn unit_type(self) -> UnitType {
        match self {
            BaseUnit::Second => UnitType::Time,
            BaseUnit::Meter => UnitType::Length,
            BaseUnit::Gram | BaseUnit::Tonne => UnitType::Mass,
            BaseUnit::Kelvin => UnitType::Temperature,
            BaseUnit::SquareMeter => UnitType::Area,
            BaseUnit::CubicMeter | BaseUnit::Liter => UnitType::Volume,
            BaseUnit::Bit | BaseUnit::Byte => UnitType::Storage,
        }
    }

    pub fn to_base(self, value: f64, prefix: Prefix) -> f64 {
        let scale = prefix.scale();
        match self {
            BaseUnit::Tonne => value * scale * 1_000_000.0,
            BaseUnit::SquareMeter => value * scale.powi(2),
            BaseUnit::CubicMeter => value * scale.powi(3),
            BaseUnit::Liter => value * scale / 1000.0,
            BaseUnit::Byte => value * scale * 8.0,
            BaseUnit::Second
            | BaseUnit::Meter
            | BaseUnit::Gram
            | BaseUnit::Kelvin
            | BaseUnit::Bit => value * scale,
        }
    }

    pub fn from_base(self, value: f64, prefix: Prefix) -> f64 {
        let scale = prefix.scale();
        match self {
            BaseUnit::Tonne => value / scale / 1_000_000.0,
            BaseUnit::SquareMeter => value / scale.powi(2),
            BaseUnit::CubicMeter => value / scale.powi(3),
            BaseUnit::Liter => value / scale * 1000.0,
            BaseUnit::Byte => value / scale / 8.0,
            BaseUnit::Second
            | BaseUnit::Meter
            | BaseUnit::Gram
            | BaseUnit::Kelvin
            | BaseUnit::Bit => value / scale,
        }
    }
}

/// Units with their own fixed relation to a base unit; they take no prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedUnit {
    Minute,
    Hour,
    Day,
    Year,
    Radian,
    Degree,
    MetersPerSecond,
    KilometersPerHour,
    Hectare,
    DegreeCelsius,
    Nibble,
    Inch,
    Foot,
    Yard,
    Mile,
    SquareInch,
    SquareFoot,
    SquareYard,
    SquareMile,
    Acre,
    CubicInch,
    CubicFoot,
    CubicYard,
    CubicMile,
    Teaspoon,
    Tablespoon,
    FluidOunce,
    Cup,
    FluidPint,
    FluidQuart,
    Gallon,
    DryPint,
    DryQuart,
    Peck,
    Bushel,
    Ounce,
    Pound,
    Ton,
    DegreeFahrenheit,
    MilesPerHour,
}

impl NamedUnit {
    pub const ALL: [NamedUnit; 40] = [
        NamedUnit::Minute,
        NamedUnit::Hour,
        NamedUnit::Day,
        NamedUnit::Year,
        NamedUnit::Radian,
        NamedUnit::Degree,
        NamedUnit::MetersPerSecond,
        NamedUnit::KilometersPerHour,
        NamedUnit::Hectare,
        NamedUnit::DegreeCelsius,
        NamedUnit::Nibble,
        NamedUnit::Inch,
        NamedUnit::Foot,
        NamedUnit::Yard,
        NamedUnit::Mile,
        NamedUnit::SquareInch,
        NamedUnit::SquareFoot,
        NamedUnit::SquareYard,
        NamedUnit::SquareMile,
        NamedUnit::Acre,
        NamedUnit::CubicInch,
        NamedUnit::CubicFoot,
        NamedUnit::CubicYard,
        NamedUnit::CubicMile,
        NamedUnit::Teaspoon,
        NamedUnit::Tablespoon,
        NamedUnit::FluidOunce,
        NamedUnit::Cup,
        NamedUnit::FluidPint,
        NamedUnit::FluidQuart,
        NamedUnit::Gallon,
        NamedUnit::DryPint,
        NamedUnit::DryQuart,
        NamedUnit::Peck,
        NamedUnit::Bushel,
        NamedUnit::Ounce,
        NamedUnit::Pound,
        NamedUnit::Ton,
        NamedUnit::DegreeFahrenheit,
        NamedUnit::MilesPerHour,
    ];

    pub fn symbols(self) -> &'static [&'static str] {
        match self {
            NamedUnit::Minute => &["min", "minute", "minutes"],
            NamedUnit::Hour => &["h", "hour", "hours"],
            NamedUnit::Day => &["d", "day", "days"],
            NamedUnit::Year => &["y", "year", "years"],
            NamedUnit::Radian => &["rad", "radian", "radians"],
            NamedUnit::Degree => &["°", "deg", "degree", "degrees"],
            NamedUnit::MetersPerSecond => &["m/s", "mps", "meterspersecond", "metrespersecond"],
            NamedUnit::KilometersPerHour => {
                &["km/h", "kmh", "kilometersperhour", "kilometresperhour"]
            }
            NamedUnit::Hectare => &["ha", "hectare", "hectares"],
            NamedUnit::DegreeCelsius => {
                &["°C", "C", "degreecelcius", "degreescelcius", "celcius"]
            }
            NamedUnit::Nibble => &["nibble", "nybble", "nibbles", "nybbles"],
            NamedUnit::Inch => &["in", "´´", "''", "\"", "inch", "inches"],
            NamedUnit::Foot => &["ft", "´", "'", "foot", "feet"],
            NamedUnit::Yard => &["yd", "yard", "yards"],
            NamedUnit::Mile => &["mi", "mile", "miles"],
            NamedUnit::SquareInch => &["in²", "in2", "sqin", "squareinch", "squareinches"],
            NamedUnit::SquareFoot => &["ft²", "ft2", "sqft", "sf", "squarefoot", "squarefeet"],
            NamedUnit::SquareYard => &["yd²", "yd2", "sqyd", "squareyard", "squareyards"],
            NamedUnit::SquareMile => &["mi²", "mi2", "sqmi", "squaremile", "squaremiles"],
            NamedUnit::Acre => &["acre", "ac", "acres"],
            NamedUnit::CubicInch => &["in³", "in3", "cuin", "cubicinch", "cubicinches"],
            NamedUnit::CubicFoot => &["ft³", "ft3", "cuft", "cubicfoot", "cubicfeet"],
            NamedUnit::CubicYard => &["yd³", "yd3", "cuyd", "cubicyard", "cubicyards"],
            NamedUnit::CubicMile => &["mi³", "mi3", "cumi", "cubicmile", "cubicmiles"],
            NamedUnit::Teaspoon => &["tsp", "teaspoon", "teaspoons"],
            NamedUnit::Tablespoon => &["tbsp", "tablespoon", "tablespoons"],
            NamedUnit::FluidOunce => &["floz", "fluidounce", "fluidounces"],
            NamedUnit::Cup => &["c", "cup", "cups"],
            NamedUnit::FluidPint => &["pt", "pint", "pints", "fluidpint", "fluidpints"],
            NamedUnit::FluidQuart => &["qt", "quart", "quarts", "fluidquart", "fluidquarts"],
            NamedUnit::Gallon => &["gal", "gallon", "gallons"],
            NamedUnit::DryPint => &["drypt", "dpt", "drypint", "drypints"],
            NamedUnit::DryQuart => &["dryqt", "dqt", "dryquart", "dryquarts"],
            NamedUnit::Peck => &["pk", "peck", "pecks"],
            NamedUnit::Bushel => &["bu", "bushel", "bushels"],
            NamedUnit::Ounce => &["oz", "ounce", "ounces"],
            NamedUnit::Pound => &["lb", "#", "pound", "pounds"],
            NamedUnit::Ton => &["ton", "tons"],
            NamedUnit::DegreeFahrenheit => {
                &["°F", "F", "degreefahrenheit", "degreesfahrenheit", "fahrenheit"]
            }
            NamedUnit::MilesPerHour => &["mph", "mi/h", "mileperhour", "milesperhour"],
        }
    }

    pub fn symbol(self) -> &'static str {
        self.symbols()[0]
    }

    pub fn unit_type(self) -> UnitType {
        use NamedUnit::*;
        match self {
            Minute | Hour | Day | Year => UnitType::Time,
            Radian | Degree => UnitType::Angle,
            MetersPerSecond | KilometersPerHour | MilesPerHour => UnitType::Speed,
            Hectare | SquareInch | SquareFoot | SquareYard | SquareMile | Acre => UnitType::Area,
            DegreeCelsius | DegreeFahrenheit => UnitType::Temperature,
            Nibble => UnitType::Storage,
            Inch | Foot | Yard | Mile => UnitType::Length,
            CubicInch | CubicFoot | CubicYard | CubicMile | Teaspoon | Tablespoon | FluidOunce
            | Cup | FluidPint | FluidQuart | Gallon | DryPint | DryQuart | Peck | Bushel => {
                UnitType::Volume
            }
            Ounce | Pound | Ton => UnitType::Mass,
        }
    }

    pub fn conversion(self) -> Conversion {
        use Conversion::Linear;
        match self {
            NamedUnit::Minute => Linear(60.0),
            NamedUnit::Hour => Linear(3600.0),
            NamedUnit::Day => Linear(86_400.0),
            NamedUnit::Year => Linear(31_556_952.0),
            NamedUnit::Radian => Linear(1.0),
            NamedUnit::Degree => Linear(PI / 180.0),
            NamedUnit::MetersPerSecond => Linear(1.0),
            NamedUnit::KilometersPerHour => Linear(0.277_777_777_777_777_8),
            NamedUnit::Hectare => Linear(10_000.0),
            NamedUnit::DegreeCelsius => Conversion::Affine {
                offset: 273.15,
                divisor: 1.0,
            },
            NamedUnit::Nibble => Linear(4.0),
            NamedUnit::Inch => Linear(0.0254),
            NamedUnit::Foot => Linear(0.3048),
            NamedUnit::Yard => Linear(0.9144),
            NamedUnit::Mile => Linear(1609.344),
            NamedUnit::SquareInch => Linear(0.000_645_16),
            NamedUnit::SquareFoot => Linear(0.092_903_04),
            NamedUnit::SquareYard => Linear(0.836_127_36),
            NamedUnit::SquareMile => Linear(2_589_988.1),
            NamedUnit::Acre => Linear(4046.8564),
            NamedUnit::CubicInch => Linear(0.000_016_387_064),
            NamedUnit::CubicFoot => Linear(0.028_316_847),
            NamedUnit::CubicYard => Linear(0.764_554_86),
            NamedUnit::CubicMile => Linear(4_168_181_800.0),
            NamedUnit::Teaspoon => Linear(0.000_004_928_921_6),
            NamedUnit::Tablespoon => Linear(0.000_014_786_765),
            NamedUnit::FluidOunce => Linear(0.000_000_295_735_3),
            NamedUnit::Cup => Linear(0.000_236_588_24),
            NamedUnit::FluidPint => Linear(0.000_473_176_47),
            NamedUnit::FluidQuart => Linear(0.000_946_352_95),
            NamedUnit::Gallon => Linear(0.003_785_411_8),
            NamedUnit::DryPint => Linear(0.000_550_610_47),
            NamedUnit::DryQuart => Linear(0.001_101_220_9),
            NamedUnit::Peck => Linear(0.008_809_767_5),
            NamedUnit::Bushel => Linear(0.035_239_07),
            NamedUnit::Ounce => Linear(28.349_523_125),
            NamedUnit::Pound => Linear(453.592_37),
            NamedUnit::Ton => Linear(907_184.74),
            NamedUnit::DegreeFahrenheit => Conversion::Affine {
                offset: 459.67,
                divisor: 1.8,
            },
            NamedUnit::MilesPerHour => Linear(0.447_04),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_are_unique_within_each_table() {
        let mut named: Vec<&str> = NamedUnit::ALL
            .iter()
            .flat_map(|unit| unit.symbols().iter().copied())
            .collect();
        let total = named.len();
        named.sort_unstable();
        named.dedup();
        assert_eq!(named.len(), total);

        let mut prefixes: Vec<&str> = Prefix::ALL
            .iter()
            .flat_map(|prefix| prefix.symbols().iter().copied())
            .collect();
        let total = prefixes.len();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), total);
    }

    #[test]
    fn binary_prefixes_are_powers_of_1024() {
        assert_eq!(Prefix::Kibi.scale(), 1024.0);
        assert_eq!(Prefix::Mebi.scale(), 1_048_576.0);
    }

    #[test]
    fn prefixed_factors_follow_dimension() {
        assert_eq!(BaseUnit::SquareMeter.to_base(1.0, Prefix::Kilo), 1_000_000.0);
        assert_eq!(BaseUnit::CubicMeter.to_base(2.0, Prefix::Deci), 2.0 * 0.1_f64.powi(3));
        assert_eq!(BaseUnit::Liter.to_base(1.0, Prefix::Base), 0.001);
        assert_eq!(BaseUnit::Liter.from_base(0.001, Prefix::Milli), 1000.0);
        assert_eq!(BaseUnit::Byte.to_base(1.0, Prefix::Kilo), 8000.0);
        assert_eq!(BaseUnit::Tonne.to_base(2.0, Prefix::Base), 2_000_000.0);
    }

    #[test]
    fn affine_conversions_round_trip() {
        let celsius = NamedUnit::DegreeCelsius.conversion();
        assert!((celsius.to_base(0.0) - 273.15).abs() < 1e-9);
        let fahrenheit = NamedUnit::DegreeFahrenheit.conversion();
        assert!((fahrenheit.to_base(32.0) - 273.15).abs() < 1e-9);
        assert!((fahrenheit.from_base(373.15) - 212.0).abs() < 1e-9);
    }

    #[test]
    fn unit_types_are_lowercase() {
        assert_eq!(UnitType::Length.to_string(), "length");
        assert_eq!(UnitType::all().len(), 9);
        assert_eq!(NamedUnit::Acre.unit_type(), UnitType::Area);
        assert_eq!(BaseUnit::Liter.unit_type(), UnitType::Volume);
    }
}
