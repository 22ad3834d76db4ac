//! Native numeric types and their fixed properties.
//!
//! The set of exact and approximate numeric types SQL Server offers is
//! closed, so it is modeled as an enum. Everything a column of that type
//! needs to know (semantic kind, default precision and scale, value bounds)
//! is a method on the variant.

use rust_decimal::Decimal;
use serde::Serialize;

/// Native SQL Server numeric type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeType {
    /// `int`, 4 bytes.
    Integer,
    /// `tinyint`, unsigned byte.
    TinyInteger,
    /// `smallint`, 2 bytes.
    SmallInteger,
    /// `bigint`, 8 bytes.
    BigInteger,
    /// `decimal` / `numeric`.
    Decimal,
    /// `money`, fixed (19,4).
    Money,
    /// `smallmoney`, fixed (10,4).
    SmallMoney,
    /// `float`, double precision by default.
    Float,
    /// `real`, single precision.
    Real,
}

/// Semantic kind a native type maps to in the host type system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Integer of up to 4 bytes.
    Integer,
    /// 8-byte integer.
    Bigint,
    /// Exact numeric with precision and scale.
    Decimal,
    /// Fixed-format currency.
    Money,
    /// Fixed-format small currency.
    Smallmoney,
    /// Approximate double precision.
    Float,
    /// Approximate single precision.
    Real,
}

impl TypeKind {
    /// Returns the host-facing name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Bigint => "bigint",
            Self::Decimal => "decimal",
            Self::Money => "money",
            Self::Smallmoney => "smallmoney",
            Self::Float => "float",
            Self::Real => "real",
        }
    }
}

/// Half-open integer range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    /// Smallest accepted value.
    pub min: i128,
    /// First rejected value above the range.
    pub max: i128,
}

impl Bounds {
    /// Returns true if `value` lies inside the range.
    #[must_use]
    pub const fn contains(&self, value: i128) -> bool {
        value >= self.min && value < self.max
    }
}

impl NativeType {
    /// All variants, in registry order.
    pub const ALL: [Self; 9] = [
        Self::Integer,
        Self::TinyInteger,
        Self::SmallInteger,
        Self::BigInteger,
        Self::Decimal,
        Self::Money,
        Self::SmallMoney,
        Self::Float,
        Self::Real,
    ];

    /// Looks a type up by its lowercased name or synonym.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" | "integer" => Some(Self::Integer),
            "tinyint" => Some(Self::TinyInteger),
            "smallint" => Some(Self::SmallInteger),
            "bigint" => Some(Self::BigInteger),
            "decimal" | "numeric" | "dec" => Some(Self::Decimal),
            "money" => Some(Self::Money),
            "smallmoney" => Some(Self::SmallMoney),
            "float" | "double precision" => Some(Self::Float),
            "real" => Some(Self::Real),
            _ => None,
        }
    }

    /// Returns the canonical T-SQL name.
    #[must_use]
    pub const fn sql_name(self) -> &'static str {
        match self {
            Self::Integer => "int",
            Self::TinyInteger => "tinyint",
            Self::SmallInteger => "smallint",
            Self::BigInteger => "bigint",
            Self::Decimal => "decimal",
            Self::Money => "money",
            Self::SmallMoney => "smallmoney",
            Self::Float => "float",
            Self::Real => "real",
        }
    }

    /// Returns the semantic kind.
    #[must_use]
    pub const fn kind(self) -> TypeKind {
        match self {
            Self::Integer | Self::TinyInteger | Self::SmallInteger => TypeKind::Integer,
            Self::BigInteger => TypeKind::Bigint,
            Self::Decimal => TypeKind::Decimal,
            Self::Money => TypeKind::Money,
            Self::SmallMoney => TypeKind::Smallmoney,
            Self::Float => TypeKind::Float,
            Self::Real => TypeKind::Real,
        }
    }

    /// Precision used when none is declared.
    #[must_use]
    pub const fn default_precision(self) -> Option<u8> {
        match self {
            Self::Decimal => Some(18),
            Self::Money => Some(19),
            Self::SmallMoney => Some(10),
            Self::Float => Some(53),
            Self::Real => Some(24),
            Self::Integer | Self::TinyInteger | Self::SmallInteger | Self::BigInteger => None,
        }
    }

    /// Scale used when none is declared.
    #[must_use]
    pub const fn default_scale(self) -> Option<u8> {
        match self {
            Self::Decimal => Some(0),
            Self::Money | Self::SmallMoney => Some(4),
            _ => None,
        }
    }

    /// Whether precision and scale ignore what the caller declares.
    #[must_use]
    pub const fn has_fixed_format(self) -> bool {
        matches!(self, Self::Money | Self::SmallMoney)
    }

    /// Accepted value range for the integer family.
    #[must_use]
    pub const fn bounds(self) -> Option<Bounds> {
        match self {
            Self::TinyInteger => Some(Bounds { min: 0, max: 256 }),
            Self::SmallInteger => Some(Bounds {
                min: -(1 << 15),
                max: 1 << 15,
            }),
            Self::Integer => Some(Bounds {
                min: -(1 << 31),
                max: 1 << 31,
            }),
            Self::BigInteger => Some(Bounds {
                min: -(1 << 63),
                max: 1 << 63,
            }),
            _ => None,
        }
    }

    /// Inclusive value range of the currency types.
    ///
    /// Both are scaled integers (`bigint` and `int` ten-thousandths), so
    /// their limits are tighter than their precision suggests.
    #[must_use]
    pub fn money_range(self) -> Option<(Decimal, Decimal)> {
        match self {
            Self::Money => Some((Decimal::new(i64::MIN, 4), Decimal::new(i64::MAX, 4))),
            Self::SmallMoney => Some((
                Decimal::new(i64::from(i32::MIN), 4),
                Decimal::new(i64::from(i32::MAX), 4),
            )),
            _ => None,
        }
    }

    /// Whether this is one of the integer types.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.bounds().is_some()
    }

    /// Whether this is an exact numeric with a scale.
    #[must_use]
    pub const fn is_decimal(self) -> bool {
        matches!(self, Self::Decimal | Self::Money | Self::SmallMoney)
    }
}

/// A resolved column type: native type plus effective precision and scale.
///
/// Built per lookup by [`crate::resolve_type`]; carries no identity beyond
/// its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColumnType {
    native: NativeType,
    kind: TypeKind,
    precision: Option<u8>,
    scale: Option<u8>,
}

impl ColumnType {
    /// Builds a column type, applying defaults and the fixed money formats.
    #[must_use]
    pub const fn new(native: NativeType, precision: Option<u8>, scale: Option<u8>) -> Self {
        let (precision, scale) = if native.has_fixed_format() || native.is_integer() {
            (native.default_precision(), native.default_scale())
        } else {
            let precision = match precision {
                Some(p) => Some(p),
                None => native.default_precision(),
            };
            let scale = match (native.is_decimal(), scale) {
                (true, Some(s)) => Some(s),
                (true, None) => native.default_scale(),
                (false, _) => None,
            };
            (precision, scale)
        };
        Self {
            native,
            kind: native.kind(),
            precision,
            scale,
        }
    }

    /// Native type.
    #[must_use]
    pub const fn native(&self) -> NativeType {
        self.native
    }

    /// Semantic kind.
    #[must_use]
    pub const fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Effective precision.
    #[must_use]
    pub const fn precision(&self) -> Option<u8> {
        self.precision
    }

    /// Effective scale.
    #[must_use]
    pub const fn scale(&self) -> Option<u8> {
        self.scale
    }

    /// Accepted integer range, if bounded.
    #[must_use]
    pub const fn bounds(&self) -> Option<Bounds> {
        self.native.bounds()
    }

    /// Type text usable in DDL (`decimal(15,2)`, `money`, `int`).
    #[must_use]
    pub fn sql_type(&self) -> String {
        match (self.native, self.precision, self.scale) {
            (NativeType::Decimal, Some(p), Some(s)) => format!("decimal({p},{s})"),
            (NativeType::Float, Some(p), _) if p != 53 => format!("float({p})"),
            (native, _, _) => native.sql_name().to_string(),
        }
    }

    /// Type text as reported for introspected columns.
    ///
    /// Exact numerics always carry precision and scale, including the money
    /// types (`money(19,4)`).
    #[must_use]
    pub fn described_sql_type(&self) -> String {
        match (self.precision, self.scale) {
            (Some(p), Some(s)) if self.native.is_decimal() => {
                format!("{}({p},{s})", self.native.sql_name())
            }
            _ => self.sql_type(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_format_is_fixed() {
        let money = ColumnType::new(NativeType::Money, Some(5), Some(1));
        assert_eq!(money.precision(), Some(19));
        assert_eq!(money.scale(), Some(4));

        let small = ColumnType::new(NativeType::SmallMoney, None, Some(0));
        assert_eq!(small.precision(), Some(10));
        assert_eq!(small.scale(), Some(4));
    }

    #[test]
    fn test_decimal_defaults() {
        let decimal = ColumnType::new(NativeType::Decimal, None, None);
        assert_eq!((decimal.precision(), decimal.scale()), (Some(18), Some(0)));

        let decimal = ColumnType::new(NativeType::Decimal, Some(15), None);
        assert_eq!((decimal.precision(), decimal.scale()), (Some(15), Some(0)));
    }

    #[test]
    fn test_integers_ignore_precision() {
        let int = ColumnType::new(NativeType::Integer, Some(10), Some(0));
        assert_eq!(int.precision(), None);
        assert_eq!(int.scale(), None);
        assert_eq!(int.kind(), TypeKind::Integer);
    }

    #[test]
    fn test_tinyint_bounds_are_half_open() {
        let bounds = NativeType::TinyInteger.bounds().unwrap();
        assert!(bounds.contains(0));
        assert!(bounds.contains(255));
        assert!(!bounds.contains(256));
        assert!(!bounds.contains(-1));
    }

    #[test]
    fn test_money_ranges() {
        let (min, max) = NativeType::SmallMoney.money_range().unwrap();
        assert_eq!(min.to_string(), "-214748.3648");
        assert_eq!(max.to_string(), "214748.3647");
        let (min, max) = NativeType::Money.money_range().unwrap();
        assert_eq!(min.to_string(), "-922337203685477.5808");
        assert_eq!(max.to_string(), "922337203685477.5807");
        assert_eq!(NativeType::Decimal.money_range(), None);
    }

    #[test]
    fn test_bigint_bounds() {
        let bounds = NativeType::BigInteger.bounds().unwrap();
        assert!(bounds.contains(i128::from(i64::MAX)));
        assert!(bounds.contains(i128::from(i64::MIN)));
        assert!(!bounds.contains(i128::from(i64::MAX) + 1));
    }

    #[test]
    fn test_kinds() {
        assert_eq!(NativeType::BigInteger.kind().as_str(), "bigint");
        assert_eq!(NativeType::SmallInteger.kind().as_str(), "integer");
        assert_eq!(NativeType::SmallMoney.kind().as_str(), "smallmoney");
        assert_eq!(NativeType::Real.kind().as_str(), "real");
    }

    #[test]
    fn test_sql_type_rendering() {
        assert_eq!(
            ColumnType::new(NativeType::Decimal, Some(15), Some(2)).sql_type(),
            "decimal(15,2)"
        );
        assert_eq!(ColumnType::new(NativeType::Money, None, None).sql_type(), "money");
        assert_eq!(
            ColumnType::new(NativeType::Money, None, None).described_sql_type(),
            "money(19,4)"
        );
        assert_eq!(ColumnType::new(NativeType::Float, None, None).sql_type(), "float");
        assert_eq!(ColumnType::new(NativeType::Real, None, None).sql_type(), "real");
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(NativeType::from_name("numeric"), Some(NativeType::Decimal));
        assert_eq!(NativeType::from_name("dec"), Some(NativeType::Decimal));
        assert_eq!(NativeType::from_name("integer"), Some(NativeType::Integer));
        assert_eq!(NativeType::from_name("double precision"), Some(NativeType::Float));
        assert_eq!(NativeType::from_name("varchar"), None);
    }
}
