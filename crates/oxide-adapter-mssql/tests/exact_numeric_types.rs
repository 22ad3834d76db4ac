//! Exact numeric columns: declaration, value casting and introspection.

mod common;
use common::*;

use oxide_adapter_core::{ColumnDefinition, DefaultValue, SchemaCreation, SqlValue, TableDefinition};
use oxide_adapter_mssql::{resolve_type, AdapterError, DriverType, NativeType, TypeKind};

#[test]
fn decimal_and_numeric_are_the_same_type() {
    let decimal = resolve_type("decimal", None, None).unwrap();
    let numeric = resolve_type("NUMERIC", None, None).unwrap();
    let dec = resolve_type("dec", None, None).unwrap();
    assert_eq!(decimal, numeric);
    assert_eq!(decimal, dec);
    assert_eq!(decimal.native(), NativeType::Decimal);
    assert_eq!(decimal.kind(), TypeKind::Decimal);
}

#[test]
fn decimal_defaults_to_18_0() {
    let decimal = resolve_type("decimal", None, None).unwrap();
    assert_eq!(decimal.precision(), Some(18));
    assert_eq!(decimal.scale(), Some(0));

    let described = describe("decimal", DriverType::Decimal, 18, 0);
    assert_eq!(described.sql_type, "decimal(18,0)");
    assert_eq!((described.precision, described.scale), (Some(18), Some(0)));
}

#[test]
fn decimal_with_scale_zero_and_fractional_default() {
    let column = ColumnDefinition::new("amount", "decimal")
        .precision(15, Some(0))
        .default(DefaultValue::String("9.11".to_string()));
    assert_eq!(
        adapter().column_definition(&column),
        "[amount] decimal(15,0) DEFAULT '9.11'"
    );

    let resolved = resolve_type("decimal(15,0)", None, None).unwrap();
    assert_eq!(
        resolved.cast_value(&SqlValue::Text("9.11".to_string())).unwrap(),
        SqlValue::Text("9".to_string())
    );
}

#[test]
fn decimal_15_2_round_trip() {
    let table = TableDefinition::new("prices")
        .column(ColumnDefinition::new("price", "decimal").precision(15, Some(2)));
    assert_eq!(
        adapter().visit_table_definition(&table).unwrap(),
        "CREATE TABLE [prices] ([price] decimal(15,2))"
    );

    let described = describe("decimal", DriverType::Decimal, 15, 2);
    assert_eq!(described.sql_type, "decimal(15,2)");
    let resolved = resolve_type(&described.sql_type, None, None).unwrap();
    assert_eq!(
        resolved.cast_value(&SqlValue::Float(12.345)).unwrap(),
        SqlValue::Text("12.35".to_string())
    );
}

#[test]
fn numeric_10_4() {
    let described = describe("numeric", DriverType::Numeric, 10, 4);
    assert_eq!(described.sql_type, "numeric(10,4)");
    assert_eq!((described.precision, described.scale), (Some(10), Some(4)));

    let resolved = resolve_type(&described.sql_type, None, None).unwrap();
    assert_eq!(
        resolved.cast_value(&SqlValue::Int(7)).unwrap(),
        SqlValue::Text("7.0000".to_string())
    );
    assert!(matches!(
        resolved.cast_value(&SqlValue::Int(1_000_000)),
        Err(AdapterError::OutOfRange { .. })
    ));
}

#[test]
fn money_is_always_19_4() {
    for (precision, scale) in [(None, None), (Some(10), Some(2)), (Some(38), Some(0))] {
        let money = resolve_type("money", precision, scale).unwrap();
        assert_eq!((money.precision(), money.scale()), (Some(19), Some(4)));
        assert_eq!(money.kind(), TypeKind::Money);
    }
}

#[test]
fn smallmoney_is_always_10_4() {
    for (precision, scale) in [(None, None), (Some(19), Some(4)), (Some(5), Some(1))] {
        let small = resolve_type("SmallMoney", precision, scale).unwrap();
        assert_eq!((small.precision(), small.scale()), (Some(10), Some(4)));
        assert_eq!(small.kind(), TypeKind::Smallmoney);
    }
}

#[test]
fn money_round_trip_reports_fixed_format() {
    let column = ColumnDefinition::new("balance", "money")
        .precision(12, Some(2))
        .default(DefaultValue::Float(54_534.678_99));
    assert_eq!(
        adapter().column_definition(&column),
        "[balance] money DEFAULT 54534.67899"
    );

    let money = resolve_type(&column.sql_type, column.precision, column.scale).unwrap();
    assert_eq!(
        money.cast_value(&SqlValue::Float(54_534.678_99)).unwrap(),
        SqlValue::Text("54534.6790".to_string())
    );

    let described = describe("money", DriverType::Decimal, 19, 4);
    assert_eq!(described.sql_type, "money(19,4)");
    assert_eq!(described.precision, Some(19));
    assert_eq!(described.scale, Some(4));
}

#[test]
fn smallmoney_round_trip_reports_fixed_format() {
    let described = describe("smallmoney", DriverType::Decimal, 10, 4);
    assert_eq!(described.sql_type, "smallmoney(10,4)");
    assert_eq!((described.precision, described.scale), (Some(10), Some(4)));

    let small = resolve_type(&described.sql_type, None, None).unwrap();
    assert!(matches!(
        small.cast_value(&SqlValue::Int(1_000_000)),
        Err(AdapterError::OutOfRange { .. })
    ));
    assert!(matches!(
        small.cast_value(&SqlValue::Int(500_000)),
        Err(AdapterError::OutOfRange { .. })
    ));
    assert_eq!(
        small.cast_value(&SqlValue::Int(214_748)).unwrap(),
        SqlValue::Text("214748.0000".to_string())
    );
    assert_eq!(
        small.cast_value(&SqlValue::Float(214_748.364_7)).unwrap(),
        SqlValue::Text("214748.3647".to_string())
    );
    assert!(matches!(
        small.cast_value(&SqlValue::Float(214_748.364_8)),
        Err(AdapterError::OutOfRange { .. })
    ));
}

#[test]
fn tinyint_range() {
    let tiny = resolve_type("tinyint", None, None).unwrap();
    assert_eq!(tiny.cast_value(&SqlValue::Int(0)).unwrap(), SqlValue::Int(0));
    assert_eq!(tiny.cast_value(&SqlValue::Int(255)).unwrap(), SqlValue::Int(255));
    for rejected in [256, -1] {
        assert!(matches!(
            tiny.cast_value(&SqlValue::Int(rejected)),
            Err(AdapterError::OutOfRange { .. })
        ));
    }
}

#[test]
fn integer_family_ranges() {
    let small = resolve_type("smallint", None, None).unwrap();
    assert!(small.cast_value(&SqlValue::Int(32_767)).is_ok());
    assert!(small.cast_value(&SqlValue::Int(-32_768)).is_ok());
    assert!(small.cast_value(&SqlValue::Int(32_768)).is_err());

    let big = resolve_type("bigint", None, None).unwrap();
    assert_eq!(big.kind(), TypeKind::Bigint);
    assert!(big.cast_value(&SqlValue::Int(i64::MAX)).is_ok());
    assert!(matches!(
        big.cast_value(&SqlValue::Text("9223372036854775808".to_string())),
        Err(AdapterError::OutOfRange { .. })
    ));
}

#[test]
fn unknown_type_is_reported() {
    assert!(matches!(
        resolve_type("hierarchyid", None, None),
        Err(AdapterError::UnrecognizedType(_))
    ));
}
