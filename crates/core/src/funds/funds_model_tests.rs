//! Tests for fund domain models.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValidationError};
    use crate::funds::{
        DateRange, FundDiv, FundManager, FundNav, FundPortfolio, FundShare, FundTable,
    };
    use crate::tabular::{Record, Value};

    fn record(fields: &[(&str, Value)]) -> Record {
        fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }

    // ==================== FundTable ====================

    #[test]
    fn test_fund_table_names_round_trip() {
        for table in FundTable::ALL {
            assert_eq!(FundTable::from_name(table.name()), Some(table));
            assert_eq!(table.name().parse::<FundTable>().unwrap(), table);
        }
        assert!(FundTable::from_name("collection_metadata").is_none());
        assert!("fund_nope".parse::<FundTable>().is_err());
    }

    #[test]
    fn test_fund_table_date_columns() {
        assert_eq!(FundTable::Basic.date_column(), None);
        assert_eq!(FundTable::Nav.date_column(), Some("nav_date"));
        assert_eq!(FundTable::Portfolio.date_column(), Some("end_date"));
        assert!(FundTable::Portfolio.full_order().ends_with("mkv DESC"));
    }

    // ==================== Typed rows ====================

    #[test]
    fn test_manager_activity() {
        let active = FundManager::try_from(&record(&[
            ("ts_code", "000001.OF".into()),
            ("name", "Zhang".into()),
            ("begin_date", "20200101".into()),
            ("end_date", Value::Null),
        ]))
        .unwrap();
        assert!(active.is_active());

        let blank_end = FundManager {
            end_date: Some(String::new()),
            ..active.clone()
        };
        assert!(blank_end.is_active());

        let departed = FundManager {
            end_date: Some("20230101".to_string()),
            ..active
        };
        assert!(!departed.is_active());
    }

    #[test]
    fn test_typed_rows_from_records() {
        let nav = FundNav::try_from(&record(&[
            ("ts_code", "000001.OF".into()),
            ("nav_date", "20240105".into()),
            ("unit_nav", 1.25.into()),
            ("accum_nav", Value::Integer(3)),
        ]))
        .unwrap();
        assert_eq!(nav.unit_nav, Some(1.25));
        assert_eq!(nav.accum_nav, Some(3.0));

        let share = FundShare::try_from(&record(&[
            ("ts_code", "000001.OF".into()),
            ("trade_date", "20240105".into()),
            ("fd_share", 1000.0.into()),
        ]))
        .unwrap();
        assert_eq!(share.fd_share, Some(1000.0));

        let div = FundDiv::try_from(&record(&[
            ("ts_code", "000001.OF".into()),
            ("ann_date", "20230610".into()),
            ("div_cash", Value::Null),
        ]))
        .unwrap();
        assert_eq!(div.div_cash, None);

        let holding = FundPortfolio::try_from(&record(&[
            ("ts_code", "000001.OF".into()),
            ("end_date", "20231231".into()),
            ("symbol", "600519.SH".into()),
            ("mkv", 5.0e6.into()),
        ]))
        .unwrap();
        assert_eq!(holding.symbol, "600519.SH");
    }

    #[test]
    fn test_typed_row_missing_key_column() {
        let err = FundNav::try_from(&record(&[("ts_code", "000001.OF".into())])).unwrap_err();
        match err {
            Error::Validation(ValidationError::MissingField(field)) => {
                assert_eq!(field, "nav_date")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // ==================== DateRange ====================

    #[test]
    fn test_date_range_normalizes_bounds() {
        let range = DateRange::parse(Some("2024-01-01"), Some("20240331")).unwrap();
        assert_eq!(range.start.as_deref(), Some("20240101"));
        assert_eq!(range.end.as_deref(), Some("20240331"));
        assert_eq!(DateRange::parse(None, None).unwrap(), DateRange::all());
    }

    #[test]
    fn test_date_range_rejects_inverted_bounds() {
        assert!(DateRange::parse(Some("20240331"), Some("20240101")).is_err());
        assert!(DateRange::parse(Some("not-a-date"), None).is_err());
    }
}
