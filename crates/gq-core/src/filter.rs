//! Categorical and date-range row filtering

use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::table::ResultTable;
use crate::value::Value;
use crate::CoreError;

/// Timestamp layout accepted for date bounds and stored in date columns
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dimension name to raw filter value, applied in insertion order
pub type FilterSpec = IndexMap<String, String>;

/// How comma-separated filter values are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Each character of the value is an equality filter, all must match
    #[default]
    Literal,

    /// The value is split on commas and any piece may match
    SplitAny,
}

/// Filter `table` on one categorical column.
///
/// An empty `raw` value leaves the table untouched without looking the
/// column up. Only text cells can equal a filter value.
pub fn apply_filter(
    mut table: ResultTable,
    column: &str,
    raw: &str,
    mode: FilterMode,
) -> Result<ResultTable, CoreError> {
    if raw.is_empty() {
        return Ok(table);
    }
    let idx = table.require_column(column)?;

    if !raw.contains(',') {
        table.retain_rows(|row| text_equals(&row[idx], raw));
        return Ok(table);
    }

    let stripped = raw.trim_end_matches(',');
    match mode {
        FilterMode::Literal => {
            // Indexes single characters, so "a,b" requires a cell equal to
            // "a", "," and "b" at once.
            // TODO: make SplitAny the default once clients stop sending
            // comma lists in literal mode.
            for ch in stripped.chars() {
                let mut buf = [0u8; 4];
                let needle: &str = ch.encode_utf8(&mut buf);
                table.retain_rows(|row| text_equals(&row[idx], needle));
            }
        }
        FilterMode::SplitAny => {
            let choices: Vec<&str> = stripped.split(',').filter(|s| !s.is_empty()).collect();
            table.retain_rows(|row| choices.iter().any(|c| text_equals(&row[idx], c)));
        }
    }

    Ok(table)
}

/// Apply every dimension of `spec` in order
pub fn apply_filters(
    table: ResultTable,
    spec: &FilterSpec,
    mode: FilterMode,
) -> Result<ResultTable, CoreError> {
    spec.iter()
        .try_fold(table, |table, (column, raw)| apply_filter(table, column, raw, mode))
}

fn text_equals(value: &Value, needle: &str) -> bool {
    matches!(value, Value::Text(s) if s == needle)
}

/// Inclusive date range, compared in its formatted text form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    start: String,
    end: String,
}

impl DateRange {
    /// Parse both bounds; `None` when either one is empty.
    pub fn parse(start: &str, end: &str) -> Result<Option<Self>, CoreError> {
        if start.is_empty() || end.is_empty() {
            return Ok(None);
        }
        let start = parse_bound(start)?;
        let end = parse_bound(end)?;
        Ok(Some(Self::new(start, end)))
    }

    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start: start.format(DATE_FORMAT).to_string(),
            end: end.format(DATE_FORMAT).to_string(),
        }
    }

    /// String comparison against the bounds, both ends inclusive
    pub fn contains(&self, value: &Value) -> bool {
        match value.as_text() {
            Some(text) => self.start.as_str() <= &*text && &*text <= self.end.as_str(),
            None => false,
        }
    }
}

fn parse_bound(raw: &str) -> Result<NaiveDateTime, CoreError> {
    NaiveDateTime::parse_from_str(raw, DATE_FORMAT).map_err(|source| CoreError::DateParse {
        value: raw.to_string(),
        source,
    })
}

/// Keep rows whose `column` cell falls inside `range`
pub fn filter_date_range(
    mut table: ResultTable,
    column: &str,
    range: &DateRange,
) -> Result<ResultTable, CoreError> {
    let idx = table.require_column(column)?;
    table.retain_rows(|row| range.contains(&row[idx]));
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brands(values: &[&str]) -> ResultTable {
        let rows = values.iter().map(|v| vec![Value::from(*v)]).collect();
        ResultTable::from_rows(vec!["BRAND".into()], rows).unwrap()
    }

    fn column_values(table: &ResultTable) -> Vec<String> {
        table.rows().iter().map(|r| r[0].to_string()).collect()
    }

    #[test]
    fn test_empty_value_is_noop() {
        let table = brands(&["apple", "samsung"]);
        let result = apply_filter(table.clone(), "BRAND", "", FilterMode::Literal).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_empty_value_skips_unknown_column() {
        let table = brands(&["apple"]);
        let result = apply_filter(table.clone(), "NOPE", "", FilterMode::SplitAny).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_unknown_column_errors() {
        let result = apply_filter(brands(&["apple"]), "NOPE", "x", FilterMode::Literal);
        assert!(matches!(result, Err(CoreError::UnknownColumn(c)) if c == "NOPE"));
    }

    #[test]
    fn test_single_value_equality() {
        let table = brands(&["apple", "samsung", "apple", ""]);
        let result = apply_filter(table, "BRAND", "apple", FilterMode::Literal).unwrap();
        assert_eq!(column_values(&result), vec!["apple", "apple"]);
    }

    #[test]
    fn test_numbers_never_equal_filter_text() {
        let table = ResultTable::from_rows(
            vec!["MODEL".into()],
            vec![vec![Value::Int(5)], vec![Value::from("5")], vec![Value::Null]],
        )
        .unwrap();
        let result = apply_filter(table, "MODEL", "5", FilterMode::Literal).unwrap();
        assert_eq!(result.rows(), &[vec![Value::from("5")]]);
    }

    #[test]
    fn test_literal_mode_intersects_characters() {
        // "a,b," -> "a,b" -> cells must equal "a" and "," and "b"
        let table = brands(&["a", "b", "a,b", ","]);
        let result = apply_filter(table, "BRAND", "a,b,", FilterMode::Literal).unwrap();
        assert!(result.is_empty());

        // trailing commas are stripped, leaving a single-character filter
        let table = brands(&["a", "b", "a,"]);
        let result = apply_filter(table, "BRAND", "a,,,", FilterMode::Literal).unwrap();
        assert_eq!(column_values(&result), vec!["a"]);
    }

    #[test]
    fn test_literal_mode_only_commas() {
        let table = brands(&["a", "b"]);
        let result = apply_filter(table.clone(), "BRAND", ",,", FilterMode::Literal).unwrap();
        assert_eq!(result, table);
    }

    #[test]
    fn test_split_any_mode() {
        let table = brands(&["apple", "samsung", "nokia", "apple"]);
        let result = apply_filter(table, "BRAND", "apple,nokia,", FilterMode::SplitAny).unwrap();
        assert_eq!(column_values(&result), vec!["apple", "nokia", "apple"]);
    }

    #[test]
    fn test_apply_filters_in_order() {
        let table = ResultTable::from_rows(
            vec!["BRAND".into(), "DEVICE".into()],
            vec![
                vec![Value::from("apple"), Value::from("phone")],
                vec![Value::from("apple"), Value::from("tablet")],
                vec![Value::from("nokia"), Value::from("phone")],
            ],
        )
        .unwrap();

        let mut spec = FilterSpec::new();
        spec.insert("BRAND".into(), "apple".into());
        spec.insert("DEVICE".into(), "phone".into());
        spec.insert("MODEL".into(), String::new());

        let result = apply_filters(table, &spec, FilterMode::Literal).unwrap();
        assert_eq!(result.row_count(), 1);
    }

    fn dates(values: &[&str]) -> ResultTable {
        let rows = values.iter().map(|v| vec![Value::from(*v)]).collect();
        ResultTable::from_rows(vec!["TEST_DATE".into()], rows).unwrap()
    }

    #[test]
    fn test_date_range_inclusive() {
        let range = DateRange::parse("2024-01-01 00:00:00", "2024-01-02 00:00:00")
            .unwrap()
            .unwrap();
        let table = dates(&[
            "2024-01-01 00:00:00",
            "2024-01-02 00:00:00",
            "2024-01-02 00:00:01",
            "2023-12-31 23:59:59",
        ]);
        let result = filter_date_range(table, "TEST_DATE", &range).unwrap();
        assert_eq!(
            column_values(&result),
            vec!["2024-01-01 00:00:00", "2024-01-02 00:00:00"]
        );
    }

    #[test]
    fn test_date_range_excludes_before_start() {
        let range = DateRange::parse("2023-12-01 00:00:00", "2023-12-31 23:59:59")
            .unwrap()
            .unwrap();
        let result =
            filter_date_range(dates(&["2024-01-01 00:00:00"]), "TEST_DATE", &range).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_date_range_skips_nulls() {
        let range = DateRange::parse("2024-01-01 00:00:00", "2024-12-31 00:00:00")
            .unwrap()
            .unwrap();
        let table =
            ResultTable::from_rows(vec!["TEST_DATE".into()], vec![vec![Value::Null]]).unwrap();
        assert!(filter_date_range(table, "TEST_DATE", &range).unwrap().is_empty());
    }

    #[test]
    fn test_date_range_requires_both_bounds() {
        assert_eq!(DateRange::parse("", "2024-01-01 00:00:00").unwrap(), None);
        assert_eq!(DateRange::parse("garbage", "").unwrap(), None);
    }

    #[test]
    fn test_date_parse_error() {
        let result = DateRange::parse("2024-01-01", "2024-01-02 00:00:00");
        assert!(matches!(
            result,
            Err(CoreError::DateParse { ref value, .. }) if value == "2024-01-01"
        ));
    }
}
