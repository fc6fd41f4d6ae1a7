use serde::{Deserialize, Serialize};

use crate::catalog::DataCatalog;
use crate::error::DashboardError;

/// Text shown in a cell whose row has no entry for the selected period.
pub const MISSING_ENTRY_PLACEHOLDER: &str = "-";

// ===== FORMATTING =====

/// Digit grouping and decimal conventions for the value column.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberLocale {
    /// `101,335.84`
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    /// `1,01,335.84` (lakh/crore grouping)
    #[serde(rename = "en-IN")]
    EnIn,
    /// `101.335,84`
    #[serde(rename = "de-DE")]
    DeDe,
}

impl NumberLocale {
    fn group_separator(self) -> char {
        match self {
            NumberLocale::EnUs | NumberLocale::EnIn => ',',
            NumberLocale::DeDe => '.',
        }
    }

    fn decimal_separator(self) -> char {
        match self {
            NumberLocale::EnUs | NumberLocale::EnIn => '.',
            NumberLocale::DeDe => ',',
        }
    }

    fn group_digits(self, digits: &str) -> String {
        let separator = self.group_separator();
        let (head, tail) = match self {
            // Indian grouping: the last three digits, then pairs.
            NumberLocale::EnIn if digits.len() > 3 => digits.split_at(digits.len() - 3),
            NumberLocale::EnIn => return digits.to_string(),
            NumberLocale::EnUs | NumberLocale::DeDe => ("", digits),
        };
        let head_group = if head.is_empty() { 3 } else { 2 };

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
        for (index, digit) in head.chars().enumerate() {
            if index > 0 && (head.len() - index) % head_group == 0 {
                grouped.push(separator);
            }
            grouped.push(digit);
        }
        for (index, digit) in tail.chars().enumerate() {
            if (index > 0 || !head.is_empty()) && (tail.len() - index) % 3 == 0 {
                grouped.push(separator);
            }
            grouped.push(digit);
        }
        grouped
    }
}

/// How a numeric table cell is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    /// Locale digit grouping, at most three fraction digits, trailing zeros
    /// trimmed: `101335.84` → `101,335.84`, `11435` → `11,435`.
    Value,
    /// Exactly two decimals and a percent sign: `22.84` → `22.84%`.
    Percent,
}

impl CellFormat {
    pub fn format(self, value: f64, locale: NumberLocale) -> String {
        match self {
            CellFormat::Value => format_grouped(value, locale),
            CellFormat::Percent => format!("{:.2}%", normalize_zero(value)),
        }
    }

    /// Formats a possibly missing entry, falling back to the placeholder.
    pub fn format_entry(self, value: Option<f64>, locale: NumberLocale) -> String {
        value.map_or_else(
            || MISSING_ENTRY_PLACEHOLDER.to_string(),
            |value| self.format(value, locale),
        )
    }

    pub fn column_name(self) -> &'static str {
        match self {
            CellFormat::Value => "Value",
            CellFormat::Percent => "% var w.r.t PY",
        }
    }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

fn format_grouped(value: f64, locale: NumberLocale) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut formatted = String::new();
    let is_zero = integer.bytes().all(|b| b == b'0') && fraction.is_empty();
    if value.is_sign_negative() && !is_zero {
        formatted.push('-');
    }
    formatted.push_str(&locale.group_digits(integer));
    if !fraction.is_empty() {
        formatted.push(locale.decimal_separator());
        formatted.push_str(fraction);
    }
    formatted
}

// ===== TABLE VIEW =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub label: &'static str,
    pub min_width: u32,
    pub align: ColumnAlign,
    pub format: Option<CellFormat>,
}

pub const COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec {
        label: "Sr.No",
        min_width: 50,
        align: ColumnAlign::Center,
        format: None,
    },
    ColumnSpec {
        label: "Particulars",
        min_width: 300,
        align: ColumnAlign::Left,
        format: None,
    },
    ColumnSpec {
        label: "Value",
        min_width: 150,
        align: ColumnAlign::Right,
        format: Some(CellFormat::Value),
    },
    ColumnSpec {
        label: "% var w.r.t PY",
        min_width: 120,
        align: ColumnAlign::Right,
        format: Some(CellFormat::Percent),
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub sequence_no: u32,
    pub label: String,
    pub formatted_value: String,
    pub formatted_percent_var: String,
}

/// Table rows projected for one period, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TableModel {
    pub period: String,
    pub rows: Vec<DisplayRow>,
    /// `MissingRowEntry` for every placeholder cell.
    pub issues: Vec<DashboardError>,
}

impl TableModel {
    pub fn derive(catalog: &DataCatalog, period: &str) -> Result<Self, DashboardError> {
        if !catalog.table_periods().contains(period) {
            return Err(DashboardError::UnknownPeriod(period.to_string()));
        }
        let locale = catalog.locale();
        let mut issues = Vec::new();

        let rows = catalog
            .get_table_rows()
            .iter()
            .map(|row| {
                let mut cell = |format: CellFormat| {
                    let entry = row.entry(format, period);
                    if entry.is_none() {
                        issues.push(DashboardError::MissingRowEntry {
                            sequence_no: row.sequence_no,
                            label: row.label.clone(),
                            column: format.column_name(),
                            period: period.to_string(),
                        });
                    }
                    format.format_entry(entry, locale)
                };
                let formatted_value = cell(CellFormat::Value);
                let formatted_percent_var = cell(CellFormat::Percent);
                DisplayRow {
                    sequence_no: row.sequence_no,
                    label: row.label.clone(),
                    formatted_value,
                    formatted_percent_var,
                }
            })
            .collect();

        Ok(Self {
            period: period.to_string(),
            rows,
            issues,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    fn value(v: f64) -> String {
        CellFormat::Value.format(v, NumberLocale::EnUs)
    }

    #[test]
    fn value_format_groups_thousands() {
        assert_eq!(value(101335.84), "101,335.84");
        assert_eq!(value(11435.0), "11,435");
        assert_eq!(value(1099.1), "1,099.1");
        assert_eq!(value(77.259), "77.259");
        assert_eq!(value(999.0), "999");
        assert_eq!(value(1234567.0), "1,234,567");
        assert_eq!(value(-4520.5), "-4,520.5");
        assert_eq!(value(0.0), "0");
    }

    #[test]
    fn value_format_rounds_to_three_fraction_digits() {
        assert_eq!(value(1.23456), "1.235");
        assert_eq!(value(-0.0001), "0");
    }

    #[test]
    fn value_format_follows_locale() {
        assert_eq!(CellFormat::Value.format(101335.84, NumberLocale::EnIn), "1,01,335.84");
        assert_eq!(CellFormat::Value.format(12345678.0, NumberLocale::EnIn), "1,23,45,678");
        assert_eq!(CellFormat::Value.format(999.5, NumberLocale::EnIn), "999.5");
        assert_eq!(CellFormat::Value.format(101335.84, NumberLocale::DeDe), "101.335,84");
    }

    #[test]
    fn percent_format_uses_two_decimals() {
        let percent = |v| CellFormat::Percent.format(v, NumberLocale::EnUs);
        assert_eq!(percent(22.84), "22.84%");
        assert_eq!(percent(-3.37), "-3.37%");
        assert_eq!(percent(1385.82), "1385.82%");
        assert_eq!(percent(0.0), "0.00%");
        assert_eq!(percent(-0.0), "0.00%");
    }

    #[test]
    fn table_projects_selected_period() {
        let catalog = DataCatalog::from_config(DashboardConfig::sample().unwrap()).unwrap();
        let model = TableModel::derive(&catalog, "2019-20").unwrap();

        assert_eq!(model.rows.len(), 9);
        assert!(model.issues.is_empty());
        let revenue = &model.rows[1];
        assert_eq!(revenue.sequence_no, 2);
        assert_eq!(revenue.label, "Originating Revenue");
        assert_eq!(revenue.formatted_value, "101,335.84");
        assert_eq!(revenue.formatted_percent_var, "-7.56%");

        let model = TableModel::derive(&catalog, "2022-23").unwrap();
        assert_eq!(model.rows[0].formatted_percent_var, "22.84%");
    }

    #[test]
    fn missing_entry_renders_placeholder() {
        let mut config = DashboardConfig::sample().unwrap();
        config.table.rows[2].values_by_period.remove("2023-24");
        let catalog = DataCatalog::from_config(config).unwrap();

        let model = TableModel::derive(&catalog, "2023-24").unwrap();
        assert_eq!(model.rows[2].formatted_value, MISSING_ENTRY_PLACEHOLDER);
        assert_eq!(model.rows[2].formatted_percent_var, "-92.22%");
        assert_eq!(model.issues.len(), 1);
        assert!(matches!(
            &model.issues[0],
            DashboardError::MissingRowEntry { sequence_no: 3, column: "Value", .. }
        ));
    }

    #[test]
    fn unknown_table_period_is_rejected() {
        let catalog = DataCatalog::from_config(DashboardConfig::sample().unwrap()).unwrap();
        assert_eq!(
            TableModel::derive(&catalog, "2024"),
            Err(DashboardError::UnknownPeriod("2024".to_string()))
        );
    }
}
