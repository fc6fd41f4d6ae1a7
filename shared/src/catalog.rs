use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::error::{ConfigError, DashboardError};
use crate::table::{CellFormat, NumberLocale};

// ===== SERIES =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub category: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(category: impl Into<String>, value: f64) -> Self {
        Self {
            category: category.into(),
            value,
        }
    }
}

/// Chart data for one period. `trend` is kept in chronological order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PeriodSeries {
    #[serde(default)]
    pub trend: Vec<SeriesPoint>,
    #[serde(default)]
    pub breakdown: Vec<SeriesPoint>,
}

impl PeriodSeries {
    pub fn points(&self, kind: VisualizationKind) -> &[SeriesPoint] {
        match kind {
            VisualizationKind::Trend => &self.trend,
            VisualizationKind::Breakdown => &self.breakdown,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationKind {
    Trend,
    Breakdown,
}

impl VisualizationKind {
    /// Visualizations in navigation order; the index into this array is the
    /// visualization index held by `SelectionState`.
    pub const ALL: [VisualizationKind; 2] = [VisualizationKind::Trend, VisualizationKind::Breakdown];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        match self {
            VisualizationKind::Trend => 0,
            VisualizationKind::Breakdown => 1,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            VisualizationKind::Trend => "Monthly Performance Trend",
            VisualizationKind::Breakdown => "Product Performance Analysis",
        }
    }
}

impl fmt::Display for VisualizationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualizationKind::Trend => write!(f, "trend"),
            VisualizationKind::Breakdown => write!(f, "breakdown"),
        }
    }
}

// ===== PERIODS =====

/// Ordered, non-empty, duplicate-free list of period labels.
///
/// Display order is the configured order. The most recent period is the
/// greatest label, which holds for year-like labels (`2024`, `2023-24`).
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodList {
    labels: Arc<[String]>,
}

impl PeriodList {
    pub fn new(section: &'static str, labels: Vec<String>) -> Result<Self, ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::EmptyPeriods { section });
        }
        let mut seen = BTreeSet::new();
        for label in &labels {
            if !seen.insert(label.as_str()) {
                return Err(ConfigError::DuplicatePeriod {
                    section,
                    period: label.clone(),
                });
            }
        }
        Ok(Self {
            labels: labels.into(),
        })
    }

    pub fn contains(&self, period: &str) -> bool {
        self.labels.iter().any(|label| label == period)
    }

    pub fn most_recent(&self) -> &str {
        self.labels
            .iter()
            .max()
            .map(String::as_str)
            // Non-empty by construction.
            .unwrap_or_default()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// ===== TABLE ROWS =====

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TableRow {
    pub sequence_no: u32,
    pub label: String,
    #[serde(rename = "values", default)]
    pub values_by_period: BTreeMap<String, f64>,
    #[serde(rename = "percent_var", default)]
    pub percent_var_by_period: BTreeMap<String, f64>,
}

impl TableRow {
    /// Raw entry for `period` in the column rendered with `format`.
    pub fn entry(&self, format: CellFormat, period: &str) -> Option<f64> {
        match format {
            CellFormat::Value => self.values_by_period.get(period).copied(),
            CellFormat::Percent => self.percent_var_by_period.get(period).copied(),
        }
    }
}

// ===== CATALOG =====

/// Read-only dashboard data, built once from configuration and shared by
/// every reader behind an `Arc`.
#[derive(Debug, Clone)]
pub struct DataCatalog {
    title: String,
    chart_periods: PeriodList,
    series: BTreeMap<String, PeriodSeries>,
    table_periods: PeriodList,
    default_table_period: String,
    locale: NumberLocale,
    rows: Vec<TableRow>,
}

impl DataCatalog {
    /// Builds the catalog, rejecting structurally invalid configuration.
    ///
    /// Empty series and missing row entries are data-integrity defects but
    /// not structural ones; they are reported by `integrity_issues` and
    /// rendered in degraded form.
    pub fn from_config(config: DashboardConfig) -> Result<Self, ConfigError> {
        config.app.ensure_supported()?;

        let chart_periods = PeriodList::new("chart", config.chart.periods)?;
        for period in chart_periods.iter() {
            if !config.chart.series.contains_key(period) {
                return Err(ConfigError::MissingSeries(period.to_string()));
            }
        }

        let table_periods = PeriodList::new("table", config.table.periods)?;
        let default_table_period = match config.table.default_period {
            Some(period) if table_periods.contains(&period) => period,
            Some(period) => {
                return Err(ConfigError::UnknownDefaultPeriod {
                    section: "table",
                    period,
                });
            }
            None => table_periods.most_recent().to_string(),
        };

        let mut sequence_numbers = BTreeSet::new();
        for row in &config.table.rows {
            if !sequence_numbers.insert(row.sequence_no) {
                return Err(ConfigError::DuplicateSequenceNo(row.sequence_no));
            }
        }

        Ok(Self {
            title: config.chart.title,
            chart_periods,
            series: config.chart.series,
            table_periods,
            default_table_period,
            locale: config.table.locale,
            rows: config.table.rows,
        })
    }

    /// Points for `kind` in `period`, in configured order.
    pub fn get_series(
        &self,
        kind: VisualizationKind,
        period: &str,
    ) -> Result<&[SeriesPoint], DashboardError> {
        if !self.chart_periods.contains(period) {
            return Err(DashboardError::UnknownPeriod(period.to_string()));
        }
        self.series
            .get(period)
            .map(|series| series.points(kind))
            .ok_or_else(|| DashboardError::UnknownPeriod(period.to_string()))
    }

    pub fn get_table_rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn chart_periods(&self) -> &PeriodList {
        &self.chart_periods
    }

    pub fn table_periods(&self) -> &PeriodList {
        &self.table_periods
    }

    pub fn default_table_period(&self) -> &str {
        &self.default_table_period
    }

    pub fn locale(&self) -> NumberLocale {
        self.locale
    }

    /// Every empty chart series, non-finite chart value and missing table entry.
    pub fn integrity_issues(&self) -> Vec<DashboardError> {
        let mut issues = Vec::new();
        for period in self.chart_periods.iter() {
            for kind in VisualizationKind::ALL {
                let points = self.series.get(period).map_or(&[][..], |series| series.points(kind));
                if points.is_empty() {
                    issues.push(DashboardError::EmptySeries {
                        kind,
                        period: period.to_string(),
                    });
                }
                for point in points.iter().filter(|point| !point.value.is_finite()) {
                    issues.push(DashboardError::NonFiniteValue {
                        kind,
                        period: period.to_string(),
                        category: point.category.clone(),
                    });
                }
            }
        }
        for row in &self.rows {
            for period in self.table_periods.iter() {
                for format in [CellFormat::Value, CellFormat::Percent] {
                    if row.entry(format, period).is_none() {
                        issues.push(DashboardError::MissingRowEntry {
                            sequence_no: row.sequence_no,
                            label: row.label.clone(),
                            column: format.column_name(),
                            period: period.to_string(),
                        });
                    }
                }
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;

    fn sample_catalog() -> DataCatalog {
        DataCatalog::from_config(DashboardConfig::sample().unwrap()).unwrap()
    }

    #[test]
    fn trend_series_keeps_month_order() {
        let catalog = sample_catalog();
        let points = catalog.get_series(VisualizationKind::Trend, "2024").unwrap();
        let months: Vec<&str> = points.iter().map(|p| p.category.as_str()).collect();
        assert_eq!(
            months,
            ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"]
        );
    }

    #[test]
    fn unknown_period_is_reported() {
        let catalog = sample_catalog();
        assert_eq!(
            catalog.get_series(VisualizationKind::Breakdown, "1999"),
            Err(DashboardError::UnknownPeriod("1999".to_string()))
        );
    }

    #[test]
    fn most_recent_period_is_greatest_label() {
        let periods = PeriodList::new(
            "chart",
            vec!["2024".into(), "2023".into(), "2022".into()],
        )
        .unwrap();
        assert_eq!(periods.most_recent(), "2024");

        let fiscal = PeriodList::new("table", vec!["2019-20".into(), "2024-25".into(), "2021-22".into()]).unwrap();
        assert_eq!(fiscal.most_recent(), "2024-25");
    }

    #[test]
    fn period_list_rejects_empty_and_duplicates() {
        assert!(matches!(
            PeriodList::new("chart", Vec::new()),
            Err(ConfigError::EmptyPeriods { section: "chart" })
        ));
        assert!(matches!(
            PeriodList::new("chart", vec!["2024".into(), "2024".into()]),
            Err(ConfigError::DuplicatePeriod { .. })
        ));
    }

    #[test]
    fn chart_period_without_series_is_rejected() {
        let mut config = DashboardConfig::sample().unwrap();
        config.chart.periods.push("2021".to_string());
        assert!(matches!(
            DataCatalog::from_config(config),
            Err(ConfigError::MissingSeries(period)) if period == "2021"
        ));
    }

    #[test]
    fn table_default_period_comes_from_config() {
        let catalog = sample_catalog();
        assert_eq!(catalog.default_table_period(), "2023-24");

        let mut config = DashboardConfig::sample().unwrap();
        config.table.default_period = None;
        let catalog = DataCatalog::from_config(config).unwrap();
        assert_eq!(catalog.default_table_period(), "2024-25");
    }

    #[test]
    fn sample_data_has_no_integrity_issues() {
        assert!(sample_catalog().integrity_issues().is_empty());
    }

    #[test]
    fn integrity_issues_list_missing_entries_and_empty_series() {
        let mut config = DashboardConfig::sample().unwrap();
        config.table.rows[0].values_by_period.remove("2021-22");
        if let Some(series) = config.chart.series.get_mut("2023") {
            series.breakdown.clear();
        }
        let catalog = DataCatalog::from_config(config).unwrap();
        let issues = catalog.integrity_issues();
        assert_eq!(issues.len(), 2);
        assert!(issues.contains(&DashboardError::EmptySeries {
            kind: VisualizationKind::Breakdown,
            period: "2023".to_string(),
        }));
        assert!(issues.iter().any(|issue| matches!(
            issue,
            DashboardError::MissingRowEntry { sequence_no: 1, column: "Value", period, .. } if period == "2021-22"
        )));
    }

    #[test]
    fn non_finite_chart_values_are_reported() {
        let mut config = DashboardConfig::sample().unwrap();
        if let Some(series) = config.chart.series.get_mut("2022") {
            series.breakdown[1].value = f64::NAN;
        }
        let category = config.chart.series["2022"].breakdown[1].category.clone();
        let catalog = DataCatalog::from_config(config).unwrap();
        assert_eq!(
            catalog.integrity_issues(),
            [DashboardError::NonFiniteValue {
                kind: VisualizationKind::Breakdown,
                period: "2022".to_string(),
                category,
            }]
        );
    }
}
