use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{PeriodSeries, TableRow};
use crate::error::ConfigError;
use crate::table::NumberLocale;

/// Sample data bundled with the app; the backend can replace it with a
/// `dashboard.toml` from disk.
const SAMPLE_DASHBOARD_TOML: &str = include_str!("sample_dashboard.toml");

// ===== CONFIG TYPES =====

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct DashboardConfig {
    #[serde(default)]
    pub app: AppSection,
    pub chart: ChartSection,
    pub table: TableSection,
}

// AppSection carries the config format version so files written for an
// older layout can be detected before they are interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppSection {
    pub version: String,
}

impl AppSection {
    /// Current configuration format version
    pub const CURRENT_VERSION: &'static str = "1.0.0";

    pub fn is_supported_version(&self) -> bool {
        matches!(self.version.as_str(), "1.0.0")
    }

    pub fn ensure_supported(&self) -> Result<(), ConfigError> {
        if self.is_supported_version() {
            Ok(())
        } else {
            Err(ConfigError::UnsupportedVersion(self.version.clone()))
        }
    }
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChartSection {
    #[serde(default = "default_chart_title")]
    pub title: String,
    pub periods: Vec<String>,
    #[serde(default)]
    pub series: BTreeMap<String, PeriodSeries>,
}

impl Default for ChartSection {
    fn default() -> Self {
        Self {
            title: default_chart_title(),
            periods: Vec::new(),
            series: BTreeMap::new(),
        }
    }
}

fn default_chart_title() -> String {
    "Performance Analytics".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TableSection {
    pub periods: Vec<String>,
    #[serde(default)]
    pub default_period: Option<String>,
    #[serde(default)]
    pub locale: NumberLocale,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

// ===== LOADING =====

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.app.ensure_supported()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The bundled sample dashboard.
    pub fn sample() -> Result<Self, ConfigError> {
        Self::from_toml_str(SAMPLE_DASHBOARD_TOML)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VisualizationKind;

    #[test]
    fn sample_config_parses() {
        let config = DashboardConfig::sample().unwrap();
        assert_eq!(config.app.version, AppSection::CURRENT_VERSION);
        assert_eq!(config.chart.periods, ["2024", "2023", "2022"]);
        assert_eq!(config.table.periods.len(), 6);
        assert_eq!(config.table.rows.len(), 9);
        assert_eq!(config.table.locale, NumberLocale::EnUs);
        assert_eq!(
            config.chart.series["2022"].points(VisualizationKind::Breakdown).len(),
            5
        );
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let content = r#"
            [app]
            version = "0.9.0"

            [chart]
            periods = ["2024"]

            [table]
            periods = ["2023-24"]
        "#;
        assert!(matches!(
            DashboardConfig::from_toml_str(content),
            Err(ConfigError::UnsupportedVersion(version)) if version == "0.9.0"
        ));
    }

    #[test]
    fn missing_app_section_defaults_to_current_version() {
        let content = r#"
            [chart]
            periods = ["2024"]

            [chart.series.2024]
            trend = [{ category = "Jan", value = 10 }]

            [table]
            periods = ["2023-24"]
            locale = "en-IN"
        "#;
        let config = DashboardConfig::from_toml_str(content).unwrap();
        assert_eq!(config.app, AppSection::default());
        assert_eq!(config.chart.title, "Performance Analytics");
        assert_eq!(config.table.locale, NumberLocale::EnIn);
        assert_eq!(config.chart.series["2024"].trend[0].value, 10.0);
        assert!(config.chart.series["2024"].breakdown.is_empty());
    }

    #[test]
    fn config_survives_toml_serialization() {
        let config = DashboardConfig::sample().unwrap();
        let written = config.to_toml_string().unwrap();
        assert_eq!(DashboardConfig::from_toml_str(&written).unwrap(), config);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            DashboardConfig::from_toml_str("[chart\nperiods = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
