use thiserror::Error;

use crate::catalog::VisualizationKind;

/// Recoverable dashboard errors.
///
/// None of these is fatal: the shell keeps its previous state on
/// `InvalidIndex` / `UnknownPeriod`, renders an empty chart on `EmptySeries`,
/// leaves out points with a `NonFiniteValue` and shows a placeholder cell on
/// `MissingRowEntry`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DashboardError {
    #[error("visualization index {index} is out of range (0..{count})")]
    InvalidIndex { index: usize, count: usize },

    #[error("period '{0}' is not configured")]
    UnknownPeriod(String),

    #[error("no {kind} data points for period '{period}'")]
    EmptySeries {
        kind: VisualizationKind,
        period: String,
    },

    #[error("{kind} value for '{category}' in period '{period}' is not a finite number")]
    NonFiniteValue {
        kind: VisualizationKind,
        period: String,
        category: String,
    },

    #[error("row {sequence_no} ({label}) has no {column} entry for period '{period}'")]
    MissingRowEntry {
        sequence_no: u32,
        label: String,
        column: &'static str,
        period: String,
    },
}

/// Errors raised while loading or validating a `DashboardConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse dashboard config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize dashboard config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("unsupported config version '{0}'")]
    UnsupportedVersion(String),

    #[error("{section} period list is empty")]
    EmptyPeriods { section: &'static str },

    #[error("{section} period '{period}' is listed twice")]
    DuplicatePeriod {
        section: &'static str,
        period: String,
    },

    #[error("{section} default period '{period}' is not in the period list")]
    UnknownDefaultPeriod {
        section: &'static str,
        period: String,
    },

    #[error("chart period '{0}' has no series data")]
    MissingSeries(String),

    #[error("table row sequence number {0} is used more than once")]
    DuplicateSequenceNo(u32),
}
