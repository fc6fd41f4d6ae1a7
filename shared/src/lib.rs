use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod config;
pub mod curve;
pub mod error;
pub mod frame;
pub mod routing;
pub mod scale;
pub mod scene;
pub mod selection;
pub mod shell;
pub mod table;

pub use catalog::{DataCatalog, PeriodList, PeriodSeries, SeriesPoint, TableRow, VisualizationKind};
pub use config::{AppSection, ChartSection, DashboardConfig, TableSection};
pub use curve::{Path, PathCommand, Point};
pub use error::{ConfigError, DashboardError};
pub use frame::{Frame, HoverPhase, Primitive, Stroke, TextAlign, sample_frame};
pub use routing::{
    AuthState, AuthStatus, DashboardSection, GuardDecision, Route, RouteMatch, ShellContent, guard,
};
pub use scale::{BandScale, LinearScale};
pub use scene::{ChartLayout, ChartRenderer, HoverChange, HoverTracker, Rect, Rgba, Scene};
pub use selection::{PeriodCursor, SelectionState};
pub use shell::{DashboardShell, ShellEvent, ShellUpdate};
pub use table::{CellFormat, DisplayRow, NumberLocale, TableModel};

// ===== MESSAGE TYPES =====

#[derive(Serialize, Deserialize, Debug)]
pub enum UpMsg {
    LoadDashboardConfig,
}

#[derive(Serialize, Deserialize, Debug)]
pub enum DownMsg {
    DashboardConfigLoaded(DashboardConfig),
    ConfigError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_survives_the_wire() {
        let config = DashboardConfig::sample().unwrap();
        let json = serde_json::to_string(&DownMsg::DashboardConfigLoaded(config.clone())).unwrap();
        match serde_json::from_str::<DownMsg>(&json).unwrap() {
            DownMsg::DashboardConfigLoaded(received) => assert_eq!(received, config),
            DownMsg::ConfigError(error) => panic!("unexpected error message: {error}"),
        }
    }

    #[test]
    fn up_msg_is_a_plain_tag() {
        let json = serde_json::to_string(&UpMsg::LoadDashboardConfig).unwrap();
        assert_eq!(json, "\"LoadDashboardConfig\"");
    }
}
