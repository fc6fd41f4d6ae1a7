use std::sync::Arc;

use crate::catalog::{DataCatalog, PeriodList};
use crate::curve::Point;
use crate::error::DashboardError;
use crate::frame::HoverPhase;
use crate::routing::{Route, ShellContent};
use crate::scene::{ChartLayout, ChartRenderer, HoverChange, HoverTracker, Scene};
use crate::selection::{PeriodCursor, SelectionState};
use crate::table::TableModel;

#[derive(Debug, Clone, PartialEq)]
pub enum ShellEvent {
    NextVisualization,
    PreviousVisualization,
    SelectVisualization(usize),
    SelectPeriod(String),
    SelectTablePeriod(String),
    /// `at_ms` is measured on the current scene's animation clock.
    PointerMoved { point: Point, at_ms: f64 },
    PointerLeft { at_ms: f64 },
}

/// What an applied event changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShellUpdate {
    pub scene_rebuilt: bool,
    pub table_rederived: bool,
    pub hover: HoverChange,
}

impl ShellUpdate {
    pub fn is_empty(&self) -> bool {
        !self.scene_rebuilt && !self.table_rederived && self.hover.is_empty()
    }
}

/// Owns the selection and keeps the chart scene and the table model derived
/// from it.
///
/// Every event is applied synchronously. A rejected event returns the error
/// and leaves the shell exactly as it was.
#[derive(Debug, Clone)]
pub struct DashboardShell {
    catalog: Arc<DataCatalog>,
    selection: SelectionState,
    table_cursor: PeriodCursor,
    renderer: ChartRenderer,
    scene: Arc<Scene>,
    table: Arc<TableModel>,
    hover: HoverTracker,
    hover_phases: Vec<HoverPhase>,
}

impl DashboardShell {
    pub fn new(catalog: Arc<DataCatalog>, layout: ChartLayout) -> Result<Self, DashboardError> {
        Self::replacing(catalog, layout, 0)
    }

    /// Shell that takes over from one whose latest scene was
    /// `previous_generation`; its first scene gets a newer generation.
    pub fn replacing(
        catalog: Arc<DataCatalog>,
        layout: ChartLayout,
        previous_generation: u64,
    ) -> Result<Self, DashboardError> {
        let selection = SelectionState::new(catalog.chart_periods().clone());
        let table_cursor = PeriodCursor::new(
            catalog.table_periods().clone(),
            catalog.default_table_period(),
        )?;
        let mut renderer = ChartRenderer::starting_after(layout, previous_generation);
        let scene = renderer.render(&catalog, selection.visualization_kind(), selection.period())?;
        let table = TableModel::derive(&catalog, table_cursor.period())?;
        let mut hover = HoverTracker::default();
        hover.reset(scene.generation);

        Ok(Self {
            catalog,
            selection,
            table_cursor,
            renderer,
            scene: Arc::new(scene),
            table: Arc::new(table),
            hover,
            hover_phases: Vec::new(),
        })
    }

    pub fn apply(&mut self, event: ShellEvent) -> Result<ShellUpdate, DashboardError> {
        match event {
            ShellEvent::NextVisualization => {
                let mut selection = self.selection.clone();
                selection.next();
                self.commit_selection(selection)
            }
            ShellEvent::PreviousVisualization => {
                let mut selection = self.selection.clone();
                selection.previous();
                self.commit_selection(selection)
            }
            ShellEvent::SelectVisualization(index) => {
                let mut selection = self.selection.clone();
                selection.set_index(index)?;
                self.commit_selection(selection)
            }
            ShellEvent::SelectPeriod(period) => {
                let mut selection = self.selection.clone();
                selection.set_period(&period)?;
                self.commit_selection(selection)
            }
            ShellEvent::SelectTablePeriod(period) => {
                if period == self.table_cursor.period() {
                    return Ok(ShellUpdate::default());
                }
                let mut cursor = self.table_cursor.clone();
                cursor.set_period(&period)?;
                let table = TableModel::derive(&self.catalog, cursor.period())?;
                self.table_cursor = cursor;
                self.table = Arc::new(table);
                Ok(ShellUpdate {
                    table_rederived: true,
                    ..ShellUpdate::default()
                })
            }
            ShellEvent::PointerMoved { point, at_ms } => {
                let change = self.hover.pointer_moved(&self.scene, point);
                self.record_hover(change, at_ms);
                Ok(ShellUpdate {
                    hover: change,
                    ..ShellUpdate::default()
                })
            }
            ShellEvent::PointerLeft { at_ms } => {
                let change = self.hover.pointer_left();
                self.record_hover(change, at_ms);
                Ok(ShellUpdate {
                    hover: change,
                    ..ShellUpdate::default()
                })
            }
        }
    }

    fn commit_selection(&mut self, selection: SelectionState) -> Result<ShellUpdate, DashboardError> {
        if selection == self.selection {
            return Ok(ShellUpdate::default());
        }
        let mut renderer = self.renderer.clone();
        let scene = renderer.render(
            &self.catalog,
            selection.visualization_kind(),
            selection.period(),
        )?;
        self.hover.reset(scene.generation);
        self.hover_phases.clear();
        self.selection = selection;
        self.renderer = renderer;
        self.scene = Arc::new(scene);
        Ok(ShellUpdate {
            scene_rebuilt: true,
            ..ShellUpdate::default()
        })
    }

    fn record_hover(&mut self, change: HoverChange, at_ms: f64) {
        let transitions = change
            .left
            .map(|index| (index, false))
            .into_iter()
            .chain(change.entered.map(|index| (index, true)));
        for (mark_index, entered) in transitions {
            self.hover_phases.retain(|phase| phase.mark_index != mark_index);
            self.hover_phases.push(HoverPhase {
                mark_index,
                entered,
                changed_at_ms: at_ms,
            });
        }
    }

    pub fn catalog(&self) -> &Arc<DataCatalog> {
        &self.catalog
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn scene(&self) -> Arc<Scene> {
        Arc::clone(&self.scene)
    }

    pub fn generation(&self) -> u64 {
        self.scene.generation
    }

    pub fn table(&self) -> Arc<TableModel> {
        Arc::clone(&self.table)
    }

    pub fn table_period(&self) -> &str {
        self.table_cursor.period()
    }

    pub fn table_periods(&self) -> &PeriodList {
        self.table_cursor.periods()
    }

    /// Latest hover transition per mark of the current scene.
    pub fn hover_phases(&self) -> &[HoverPhase] {
        &self.hover_phases
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hover.hovered()
    }

    /// `None` for routes outside the dashboard.
    pub fn content_for(&self, route: Route) -> Option<ShellContent> {
        match route {
            Route::Dashboard(section) => Some(ShellContent::for_section(section)),
            Route::Home | Route::Login | Route::Signup | Route::About => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VisualizationKind;
    use crate::config::DashboardConfig;
    use crate::routing::DashboardSection;
    use crate::scene::MarkGeometry;

    fn shell() -> DashboardShell {
        let catalog = DataCatalog::from_config(DashboardConfig::sample().unwrap()).unwrap();
        DashboardShell::new(Arc::new(catalog), ChartLayout::default()).unwrap()
    }

    #[test]
    fn starts_with_trend_for_most_recent_period() {
        let shell = shell();
        let scene = shell.scene();
        assert_eq!(scene.kind, VisualizationKind::Trend);
        assert_eq!(scene.period, "2024");
        assert_eq!(shell.table_period(), "2023-24");
        assert_eq!(shell.table().rows.len(), 9);
    }

    #[test]
    fn navigation_rebuilds_the_scene() {
        let mut shell = shell();
        let first = shell.generation();

        let update = shell.apply(ShellEvent::NextVisualization).unwrap();
        assert!(update.scene_rebuilt);
        assert!(!update.table_rederived);
        assert_eq!(shell.scene().kind, VisualizationKind::Breakdown);
        assert!(shell.generation() > first);

        shell.apply(ShellEvent::NextVisualization).unwrap();
        assert_eq!(shell.scene().kind, VisualizationKind::Trend);
        shell.apply(ShellEvent::PreviousVisualization).unwrap();
        assert_eq!(shell.scene().kind, VisualizationKind::Breakdown);
    }

    #[test]
    fn period_switch_replaces_marks() {
        let mut shell = shell();
        let update = shell.apply(ShellEvent::SelectPeriod("2023".to_string())).unwrap();
        assert!(update.scene_rebuilt);
        let scene = shell.scene();
        assert_eq!(scene.marks().len(), 12);
        assert!(scene.marks().iter().all(|mark| mark.period == "2023"));
    }

    #[test]
    fn selecting_current_state_is_a_no_op() {
        let mut shell = shell();
        let generation = shell.generation();
        let update = shell.apply(ShellEvent::SelectPeriod("2024".to_string())).unwrap();
        assert!(update.is_empty());
        assert!(shell.apply(ShellEvent::SelectVisualization(0)).unwrap().is_empty());
        assert_eq!(shell.generation(), generation);
    }

    #[test]
    fn rejected_events_leave_state_untouched() {
        let mut shell = shell();
        shell.apply(ShellEvent::SelectPeriod("2022".to_string())).unwrap();
        let generation = shell.generation();

        assert_eq!(
            shell.apply(ShellEvent::SelectVisualization(5)),
            Err(DashboardError::InvalidIndex { index: 5, count: 2 })
        );
        assert_eq!(
            shell.apply(ShellEvent::SelectPeriod("2021".to_string())),
            Err(DashboardError::UnknownPeriod("2021".to_string()))
        );
        assert_eq!(
            shell.apply(ShellEvent::SelectTablePeriod("2024".to_string())),
            Err(DashboardError::UnknownPeriod("2024".to_string()))
        );
        assert_eq!(shell.selection().period(), "2022");
        assert_eq!(shell.generation(), generation);
        assert_eq!(shell.table_period(), "2023-24");
    }

    #[test]
    fn table_period_is_independent_of_chart_period() {
        let mut shell = shell();
        let update = shell
            .apply(ShellEvent::SelectTablePeriod("2019-20".to_string()))
            .unwrap();
        assert!(update.table_rederived);
        assert!(!update.scene_rebuilt);
        assert_eq!(shell.table().rows[1].formatted_value, "101,335.84");
        assert_eq!(shell.selection().period(), "2024");
    }

    #[test]
    fn hover_is_recorded_and_cleared_by_rebuilds() {
        let mut shell = shell();
        let MarkGeometry::Dot { center, .. } = shell.scene().marks()[4].geometry else {
            panic!("trend renders dots");
        };

        let update = shell
            .apply(ShellEvent::PointerMoved { point: center, at_ms: 2000.0 })
            .unwrap();
        assert_eq!(update.hover.entered, Some(4));
        assert_eq!(shell.hovered(), Some(4));
        assert_eq!(shell.hover_phases().len(), 1);

        let update = shell.apply(ShellEvent::PointerLeft { at_ms: 2300.0 }).unwrap();
        assert_eq!(update.hover.left, Some(4));
        assert_eq!(shell.hover_phases().len(), 1);
        assert!(!shell.hover_phases()[0].entered);

        shell.apply(ShellEvent::PointerMoved { point: center, at_ms: 2400.0 }).unwrap();
        shell.apply(ShellEvent::NextVisualization).unwrap();
        assert_eq!(shell.hovered(), None);
        assert!(shell.hover_phases().is_empty());
    }

    #[test]
    fn replacement_shell_continues_the_generation() {
        let mut first = shell();
        first.apply(ShellEvent::NextVisualization).unwrap();

        let catalog = DataCatalog::from_config(DashboardConfig::sample().unwrap()).unwrap();
        let second =
            DashboardShell::replacing(Arc::new(catalog), ChartLayout::default(), first.generation())
                .unwrap();
        assert!(second.generation() > first.generation());
        assert_eq!(second.scene().kind, VisualizationKind::Trend);
    }

    #[test]
    fn dashboard_routes_pick_content() {
        let shell = shell();
        assert_eq!(
            shell.content_for(Route::Dashboard(None)),
            Some(ShellContent::Composite)
        );
        assert_eq!(
            shell.content_for(Route::Dashboard(Some(DashboardSection::Insert))),
            Some(ShellContent::Nested(DashboardSection::Insert))
        );
        assert_eq!(shell.content_for(Route::About), None);
    }
}
