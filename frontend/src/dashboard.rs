//! Dashboard domain: the single `DashboardShell` behind an Actor.

use std::sync::Arc;

use futures::{StreamExt, select};
use shared::{
    ChartLayout, DashboardConfig, DashboardError, DashboardShell, DataCatalog, HoverPhase, Point,
    Scene, ShellEvent, TableModel,
};

use crate::dataflow::{Actor, Relay, relay};
use crate::debug_utils::{DEBUG_DASHBOARD, DEBUG_HOVER, debug_critical, debug_flagged, debug_throttled};

/// Immutable snapshot of the shell that views bind to.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardView {
    pub title: String,
    pub scene: Arc<Scene>,
    pub table: Arc<TableModel>,
    pub visualization_index: usize,
    pub visualization_count: usize,
    pub can_go_next: bool,
    pub can_go_previous: bool,
    pub period: String,
    pub chart_periods: Vec<String>,
    pub table_period: String,
    pub table_periods: Vec<String>,
    pub hover_phases: Vec<HoverPhase>,
    pub last_error: Option<String>,
}

impl DashboardView {
    fn from_shell(shell: &DashboardShell, last_error: Option<String>) -> Self {
        let selection = shell.selection();
        Self {
            title: shell.catalog().title().to_string(),
            scene: shell.scene(),
            table: shell.table(),
            visualization_index: selection.visualization_index(),
            visualization_count: selection.visualization_count(),
            can_go_next: selection.can_go_next(),
            can_go_previous: selection.can_go_previous(),
            period: selection.period().to_string(),
            chart_periods: selection.periods().as_slice().to_vec(),
            table_period: shell.table_period().to_string(),
            table_periods: shell.table_periods().as_slice().to_vec(),
            hover_phases: shell.hover_phases().to_vec(),
            last_error,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DashboardState {
    Ready(Arc<DashboardView>),
    /// No usable configuration at all.
    Failed(String),
}

#[derive(Clone)]
pub struct Dashboard {
    pub state_actor: Actor<DashboardState>,
    /// Canvas geometry every scene is laid out for.
    pub layout: ChartLayout,

    // === EVENT-SOURCE RELAYS ===
    pub next_clicked_relay: Relay,
    pub previous_clicked_relay: Relay,
    pub indicator_clicked_relay: Relay<usize>,
    pub period_selected_relay: Relay<String>,
    pub table_period_selected_relay: Relay<String>,
    /// Canvas point and time on the scene clock.
    pub pointer_moved_relay: Relay<(Point, f64)>,
    pub pointer_left_relay: Relay<f64>,
    pub config_loaded_relay: Relay<DashboardConfig>,
}

impl Dashboard {
    pub fn new(initial_config: Result<DashboardConfig, String>, layout: ChartLayout) -> Self {
        let (next_clicked_relay, mut next_clicked_stream) = relay();
        let (previous_clicked_relay, mut previous_clicked_stream) = relay();
        let (indicator_clicked_relay, mut indicator_clicked_stream) = relay();
        let (period_selected_relay, mut period_selected_stream) = relay();
        let (table_period_selected_relay, mut table_period_selected_stream) = relay();
        let (pointer_moved_relay, mut pointer_moved_stream) = relay();
        let (pointer_left_relay, mut pointer_left_stream) = relay();
        let (config_loaded_relay, mut config_loaded_stream) = relay();

        let initial_shell = initial_config.and_then(|config| build_shell(config, layout, 0));
        let initial_state = match &initial_shell {
            Ok(shell) => DashboardState::Ready(Arc::new(DashboardView::from_shell(shell, None))),
            Err(error) => DashboardState::Failed(error.clone()),
        };

        let state_actor = Actor::new(initial_state, async move |state| {
            // The shell lives only inside this loop.
            let mut shell = initial_shell.ok();

            loop {
                let event = select! {
                    event = next_clicked_stream.next() => event.map(|()| ShellEvent::NextVisualization),
                    event = previous_clicked_stream.next() => event.map(|()| ShellEvent::PreviousVisualization),
                    event = indicator_clicked_stream.next() => event.map(ShellEvent::SelectVisualization),
                    event = period_selected_stream.next() => event.map(ShellEvent::SelectPeriod),
                    event = table_period_selected_stream.next() => event.map(ShellEvent::SelectTablePeriod),
                    event = pointer_moved_stream.next() => {
                        event.map(|(point, at_ms)| ShellEvent::PointerMoved { point, at_ms })
                    }
                    event = pointer_left_stream.next() => event.map(|at_ms| ShellEvent::PointerLeft { at_ms }),
                    config = config_loaded_stream.next() => {
                        if let Some(config) = config {
                            let previous_generation = shell.as_ref().map_or(0, DashboardShell::generation);
                            match build_shell(config, layout, previous_generation) {
                                Ok(new_shell) => {
                                    debug_flagged(DEBUG_DASHBOARD, "Dashboard config replaced");
                                    state.set(DashboardState::Ready(Arc::new(
                                        DashboardView::from_shell(&new_shell, None),
                                    )));
                                    shell = Some(new_shell);
                                }
                                Err(error) => {
                                    debug_critical(&format!("Rejected dashboard config: {error}"));
                                    if let Some(shell) = &shell {
                                        state.set(DashboardState::Ready(Arc::new(
                                            DashboardView::from_shell(shell, Some(error)),
                                        )));
                                    } else {
                                        state.set(DashboardState::Failed(error));
                                    }
                                }
                            }
                        }
                        None
                    }
                    complete => break,
                };

                let (Some(event), Some(shell)) = (event, shell.as_mut()) else {
                    continue;
                };
                let is_pointer = matches!(
                    event,
                    ShellEvent::PointerMoved { .. } | ShellEvent::PointerLeft { .. }
                );
                match apply_event(shell, event) {
                    Step::Changed(view) => {
                        if is_pointer {
                            debug_flagged(DEBUG_HOVER, &format!("Hovered mark: {:?}", shell.hovered()));
                        } else {
                            debug_flagged(
                                DEBUG_DASHBOARD,
                                &format!("Scene generation {} ({})", view.scene.generation, view.scene.title),
                            );
                        }
                        state.set(DashboardState::Ready(Arc::new(view)));
                    }
                    Step::Unchanged => {}
                    Step::Rejected(error, view) => {
                        debug_throttled(&format!("Dashboard event rejected: {error}"));
                        state.set(DashboardState::Ready(Arc::new(view)));
                    }
                }
            }
        });

        Self {
            state_actor,
            layout,
            next_clicked_relay,
            previous_clicked_relay,
            indicator_clicked_relay,
            period_selected_relay,
            table_period_selected_relay,
            pointer_moved_relay,
            pointer_left_relay,
            config_loaded_relay,
        }
    }

    /// Generation of the scene currently published, if any.
    pub fn scene_generation(&self) -> Option<u64> {
        match &*self.state_actor.state.lock_ref() {
            DashboardState::Ready(view) => Some(view.scene.generation),
            DashboardState::Failed(_) => None,
        }
    }

    pub fn view_signal(&self) -> impl zoon::Signal<Item = Option<Arc<DashboardView>>> + use<> {
        self.state_actor.signal_ref(|state| match state {
            DashboardState::Ready(view) => Some(Arc::clone(view)),
            DashboardState::Failed(_) => None,
        })
    }
}

/// A replacement shell continues after `previous_generation` so the canvas
/// clock restarts and the new chart animates in.
fn build_shell(
    config: DashboardConfig,
    layout: ChartLayout,
    previous_generation: u64,
) -> Result<DashboardShell, String> {
    let catalog = DataCatalog::from_config(config).map_err(|error| error.to_string())?;
    for issue in catalog.integrity_issues() {
        debug_flagged(DEBUG_DASHBOARD, &format!("Data issue: {issue}"));
    }
    DashboardShell::replacing(Arc::new(catalog), layout, previous_generation)
        .map_err(|error| error.to_string())
}

#[derive(Debug)]
enum Step {
    Changed(DashboardView),
    Unchanged,
    /// The shell kept its state; the view carries the error message.
    Rejected(DashboardError, DashboardView),
}

fn apply_event(shell: &mut DashboardShell, event: ShellEvent) -> Step {
    match shell.apply(event) {
        Ok(update) if update.is_empty() => Step::Unchanged,
        Ok(_) => Step::Changed(DashboardView::from_shell(shell, None)),
        Err(error) => {
            let view = DashboardView::from_shell(shell, Some(error.to_string()));
            Step::Rejected(error, view)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::VisualizationKind;

    fn shell() -> DashboardShell {
        let config = DashboardConfig::sample().unwrap();
        DashboardShell::new(
            Arc::new(DataCatalog::from_config(config).unwrap()),
            ChartLayout::default(),
        )
        .unwrap()
    }

    #[test]
    fn view_mirrors_the_shell() {
        let shell = shell();
        let view = DashboardView::from_shell(&shell, None);
        assert_eq!(view.title, "Performance Analytics");
        assert_eq!(view.period, "2024");
        assert_eq!(view.chart_periods, ["2024", "2023", "2022"]);
        assert_eq!(view.table_period, "2023-24");
        assert_eq!(view.visualization_count, 2);
        assert!(view.can_go_next);
        assert!(!view.can_go_previous);
    }

    #[test]
    fn navigation_produces_a_new_scene() {
        let mut shell = shell();
        let Step::Changed(view) = apply_event(&mut shell, ShellEvent::NextVisualization) else {
            panic!("next visualization changes the scene");
        };
        assert_eq!(view.scene.kind, VisualizationKind::Breakdown);
        assert_eq!(view.visualization_index, 1);
    }

    #[test]
    fn repeated_selection_is_unchanged() {
        let mut shell = shell();
        assert!(matches!(
            apply_event(&mut shell, ShellEvent::SelectPeriod("2024".to_string())),
            Step::Unchanged
        ));
    }

    #[test]
    fn rejected_event_keeps_state_and_reports_error() {
        let mut shell = shell();
        let Step::Rejected(error, view) =
            apply_event(&mut shell, ShellEvent::SelectPeriod("1999".to_string()))
        else {
            panic!("unknown period is rejected");
        };
        assert_eq!(error, DashboardError::UnknownPeriod("1999".to_string()));
        assert_eq!(view.period, "2024");
        assert_eq!(view.last_error.as_deref(), Some("period '1999' is not configured"));
    }

    #[test]
    fn invalid_config_is_reported_as_text() {
        let mut config = DashboardConfig::sample().unwrap();
        config.chart.periods.clear();
        let error = build_shell(config, ChartLayout::default(), 0).unwrap_err();
        assert_eq!(error, "chart period list is empty");
    }

    #[test]
    fn reloaded_config_gets_a_newer_scene() {
        let first = build_shell(DashboardConfig::sample().unwrap(), ChartLayout::default(), 0).unwrap();
        let first_view = DashboardView::from_shell(&first, None);

        let second =
            build_shell(DashboardConfig::sample().unwrap(), ChartLayout::default(), first.generation())
                .unwrap();
        let second_view = DashboardView::from_shell(&second, None);
        assert!(second_view.scene.generation > first_view.scene.generation);
    }
}
