//! Chart card: title, period selector, canvas and visualization navigation.

use zoon::*;

use crate::dashboard::{Dashboard, DashboardState, DashboardView};
use crate::theme::*;
use crate::visualizer::chart_canvas;

/// The part of a `DashboardView` the chart controls depend on; hover-only
/// view changes leave it equal, so the controls are not rebuilt.
#[derive(Clone, Debug, PartialEq)]
struct ChartControls {
    title: String,
    scene_title: String,
    empty_message: Option<String>,
    period: String,
    periods: Vec<String>,
    index: usize,
    count: usize,
    can_go_next: bool,
    can_go_previous: bool,
    last_error: Option<String>,
}

impl ChartControls {
    fn from_view(view: &DashboardView) -> Self {
        Self {
            title: view.title.clone(),
            scene_title: view.scene.title.clone(),
            empty_message: view.scene.issue.as_ref().map(|issue| issue.to_string()),
            period: view.period.clone(),
            periods: view.chart_periods.clone(),
            index: view.visualization_index,
            count: view.visualization_count,
            can_go_next: view.can_go_next,
            can_go_previous: view.can_go_previous,
            last_error: view.last_error.clone(),
        }
    }
}

fn controls_signal(dashboard: &Dashboard) -> impl Signal<Item = Option<ChartControls>> + use<> {
    dashboard
        .view_signal()
        .map(|view| view.map(|view| ChartControls::from_view(&view)))
        .dedupe_cloned()
}

pub fn chart_panel(dashboard: &Dashboard) -> impl Element + use<> {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(16))
        .s(Padding::all(24))
        .s(Background::new().color(SURFACE))
        .s(RoundedCorners::all(RADIUS))
        .s(Borders::all(Border::new().color(BORDER)))
        .item_signal(controls_signal(dashboard).map({
            let dashboard = dashboard.clone();
            move |controls| controls.map(|controls| header(&dashboard, &controls))
        }))
        .item_signal(failure_signal(dashboard).map(|error| error.map(failure_message)))
        .item(El::new().s(Align::new().center_x()).child(chart_canvas(dashboard)))
        .item_signal(controls_signal(dashboard).map({
            let dashboard = dashboard.clone();
            move |controls| controls.map(|controls| navigation(&dashboard, &controls))
        }))
}

fn failure_signal(dashboard: &Dashboard) -> impl Signal<Item = Option<String>> + use<> {
    dashboard.state_actor.signal_ref(|state| match state {
        DashboardState::Ready(_) => None,
        DashboardState::Failed(error) => Some(error.clone()),
    })
}

fn failure_message(error: String) -> impl Element + use<> {
    Paragraph::new()
        .s(Font::new().color(TEXT_ERROR).size(14))
        .content("Dashboard data could not be loaded: ")
        .content(error)
}

fn header(dashboard: &Dashboard, controls: &ChartControls) -> impl Element + use<> {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(8))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Gap::new().x(12))
                .item(
                    El::new()
                        .s(Font::new().size(22).weight(FontWeight::Bold).color(TEXT_PRIMARY))
                        .child(controls.title.clone()),
                )
                .item(El::new().s(Width::fill()))
                .item(
                    El::new()
                        .s(Font::new().size(13).color(TEXT_SECONDARY))
                        .child("Year"),
                )
                .items(
                    controls
                        .periods
                        .iter()
                        .map(|period| period_button(dashboard, period, *period == controls.period)),
                ),
        )
        .item(
            El::new()
                .s(Font::new().size(15).weight(FontWeight::SemiBold).color(TEXT_SECONDARY))
                .child(controls.scene_title.clone()),
        )
        .item(controls.empty_message.as_ref().map(|message| {
            El::new()
                .s(Font::new().size(13).color(TEXT_MUTED).italic())
                .child(message.clone())
        }))
        .item(controls.last_error.as_ref().map(|error| {
            El::new()
                .s(Font::new().size(13).color(TEXT_ERROR))
                .child(error.clone())
        }))
}

fn period_button(dashboard: &Dashboard, period: &str, selected: bool) -> impl Element + use<> {
    let period_selected_relay = dashboard.period_selected_relay.clone();
    let period = period.to_string();
    Button::new()
        .s(Padding::new().x(12).y(6))
        .s(RoundedCorners::all(RADIUS))
        .s(Font::new()
            .size(13)
            .color(if selected { ACCENT_TEXT } else { TEXT_PRIMARY }))
        .s(Background::new().color(if selected { ACCENT } else { SURFACE }))
        .s(Borders::all(Border::new().color(if selected { ACCENT } else { BORDER })))
        .label(period.clone())
        .on_press(move || period_selected_relay.send(period.clone()))
}

fn navigation(dashboard: &Dashboard, controls: &ChartControls) -> impl Element + use<> {
    Row::new()
        .s(Align::new().center_x())
        .s(Gap::new().x(16))
        .item(step_button(
            "Previous",
            controls.can_go_previous,
            dashboard.previous_clicked_relay.clone(),
        ))
        .item(
            Row::new()
                .s(Gap::new().x(8))
                .items((0..controls.count).map(|index| indicator_dot(dashboard, index, index == controls.index))),
        )
        .item(step_button("Next", controls.can_go_next, dashboard.next_clicked_relay.clone()))
}

/// Disabled at either end of the visualization list.
fn step_button(label: &'static str, enabled: bool, clicked_relay: crate::dataflow::Relay) -> impl Element + use<> {
    let hovered = Mutable::new(false);
    Button::new()
        .s(Padding::new().x(16).y(8))
        .s(RoundedCorners::all(RADIUS))
        .s(Font::new()
            .size(14)
            .weight(FontWeight::SemiBold)
            .color(if enabled { ACCENT_TEXT } else { TEXT_MUTED }))
        .s(Background::new().color_signal(hovered.signal().map(move |hovered| {
            match (enabled, hovered) {
                (false, _) => BUTTON_DISABLED,
                (true, true) => ACCENT_HOVER,
                (true, false) => ACCENT,
            }
        })))
        .s(Cursor::new(if enabled {
            CursorIcon::Pointer
        } else {
            CursorIcon::NotAllowed
        }))
        .on_hovered_change(move |is_hovered| hovered.set_neq(is_hovered))
        .label(label)
        .on_press(move || {
            if enabled {
                clicked_relay.send(());
            }
        })
}

fn indicator_dot(dashboard: &Dashboard, index: usize, active: bool) -> impl Element + use<> {
    let indicator_clicked_relay = dashboard.indicator_clicked_relay.clone();
    Button::new()
        .s(Width::exact(10))
        .s(Height::exact(10))
        .s(RoundedCorners::all_max())
        .s(Background::new().color(if active { ACCENT } else { INDICATOR_IDLE }))
        .label(El::new())
        .on_press(move || indicator_clicked_relay.send(index))
}
