//! Performance Analytics dashboard entry point

use std::sync::OnceLock;
use zoon::*;

/// Stores the main application task handle to prevent it from being dropped.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod app;
mod auth;
mod chart_panel;
mod connection;
mod dashboard;
mod dataflow;
mod debug_utils;
mod router;
mod table_panel;
mod theme;
mod views;
mod visualizer;

use app::DashboardApp;

pub fn main() {
    let handle = Task::start_droppable(async {
        let app = DashboardApp::new().await;
        let root_element = app.root();
        start_app("app", move || root_element);
    });
    let _ = MAIN_TASK.set(handle);
}
