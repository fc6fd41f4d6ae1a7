//! Browser history routing.

use futures::{StreamExt, select};
use shared::{Route, RouteMatch};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use zoon::Signal;

use crate::dataflow::{Actor, Relay, relay};
use crate::debug_utils::{DEBUG_ROUTING, debug_critical, debug_flagged};

#[derive(Clone)]
pub struct Router {
    pub route_actor: Actor<Route>,
    navigate_requested_relay: Relay<Route>,
    redirect_requested_relay: Relay<Route>,
}

impl Router {
    pub fn new() -> Self {
        let (navigate_requested_relay, mut navigate_requested_stream) = relay::<Route>();
        let (redirect_requested_relay, mut redirect_requested_stream) = relay::<Route>();
        let (history_changed_relay, mut history_changed_stream) = relay::<String>();

        let (initial_route, initial_update) =
            transition(Route::Home, RouteRequest::HistoryChanged(current_path()));
        apply_history_update(initial_update);
        listen_to_popstate(history_changed_relay);

        let route_actor = Actor::new(initial_route, async move |state| {
            loop {
                let request = select! {
                    route = navigate_requested_stream.next() => route.map(RouteRequest::Navigate),
                    route = redirect_requested_stream.next() => route.map(RouteRequest::Redirect),
                    path = history_changed_stream.next() => path.map(RouteRequest::HistoryChanged),
                    complete => break,
                };
                let Some(request) = request else {
                    continue;
                };
                let (route, update) = transition(state.get(), request);
                debug_flagged(DEBUG_ROUTING, &format!("Route {route} ({update:?})"));
                apply_history_update(update);
                state.set_neq(route);
            }
        });

        Self {
            route_actor,
            navigate_requested_relay,
            redirect_requested_relay,
        }
    }

    /// Pushes a history entry; every link goes through here.
    pub fn navigate(&self, route: Route) {
        self.navigate_requested_relay.send(route);
    }

    /// Replaces the current history entry.
    pub fn redirect(&self, route: Route) {
        self.redirect_requested_relay.send(route);
    }

    pub fn route_signal(&self) -> impl Signal<Item = Route> + use<> {
        self.route_actor.signal()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RouteRequest {
    Navigate(Route),
    Redirect(Route),
    /// The browser moved to this path (back/forward or first load).
    HistoryChanged(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HistoryUpdate {
    Keep,
    Push(String),
    Replace(String),
}

/// Next route and the history change that goes with it. Navigation pushes
/// an entry, redirects replace the current one, and an unknown path from the
/// browser is rewritten in place.
fn transition(current: Route, request: RouteRequest) -> (Route, HistoryUpdate) {
    match request {
        RouteRequest::Navigate(route) if route == current => (route, HistoryUpdate::Keep),
        RouteRequest::Navigate(route) => (route, HistoryUpdate::Push(route.path())),
        RouteRequest::Redirect(route) => (route, HistoryUpdate::Replace(route.path())),
        RouteRequest::HistoryChanged(path) => match Route::resolve(&path) {
            RouteMatch::Matched(route) => (route, HistoryUpdate::Keep),
            RouteMatch::Redirect(route) => (route, HistoryUpdate::Replace(route.path())),
        },
    }
}

fn apply_history_update(update: HistoryUpdate) {
    match update {
        HistoryUpdate::Keep => {}
        HistoryUpdate::Push(path) => push_path(&path),
        HistoryUpdate::Replace(path) => replace_path(&path),
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_path(path: &str) {
    let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
        return;
    };
    if let Err(error) = history.push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path)) {
        debug_critical(&format!("Failed to push history entry '{path}': {error:?}"));
    }
}

fn replace_path(path: &str) {
    let Some(history) = web_sys::window().and_then(|window| window.history().ok()) else {
        return;
    };
    if let Err(error) = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(path)) {
        debug_critical(&format!("Failed to replace history entry '{path}': {error:?}"));
    }
}

fn listen_to_popstate(history_changed_relay: Relay<String>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let on_popstate = Closure::<dyn FnMut(web_sys::PopStateEvent)>::new(move |_event| {
        history_changed_relay.send(current_path());
    });
    if let Err(error) =
        window.add_event_listener_with_callback("popstate", on_popstate.as_ref().unchecked_ref())
    {
        debug_critical(&format!("Failed to listen to history changes: {error:?}"));
    }
    // The router lives as long as the page.
    on_popstate.forget();
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DashboardSection;

    #[test]
    fn navigation_pushes_only_new_routes() {
        assert_eq!(
            transition(Route::Home, RouteRequest::Navigate(Route::About)),
            (Route::About, HistoryUpdate::Push("/about".to_string()))
        );
        assert_eq!(
            transition(Route::About, RouteRequest::Navigate(Route::About)),
            (Route::About, HistoryUpdate::Keep)
        );
    }

    #[test]
    fn redirect_replaces_the_current_entry() {
        let current = Route::Dashboard(None);
        assert_eq!(
            transition(current, RouteRequest::Redirect(Route::Login)),
            (Route::Login, HistoryUpdate::Replace("/login".to_string()))
        );
    }

    #[test]
    fn browser_history_moves_resolve_the_path() {
        let display = Route::Dashboard(Some(DashboardSection::Display));
        assert_eq!(
            transition(Route::Home, RouteRequest::HistoryChanged(display.path())),
            (display, HistoryUpdate::Keep)
        );
        assert_eq!(
            transition(Route::About, RouteRequest::HistoryChanged("/".to_string())),
            (Route::Home, HistoryUpdate::Keep)
        );
    }

    #[test]
    fn unknown_browser_paths_are_rewritten() {
        let (route, update) = transition(Route::Home, RouteRequest::HistoryChanged("/nowhere".to_string()));
        assert_eq!(route, Route::Home);
        assert_eq!(update, HistoryUpdate::Replace("/".to_string()));

        let (route, update) =
            transition(Route::Home, RouteRequest::HistoryChanged("/dashboard/reports".to_string()));
        assert_eq!(route, Route::Dashboard(None));
        assert_eq!(update, HistoryUpdate::Replace(Route::Dashboard(None).path()));
    }
}
