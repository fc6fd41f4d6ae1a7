//! DashboardApp - Self-contained Actor+Relay Architecture

use std::sync::Arc;

use futures::StreamExt;
use shared::{AuthStatus, ChartLayout, DashboardConfig, GuardDecision, Route, UpMsg, guard};
use zoon::*;

use crate::auth::Auth;
use crate::connection::{ConnectionAdapter, create_connection_message_handler};
use crate::dashboard::Dashboard;
use crate::dataflow::Actor;
use crate::debug_utils::{DEBUG_ROUTING, debug_critical, debug_flagged};
use crate::router::Router;
use crate::theme::*;
use crate::views::{
    AuthForm, about_page, auth_form_page, dashboard_page, home_page, loading_page, navbar,
};

/// Self-contained dashboard application
pub struct DashboardApp {
    /// Chart selection, scenes and the comparison table
    pub dashboard: Dashboard,

    pub router: Router,

    pub auth: Auth,

    /// Backend communication (Arc for cloning)
    pub connection: Arc<ConnectionAdapter>,

    message_handler: Actor<()>,
    guard_enforcer: Actor<()>,
}

impl DashboardApp {
    pub async fn new() -> Self {
        Self::load_and_register_fonts().await;

        // The bundled sample is shown until the backend answers.
        let initial_config = DashboardConfig::sample().map_err(|error| error.to_string());
        let dashboard = Dashboard::new(initial_config, ChartLayout::default());
        let router = Router::new();
        let auth = Auth::new();

        let (connection, message_handler) = create_connection_message_handler(&dashboard);
        let connection = Arc::new(connection);
        Task::start({
            let connection = connection.clone();
            async move { connection.send_up_msg(UpMsg::LoadDashboardConfig).await }
        });

        let guard_enforcer = Self::enforce_route_guard(&router, &auth);

        DashboardApp {
            dashboard,
            router,
            auth,
            connection,
            message_handler,
            guard_enforcer,
        }
    }

    async fn load_and_register_fonts() {
        use zoon::futures_util::future::try_join_all;

        let fonts = try_join_all([
            fast2d::fetch_file("/_api/public/fonts/Inter-Regular.ttf"),
            fast2d::fetch_file("/_api/public/fonts/Inter-Bold.ttf"),
        ])
        .await;

        match fonts {
            Ok(fonts) => {
                if let Err(error) = fast2d::register_fonts(fonts) {
                    debug_critical(&format!("Failed to register chart fonts: {error:?}"));
                }
            }
            Err(error) => debug_critical(&format!("Failed to fetch chart fonts: {error:?}")),
        }
    }

    /// Sends the browser to the login page whenever a guarded route is
    /// shown to a signed-out user.
    fn enforce_route_guard(router: &Router, auth: &Auth) -> Actor<()> {
        let mut redirects = route_and_auth_signal(router, auth)
            .map(|(route, status)| redirect_target(route, &status))
            .dedupe()
            .to_stream();
        let router = router.clone();

        Actor::new((), async move |_state| {
            while let Some(redirect) = redirects.next().await {
                if let Some(target) = redirect {
                    debug_flagged(DEBUG_ROUTING, &format!("Guard redirects to {target}"));
                    router.redirect(target);
                }
            }
        })
    }

    /// Root UI element; it owns the connection and the background actors.
    pub fn root(self) -> impl Element {
        let background = (self.connection, self.message_handler, self.guard_enforcer);
        Column::new()
            .s(Height::screen())
            .s(Width::fill())
            .s(Background::new().color(PAGE_BACKGROUND))
            .s(Font::new().family([
                FontFamily::new(FONT_FAMILY),
                FontFamily::new("system-ui"),
                FontFamily::new("Arial"),
                FontFamily::SansSerif,
            ]))
            .item(navbar(&self.router, &self.auth))
            .item(
                El::new()
                    .s(Width::fill())
                    .s(Height::fill())
                    .s(Scrollbars::both())
                    .child_signal(route_and_auth_signal(&self.router, &self.auth).map({
                        let dashboard = self.dashboard.clone();
                        let router = self.router.clone();
                        let auth = self.auth.clone();
                        move |(route, status)| page(route, &status, &dashboard, &router, &auth)
                    })),
            )
            .after_remove(move |_| drop(background))
    }
}

fn route_and_auth_signal(
    router: &Router,
    auth: &Auth,
) -> impl Signal<Item = (Route, AuthStatus)> + use<> {
    map_ref! {
        let route = router.route_signal(),
        let status = auth.status_signal() => (*route, status.clone())
    }
}

/// Where the guard sends the browser instead of `route`, if anywhere.
fn redirect_target(route: Route, status: &AuthStatus) -> Option<Route> {
    match guard(route, status) {
        GuardDecision::Redirect(target) => Some(target),
        GuardDecision::ShowLoading | GuardDecision::Render => None,
    }
}

fn page(
    route: Route,
    status: &AuthStatus,
    dashboard: &Dashboard,
    router: &Router,
    auth: &Auth,
) -> RawElOrText {
    match guard(route, status) {
        // A redirect is already on its way; show the same placeholder as loading.
        GuardDecision::ShowLoading | GuardDecision::Redirect(_) => loading_page().unify(),
        GuardDecision::Render => match route {
            Route::Home => home_page(router).unify(),
            Route::Login => auth_form_page(AuthForm::Login, router, auth).unify(),
            Route::Signup => auth_form_page(AuthForm::Signup, router, auth).unify(),
            Route::About => about_page().unify(),
            Route::Dashboard(section) => dashboard_page(section, dashboard, router).unify(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DashboardSection;

    fn signed_in() -> AuthStatus {
        AuthStatus::SignedIn {
            user: "analyst".to_string(),
        }
    }

    #[test]
    fn signed_out_users_are_sent_to_login() {
        let display = Route::Dashboard(Some(DashboardSection::Display));
        assert_eq!(redirect_target(display, &AuthStatus::SignedOut), Some(Route::Login));
        assert_eq!(redirect_target(Route::About, &AuthStatus::SignedOut), Some(Route::Login));
    }

    #[test]
    fn guarded_pages_wait_for_auth_then_render() {
        let dashboard = Route::Dashboard(None);
        assert_eq!(redirect_target(dashboard, &AuthStatus::Loading), None);
        assert_eq!(redirect_target(dashboard, &signed_in()), None);
        assert_eq!(guard(dashboard, &signed_in()), GuardDecision::Render);
    }

    #[test]
    fn public_pages_never_redirect() {
        for route in [Route::Home, Route::Login, Route::Signup] {
            assert_eq!(redirect_target(route, &AuthStatus::SignedOut), None);
        }
    }
}
