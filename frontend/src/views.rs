//! Page chrome: navbar, public pages, sign-in form and the dashboard layout.

use shared::{AuthStatus, DashboardSection, Route, ShellContent};
use zoon::*;

use crate::auth::Auth;
use crate::chart_panel::chart_panel;
use crate::dashboard::Dashboard;
use crate::dataflow::Atom;
use crate::router::Router;
use crate::table_panel::table_panel;
use crate::theme::*;

// ===== NAVBAR =====

pub fn navbar(router: &Router, auth: &Auth) -> impl Element + use<> {
    Row::new()
        .s(Width::fill())
        .s(Padding::new().x(24).y(12))
        .s(Gap::new().x(20))
        .s(Background::new().color(NAVBAR_BACKGROUND))
        .item(
            El::new()
                .s(Font::new().size(18).weight(FontWeight::Bold).color(NAVBAR_TEXT))
                .child("Performance Analytics"),
        )
        .item(El::new().s(Width::fill()))
        .item(nav_link(router, "Home", Route::Home))
        .item(nav_link(router, "About", Route::About))
        .item(nav_link(router, "Dashboard", Route::Dashboard(None)))
        .item_signal(auth.status_signal().map({
            let router = router.clone();
            let auth = auth.clone();
            move |status| session_controls(&router, &auth, &status)
        }))
}

fn nav_link(router: &Router, label: &'static str, route: Route) -> impl Element + use<> {
    let active_signal = router.route_signal().map(move |current| match (current, route) {
        (Route::Dashboard(_), Route::Dashboard(_)) => true,
        (current, route) => current == route,
    });
    let router = router.clone();
    Button::new()
        .s(Font::new()
            .size(14)
            .color_signal(active_signal.map_bool(|| NAV_ACTIVE_TEXT, || NAVBAR_TEXT)))
        .s(Padding::new().x(8).y(4))
        .label(label)
        .on_press(move || router.navigate(route))
}

fn session_controls(router: &Router, auth: &Auth, status: &AuthStatus) -> impl Element + use<> {
    let content: RawElOrText = match status {
        AuthStatus::Loading => El::new().unify(),
        AuthStatus::SignedOut => Row::new()
            .s(Gap::new().x(12))
            .item(nav_link(router, "Log in", Route::Login))
            .item(nav_link(router, "Sign up", Route::Signup))
            .unify(),
        AuthStatus::SignedIn { user } => {
            let auth = auth.clone();
            let router = router.clone();
            Row::new()
                .s(Gap::new().x(12))
                .item(El::new().s(Font::new().size(14).color(NAVBAR_TEXT)).child(user.clone()))
                .item(
                    Button::new()
                        .s(Font::new().size(14).color(NAVBAR_TEXT))
                        .s(Padding::new().x(8).y(4))
                        .s(Borders::all(Border::new().color(NAVBAR_TEXT)))
                        .s(RoundedCorners::all(RADIUS))
                        .label("Sign out")
                        .on_press(move || {
                            auth.sign_out();
                            router.navigate(Route::Home);
                        }),
                )
                .unify()
        }
    };
    El::new().child(content)
}

// ===== PUBLIC PAGES =====

pub fn home_page(router: &Router) -> impl Element + use<> {
    let router = router.clone();
    page_card(
        Column::new()
            .s(Gap::new().y(16))
            .item(
                El::new()
                    .s(Font::new().size(28).weight(FontWeight::Bold).color(TEXT_PRIMARY))
                    .child("Performance Analytics"),
            )
            .item(
                Paragraph::new()
                    .s(Font::new().size(15).color(TEXT_SECONDARY))
                    .content("Monthly trend and category breakdown charts next to a fiscal year comparison table."),
            )
            .item(primary_button("Open dashboard", move || {
                router.navigate(Route::Dashboard(None))
            })),
    )
}

pub fn about_page() -> impl Element {
    page_card(
        Column::new()
            .s(Gap::new().y(12))
            .item(
                El::new()
                    .s(Font::new().size(24).weight(FontWeight::Bold).color(TEXT_PRIMARY))
                    .child("About"),
            )
            .item(
                Paragraph::new()
                    .s(Font::new().size(15).color(TEXT_SECONDARY))
                    .content("Charts and tables are rendered from the dashboard configuration served by the backend. ")
                    .content("Switch visualizations with the arrows below the chart and hover marks for exact values."),
            ),
    )
}

pub fn loading_page() -> impl Element {
    El::new()
        .s(Align::center())
        .s(Padding::all(48))
        .s(Font::new().size(16).color(TEXT_MUTED))
        .child("Loading...")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthForm {
    Login,
    Signup,
}

impl AuthForm {
    fn title(self) -> &'static str {
        match self {
            AuthForm::Login => "Log in",
            AuthForm::Signup => "Create an account",
        }
    }

    fn submit_label(self) -> &'static str {
        match self {
            AuthForm::Login => "Log in",
            AuthForm::Signup => "Sign up",
        }
    }
}

pub fn auth_form_page(form: AuthForm, router: &Router, auth: &Auth) -> impl Element + use<> {
    let username = Atom::new(String::new());
    let submit = {
        let username = username.clone();
        let router = router.clone();
        let auth = auth.clone();
        move || {
            let name = username.get_cloned();
            if name.trim().is_empty() {
                return;
            }
            auth.sign_in(name);
            router.navigate(Route::Dashboard(None));
        }
    };

    page_card(
        Column::new()
            .s(Width::exact(360))
            .s(Gap::new().y(16))
            .item(
                El::new()
                    .s(Font::new().size(24).weight(FontWeight::Bold).color(TEXT_PRIMARY))
                    .child(form.title()),
            )
            .item(
                TextInput::new()
                    .s(Width::fill())
                    .s(Padding::new().x(12).y(8))
                    .s(Font::new().size(15).color(TEXT_PRIMARY))
                    .s(Borders::all(Border::new().color(BORDER)))
                    .s(RoundedCorners::all(RADIUS))
                    .label_hidden("User name")
                    .placeholder(Placeholder::new("User name"))
                    .on_change({
                        let username = username.clone();
                        move |text| username.set(text)
                    })
                    .update_raw_el({
                        let submit = submit.clone();
                        move |raw_el| {
                            raw_el.event_handler(move |event: KeyDown| {
                                if event.key() == "Enter" {
                                    submit();
                                }
                            })
                        }
                    }),
            )
            .item(primary_button(form.submit_label(), submit)),
    )
}

// ===== DASHBOARD =====

pub fn dashboard_page(
    section: Option<DashboardSection>,
    dashboard: &Dashboard,
    router: &Router,
) -> impl Element + use<> {
    let content: RawElOrText = match ShellContent::for_section(section) {
        ShellContent::Composite => Column::new()
            .s(Width::fill())
            .s(Gap::new().y(24))
            .item(chart_panel(dashboard))
            .item(table_panel(dashboard))
            .unify(),
        ShellContent::Nested(section) => section_placeholder(section).unify(),
    };

    Row::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Align::new().top())
        .item(sidebar(section, router))
        .item(
            El::new()
                .s(Width::fill())
                .s(Padding::all(24))
                .s(Scrollbars::y_and_clip_x())
                .child(content),
        )
}

fn sidebar(current: Option<DashboardSection>, router: &Router) -> impl Element + use<> {
    // The bare dashboard path shows the Display section.
    let current = current.unwrap_or(DashboardSection::Display);
    Column::new()
        .s(Width::exact(200))
        .s(Height::fill())
        .s(Padding::new().x(12).y(24))
        .s(Gap::new().y(4))
        .s(Background::new().color(SIDEBAR_BACKGROUND))
        .s(Borders::new().right(Border::new().color(BORDER)))
        .items(DashboardSection::ALL.map(|section| {
            let active = section == current;
            let router = router.clone();
            Button::new()
                .s(Width::fill())
                .s(Padding::new().x(12).y(8))
                .s(RoundedCorners::all(RADIUS))
                .s(Font::new()
                    .size(14)
                    .weight(if active { FontWeight::SemiBold } else { FontWeight::Regular })
                    .color(if active { ACCENT_TEXT } else { TEXT_PRIMARY }))
                .s(Background::new().color(if active { ACCENT } else { SIDEBAR_BACKGROUND }))
                .label(section.label())
                .on_press(move || router.navigate(Route::Dashboard(Some(section))))
        }))
}

fn section_placeholder(section: DashboardSection) -> impl Element {
    page_card(
        Column::new()
            .s(Gap::new().y(8))
            .item(
                El::new()
                    .s(Font::new().size(22).weight(FontWeight::Bold).color(TEXT_PRIMARY))
                    .child(section.label()),
            )
            .item(
                El::new()
                    .s(Font::new().size(14).color(TEXT_MUTED))
                    .child(format!("Nothing to {} yet.", section.slug())),
            ),
    )
}

// ===== SHARED PIECES =====

fn page_card(content: impl Element) -> impl Element {
    El::new()
        .s(Align::new().center_x())
        .s(Padding::all(32))
        .s(Background::new().color(SURFACE))
        .s(RoundedCorners::all(RADIUS))
        .s(Borders::all(Border::new().color(BORDER)))
        .child(content)
}

fn primary_button(label: &'static str, on_press: impl FnMut() + 'static) -> impl Element {
    let hovered = Mutable::new(false);
    Button::new()
        .s(Padding::new().x(20).y(10))
        .s(RoundedCorners::all(RADIUS))
        .s(Font::new().size(15).weight(FontWeight::SemiBold).color(ACCENT_TEXT))
        .s(Background::new().color_signal(hovered.signal().map_bool(|| ACCENT_HOVER, || ACCENT)))
        .on_hovered_change(move |is_hovered| hovered.set_neq(is_hovered))
        .label(label)
        .on_press(on_press)
}
