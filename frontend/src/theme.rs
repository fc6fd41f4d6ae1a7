// Color and type tokens for the DOM parts of the dashboard.
// Canvas colors live with the scene in `shared::scene::palette`.

pub const PAGE_BACKGROUND: &str = "#f9fafb";
pub const SURFACE: &str = "#ffffff";
pub const BORDER: &str = "#e5e7eb";
pub const NAVBAR_BACKGROUND: &str = "#1f2937";
pub const NAVBAR_TEXT: &str = "#f9fafb";
pub const NAV_ACTIVE_TEXT: &str = "#a5b4fc";
pub const SIDEBAR_BACKGROUND: &str = "#f3f4f6";

pub const TEXT_PRIMARY: &str = "#111827";
pub const TEXT_SECONDARY: &str = "#6b7280";
pub const TEXT_MUTED: &str = "#9ca3af";
pub const TEXT_ERROR: &str = "#dc2626";

pub const ACCENT: &str = "#6366f1";
pub const ACCENT_HOVER: &str = "#4f46e5";
pub const ACCENT_TEXT: &str = "#ffffff";
pub const INDICATOR_IDLE: &str = "#d1d5db";
pub const BUTTON_DISABLED: &str = "#e5e7eb";

pub const TABLE_HEADER_BACKGROUND: &str = "#e0e0e0";
pub const TABLE_ROW_ALT_BACKGROUND: &str = "#fafafa";

pub const FONT_FAMILY: &str = "Inter";
pub const RADIUS: u32 = 6;
