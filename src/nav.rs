//! Responsive navigation shell selection.
//!
//! Pure function of platform and viewport width, recomputed every render:
//! web always gets the sidebar; native gets the sidebar at tablet widths and
//! the tab bar below. No transition state, the swap is instantaneous.

/// Width threshold for showing the sidebar instead of bottom tabs.
pub const SIDEBAR_BREAKPOINT: u32 = 768;
/// Sidebar width in pixels, exported for the content margin helper.
pub const SIDEBAR_WIDTH: u32 = 220;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    Web,
    Ios,
    Android,
}

impl Platform {
    pub fn is_web(self) -> bool {
        self == Platform::Web
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavPresentation {
    Sidebar,
    TabBar,
}

pub fn uses_sidebar(platform: Platform, viewport_width: u32) -> bool {
    platform.is_web() || viewport_width >= SIDEBAR_BREAKPOINT
}

pub fn select_presentation(platform: Platform, viewport_width: u32) -> NavPresentation {
    if uses_sidebar(platform, viewport_width) {
        NavPresentation::Sidebar
    } else {
        NavPresentation::TabBar
    }
}

/// Left margin for the main content pane when the sidebar is visible.
pub fn content_left_margin(platform: Platform, viewport_width: u32) -> u32 {
    if uses_sidebar(platform, viewport_width) {
        SIDEBAR_WIDTH
    } else {
        0
    }
}
