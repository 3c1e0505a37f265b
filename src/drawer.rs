//! Drawer/bottom-sheet controller.
//!
//! One host per application window holds "which overlay is active".
//! Opening replaces the active content unconditionally; callers confirm
//! destructive replacement themselves. Closing clears content on the
//! closing transition so nothing stale is visible while the drawer is open.

use crate::content::DrawerContent;
use std::sync::{Mutex, MutexGuard};

/// Sizing hints for the host sheet; `None` lets the host pick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SizeHints {
    pub max_height: Option<u32>,
    pub min_height: Option<u32>,
}

#[derive(Default)]
struct DrawerState {
    is_visible: bool,
    active: Option<DrawerContent>,
    size: SizeHints,
}

#[derive(Default)]
pub struct DrawerHost {
    state: Mutex<DrawerState>,
}

impl DrawerHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, DrawerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Open a drawer, replacing whatever is active.
    pub fn open(&self, content: DrawerContent, size: SizeHints) {
        let mut st = self.state();
        st.is_visible = true;
        st.active = Some(content);
        st.size = size;
    }

    /// Hide the drawer and clear its content.
    pub fn close(&self) {
        let mut st = self.state();
        st.is_visible = false;
        st.active = None;
        st.size = SizeHints::default();
    }

    pub fn is_visible(&self) -> bool {
        self.state().is_visible
    }

    pub fn active(&self) -> Option<DrawerContent> {
        self.state().active.clone()
    }

    pub fn size(&self) -> SizeHints {
        self.state().size
    }
}
