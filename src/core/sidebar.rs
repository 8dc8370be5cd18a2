//! Responsive sidebar state.
//!
//! The controller owns the open/closed state of the side panel and the
//! expanded state of its collapsible sections. Viewport width and location
//! path are read through the [`Viewport`] and [`Location`] ports each time
//! they matter, so the controller can be driven without a rendering surface.

use crate::domain::model::{Menu, MenuEntry};
use crate::domain::ports::{Location, Viewport};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BREAKPOINT_PX: u32 = 992;
pub const DEFAULT_CLOSE_ANIMATION_MS: u64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidebarSettings {
    /// Viewports at least this wide are desktop.
    pub breakpoint_px: u32,
    /// Delay before the fade-in marker is dropped after closing.
    pub close_animation_ms: u64,
}

impl Default for SidebarSettings {
    fn default() -> Self {
        Self {
            breakpoint_px: DEFAULT_BREAKPOINT_PX,
            close_animation_ms: DEFAULT_CLOSE_ANIMATION_MS,
        }
    }
}

impl SidebarSettings {
    pub fn close_animation(&self) -> Duration {
        Duration::from_millis(self.close_animation_ms)
    }

    pub fn is_desktop(&self, width: u32) -> bool {
        width >= self.breakpoint_px
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ToggleClicked,
    OverlayClicked,
    Resized,
    /// Key name as reported by the browser, e.g. `"Escape"`.
    KeyPressed(String),
    SectionToggleClicked(String),
    LocationChanged,
    Tick(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub id: String,
    pub expanded: bool,
    pub toggle_active: bool,
    pub chevron_degrees: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SidebarView {
    pub open: bool,
    pub desktop: bool,
    pub overlay_visible: bool,
    pub content_shifted: bool,
    pub scroll_locked: bool,
    pub animating: bool,
    pub focused: Option<String>,
    pub sections: Vec<SectionView>,
    pub active_links: Vec<String>,
}

pub struct SidebarController<V: Viewport, L: Location> {
    settings: SidebarSettings,
    menu: Menu,
    viewport: V,
    location: L,
    open: bool,
    desktop: bool,
    overlay_visible: bool,
    content_shifted: bool,
    scroll_locked: bool,
    fade_in: bool,
    // Each close schedules its own removal; a later open does not cancel them.
    fade_clears: Vec<Duration>,
    focused: Option<usize>,
    expanded: Vec<bool>,
    active: Vec<bool>,
}

/// Every link in display order, with the index of its enclosing section.
fn flatten_links(menu: &Menu) -> Vec<(Option<usize>, Option<&str>)> {
    let mut links = Vec::new();
    let mut section_index = 0;
    for entry in &menu.entries {
        match entry {
            MenuEntry::Link(link) => links.push((None, link.href.as_deref())),
            MenuEntry::Section(section) => {
                for item in &section.items {
                    links.push((Some(section_index), item.href.as_deref()));
                }
                section_index += 1;
            }
        }
    }
    links
}

impl<V: Viewport, L: Location> SidebarController<V, L> {
    pub fn new(settings: SidebarSettings, menu: Menu, viewport: V, location: L) -> Self {
        let desktop = settings.is_desktop(viewport.width());
        let section_count = menu.sections().count();
        let link_count = flatten_links(&menu).len();

        let mut controller = Self {
            settings,
            menu,
            viewport,
            location,
            open: false,
            desktop,
            overlay_visible: false,
            content_shifted: false,
            scroll_locked: false,
            fade_in: false,
            fade_clears: Vec::new(),
            focused: None,
            expanded: vec![false; section_count],
            active: vec![false; link_count],
        };

        // Same width as above, so this never transitions; the panel starts closed.
        controller.handle_resize();
        controller.set_active_menu_item();
        tracing::debug!(
            "Sidebar ready: desktop={}, sections={}, links={}",
            controller.desktop,
            section_count,
            link_count
        );
        controller
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_desktop(&self) -> bool {
        self.desktop
    }

    pub fn settings(&self) -> &SidebarSettings {
        &self.settings
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        if self.desktop {
            self.content_shifted = true;
        } else {
            self.overlay_visible = true;
            self.scroll_locked = true;
        }
        self.fade_in = true;
        self.focused = if self.menu.is_empty() { None } else { Some(0) };
        tracing::debug!("Sidebar opened (desktop={})", self.desktop);
    }

    /// Schedules the fade-in class to be cleared once the close animation ends.
    ///
    /// Pending timers only drain through [`advance`](Self::advance). A close that
    /// lands on a timer with the same remaining time reuses it, so a host that
    /// never ticks holds at most one.
    pub fn close(&mut self) {
        self.open = false;
        self.overlay_visible = false;
        self.content_shifted = false;
        self.scroll_locked = false;
        let delay = self.settings.close_animation();
        if !self.fade_clears.contains(&delay) {
            self.fade_clears.push(delay);
        }
        tracing::debug!("Sidebar closed");
    }

    pub fn handle_resize(&mut self) {
        let was_desktop = self.desktop;
        self.desktop = self.settings.is_desktop(self.viewport.width());

        if !was_desktop && self.desktop {
            self.overlay_visible = false;
            self.scroll_locked = false;
            if !self.open {
                self.open();
            }
        }

        if was_desktop && !self.desktop {
            self.close();
        }
    }

    /// Returns whether the key did anything.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if key == "Escape" && self.open {
            self.close();
            return true;
        }
        false
    }

    /// Accordion toggle: every other section collapses, the target flips.
    /// Returns `false` for an id the menu does not have.
    pub fn toggle_section(&mut self, id: &str) -> bool {
        let Some(target) = self.menu.sections().position(|s| s.id == id) else {
            tracing::debug!("Ignoring toggle for unknown section '{}'", id);
            return false;
        };

        for (i, expanded) in self.expanded.iter_mut().enumerate() {
            if i != target {
                *expanded = false;
            }
        }
        self.expanded[target] = !self.expanded[target];
        true
    }

    /// Marks every link pointing at the current path and expands the section
    /// holding an active sub-item. Other sections are left as they are.
    pub fn set_active_menu_item(&mut self) {
        let path = self.location.path();
        let mut to_expand = Vec::new();

        self.active = flatten_links(&self.menu)
            .into_iter()
            .map(|(section, href)| {
                let hit = href.is_some_and(|h| !h.is_empty() && h == path);
                if let (true, Some(index)) = (hit, section) {
                    to_expand.push(index);
                }
                hit
            })
            .collect();

        for index in to_expand {
            self.expanded[index] = true;
        }
    }

    /// Runs the animation timers that fall due within `delta`.
    pub fn advance(&mut self, delta: Duration) {
        let mut fired = false;
        self.fade_clears.retain_mut(|remaining| {
            if *remaining <= delta {
                fired = true;
                false
            } else {
                *remaining -= delta;
                true
            }
        });
        if fired {
            self.fade_in = false;
        }
    }

    /// Routes one UI event. Returns `false` when the event was ignored.
    pub fn dispatch(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::ToggleClicked => {
                self.toggle();
                true
            }
            UiEvent::OverlayClicked => {
                self.close();
                true
            }
            UiEvent::Resized => {
                self.handle_resize();
                true
            }
            UiEvent::KeyPressed(key) => self.handle_key(&key),
            UiEvent::SectionToggleClicked(id) => self.toggle_section(&id),
            UiEvent::LocationChanged => {
                self.set_active_menu_item();
                true
            }
            UiEvent::Tick(delta) => {
                self.advance(delta);
                true
            }
        }
    }

    pub fn view(&self) -> SidebarView {
        let sections = self
            .menu
            .sections()
            .zip(&self.expanded)
            .map(|(section, &expanded)| SectionView {
                id: section.id.clone(),
                expanded,
                toggle_active: expanded,
                chevron_degrees: if expanded { 180 } else { 0 },
            })
            .collect();

        let active_links = flatten_links(&self.menu)
            .into_iter()
            .zip(&self.active)
            .filter(|(_, active)| **active)
            .filter_map(|((_, href), _)| href.map(str::to_string))
            .collect();

        SidebarView {
            open: self.open,
            desktop: self.desktop,
            overlay_visible: self.overlay_visible,
            content_shifted: self.content_shifted,
            scroll_locked: self.scroll_locked,
            animating: self.fade_in,
            focused: self
                .focused
                .and_then(|i| self.menu.entries.get(i))
                .map(|entry| entry.label().to_string()),
            sections,
            active_links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{MenuSection, NavLink};

    fn menu() -> Menu {
        Menu {
            entries: vec![
                MenuEntry::Link(NavLink::new("Dashboard", "/dashboard")),
                MenuEntry::Section(MenuSection {
                    id: "cadastros".to_string(),
                    label: "Cadastros".to_string(),
                    items: vec![NavLink::new("Empresas", "/empresas")],
                }),
            ],
        }
    }

    #[test]
    fn test_starts_closed_on_desktop() {
        let sidebar = SidebarController::new(SidebarSettings::default(), menu(), 1280u32, "/");
        assert!(sidebar.is_desktop());
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_breakpoint_is_inclusive() {
        let settings = SidebarSettings::default();
        assert!(settings.is_desktop(992));
        assert!(!settings.is_desktop(991));
    }

    #[test]
    fn test_open_on_mobile_locks_scroll() {
        let mut sidebar = SidebarController::new(SidebarSettings::default(), menu(), 375u32, "/");
        sidebar.toggle();
        let view = sidebar.view();
        assert!(view.open && view.overlay_visible && view.scroll_locked);
        assert!(!view.content_shifted);
        assert_eq!(view.focused.as_deref(), Some("Dashboard"));
    }

    #[test]
    fn test_repeated_close_without_ticks_keeps_one_timer() {
        let mut sidebar = SidebarController::new(SidebarSettings::default(), menu(), 375u32, "/");
        for _ in 0..1000 {
            sidebar.open();
            sidebar.close();
        }
        assert_eq!(sidebar.fade_clears.len(), 1);

        sidebar.advance(Duration::from_millis(100));
        sidebar.close();
        assert_eq!(sidebar.fade_clears.len(), 2);

        sidebar.advance(Duration::from_millis(300));
        assert!(sidebar.fade_clears.is_empty());
        assert!(!sidebar.view().animating);
    }

    #[test]
    fn test_unknown_section_is_ignored() {
        let mut sidebar = SidebarController::new(SidebarSettings::default(), menu(), 375u32, "/");
        assert!(!sidebar.dispatch(UiEvent::SectionToggleClicked("financeiro".to_string())));
    }
}
