use crate::core::sidebar::{SidebarController, SidebarSettings, SidebarView, UiEvent};
use crate::domain::model::Menu;
use crate::utils::error::{HelperError, Result};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::str::FromStr;
use std::time::Duration;

/// One step of a scripted session, e.g. `resize:600` or `section:cadastros`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    Event(UiEvent),
    Resize(u32),
    Navigate(String),
}

fn invalid_step(step: &str, reason: &str) -> HelperError {
    HelperError::InvalidConfigValueError {
        field: "events".to_string(),
        value: step.to_string(),
        reason: reason.to_string(),
    }
}

impl FromStr for ScriptStep {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self> {
        let step = s.trim();
        let (name, arg) = match step.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (step, None),
        };

        match (name, arg) {
            ("toggle", None) => Ok(ScriptStep::Event(UiEvent::ToggleClicked)),
            ("overlay", None) => Ok(ScriptStep::Event(UiEvent::OverlayClicked)),
            ("escape", None) => Ok(ScriptStep::Event(UiEvent::KeyPressed("Escape".to_string()))),
            ("key", Some(key)) if !key.is_empty() => {
                Ok(ScriptStep::Event(UiEvent::KeyPressed(key.to_string())))
            }
            ("section", Some(id)) if !id.is_empty() => {
                Ok(ScriptStep::Event(UiEvent::SectionToggleClicked(id.to_string())))
            }
            ("resize", Some(px)) => px
                .parse()
                .map(ScriptStep::Resize)
                .map_err(|_| invalid_step(step, "width must be a whole number of pixels")),
            ("tick", Some(ms)) => ms
                .parse()
                .map(|ms| ScriptStep::Event(UiEvent::Tick(Duration::from_millis(ms))))
                .map_err(|_| invalid_step(step, "tick must be a whole number of milliseconds")),
            ("navigate", Some(path)) if path.starts_with('/') => {
                Ok(ScriptStep::Navigate(path.to_string()))
            }
            _ => Err(invalid_step(
                step,
                "expected toggle, overlay, escape, key:<name>, section:<id>, resize:<px>, tick:<ms> or navigate:</path>",
            )),
        }
    }
}

pub type SharedWidth = Rc<Cell<u32>>;
pub type SharedPath = Rc<RefCell<String>>;

/// A sidebar whose viewport and location are owned by the session,
/// so a script can resize and navigate between events.
pub struct SidebarSession {
    width: SharedWidth,
    path: SharedPath,
    controller: SidebarController<SharedWidth, SharedPath>,
}

impl SidebarSession {
    pub fn new(settings: SidebarSettings, menu: Menu, width: u32, path: &str) -> Self {
        let width = Rc::new(Cell::new(width));
        let path = Rc::new(RefCell::new(path.to_string()));
        let controller = SidebarController::new(settings, menu, Rc::clone(&width), Rc::clone(&path));
        Self {
            width,
            path,
            controller,
        }
    }

    pub fn apply(&mut self, step: ScriptStep) -> bool {
        tracing::debug!("Applying {:?}", step);
        match step {
            ScriptStep::Event(event) => self.controller.dispatch(event),
            ScriptStep::Resize(px) => {
                self.width.set(px);
                self.controller.dispatch(UiEvent::Resized)
            }
            ScriptStep::Navigate(path) => {
                *self.path.borrow_mut() = path;
                self.controller.dispatch(UiEvent::LocationChanged)
            }
        }
    }

    /// Parses and applies every step, stopping at the first malformed one.
    pub fn run_script<I, S>(&mut self, steps: I) -> Result<SidebarView>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for raw in steps {
            let step: ScriptStep = raw.as_ref().parse()?;
            if !self.apply(step) {
                tracing::warn!("Step '{}' had no effect", raw.as_ref());
            }
        }
        Ok(self.view())
    }

    pub fn view(&self) -> SidebarView {
        self.controller.view()
    }

    pub fn controller(&self) -> &SidebarController<SharedWidth, SharedPath> {
        &self.controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_steps() {
        assert_eq!(
            "toggle".parse::<ScriptStep>().unwrap(),
            ScriptStep::Event(UiEvent::ToggleClicked)
        );
        assert_eq!("resize:600".parse::<ScriptStep>().unwrap(), ScriptStep::Resize(600));
        assert_eq!(
            "tick:300".parse::<ScriptStep>().unwrap(),
            ScriptStep::Event(UiEvent::Tick(Duration::from_millis(300)))
        );
        assert_eq!(
            "navigate:/empresas".parse::<ScriptStep>().unwrap(),
            ScriptStep::Navigate("/empresas".to_string())
        );
        assert!("resize:wide".parse::<ScriptStep>().is_err());
        assert!("navigate:empresas".parse::<ScriptStep>().is_err());
        assert!("jump".parse::<ScriptStep>().is_err());
    }

    #[test]
    fn test_script_resizes_through_shared_viewport() {
        let mut session = SidebarSession::new(SidebarSettings::default(), Menu::erp_default(), 1280, "/");
        let view = session.run_script(["resize:600", "resize:1024"]).unwrap();
        assert!(view.open);
        assert!(view.content_shifted);
        assert!(session.controller().is_desktop());
    }
}
