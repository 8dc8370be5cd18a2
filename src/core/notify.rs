//! Toast notifications and the delete confirmation prompt.

use crate::domain::ports::Confirm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_DELETE_PROMPT: &str = "Tem certeza que deseja excluir este item?";
pub const CONTAINER_ID: &str = "toast-container";
pub const CONTAINER_CLASSES: &str = "toast-container position-fixed bottom-0 end-0 p-3";
pub const CONTAINER_Z_INDEX: u32 = 1055;

/// Bootstrap contextual colour of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastLevel {
    Primary,
    Secondary,
    Success,
    Danger,
    Warning,
    #[default]
    Info,
    Light,
    Dark,
}

impl ToastLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ToastLevel::Primary => "primary",
            ToastLevel::Secondary => "secondary",
            ToastLevel::Success => "success",
            ToastLevel::Danger => "danger",
            ToastLevel::Warning => "warning",
            ToastLevel::Info => "info",
            ToastLevel::Light => "light",
            ToastLevel::Dark => "dark",
        }
    }
}

impl fmt::Display for ToastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToastLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(ToastLevel::Primary),
            "secondary" => Ok(ToastLevel::Secondary),
            "success" => Ok(ToastLevel::Success),
            // Flash messages from the server use "error".
            "danger" | "error" => Ok(ToastLevel::Danger),
            "warning" => Ok(ToastLevel::Warning),
            "info" => Ok(ToastLevel::Info),
            "light" => Ok(ToastLevel::Light),
            "dark" => Ok(ToastLevel::Dark),
            other => Err(format!("unknown toast level '{}'", other)),
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
}

impl Toast {
    pub fn classes(&self) -> String {
        format!("toast align-items-center text-bg-{} border-0", self.level)
    }

    /// Alert markup for the toast; the message is escaped.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div id="toast-{id}" class="{classes}" role="alert">"#,
                r#"<div class="d-flex">"#,
                r#"<div class="toast-body">{message}</div>"#,
                r#"<button type="button" class="btn-close btn-close-white me-2 m-auto" data-bs-dismiss="toast"></button>"#,
                "</div></div>"
            ),
            id = self.id,
            classes = self.classes(),
            message = escape_html(&self.message),
        )
    }
}

/// Toasts currently on screen, oldest first.
#[derive(Debug, Default)]
pub struct ToastStack {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, level: ToastLevel) -> u64 {
        self.next_id += 1;
        let toast = Toast {
            id: self.next_id,
            message: message.into(),
            level,
        };
        tracing::debug!("Showing {} toast #{}", toast.level, toast.id);
        self.toasts.push(toast);
        self.next_id
    }

    /// Removes a toast once it has been hidden.
    pub fn hide(&mut self, id: u64) -> Option<Toast> {
        let index = self.toasts.iter().position(|t| t.id == id)?;
        Some(self.toasts.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Asks before deleting, using the standard prompt unless one is given.
pub fn confirm_delete<C: Confirm + ?Sized>(prompt: &C, message: Option<&str>) -> bool {
    prompt.confirm(message.unwrap_or(DEFAULT_DELETE_PROMPT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingPrompt {
        answer: bool,
        asked: RefCell<Vec<String>>,
    }

    impl Confirm for RecordingPrompt {
        fn confirm(&self, message: &str) -> bool {
            self.asked.borrow_mut().push(message.to_string());
            self.answer
        }
    }

    #[test]
    fn test_toast_markup_escapes_message() {
        let mut stack = ToastStack::new();
        let id = stack.show("<b>CNPJ</b> já cadastrado!", "error".parse().unwrap());
        let toast = stack.iter().next().unwrap();

        assert_eq!(toast.id, id);
        assert_eq!(toast.classes(), "toast align-items-center text-bg-danger border-0");
        let html = toast.to_html();
        assert!(html.contains("&lt;b&gt;CNPJ&lt;/b&gt; já cadastrado!"));
        assert!(html.contains(r#"role="alert""#));
    }

    #[test]
    fn test_hide_removes_only_that_toast() {
        let mut stack = ToastStack::new();
        let first = stack.show("Empresa cadastrada com sucesso!", ToastLevel::Success);
        let second = stack.show("Salvando...", ToastLevel::default());

        assert_eq!(stack.hide(first).map(|t| t.level), Some(ToastLevel::Success));
        assert!(stack.hide(first).is_none());
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.iter().next().map(|t| t.id), Some(second));
    }

    #[test]
    fn test_confirm_delete_default_message() {
        let prompt = RecordingPrompt {
            answer: true,
            asked: RefCell::new(Vec::new()),
        };
        assert!(confirm_delete(&prompt, None));
        assert!(confirm_delete(&prompt, Some("Excluir empresa?")));
        assert_eq!(
            *prompt.asked.borrow(),
            vec![DEFAULT_DELETE_PROMPT.to_string(), "Excluir empresa?".to_string()]
        );
    }
}
