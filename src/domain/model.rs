use crate::core::tax_id::TaxIdKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl NavLink {
    pub fn new(label: &str, href: &str) -> Self {
        Self {
            label: label.to_string(),
            href: Some(href.to_string()),
        }
    }
}

/// A collapsible group of sub-items, opened by its toggle entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuSection {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub items: Vec<NavLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MenuEntry {
    Link(NavLink),
    Section(MenuSection),
}

impl MenuEntry {
    pub fn label(&self) -> &str {
        match self {
            MenuEntry::Link(link) => &link.label,
            MenuEntry::Section(section) => &section.label,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    /// The navigation of the ERP: dashboard plus the registry and stock screens.
    pub fn erp_default() -> Self {
        Self {
            entries: vec![
                MenuEntry::Link(NavLink::new("Início", "/")),
                MenuEntry::Link(NavLink::new("Dashboard", "/dashboard")),
                MenuEntry::Section(MenuSection {
                    id: "cadastros".to_string(),
                    label: "Cadastros".to_string(),
                    items: vec![
                        NavLink::new("Empresas", "/empresas"),
                        NavLink::new("Pessoas", "/pessoas"),
                        NavLink::new("Usuários", "/usuarios"),
                        NavLink::new("Mercadorias", "/mercadorias"),
                    ],
                }),
                MenuEntry::Section(MenuSection {
                    id: "estoque".to_string(),
                    label: "Estoque".to_string(),
                    items: vec![
                        NavLink::new("Saldos", "/saldos"),
                        NavLink::new("Nova movimentação", "/saldos/novo"),
                    ],
                }),
            ],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sections(&self) -> impl Iterator<Item = &MenuSection> {
        self.entries.iter().filter_map(|entry| match entry {
            MenuEntry::Section(section) => Some(section),
            MenuEntry::Link(_) => None,
        })
    }
}

/// One row of a registry export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditRecord {
    /// 1-based data row, not counting the header.
    pub row: usize,
    pub label: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Valid,
    Invalid,
    Missing,
    Duplicate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditOutcome {
    pub row: usize,
    pub label: Option<String>,
    pub value: String,
    pub kind: Option<TaxIdKind>,
    pub status: AuditStatus,
    pub detail: Option<String>,
    pub formatted: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub missing: usize,
    pub duplicate: usize,
}

impl AuditSummary {
    pub fn record(&mut self, status: AuditStatus) {
        self.total += 1;
        match status {
            AuditStatus::Valid => self.valid += 1,
            AuditStatus::Invalid => self.invalid += 1,
            AuditStatus::Missing => self.missing += 1,
            AuditStatus::Duplicate => self.duplicate += 1,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.valid == self.total
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    pub summary: AuditSummary,
    pub outcomes: Vec<AuditOutcome>,
}
