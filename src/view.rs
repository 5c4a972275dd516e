//! Filter and collapse state of the dashboard page.
//!
//! The inline page script mirrors these transitions on DOM classes; the page
//! assembler uses the initial state to emit the starting classes.

use std::collections::BTreeSet;

use crate::registry::{Registry, ALL_SECTIONS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Section(String),
}

impl Filter {
    pub fn from_target(target: &str) -> Self {
        if target == ALL_SECTIONS {
            Filter::All
        } else {
            Filter::Section(target.to_string())
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Filter::All => ALL_SECTIONS,
            Filter::Section(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pill<'a> {
    pub target: &'a str,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct ViewState {
    sections: Vec<String>,
    active: Filter,
    collapsed: BTreeSet<String>,
}

impl ViewState {
    /// Every section visible and expanded, "All" active.
    pub fn new(registry: &Registry) -> Self {
        Self {
            sections: registry.section_ids().map(str::to_string).collect(),
            active: Filter::All,
            collapsed: BTreeSet::new(),
        }
    }

    pub fn active(&self) -> &Filter {
        &self.active
    }

    /// Make `target` the sole active filter. Targets that match no pill are
    /// ignored so exactly one pill stays active.
    pub fn filter_section(&mut self, target: &str) -> bool {
        if target != ALL_SECTIONS && !self.sections.iter().any(|s| s == target) {
            return false;
        }
        self.active = Filter::from_target(target);
        true
    }

    /// Flip the collapsed state of a section, returning the new state.
    /// Unknown ids are ignored.
    pub fn toggle_section(&mut self, id: &str) -> bool {
        if !self.sections.iter().any(|s| s == id) {
            return false;
        }

        if self.collapsed.remove(id) {
            false
        } else {
            self.collapsed.insert(id.to_string());
            true
        }
    }

    pub fn is_visible(&self, id: &str) -> bool {
        match &self.active {
            Filter::All => true,
            Filter::Section(target) => target == id,
        }
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// The "All" pill followed by one pill per section.
    pub fn pills(&self) -> Vec<Pill<'_>> {
        std::iter::once(ALL_SECTIONS)
            .chain(self.sections.iter().map(String::as_str))
            .map(|target| Pill {
                target,
                active: self.active.target() == target,
            })
            .collect()
    }
}
