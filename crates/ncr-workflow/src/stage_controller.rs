//! Stage/tab controller
//!
//! Exactly one section is active at a time, or all of them for the
//! combined view. Roles other than Quality and Admin are locked to the tab of
//! their own stage; every other tab is disabled and selecting it fails.
//!
//! The initial target comes from, in order:
//! - the `section` query parameter
//! - the URL fragment
//! - the tab marked selected in the markup
//! - the first tab

use ncr_core::{Role, Section, Stage};
use serde::Serialize;

use crate::error::StageError;

/// What a tab selection points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Target {
    Section(Section),
    /// Every section at once
    All,
}

/// Visual state of one tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tab {
    pub section: Section,
    /// `aria-selected`
    pub selected: bool,
    /// `disabled` and `aria-disabled`
    pub disabled: bool,
}

/// Query parameter and fragment of a page URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLocation {
    pub section: Option<String>,
    pub fragment: Option<String>,
}

impl PageLocation {
    /// Splits `page.html?section=x#frag`. Unknown query keys are ignored.
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, frag)) => (rest, Some(frag.to_string())),
            None => (url, None),
        };
        let section = rest.split_once('?').and_then(|(_, query)| {
            query
                .split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(k, _)| *k == "section")
                .map(|(_, v)| v.to_string())
        });
        Self {
            section,
            fragment: fragment.filter(|f| !f.is_empty()),
        }
    }
}

/// Tabs of one page and the section currently shown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageController {
    tabs: Vec<Tab>,
    active: Option<Target>,
    locked_to: Option<Section>,
}

impl StageController {
    /// Controller over the given tabs, nothing selected yet
    #[must_use]
    pub fn new(sections: &[Section]) -> Self {
        Self {
            tabs: sections
                .iter()
                .map(|&section| Tab {
                    section,
                    selected: false,
                    disabled: false,
                })
                .collect(),
            active: None,
            locked_to: None,
        }
    }

    /// Builds the controller and selects the initial target
    #[must_use]
    pub fn open(sections: &[Section], location: &PageLocation, marked: Option<Section>) -> Self {
        let mut controller = Self::new(sections);
        if let Some(target) = controller.initial_target(location, marked) {
            // Nothing is locked yet, selection cannot fail.
            let _ = controller.select(target);
        }
        controller
    }

    /// Resolves a raw target name against the tabs present
    ///
    /// Element ids (`sec-…`) are taken verbatim; otherwise aliases are
    /// resolved. A name that resolves to a missing section yields `None`.
    #[must_use]
    pub fn normalize_target(&self, raw: &str) -> Option<Target> {
        let key = raw.trim().to_ascii_lowercase();
        if key.is_empty() {
            return None;
        }
        if key == "all" {
            return Some(Target::All);
        }
        let section = if key.starts_with("sec-") {
            Section::from_element_id(&key)?
        } else {
            key.parse::<Stage>().ok()?.section()
        };
        self.has_tab(section).then_some(Target::Section(section))
    }

    /// Query, then fragment, then the marked tab, then the first tab
    #[must_use]
    pub fn initial_target(
        &self,
        location: &PageLocation,
        marked: Option<Section>,
    ) -> Option<Target> {
        location
            .section
            .as_deref()
            .and_then(|raw| self.normalize_target(raw))
            .or_else(|| {
                location
                    .fragment
                    .as_deref()
                    .and_then(|raw| self.normalize_target(raw))
            })
            .or_else(|| marked.filter(|s| self.has_tab(*s)).map(Target::Section))
            .or_else(|| self.tabs.first().map(|t| Target::Section(t.section)))
    }

    /// Shows `target` and updates the tab state
    ///
    /// # Errors
    /// [`StageError::Locked`] when navigation is locked to another section,
    /// [`StageError::UnknownTarget`] when the section has no tab here.
    pub fn select(&mut self, target: Target) -> Result<(), StageError> {
        if let Target::Section(section) = target {
            if !self.has_tab(section) {
                return Err(StageError::UnknownTarget(section.element_id().to_string()));
            }
        }
        if let Some(locked_to) = self.locked_to {
            if target != Target::Section(locked_to) {
                return Err(StageError::Locked { locked_to });
            }
        }
        for tab in &mut self.tabs {
            tab.selected = target == Target::Section(tab.section);
        }
        self.active = Some(target);
        tracing::debug!("Selected {:?}", target);
        Ok(())
    }

    /// Resolves and selects a raw target name
    ///
    /// # Errors
    /// As [`StageController::select`]; unresolvable names are
    /// [`StageError::UnknownTarget`].
    pub fn select_named(&mut self, raw: &str) -> Result<(), StageError> {
        let target = self
            .normalize_target(raw)
            .ok_or_else(|| StageError::UnknownTarget(raw.trim().to_string()))?;
        self.select(target)
    }

    /// Re-locks navigation for `role` and selects its stage
    pub fn role_changed(&mut self, role: Role) {
        let target = Stage::for_role(role).section();
        self.locked_to = (!role.is_superuser() && self.has_tab(target)).then_some(target);
        for tab in &mut self.tabs {
            tab.disabled = self.locked_to.is_some_and(|locked| locked != tab.section);
        }
        if self.has_tab(target) {
            // The target is the lock itself, or there is no lock.
            let _ = self.select(Target::Section(target));
        }
    }

    /// Current selection
    #[inline]
    #[must_use]
    pub fn active(&self) -> Option<Target> {
        self.active
    }

    /// Section navigation is locked to, if any
    #[inline]
    #[must_use]
    pub fn locked_to(&self) -> Option<Section> {
        self.locked_to
    }

    /// Tabs in page order
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Whether `section` is currently shown
    #[must_use]
    pub fn is_visible(&self, section: Section) -> bool {
        match self.active {
            Some(Target::All) => self.has_tab(section),
            Some(Target::Section(active)) => active == section,
            None => false,
        }
    }

    /// Sections currently shown, in page order
    #[must_use]
    pub fn visible_sections(&self) -> Vec<Section> {
        self.tabs
            .iter()
            .map(|t| t.section)
            .filter(|s| self.is_visible(*s))
            .collect()
    }

    fn has_tab(&self, section: Section) -> bool {
        self.tabs.iter().any(|t| t.section == section)
    }
}
