//! Parsed page document: the selection controls a page exposes.
//!
//! Only `<select>` elements matter to the page script, so parsing keeps
//! those (in document order) and drops everything else. Option values
//! follow HTML rules: the `value` attribute when present, otherwise the
//! option's whitespace-collapsed text.

use scraper::{ElementRef, Html, Selector};

use super::PageError;

/// Position of a selection control in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(usize);

impl ControlId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self { value: value.into(), label: label.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    pub id: Option<String>,
    pub name: Option<String>,
    options: Vec<SelectOption>,
    selected: Option<usize>,
}

impl SelectControl {
    /// Build a control whose initial selection is the first option.
    #[must_use]
    pub fn new(options: Vec<SelectOption>) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        Self { id: None, name: None, options, selected }
    }

    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Current value. Empty when the control has no options.
    #[must_use]
    pub fn value(&self) -> &str {
        self.selected
            .and_then(|idx| self.options.get(idx))
            .map_or("", |opt| opt.value.as_str())
    }

    /// Select the option carrying `value`. Returns whether the selection moved.
    ///
    /// # Errors
    ///
    /// Returns `PageError::UnknownOption` if no option has that value.
    pub fn select_value(&mut self, value: &str) -> Result<bool, PageError> {
        let idx = self
            .options
            .iter()
            .position(|opt| opt.value == value)
            .ok_or_else(|| PageError::UnknownOption(value.to_owned()))?;
        if self.selected == Some(idx) {
            return Ok(false);
        }
        self.selected = Some(idx);
        Ok(true)
    }

    fn from_element(el: ElementRef<'_>, option_selector: &Selector) -> Self {
        let mut options = Vec::new();
        let mut preselected = None;
        for opt in el.select(option_selector) {
            let label = collapse_whitespace(&opt.text().collect::<String>());
            let value = opt
                .value()
                .attr("value")
                .map_or_else(|| label.clone(), str::to_owned);
            if preselected.is_none() && opt.value().attr("selected").is_some() {
                preselected = Some(options.len());
            }
            options.push(SelectOption { value, label });
        }

        let selected = preselected.or(if options.is_empty() { None } else { Some(0) });
        Self {
            id: el.value().attr("id").map(str::to_owned),
            name: el.value().attr("name").map(str::to_owned),
            options,
            selected,
        }
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    controls: Vec<SelectControl>,
}

impl Document {
    /// Parse markup and collect its selection controls. Parsing is lenient
    /// and never fails; malformed markup simply yields fewer controls.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let (Ok(select_selector), Ok(option_selector)) = (Selector::parse("select"), Selector::parse("option")) else {
            return Self::default();
        };
        let parsed = Html::parse_document(html);
        let controls = parsed
            .select(&select_selector)
            .map(|el| SelectControl::from_element(el, &option_selector))
            .collect();
        Self { controls }
    }

    #[must_use]
    pub fn from_controls(controls: Vec<SelectControl>) -> Self {
        Self { controls }
    }

    #[must_use]
    pub fn controls(&self) -> &[SelectControl] {
        &self.controls
    }

    /// First selection control in document order, if any.
    #[must_use]
    pub fn first_select(&self) -> Option<ControlId> {
        if self.controls.is_empty() { None } else { Some(ControlId(0)) }
    }

    #[must_use]
    pub fn control(&self, id: ControlId) -> Option<&SelectControl> {
        self.controls.get(id.0)
    }

    pub(crate) fn control_mut(&mut self, id: ControlId) -> Option<&mut SelectControl> {
        self.controls.get_mut(id.0)
    }

    /// Look up a control by position, e.g. to pick the second `<select>`.
    #[must_use]
    pub fn control_at(&self, index: usize) -> Option<ControlId> {
        (index < self.controls.len()).then_some(ControlId(index))
    }
}

#[cfg(test)]
#[path = "document_test.rs"]
mod tests;
