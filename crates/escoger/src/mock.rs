//! In-process driver double.
//!
//! [`MockDriver`] stands in for a live browser session: it hosts a page of
//! select lists, answers option queries, applies real `<select>` click
//! semantics (exclusive selection on single-select, toggling on
//! multi-select), and intercepts the two injection scripts the scripted
//! strategy uses. It also models the backend quirk that motivates the
//! substring text fallback, so that path is reachable in tests.

use crate::driver::{
    Driver, DriverError, DriverResult, ElementHandle, ScriptArg, SessionCapabilities,
};
use crate::matcher::{normalize_space, OptionQuery};
use crate::strategy::{FIRE_ONCHANGE_SCRIPT, SET_ATTRIBUTE_SCRIPT};
use std::cell::RefCell;

#[derive(Debug, Clone)]
struct MockOption {
    value: String,
    text: String,
    selected: bool,
}

/// Builder for one `<select>` element on the mock page
#[derive(Debug, Clone)]
pub struct MockSelect {
    locator: String,
    multiple: bool,
    change_handler: bool,
    options: Vec<MockOption>,
}

impl MockSelect {
    /// A single-select list answering to `locator`
    #[must_use]
    pub fn single(locator: impl Into<String>) -> Self {
        Self {
            locator: locator.into(),
            multiple: false,
            change_handler: false,
            options: Vec::new(),
        }
    }

    /// A multi-select list answering to `locator`
    #[must_use]
    pub fn multiple(locator: impl Into<String>) -> Self {
        Self {
            multiple: true,
            ..Self::single(locator)
        }
    }

    /// Append an unselected option
    #[must_use]
    pub fn option(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push(MockOption {
            value: value.into(),
            text: text.into(),
            selected: false,
        });
        self
    }

    /// Append a pre-selected option
    #[must_use]
    pub fn option_selected(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push(MockOption {
            value: value.into(),
            text: text.into(),
            selected: true,
        });
        self
    }

    /// Register an `onchange` handler on the list
    #[must_use]
    pub const fn with_change_handler(mut self) -> Self {
        self.change_handler = true;
        self
    }
}

/// In-memory browser session
#[derive(Debug, Default)]
pub struct MockDriver {
    selects: RefCell<Vec<MockSelect>>,
    capabilities: SessionCapabilities,
    break_exact_text: bool,
    clicks: RefCell<usize>,
    change_events: RefCell<Vec<String>>,
}

impl MockDriver {
    /// Empty page with standard session capabilities
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the session capability flags
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: SessionCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Emulate a backend whose exact-text queries fail for tokens
    /// containing spaces. Substring queries keep working.
    #[must_use]
    pub const fn break_exact_text_queries(mut self) -> Self {
        self.break_exact_text = true;
        self
    }

    /// Add a select list to the page
    #[must_use]
    pub fn select(self, select: MockSelect) -> Self {
        self.selects.borrow_mut().push(select);
        self
    }

    /// Raw text of an option handle, for test inspection
    #[must_use]
    pub fn option_text(&self, handle: &ElementHandle) -> String {
        let (si, oi) = parse_option_id(&handle.id).expect("option handle");
        self.selects.borrow()[si].options[oi].text.clone()
    }

    /// Texts of the currently selected options of a list, DOM order
    #[must_use]
    pub fn selected_texts(&self, locator: &str) -> Vec<String> {
        self.selected_field(locator, |option| option.text.clone())
    }

    /// Values of the currently selected options of a list, DOM order
    #[must_use]
    pub fn selected_values(&self, locator: &str) -> Vec<String> {
        self.selected_field(locator, |option| option.value.clone())
    }

    /// Number of clicks issued against the page
    #[must_use]
    pub fn click_count(&self) -> usize {
        *self.clicks.borrow()
    }

    /// Number of times a list's `onchange` handler ran
    #[must_use]
    pub fn change_event_count(&self, locator: &str) -> usize {
        self.change_events
            .borrow()
            .iter()
            .filter(|fired| fired.as_str() == locator)
            .count()
    }

    fn selected_field(&self, locator: &str, project: impl Fn(&MockOption) -> String) -> Vec<String> {
        self.selects
            .borrow()
            .iter()
            .find(|select| select.locator == locator)
            .map(|select| {
                select
                    .options
                    .iter()
                    .filter(|option| option.selected)
                    .map(project)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn select_index(&self, id: &str) -> DriverResult<usize> {
        parse_select_id(id).ok_or_else(|| DriverError::StaleElement { id: id.to_string() })
    }

    fn record_change(&self, select_index: usize) {
        let selects = self.selects.borrow();
        let select = &selects[select_index];
        if select.change_handler {
            self.change_events.borrow_mut().push(select.locator.clone());
        }
    }

    fn set_selected(&self, select_index: usize, option_index: usize, selected: bool) {
        let mut selects = self.selects.borrow_mut();
        let select = &mut selects[select_index];
        if selected && !select.multiple {
            for option in &mut select.options {
                option.selected = false;
            }
        }
        select.options[option_index].selected = selected;
    }
}

fn select_handle(index: usize) -> ElementHandle {
    ElementHandle::new(format!("sel{index}"), "select")
}

fn option_handle(select_index: usize, option_index: usize) -> ElementHandle {
    ElementHandle::new(format!("sel{select_index}/opt{option_index}"), "option")
}

fn parse_select_id(id: &str) -> Option<usize> {
    id.strip_prefix("sel")?.parse().ok()
}

fn parse_option_id(id: &str) -> Option<(usize, usize)> {
    let (select_part, option_part) = id.split_once("/opt")?;
    Some((
        select_part.strip_prefix("sel")?.parse().ok()?,
        option_part.parse().ok()?,
    ))
}

fn script_element(args: &[ScriptArg], index: usize) -> DriverResult<&ElementHandle> {
    match args.get(index) {
        Some(ScriptArg::Element(handle)) => Ok(handle),
        _ => Err(DriverError::Script {
            message: format!("expected element at arguments[{index}]"),
        }),
    }
}

fn script_text(args: &[ScriptArg], index: usize) -> DriverResult<&str> {
    match args.get(index) {
        Some(ScriptArg::Text(text)) => Ok(text),
        _ => Err(DriverError::Script {
            message: format!("expected string at arguments[{index}]"),
        }),
    }
}

impl Driver for MockDriver {
    fn find_elements(&self, locator: &str) -> DriverResult<Vec<ElementHandle>> {
        Ok(self
            .selects
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, select)| select.locator == locator)
            .map(|(index, _)| select_handle(index))
            .collect())
    }

    fn find_options(
        &self,
        scope: &ElementHandle,
        query: &OptionQuery,
    ) -> DriverResult<Vec<ElementHandle>> {
        let select_index = self.select_index(&scope.id)?;
        let selects = self.selects.borrow();
        let select = selects
            .get(select_index)
            .ok_or_else(|| DriverError::StaleElement {
                id: scope.id.clone(),
            })?;

        let matches = |option: &MockOption| match query {
            OptionQuery::ByValue(value) => option.value == *value,
            OptionQuery::ByExactText(text) => {
                if self.break_exact_text && text.contains(' ') {
                    return false;
                }
                normalize_space(&option.text) == *text
            }
            OptionQuery::TextContains(text) => option.text.contains(text.as_str()),
            OptionQuery::All => true,
        };

        Ok(select
            .options
            .iter()
            .enumerate()
            .filter(|&(_, option)| matches(option))
            .map(|(option_index, _)| option_handle(select_index, option_index))
            .collect())
    }

    fn execute_script(&self, code: &str, args: &[ScriptArg]) -> DriverResult<serde_json::Value> {
        if code == SET_ATTRIBUTE_SCRIPT {
            let element = script_element(args, 0)?;
            let name = script_text(args, 1)?;
            let value = script_text(args, 2)?.to_string();
            let (select_index, option_index) =
                parse_option_id(&element.id).ok_or_else(|| DriverError::StaleElement {
                    id: element.id.clone(),
                })?;
            if name == "selected" {
                self.set_selected(select_index, option_index, value == "true");
            }
            return Ok(serde_json::Value::Null);
        }

        if code == FIRE_ONCHANGE_SCRIPT {
            let element = script_element(args, 0)?;
            let (select_index, _) =
                parse_option_id(&element.id).ok_or_else(|| DriverError::StaleElement {
                    id: element.id.clone(),
                })?;
            let has_handler = self.selects.borrow()[select_index].change_handler;
            if !has_handler {
                return Err(DriverError::Script {
                    message: "arguments[0].parentNode.onchange is not a function".to_string(),
                });
            }
            self.record_change(select_index);
            return Ok(serde_json::Value::Null);
        }

        Err(DriverError::Script {
            message: format!("unsupported script: {code}"),
        })
    }

    fn element_text(&self, element: &ElementHandle) -> DriverResult<String> {
        if let Some((select_index, option_index)) = parse_option_id(&element.id) {
            return Ok(self.selects.borrow()[select_index].options[option_index]
                .text
                .clone());
        }
        let select_index = self.select_index(&element.id)?;
        let selects = self.selects.borrow();
        Ok(selects[select_index]
            .options
            .iter()
            .map(|option| option.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn element_attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> DriverResult<Option<String>> {
        if let Some((select_index, option_index)) = parse_option_id(&element.id) {
            let selects = self.selects.borrow();
            let option = &selects[select_index].options[option_index];
            return Ok(match name {
                "value" => Some(option.value.clone()),
                "selected" => option.selected.then(|| "true".to_string()),
                _ => None,
            });
        }
        let select_index = self.select_index(&element.id)?;
        let multiple = self.selects.borrow()[select_index].multiple;
        Ok(match name {
            "multiple" => multiple.then(|| "true".to_string()),
            _ => None,
        })
    }

    fn element_is_selected(&self, element: &ElementHandle) -> DriverResult<bool> {
        match parse_option_id(&element.id) {
            Some((select_index, option_index)) => {
                Ok(self.selects.borrow()[select_index].options[option_index].selected)
            }
            None => Ok(false),
        }
    }

    fn click(&self, element: &ElementHandle) -> DriverResult<()> {
        let (select_index, option_index) =
            parse_option_id(&element.id).ok_or_else(|| DriverError::StaleElement {
                id: element.id.clone(),
            })?;
        *self.clicks.borrow_mut() += 1;

        let (multiple, was_selected) = {
            let selects = self.selects.borrow();
            let select = &selects[select_index];
            (select.multiple, select.options[option_index].selected)
        };
        if multiple {
            // A click toggles the option on a multi-select.
            self.set_selected(select_index, option_index, !was_selected);
            self.record_change(select_index);
        } else if !was_selected {
            // On a single-select, clicking makes the option the selection.
            self.set_selected(select_index, option_index, true);
            self.record_change(select_index);
        }
        Ok(())
    }

    fn capabilities(&self) -> SessionCapabilities {
        self.capabilities.clone()
    }
}
