//! Read-side queries and selection assertions.

use crate::driver::{Driver, ElementHandle};
use crate::result::{EscogerError, EscogerResult};
use crate::select_list::SelectList;
use tracing::info;

/// Read-only queries over select lists.
pub struct SelectListView<'a> {
    driver: &'a dyn Driver,
}

impl std::fmt::Debug for SelectListView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectListView").finish_non_exhaustive()
    }
}

impl<'a> SelectListView<'a> {
    /// Create a view over the given driver
    #[must_use]
    pub fn new(driver: &'a dyn Driver) -> Self {
        Self { driver }
    }

    /// All options of the list, DOM order
    pub fn options(&self, locator: &str) -> EscogerResult<Vec<ElementHandle>> {
        SelectList::resolve(self.driver, locator)?.options(self.driver)
    }

    /// Currently selected options, DOM order, possibly empty
    pub fn selected_options(&self, locator: &str) -> EscogerResult<Vec<ElementHandle>> {
        SelectList::resolve(self.driver, locator)?.selected_options(self.driver)
    }

    /// Visible labels of the given options, order preserved
    pub fn labels_of(&self, options: &[ElementHandle]) -> EscogerResult<Vec<String>> {
        options
            .iter()
            .map(|option| Ok(self.driver.element_text(option)?))
            .collect()
    }

    /// `value` attributes of the given options, order preserved. An absent
    /// attribute projects to an empty string.
    pub fn values_of(&self, options: &[ElementHandle]) -> EscogerResult<Vec<String>> {
        options
            .iter()
            .map(|option| {
                Ok(self
                    .driver
                    .element_attribute(option, "value")?
                    .unwrap_or_default())
            })
            .collect()
    }

    /// Labels of every option in the list
    pub fn list_items(&self, locator: &str) -> EscogerResult<Vec<String>> {
        let options = self.options(locator)?;
        self.labels_of(&options)
    }

    /// Label of the first selected option
    pub fn selected_label(&self, locator: &str) -> EscogerResult<String> {
        let list = SelectList::resolve(self.driver, locator)?;
        let first = list.first_selected(self.driver)?;
        Ok(self.driver.element_text(&first)?)
    }

    /// Labels of all selected options.
    ///
    /// # Errors
    ///
    /// [`EscogerError::NoSelection`] when nothing is selected.
    pub fn selected_labels(&self, locator: &str) -> EscogerResult<Vec<String>> {
        let selected = self.non_empty_selection(locator)?;
        self.labels_of(&selected)
    }

    /// `value` attribute of the first selected option
    pub fn selected_value(&self, locator: &str) -> EscogerResult<String> {
        let list = SelectList::resolve(self.driver, locator)?;
        let first = list.first_selected(self.driver)?;
        Ok(self
            .driver
            .element_attribute(&first, "value")?
            .unwrap_or_default())
    }

    /// `value` attributes of all selected options.
    ///
    /// # Errors
    ///
    /// [`EscogerError::NoSelection`] when nothing is selected.
    pub fn selected_values(&self, locator: &str) -> EscogerResult<Vec<String>> {
        let selected = self.non_empty_selection(locator)?;
        self.values_of(&selected)
    }

    /// Verify the selection is exactly `expected`.
    ///
    /// Passes when the selected-option count equals the expected count and
    /// every expected token appears among the selected values or the selected
    /// labels. Zero expected tokens verify that nothing is selected.
    pub fn selection_should_be(&self, locator: &str, expected: &[String]) -> EscogerResult<()> {
        let described = if expected.is_empty() {
            "no options".to_string()
        } else {
            format!("option(s) [ {} ]", expected.join(" | "))
        };
        info!("Verifying list '{locator}' has {described} selected.");

        let selected = self.selected_options(locator)?;
        let labels = self.labels_of(&selected)?;
        let mismatch = || EscogerError::SelectionMismatch {
            locator: locator.to_string(),
            expected: expected.to_vec(),
            actual: labels.clone(),
        };

        if expected.len() != selected.len() {
            return Err(mismatch());
        }
        let values = self.values_of(&selected)?;
        for item in expected {
            if !values.contains(item) && !labels.contains(item) {
                return Err(mismatch());
            }
        }
        Ok(())
    }

    /// Verify the list has no selected options.
    pub fn selection_should_be_empty(&self, locator: &str) -> EscogerResult<()> {
        info!("Verifying list '{locator}' has no selection.");
        let selected = self.selected_options(locator)?;
        if selected.is_empty() {
            return Ok(());
        }
        Err(EscogerError::UnexpectedSelection {
            locator: locator.to_string(),
            selected: self.labels_of(&selected)?,
        })
    }

    fn non_empty_selection(&self, locator: &str) -> EscogerResult<Vec<ElementHandle>> {
        let selected = self.selected_options(locator)?;
        if selected.is_empty() {
            return Err(EscogerError::NoSelection {
                locator: locator.to_string(),
            });
        }
        Ok(selected)
    }
}
