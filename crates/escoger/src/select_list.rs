//! Resolved `<select>` elements.
//!
//! A [`SelectList`] is resolved fresh for every keyword invocation and lives
//! for exactly that invocation. Option handles read through it are equally
//! transient; nothing is cached because the page may change between calls.

use crate::driver::{Driver, ElementHandle};
use crate::matcher::OptionQuery;
use crate::result::{EscogerError, EscogerResult};

/// A `<select>` element resolved from a locator, with its derived mode.
#[derive(Debug, Clone)]
pub struct SelectList {
    element: ElementHandle,
    is_multiple: bool,
    locator: String,
}

impl SelectList {
    /// Resolve `locator` to exactly one select element.
    ///
    /// Non-select matches are skipped; the first select element wins.
    ///
    /// # Errors
    ///
    /// [`EscogerError::LocatorNotFound`] when nothing matches.
    pub fn resolve(driver: &dyn Driver, locator: &str) -> EscogerResult<Self> {
        let element = driver
            .find_elements(locator)?
            .into_iter()
            .find(ElementHandle::is_select)
            .ok_or_else(|| EscogerError::LocatorNotFound {
                locator: locator.to_string(),
            })?;
        let is_multiple = driver.element_attribute(&element, "multiple")?.is_some();
        Ok(Self {
            element,
            is_multiple,
            locator: locator.to_string(),
        })
    }

    /// Handle of the underlying select element
    #[must_use]
    pub const fn element(&self) -> &ElementHandle {
        &self.element
    }

    /// Whether the list accepts multiple selected options
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        self.is_multiple
    }

    /// Locator text the list was resolved from
    #[must_use]
    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// All options in DOM order
    pub fn options(&self, driver: &dyn Driver) -> EscogerResult<Vec<ElementHandle>> {
        Ok(driver.find_options(&self.element, &OptionQuery::All)?)
    }

    /// Currently selected options in DOM order, possibly empty
    pub fn selected_options(&self, driver: &dyn Driver) -> EscogerResult<Vec<ElementHandle>> {
        let mut selected = Vec::new();
        for option in self.options(driver)? {
            if driver.element_is_selected(&option)? {
                selected.push(option);
            }
        }
        Ok(selected)
    }

    /// First selected option.
    ///
    /// # Errors
    ///
    /// [`EscogerError::NoSelection`] when nothing is selected.
    pub fn first_selected(&self, driver: &dyn Driver) -> EscogerResult<ElementHandle> {
        self.selected_options(driver)?
            .into_iter()
            .next()
            .ok_or_else(|| EscogerError::NoSelection {
                locator: self.locator.clone(),
            })
    }
}
