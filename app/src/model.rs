//! The single state value owned by the form/list UI.

use std::collections::BTreeMap;

use basin_core::Record;

/// The in-progress record form.
///
/// `id` absent means "new record" mode: submitting can only produce a create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormModel {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
}

impl FormModel {
    /// Fill the form from a fetched record.
    pub fn populate(&mut self, record: &Record) {
        self.id = Some(record.id.clone());
        self.title = record.title.clone().unwrap_or_default();
        self.description = record.description.clone().unwrap_or_default();
    }

    /// Back to "new record" mode with empty fields.
    pub fn clear(&mut self) {
        *self = FormModel::default();
    }
}

/// Everything the UI shows: a clock, the form, the fetched records keyed by
/// id, and at most one error message.
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// UI clock in milliseconds. Updated by ticks, unrelated to data.
    pub clock: u64,
    pub form: FormModel,
    pub records: BTreeMap<String, Record>,
    pub error: Option<String>,
}
