//! Event handling for the form/list UI.
//!
//! # Design
//! `update` is the only place state changes: it consumes one [`Msg`], mutates
//! the [`Model`], and returns the [`Command`]s the host must execute. It
//! performs no I/O itself — the host maps each command to a `basin_core`
//! build/parse pair, runs the HTTP round-trip, and feeds the outcome back in
//! as the matching response `Msg`. Events are strictly serialized; when two
//! in-flight requests overlap, the later-processed response wins.

use basin_core::{Deleted, Error, Record, RecordPayload};

use crate::model::Model;

/// The record listing is always requested in this order.
const LIST_SORT: [&str; 2] = ["title", "description"];

/// One discrete event: a timer tick, a user action, or an HTTP completion.
#[derive(Debug)]
pub enum Msg {
    /// Periodic UI clock tick (milliseconds). Unrelated to data.
    Tick(u64),
    /// User asked for the record list.
    FetchRecords,
    RecordsFetched(Result<Vec<Record>, Error>),
    /// User picked a record to edit.
    EditRecord(String),
    RecordFetched(Result<Record, Error>),
    /// Keystroke in the title field.
    TitleEdited(String),
    /// Keystroke in the description field.
    DescriptionEdited(String),
    /// User submitted the form.
    FormSubmitted,
    /// Outcome of the create or update the submit dispatched.
    RecordSaved(Result<Record, Error>),
    /// User asked to delete a record.
    DeleteRecord(String),
    RecordDeleted(Result<Deleted, Error>),
}

/// An effect the host must execute. Logical, not an HTTP request: the host
/// owns the `Client` and the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchRecords { sort: Vec<String> },
    FetchRecord { id: String },
    CreateRecord { payload: RecordPayload },
    UpdateRecord { id: String, payload: RecordPayload },
    DeleteRecord { id: String },
}

fn fetch_records() -> Command {
    Command::FetchRecords {
        sort: LIST_SORT.iter().map(|s| s.to_string()).collect(),
    }
}

fn fail(model: &mut Model, error: Error) -> Vec<Command> {
    let message = error.to_string();
    tracing::warn!(%message, "request failed");
    model.error = Some(message);
    Vec::new()
}

/// Apply one event to the model and return the commands it triggers.
pub fn update(model: &mut Model, msg: Msg) -> Vec<Command> {
    match msg {
        Msg::Tick(now) => {
            model.clock = now;
            Vec::new()
        }

        Msg::FetchRecords => {
            tracing::debug!("fetching record list");
            model.error = None;
            model.records.clear();
            vec![fetch_records()]
        }
        Msg::RecordsFetched(Ok(records)) => {
            model.records = records.into_iter().map(|r| (r.id.clone(), r)).collect();
            Vec::new()
        }
        Msg::RecordsFetched(Err(e)) => fail(model, e),

        Msg::EditRecord(id) => vec![Command::FetchRecord { id }],
        Msg::RecordFetched(Ok(record)) => {
            model.form.populate(&record);
            Vec::new()
        }
        Msg::RecordFetched(Err(e)) => fail(model, e),

        Msg::TitleEdited(title) => {
            model.form.title = title.clone();
            // Live preview of unsaved edits: a not-yet-created record has no
            // list entry to patch.
            if let Some(id) = &model.form.id {
                if let Some(record) = model.records.get_mut(id) {
                    record.title = Some(title);
                }
            }
            Vec::new()
        }
        Msg::DescriptionEdited(description) => {
            model.form.description = description.clone();
            if let Some(id) = &model.form.id {
                if let Some(record) = model.records.get_mut(id) {
                    record.description = Some(description);
                }
            }
            Vec::new()
        }

        Msg::FormSubmitted => {
            let payload = RecordPayload {
                title: model.form.title.clone(),
                description: model.form.description.clone(),
            };
            match model.form.id.clone() {
                None => {
                    tracing::debug!("submitting new record");
                    vec![Command::CreateRecord { payload }]
                }
                Some(id) => {
                    tracing::debug!(record = %id, "submitting record update");
                    vec![Command::UpdateRecord { id, payload }]
                }
            }
        }
        Msg::RecordSaved(Ok(_)) => {
            model.form.clear();
            vec![fetch_records()]
        }
        Msg::RecordSaved(Err(e)) => fail(model, e),

        Msg::DeleteRecord(id) => vec![Command::DeleteRecord { id }],
        Msg::RecordDeleted(Ok(deleted)) => {
            model.records.remove(&deleted.id);
            vec![fetch_records()]
        }
        Msg::RecordDeleted(Err(e)) => fail(model, e),
    }
}
