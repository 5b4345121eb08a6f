//! Form/list state machine over the document-store client.
//!
//! # Overview
//! Owns the single UI state value — a record form plus the fetched record
//! collection — and reacts to discrete, serialized events: timer ticks, user
//! edits, and HTTP completions. Pure state machine in the same host-does-IO
//! shape as `basin_core`: [`update`] consumes a [`Msg`], mutates the
//! [`Model`], and returns [`Command`] effect descriptors for the host to
//! execute.
//!
//! # Design
//! - Single-threaded, event-driven: no locking, no in-flight bookkeeping;
//!   overlapping requests resolve as "last response processed wins".
//! - Failures surface as one optional human-readable message on the model;
//!   nothing is retried.
//! - Deletion removes a record locally only after server confirmation.

pub mod model;
pub mod update;

pub use model::{FormModel, Model};
pub use update::{update, Command, Msg};
