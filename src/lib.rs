//! Outlay is a command-line expense tracker backed by SQLite.
//!
//! Users log in at a numbered-menu REPL, record expenses against
//! admin-managed categories and payment methods, and run aggregate reports
//! over the ledger. Non-admin users only ever see and mutate their own
//! expenses; admins see everything and own the reference data.
//!
//! This library exposes the stores, models, and REPL; the `outlay` binary
//! wires them to a database file.

#![warn(missing_docs)]

pub mod auth;
pub mod db;
mod error;
pub mod models;
pub mod repl;
pub mod stores;
pub mod transfer;

pub use error::Error;
