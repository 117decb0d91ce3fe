//! Audit logging
//!
//! Records every create, update and delete of a bank account or budget item
//! with before/after snapshots in an append-only JSONL file.
//!
//! - `AuditEntry`: one operation on one entity, tagged with its `Origin`
//! - `AuditLogger`: appends entries to `audit.log` and reads them back
//! - `generate_diff`: field-level change summary used for updates

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation, Origin};
pub use logger::AuditLogger;
