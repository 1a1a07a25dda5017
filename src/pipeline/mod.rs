//! Pipeline entry points for catalog operations.
//!
//! - `normalize` / `reconcile`: the pure record transformations
//! - `run_import`: normalize spreadsheet rows and bulk insert them
//! - `run_edit`: reconcile proposed edits and submit a partial update
//! - `run_list` / `fetch_many` / `run_add`: read side and manual add

pub mod browse;
pub mod coerce;
pub mod edit;
pub mod filter;
pub mod import;
pub mod normalize;
pub mod reconcile;

#[cfg(test)]
pub(crate) mod testing;

pub use browse::{fetch_many, run_add, run_list};
pub use edit::{EditOutcome, parse_assignments, run_edit};
pub use filter::NovelFilter;
pub use import::{ImportReport, read_rows, run_import};
pub use normalize::{normalize, normalize_all, normalize_rows};
pub use reconcile::{ChangeSet, NovelPatch, build_patch, compute_changes};
