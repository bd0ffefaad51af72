//! ERP Relabel - trigger relabeling for semantic-priming EEG sessions
//!
//! The recording hardware stamps only three generic codes: 10 at prime onset,
//! 20 at target onset and 30 at the behavioral response. This crate rewrites
//! them into condition-specific codes by walking the trigger stream alongside
//! the behavioral log: taxonomy lookup → trial cursor → label construction
//! under a session convention → restriction to observed codes → hand-off
//! encoding for the epoching stage.
//!
//! ## Modules
//!
//! - **Taxonomy**: label path ↔ code tables for both session conventions
//! - **Relabeler**: the single-pass trigger/trial state machine
//! - **Pipeline**: input parsing, log validation and payload encoding

pub mod config;
pub mod convention;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod relabeler;
pub mod schema;
pub mod taxonomy;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use config::{EpochingConfig, EpochingOverrides, RelabelConfig, UnmappedPolicy};
pub use convention::{Convention, LabelingConvention};
pub use encoder::{HandoffEncoder, FORMAT_VERSION};
pub use error::RelabelError;
pub use filter::{observed_codes, restrict};
pub use pipeline::{relabel_session_json, AlignmentReport, SessionProcessor};
pub use relabeler::{relabel, EventRelabeler, Relabeling};
pub use schema::{EventStreamAdapter, TrialLogAdapter, TrialRow};
pub use taxonomy::LabelTaxonomy;
pub use types::{HandoffPayload, TrialRecord, TriggerEvent};

/// Library version embedded in all hand-off payloads
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for hand-off payloads
pub const PRODUCER_NAME: &str = "erp-relabel";
