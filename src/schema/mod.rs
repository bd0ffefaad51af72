//! Input schemas
//!
//! Readers for the two session inputs: the trigger stream exported from the
//! recording and the behavioral log written by the experiment software.
//! Log rows are read loosely and validated into typed trial records.

mod adapter;
mod trial_row;

pub use adapter::*;
pub use trial_row::*;
