//! # Contracts
//!
//! Shared interface contracts between the generation crates.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Record Model
//! - A record is one materialized JSON object, serialized once by the emitter
//! - `seq` is the zero-based emission index, used for ordering/diagnostics

mod blueprint;
mod call;
mod error;
mod record;
mod sink;

pub use blueprint::*;
pub use call::GeneratorCall;
pub use error::*;
pub use record::EncodedRecord;
pub use sink::*;
