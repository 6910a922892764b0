//! Command implementations.

mod create;
mod generators;
mod validate;

pub use create::run_create;
pub use generators::run_generators;
pub use validate::run_validate;
