//! # Generators
//!
//! Name-keyed catalog of value generators.
//!
//! Two shapes exist:
//! - zero-argument generators (`fake:{email}`)
//! - ranged generators taking raw `[min, max]` strings (`fake:{number:1,100}`)
//!
//! The registry resolves a name, checks arity and hands the call to the
//! generator together with the caller's RNG.
//!
//! ```
//! use contracts::GeneratorCall;
//! use generators::GeneratorRegistry;
//! use rand::SeedableRng;
//!
//! let registry = GeneratorRegistry::with_builtins();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let value = registry
//!     .invoke(&GeneratorCall::ranged("number", "1", "10"), &mut rng)
//!     .unwrap();
//! assert!((1..=10).contains(&value.as_i64().unwrap()));
//! ```

pub mod builtins;
mod data;
mod error;
mod generator;
mod registry;

pub use error::GeneratorError;
pub use generator::{Arity, FnGenerator, Generator, GeneratorInfo};
pub use registry::GeneratorRegistry;
