//! Generator trait and the function-pointer implementation used by most builtins.

use rand::RngCore;
use serde::Serialize;
use serde_json::Value;

use crate::GeneratorError;

/// Parameter shape of a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// `fake:{name}`
    Zero,
    /// `fake:{name:min,max}`
    Range,
}

impl Arity {
    /// Number of raw parameters this shape carries
    pub fn param_count(self) -> usize {
        match self {
            Self::Zero => 0,
            Self::Range => 2,
        }
    }
}

/// A value generator.
///
/// Implementations must be stateless apart from the RNG handed in, so one
/// registry can be shared by every materializer.
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn arity(&self) -> Arity;

    /// Check parameters without producing a value.
    ///
    /// Arity is already enforced by the registry; this only needs to look at
    /// parameter contents.
    fn validate(&self, _params: &[String]) -> Result<(), GeneratorError> {
        Ok(())
    }

    /// Produce one value.
    fn generate(&self, rng: &mut dyn RngCore, params: &[String]) -> Result<Value, GeneratorError>;
}

/// Catalog entry for listing
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorInfo {
    pub name: String,
    pub description: String,
    pub arity: Arity,
}

impl GeneratorInfo {
    pub fn of(generator: &dyn Generator) -> Self {
        Self {
            name: generator.name().to_string(),
            description: generator.description().to_string(),
            arity: generator.arity(),
        }
    }
}

type GenerateFn = fn(&mut dyn RngCore) -> Value;

/// Zero-argument generator backed by a plain function
pub struct FnGenerator {
    name: &'static str,
    description: &'static str,
    func: GenerateFn,
}

impl FnGenerator {
    pub const fn new(name: &'static str, description: &'static str, func: GenerateFn) -> Self {
        Self {
            name,
            description,
            func,
        }
    }
}

impl Generator for FnGenerator {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn arity(&self) -> Arity {
        Arity::Zero
    }

    fn generate(&self, rng: &mut dyn RngCore, _params: &[String]) -> Result<Value, GeneratorError> {
        Ok((self.func)(rng))
    }
}
