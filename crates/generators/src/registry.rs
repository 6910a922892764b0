//! GeneratorRegistry - name-keyed generator catalog

use std::collections::HashMap;
use std::sync::Arc;

use contracts::GeneratorCall;
use rand::RngCore;
use serde_json::Value;

use crate::{builtins, Generator, GeneratorError, GeneratorInfo};

/// Static catalog resolving generator names to generators.
///
/// Built once at startup and shared read-only (`Arc<GeneratorRegistry>`).
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    generators: HashMap<String, Arc<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the builtin catalog
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Register a generator, returning the one it replaced (if any)
    pub fn register<G: Generator + 'static>(&mut self, generator: G) -> Option<Arc<dyn Generator>> {
        self.generators
            .insert(generator.name().to_string(), Arc::new(generator))
    }

    pub fn len(&self) -> usize {
        self.generators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.generators.contains_key(name)
    }

    /// Resolve a name
    ///
    /// # Errors
    /// `GeneratorError::NotFound` when nothing is registered under `name`
    pub fn resolve(&self, name: &str) -> Result<&Arc<dyn Generator>, GeneratorError> {
        self.generators
            .get(name)
            .ok_or_else(|| GeneratorError::not_found(name))
    }

    /// Resolve and check arity and parameters without generating
    pub fn check(&self, call: &GeneratorCall) -> Result<(), GeneratorError> {
        let generator = self.resolve_for(call)?;
        generator.validate(call.params())
    }

    /// Resolve and invoke
    pub fn invoke(
        &self,
        call: &GeneratorCall,
        rng: &mut dyn RngCore,
    ) -> Result<Value, GeneratorError> {
        let generator = self.resolve_for(call)?;
        generator.generate(rng, call.params())
    }

    /// Catalog entries sorted by name
    pub fn catalog(&self) -> Vec<GeneratorInfo> {
        let mut entries: Vec<_> = self
            .generators
            .values()
            .map(|g| GeneratorInfo::of(g.as_ref()))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    fn resolve_for(&self, call: &GeneratorCall) -> Result<&Arc<dyn Generator>, GeneratorError> {
        let generator = self.resolve(call.name())?;
        let expected = generator.arity().param_count();
        if call.params().len() != expected {
            return Err(GeneratorError::Arity {
                name: call.name().to_string(),
                expected,
                actual: call.params().len(),
            });
        }
        Ok(generator)
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.generators.keys().collect();
        names.sort();
        f.debug_struct("GeneratorRegistry")
            .field("generators", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Arity, FnGenerator};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_unknown_name() {
        let registry = GeneratorRegistry::with_builtins();
        let err = registry
            .invoke(&GeneratorCall::new("nosuchthing"), &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert_eq!(err, GeneratorError::not_found("nosuchthing"));
        assert_eq!(err.kind(), "unknown_generator");
    }

    #[test]
    fn test_arity_mismatch() {
        let registry = GeneratorRegistry::with_builtins();
        let err = registry.check(&GeneratorCall::ranged("email", "1", "2")).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::Arity {
                expected: 0,
                actual: 2,
                ..
            }
        ));

        let err = registry.check(&GeneratorCall::new("number")).unwrap_err();
        assert!(matches!(err, GeneratorError::Arity { expected: 2, .. }));
    }

    #[test]
    fn test_register_custom_and_replace() {
        let mut registry = GeneratorRegistry::new();
        assert!(registry.is_empty());

        let first = registry.register(FnGenerator::new("answer", "always 42", |_| 42.into()));
        assert!(first.is_none());
        let replaced = registry.register(FnGenerator::new("answer", "always 43", |_| 43.into()));
        assert!(replaced.is_some());

        let value = registry
            .invoke(&GeneratorCall::new("answer"), &mut StdRng::seed_from_u64(0))
            .unwrap();
        assert_eq!(value, Value::from(43));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_catalog_sorted_and_complete() {
        let registry = GeneratorRegistry::with_builtins();
        let catalog = registry.catalog();
        assert_eq!(catalog.len(), registry.len());
        assert!(catalog.windows(2).all(|w| w[0].name < w[1].name));

        let ranged: Vec<_> = catalog
            .iter()
            .filter(|info| info.arity == Arity::Range)
            .map(|info| info.name.as_str())
            .collect();
        assert_eq!(
            ranged,
            vec![
                "float32range",
                "float64range",
                "latituderange",
                "longituderange",
                "number"
            ]
        );
    }

    #[test]
    fn test_every_zero_arg_builtin_generates() {
        let registry = GeneratorRegistry::with_builtins();
        let mut rng = StdRng::seed_from_u64(99);
        for info in registry.catalog() {
            if info.arity != Arity::Zero {
                continue;
            }
            let value = registry
                .invoke(&GeneratorCall::new(info.name.clone()), &mut rng)
                .unwrap();
            assert!(!value.is_null(), "{} produced null", info.name);
        }
    }

    #[test]
    fn test_overflowing_float_range_is_an_error_not_a_panic() {
        let registry = GeneratorRegistry::with_builtins();
        let mut rng = StdRng::seed_from_u64(1);
        for call in [
            GeneratorCall::ranged("float64range", "-1e308", "1e308"),
            GeneratorCall::ranged("float32range", "-3e38", "3e38"),
        ] {
            assert!(registry.check(&call).is_err(), "{call} accepted");
            assert!(registry.invoke(&call, &mut rng).is_err(), "{call} generated");
        }
    }
}
