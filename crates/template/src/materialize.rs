//! Materializer - one fresh record per call

use std::sync::Arc;

use contracts::FieldErrorPolicy;
use generators::GeneratorRegistry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::{Map, Value};
use tracing::debug;

use crate::{FieldError, Template, TemplateError, TemplateNode};

/// Turns a [`Template`] into records.
///
/// Owns the RNG; the template and registry are shared read-only. Every call
/// builds a new value tree, so records never alias each other or the template.
pub struct Materializer {
    registry: Arc<GeneratorRegistry>,
    policy: FieldErrorPolicy,
    rng: StdRng,
    fallbacks: u64,
}

impl Materializer {
    /// Materializer seeded from the OS
    pub fn new(registry: Arc<GeneratorRegistry>, policy: FieldErrorPolicy) -> Self {
        Self::with_rng(registry, policy, StdRng::from_os_rng())
    }

    /// Materializer with a caller-supplied RNG
    pub fn with_rng(registry: Arc<GeneratorRegistry>, policy: FieldErrorPolicy, rng: StdRng) -> Self {
        Self {
            registry,
            policy,
            rng,
            fallbacks: 0,
        }
    }

    pub fn policy(&self) -> FieldErrorPolicy {
        self.policy
    }

    /// Fields that took a fallback value so far
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }

    /// Produce one record.
    ///
    /// # Errors
    /// Only under [`FieldErrorPolicy::Abort`], for the first failing field.
    pub fn materialize(&mut self, template: &Template) -> Result<Value, TemplateError> {
        let mut path = Vec::new();
        let map = self.visit(template.fields(), &mut path)?;
        Ok(Value::Object(map))
    }

    fn visit<'t>(
        &mut self,
        fields: &'t [(String, TemplateNode)],
        path: &mut Vec<&'t str>,
    ) -> Result<Map<String, Value>, TemplateError> {
        let mut map = Map::new();
        for (key, node) in fields {
            path.push(key);
            let value = match node {
                TemplateNode::Object(children) => Value::Object(self.visit(children, path)?),
                TemplateNode::Scalar(value) => value.clone(),
                TemplateNode::Directive { raw, call } => {
                    match self.registry.invoke(call, &mut self.rng) {
                        Ok(value) => value,
                        Err(e) => self.fallback(path, raw, e.into())?,
                    }
                }
                TemplateNode::Malformed { raw, error } => {
                    self.fallback(path, raw, error.clone().into())?
                }
            };
            path.pop();
            map.insert(key.clone(), value);
        }
        Ok(map)
    }

    fn fallback(&mut self, path: &[&str], raw: &str, error: FieldError) -> Result<Value, TemplateError> {
        let value = match self.policy {
            FieldErrorPolicy::Null => Value::Null,
            FieldErrorPolicy::Literal => Value::String(raw.to_string()),
            FieldErrorPolicy::Abort => {
                return Err(TemplateError::Field {
                    path: path.join("."),
                    raw: raw.to_string(),
                    source: error,
                });
            }
        };

        self.fallbacks += 1;
        observability::record_field_fallback(error.kind());
        debug!(
            field = %path.join("."),
            directive = raw,
            error = %error,
            "Field fell back"
        );
        Ok(value)
    }
}
