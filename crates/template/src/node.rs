//! Compiled template tree

use std::path::Path;

use contracts::GeneratorCall;
use generators::GeneratorRegistry;
use serde_json::Value;

use crate::directive::parse_directive;
use crate::{DirectiveError, FieldError, TemplateError};

/// One node of a compiled template.
///
/// Arrays are opaque scalars: directives inside them are never resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Nested object, fields in file order
    Object(Vec<(String, TemplateNode)>),
    /// Literal value copied into every record
    Scalar(Value),
    /// Resolved through the generator registry on every materialization
    Directive { raw: String, call: GeneratorCall },
    /// String that opens the directive grammar but does not follow it
    Malformed { raw: String, error: DirectiveError },
}

impl TemplateNode {
    fn compile(value: Value) -> Self {
        match value {
            Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::compile(value)))
                    .collect(),
            ),
            Value::String(raw) => match parse_directive(&raw) {
                Ok(Some(call)) => Self::Directive { raw, call },
                Ok(None) => Self::Scalar(Value::String(raw)),
                Err(error) => Self::Malformed { raw, error },
            },
            other => Self::Scalar(other),
        }
    }
}

/// A problem found while checking a template against a registry
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Dotted field path, e.g. `user.address.city`
    pub path: String,
    /// Original directive string
    pub raw: String,
    pub error: FieldError,
}

/// Immutable compiled template.
///
/// Built once per run; materialization only reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    fields: Vec<(String, TemplateNode)>,
}

impl Template {
    /// Compile a parsed JSON value; the root must be an object
    pub fn from_value(value: Value) -> Result<Self, TemplateError> {
        match TemplateNode::compile(value) {
            TemplateNode::Object(fields) => Ok(Self { fields }),
            TemplateNode::Scalar(other) => Err(TemplateError::NotAnObject {
                found: json_type_name(&other),
            }),
            TemplateNode::Directive { .. } | TemplateNode::Malformed { .. } => {
                Err(TemplateError::NotAnObject { found: "string" })
            }
        }
    }

    /// Parse and compile JSON text
    pub fn parse(text: &str) -> Result<Self, TemplateError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Read, parse and compile a template file
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let text = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Top-level fields in file order
    pub fn fields(&self) -> &[(String, TemplateNode)] {
        &self.fields
    }

    /// Number of directive leaves (well-formed or not)
    pub fn directive_count(&self) -> usize {
        fn count(fields: &[(String, TemplateNode)]) -> usize {
            fields
                .iter()
                .map(|(_, node)| match node {
                    TemplateNode::Object(children) => count(children),
                    TemplateNode::Directive { .. } | TemplateNode::Malformed { .. } => 1,
                    TemplateNode::Scalar(_) => 0,
                })
                .sum()
        }
        count(&self.fields)
    }

    /// Every directive that would fall back at materialization time
    ///
    /// Covers malformed directives, unknown generators, wrong arity and
    /// unusable parameters.
    pub fn check(&self, registry: &GeneratorRegistry) -> Vec<FieldIssue> {
        let mut issues = Vec::new();
        collect_issues(&self.fields, "", registry, &mut issues);
        issues
    }
}

fn collect_issues(
    fields: &[(String, TemplateNode)],
    prefix: &str,
    registry: &GeneratorRegistry,
    issues: &mut Vec<FieldIssue>,
) {
    for (key, node) in fields {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match node {
            TemplateNode::Object(children) => collect_issues(children, &path, registry, issues),
            TemplateNode::Directive { raw, call } => {
                if let Err(e) = registry.check(call) {
                    issues.push(FieldIssue {
                        path,
                        raw: raw.clone(),
                        error: e.into(),
                    });
                }
            }
            TemplateNode::Malformed { raw, error } => issues.push(FieldIssue {
                path,
                raw: raw.clone(),
                error: error.clone().into(),
            }),
            TemplateNode::Scalar(_) => {}
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
