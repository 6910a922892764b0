//! `validate` command implementation.

use anyhow::{Context, Result};
use generators::GeneratorRegistry;
use serde::Serialize;
use template::Template;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    template_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    issues: Vec<IssueInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<TemplateSummary>,
}

#[derive(Serialize)]
struct IssueInfo {
    field: String,
    directive: String,
    kind: &'static str,
    error: String,
}

#[derive(Serialize)]
struct TemplateSummary {
    top_level_fields: usize,
    directives: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(template = %args.from.display(), "Validating template");

    let registry = GeneratorRegistry::with_builtins();
    let result = validate_template(args, &registry);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Template validation failed")
    }
}

fn validate_template(args: &ValidateArgs, registry: &GeneratorRegistry) -> ValidationResult {
    let template_path = args.from.display().to_string();

    let template = match Template::load(&args.from) {
        Ok(template) => template,
        Err(e) => {
            return ValidationResult {
                valid: false,
                template_path,
                error: Some(e.to_string()),
                issues: Vec::new(),
                summary: None,
            }
        }
    };

    let issues: Vec<IssueInfo> = template
        .check(registry)
        .into_iter()
        .map(|issue| IssueInfo {
            field: issue.path,
            directive: issue.raw,
            kind: issue.error.kind(),
            error: issue.error.to_string(),
        })
        .collect();

    ValidationResult {
        valid: issues.is_empty(),
        template_path,
        error: None,
        issues,
        summary: Some(TemplateSummary {
            top_level_fields: template.fields().len(),
            directives: template.directive_count(),
        }),
    }
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Template is valid: {}", result.template_path);
    } else {
        println!("✗ Template is invalid: {}", result.template_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }

    if let Some(ref summary) = result.summary {
        println!("\n  Top-level fields: {}", summary.top_level_fields);
        println!("  Directives: {}", summary.directives);
    }

    if !result.issues.is_empty() {
        println!("\n⚠ Fields that cannot be generated:");
        for issue in &result.issues {
            println!("  - {} ({}): {}", issue.field, issue.directive, issue.error);
        }
    }
}
