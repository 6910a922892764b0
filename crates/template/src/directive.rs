//! `fake:{...}` directive tokenizer
//!
//! Grammar: `fake:{ name [ ":" min "," max ] }`. Text after the first `}` is ignored.

use contracts::GeneratorCall;

use crate::DirectiveError;

/// Every directive starts with this prefix
pub const DIRECTIVE_PREFIX: &str = "fake:{";

/// Generators that take a `min,max` range
pub const RANGED_GENERATORS: &[&str] = &[
    "number",
    "latituderange",
    "longituderange",
    "float32range",
    "float64range",
];

pub fn is_ranged(name: &str) -> bool {
    RANGED_GENERATORS.contains(&name)
}

/// Decode a template string.
///
/// Returns `Ok(None)` when the string is not a directive at all.
///
/// # Errors
/// A [`DirectiveError`] when the string opens the grammar but does not follow it.
pub fn parse_directive(raw: &str) -> Result<Option<GeneratorCall>, DirectiveError> {
    let Some(rest) = raw.strip_prefix(DIRECTIVE_PREFIX) else {
        return Ok(None);
    };
    let (body, _trailing) = rest.split_once('}').ok_or(DirectiveError::Unterminated)?;
    let body = body.trim();

    match body.split_once(':') {
        None => {
            let name = validate_name(body)?;
            if is_ranged(name) {
                return Err(DirectiveError::MissingRange {
                    name: name.to_string(),
                });
            }
            Ok(Some(GeneratorCall::new(name)))
        }
        Some((name, range)) => {
            let name = validate_name(name.trim())?;
            if !is_ranged(name) {
                return Err(DirectiveError::UnexpectedParams {
                    name: name.to_string(),
                });
            }
            let (min, max) = split_range(name, range)?;
            Ok(Some(GeneratorCall::ranged(name, min, max)))
        }
    }
}

fn validate_name(name: &str) -> Result<&str, DirectiveError> {
    if name.is_empty() {
        return Err(DirectiveError::EmptyName);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(DirectiveError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(name)
}

fn split_range<'a>(name: &str, range: &'a str) -> Result<(&'a str, &'a str), DirectiveError> {
    let bad = || DirectiveError::BadRange {
        name: name.to_string(),
        raw: range.to_string(),
    };
    let mut parts = range.split(',').map(str::trim);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(min), Some(max), None) if !min.is_empty() && !max.is_empty() => Ok((min, max)),
        _ => Err(bad()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> GeneratorCall {
        parse_directive(raw).unwrap().unwrap()
    }

    #[test]
    fn test_not_a_directive() {
        for raw in ["active", "", "fake:", "fake:email", "FAKE:{email}", " fake:{email}"] {
            assert_eq!(parse_directive(raw), Ok(None), "{raw:?}");
        }
    }

    #[test]
    fn test_zero_arg() {
        assert_eq!(parse("fake:{email}"), GeneratorCall::new("email"));
        assert_eq!(parse("fake:{  firstname }"), GeneratorCall::new("firstname"));
    }

    #[test]
    fn test_ranged() {
        assert_eq!(
            parse("fake:{number:1,100}"),
            GeneratorCall::ranged("number", "1", "100")
        );
        assert_eq!(
            parse("fake:{ latituderange : -10.5 , 20 }"),
            GeneratorCall::ranged("latituderange", "-10.5", "20")
        );
    }

    #[test]
    fn test_trailing_text_ignored() {
        assert_eq!(parse("fake:{city} and more"), GeneratorCall::new("city"));
        assert_eq!(
            parse("fake:{number:1,2}}"),
            GeneratorCall::ranged("number", "1", "2")
        );
    }

    #[test]
    fn test_unterminated() {
        assert_eq!(
            parse_directive("fake:{email"),
            Err(DirectiveError::Unterminated)
        );
    }

    #[test]
    fn test_empty_and_invalid_names() {
        assert_eq!(parse_directive("fake:{}"), Err(DirectiveError::EmptyName));
        assert_eq!(parse_directive("fake:{  }"), Err(DirectiveError::EmptyName));
        assert_eq!(parse_directive("fake:{:1,2}"), Err(DirectiveError::EmptyName));
        assert!(matches!(
            parse_directive("fake:{first name}"),
            Err(DirectiveError::InvalidName { .. })
        ));
        assert!(matches!(
            parse_directive("fake:{e-mail}"),
            Err(DirectiveError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_range_shape_errors() {
        assert!(matches!(
            parse_directive("fake:{number}"),
            Err(DirectiveError::MissingRange { .. })
        ));
        for raw in [
            "fake:{number:1}",
            "fake:{number:1,}",
            "fake:{number:,5}",
            "fake:{number:1,2,3}",
            "fake:{number:}",
        ] {
            assert!(
                matches!(parse_directive(raw), Err(DirectiveError::BadRange { .. })),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_params_on_zero_arg_name() {
        assert_eq!(
            parse_directive("fake:{email:1,2}"),
            Err(DirectiveError::UnexpectedParams {
                name: "email".into()
            })
        );
    }
}
