//! Ranged numeric generators.

use std::str::FromStr;

use rand::distr::{Distribution, Uniform};
use rand::{Rng, RngCore};
use serde_json::Value;

use crate::{Arity, Generator, GeneratorError};

fn parse_bound<T: FromStr>(name: &str, which: &str, raw: &str) -> Result<T, GeneratorError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| GeneratorError::invalid_param(name, which, format!("'{raw}': {e}")))
}

fn split_params<'a>(name: &str, params: &'a [String]) -> Result<(&'a str, &'a str), GeneratorError> {
    match params {
        [min, max] => Ok((min.as_str(), max.as_str())),
        _ => Err(GeneratorError::Arity {
            name: name.to_string(),
            expected: 2,
            actual: params.len(),
        }),
    }
}

/// Integer in the inclusive range `[min, max]`
pub struct IntRange {
    name: &'static str,
    description: &'static str,
}

impl IntRange {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }

    fn bounds(&self, params: &[String]) -> Result<(i64, i64), GeneratorError> {
        let (raw_min, raw_max) = split_params(self.name, params)?;
        let min: i64 = parse_bound(self.name, "min", raw_min)?;
        let max: i64 = parse_bound(self.name, "max", raw_max)?;
        if min > max {
            return Err(GeneratorError::invalid_range(
                self.name,
                raw_min,
                raw_max,
                "min must be <= max",
            ));
        }
        Ok((min, max))
    }
}

impl Generator for IntRange {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn arity(&self) -> Arity {
        Arity::Range
    }

    fn validate(&self, params: &[String]) -> Result<(), GeneratorError> {
        self.bounds(params).map(|_| ())
    }

    fn generate(&self, rng: &mut dyn RngCore, params: &[String]) -> Result<Value, GeneratorError> {
        let (min, max) = self.bounds(params)?;
        Ok(rng.random_range(min..=max).into())
    }
}

/// Output width of a [`FloatRange`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatPrecision {
    F32,
    F64,
}

/// Float in the inclusive range `[min, max]`, optionally clamped to fixed limits
pub struct FloatRange {
    name: &'static str,
    description: &'static str,
    precision: FloatPrecision,
    limits: Option<(f64, f64)>,
}

impl FloatRange {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        precision: FloatPrecision,
        limits: Option<(f64, f64)>,
    ) -> Self {
        Self {
            name,
            description,
            precision,
            limits,
        }
    }

    fn bounds(&self, params: &[String]) -> Result<(f64, f64), GeneratorError> {
        let (raw_min, raw_max) = split_params(self.name, params)?;
        let (min, max) = match self.precision {
            FloatPrecision::F32 => (
                parse_bound::<f32>(self.name, "min", raw_min)? as f64,
                parse_bound::<f32>(self.name, "max", raw_max)? as f64,
            ),
            FloatPrecision::F64 => (
                parse_bound::<f64>(self.name, "min", raw_min)?,
                parse_bound::<f64>(self.name, "max", raw_max)?,
            ),
        };

        let invalid = |message: String| {
            GeneratorError::invalid_range(self.name, raw_min, raw_max, message)
        };

        if !min.is_finite() || !max.is_finite() {
            return Err(invalid("bounds must be finite".to_string()));
        }
        if min > max {
            return Err(invalid("min must be <= max".to_string()));
        }
        // the sampler scales by span / (1 - EPSILON) in the target width
        let span_finite = match self.precision {
            FloatPrecision::F32 => ((max as f32 - min as f32) / (1.0 - f32::EPSILON)).is_finite(),
            FloatPrecision::F64 => ((max - min) / (1.0 - f64::EPSILON)).is_finite(),
        };
        if !span_finite {
            return Err(invalid("max - min overflows".to_string()));
        }
        if let Some((low, high)) = self.limits {
            if min < low || max > high {
                return Err(invalid(format!("bounds must lie within [{low}, {high}]")));
            }
        }
        Ok((min, max))
    }
}

impl Generator for FloatRange {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn arity(&self) -> Arity {
        Arity::Range
    }

    fn validate(&self, params: &[String]) -> Result<(), GeneratorError> {
        self.bounds(params).map(|_| ())
    }

    fn generate(&self, rng: &mut dyn RngCore, params: &[String]) -> Result<Value, GeneratorError> {
        let (min, max) = self.bounds(params)?;
        let value = match self.precision {
            FloatPrecision::F32 => {
                let sampled = Uniform::new_inclusive(min as f32, max as f32)
                    .map_err(|e| GeneratorError::failed(self.name, e.to_string()))?
                    .sample(rng);
                // shortest f32 representation, widened without binary noise
                sampled
                    .to_string()
                    .parse::<f64>()
                    .map_err(|e| GeneratorError::failed(self.name, e.to_string()))?
            }
            FloatPrecision::F64 => Uniform::new_inclusive(min, max)
                .map_err(|e| GeneratorError::failed(self.name, e.to_string()))?
                .sample(rng),
        };
        Ok(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn params(min: &str, max: &str) -> Vec<String> {
        vec![min.to_string(), max.to_string()]
    }

    #[test]
    fn test_int_range_inclusive() {
        let generator = IntRange::new("number", "");
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..2000 {
            let v = generator
                .generate(&mut rng, &params("1", "5"))
                .unwrap()
                .as_i64()
                .unwrap();
            assert!((1..=5).contains(&v));
            seen_min |= v == 1;
            seen_max |= v == 5;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_int_range_accepts_padded_and_negative() {
        let generator = IntRange::new("number", "");
        let mut rng = StdRng::seed_from_u64(1);
        let v = generator
            .generate(&mut rng, &params(" -3", "-3 "))
            .unwrap();
        assert_eq!(v, Value::from(-3));
    }

    #[test]
    fn test_int_range_rejects_bad_bounds() {
        let generator = IntRange::new("number", "");
        assert!(matches!(
            generator.validate(&params("10", "1")),
            Err(GeneratorError::InvalidRange { .. })
        ));
        assert!(matches!(
            generator.validate(&params("one", "10")),
            Err(GeneratorError::InvalidParam { .. })
        ));
        assert!(matches!(
            generator.validate(&params("1.5", "10")),
            Err(GeneratorError::InvalidParam { .. })
        ));
    }

    #[test]
    fn test_latitude_limits() {
        let generator =
            FloatRange::new("latituderange", "", FloatPrecision::F64, Some((-90.0, 90.0)));
        assert!(generator.validate(&params("-10", "45.5")).is_ok());
        assert!(matches!(
            generator.validate(&params("-91", "0")),
            Err(GeneratorError::InvalidRange { .. })
        ));

        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..500 {
            let v = generator
                .generate(&mut rng, &params("-10", "45.5"))
                .unwrap()
                .as_f64()
                .unwrap();
            assert!((-10.0..=45.5).contains(&v));
        }
    }

    #[test]
    fn test_float32_has_short_representation() {
        let generator = FloatRange::new("float32range", "", FloatPrecision::F32, None);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let v = generator
                .generate(&mut rng, &params("0", "1"))
                .unwrap()
                .as_f64()
                .unwrap();
            assert!((0.0..=1.0).contains(&v));
            assert_eq!((v as f32).to_string().parse::<f64>().unwrap(), v);
        }
    }

    #[test]
    fn test_float_rejects_non_finite() {
        let generator = FloatRange::new("float64range", "", FloatPrecision::F64, None);
        assert!(generator.validate(&params("NaN", "1")).is_err());
        assert!(generator.validate(&params("0", "inf")).is_err());
    }

    #[test]
    fn test_float_rejects_overflowing_span() {
        let mut rng = StdRng::seed_from_u64(3);

        let wide64 = FloatRange::new("float64range", "", FloatPrecision::F64, None);
        let err = wide64.validate(&params("-1e308", "1e308")).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRange { .. }), "got {err:?}");
        assert!(wide64.generate(&mut rng, &params("-1e308", "1e308")).is_err());
        assert!(wide64.generate(&mut rng, &params("-1e307", "1e307")).is_ok());

        let wide32 = FloatRange::new("float32range", "", FloatPrecision::F32, None);
        let err = wide32.validate(&params("-3.4e38", "3.4e38")).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidRange { .. }), "got {err:?}");
        assert!(wide32.generate(&mut rng, &params("-3.4e38", "3.4e38")).is_err());
        // same bounds fit in f64
        assert!(wide64.validate(&params("-3.4e38", "3.4e38")).is_ok());
    }
}
