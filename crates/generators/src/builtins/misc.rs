//! Identifiers, dates, words and other scalars.

use chrono::{DateTime, Datelike, SecondsFormat};
use rand::{Rng, RngCore};
use serde_json::Value;

use super::{pick, Builtin};
use crate::data::{COLORS, MONTHS, WORDS};

pub(super) const GENERATORS: &[Builtin] = &[
    Builtin {
        name: "uuid",
        description: "Random (v4) UUID",
        func: uuid,
    },
    Builtin {
        name: "bool",
        description: "true or false",
        func: boolean,
    },
    Builtin {
        name: "date",
        description: "RFC 3339 timestamp between 1970 and 2037",
        func: date,
    },
    Builtin {
        name: "year",
        description: "Year between 1970 and 2037",
        func: year,
    },
    Builtin {
        name: "month",
        description: "Month name",
        func: month,
    },
    Builtin {
        name: "word",
        description: "Single lowercase word",
        func: word,
    },
    Builtin {
        name: "sentence",
        description: "Capitalized sentence of 4 to 10 words",
        func: sentence,
    },
    Builtin {
        name: "color",
        description: "Color name",
        func: color,
    },
    Builtin {
        name: "price",
        description: "Price in [1, 1000] with two decimals",
        func: price,
    },
];

// 2038-01-19T03:14:07Z
const MAX_TIMESTAMP: i64 = i32::MAX as i64;

fn uuid(rng: &mut dyn RngCore) -> Value {
    let bytes: [u8; 16] = rng.random();
    ::uuid::Builder::from_random_bytes(bytes)
        .into_uuid()
        .to_string()
        .into()
}

fn boolean(rng: &mut dyn RngCore) -> Value {
    rng.random_bool(0.5).into()
}

fn random_datetime(rng: &mut dyn RngCore) -> Option<DateTime<chrono::Utc>> {
    DateTime::from_timestamp(rng.random_range(0..MAX_TIMESTAMP), 0)
}

fn date(rng: &mut dyn RngCore) -> Value {
    random_datetime(rng)
        .map(|dt| Value::from(dt.to_rfc3339_opts(SecondsFormat::Secs, true)))
        .unwrap_or(Value::Null)
}

fn year(rng: &mut dyn RngCore) -> Value {
    random_datetime(rng)
        .map(|dt| Value::from(dt.year()))
        .unwrap_or(Value::Null)
}

fn month(rng: &mut dyn RngCore) -> Value {
    pick(rng, MONTHS).into()
}

fn word(rng: &mut dyn RngCore) -> Value {
    pick(rng, WORDS).into()
}

fn sentence(rng: &mut dyn RngCore) -> Value {
    let count = rng.random_range(4..=10);
    let mut words: Vec<String> = (0..count).map(|_| pick(rng, WORDS).to_string()).collect();
    if let Some(first) = words.first_mut() {
        let mut chars = first.chars();
        if let Some(c) = chars.next() {
            *first = c.to_uppercase().chain(chars).collect();
        }
    }
    format!("{}.", words.join(" ")).into()
}

fn color(rng: &mut dyn RngCore) -> Value {
    pick(rng, COLORS).into()
}

fn price(rng: &mut dyn RngCore) -> Value {
    let cents = rng.random_range(100..=100_000u64);
    (cents as f64 / 100.0).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_uuid_is_v4() {
        let mut rng = StdRng::seed_from_u64(21);
        let value = uuid(&mut rng);
        let parsed = ::uuid::Uuid::parse_str(value.as_str().unwrap()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_date_parses_back() {
        let mut rng = StdRng::seed_from_u64(22);
        let value = date(&mut rng);
        assert!(DateTime::parse_from_rfc3339(value.as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_sentence_shape() {
        let mut rng = StdRng::seed_from_u64(23);
        let value = sentence(&mut rng);
        let text = value.as_str().unwrap();
        assert!(text.ends_with('.'));
        assert!(text.chars().next().unwrap().is_uppercase());
        let words = text.split_whitespace().count();
        assert!((4..=10).contains(&words));
    }
}
