//! Address and coordinate generators.

use rand::{Rng, RngCore};
use serde_json::{json, Value};

use super::{digits, pick, Builtin};
use crate::data::{CITIES, COUNTRIES, STATES, STREET_NAMES, STREET_SUFFIXES};

pub(super) const GENERATORS: &[Builtin] = &[
    Builtin {
        name: "street",
        description: "Street line with house number",
        func: street,
    },
    Builtin {
        name: "city",
        description: "City name",
        func: city,
    },
    Builtin {
        name: "state",
        description: "State name",
        func: state,
    },
    Builtin {
        name: "country",
        description: "Country name",
        func: country,
    },
    Builtin {
        name: "zip",
        description: "Five digit postal code",
        func: zip,
    },
    Builtin {
        name: "address",
        description: "Object with street, city, state, zip and country",
        func: address,
    },
    Builtin {
        name: "latitude",
        description: "Latitude in [-90, 90]",
        func: latitude,
    },
    Builtin {
        name: "longitude",
        description: "Longitude in [-180, 180]",
        func: longitude,
    },
];

fn street(rng: &mut dyn RngCore) -> Value {
    format!(
        "{} {} {}",
        rng.random_range(1..10_000u32),
        pick(rng, STREET_NAMES),
        pick(rng, STREET_SUFFIXES)
    )
    .into()
}

fn city(rng: &mut dyn RngCore) -> Value {
    pick(rng, CITIES).into()
}

fn state(rng: &mut dyn RngCore) -> Value {
    pick(rng, STATES).into()
}

fn country(rng: &mut dyn RngCore) -> Value {
    pick(rng, COUNTRIES).into()
}

fn zip(rng: &mut dyn RngCore) -> Value {
    digits(rng, 5).into()
}

fn address(rng: &mut dyn RngCore) -> Value {
    json!({
        "street": street(rng),
        "city": city(rng),
        "state": state(rng),
        "zip": zip(rng),
        "country": country(rng),
    })
}

fn latitude(rng: &mut dyn RngCore) -> Value {
    rng.random_range(-90.0..=90.0f64).into()
}

fn longitude(rng: &mut dyn RngCore) -> Value {
    rng.random_range(-180.0..=180.0f64).into()
}
