//! Builtin generator catalog.

mod internet;
mod location;
mod misc;
mod numeric;
mod person;

pub use numeric::{FloatPrecision, FloatRange, IntRange};

use rand::{Rng, RngCore};

use crate::{FnGenerator, GeneratorRegistry};

/// Register every builtin generator
pub fn register_all(registry: &mut GeneratorRegistry) {
    for generator in person::GENERATORS
        .iter()
        .chain(location::GENERATORS)
        .chain(internet::GENERATORS)
        .chain(misc::GENERATORS)
    {
        registry.register(FnGenerator::new(
            generator.name,
            generator.description,
            generator.func,
        ));
    }

    registry.register(IntRange::new("number", "Integer in [min, max]"));
    registry.register(FloatRange::new(
        "float32range",
        "32-bit float in [min, max]",
        FloatPrecision::F32,
        None,
    ));
    registry.register(FloatRange::new(
        "float64range",
        "64-bit float in [min, max]",
        FloatPrecision::F64,
        None,
    ));
    registry.register(FloatRange::new(
        "latituderange",
        "Latitude in [min, max], within [-90, 90]",
        FloatPrecision::F64,
        Some((-90.0, 90.0)),
    ));
    registry.register(FloatRange::new(
        "longituderange",
        "Longitude in [min, max], within [-180, 180]",
        FloatPrecision::F64,
        Some((-180.0, 180.0)),
    ));
}

/// Static description of a zero-argument builtin
pub(crate) struct Builtin {
    pub name: &'static str,
    pub description: &'static str,
    pub func: fn(&mut dyn RngCore) -> serde_json::Value,
}

/// Uniform pick from a non-empty pool
pub(crate) fn pick(rng: &mut dyn RngCore, pool: &'static [&'static str]) -> &'static str {
    pool[rng.random_range(0..pool.len())]
}

/// `count` random decimal digits
pub(crate) fn digits(rng: &mut dyn RngCore, count: usize) -> String {
    (0..count)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}
