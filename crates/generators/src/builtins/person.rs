//! Person generators.

use rand::RngCore;
use serde_json::Value;

use super::{digits, pick, Builtin};
use crate::data::{
    COMPANY_PREFIXES, COMPANY_SUFFIXES, EMAIL_DOMAINS, FIRST_NAMES, GENDERS, JOB_LEVELS,
    JOB_TITLES, LAST_NAMES,
};

pub(super) const GENERATORS: &[Builtin] = &[
    Builtin {
        name: "firstname",
        description: "Given name",
        func: firstname,
    },
    Builtin {
        name: "lastname",
        description: "Family name",
        func: lastname,
    },
    Builtin {
        name: "name",
        description: "Full name",
        func: name,
    },
    Builtin {
        name: "gender",
        description: "male or female",
        func: gender,
    },
    Builtin {
        name: "username",
        description: "Lowercase handle with digits",
        func: username,
    },
    Builtin {
        name: "email",
        description: "Email address on a reserved domain",
        func: email,
    },
    Builtin {
        name: "phone",
        description: "Ten digit phone number",
        func: phone,
    },
    Builtin {
        name: "company",
        description: "Company name",
        func: company,
    },
    Builtin {
        name: "jobtitle",
        description: "Job title",
        func: jobtitle,
    },
];

fn firstname(rng: &mut dyn RngCore) -> Value {
    pick(rng, FIRST_NAMES).into()
}

fn lastname(rng: &mut dyn RngCore) -> Value {
    pick(rng, LAST_NAMES).into()
}

fn name(rng: &mut dyn RngCore) -> Value {
    format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, LAST_NAMES)).into()
}

fn gender(rng: &mut dyn RngCore) -> Value {
    pick(rng, GENDERS).into()
}

fn username(rng: &mut dyn RngCore) -> Value {
    format!(
        "{}{}{}",
        pick(rng, FIRST_NAMES).to_lowercase(),
        pick(rng, LAST_NAMES).to_lowercase(),
        digits(rng, 3)
    )
    .into()
}

fn email(rng: &mut dyn RngCore) -> Value {
    format!(
        "{}.{}@{}",
        pick(rng, FIRST_NAMES).to_lowercase(),
        pick(rng, LAST_NAMES).to_lowercase(),
        pick(rng, EMAIL_DOMAINS)
    )
    .into()
}

fn phone(rng: &mut dyn RngCore) -> Value {
    digits(rng, 10).into()
}

fn company(rng: &mut dyn RngCore) -> Value {
    format!(
        "{} {}",
        pick(rng, COMPANY_PREFIXES),
        pick(rng, COMPANY_SUFFIXES)
    )
    .into()
}

fn jobtitle(rng: &mut dyn RngCore) -> Value {
    format!("{} {}", pick(rng, JOB_LEVELS), pick(rng, JOB_TITLES)).into()
}
