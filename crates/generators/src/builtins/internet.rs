//! Network-ish generators.

use rand::{Rng, RngCore};
use serde_json::Value;

use super::{pick, Builtin};
use crate::data::{TLDS, WORDS};

pub(super) const GENERATORS: &[Builtin] = &[
    Builtin {
        name: "url",
        description: "https URL",
        func: url,
    },
    Builtin {
        name: "ipv4address",
        description: "Dotted IPv4 address",
        func: ipv4address,
    },
];

fn url(rng: &mut dyn RngCore) -> Value {
    format!(
        "https://www.{}{}.{}/{}",
        pick(rng, WORDS),
        pick(rng, WORDS),
        pick(rng, TLDS),
        pick(rng, WORDS)
    )
    .into()
}

fn ipv4address(rng: &mut dyn RngCore) -> Value {
    let octets: [u8; 4] = rng.random();
    std::net::Ipv4Addr::from(octets).to_string().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_ipv4_parses() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let value = ipv4address(&mut rng);
            assert!(value
                .as_str()
                .unwrap()
                .parse::<std::net::Ipv4Addr>()
                .is_ok());
        }
    }

    #[test]
    fn test_url_scheme() {
        let mut rng = StdRng::seed_from_u64(6);
        assert!(url(&mut rng).as_str().unwrap().starts_with("https://www."));
    }
}
