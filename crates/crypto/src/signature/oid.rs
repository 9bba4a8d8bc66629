//! Signature mechanism name to X.509 algorithm identifier.

use std::collections::HashMap;

use algoforge_core::normalize_keep_slash;
use const_oid::ObjectIdentifier;
use once_cell::sync::Lazy;

const fn oid(dotted: &str) -> ObjectIdentifier {
    ObjectIdentifier::new_unwrap(dotted)
}

const CVC_ECDSA: [(&str, ObjectIdentifier); 5] = [
    ("SHA1", oid("0.4.0.127.0.7.2.2.2.2.1")),
    ("SHA224", oid("0.4.0.127.0.7.2.2.2.2.2")),
    ("SHA256", oid("0.4.0.127.0.7.2.2.2.2.3")),
    ("SHA384", oid("0.4.0.127.0.7.2.2.2.2.4")),
    ("SHA512", oid("0.4.0.127.0.7.2.2.2.2.5")),
];

const PLAIN_ECDSA: [(&str, ObjectIdentifier); 6] = [
    ("RIPEMD160", oid("0.4.0.127.0.7.1.1.4.1.6")),
    ("SHA1", oid("0.4.0.127.0.7.1.1.4.1.1")),
    ("SHA224", oid("0.4.0.127.0.7.1.1.4.1.2")),
    ("SHA256", oid("0.4.0.127.0.7.1.1.4.1.3")),
    ("SHA384", oid("0.4.0.127.0.7.1.1.4.1.4")),
    ("SHA512", oid("0.4.0.127.0.7.1.1.4.1.5")),
];

const DSA: [(&str, ObjectIdentifier); 9] = [
    ("SHA1", oid("1.2.840.10040.4.3")),
    ("SHA224", oid("2.16.840.1.101.3.4.3.1")),
    ("SHA256", oid("2.16.840.1.101.3.4.3.2")),
    ("SHA384", oid("2.16.840.1.101.3.4.3.3")),
    ("SHA512", oid("2.16.840.1.101.3.4.3.4")),
    ("SHA3-224", oid("2.16.840.1.101.3.4.3.5")),
    ("SHA3-256", oid("2.16.840.1.101.3.4.3.6")),
    ("SHA3-384", oid("2.16.840.1.101.3.4.3.7")),
    ("SHA3-512", oid("2.16.840.1.101.3.4.3.8")),
];

const ECDSA: [(&str, ObjectIdentifier); 9] = [
    ("SHA1", oid("1.2.840.10045.4.1")),
    ("SHA224", oid("1.2.840.10045.4.3.1")),
    ("SHA256", oid("1.2.840.10045.4.3.2")),
    ("SHA384", oid("1.2.840.10045.4.3.3")),
    ("SHA512", oid("1.2.840.10045.4.3.4")),
    ("SHA3-224", oid("2.16.840.1.101.3.4.3.9")),
    ("SHA3-256", oid("2.16.840.1.101.3.4.3.10")),
    ("SHA3-384", oid("2.16.840.1.101.3.4.3.11")),
    ("SHA3-512", oid("2.16.840.1.101.3.4.3.12")),
];

const RSA: [(&str, ObjectIdentifier); 14] = [
    ("MD2", oid("1.2.840.113549.1.1.2")),
    ("MD5", oid("1.2.840.113549.1.1.4")),
    ("RIPEMD128", oid("1.3.36.3.3.1.3")),
    ("RIPEMD160", oid("1.3.36.3.3.1.2")),
    ("RIPEMD256", oid("1.3.36.3.3.1.4")),
    ("SHA1", oid("1.2.840.113549.1.1.5")),
    ("SHA224", oid("1.2.840.113549.1.1.14")),
    ("SHA256", oid("1.2.840.113549.1.1.11")),
    ("SHA384", oid("1.2.840.113549.1.1.12")),
    ("SHA512", oid("1.2.840.113549.1.1.13")),
    ("SHA3-224", oid("2.16.840.1.101.3.4.3.13")),
    ("SHA3-256", oid("2.16.840.1.101.3.4.3.14")),
    ("SHA3-384", oid("2.16.840.1.101.3.4.3.15")),
    ("SHA3-512", oid("2.16.840.1.101.3.4.3.16")),
];

const SM2: [(&str, ObjectIdentifier); 2] = [
    ("SHA256", oid("1.2.156.10197.1.503")),
    ("SM3", oid("1.2.156.10197.1.501")),
];

const ECGOST3410: ObjectIdentifier = oid("1.2.643.2.2.3");
const GOST3410: ObjectIdentifier = oid("1.2.643.2.2.4");
const RSASSA_PSS: ObjectIdentifier = oid("1.2.840.113549.1.1.10");

const ECGOST3410_NAMES: [&str; 4] = ["ECGOST3410", "ECGOST3410-2001", "ECGOST-3410", "ECGOST-3410-2001"];
const GOST3410_NAMES: [&str; 4] = ["GOST3410", "GOST3410-94", "GOST-3410", "GOST-3410-94"];

/// Hyphenated spellings accepted for a hash prefix, e.g. `SHA-256` and
/// `SHA-3-256` next to `SHA256` and `SHA3-256`.
pub(super) fn hash_prefix_spellings(prefix: &str) -> Vec<String> {
    let mut spellings = vec![prefix.to_string()];
    if let Some(rest) = prefix.strip_prefix("SHA3-") {
        spellings.push(format!("SHA-3-{rest}"));
    } else if let Some(rest) = prefix.strip_prefix("SHA") {
        spellings.push(format!("SHA-{rest}"));
    } else if let Some(rest) = prefix.strip_prefix("RIPEMD") {
        spellings.push(format!("RIPEMD-{rest}"));
    }
    spellings
}

static OID_TABLE: Lazy<HashMap<String, ObjectIdentifier>> = Lazy::new(|| {
    let families: [(&str, &[(&str, ObjectIdentifier)]); 6] = [
        ("CVC-ECDSA", &CVC_ECDSA),
        ("PLAIN-ECDSA", &PLAIN_ECDSA),
        ("DSA", &DSA),
        ("ECDSA", &ECDSA),
        ("RSA", &RSA),
        ("SM2", &SM2),
    ];
    let mut table = HashMap::new();
    for (suffix, entries) in families {
        for (prefix, value) in entries {
            for spelling in hash_prefix_spellings(prefix) {
                table.insert(format!("{spelling}WITH{suffix}"), *value);
            }
        }
    }
    for name in ECGOST3410_NAMES {
        table.insert(name.to_string(), ECGOST3410);
        table.insert(format!("GOST3411WITH{name}"), ECGOST3410);
    }
    for name in GOST3410_NAMES {
        table.insert(name.to_string(), GOST3410);
        table.insert(format!("GOST3411WITH{name}"), GOST3410);
    }
    for name in ["PSSWITHRSA", "SHA1WITHRSAANDMGF1", "SHA-1WITHRSAANDMGF1"] {
        table.insert(name.to_string(), RSASSA_PSS);
    }
    table
});

/// Map a signature mechanism such as `"SHA256withECDSA"` or
/// `"sha-256WithRSA"` to its algorithm identifier.
///
/// Edwards-curve schemes and unknown names map to `None`.
pub fn mechanism_to_oid(mechanism: &str) -> Option<ObjectIdentifier> {
    OID_TABLE.get(&normalize_keep_slash(mechanism)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dotted(name: &str) -> Option<String> {
        mechanism_to_oid(name).map(|oid| oid.to_string())
    }

    #[test]
    fn test_well_known_identifiers() {
        assert_eq!(dotted("SHA256withECDSA").as_deref(), Some("1.2.840.10045.4.3.2"));
        assert_eq!(dotted("sha256WithRSA").as_deref(), Some("1.2.840.113549.1.1.11"));
        assert_eq!(dotted("SHA1withDSA").as_deref(), Some("1.2.840.10040.4.3"));
        assert_eq!(dotted("SHA3-512withRSA").as_deref(), Some("2.16.840.1.101.3.4.3.16"));
        assert_eq!(dotted("SM3withSM2").as_deref(), Some("1.2.156.10197.1.501"));
        assert_eq!(dotted("RIPEMD160withPLAIN-ECDSA").as_deref(), Some("0.4.0.127.0.7.1.1.4.1.6"));
    }

    #[test]
    fn test_hyphenated_spellings() {
        assert_eq!(dotted("SHA-256withECDSA"), dotted("SHA256withECDSA"));
        assert_eq!(dotted("sha-3-256withDSA"), dotted("SHA3-256withDSA"));
        assert_eq!(dotted("RIPEMD-128withRSA").as_deref(), Some("1.3.36.3.3.1.3"));
        assert_eq!(dotted("sha-1withRSAandMGF1").as_deref(), Some("1.2.840.113549.1.1.10"));
        assert_eq!(dotted("PSSwithRSA"), dotted("SHA1withRSAandMGF1"));
    }

    #[test]
    fn test_gost_names() {
        for name in ["GOST3411withECGOST3410", "ECGOST3410-2001", "ecgost-3410"] {
            assert_eq!(dotted(name).as_deref(), Some("1.2.643.2.2.3"), "{name}");
        }
        for name in ["GOST3411withGOST3410", "GOST-3410-94", "gost3410"] {
            assert_eq!(dotted(name).as_deref(), Some("1.2.643.2.2.4"), "{name}");
        }
    }

    #[test]
    fn test_unmapped_names() {
        for name in ["Ed25519", "Ed448ph", "SHA256withRSAandMGF1", "SHA256withECNR", "SHA256withRSA/X9.31", ""] {
            assert_eq!(mechanism_to_oid(name), None, "{name}");
        }
    }
}
