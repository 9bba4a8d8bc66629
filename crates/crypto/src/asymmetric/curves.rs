//! Named elliptic curves accepted by the ECDSA and ECGOST3410 descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

macro_rules! named_curves {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// SEC / CryptoPro name, e.g. `SecP256r1`.
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            /// Case-insensitive lookup by name.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|curve| curve.name().eq_ignore_ascii_case(name.trim()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $name {
            type Err = CryptoError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s).ok_or_else(|| CryptoError::invalid_argument("curve", format!("unknown curve '{s}'")))
            }
        }
    };
}

named_curves! {
    /// SEC 2 curves for ECDSA.
    EcdsaCurve {
        SecT113r1, SecT113r2, SecT131r2, SecT131r1, SecT163k1, SecT163r1, SecT163r2,
        SecT193r1, SecT193r2, SecT233k1, SecT233r1, SecT239k1, SecT283k1, SecT283r1,
        SecT409k1, SecT409r1, SecT571k1, SecT571r1, SecP112r1, SecP112r2, SecP128r1,
        SecP128r2, SecP160k1, SecP160r1, SecP160r2, SecP192k1, SecP192r1, SecP224k1,
        SecP224r1, SecP256k1, SecP256r1, SecP384r1, SecP521r1,
    }
}

named_curves! {
    /// CryptoPro curves for GOST R 34.10-2001.
    EcGost3410Curve {
        GostR3410x2001CryptoProA, GostR3410x2001CryptoProB, GostR3410x2001CryptoProC,
        GostR3410x2001CryptoProXchA, GostR3410x2001CryptoProXchB,
    }
}

impl Default for EcdsaCurve {
    fn default() -> Self {
        EcdsaCurve::SecP256r1
    }
}

impl Default for EcGost3410Curve {
    fn default() -> Self {
        EcGost3410Curve::GostR3410x2001CryptoProA
    }
}

impl EcdsaCurve {
    /// Whether key generation and signing can run on this curve.
    pub fn has_backend(self) -> bool {
        matches!(
            self,
            EcdsaCurve::SecP256r1 | EcdsaCurve::SecP384r1 | EcdsaCurve::SecP521r1 | EcdsaCurve::SecP256k1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_catalogs() {
        assert_eq!(EcdsaCurve::ALL.len(), 33);
        assert_eq!(EcGost3410Curve::ALL.len(), 5);
        assert_eq!(EcdsaCurve::ALL.iter().filter(|curve| curve.has_backend()).count(), 4);
    }

    #[test]
    fn test_names_round_trip() {
        for curve in EcdsaCurve::ALL {
            assert_eq!(EcdsaCurve::from_name(curve.name()), Some(*curve));
        }
        assert_eq!("secp384R1".parse::<EcdsaCurve>().unwrap(), EcdsaCurve::SecP384r1);
        assert_eq!(
            EcGost3410Curve::from_name("gostr3410x2001cryptoproxcha"),
            Some(EcGost3410Curve::GostR3410x2001CryptoProXchA)
        );
        assert!("P-256".parse::<EcdsaCurve>().is_err());
    }

    #[test]
    fn test_serde_uses_variant_names() {
        let json = serde_json::to_string(&EcdsaCurve::SecP256k1).unwrap();
        assert_eq!(json, "\"SecP256k1\"");
        let back: EcGost3410Curve = serde_json::from_str("\"GostR3410x2001CryptoProB\"").unwrap();
        assert_eq!(back, EcGost3410Curve::GostR3410x2001CryptoProB);
    }
}
