//! Configuration-driven descriptor resolution

use algoforge_core::{AsymmetricDefaults, Config};
use algoforge_crypto::{AsymmetricAlgorithm, EcdsaCurve};

use crate::test_utils::init_tracing;

const CONFIG: &str = r#"
[logging]
level = "debug"
json = false

[asymmetric]
rsa_key_size = 3072
ecdsa_curve = "SecP384r1"
"#;

#[test]
fn test_configured_defaults_from_toml() {
    init_tracing();
    let config: Config = toml::from_str(CONFIG).unwrap();
    config.asymmetric.validate().unwrap();
    assert_eq!(config.asymmetric.dsa_key_size, 1024);

    tracing::info!("resolving RSA with configured parameters");
    let rsa = AsymmetricAlgorithm::configured("rsa", &config.asymmetric).unwrap().unwrap();
    assert_eq!(
        rsa,
        AsymmetricAlgorithm::rsa_with_exponent(3072, 25, 65537)
    );

    let ecdsa = AsymmetricAlgorithm::configured("ECDSA", &config.asymmetric).unwrap().unwrap();
    assert_eq!(ecdsa, AsymmetricAlgorithm::ecdsa_with(EcdsaCurve::SecP384r1));
    let pair = ecdsa.generate_key_pair().unwrap();
    assert_eq!(pair.public_key().to_bytes().len(), 49);
}

#[test]
fn test_config_from_file() {
    init_tracing();
    let path = std::env::temp_dir().join(format!("algoforge-config-{}.toml", std::process::id()));
    std::fs::write(&path, CONFIG).unwrap();
    let config = Config::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.asymmetric.rsa_key_size, 3072);
}

#[test]
fn test_invalid_defaults_rejected() {
    init_tracing();
    let defaults = AsymmetricDefaults {
        rsa_public_exponent: 65536,
        ..AsymmetricDefaults::default()
    };
    assert!(defaults.validate().is_err());

    let bad_curve = AsymmetricDefaults {
        ecdsa_curve: "NotACurve".to_string(),
        ..AsymmetricDefaults::default()
    };
    assert!(AsymmetricAlgorithm::configured("ECDSA", &bad_curve).is_err());
    assert!(AsymmetricAlgorithm::configured("X25519", &AsymmetricDefaults::default())
        .unwrap()
        .is_none());
}
