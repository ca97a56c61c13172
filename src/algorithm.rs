//! Supported PBE algorithms and the cipher suites they resolve to.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    crypto::{
        AES_BLOCK_SIZE, DEFAULT_IV_SIZE, DigestAlgorithm, KEY_SIZE_128, KEY_SIZE_256,
        OpenSslParameterGenerator, ParameterGenerator, Pkcs12ParameterGenerator,
    },
    error::PbeError,
};

/// The closed set of algorithms this crate speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Algorithm {
    /// `PBEWITHSHA256AND256BITAES-CBC`
    Sha256Aes256Cbc,
    /// `PBEWITHSHA256AND128BITAES-CBC`
    Sha256Aes128Cbc,
    /// `PBEWITHMD5AND128BITAES-CBC-OPENSSL`
    Md5Aes128CbcOpenSsl,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Sha256Aes256Cbc,
        Algorithm::Sha256Aes128Cbc,
        Algorithm::Md5Aes128CbcOpenSsl,
    ];

    /// Name as registered by Jasypt / the JCE provider.
    pub fn jasypt_name(self) -> &'static str {
        match self {
            Algorithm::Sha256Aes256Cbc => "PBEWITHSHA256AND256BITAES-CBC",
            Algorithm::Sha256Aes128Cbc => "PBEWITHSHA256AND128BITAES-CBC",
            Algorithm::Md5Aes128CbcOpenSsl => "PBEWITHMD5AND128BITAES-CBC-OPENSSL",
        }
    }

    /// Short descriptive name.
    pub fn short_name(self) -> &'static str {
        match self {
            Algorithm::Sha256Aes256Cbc => "SHA256-256BIT-AES-CBC",
            Algorithm::Sha256Aes128Cbc => "SHA256-128BIT-AES-CBC",
            Algorithm::Md5Aes128CbcOpenSsl => "MD5-128BIT-AES-CBC-OPENSSL",
        }
    }

    pub fn suite(self) -> CipherSuite {
        match self {
            Algorithm::Sha256Aes256Cbc => CipherSuite {
                digest: DigestAlgorithm::Sha256,
                key_derivation: KeyDerivation::Pkcs12,
                key_size_bits: KEY_SIZE_256,
                iv_size_bits: DEFAULT_IV_SIZE,
            },
            Algorithm::Sha256Aes128Cbc => CipherSuite {
                digest: DigestAlgorithm::Sha256,
                key_derivation: KeyDerivation::Pkcs12,
                key_size_bits: KEY_SIZE_128,
                iv_size_bits: DEFAULT_IV_SIZE,
            },
            Algorithm::Md5Aes128CbcOpenSsl => CipherSuite {
                digest: DigestAlgorithm::Md5,
                key_derivation: KeyDerivation::OpenSsl,
                key_size_bits: KEY_SIZE_128,
                iv_size_bits: DEFAULT_IV_SIZE,
            },
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jasypt_name())
    }
}

impl FromStr for Algorithm {
    type Err = PbeError;

    /// Accepts the Jasypt names and the short names, ignoring case and
    /// treating `_` like `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('_', "-");
        Algorithm::ALL
            .into_iter()
            .find(|alg| normalized == alg.jasypt_name() || normalized == alg.short_name())
            .ok_or_else(|| PbeError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = PbeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Algorithm> for String {
    fn from(value: Algorithm) -> Self {
        value.jasypt_name().to_string()
    }
}

/// How key and IV are derived from the password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDerivation {
    /// RFC 7292 Appendix B.
    Pkcs12,
    /// OpenSSL `EVP_BytesToKey`.
    OpenSsl,
}

/// Everything an encryptor needs to know about an algorithm, fixed at
/// construction. The cipher is always AES in CBC mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSuite {
    pub digest: DigestAlgorithm,
    pub key_derivation: KeyDerivation,
    pub key_size_bits: usize,
    pub iv_size_bits: usize,
}

impl CipherSuite {
    pub fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    pub fn parameter_generator(&self) -> Box<dyn ParameterGenerator> {
        let digest = self.digest.adapter();
        match self.key_derivation {
            KeyDerivation::Pkcs12 => Box::new(Pkcs12ParameterGenerator::with_sizes(
                digest,
                self.key_size_bits,
                self.iv_size_bits,
            )),
            KeyDerivation::OpenSsl => Box::new(
                OpenSslParameterGenerator::new(digest)
                    .with_sizes(self.key_size_bits, self.iv_size_bits),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jasypt_and_short_names() {
        assert_eq!(
            "PBEWITHSHA256AND256BITAES-CBC".parse::<Algorithm>().unwrap(),
            Algorithm::Sha256Aes256Cbc
        );
        assert_eq!(
            "SHA256-128BIT-AES-CBC".parse::<Algorithm>().unwrap(),
            Algorithm::Sha256Aes128Cbc
        );
        assert_eq!(
            "PBEWITHMD5AND128BITAES_CBC_OPENSSL".parse::<Algorithm>().unwrap(),
            Algorithm::Md5Aes128CbcOpenSsl
        );
        assert_eq!(
            "pbewithsha256and256bitaes-cbc".parse::<Algorithm>().unwrap(),
            Algorithm::Sha256Aes256Cbc
        );
    }

    #[test]
    fn unknown_name_fails() {
        match "PBEWITHMD5ANDDES".parse::<Algorithm>() {
            Err(PbeError::UnsupportedAlgorithm(name)) => assert_eq!(name, "PBEWITHMD5ANDDES"),
            other => panic!("expected UnsupportedAlgorithm, got: {other:?}"),
        }
        assert!("".parse::<Algorithm>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn suites() {
        let suite = Algorithm::Sha256Aes256Cbc.suite();
        assert_eq!(suite.key_size_bits, 256);
        assert_eq!(suite.iv_size_bits, 128);
        assert_eq!(suite.block_size(), 16);

        let suite = Algorithm::Md5Aes128CbcOpenSsl.suite();
        assert_eq!(suite.digest, DigestAlgorithm::Md5);
        assert_eq!(suite.key_derivation, KeyDerivation::OpenSsl);
        assert_eq!(suite.parameter_generator().key_size_bits(), 128);
    }

    #[test]
    fn suite_generator_uses_the_named_digest() {
        use crate::crypto::{KEY_MATERIAL, Sha256Digest};

        let suite = Algorithm::Sha256Aes256Cbc.suite();
        let params = suite
            .parameter_generator()
            .generate_derived_parameters("pw", b"saltsalt", 3)
            .unwrap();
        let expected = Pkcs12ParameterGenerator::new(Sha256Digest)
            .derive("pw", b"saltsalt", 3, KEY_MATERIAL, 32)
            .unwrap();
        assert_eq!(params.key(), expected.as_slice());
    }

    #[test]
    fn serde_uses_jasypt_name() {
        let json = serde_json::to_string(&Algorithm::Sha256Aes128Cbc).unwrap();
        assert_eq!(json, "\"PBEWITHSHA256AND128BITAES-CBC\"");
        let alg: Algorithm = serde_json::from_str("\"MD5-128BIT-AES-CBC-OPENSSL\"").unwrap();
        assert_eq!(alg, Algorithm::Md5Aes128CbcOpenSsl);
        assert!(serde_json::from_str::<Algorithm>("\"AES-GCM\"").is_err());
    }
}
