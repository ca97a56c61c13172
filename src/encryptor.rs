//! Jasypt `StandardPBEStringEncryptor` equivalent.

use zeroize::Zeroizing;

use crate::{
    algorithm::{Algorithm, CipherSuite},
    config::{EncryptorConfig, SaltConfig, SaltOptions},
    crypto::{
        DerivedParameters, PaddingMode, ParameterGenerator, RandomSaltGenerator, SaltGenerator,
        SaltStrategy, aes_cbc, padding,
    },
    error::PbeError,
    format::{self, Payload},
};

/// Jasypt's default iteration count.
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Password-based string encryptor compatible with Jasypt.
///
/// Configured once, then reusable from any number of threads: it holds only
/// the algorithm, the salt source and the padding mode, never a password or
/// derived key.
pub struct StandardPbeStringEncryptor {
    algorithm: Algorithm,
    suite: CipherSuite,
    key_generator: Box<dyn ParameterGenerator>,
    salt_generator: Box<dyn SaltGenerator>,
    padding: PaddingMode,
}

impl StandardPbeStringEncryptor {
    /// Encryptor with a random 16-byte salt.
    pub fn new(algorithm: Algorithm) -> Self {
        Self::with_salt_generator(algorithm, RandomSaltGenerator::default())
    }

    /// Encryptor drawing salts from `salt_generator`; its `salt_size()` is
    /// also the salt length expected when decrypting.
    pub fn with_salt_generator(
        algorithm: Algorithm,
        salt_generator: impl SaltGenerator + 'static,
    ) -> Self {
        Self::from_parts(algorithm, Box::new(salt_generator), PaddingMode::default())
    }

    /// Builds an encryptor from an algorithm name and a salt generator name
    /// (`Random` or `Fixed`).
    ///
    /// # Errors
    ///
    /// Returns a configuration error for unknown names or an invalid fixed
    /// salt.
    pub fn from_names(
        algorithm: &str,
        salt_generator: &str,
        options: SaltOptions,
    ) -> Result<Self, PbeError> {
        let strategy: SaltStrategy = salt_generator.parse()?;
        let algorithm: Algorithm = algorithm.parse()?;
        let salt_generator = SaltConfig::from_strategy(strategy, options).build()?;
        Ok(Self::from_parts(
            algorithm,
            salt_generator,
            PaddingMode::default(),
        ))
    }

    /// Builds an encryptor from a deserialized [`EncryptorConfig`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the fixed salt is missing or its
    /// length differs from `salt_block_size`.
    pub fn from_config(config: &EncryptorConfig) -> Result<Self, PbeError> {
        let salt_generator = config.salt.build()?;
        Ok(Self::from_parts(
            config.algorithm,
            salt_generator,
            config.padding,
        ))
    }

    fn from_parts(
        algorithm: Algorithm,
        salt_generator: Box<dyn SaltGenerator>,
        padding: PaddingMode,
    ) -> Self {
        let suite = algorithm.suite();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            %algorithm,
            salt_size = salt_generator.salt_size(),
            ?padding,
            "configured PBE encryptor"
        );

        Self {
            algorithm,
            suite,
            key_generator: suite.parameter_generator(),
            salt_generator,
            padding,
        }
    }

    /// Replaces the padding check applied after decryption.
    pub fn with_padding_mode(mut self, padding: PaddingMode) -> Self {
        self.padding = padding;
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Digest, key derivation and sizes resolved from the algorithm.
    pub fn suite(&self) -> &CipherSuite {
        &self.suite
    }

    /// Salt bytes prepended to every payload.
    pub fn salt_size(&self) -> usize {
        self.salt_generator.salt_size()
    }

    pub fn padding_mode(&self) -> PaddingMode {
        self.padding
    }

    /// Encrypts `text` with [`DEFAULT_ITERATIONS`].
    ///
    /// # Errors
    ///
    /// Fails only if the salt source or the cipher fails.
    pub fn encrypt(&self, password: &str, text: &str) -> Result<String, PbeError> {
        self.encrypt_with_iterations(password, text, DEFAULT_ITERATIONS)
    }

    pub fn encrypt_with_iterations(
        &self,
        password: &str,
        text: &str,
        iterations: u32,
    ) -> Result<String, PbeError> {
        self.encrypt_bytes(password, text.as_bytes(), iterations)
    }

    /// Returns `base64(salt || AES-CBC(pad(plaintext)))`.
    pub fn encrypt_bytes(
        &self,
        password: &str,
        plaintext: &[u8],
        iterations: u32,
    ) -> Result<String, PbeError> {
        let salt = self.salt_generator.generate_salt()?;
        let params = self
            .key_generator
            .generate_derived_parameters(password, &salt, iterations)?;

        let mut buf = Zeroizing::new(padding::pad(self.suite.block_size(), plaintext));
        aes_cbc::encrypt(params.key(), iv(&params)?, &mut buf)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            algorithm = %self.algorithm,
            iterations,
            salt_size = salt.len(),
            ciphertext_len = buf.len(),
            "encrypted message"
        );

        Ok(format::serialize(&Payload::new(salt, buf.to_vec())))
    }

    /// Decrypts with [`DEFAULT_ITERATIONS`].
    ///
    /// # Errors
    ///
    /// Returns a format error for input that is not a well-formed payload,
    /// and [`PbeError::Padding`] or [`PbeError::InvalidUtf8`] when the key
    /// material does not match (wrong password, salt size or iterations).
    pub fn decrypt(&self, password: &str, encrypted: &str) -> Result<String, PbeError> {
        self.decrypt_with_iterations(password, encrypted, DEFAULT_ITERATIONS)
    }

    pub fn decrypt_with_iterations(
        &self,
        password: &str,
        encrypted: &str,
        iterations: u32,
    ) -> Result<String, PbeError> {
        let plaintext = self.decrypt_bytes(password, encrypted, iterations)?;
        let text = String::from_utf8(plaintext.to_vec()).inspect_err(|_| {
            #[cfg(feature = "tracing")]
            tracing::warn!(algorithm = %self.algorithm, "decrypted bytes are not UTF-8");
        })?;
        Ok(text)
    }

    /// Splits off the salt, re-derives key and IV, decrypts and unpads.
    pub fn decrypt_bytes(
        &self,
        password: &str,
        encrypted: &str,
        iterations: u32,
    ) -> Result<Zeroizing<Vec<u8>>, PbeError> {
        let payload = format::parse(
            encrypted,
            self.salt_generator.salt_size(),
            self.suite.block_size(),
        )?;

        let params = self.key_generator.generate_derived_parameters(
            password,
            payload.salt(),
            iterations,
        )?;

        let mut buf = Zeroizing::new(payload.into_ciphertext());
        aes_cbc::decrypt(params.key(), iv(&params)?, &mut buf)?;

        let plaintext = padding::unpad(self.suite.block_size(), &buf, self.padding)
            .inspect_err(|_| {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    algorithm = %self.algorithm,
                    iterations,
                    "invalid padding after decryption"
                );
            })?;

        Ok(Zeroizing::new(plaintext.to_vec()))
    }
}

fn iv(params: &DerivedParameters) -> Result<&[u8], PbeError> {
    params
        .iv()
        .ok_or_else(|| PbeError::Cipher("CBC mode requires an IV".to_string()))
}

impl std::fmt::Debug for StandardPbeStringEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardPbeStringEncryptor")
            .field("algorithm", &self.algorithm)
            .field("salt_size", &self.salt_generator.salt_size())
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::FixedSaltGenerator;

    const PASSWORD: &str = "pssst...don't tell anyone";
    const MESSAGE: &str = "secret value";
    const SALT: &str = "0123456789abcdef";

    fn fixed(algorithm: Algorithm) -> StandardPbeStringEncryptor {
        let salt = FixedSaltGenerator::new(16, Some(SALT.into())).unwrap();
        StandardPbeStringEncryptor::with_salt_generator(algorithm, salt)
    }

    #[test]
    fn golden_sha256_256() {
        let jasypt = fixed(Algorithm::Sha256Aes256Cbc);
        let encrypted = jasypt
            .encrypt_with_iterations(PASSWORD, MESSAGE, 4000)
            .unwrap();
        assert_eq!(encrypted, "MDEyMzQ1Njc4OWFiY2RlZk1Ny9o727XNwOV106EFHd8=");
        assert_eq!(
            jasypt
                .decrypt_with_iterations(PASSWORD, &encrypted, 4000)
                .unwrap(),
            MESSAGE
        );
    }

    #[test]
    fn golden_default_iterations() {
        let jasypt = fixed(Algorithm::Sha256Aes256Cbc);
        assert_eq!(
            jasypt.encrypt(PASSWORD, MESSAGE).unwrap(),
            "MDEyMzQ1Njc4OWFiY2RlZjIcK6V9YDoKj+YeKDVOMsk="
        );
    }

    #[test]
    fn golden_sha256_128() {
        let jasypt = fixed(Algorithm::Sha256Aes128Cbc);
        assert_eq!(
            jasypt.encrypt(PASSWORD, MESSAGE).unwrap(),
            "MDEyMzQ1Njc4OWFiY2RlZgLVjAbJhukpQkZJ3uOVNeU="
        );
    }

    #[test]
    fn golden_md5_openssl() {
        let jasypt = fixed(Algorithm::Md5Aes128CbcOpenSsl);
        assert_eq!(
            jasypt.encrypt(PASSWORD, MESSAGE).unwrap(),
            "MDEyMzQ1Njc4OWFiY2RlZk+ZGenkCfp1lws5g6497vg="
        );
    }

    #[test]
    fn random_salt_roundtrip() {
        for algorithm in Algorithm::ALL {
            let jasypt = StandardPbeStringEncryptor::new(algorithm);
            let encrypted = jasypt.encrypt_with_iterations(PASSWORD, MESSAGE, 10).unwrap();
            let decrypted = jasypt
                .decrypt_with_iterations(PASSWORD, &encrypted, 10)
                .unwrap();
            assert_eq!(decrypted, MESSAGE, "{algorithm}");
        }
    }

    #[test]
    fn random_salt_changes_ciphertext() {
        let jasypt = StandardPbeStringEncryptor::new(Algorithm::Sha256Aes256Cbc);
        let a = jasypt.encrypt_with_iterations(PASSWORD, MESSAGE, 1).unwrap();
        let b = jasypt.encrypt_with_iterations(PASSWORD, MESSAGE, 1).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_message_roundtrip() {
        let jasypt = fixed(Algorithm::Sha256Aes256Cbc);
        let encrypted = jasypt.encrypt_with_iterations(PASSWORD, "", 5).unwrap();
        // salt + one full padding block
        assert_eq!(encrypted.len(), 44);
        assert_eq!(
            jasypt.decrypt_with_iterations(PASSWORD, &encrypted, 5).unwrap(),
            ""
        );
    }

    #[test]
    fn binary_roundtrip() {
        let jasypt = StandardPbeStringEncryptor::new(Algorithm::Sha256Aes128Cbc);
        let data: Vec<u8> = (0..=255).collect();
        let encrypted = jasypt.encrypt_bytes(PASSWORD, &data, 3).unwrap();
        let decrypted = jasypt.decrypt_bytes(PASSWORD, &encrypted, 3).unwrap();
        assert_eq!(*decrypted, data);
    }

    #[test]
    fn wrong_iterations_do_not_yield_plaintext() {
        let jasypt = fixed(Algorithm::Sha256Aes256Cbc);
        let encrypted = jasypt.encrypt_with_iterations(PASSWORD, MESSAGE, 4000).unwrap();
        match jasypt.decrypt_with_iterations(PASSWORD, &encrypted, 3999) {
            Ok(text) => assert_ne!(text, MESSAGE),
            Err(e) => assert!(e.is_authentication(), "unexpected error: {e}"),
        }
    }

    #[test]
    fn zero_iterations_fail() {
        let jasypt = fixed(Algorithm::Sha256Aes256Cbc);
        assert!(matches!(
            jasypt.encrypt_with_iterations(PASSWORD, MESSAGE, 0),
            Err(PbeError::InvalidIterations)
        ));
    }

    #[test]
    fn short_payload_is_format_error() {
        let jasypt = StandardPbeStringEncryptor::new(Algorithm::Sha256Aes256Cbc);
        let err = jasypt.decrypt(PASSWORD, "MDEyMzQ1Njc4OWFiY2RlZg==").unwrap_err();
        assert!(err.is_format());
        let err = jasypt.decrypt(PASSWORD, "%%%").unwrap_err();
        assert!(err.is_format());
    }

    #[test]
    fn from_names_matches_typed_construction() {
        let jasypt = StandardPbeStringEncryptor::from_names(
            "PBEWITHSHA256AND256BITAES-CBC",
            "Fixed",
            SaltOptions::default().with_salt(SALT),
        )
        .unwrap();
        assert_eq!(
            jasypt.encrypt_with_iterations(PASSWORD, MESSAGE, 4000).unwrap(),
            "MDEyMzQ1Njc4OWFiY2RlZk1Ny9o727XNwOV106EFHd8="
        );
    }

    #[test]
    fn from_names_rejects_unknown() {
        let err = StandardPbeStringEncryptor::from_names(
            "PBEWITHMD5ANDDES",
            "Random",
            SaltOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PbeError::UnsupportedAlgorithm(_)));

        let err = StandardPbeStringEncryptor::from_names(
            "PBEWITHSHA256AND256BITAES-CBC",
            "Sometimes",
            SaltOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PbeError::UnsupportedSaltGenerator(_)));

        let err = StandardPbeStringEncryptor::from_names(
            "PBEWITHSHA256AND256BITAES-CBC",
            "Fixed",
            SaltOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PbeError::Configuration(_)));
    }

    #[test]
    fn from_config_rejects_bad_fixed_salt() {
        let config = EncryptorConfig::from_json(
            r#"{
                "algorithm": "PBEWITHSHA256AND256BITAES-CBC",
                "salt": { "generator": "Fixed", "salt_block_size": 16, "salt": "short" }
            }"#,
        )
        .unwrap();
        let err = StandardPbeStringEncryptor::from_config(&config).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn empty_password_roundtrip() {
        for algorithm in Algorithm::ALL {
            let jasypt = fixed(algorithm);
            let encrypted = jasypt.encrypt_with_iterations("", MESSAGE, 7).unwrap();
            assert_ne!(
                encrypted,
                jasypt.encrypt_with_iterations(PASSWORD, MESSAGE, 7).unwrap()
            );
            assert_eq!(
                jasypt.decrypt_with_iterations("", &encrypted, 7).unwrap(),
                MESSAGE
            );
        }
    }

    #[test]
    fn custom_salt_size() {
        let jasypt = StandardPbeStringEncryptor::from_names(
            "PBEWITHSHA256AND256BITAES-CBC",
            "Random",
            SaltOptions::default().with_block_size(32),
        )
        .unwrap();
        assert_eq!(jasypt.salt_size(), 32);
        let encrypted = jasypt.encrypt(PASSWORD, MESSAGE).unwrap();
        assert_eq!(jasypt.decrypt(PASSWORD, &encrypted).unwrap(), MESSAGE);
    }

    #[test]
    fn strict_padding_still_decrypts_valid_payloads() {
        let jasypt = fixed(Algorithm::Sha256Aes256Cbc).with_padding_mode(PaddingMode::Strict);
        assert_eq!(jasypt.padding_mode(), PaddingMode::Strict);
        assert_eq!(
            jasypt
                .decrypt_with_iterations(
                    PASSWORD,
                    "MDEyMzQ1Njc4OWFiY2RlZk1Ny9o727XNwOV106EFHd8=",
                    4000
                )
                .unwrap(),
            MESSAGE
        );
    }

    #[test]
    fn debug_hides_internals() {
        let jasypt = fixed(Algorithm::Sha256Aes256Cbc);
        let debug = format!("{jasypt:?}");
        assert!(debug.contains("PBEWITHSHA256AND256BITAES-CBC") || debug.contains("Sha256Aes256Cbc"));
        assert!(!debug.contains(SALT));
    }
}
