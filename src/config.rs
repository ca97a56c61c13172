//! Encryptor configuration.
//!
//! ```json
//! {
//!   "algorithm": "PBEWITHSHA256AND256BITAES-CBC",
//!   "salt": { "generator": "Fixed", "salt_block_size": 16, "salt": "0123456789abcdef" },
//!   "padding": "lenient"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    algorithm::Algorithm,
    crypto::{
        DEFAULT_SALT_SIZE, FixedSaltGenerator, PaddingMode, RandomSaltGenerator, SaltGenerator,
        SaltStrategy, SaltValue,
    },
    error::PbeError,
};

fn default_salt_size() -> usize {
    DEFAULT_SALT_SIZE
}

/// Strategy-specific salt options, used by name-based construction.
#[derive(Debug, Clone, Default)]
pub struct SaltOptions {
    /// Defaults to [`DEFAULT_SALT_SIZE`].
    pub salt_block_size: Option<usize>,
    /// Required by the `Fixed` strategy, ignored by `Random`.
    pub salt: Option<SaltValue>,
}

impl SaltOptions {
    pub fn with_block_size(mut self, salt_block_size: usize) -> Self {
        self.salt_block_size = Some(salt_block_size);
        self
    }

    pub fn with_salt(mut self, salt: impl Into<SaltValue>) -> Self {
        self.salt = Some(salt.into());
        self
    }
}

/// Salt generator selection as it appears in a configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "generator")]
pub enum SaltConfig {
    Random {
        #[serde(default = "default_salt_size")]
        salt_block_size: usize,
    },
    Fixed {
        #[serde(default = "default_salt_size")]
        salt_block_size: usize,
        #[serde(default)]
        salt: Option<SaltValue>,
    },
}

impl Default for SaltConfig {
    fn default() -> Self {
        SaltConfig::Random {
            salt_block_size: DEFAULT_SALT_SIZE,
        }
    }
}

impl SaltConfig {
    pub fn from_strategy(strategy: SaltStrategy, options: SaltOptions) -> Self {
        let salt_block_size = options.salt_block_size.unwrap_or(DEFAULT_SALT_SIZE);
        match strategy {
            SaltStrategy::Random => SaltConfig::Random { salt_block_size },
            SaltStrategy::Fixed => SaltConfig::Fixed {
                salt_block_size,
                salt: options.salt,
            },
        }
    }

    /// # Errors
    ///
    /// Returns a configuration error if a fixed salt is missing or has the
    /// wrong length.
    pub fn build(&self) -> Result<Box<dyn SaltGenerator>, PbeError> {
        match self {
            SaltConfig::Random { salt_block_size } => {
                Ok(Box::new(RandomSaltGenerator::new(*salt_block_size)))
            }
            SaltConfig::Fixed {
                salt_block_size,
                salt,
            } => Ok(Box::new(FixedSaltGenerator::new(
                *salt_block_size,
                salt.clone(),
            )?)),
        }
    }
}

/// Everything needed to build a [`crate::StandardPbeStringEncryptor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptorConfig {
    pub algorithm: Algorithm,
    #[serde(default)]
    pub salt: SaltConfig,
    #[serde(default)]
    pub padding: PaddingMode,
}

impl EncryptorConfig {
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            salt: SaltConfig::default(),
            padding: PaddingMode::default(),
        }
    }

    /// Parses a JSON configuration document.
    ///
    /// Unknown algorithm or generator names and mistyped salts are reported
    /// as configuration errors.
    pub fn from_json(json: &str) -> Result<Self, PbeError> {
        serde_json::from_str(json)
            .map_err(|e| PbeError::Configuration(format!("invalid encryptor config: {e}")))
    }
}
