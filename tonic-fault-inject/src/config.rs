//! Fault injection configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ParseModeError, ValidateError};
use crate::validate::{validate_code_list, validate_modulus, validate_percent};

/// How a fault trigger is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Deterministic: fault on every Nth call.
    Modulus,
    /// Probabilistic: fault on N percent of calls, sampled per call.
    Percent,
}

impl FromStr for Mode {
    type Err = ParseModeError;

    /// Accepts `m`/`mod`/`modulus` and `p`/`per`/`percent`, case insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "m" | "mod" | "modulus" => Ok(Mode::Modulus),
            "p" | "per" | "percent" => Ok(Mode::Percent),
            _ => Err(ParseModeError(s.to_owned())),
        }
    }
}

/// A trigger mode paired with its value.
///
/// For [`Mode::Modulus`] the value is the N in "every Nth call",
/// `1..=10000`. For [`Mode::Percent`] it is a probability in `0..=100`,
/// where `0` disables the trigger entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeValue {
    /// The trigger kind.
    pub mode: Mode,
    /// The modulus or percentage.
    pub value: i64,
}

impl ModeValue {
    /// Fault every `value`-th call.
    pub fn modulus(value: i64) -> Self {
        ModeValue {
            mode: Mode::Modulus,
            value,
        }
    }

    /// Fault on `value` percent of calls.
    pub fn percent(value: i64) -> Self {
        ModeValue {
            mode: Mode::Percent,
            value,
        }
    }

    pub(crate) fn check(&self) -> Result<(), ValidateError> {
        match self.mode {
            Mode::Modulus => validate_modulus(self.value).map(drop),
            // percent 0 disables the trigger and skips the strict range
            Mode::Percent if self.value == 0 => Ok(()),
            Mode::Percent => validate_percent(self.value).map(drop),
        }
    }
}

/// Fault injection settings for one client interceptor installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultConfig {
    /// How this client decides a call counts as a client side fault.
    pub client: ModeValue,
    /// The instructions relayed to the server interceptor on every call.
    pub server: ModeValue,
    /// Optional status code pool for server faults, comma separated,
    /// e.g. `"14"` or `"10,12,14"`. Empty means any non-OK code.
    #[serde(default)]
    pub codes: String,
}

impl FaultConfig {
    /// Validates every field, returning the first violation.
    ///
    /// Pure and side effect free. Embedding applications are encouraged to
    /// call this before installing an interceptor, even though
    /// [`ClientFaultInjector::new`](crate::ClientFaultInjector::new) checks
    /// it again.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.client.check().map_err(ConfigError::Client)?;
        self.server.check().map_err(ConfigError::Server)?;
        if !self.codes.is_empty() {
            validate_code_list(&self.codes).map_err(ConfigError::Codes)?;
        }
        Ok(())
    }
}

/// Parse a config from TOML.
impl FromStr for FaultConfig {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}
