//! The wire envelope coordinating client and server fault decisions.
//!
//! The client relays its server fault instructions out of band, as request
//! metadata: exactly one of `faultmodulus` or `faultpercent`, plus an
//! optional `faultcodes` pool, all decimal ASCII values. Metadata keys are
//! lowercase on the wire, so the constants here are too.

use tonic::metadata::{Ascii, MetadataMap, MetadataValue};
use tonic::Status;

use crate::config::{FaultConfig, Mode};
use crate::error::{ConfigError, ValidateError};
use crate::validate::{validate_code_list, validate_modulus, validate_percent};

/// Fault every Nth request, `1..=10000`.
pub(crate) const FAULT_MODULUS_KEY: &str = "faultmodulus";
/// Fault with this probability, `0..=100`.
pub(crate) const FAULT_PERCENT_KEY: &str = "faultpercent";
/// Candidate status codes for a fault, comma separated, each `0..=16`.
pub(crate) const FAULT_CODES_KEY: &str = "faultcodes";

/// The pre-encoded server instructions a client attaches to outgoing calls.
#[derive(Debug, Clone)]
pub(crate) struct Envelope {
    key: &'static str,
    value: MetadataValue<Ascii>,
    codes: Option<MetadataValue<Ascii>>,
}

impl Envelope {
    /// Encodes the server half of a validated config.
    pub fn from_config(config: &FaultConfig) -> Result<Self, ConfigError> {
        let key = match config.server.mode {
            Mode::Modulus => FAULT_MODULUS_KEY,
            Mode::Percent => FAULT_PERCENT_KEY,
        };
        let value = MetadataValue::from(config.server.value as u64);
        let codes = if config.codes.is_empty() {
            None
        } else {
            // validated upstream, so the pool is plain digits and commas
            let codes = MetadataValue::try_from(config.codes.as_str())
                .map_err(|_| ConfigError::CodesValue)?;
            Some(codes)
        };
        Ok(Envelope { key, value, codes })
    }

    pub fn attach(&self, metadata: &mut MetadataMap) {
        metadata.insert(self.key, self.value.clone());
        if let Some(codes) = &self.codes {
            metadata.insert(FAULT_CODES_KEY, codes.clone());
        }
    }
}

/// Reads `faultmodulus`; `Ok(None)` when the header is absent.
pub(crate) fn read_fault_modulus(metadata: &MetadataMap) -> Result<Option<u64>, Status> {
    let Some(value) = metadata.get(FAULT_MODULUS_KEY) else {
        return Ok(None);
    };
    let modulus = parse_value(value, FAULT_MODULUS_KEY)?;
    match validate_modulus(modulus) {
        Ok(modulus) => Ok(Some(modulus)),
        Err(_) => Err(malformed(FAULT_MODULUS_KEY, "validate")),
    }
}

/// Reads `faultpercent`; `Ok(None)` when the header is absent. `0` is valid
/// here and means "never fault".
pub(crate) fn read_fault_percent(metadata: &MetadataMap) -> Result<Option<u32>, Status> {
    let Some(value) = metadata.get(FAULT_PERCENT_KEY) else {
        return Ok(None);
    };
    let percent = parse_value(value, FAULT_PERCENT_KEY)?;
    if percent == 0 {
        return Ok(Some(0));
    }
    match validate_percent(percent) {
        Ok(percent) => Ok(Some(percent)),
        Err(_) => Err(malformed(FAULT_PERCENT_KEY, "validate")),
    }
}

/// Reads the `faultcodes` pool; empty when the header is absent.
pub(crate) fn read_fault_codes(metadata: &MetadataMap) -> Result<Vec<u32>, Status> {
    let Some(value) = metadata.get(FAULT_CODES_KEY) else {
        return Ok(Vec::new());
    };
    let raw = value
        .to_str()
        .map_err(|_| malformed(FAULT_CODES_KEY, "parse"))?;
    validate_code_list(raw).map_err(|err| match err {
        ValidateError::Parse(_) => malformed(FAULT_CODES_KEY, "parse"),
        _ => malformed(FAULT_CODES_KEY, "validate"),
    })
}

fn parse_value(value: &MetadataValue<Ascii>, key: &str) -> Result<i64, Status> {
    let raw = value.to_str().map_err(|_| malformed(key, "parse"))?;
    raw.parse().map_err(|_| malformed(key, "parse"))
}

fn malformed(key: &str, stage: &str) -> Status {
    Status::invalid_argument(format!("{key} {stage} error"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModeValue;

    fn metadata(key: &'static str, value: &str) -> MetadataMap {
        let mut metadata = MetadataMap::new();
        metadata.insert(key, value.parse().unwrap());
        metadata
    }

    #[test]
    fn absent_headers_read_as_none() {
        let empty = MetadataMap::new();
        assert_eq!(read_fault_modulus(&empty).unwrap(), None);
        assert_eq!(read_fault_percent(&empty).unwrap(), None);
        assert_eq!(read_fault_codes(&empty).unwrap(), Vec::<u32>::new());
    }

    #[test]
    fn percent_zero_is_valid() {
        let metadata = metadata(FAULT_PERCENT_KEY, "0");
        assert_eq!(read_fault_percent(&metadata).unwrap(), Some(0));
    }

    #[test]
    fn out_of_range_values_are_invalid_argument() {
        for (key, value) in [
            (FAULT_PERCENT_KEY, "101"),
            (FAULT_PERCENT_KEY, "-5"),
            (FAULT_MODULUS_KEY, "0"),
            (FAULT_MODULUS_KEY, "10001"),
        ] {
            let md = metadata(key, value);
            let status = if key == FAULT_PERCENT_KEY {
                read_fault_percent(&md).unwrap_err()
            } else {
                read_fault_modulus(&md).unwrap_err()
            };
            assert_eq!(status.code(), tonic::Code::InvalidArgument);
            assert_eq!(status.message(), format!("{key} validate error"));
        }
    }

    #[test]
    fn unparsable_values_are_invalid_argument() {
        let md = metadata(FAULT_PERCENT_KEY, "ninety");
        let status = read_fault_percent(&md).unwrap_err();
        assert_eq!(status.message(), "faultpercent parse error");

        let md = metadata(FAULT_CODES_KEY, "10,banana");
        let status = read_fault_codes(&md).unwrap_err();
        assert_eq!(status.message(), "faultcodes parse error");

        let md = metadata(FAULT_CODES_KEY, "10,17");
        let status = read_fault_codes(&md).unwrap_err();
        assert_eq!(status.message(), "faultcodes validate error");
    }

    #[test]
    fn envelope_attaches_server_instructions() {
        let config = FaultConfig {
            client: ModeValue::percent(100),
            server: ModeValue::modulus(10),
            codes: "10,12,14".to_owned(),
        };
        let envelope = Envelope::from_config(&config).unwrap();
        let mut md = MetadataMap::new();
        envelope.attach(&mut md);
        assert_eq!(md.get(FAULT_MODULUS_KEY).unwrap().to_str().unwrap(), "10");
        assert!(md.get(FAULT_PERCENT_KEY).is_none());
        assert_eq!(md.get(FAULT_CODES_KEY).unwrap().to_str().unwrap(), "10,12,14");
    }
}
