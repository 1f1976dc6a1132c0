//! Range validators shared by the config checker and the metadata readers.

use crate::error::ValidateError;

/// Validates a fault modulus, `1..=10000` inclusive.
///
/// e.g. modulus = 1 faults every request, modulus = 100 every 100th.
pub fn validate_modulus(modulus: i64) -> Result<u64, ValidateError> {
    if !(1..=10000).contains(&modulus) {
        return Err(ValidateError::InvalidModulus);
    }
    Ok(modulus as u64)
}

/// Validates a fault percentage, `1..=100` inclusive.
///
/// The lower bound is strict on purpose; call sites that accept `0` as
/// "never fault" check for it before calling.
pub fn validate_percent(percent: i64) -> Result<u32, ValidateError> {
    if !(1..=100).contains(&percent) {
        return Err(ValidateError::InvalidPercent);
    }
    Ok(percent as u32)
}

/// Validates a gRPC status code, `0..=16` inclusive.
pub fn validate_code(code: i64) -> Result<u32, ValidateError> {
    if !(0..=16).contains(&code) {
        return Err(ValidateError::InvalidCode);
    }
    Ok(code as u32)
}

/// Parses and validates a comma separated list of status codes.
///
/// A single code is fine, e.g. `"14"`, as is a list, e.g. `"10,12,14"`.
/// Fails on the first token that does not parse or is out of range. The
/// empty string fails too: its only token is empty.
pub fn validate_code_list(csv: &str) -> Result<Vec<u32>, ValidateError> {
    csv.split(',')
        .map(|token| validate_code(token.parse()?))
        .collect()
}
