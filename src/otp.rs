use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Sha256, Sha512};
use thiserror::Error;

pub const DEFAULT_DIGITS: u32 = 6;
pub const DEFAULT_PERIOD: u64 = 30;

const MIN_DIGITS: u32 = 6;
const MAX_DIGITS: u32 = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OtpError {
    #[error("invalid base32 OTP secret")]
    InvalidSecret,
    #[error("unsupported OTP digits '{0}', expected 6-10")]
    InvalidDigits(u32),
    #[error("unsupported OTP algorithm '{0}', expected SHA1/SHA256/SHA512")]
    InvalidAlgorithm(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA512")]
    Sha512,
}

impl Algorithm {
    pub fn from_name(name: &str) -> Result<Self, OtpError> {
        match name.to_ascii_uppercase().as_str() {
            "SHA1" => Ok(Algorithm::Sha1),
            "SHA256" => Ok(Algorithm::Sha256),
            "SHA512" => Ok(Algorithm::Sha512),
            other => Err(OtpError::InvalidAlgorithm(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum OtpType {
    #[serde(rename = "totp")]
    Totp,
    #[serde(rename = "hotp")]
    Hotp,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OtpParameters {
    pub secret: String, // base32
    pub algorithm: Algorithm,
    pub digits: u32,
    pub period: u64, // seconds per time step
    pub r#type: OtpType,
    pub counter: Option<u64>, // HOTP only
}

impl OtpParameters {
    /// Parameters for a bare secret with no further metadata:
    /// TOTP, SHA1, 6 digits, 30-second period.
    pub fn with_secret(secret: String) -> Self {
        OtpParameters {
            secret,
            algorithm: Algorithm::Sha1,
            digits: DEFAULT_DIGITS,
            period: DEFAULT_PERIOD,
            r#type: OtpType::Totp,
            counter: None,
        }
    }
}

/// TOTP time-step counter for a unix timestamp (RFC 6238).
pub fn time_step(unix_seconds: u64, period: u64) -> u64 {
    unix_seconds / period.max(1)
}

/// HOTP code for the given counter (RFC 4226), used as-is for TOTP once
/// the caller has divided wall-clock time by the period.
pub fn calculate_code(
    secret: &str,
    counter: u64,
    algorithm: Algorithm,
    digits: u32,
) -> Result<String, OtpError> {
    if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
        return Err(OtpError::InvalidDigits(digits));
    }

    let key = decode_secret(secret)?;
    let digest = hmac_digest(&key, &counter.to_be_bytes(), algorithm);

    // Dynamic truncation (RFC 4226 §5.3): the low nibble of the last
    // digest byte picks a 4-byte window, whose MSB is cleared.
    let offset = (digest[digest.len() - 1] & 0x0f) as usize;
    let binary = ((digest[offset] as u32 & 0x7f) << 24)
        | ((digest[offset + 1] as u32) << 16)
        | ((digest[offset + 2] as u32) << 8)
        | (digest[offset + 3] as u32);

    let code = binary as u64 % 10u64.pow(digits);
    Ok(format!("{code:0width$}", width = digits as usize))
}

/// Decode a base32 secret (RFC 4648 alphabet, padded or unpadded,
/// case-insensitive, spaces ignored).
pub fn decode_secret(secret: &str) -> Result<Vec<u8>, OtpError> {
    let cleaned = secret.trim().replace(' ', "").to_ascii_uppercase();
    if cleaned.is_empty() {
        return Err(OtpError::InvalidSecret);
    }

    let alphabet = if cleaned.contains('=') {
        base32::Alphabet::Rfc4648 { padding: true }
    } else {
        base32::Alphabet::Rfc4648 { padding: false }
    };

    let bytes = base32::decode(alphabet, &cleaned).ok_or(OtpError::InvalidSecret)?;
    if bytes.is_empty() {
        return Err(OtpError::InvalidSecret);
    }
    Ok(bytes)
}

fn hmac_digest(key: &[u8], data: &[u8], algorithm: Algorithm) -> Vec<u8> {
    match algorithm {
        Algorithm::Sha1 => {
            let mut mac = Hmac::<Sha1>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha256 => {
            let mut mac =
                Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        Algorithm::Sha512 => {
            let mut mac =
                Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts any key length");
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    }
}
