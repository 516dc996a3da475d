use url::Url;

use crate::otp::{Algorithm, OtpParameters, OtpType, DEFAULT_DIGITS, DEFAULT_PERIOD};

/// Extracts OTP parameters from one line of entry text.
///
/// The entry parser calls this for the first line of the extra content,
/// so implementations must be side-effect-free and reentrant. Swapping
/// the implementation is how alternate OTP URI dialects get supported
/// without touching field parsing.
pub trait TotpFinder {
    /// Parameters encoded in `line`, or `None` if the line is not a
    /// recognized OTP URI.
    fn find_params(&self, line: &str) -> Option<OtpParameters>;
}

/// The `otpauth://` key-URI dialect emitted by Google Authenticator and
/// pass-otp:
///
///   otpauth://totp/LABEL?secret=BASE32&issuer=X&algorithm=SHA1&digits=6&period=30
///
/// All query parameters are optional except `secret`. Malformed optional
/// parameters fall back to their defaults, so that a sloppy URI still
/// yields usable parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct UriTotpFinder;

impl TotpFinder for UriTotpFinder {
    fn find_params(&self, line: &str) -> Option<OtpParameters> {
        let url = Url::parse(line.trim()).ok()?;
        if url.scheme() != "otpauth" {
            return None;
        }

        let r#type = match url.host_str() {
            Some("totp") => OtpType::Totp,
            Some("hotp") => OtpType::Hotp,
            _ => return None,
        };

        let mut secret: Option<String> = None;
        let mut algorithm = Algorithm::Sha1;
        let mut digits = DEFAULT_DIGITS;
        let mut period = DEFAULT_PERIOD;
        let mut counter: Option<u64> = None;

        for (k, v) in url.query_pairs() {
            match k.as_ref() {
                "secret" => secret = Some(v.to_string()),
                "algorithm" => {
                    if let Ok(a) = Algorithm::from_name(&v) {
                        algorithm = a;
                    }
                }
                "digits" => {
                    // Range is checked by the engine, not here.
                    if let Ok(d) = v.parse::<u32>() {
                        digits = d;
                    }
                }
                "period" => {
                    if let Ok(p) = v.parse::<u64>() {
                        if p > 0 {
                            period = p;
                        }
                    }
                }
                "counter" => counter = v.parse::<u64>().ok(),
                _ => {}
            }
        }

        let secret = secret.filter(|s| !s.is_empty())?;

        Some(OtpParameters {
            secret,
            algorithm,
            digits,
            period,
            r#type,
            counter,
        })
    }
}
