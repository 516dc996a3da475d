use serde::Serialize;

use crate::otp::OtpParameters;
use crate::uri::TotpFinder;

/// Field names recognized as a username, in priority order. Between
/// lines the tie-break is source order alone: the first line carrying
/// any of these wins, whatever its synonym's position in this list.
pub const USERNAME_FIELDS: &[&str] = &[
    "login", "username", "user", "account", "email", "name", "handle", "id", "identity",
];

/// Field names that carry a bare base32 TOTP secret.
const TOTP_FIELDS: &[&str] = &["totp"];

/// One decrypted password record, split into semantic fields.
///
/// Parsing is best-effort and never fails: absent fields degrade to an
/// empty string or `None`. `password` and `extra_content` are a lossless
/// split of the raw text at the first line boundary.
#[derive(Debug, Serialize, Clone)]
pub struct Entry {
    pub password: String,
    pub extra_content: String,
    pub username: Option<String>,
    pub otp: Option<OtpParameters>,
}

impl Entry {
    pub fn parse(content: &str, finder: &dyn TotpFinder) -> Self {
        let (password, extra_content) = match content.split_once('\n') {
            Some((first, rest)) => (first, rest),
            None => (content, ""),
        };

        Entry {
            password: password.to_string(),
            extra_content: extra_content.to_string(),
            username: find_username(extra_content),
            otp: find_otp(extra_content, finder),
        }
    }

    pub fn has_username(&self) -> bool {
        self.username.is_some()
    }

    pub fn has_totp(&self) -> bool {
        self.otp.is_some()
    }
}

/// An otpauth:// URI is only recognized on the first line of the extra
/// content (OTP URIs are written as a single dedicated line, usually
/// appended right after the password). A bare `totp: <secret>` field may
/// sit on any line; the URI takes precedence when both are present.
fn find_otp(extra_content: &str, finder: &dyn TotpFinder) -> Option<OtpParameters> {
    if let Some(first) = extra_content.lines().next() {
        if let Some(params) = finder.find_params(first) {
            return Some(params);
        }
    }

    for line in extra_content.lines() {
        if let Some(secret) = field_value(line, TOTP_FIELDS) {
            return Some(OtpParameters::with_secret(secret.to_string()));
        }
    }

    None
}

fn find_username(extra_content: &str) -> Option<String> {
    for line in extra_content.lines() {
        if let Some(value) = field_value(line, USERNAME_FIELDS) {
            return Some(value.to_string());
        }
    }
    None
}

/// Match a `key: value` or `key value` line against a set of field names.
///
/// The key must equal one of the names as a whole token, compared
/// case-insensitively; the colon is optional and may carry whitespace on
/// either side. Lines without a value never match, nor do lines where a
/// field name is merely a prefix of a longer word.
fn field_value<'a>(line: &'a str, fields: &[&str]) -> Option<&'a str> {
    let line = line.trim();
    let key_end = line.find(|c: char| c == ':' || c.is_whitespace())?;
    let key = &line[..key_end];
    if !fields.iter().any(|f| key.eq_ignore_ascii_case(f)) {
        return None;
    }

    let mut value = line[key_end..].trim_start();
    if let Some(stripped) = value.strip_prefix(':') {
        value = stripped;
    }
    let value = value.trim();
    if value.is_empty() { None } else { Some(value) }
}
