use std::fmt;

use thiserror::Error;

/// Canonical colon-delimited lowercase MAC address, e.g.
/// `aa:bb:cc:dd:ee:ff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddress(String);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MacError {
    /// Hex pairs need an even number of characters. A trailing unpaired
    /// nibble is rejected rather than silently dropped.
    #[error("mac address has odd length {0}")]
    OddLength(usize),

    #[error("mac address contains non-hex character {0:?}")]
    InvalidCharacter(char),
}

impl MacAddress {
    /// Normalize a raw, undelimited hex MAC string.
    ///
    /// Pure and deterministic; groups the input into 2-character byte
    /// pairs joined by `:` and lowercases it. Odd-length or non-hex
    /// input is an error.
    pub fn normalize(raw: &str) -> Result<Self, MacError> {
        if raw.len() % 2 != 0 {
            return Err(MacError::OddLength(raw.len()));
        }
        if let Some(bad) = raw.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(MacError::InvalidCharacter(bad));
        }
        let lower = raw.to_ascii_lowercase();
        let pairs: Vec<&str> = lower
            .as_bytes()
            .chunks(2)
            .map(|pair| std::str::from_utf8(pair).unwrap_or_default())
            .collect();
        Ok(Self(pairs.join(":")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
