use thiserror::Error;

/// 3-letter ISO 4217-style currency code.
///
/// The ledger does no currency conversion; the code is validated and
/// stored verbatim (uppercased) with each record. Input is trimmed and
/// uppercased before the `[A-Z]{3}` check, so `" usd "` parses to `USD`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Currency([u8; 3]);

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("currency must be a 3-letter ISO 4217 code")]
pub struct ParseCurrencyError;

impl Currency {
    /// Canonical uppercase currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        // Invariant: constructed only from ASCII uppercase letters.
        str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = ParseCurrencyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let upper = value.trim().to_ascii_uppercase();
        let bytes = upper.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(ParseCurrencyError);
        }
        Ok(Currency([bytes[0], bytes[1], bytes[2]]))
    }
}
