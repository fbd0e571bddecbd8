use serde::{Deserialize, Serialize};

use crate::EngineError;

const DEFAULT_CODE: &str = "IDR";

/// ISO 4217 currency code attached to a wallet.
///
/// The ledger never converts between currencies: the code is a label carried
/// with the wallet and echoed back in balances. Amounts are whole integers in
/// the smallest unit in use, so no fraction digits are tracked here.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Canonical (upper-case) currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Decodes a code read back from `wallets.currency`.
    pub(crate) fn from_stored(code: &str) -> Result<Self, EngineError> {
        Self::try_from(code)
            .map_err(|_| EngineError::Corrupt(format!("stored currency code: {code}")))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CODE.to_string())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngineError::InvalidName(format!(
                "invalid currency code: {value}"
            )));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for Currency {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_idr() {
        assert_eq!(Currency::default().code(), "IDR");
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let currency = Currency::try_from(" usd ").unwrap();
        assert_eq!(currency.code(), "USD");
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(Currency::try_from("RUPIAH").is_err());
        assert!(Currency::try_from("E1R").is_err());
        assert!(Currency::try_from("").is_err());
    }

    #[test]
    fn bad_stored_code_is_corrupt() {
        assert_eq!(Currency::from_stored("EUR").unwrap().code(), "EUR");
        assert!(matches!(
            Currency::from_stored("R1P"),
            Err(EngineError::Corrupt(_))
        ));
    }
}
