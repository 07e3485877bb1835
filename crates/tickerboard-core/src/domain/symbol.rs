use std::fmt::{Display, Formatter};

use crate::ValidationError;

const MAX_SYMBOL_LEN: usize = 20;

/// Provider-facing ticker, i.e. an identifier code plus its market suffix
/// (`BBCA` on the `.JK` market becomes `BBCA.JK`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MarketSymbol(String);

impl MarketSymbol {
    /// Build the provider symbol for `code`, appending `suffix` unless the code
    /// already names its market.
    pub fn for_code(code: &str, suffix: &str) -> Result<Self, ValidationError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let mut normalized = trimmed.to_ascii_uppercase();
        if !normalized.contains('.') {
            normalized.push_str(&suffix.trim().to_ascii_uppercase());
        }

        Self::parse(&normalized)
    }

    /// Parse an already-qualified provider symbol.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }

        let normalized = trimmed.to_ascii_uppercase();
        let len = normalized.chars().count();
        if len > MAX_SYMBOL_LEN {
            return Err(ValidationError::SymbolTooLong {
                len,
                max: MAX_SYMBOL_LEN,
            });
        }

        if let Some(first) = normalized.chars().next() {
            if !first.is_ascii_alphanumeric() {
                return Err(ValidationError::SymbolInvalidStart { ch: first });
            }
        }

        for (index, ch) in normalized.chars().enumerate() {
            let valid = ch.is_ascii_alphanumeric() || ch == '.' || ch == '-';
            if !valid {
                return Err(ValidationError::SymbolInvalidChar { ch, index });
            }
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MarketSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_market_suffix_to_bare_code() {
        let symbol = MarketSymbol::for_code(" bbca ", ".JK").expect("symbol should parse");
        assert_eq!(symbol.as_str(), "BBCA.JK");
    }

    #[test]
    fn keeps_existing_market_suffix() {
        let symbol = MarketSymbol::for_code("TLKM.JK", ".JK").expect("symbol should parse");
        assert_eq!(symbol.as_str(), "TLKM.JK");
    }

    #[test]
    fn empty_suffix_leaves_code_untouched() {
        let symbol = MarketSymbol::for_code("aapl", "").expect("symbol should parse");
        assert_eq!(symbol.as_str(), "AAPL");
    }

    #[test]
    fn rejects_blank_code() {
        let err = MarketSymbol::for_code("   ", ".JK").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySymbol);
    }

    #[test]
    fn rejects_invalid_chars() {
        let err = MarketSymbol::for_code("BB$CA", ".JK").expect_err("must fail");
        assert!(matches!(err, ValidationError::SymbolInvalidChar { ch: '$', .. }));
    }
}
