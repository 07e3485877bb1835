use serde::{Deserialize, Serialize};

/// A ticker code plus its display name; the unit of aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "kode")]
    pub code: String,
    #[serde(rename = "nama")]
    pub name: String,
}

impl Identifier {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Exact, ASCII case-insensitive comparison against a requested symbol.
    pub fn matches(&self, symbol: &str) -> bool {
        self.code.eq_ignore_ascii_case(symbol.trim())
    }
}

/// Find the identifier a route parameter refers to.
pub fn resolve<'a>(identifiers: &'a [Identifier], symbol: &str) -> Option<&'a Identifier> {
    identifiers.iter().find(|identifier| identifier.matches(symbol))
}
