//! Domain types shared across modules.
//!
//! Credentials are used by both the validator and the HTTP probe; products
//! by both the billing providers and the purchase coordinator. Keeping them
//! here avoids circular dependencies between those modules.

use std::fmt;

use crate::store::{API_HOST, API_KEY};

/// Which credential field a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    ApiKey,
    ApiHost,
}

impl CredentialKind {
    /// Store entry the credential is persisted under.
    pub fn store_name(self) -> &'static str {
        match self {
            CredentialKind::ApiKey => API_KEY,
            CredentialKind::ApiHost => API_HOST,
        }
    }

    /// Label used in toasts and logs.
    pub fn label(self) -> &'static str {
        match self {
            CredentialKind::ApiKey => "API Key",
            CredentialKind::ApiHost => "ApiHost",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user-supplied credential awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub kind: CredentialKind,
    pub value: String,
}

impl Credential {
    pub fn new(kind: CredentialKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// A purchasable subscription product as reported by the billing provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub price: f64,
    pub currency_symbol: String,
}

impl Product {
    pub fn new(id: impl Into<String>, price: f64, currency_symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            price,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Price formatted for display, e.g. `$4.99`.
    pub fn localized_price(&self) -> String {
        format!("{}{:.2}", self.currency_symbol, self.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_price() {
        let product = Product::new("monthly", 4.99, "$");
        assert_eq!(product.localized_price(), "$4.99");

        let product = Product::new("monthly", 5.0, "€");
        assert_eq!(product.localized_price(), "€5.00");
    }

    #[test]
    fn test_credential_store_names() {
        assert_eq!(CredentialKind::ApiKey.store_name(), API_KEY);
        assert_eq!(CredentialKind::ApiHost.store_name(), API_HOST);
    }
}
