//! This file defines payment methods and their validated name type.

use std::fmt::Display;

use crate::{Error, models::DatabaseId};

/// The name of a payment method. Must be a non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodName(String);

impl MethodName {
    /// Create and validate a payment method name.
    ///
    /// The name is trimmed of surrounding whitespace.
    ///
    /// # Errors
    /// Returns an [Error::InvalidValue] if `name` is empty or all whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::InvalidValue(
                "payment method name cannot be empty".to_owned(),
            ));
        }

        Ok(Self(name.to_owned()))
    }

    /// Create a payment method name without validation.
    ///
    /// The caller should ensure `name` is non-empty, e.g. because it was read
    /// back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for MethodName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for MethodName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A payment method that expenses can be paid with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaymentMethod {
    /// The ID of the payment method.
    pub id: DatabaseId,
    /// The unique name of the payment method.
    pub name: MethodName,
}

#[cfg(test)]
mod method_name_tests {
    use crate::Error;

    use super::MethodName;

    #[test]
    fn new_fails_on_empty_name() {
        let result = MethodName::new("");

        assert!(matches!(result, Err(Error::InvalidValue(_))));
    }

    #[test]
    fn new_trims_surrounding_whitespace() {
        let name = MethodName::new(" Card  ").unwrap();

        assert_eq!(name.as_ref(), "Card");
    }
}
