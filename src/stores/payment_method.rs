//! Defines the payment method store trait.

use crate::{
    Error,
    auth::Session,
    models::{DatabaseId, MethodName, PaymentMethod},
};

/// Creates and retrieves payment methods.
pub trait PaymentMethodStore {
    /// Create a new payment method and add it to the store.
    ///
    /// Only admins may create payment methods.
    fn create(&self, actor: &Session, name: MethodName) -> Result<PaymentMethod, Error>;

    /// Get a payment method by its ID.
    fn get(&self, method_id: DatabaseId) -> Result<PaymentMethod, Error>;

    /// Get a payment method by its exact name.
    fn get_by_name(&self, name: &str) -> Result<PaymentMethod, Error>;

    /// Get all payment methods, ordered by ID.
    fn get_all(&self) -> Result<Vec<PaymentMethod>, Error>;
}
