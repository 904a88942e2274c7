//! The checkout workflow.
//!
//! One purchase moves through `NoShipping -> ShippingEntered ->
//! OrderConfirmed -> payment`, carried by a [`CheckoutSession`] value object
//! stored in the visitor's session. Each step's handler asks the session
//! which stage it is in and redirects backwards when a prerequisite is
//! missing, so deep links into the flow degrade to the right form instead of
//! erroring. Payment submission is terminal: success clears the whole
//! session object (and the cart), failure leaves it intact for a manual
//! retry.

pub mod pricing;
pub mod report;

pub use pricing::OrderQuote;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Address fields required before checkout can proceed.
///
/// Presence (all fields non-empty) is the gate checked when the confirm step
/// is entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub address: String,
    pub city: String,
    pub phone: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

impl ShippingInfo {
    /// Whether every field carries a non-blank value.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [
            &self.address,
            &self.city,
            &self.phone,
            &self.postal_code,
            &self.state,
            &self.country,
        ]
        .into_iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Where in the workflow a checkout session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStage {
    /// No (complete) shipping information yet.
    NoShipping,
    /// Shipping saved; the order has not been confirmed.
    ShippingEntered,
    /// Pricing confirmed; payment may be submitted.
    OrderConfirmed,
}

/// Errors from illegal stage transitions.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Shipping fields were missing or blank.
    #[error("shipping information is incomplete")]
    IncompleteShipping,
}

/// The checkout slice: one in-flight purchase.
///
/// Replaces ambient scratch storage with an explicit value object that lives
/// exactly as long as the workflow. The idempotency key is minted once per
/// session and attached to every payment-intent request, so a double submit
/// or a refresh of the payment step reuses the same processor-side intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    shipping: Option<ShippingInfo>,
    quote: Option<OrderQuote>,
    idempotency_key: Uuid,
}

impl CheckoutSession {
    /// Start a fresh checkout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shipping: None,
            quote: None,
            idempotency_key: Uuid::new_v4(),
        }
    }

    /// Current stage, derived from which values are present.
    #[must_use]
    pub const fn stage(&self) -> CheckoutStage {
        match (&self.shipping, &self.quote) {
            (None, _) => CheckoutStage::NoShipping,
            (Some(_), None) => CheckoutStage::ShippingEntered,
            (Some(_), Some(_)) => CheckoutStage::OrderConfirmed,
        }
    }

    /// Save shipping information, entering `ShippingEntered`.
    ///
    /// Any previously confirmed quote is dropped: changing the address sends
    /// the visitor back through confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteShipping`] when any field is blank;
    /// the session is left unchanged.
    pub fn enter_shipping(&mut self, shipping: ShippingInfo) -> Result<(), CheckoutError> {
        if !shipping.is_complete() {
            return Err(CheckoutError::IncompleteShipping);
        }
        self.shipping = Some(shipping);
        self.quote = None;
        Ok(())
    }

    /// Fix the order pricing, entering `OrderConfirmed`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::IncompleteShipping`] when shipping has not
    /// been entered yet.
    pub fn confirm(&mut self, quote: OrderQuote) -> Result<(), CheckoutError> {
        if self.shipping.is_none() {
            return Err(CheckoutError::IncompleteShipping);
        }
        self.quote = Some(quote);
        Ok(())
    }

    /// Shipping info, if entered.
    #[must_use]
    pub const fn shipping(&self) -> Option<&ShippingInfo> {
        self.shipping.as_ref()
    }

    /// The confirmed quote, if the session reached `OrderConfirmed`.
    #[must_use]
    pub const fn quote(&self) -> Option<&OrderQuote> {
        self.quote.as_ref()
    }

    /// The per-checkout idempotency key.
    #[must_use]
    pub const fn idempotency_key(&self) -> Uuid {
        self.idempotency_key
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use meridian_core::Money;

    fn shipping() -> ShippingInfo {
        ShippingInfo {
            address: "12 Harbor Lane".to_string(),
            city: "Portsmouth".to_string(),
            phone: "555-0142".to_string(),
            postal_code: "03801".to_string(),
            state: "NH".to_string(),
            country: "US".to_string(),
        }
    }

    #[test]
    fn test_starts_without_shipping() {
        let session = CheckoutSession::new();
        assert_eq!(session.stage(), CheckoutStage::NoShipping);
        assert!(session.shipping().is_none());
        assert!(session.quote().is_none());
    }

    #[test]
    fn test_enter_shipping_advances_stage() {
        let mut session = CheckoutSession::new();
        session.enter_shipping(shipping()).unwrap();
        assert_eq!(session.stage(), CheckoutStage::ShippingEntered);
    }

    #[test]
    fn test_incomplete_shipping_rejected() {
        let mut session = CheckoutSession::new();
        let mut info = shipping();
        info.city = "   ".to_string();

        assert_eq!(
            session.enter_shipping(info),
            Err(CheckoutError::IncompleteShipping)
        );
        assert_eq!(session.stage(), CheckoutStage::NoShipping);
    }

    #[test]
    fn test_confirm_requires_shipping() {
        let mut session = CheckoutSession::new();
        let quote = OrderQuote::for_subtotal(Money::from_major(250));

        assert_eq!(
            session.confirm(quote),
            Err(CheckoutError::IncompleteShipping)
        );

        session.enter_shipping(shipping()).unwrap();
        session.confirm(quote).unwrap();
        assert_eq!(session.stage(), CheckoutStage::OrderConfirmed);
        assert_eq!(session.quote(), Some(&quote));
    }

    #[test]
    fn test_changing_shipping_drops_quote() {
        let mut session = CheckoutSession::new();
        session.enter_shipping(shipping()).unwrap();
        session
            .confirm(OrderQuote::for_subtotal(Money::from_major(100)))
            .unwrap();

        session.enter_shipping(shipping()).unwrap();
        assert_eq!(session.stage(), CheckoutStage::ShippingEntered);
        assert!(session.quote().is_none());
    }

    #[test]
    fn test_idempotency_key_is_stable() {
        let mut session = CheckoutSession::new();
        let key = session.idempotency_key();

        session.enter_shipping(shipping()).unwrap();
        session
            .confirm(OrderQuote::for_subtotal(Money::from_major(100)))
            .unwrap();

        assert_eq!(session.idempotency_key(), key);
    }
}
