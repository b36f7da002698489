//! Checkout session snapshot (identity + active cart).
//!
//! A [`CheckoutContext`] is the point-in-time view of "who is checking out
//! with which cart". It is taken at the moment an operation begins and
//! authorized before the operation is allowed to start.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{CartId, UserId};

/// The acting user for a checkout session.
///
/// Anonymous sessions are legitimate for guest checkout; everything else
/// requires a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionUser {
    Anonymous,
    Registered(UserId),
}

impl SessionUser {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, SessionUser::Anonymous)
    }
}

/// Snapshot of the checkout-relevant session state.
///
/// Produced by an external identity/cart provider; this crate only defines the
/// shape and the authorization rule applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutContext {
    pub user: SessionUser,
    pub cart_id: Option<CartId>,
    /// Whether the active cart is a guest cart (anonymous checkout allowed).
    pub guest_cart: bool,
}

impl CheckoutContext {
    /// Check that checkout conditions are met and return the authorized
    /// `(user, cart)` pair.
    ///
    /// Fails with [`DomainError::PreconditionFailed`] when no active cart
    /// exists, or when the session is anonymous and the cart is not a guest
    /// cart. Callers must not start the wrapped operation on failure.
    pub fn authorize(&self) -> DomainResult<(SessionUser, CartId)> {
        let cart_id = self
            .cart_id
            .ok_or_else(|| DomainError::precondition("no active cart"))?;

        if self.user.is_anonymous() && !self.guest_cart {
            return Err(DomainError::precondition(
                "anonymous session without a guest cart",
            ));
        }

        Ok((self.user.clone(), cart_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_user_with_cart_is_authorized() {
        let ctx = CheckoutContext {
            user: SessionUser::Registered(UserId::new()),
            cart_id: Some(CartId::new()),
            guest_cart: false,
        };
        assert!(ctx.authorize().is_ok());
    }

    #[test]
    fn missing_cart_fails_precondition() {
        let ctx = CheckoutContext {
            user: SessionUser::Registered(UserId::new()),
            cart_id: None,
            guest_cart: false,
        };
        assert!(matches!(
            ctx.authorize(),
            Err(DomainError::PreconditionFailed(_))
        ));
    }

    #[test]
    fn anonymous_user_requires_guest_cart() {
        let cart_id = CartId::new();
        let denied = CheckoutContext {
            user: SessionUser::Anonymous,
            cart_id: Some(cart_id),
            guest_cart: false,
        };
        assert!(denied.authorize().is_err());

        let allowed = CheckoutContext {
            user: SessionUser::Anonymous,
            cart_id: Some(cart_id),
            guest_cart: true,
        };
        assert_eq!(
            allowed.authorize().unwrap(),
            (SessionUser::Anonymous, cart_id)
        );
    }
}
