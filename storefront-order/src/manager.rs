use crate::models::{Order, OrderId, OrderStatus};

/// Result of a status change request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    Applied(OrderStatus),
    /// The user declined the confirmation; nothing changed.
    Declined,
}

impl Order {
    /// Transition: Pending → Fulfilled
    pub fn approve(&mut self) -> Result<TransitionOutcome, OrderError> {
        if self.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Fulfilled,
            });
        }

        self.status = OrderStatus::Fulfilled;
        Ok(TransitionOutcome::Applied(self.status))
    }

    /// Transition: Pending → Cancelled, only once `confirm` agrees.
    ///
    /// `confirm` is not consulted when the transition is not allowed.
    pub fn reject<F>(&mut self, confirm: F) -> Result<TransitionOutcome, OrderError>
    where
        F: FnOnce(&Order) -> bool,
    {
        if self.status != OrderStatus::Pending {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: OrderStatus::Cancelled,
            });
        }

        if !confirm(self) {
            return Ok(TransitionOutcome::Declined);
        }

        self.status = OrderStatus::Cancelled;
        Ok(TransitionOutcome::Applied(self.status))
    }
}

/// Find an order by id across any number of order lists.
pub fn find_order_mut<'a, I>(orders: I, order_id: &str) -> Result<&'a mut Order, OrderError>
where
    I: IntoIterator<Item = &'a mut Order>,
{
    orders
        .into_iter()
        .find(|order| order.id() == order_id)
        .ok_or_else(|| OrderError::NotFound(order_id.to_string()))
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition {
        from: OrderStatus,
        to: OrderStatus,
    },

    #[error("Cart is empty")]
    EmptyCart,
}
