pub mod identity;
pub mod notice;
pub mod repository;

use storefront_catalog::ProductError;
use storefront_order::OrderError;

pub use identity::{AccountError, Registration, UserAccount};
pub use notice::{Notice, NoticeLevel};
pub use repository::{CatalogProvider, StoreError, UserProvider};

/// How a failure should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A product, order or user that is not there.
    MissingReference,
    /// A status change out of a terminal state.
    InvalidTransition,
    /// Form or request data that failed validation before any mutation.
    InvalidInput,
    /// The persisted store could not be read or written.
    Storage,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Product(ProductError::NotFound(_)) => ErrorKind::MissingReference,
            CoreError::Product(_) => ErrorKind::InvalidInput,
            CoreError::Order(OrderError::NotFound(_)) => ErrorKind::MissingReference,
            CoreError::Order(OrderError::InvalidTransition { .. }) => ErrorKind::InvalidTransition,
            CoreError::Order(OrderError::EmptyCart) => ErrorKind::InvalidInput,
            CoreError::Account(AccountError::NotFound(_)) => ErrorKind::MissingReference,
            CoreError::Account(_) => ErrorKind::InvalidInput,
            CoreError::Store(_) => ErrorKind::Storage,
        }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
