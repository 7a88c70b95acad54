use storefront_catalog::ProductError;
use storefront_core::{AccountError, CoreError, Notice, StoreError};
use storefront_order::OrderError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AppError {
    /// The message shown to the user for this failure.
    ///
    /// Storage failures are logged here and shown generically.
    pub fn into_notice(self) -> Notice {
        match self {
            AppError::Core(CoreError::Store(err)) => {
                tracing::error!("Storage error: {}", err);
                Notice::danger("Could not save changes, please try again")
            }
            AppError::Core(err) => {
                tracing::debug!("Rejected request: {}", err);
                Notice::from(&err)
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<ProductError> for AppError {
    fn from(err: ProductError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        AppError::Core(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::NoticeLevel;
    use storefront_order::OrderStatus;

    #[test]
    fn test_transition_error_becomes_warning_notice() {
        let err = AppError::from(OrderError::InvalidTransition {
            from: OrderStatus::Fulfilled,
            to: OrderStatus::Cancelled,
        });
        let notice = err.into_notice();
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert!(notice.message.contains("Đã giao hàng"));
    }

    #[test]
    fn test_storage_error_is_generic() {
        let err = AppError::from(StoreError::Io {
            key: "ListUser".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        });
        let notice = err.into_notice();
        assert_eq!(notice.level, NoticeLevel::Danger);
        assert!(!notice.message.contains("disk"));
    }
}
