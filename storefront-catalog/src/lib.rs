pub mod product;
pub mod pricing;
pub mod snapshot;
pub mod browse;
pub mod form;

pub use product::{next_product_code, Product, ProductError, ProductId, Promotion, PromotionKind, TechSpecs};
pub use pricing::{discount_percentage, resolve_unit_price};
pub use snapshot::Catalog;
pub use browse::{FilterCriteria, PriceBand, SortOrder};
pub use form::ProductForm;
