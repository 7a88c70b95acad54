pub mod models;
pub mod manager;
pub mod calculator;
pub mod stats;
pub mod cart;

pub use models::{clamp_quantity, LineItem, Order, OrderId, OrderStatus, ShippingInfo, MAX_QUANTITY};
pub use manager::{find_order_mut, OrderError, TransitionOutcome};
pub use calculator::{compute_cart_total, compute_line_total, compute_order_total, CartSummary, CheckoutRules};
pub use stats::{aggregate_by_company, aggregate_by_group, GroupStats, SalesCharts, StatsEntry};
pub use cart::Cart;
