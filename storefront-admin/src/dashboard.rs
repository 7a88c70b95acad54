use serde::Serialize;
use storefront_catalog::Catalog;
use storefront_order::{aggregate_by_company, GroupStats, SalesCharts};

use crate::error::AppResult;
use crate::state::AppState;

/// Sales per brand across every customer's non-cancelled orders.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub stats: GroupStats,
    pub charts: SalesCharts,
}

pub fn sales_report(state: &AppState) -> AppResult<SalesReport> {
    let users = state.users.users()?;
    let products = state.catalog.products()?;
    let catalog = Catalog::new(&products);

    let stats = aggregate_by_company(users.iter().flat_map(|u| u.orders.iter()), &catalog);
    tracing::debug!("Sales report over {} brands", stats.len());

    Ok(SalesReport {
        charts: SalesCharts::from(&stats),
        stats,
    })
}
