use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use storefront_catalog::{resolve_unit_price, Catalog, Product};
use storefront_shared::Dong;
use crate::models::{Order, OrderStatus};

/// Units sold and revenue for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsEntry {
    pub quantity_sold: u64,
    pub revenue: Dong,
}

/// Group key → totals, in the order groups were first encountered.
pub type GroupStats = IndexMap<String, StatsEntry>;

/// Roll up every non-cancelled order line into per-group totals.
///
/// Lines whose product is gone from the catalog are skipped, as are products
/// whose group key is empty. Output depends only on the inputs.
pub fn aggregate_by_group<'a, 'o, I, F>(orders: I, catalog: &Catalog<'a>, group_key: F) -> GroupStats
where
    I: IntoIterator<Item = &'o Order>,
    F: Fn(&'a Product) -> &'a str,
{
    let mut stats = GroupStats::new();

    for order in orders {
        if order.status == OrderStatus::Cancelled {
            continue;
        }

        for item in &order.items {
            let Some(product) = catalog.get(&item.product_id) else {
                continue;
            };
            let key = group_key(product);
            if key.is_empty() {
                continue;
            }

            let quantity = u64::from(item.quantity);
            let revenue = resolve_unit_price(product).saturating_mul(quantity);

            match stats.get_mut(key) {
                Some(entry) => {
                    entry.quantity_sold = entry.quantity_sold.saturating_add(quantity);
                    entry.revenue = entry.revenue.saturating_add(revenue);
                }
                None => {
                    stats.insert(
                        key.to_string(),
                        StatsEntry {
                            quantity_sold: quantity,
                            revenue,
                        },
                    );
                }
            }
        }
    }

    stats
}

/// Per-brand rollup used by the admin dashboard.
pub fn aggregate_by_company<'a, 'o, I>(orders: I, catalog: &Catalog<'a>) -> GroupStats
where
    I: IntoIterator<Item = &'o Order>,
{
    aggregate_by_group(orders, catalog, |product| product.company.as_str())
}

/// Data for the two dashboard charts: units sold (bar) and revenue (doughnut).
/// All three vectors share the same index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesCharts {
    pub labels: Vec<String>,
    pub quantities: Vec<u64>,
    pub revenues: Vec<Dong>,
}

impl From<&GroupStats> for SalesCharts {
    fn from(stats: &GroupStats) -> Self {
        let mut charts = SalesCharts::default();
        for (label, entry) in stats {
            charts.labels.push(label.clone());
            charts.quantities.push(entry.quantity_sold);
            charts.revenues.push(entry.revenue);
        }
        charts
    }
}
