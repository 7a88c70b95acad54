use std::collections::HashMap;
use crate::product::Product;

/// Read-only view over a catalog keyed by product code.
///
/// Built once per render from the product list. When a code appears more than
/// once the first product wins, matching a front-to-back lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog<'a> {
    products: &'a [Product],
    by_id: HashMap<&'a str, &'a Product>,
}

impl<'a> Catalog<'a> {
    pub fn new(products: &'a [Product]) -> Self {
        let mut by_id = HashMap::with_capacity(products.len());
        for product in products {
            by_id.entry(product.id.as_str()).or_insert(product);
        }
        Self { products, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Product> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn products(&self) -> &'a [Product] {
        self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> From<&'a [Product]> for Catalog<'a> {
    fn from(products: &'a [Product]) -> Self {
        Self::new(products)
    }
}

impl<'a> From<&'a Vec<Product>> for Catalog<'a> {
    fn from(products: &'a Vec<Product>) -> Self {
        Self::new(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_product_wins_on_duplicate_code() {
        let products = vec![
            Product::new("A", "First", "Apple", 10),
            Product::new("A", "Second", "Apple", 20),
            Product::new("B", "Other", "Oppo", 30),
        ];
        let catalog = Catalog::new(&products);

        assert_eq!(catalog.get("A").map(|p| p.name.as_str()), Some("First"));
        assert!(catalog.contains("B"));
        assert!(catalog.get("Z").is_none());
        assert_eq!(catalog.len(), 3);
    }
}
