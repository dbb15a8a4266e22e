use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single priced product on the menu.
///
/// Reference data only: records snapshot the price and margin at creation
/// time, so later menu edits never touch existing ledger rows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: u32,
    pub name: String,
    pub unit_price: Decimal,
    pub unit_profit: Decimal,
}

/// Insertion-ordered menu catalog with lookup by product name.
#[derive(Clone, Debug, Default)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Look up a product by its exact name.
    pub fn get(&self, name: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
