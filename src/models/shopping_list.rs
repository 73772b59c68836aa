// Shopping list model: the items a user wants, each with its candidate offers

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Coordinate, ProductId, StoreId, StoreOffer};

/// One line of a shopping list together with every store that can fulfill it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    /// Product identifier
    pub product_id: ProductId,

    /// Requested quantity (informational, offer prices already include it)
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Candidate offers, in the order supplied by the caller
    #[serde(default)]
    pub candidate_stores: Vec<StoreOffer>,
}

fn default_quantity() -> u32 {
    1
}

impl ShoppingListItem {
    /// Creates an item with no offers yet
    pub fn new<S: Into<ProductId>>(product_id: S, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            candidate_stores: Vec::new(),
        }
    }

    /// Builder-style helper that appends an offer
    pub fn with_offer<S: Into<StoreId>>(
        mut self,
        store_id: S,
        location: Coordinate,
        price: f64,
    ) -> Self {
        self.candidate_stores
            .push(StoreOffer::new(store_id, location, price));
        self
    }

    /// An item with no offers cannot be bought anywhere
    pub fn is_available(&self) -> bool {
        !self.candidate_stores.is_empty()
    }

    /// Cheapest offer among those accepted by `filter`.
    /// Ties keep the first offer in input order.
    pub fn cheapest_offer<F>(&self, filter: F) -> Option<&StoreOffer>
    where
        F: Fn(&StoreOffer) -> bool,
    {
        let mut best: Option<&StoreOffer> = None;
        for offer in self.candidate_stores.iter().filter(|o| filter(o)) {
            if best.map_or(true, |current| offer.price < current.price) {
                best = Some(offer);
            }
        }
        best
    }
}

/// Represents a user's shopping list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShoppingList {
    /// Items in caller order
    pub items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Creates a new empty shopping list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends an item to the list
    pub fn add_item(&mut self, item: ShoppingListItem) {
        self.items.push(item);
    }

    /// Gets the number of lines in the list
    pub fn unique_product_count(&self) -> usize {
        self.items.len()
    }

    /// Gets the total number of units requested
    pub fn total_item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// First product identifier that occurs on more than one line
    pub fn duplicate_product(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.items
            .iter()
            .map(|item| item.product_id.as_str())
            .find(|product_id| !seen.insert(*product_id))
    }

    /// Every store identifier offering at least one item, in order of first appearance
    pub fn store_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for offer in self.items.iter().flat_map(|item| &item.candidate_stores) {
            if seen.insert(offer.store_id.as_str()) {
                ordered.push(offer.store_id.as_str());
            }
        }
        ordered
    }

    /// Distinct store coordinates across all offers, in order of first appearance
    pub fn store_locations(&self) -> Vec<Coordinate> {
        let mut seen = HashSet::new();
        let mut locations = Vec::new();
        for offer in self.items.iter().flat_map(|item| &item.candidate_stores) {
            let key = (offer.location.lat.to_bits(), offer.location.lon.to_bits());
            if seen.insert(key) {
                locations.push(offer.location);
            }
        }
        locations
    }

    /// Product identifiers with no offers at all
    pub fn unavailable_products(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| !item.is_available())
            .map(|item| item.product_id.as_str())
            .collect()
    }
}

impl From<Vec<ShoppingListItem>> for ShoppingList {
    fn from(items: Vec<ShoppingListItem>) -> Self {
        Self { items }
    }
}
