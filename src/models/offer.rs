// Offer model representing one store's price for one shopping list item

use serde::{Deserialize, Serialize};

use crate::models::{Coordinate, Cost, StoreId};

/// A store's priced fulfillment of a single shopping list item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOffer {
    /// Opaque store identifier, unique per store
    pub store_id: StoreId,

    /// Location of the store
    #[serde(rename = "storeLatLon")]
    pub location: Coordinate,

    /// Total price for the requested quantity (not unit price)
    pub price: Cost,
}

impl StoreOffer {
    /// Creates a new offer for the given store, location and total price
    pub fn new<S: Into<StoreId>>(store_id: S, location: Coordinate, price: Cost) -> Self {
        Self {
            store_id: store_id.into(),
            location,
            price,
        }
    }

    /// Checks whether this offer comes from the given store
    pub fn is_from(&self, store_id: &str) -> bool {
        self.store_id == store_id
    }
}
