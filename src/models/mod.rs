// Models module - exports all model types

mod coordinate;
mod offer;
mod plan;
mod shopping_list;

// Re-export model types
pub use self::coordinate::Coordinate;
pub use self::offer::StoreOffer;
pub use self::plan::{Plan, PlanKind};
pub use self::shopping_list::{ShoppingList, ShoppingListItem};

// Common type aliases for improved code readability
pub type ProductId = String;
pub type StoreId = String;
pub type Cost = f64;
pub type Km = f64;
