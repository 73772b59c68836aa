pub mod greedy;

// Common algorithm traits
use crate::error::OptimizeError;
use crate::models::{Coordinate, Plan, PlanKind, ShoppingList};

/// Lowest and highest accepted slider values
pub const SLIDER_MIN: i32 = 0;
pub const SLIDER_MAX: i32 = 10;

/// Rejects slider values outside `SLIDER_MIN..=SLIDER_MAX`
pub fn validate_slider(slider: i32) -> Result<i32, OptimizeError> {
    if (SLIDER_MIN..=SLIDER_MAX).contains(&slider) {
        Ok(slider)
    } else {
        Err(OptimizeError::InvalidSlider(slider))
    }
}

/// Trait for shopping-list plan solvers
pub trait PlanSolver {
    /// Produce the `[cheapest, balanced, single_store]` plans for a list
    fn optimize(
        &self,
        shopping_list: &ShoppingList,
        user: Coordinate,
        slider: i32,
    ) -> Result<Vec<Plan>, OptimizeError>;

    /// Assign every item to its cheapest offer, optionally restricted to one store,
    /// and price the result with the given per-store penalty
    fn assign(
        &self,
        shopping_list: &ShoppingList,
        user: Coordinate,
        store_penalty: f64,
        only_store: Option<&str>,
        kind: PlanKind,
    ) -> Plan;
}
