use rayon::prelude::*;
use tracing::debug;

use crate::algorithms::{validate_slider, PlanSolver};
use crate::config::OptimizerConfig;
use crate::error::OptimizeError;
use crate::models::{Coordinate, Cost, Plan, PlanKind, ShoppingList, StoreId};
use crate::utils::distance::{CentroidEstimator, DistanceEstimator};

/// Per-store penalty for the slider-driven plans.
///
/// Grows linearly from `base * 0.5` at slider 0 to `base * 1.0` at slider 10.
pub fn lambda1_for_slider(slider: i32, config: &OptimizerConfig) -> f64 {
    config.store_penalty_base * (0.5 + slider as f64 / 20.0)
}

/// Greedy per-item planner.
///
/// Each item independently takes its cheapest admissible offer. This is a
/// heuristic with predictable latency, not a joint optimum over all items.
pub struct GreedyPlanner {
    config: OptimizerConfig,
    estimator: Box<dyn DistanceEstimator>,
}

impl GreedyPlanner {
    /// Creates a planner that estimates distance with the store centroid
    pub fn new(config: OptimizerConfig) -> Self {
        let estimator = CentroidEstimator {
            earth_radius_km: config.earth_radius_km,
        };
        Self::with_estimator(config, estimator)
    }

    /// Creates a planner with a custom distance estimator
    pub fn with_estimator<E>(config: OptimizerConfig, estimator: E) -> Self
    where
        E: DistanceEstimator + 'static,
    {
        Self {
            config,
            estimator: Box::new(estimator),
        }
    }

    /// Best plan that buys everything it can at a single store.
    /// Stores are tried in first-appearance order and ties keep the earlier store.
    fn best_single_store(
        &self,
        shopping_list: &ShoppingList,
        user: Coordinate,
        store_penalty: f64,
    ) -> Option<Plan> {
        let store_ids = shopping_list.store_ids();
        let evaluate = |store_id: &&str| {
            self.assign(
                shopping_list,
                user,
                store_penalty,
                Some(*store_id),
                PlanKind::SingleStore,
            )
        };

        let candidates: Vec<Plan> = if store_ids.len() >= self.config.parallel_store_threshold {
            store_ids.par_iter().map(evaluate).collect()
        } else {
            store_ids.iter().map(evaluate).collect()
        };

        candidates
            .into_iter()
            .reduce(|best, candidate| if candidate.beats(&best) { candidate } else { best })
    }
}

impl Default for GreedyPlanner {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl PlanSolver for GreedyPlanner {
    fn optimize(
        &self,
        shopping_list: &ShoppingList,
        user: Coordinate,
        slider: i32,
    ) -> Result<Vec<Plan>, OptimizeError> {
        let slider = validate_slider(slider)?;
        // A repeated product would leave a store counted that the assignment no longer names
        if let Some(product_id) = shopping_list.duplicate_product() {
            return Err(OptimizeError::DuplicateProduct(product_id.to_string()));
        }
        let store_penalty = lambda1_for_slider(slider, &self.config);

        let cheapest = self.assign(
            shopping_list,
            user,
            self.config.cheapest_store_penalty,
            None,
            PlanKind::Cheapest,
        );
        let balanced = self.assign(shopping_list, user, store_penalty, None, PlanKind::Balanced);

        // No store anywhere: the balanced result stands in
        let single_store = self
            .best_single_store(shopping_list, user, store_penalty)
            .unwrap_or_else(|| balanced.clone().relabeled(PlanKind::SingleStore));

        debug!(
            items = shopping_list.unique_product_count(),
            units = shopping_list.total_item_count(),
            unavailable = ?shopping_list.unavailable_products(),
            slider,
            cheapest = cheapest.total,
            balanced = balanced.total,
            single_store = single_store.total,
            "computed plans"
        );

        Ok(vec![cheapest, balanced, single_store])
    }

    fn assign(
        &self,
        shopping_list: &ShoppingList,
        user: Coordinate,
        store_penalty: f64,
        only_store: Option<&str>,
        kind: PlanKind,
    ) -> Plan {
        let mut plan = Plan::empty(kind);
        // Distinct stores with the location of the offer that first picked them
        let mut visited: Vec<(&StoreId, Coordinate)> = Vec::new();
        let mut raw_total: Cost = 0.0;

        for item in &shopping_list.items {
            let best = item.cheapest_offer(|offer| only_store.map_or(true, |s| offer.is_from(s)));
            let Some(offer) = best else {
                plan.omitted.push(item.product_id.clone());
                continue;
            };

            plan.assignments.insert(item.product_id.clone(), offer.store_id.clone());
            if !visited.iter().any(|(id, _)| *id == &offer.store_id) {
                visited.push((&offer.store_id, offer.location));
            }
            raw_total += offer.price;
        }

        let locations: Vec<Coordinate> = visited.iter().map(|(_, loc)| *loc).collect();
        plan.stores_used = visited.len();
        plan.km_est = self.estimator.estimate_km(user, &locations);
        plan.raw_total = raw_total;
        plan.total = raw_total
            + store_penalty * plan.stores_used as f64
            + self.config.km_penalty * plan.km_est;
        plan
    }
}
