// Public modules
pub mod algorithms;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod utils;

// Re-exports for convenience
pub use algorithms::greedy::GreedyPlanner;
pub use algorithms::PlanSolver;
pub use config::{load_config, OptimizerConfig, RoutingConfig};
pub use error::{ConfigError, OptimizeError, ServiceError};
pub use models::{Coordinate, Plan, PlanKind, ShoppingList, ShoppingListItem, StoreOffer};
