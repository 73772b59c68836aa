pub mod distance;
pub mod routing;
