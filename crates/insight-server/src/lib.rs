// Insight Manager server library
// HTTP surface over the insight and master option services

pub mod api; // API handlers and routing
pub mod error; // HTTP error mapping
pub mod middleware; // HTTP middleware
pub mod model; // Configuration, state and response models
pub mod secured; // Role guard for write endpoints
pub mod startup; // Server, logging and shutdown setup

pub use model::{AppState, Configuration, ErrorResult};
pub use secured::{Secured, SecuredBuilder};
