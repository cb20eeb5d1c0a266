// Public API - what other modules can use
pub use models::SaleRecord;
pub use repository::{InMemorySalesRepository, SalesReader};

pub mod models;
pub mod repository;
