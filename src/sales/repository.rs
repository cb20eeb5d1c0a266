use async_trait::async_trait;
use std::sync::Mutex;
use tracing::{debug, instrument};

use super::models::SaleRecord;
use crate::shared::AppError;

/// Read-only port into the sales subsystem
#[async_trait]
pub trait SalesReader: Send + Sync {
    /// Lists every sale recorded for a seller, oldest first
    async fn list_sales(&self, store_id: i64, seller_id: i64)
        -> Result<Vec<SaleRecord>, AppError>;
}

/// In-memory implementation of SalesReader for development and testing
pub struct InMemorySalesRepository {
    sales: Mutex<Vec<SaleRecord>>,
}

impl Default for InMemorySalesRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySalesRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            sales: Mutex::new(Vec::new()),
        }
    }

    /// Creates an in-memory repository with pre-populated sales
    pub fn with_sales(sales: Vec<SaleRecord>) -> Self {
        Self {
            sales: Mutex::new(sales),
        }
    }

    /// Records a sale (the real writer lives in the sales subsystem)
    pub fn record_sale(&self, sale: SaleRecord) {
        self.sales.lock().unwrap().push(sale);
    }
}

#[async_trait]
impl SalesReader for InMemorySalesRepository {
    #[instrument(skip(self))]
    async fn list_sales(
        &self,
        store_id: i64,
        seller_id: i64,
    ) -> Result<Vec<SaleRecord>, AppError> {
        let sales = self.sales.lock().unwrap();
        let found: Vec<SaleRecord> = sales
            .iter()
            .filter(|s| s.store_id == store_id && s.seller_id == seller_id)
            .cloned()
            .collect();

        debug!(store_id, seller_id, count = found.len(), "Sales listed");
        Ok(found)
    }
}
