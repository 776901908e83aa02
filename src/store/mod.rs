//! Persistence for identification results
//!
//! Performs one insert per identification into the hosted Supabase
//! `identifications` table. Backend errors are surfaced unmodified.

pub mod client;
pub mod mock;

pub use client::SupabaseClient;
pub use mock::MockStoreClient;

use crate::models::IdentificationRecord;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait StoreService: Send + Sync {
    async fn save_identification(&self, record: &IdentificationRecord) -> Result<()>;
}
