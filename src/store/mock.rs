use super::StoreService;
use crate::models::IdentificationRecord;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockStoreClient {
    records: Arc<Mutex<Vec<IdentificationRecord>>>,
    failure: Arc<Mutex<Option<String>>>,
    save_count: Arc<Mutex<usize>>,
}

impl MockStoreClient {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            failure: Arc::new(Mutex::new(None)),
            save_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Make every subsequent save fail with the given message.
    pub fn with_failure(self, message: String) -> Self {
        *self.failure.lock().unwrap() = Some(message);
        self
    }

    pub fn get_save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }

    pub fn get_records(&self) -> Vec<IdentificationRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for MockStoreClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoreService for MockStoreClient {
    async fn save_identification(&self, record: &IdentificationRecord) -> Result<()> {
        let mut count = self.save_count.lock().unwrap();
        *count += 1;

        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(Error::Store(message));
        }

        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
