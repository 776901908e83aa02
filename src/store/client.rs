use super::StoreService;
use crate::models::IdentificationRecord;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self::new_with_client(base_url, anon_key, Client::new())
    }

    pub fn new_with_client(base_url: String, anon_key: String, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
        }
    }
}

#[async_trait]
impl StoreService for SupabaseClient {
    async fn save_identification(&self, record: &IdentificationRecord) -> Result<()> {
        tracing::debug!("Saving identification record to Supabase");

        let url = format!("{}/rest/v1/identifications", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(30))
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to send record to Supabase: {}", e);
                Error::Store(format!("Failed to reach Supabase: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Supabase error (status {}): {}", status, error_text);
            return Err(Error::Store(format!(
                "Supabase error (status {}): {}",
                status, error_text
            )));
        }

        Ok(())
    }
}
