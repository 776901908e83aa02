use super::IdentifyService;
use crate::models::{IdentificationResult, Modality};
use crate::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockIdentifyClient {
    results: Arc<Mutex<Vec<IdentificationResult>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockIdentifyClient {
    pub fn new() -> Self {
        Self {
            results: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_result(self, result: IdentificationResult) -> Self {
        self.results.lock().unwrap().push(result);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    fn next_result(&self, modality: Modality) -> IdentificationResult {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        let results = self.results.lock().unwrap();
        if results.is_empty() {
            default_result(modality)
        } else {
            let index = (*count - 1) % results.len();
            results[index].clone()
        }
    }
}

impl Default for MockIdentifyClient {
    fn default() -> Self {
        Self::new()
    }
}

fn default_result(modality: Modality) -> IdentificationResult {
    IdentificationResult {
        name: "Peace Lily".to_string(),
        scientific_name: "Spathiphyllum wallisii".to_string(),
        confidence: modality.default_confidence(),
        description: Some("A shade-loving houseplant with white blooms".to_string()),
        native_region: Some("Central America".to_string()),
        common_uses: None,
        light_requirements: Some("Bright indirect light".to_string()),
        watering_needs: Some("Weekly".to_string()),
        temperature_range: None,
        additional_tips: vec!["Mist the leaves occasionally".to_string()],
        care_info: Some("Keep away from cold drafts".to_string()),
        image_source: modality,
    }
}

#[async_trait]
impl IdentifyService for MockIdentifyClient {
    async fn identify_with_text(&self, _description: &str) -> Result<IdentificationResult> {
        Ok(self.next_result(Modality::Text))
    }

    async fn identify_with_image(&self, _image_bytes: &[u8]) -> Result<IdentificationResult> {
        Ok(self.next_result(Modality::Upload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_identify_default_result() {
        let client = MockIdentifyClient::new();

        let result = client.identify_with_text("white flowers").await.unwrap();
        assert_eq!(result.name, "Peace Lily");
        assert_eq!(result.image_source, Modality::Text);
        assert_eq!(result.confidence, 0.7);

        let result = client.identify_with_image(&[0xFF, 0xD8]).await.unwrap();
        assert_eq!(result.image_source, Modality::Upload);
        assert_eq!(result.confidence, 0.85);
    }

    #[tokio::test]
    async fn test_mock_identify_cycles_scripted_results() {
        let mut first = default_result(Modality::Text);
        first.name = "Rose".to_string();
        let mut second = default_result(Modality::Text);
        second.name = "Tulip".to_string();

        let client = MockIdentifyClient::new().with_result(first).with_result(second);

        assert_eq!(client.identify_with_text("a").await.unwrap().name, "Rose");
        assert_eq!(client.identify_with_text("b").await.unwrap().name, "Tulip");
        // Should cycle back
        assert_eq!(client.identify_with_text("c").await.unwrap().name, "Rose");
        assert_eq!(client.get_call_count(), 3);
    }
}
