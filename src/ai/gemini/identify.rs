use super::client::GeminiHttpClient;
use super::types::{build_request, GenerateContentResponse, InlineData, Part};
use crate::ai::{mime, IdentifyService};
use crate::credentials::CredentialStore;
use crate::models::{IdentificationResult, Modality};
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub struct GeminiIdentifyClient {
    http: GeminiHttpClient,
}

impl GeminiIdentifyClient {
    pub fn new(credentials: Arc<CredentialStore>, model: String) -> Self {
        Self::new_with_client(credentials, model, reqwest::Client::new())
    }

    pub fn new_with_client(
        credentials: Arc<CredentialStore>,
        model: String,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                credentials,
                model,
                Duration::from_secs(30),
                client,
            ),
        }
    }

    async fn identify(
        &self,
        prompt: String,
        media: Option<InlineData>,
        modality: Modality,
    ) -> Result<IdentificationResult> {
        let request = build_request(&prompt, media);
        let response: GenerateContentResponse = self.http.generate_content(&request).await?;

        if let Some(error) = response.error {
            return Err(Error::Provider(
                error
                    .message
                    .unwrap_or_else(|| "Failed to identify plant".to_string()),
            ));
        }

        let text = extract_text(&response)?;
        let span = json_span(text).ok_or_else(|| {
            Error::Parse("Could not parse plant data from response".to_string())
        })?;
        let payload: Value = serde_json::from_str(span)?;

        Ok(result_from_payload(&payload, modality))
    }
}

/// Drill into `candidates[0].content.parts[0].text`. Any missing link is the
/// same invalid-response failure.
fn extract_text(response: &GenerateContentResponse) -> Result<&str> {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.parts.first())
        .and_then(|part| match part {
            Part::Text { text } => Some(text.as_str()),
            Part::InlineData { .. } => None,
        })
        .ok_or_else(|| Error::Parse("Invalid response from Gemini API".to_string()))
}

/// Greedy brace-delimited span: first `{` through last `}`.
///
/// Intentionally greedy. Two independent JSON objects in one blob produce a
/// single span whose parse failure then surfaces to the caller.
fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Coerce the loosely-shaped model payload into a result, field by field.
/// Unrecognized fields are dropped.
fn result_from_payload(payload: &Value, modality: Modality) -> IdentificationResult {
    IdentificationResult {
        name: string_field(payload, "name").unwrap_or_default(),
        scientific_name: string_field(payload, "scientificName")
            .unwrap_or_else(|| "Unknown".to_string()),
        confidence: payload
            .get("confidence")
            .and_then(Value::as_f64)
            .unwrap_or_else(|| modality.default_confidence()),
        description: string_field(payload, "description"),
        native_region: string_field(payload, "nativeRegion"),
        common_uses: string_field(payload, "commonUses"),
        light_requirements: string_field(payload, "lightRequirements"),
        watering_needs: string_field(payload, "wateringNeeds"),
        temperature_range: string_field(payload, "temperatureRange"),
        additional_tips: payload
            .get("additionalTips")
            .and_then(Value::as_array)
            .map(|tips| {
                tips.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        care_info: string_field(payload, "careInfo"),
        image_source: modality,
    }
}

fn string_field(payload: &Value, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiIdentifyClient);

#[async_trait]
impl IdentifyService for GeminiIdentifyClient {
    async fn identify_with_text(&self, description: &str) -> Result<IdentificationResult> {
        tracing::debug!(
            "Identifying plant from text description ({} chars)",
            description.len()
        );

        let prompt = prompts::render(prompts::IDENTIFY_TEXT, &[("description", description)]);
        self.identify(prompt, None, Modality::Text).await
    }

    async fn identify_with_image(&self, image_bytes: &[u8]) -> Result<IdentificationResult> {
        tracing::debug!("Identifying plant from image ({} bytes)", image_bytes.len());

        use base64::Engine as _;
        let media = InlineData {
            mime_type: mime::detect_image_mime(image_bytes).to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(image_bytes),
        };

        self.identify(prompts::IDENTIFY_IMAGE.to_string(), Some(media), Modality::Upload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::test_support;
    use std::path::PathBuf;
    use wiremock::matchers::body_string_contains;
    use wiremock::{MockServer, ResponseTemplate};

    const TEST_MODEL: &str = "gemini-2.5-flash";

    fn make_client(server: &MockServer) -> GeminiIdentifyClient {
        let credentials = Arc::new(CredentialStore::new(
            PathBuf::from("/nonexistent/leaflens-key"),
            Some("test-key".to_string()),
        ));
        GeminiIdentifyClient::new(credentials, TEST_MODEL.to_string())
            .with_base_url(server.uri())
    }

    fn text_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": text }] }
            }]
        })
    }

    #[tokio::test]
    async fn test_identify_with_text_parses_full_payload() {
        let server = MockServer::start().await;

        let model_text = r#"Here you go:
{
  "name": "Peace Lily",
  "scientificName": "Spathiphyllum wallisii",
  "confidence": 0.93,
  "description": "A shade-loving houseplant",
  "nativeRegion": "Central America",
  "commonUses": "Air purification, decoration",
  "lightRequirements": "Bright indirect light",
  "wateringNeeds": "Weekly",
  "temperatureRange": "18-27C (65-80F)",
  "additionalTips": ["Mist the leaves", "Repot every two years"],
  "careInfo": "Keep away from drafts"
}"#;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("shade-loving"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body(model_text)))
            .mount(&server)
            .await;

        let result = make_client(&server)
            .identify_with_text("shade-loving plant with white flowers")
            .await
            .unwrap();

        assert_eq!(result.name, "Peace Lily");
        assert_eq!(result.scientific_name, "Spathiphyllum wallisii");
        assert_eq!(result.confidence, 0.93);
        assert_eq!(result.additional_tips.len(), 2);
        assert_eq!(result.image_source, Modality::Text);
    }

    #[tokio::test]
    async fn test_identify_with_text_fills_defaults() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_body(r#"{"name": "Mystery Vine"}"#)),
            )
            .mount(&server)
            .await;

        let result = make_client(&server)
            .identify_with_text("a vine")
            .await
            .unwrap();

        assert_eq!(result.name, "Mystery Vine");
        assert_eq!(result.scientific_name, "Unknown");
        assert_eq!(result.confidence, 0.7);
        assert!(result.additional_tips.is_empty());
        assert!(result.description.is_none());
    }

    #[tokio::test]
    async fn test_identify_with_image_defaults_higher_confidence() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .and(body_string_contains("\"inlineData\""))
            .and(body_string_contains("\"mimeType\":\"image/png\""))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(text_body(r#"{"name": "Aloe Vera"}"#)),
            )
            .mount(&server)
            .await;

        let result = make_client(&server)
            .identify_with_image(&[0x89, 0x50, 0x4E, 0x47])
            .await
            .unwrap();

        assert_eq!(result.name, "Aloe Vera");
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.image_source, Modality::Upload);
    }

    #[tokio::test]
    async fn test_empty_body_is_invalid_response() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .identify_with_text("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("Invalid response")));
    }

    #[tokio::test]
    async fn test_text_without_braces_is_parse_failure() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(text_body("I could not identify this plant.")),
            )
            .mount(&server)
            .await;

        let err = make_client(&server)
            .identify_with_text("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Parse(ref msg) if msg.contains("Could not parse")));
    }

    #[tokio::test]
    async fn test_error_field_in_success_body_fails() {
        let server = MockServer::start().await;

        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": { "message": "internal model error" }
            })))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .identify_with_text("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Provider(ref msg) if msg == "internal model error"));
    }

    #[test]
    fn test_json_span_is_greedy() {
        let text = "prefix {\"a\":1} middle {\"b\":2} suffix";
        assert_eq!(json_span(text), Some("{\"a\":1} middle {\"b\":2}"));
    }

    #[test]
    fn test_json_span_requires_closing_after_opening() {
        assert_eq!(json_span("no braces here"), None);
        assert_eq!(json_span("only open {"), None);
        assert_eq!(json_span("} closed before open {"), None);
        assert_eq!(json_span("{}"), Some("{}"));
    }

    #[tokio::test]
    async fn test_greedy_span_parse_failure_is_syntax_error() {
        let server = MockServer::start().await;

        // The greedy span swallows both objects; the resulting string is not
        // valid JSON and the syntax error must propagate.
        test_support::post_path_regex(test_support::GENERATE_CONTENT_PATH_REGEX)
            .respond_with(ResponseTemplate::new(200).set_body_json(text_body(
                "prefix {\"a\":1} middle {\"b\":2} suffix",
            )))
            .mount(&server)
            .await;

        let err = make_client(&server)
            .identify_with_text("anything")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn test_result_from_payload_drops_unrecognized_fields() {
        let payload = serde_json::json!({
            "name": "Fern",
            "hallucinatedField": "ignored",
            "confidence": 0.5
        });

        let result = result_from_payload(&payload, Modality::Text);
        assert_eq!(result.name, "Fern");
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.scientific_name, "Unknown");
    }
}
