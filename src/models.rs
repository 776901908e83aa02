//! Data models and structures
//!
//! Defines the core data structures for identification results, persisted
//! records, and application configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an identification request originated from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Free-text plant description.
    Text,
    /// Uploaded photo.
    Upload,
}

impl Modality {
    /// Confidence assumed when the model response omits one.
    pub fn default_confidence(self) -> f64 {
        match self {
            Modality::Text => 0.7,
            Modality::Upload => 0.85,
        }
    }

    /// Tag used for the `user_input_type` column of persisted records.
    pub fn input_type(self) -> &'static str {
        match self {
            Modality::Text => "text",
            Modality::Upload => "image",
        }
    }
}

/// Normalized output of one identification call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationResult {
    pub name: String,
    pub scientific_name: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_requirements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watering_needs: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_range: Option<String>,
    pub additional_tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub care_info: Option<String>,
    pub image_source: Modality,
}

/// Row shape for the `identifications` table in Supabase.
///
/// Column names are snake_case to match the hosted schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentificationRecord {
    pub user_input_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_mime: Option<String>,
    pub result_name: String,
    pub result_scientific: String,
    pub result_confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_native_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_common_uses: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_watering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_temperature: Option<String>,
    pub result_additional_tips: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_care_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl IdentificationRecord {
    /// Build a record from an identification result plus request context.
    pub fn from_result(
        result: &IdentificationResult,
        user_text: Option<String>,
        image_mime: Option<String>,
    ) -> Self {
        Self {
            user_input_type: result.image_source.input_type().to_string(),
            user_text,
            image_mime,
            result_name: result.name.clone(),
            result_scientific: result.scientific_name.clone(),
            result_confidence: result.confidence,
            result_native_region: result.native_region.clone(),
            result_common_uses: result.common_uses.clone(),
            result_light: result.light_requirements.clone(),
            result_watering: result.watering_needs.clone(),
            result_temperature: result.temperature_range.clone(),
            result_additional_tips: result.additional_tips.clone(),
            result_care_info: result.care_info.clone(),
            created_at: Utc::now(),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub key_file: PathBuf,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            gemini_model: std::env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            key_file: std::env::var("GEMINI_KEY_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".gemini_api_key")),
            supabase_url: std::env::var("SUPABASE_URL").ok(),
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").ok(),
        })
    }
}
