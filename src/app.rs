//! Application orchestration for identifying plants and recording results.

use crate::ai::{mime, GeminiIdentifyClient, IdentifyService};
use crate::care::{self, PlantCareData};
use crate::credentials::CredentialStore;
use crate::models::{Config, IdentificationRecord, IdentificationResult};
use crate::store::{MockStoreClient, StoreService, SupabaseClient};
use crate::Result;
use chrono::Local;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// What the caller wants identified.
#[derive(Debug, Clone)]
pub enum IdentifyRequest {
    /// Free-text plant description.
    Text(String),
    /// Path to a photo on disk.
    Image(PathBuf),
}

/// One finished identification: the normalized result plus looked-up care data.
#[derive(Debug, Clone, serde::Serialize)]
pub struct IdentificationReport {
    #[serde(flatten)]
    pub result: IdentificationResult,
    pub care: PlantCareData,
}

/// Coordinates identification, care lookup, persistence, and local output.
pub struct App {
    identify: Box<dyn IdentifyService>,
    store: Box<dyn StoreService>,
    credentials: Arc<CredentialStore>,
    output_dir: PathBuf,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub identify: Box<dyn IdentifyService>,
    pub store: Box<dyn StoreService>,
    pub credentials: Arc<CredentialStore>,
}

impl App {
    /// Build an app from concrete service dependencies.
    ///
    /// This is primarily useful for integration tests and local harnesses
    /// that need to inject mocks.
    pub fn with_services(services: AppServices, output_dir: PathBuf) -> Self {
        Self {
            identify: services.identify,
            store: services.store,
            credentials: services.credentials,
            output_dir,
        }
    }

    /// Construct an app from environment configuration (`Config::from_env`).
    pub fn new() -> Result<Self> {
        let config = Config::from_env()?;

        let date = Local::now().format("%Y-%m-%d").to_string();
        let session_id = Uuid::new_v4();
        let output_dir = PathBuf::from("output").join(format!("{}_{}", date, session_id));

        fs::create_dir_all(&output_dir)?;
        info!("Created output directory: {}", output_dir.display());

        let credentials = Arc::new(CredentialStore::new(
            config.key_file.clone(),
            config.gemini_api_key.clone(),
        ));

        // Reuse one HTTP connection pool across service clients.
        let http_client = reqwest::Client::new();

        let identify: Box<dyn IdentifyService> = Box::new(GeminiIdentifyClient::new_with_client(
            credentials.clone(),
            config.gemini_model.clone(),
            http_client.clone(),
        ));
        info!("Identification provider: Gemini (model: {})", config.gemini_model);

        let store: Box<dyn StoreService> =
            match (&config.supabase_url, &config.supabase_anon_key) {
                (Some(url), Some(anon_key)) => Box::new(SupabaseClient::new_with_client(
                    url.clone(),
                    anon_key.clone(),
                    http_client,
                )),
                _ => {
                    warn!("Supabase not configured. Set SUPABASE_URL and SUPABASE_ANON_KEY to persist results.");
                    Box::new(MockStoreClient::new())
                }
            };

        Ok(Self::with_services(
            AppServices {
                identify,
                store,
                credentials,
            },
            output_dir,
        ))
    }

    /// Save an API key for this and future sessions.
    pub fn save_api_key(&self, key: &str) -> Result<()> {
        self.credentials.set_session_key(key);
        self.credentials.persist(key)
    }

    /// Identify a plant, attach care data, persist, and save a local report.
    pub async fn run(&self, request: IdentifyRequest) -> Result<IdentificationReport> {
        let (result, user_text, image_mime) = match request {
            IdentifyRequest::Text(description) => {
                info!("Identifying plant from description");
                let result = self.identify.identify_with_text(&description).await?;
                (result, Some(description), None)
            }
            IdentifyRequest::Image(path) => {
                info!("Identifying plant from image: {}", path.display());
                let image_bytes = fs::read(&path)?;
                let image_mime = mime::detect_image_mime(&image_bytes).to_string();
                let result = self.identify.identify_with_image(&image_bytes).await?;
                (result, None, Some(image_mime))
            }
        };

        info!(
            "Identified {} ({}, confidence {:.2})",
            result.name, result.scientific_name, result.confidence
        );

        let care = care::care_for(&result.name, &result.scientific_name);
        let report = IdentificationReport { result, care };

        let record = IdentificationRecord::from_result(&report.result, user_text, image_mime);
        if let Err(e) = self.store.save_identification(&record).await {
            // The identification itself is still useful without persistence.
            warn!("Could not persist identification: {}", e);
        }

        let report_json = serde_json::to_string_pretty(&report)?;
        let json_path = self.output_dir.join(format!("{}.json", slugify(&report.result.name)));
        fs::write(&json_path, &report_json)?;
        info!("Saved report to {}", json_path.display());

        Ok(report)
    }
}

/// File-name-safe slug for the local report, derived from the plant name.
fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = slug.trim_matches('-').to_string();
    if slug.is_empty() {
        "identification".to_string()
    } else {
        slug
    }
}
