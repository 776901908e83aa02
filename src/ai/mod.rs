//! AI service integration for plant identification
//!
//! Provides the identification service trait, the Gemini-backed client that
//! implements it, and a scripted mock for tests.

pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiIdentifyClient;
pub use mock::MockIdentifyClient;

use crate::models::IdentificationResult;
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait IdentifyService: Send + Sync {
    async fn identify_with_text(&self, description: &str) -> Result<IdentificationResult>;
    async fn identify_with_image(&self, image_bytes: &[u8]) -> Result<IdentificationResult>;
}
