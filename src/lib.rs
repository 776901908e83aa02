//! LeafLens - identifies plants from text descriptions or photos
//!
//! Sends multimodal requests to the Gemini API, parses the loosely
//! structured model output into typed identification results, attaches
//! static care-tip data, and optionally persists results to Supabase.

pub mod ai;
pub mod app;
pub mod care;
pub mod credentials;
pub mod error;
pub mod models;
pub mod prompts;
pub mod store;

pub use error::{Error, Result};
