pub mod client;
pub mod identify;
pub mod types;

pub use identify::GeminiIdentifyClient;

/// Adds a test-only `with_base_url` that forwards to the inner HTTP client,
/// so wiremock servers can stand in for the real endpoint.
#[cfg(test)]
macro_rules! impl_with_gemini_base_url {
    ($client:ty) => {
        impl $client {
            pub(crate) fn with_base_url(mut self, base_url: String) -> Self {
                self.http = self.http.with_base_url(base_url);
                self
            }
        }
    };
}

#[cfg(test)]
pub(crate) use impl_with_gemini_base_url;
