use async_trait::async_trait;

use crate::common::errors::ResolutionError;

/// Trait that all source plugins must implement.
///
/// A source recognises the identifiers it owns and turns them into a URL the
/// playback layer can stream from.
#[async_trait]
pub trait SourcePlugin: Send + Sync {
    /// Unique identifier for this source (e.g., "niconico")
    fn name(&self) -> &str;

    /// Check if this source can handle the given identifier.
    fn can_handle(&self, identifier: &str) -> bool;

    /// Get the actual playback URL for a given identifier.
    async fn get_playback_url(&self, identifier: &str) -> Result<String, ResolutionError>;
}

pub type BoxedSource = Box<dyn SourcePlugin>;
