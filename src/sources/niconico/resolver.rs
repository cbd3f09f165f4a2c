use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, warn};

use super::{
    ACCESS_RIGHTS_BASE, FRONTEND_ORIGIN, VIDEO_QUALITY_PLACEHOLDER,
    identifier::{ActionTrackId, VideoId},
    metadata::{MetadataFetcher, StreamDescriptor, VideoMetadata, WatchApiFetcher, WatchPageFetcher},
};
use crate::{
    common::{
        errors::ResolutionError,
        http::{HttpExecutor, HttpRequest},
    },
    configs::NiconicoConfig,
    hls,
};

/// Per-attempt state: the video being resolved and its session token.
///
/// Never shared between attempts; every call to [`PlaybackResolver::resolve`]
/// starts from a fresh one.
#[derive(Debug, Clone)]
pub struct ResolutionAttempt {
    video_id: VideoId,
    action_track_id: ActionTrackId,
}

impl ResolutionAttempt {
    pub fn new(video_id: VideoId) -> Self {
        Self::with_action_track_id(video_id, ActionTrackId::generate())
    }

    pub fn with_action_track_id(video_id: VideoId, action_track_id: ActionTrackId) -> Self {
        Self {
            video_id,
            action_track_id,
        }
    }

    pub fn video_id(&self) -> &VideoId {
        &self.video_id
    }

    pub fn action_track_id(&self) -> &ActionTrackId {
        &self.action_track_id
    }

    /// Adopts the tracking id carried by `metadata`, if any.
    fn refresh_token(&mut self, metadata: &VideoMetadata) {
        if let Some(tracking_id) = metadata.tracking_id() {
            if self.action_track_id.refresh(tracking_id) {
                debug!("Updated actionTrackId for {} to {}", self.video_id, tracking_id);
            }
        }
    }
}

/// Turns a NicoNico video id into the URL of its audio-only HLS playlist.
pub struct PlaybackResolver {
    http: Arc<dyn HttpExecutor>,
    config: NiconicoConfig,
    fetchers: Vec<Box<dyn MetadataFetcher>>,
}

impl PlaybackResolver {
    pub fn new(http: Arc<dyn HttpExecutor>, config: NiconicoConfig) -> Self {
        // Tried in order; the page is only scraped when the API has no data.
        let fetchers: Vec<Box<dyn MetadataFetcher>> =
            vec![Box::new(WatchApiFetcher::new(&config)), Box::new(WatchPageFetcher)];

        Self {
            http,
            config,
            fetchers,
        }
    }

    /// Resolves `video_id` with a freshly generated action track id.
    pub async fn resolve(&self, video_id: &VideoId) -> Result<String, ResolutionError> {
        let mut attempt = ResolutionAttempt::new(video_id.clone());
        self.resolve_attempt(&mut attempt).await
    }

    /// Runs the full chain for `attempt`, updating its action track id in place.
    pub async fn resolve_attempt(
        &self,
        attempt: &mut ResolutionAttempt,
    ) -> Result<String, ResolutionError> {
        let metadata = self.load_metadata(attempt).await?;
        attempt.refresh_token(&metadata);

        let descriptor = metadata.stream_descriptor(attempt.video_id())?;
        let playback_url = self.request_access_rights(attempt, &descriptor).await?;

        debug!("Starting NicoNico track from URL: {}", playback_url);

        let audio_url = self.load_audio_playlist_url(&playback_url).await?;
        debug!("Resolved NicoNico audio playlist for {}: {}", attempt.video_id(), audio_url);

        Ok(audio_url)
    }

    async fn load_metadata(
        &self,
        attempt: &ResolutionAttempt,
    ) -> Result<VideoMetadata, ResolutionError> {
        for (i, fetcher) in self.fetchers.iter().enumerate() {
            if i > 0 {
                warn!(
                    "Couldn't retrieve NicoNico video details for {}, falling back to {}",
                    attempt.video_id(),
                    fetcher.name()
                );
            }

            if let Some(metadata) = fetcher.fetch(self.http.as_ref(), attempt).await? {
                debug!("Loaded metadata for {} from {}", attempt.video_id(), fetcher.name());
                return Ok(metadata);
            }
        }

        Err(ResolutionError::MetadataUnavailable(attempt.video_id().to_string()))
    }

    pub fn access_rights_url(attempt: &ResolutionAttempt) -> String {
        format!(
            "{}{}/access-rights/hls?actionTrackId={}",
            ACCESS_RIGHTS_BASE,
            urlencoding::encode(attempt.video_id()),
            urlencoding::encode(attempt.action_track_id().as_str()),
        )
    }

    async fn request_access_rights(
        &self,
        attempt: &ResolutionAttempt,
        descriptor: &StreamDescriptor,
    ) -> Result<String, ResolutionError> {
        let url = Self::access_rights_url(attempt);
        // Video is only requested because the endpoint insists on an output pair.
        let body = json!({
            "outputs": [[VIDEO_QUALITY_PLACEHOLDER, descriptor.audio_quality_id]]
        });

        let request = HttpRequest::post(&url, body.to_string())
            .header("Content-Type", "application/json")
            .header("X-Access-Right-Key", &descriptor.access_right_key)
            .header("X-Frontend-Id", &self.config.frontend_id)
            .header("X-Frontend-Version", &self.config.frontend_version)
            .header("X-Requested-With", FRONTEND_ORIGIN);

        let response = self.http.execute(request).await?;
        if !response.is_success_with_content() {
            return Err(ResolutionError::UnexpectedStatus {
                context: "dms access rights",
                status: response.status,
                url,
            });
        }

        let denied = |cause: String| ResolutionError::AccessRightsDenied {
            id: attempt.video_id().to_string(),
            cause,
        };

        let json: Value = serde_json::from_str(&response.body)
            .map_err(|e| denied(format!("unreadable response: {}", e)))?;

        match json["data"]["contentUrl"].as_str().filter(|u| !u.is_empty()) {
            Some(content_url) => Ok(content_url.to_string()),
            None => {
                let cause = json["meta"]["errorCode"]
                    .as_str()
                    .map(|code| format!("error code {}", code))
                    .unwrap_or_else(|| "response did not contain a content URL".to_string());
                Err(denied(cause))
            }
        }
    }

    /// DMS serves separate video and audio renditions; pick the audio one out
    /// of the master playlist's EXT-X-MEDIA entries.
    async fn load_audio_playlist_url(&self, playlist_url: &str) -> Result<String, ResolutionError> {
        let request = HttpRequest::get(playlist_url).header("Accept", "application/x-mpegURL, */*");
        let response = self.http.execute(request).await?;

        if !response.is_success_with_content() {
            return Err(ResolutionError::UnexpectedStatus {
                context: "video playlist",
                status: response.status,
                url: playlist_url.to_string(),
            });
        }

        let uri = hls::find_audio_playlist(&response.body)?;
        Ok(hls::resolve_url(playlist_url, &uri))
    }
}
