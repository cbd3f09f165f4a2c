use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use crate::{
    common::{
        errors::ResolutionError,
        http::{HttpClient, HttpExecutor, ReqwestExecutor},
    },
    configs::NiconicoConfig,
    sources::SourcePlugin,
};

pub mod identifier;
pub mod metadata;
pub mod resolver;


pub use identifier::{ActionTrackId, VideoId};
pub use metadata::{MetadataFetcher, StreamDescriptor, VideoMetadata};
pub use resolver::{PlaybackResolver, ResolutionAttempt};

const WATCH_API_BASE: &str = "https://www.nicovideo.jp/api/watch/v3_guest/";
const ACCESS_RIGHTS_BASE: &str = "https://nvapi.nicovideo.jp/v1/watch/";
const FRONTEND_ORIGIN: &str = "https://www.nicovideo.jp";
const VIDEO_QUALITY_PLACEHOLDER: &str = "video-h264-144p";

pub struct NicoSource {
    resolver: PlaybackResolver,
    url_pattern: Regex,
}

impl NicoSource {
    pub fn new(config: Option<NiconicoConfig>) -> Result<Self, String> {
        let config = config.unwrap_or_default();
        let client = HttpClient::with_options(
            Duration::from_secs(config.request_timeout_secs),
            config.proxy.as_ref(),
        )
        .map_err(|e| e.to_string())?;

        Self::with_executor(Arc::new(ReqwestExecutor::new(client)), config)
    }

    /// Builds the source on top of a caller-supplied HTTP executor.
    pub fn with_executor(
        http: Arc<dyn HttpExecutor>,
        config: NiconicoConfig,
    ) -> Result<Self, String> {
        let url_pattern = Regex::new(
            r"(?i)^(?:https?://)?(?:(?:www|sp|embed)\.)?(?:nicovideo\.jp/watch|nico\.ms)/(?P<id>(?:sm|so|nm)?\d+)(?:[/?#].*)?$",
        )
        .map_err(|e| e.to_string())?;

        Ok(Self {
            resolver: PlaybackResolver::new(http, config),
            url_pattern,
        })
    }

    /// Video id from a watch URL, short link, or bare id.
    pub fn extract_video_id(&self, identifier: &str) -> Option<VideoId> {
        let identifier = identifier.trim();
        if let Some(caps) = self.url_pattern.captures(identifier) {
            return VideoId::parse(&caps["id"].to_ascii_lowercase());
        }
        // Numeric ids alone are too ambiguous to claim
        if identifier.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        VideoId::parse(identifier)
    }

    pub fn resolver(&self) -> &PlaybackResolver {
        &self.resolver
    }
}

#[async_trait]
impl SourcePlugin for NicoSource {
    fn name(&self) -> &str {
        "niconico"
    }

    fn can_handle(&self, identifier: &str) -> bool {
        self.extract_video_id(identifier).is_some()
    }

    async fn get_playback_url(&self, identifier: &str) -> Result<String, ResolutionError> {
        let video_id = self
            .extract_video_id(identifier)
            .ok_or_else(|| ResolutionError::Unsupported(identifier.to_string()))?;

        debug!("Resolving NicoNico video {}", video_id);
        self.resolver.resolve(&video_id).await
    }
}
