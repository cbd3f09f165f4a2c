use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{WATCH_API_BASE, resolver::ResolutionAttempt};
use crate::{
    common::{
        errors::ResolutionError,
        html::{extract_between, meta_content, unescape_html},
        http::{HttpExecutor, HttpRequest},
    },
    configs::NiconicoConfig,
};

/// Snapshot of the watch data needed to request a stream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    #[serde(default)]
    pub client: Option<ClientInfo>,
    #[serde(default)]
    pub media: Option<MediaInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientInfo {
    #[serde(default)]
    pub watch_track_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaInfo {
    /// DMS ("domand") delivery, the HLS pipeline current videos are served from.
    #[serde(default)]
    pub domand: Option<DomandInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomandInfo {
    #[serde(default)]
    pub access_right_key: Option<String>,
    #[serde(default)]
    pub audios: Option<Vec<AudioQuality>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioQuality {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

/// What the access-rights endpoint needs to hand out a content URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDescriptor {
    pub access_right_key: String,
    pub audio_quality_id: String,
}

impl VideoMetadata {
    pub fn tracking_id(&self) -> Option<&str> {
        self.client
            .as_ref()?
            .watch_track_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    fn domand(&self) -> Option<&DomandInfo> {
        self.media.as_ref()?.domand.as_ref()
    }

    pub fn access_right_key(&self) -> Option<&str> {
        self.domand()?
            .access_right_key
            .as_deref()
            .filter(|key| !key.is_empty())
    }

    /// Access-right key plus the first listed audio quality.
    pub fn stream_descriptor(&self, video_id: &str) -> Result<StreamDescriptor, ResolutionError> {
        let missing = |field| ResolutionError::MissingStreamDescriptor {
            id: video_id.to_string(),
            field,
        };

        let access_right_key = self.access_right_key().ok_or_else(|| missing("access right key"))?;
        let audio_quality_id = self
            .domand()
            .and_then(|d| d.audios.as_ref())
            .and_then(|audios| audios.first())
            .and_then(|a| a.id.as_deref())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| missing("audio quality"))?;

        Ok(StreamDescriptor {
            access_right_key: access_right_key.to_string(),
            audio_quality_id: audio_quality_id.to_string(),
        })
    }
}

/// One source of [`VideoMetadata`].
///
/// `Ok(None)` means the source had nothing for this video and the next
/// fetcher should be tried. Errors end the resolution attempt.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(
        &self,
        http: &dyn HttpExecutor,
        attempt: &ResolutionAttempt,
    ) -> Result<Option<VideoMetadata>, ResolutionError>;
}

/// Guest watch API (`/api/watch/v3_guest`).
pub struct WatchApiFetcher {
    frontend_id: String,
    frontend_version: String,
    language: String,
}

impl WatchApiFetcher {
    pub fn new(config: &NiconicoConfig) -> Self {
        Self {
            frontend_id: config.frontend_id.clone(),
            frontend_version: config.frontend_version.clone(),
            language: config.language.clone(),
        }
    }

    pub fn api_url(&self, attempt: &ResolutionAttempt) -> String {
        format!(
            "{}{}?_frontendId={}&_frontendVersion={}&actionTrackId={}&i18nLanguage={}",
            WATCH_API_BASE,
            urlencoding::encode(attempt.video_id()),
            urlencoding::encode(&self.frontend_id),
            urlencoding::encode(&self.frontend_version),
            urlencoding::encode(attempt.action_track_id().as_str()),
            urlencoding::encode(&self.language),
        )
    }
}

#[derive(Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    data: Option<VideoMetadata>,
}

#[async_trait]
impl MetadataFetcher for WatchApiFetcher {
    fn name(&self) -> &'static str {
        "watch api"
    }

    async fn fetch(
        &self,
        http: &dyn HttpExecutor,
        attempt: &ResolutionAttempt,
    ) -> Result<Option<VideoMetadata>, ResolutionError> {
        let url = self.api_url(attempt);
        let response = http.execute(HttpRequest::get(&url)).await?;

        if !response.is_success_with_content() {
            debug!("Watch API returned status {} for {}", response.status, attempt.video_id());
            return Ok(None);
        }

        if response.body.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str::<ApiEnvelope>(&response.body) {
            Ok(envelope) => Ok(envelope.data),
            Err(e) => {
                warn!("Unreadable watch API response for {}: {}", attempt.video_id(), e);
                Ok(None)
            }
        }
    }
}

/// Scrapes the watch page for its embedded watch data.
pub struct WatchPageFetcher;

impl WatchPageFetcher {
    /// Pulls the metadata JSON out of a watch page.
    ///
    /// Older pages carry it in `data-api-data` on the initial-watch-data
    /// element; newer ones in a `server-response` meta tag wrapped in
    /// `data.response`.
    pub fn parse_page(html: &str) -> Option<VideoMetadata> {
        if let Some(raw) = extract_between(html, "data-api-data=\"", "\"") {
            return match serde_json::from_str(&unescape_html(raw)) {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    warn!("Unreadable data-api-data payload: {}", e);
                    None
                }
            };
        }

        let raw = meta_content(html, "server-response")?;
        let mut wrapper: Value = match serde_json::from_str(&unescape_html(raw)) {
            Ok(v) => v,
            Err(e) => {
                warn!("Unreadable server-response payload: {}", e);
                return None;
            }
        };

        let response = wrapper.get_mut("data")?.get_mut("response")?.take();
        if response.is_null() {
            return None;
        }
        serde_json::from_value(response).ok()
    }
}

#[async_trait]
impl MetadataFetcher for WatchPageFetcher {
    fn name(&self) -> &'static str {
        "watch page"
    }

    async fn fetch(
        &self,
        http: &dyn HttpExecutor,
        attempt: &ResolutionAttempt,
    ) -> Result<Option<VideoMetadata>, ResolutionError> {
        let url = attempt.video_id().watch_url();
        let response = http.execute(HttpRequest::get(&url)).await?;

        if !response.is_success_with_content() {
            return Err(ResolutionError::UnexpectedStatus {
                context: "video main page",
                status: response.status,
                url,
            });
        }

        Ok(Self::parse_page(&response.body))
    }
}
