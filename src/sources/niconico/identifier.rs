use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, distributions::Alphanumeric};

const ACTION_TRACK_PREFIX: &str = "Nicolink";
const WATCH_URL_BASE: &str = "https://www.nicovideo.jp/watch/";

/// NicoNico video id such as `sm9`, `so38016254` or a bare numeric thread id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Accepts `sm`/`so`/`nm` followed by digits, or digits only.
    pub fn parse(id: &str) -> Option<Self> {
        let digits = ["sm", "so", "nm"]
            .iter()
            .find_map(|prefix| id.strip_prefix(prefix))
            .unwrap_or(id);

        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(id.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch page for this video.
    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_BASE, self.0)
    }
}

impl std::ops::Deref for VideoId {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session token the watch APIs expect on every request.
///
/// Starts as a locally generated value and is replaced by whatever the
/// watch metadata hands out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionTrackId(String);

impl ActionTrackId {
    /// `Nicolink_<unix millis>_<6 random alphanumerics>`.
    ///
    /// The random suffix keeps two attempts started in the same millisecond apart.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(6)
            .map(char::from)
            .collect();
        Self(format!("{}_{}_{}", ACTION_TRACK_PREFIX, millis, suffix))
    }

    /// Replaces the token. Empty values are ignored so the id never becomes blank.
    pub fn refresh(&mut self, value: &str) -> bool {
        if value.is_empty() || value == self.0 {
            return false;
        }
        self.0 = value.to_string();
        true
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ActionTrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for ActionTrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
