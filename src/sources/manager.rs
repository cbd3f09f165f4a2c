use super::{
  niconico::NicoSource,
  plugin::{BoxedSource, SourcePlugin},
};
use crate::common::{Severity, errors::ResolutionError};

/// Source Manager
pub struct SourceManager {
  pub sources: Vec<BoxedSource>,
}

impl SourceManager {
  /// Create a new SourceManager with all enabled sources
  pub fn new(config: &crate::configs::Config) -> Self {
    let mut sources: Vec<BoxedSource> = Vec::new();

    macro_rules! register_source {
      ($enabled:expr, $name:literal, $ctor:expr) => {
        if $enabled {
          match $ctor {
            Ok(src) => {
              tracing::info!("Loaded source: {}", $name);
              sources.push(Box::new(src));
            }
            Err(e) => {
              tracing::error!("{} source failed to initialize: {}", $name, e);
            }
          }
        }
      };
    }

    register_source!(
      config.sources.niconico,
      "NicoNico",
      NicoSource::new(config.niconico.clone())
    );

    Self { sources }
  }

  pub fn with_sources(sources: Vec<BoxedSource>) -> Self {
    Self { sources }
  }

  pub fn source_for(&self, identifier: &str) -> Option<&dyn SourcePlugin> {
    self
      .sources
      .iter()
      .find(|s| s.can_handle(identifier))
      .map(|s| s.as_ref())
  }

  /// Resolve a playable URL through the first source that claims `identifier`.
  pub async fn get_playback_url(&self, identifier: &str) -> Result<String, ResolutionError> {
    let Some(source) = self.source_for(identifier) else {
      let e = ResolutionError::Unsupported(identifier.to_string());
      tracing::warn!("{}", e);
      return Err(e);
    };

    match source.get_playback_url(identifier).await {
      Ok(url) => Ok(url),
      Err(e) => {
        match e.severity() {
          Severity::Common => tracing::warn!("[{}] {}: {}", source.name(), identifier, e),
          _ => tracing::error!("[{}] {}: {}", source.name(), identifier, e),
        }
        Err(e)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{
    io,
    sync::{Arc, Mutex},
  };

  use async_trait::async_trait;

  use super::*;
  use crate::{
    common::errors::ErrorKind,
    configs::{Config, SourcesConfig},
  };

  struct StaticSource {
    prefix: &'static str,
    url: &'static str,
  }

  #[async_trait]
  impl SourcePlugin for StaticSource {
    fn name(&self) -> &str {
      self.prefix
    }

    fn can_handle(&self, identifier: &str) -> bool {
      identifier.starts_with(self.prefix)
    }

    async fn get_playback_url(&self, identifier: &str) -> Result<String, ResolutionError> {
      if identifier.ends_with("broken") {
        return Err(ResolutionError::AudioVariantNotFound);
      }
      Ok(self.url.to_string())
    }
  }

  fn manager() -> SourceManager {
    SourceManager::with_sources(vec![
      Box::new(StaticSource { prefix: "a:", url: "https://a/audio.m3u8" }),
      Box::new(StaticSource { prefix: "b:", url: "https://b/audio.m3u8" }),
    ])
  }

  #[tokio::test]
  async fn routes_to_first_matching_source() {
    let manager = manager();
    assert_eq!(manager.get_playback_url("b:1").await.unwrap(), "https://b/audio.m3u8");
    assert_eq!(manager.source_for("a:1").map(|s| s.name()), Some("a:"));
  }

  #[derive(Clone, Default)]
  struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

  impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
      Ok(())
    }
  }

  #[tokio::test]
  async fn unknown_identifier_is_unsupported_and_logged() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_ansi(false)
      .with_writer(move || writer.clone())
      .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let err = manager().get_playback_url("ytsearch:foo").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unsupported);

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("ytsearch:foo"), "{output}");
  }

  #[tokio::test]
  async fn source_errors_are_passed_through() {
    let err = manager().get_playback_url("a:broken").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AudioVariantNotFound);
  }

  #[test]
  fn registers_niconico_only_when_enabled() {
    assert_eq!(SourceManager::new(&Config::default()).sources.len(), 1);

    let disabled = Config {
      sources: SourcesConfig { niconico: false },
      ..Config::default()
    };
    assert!(SourceManager::new(&disabled).sources.is_empty());
  }
}
