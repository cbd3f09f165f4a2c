pub mod common;
pub mod configs;
pub mod hls;
pub mod sources;

pub use common::errors::{ErrorKind, ResolutionError};
pub use sources::{
  SourceManager, SourcePlugin,
  niconico::{NicoSource, PlaybackResolver, VideoId},
};
