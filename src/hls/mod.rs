//! Extended M3U (HLS) manifest handling.
//!
//! Only as much of the format as playback resolution needs: classifying lines
//! into directives and locating the audio rendition of a master playlist.

pub mod parser;
pub mod types;
pub mod utils;

pub use parser::{find_audio_playlist, parse_line};
pub use types::ManifestLine;
pub use utils::resolve_url;
