use super::{types::ManifestLine, utils::split_attribute_list};
use crate::common::errors::ResolutionError;

const DIRECTIVE_MARKER: &str = "#EXT";
const MEDIA_DIRECTIVE: &str = "EXT-X-MEDIA";

/// Classifies a single manifest line.
pub fn parse_line(raw: &str) -> ManifestLine {
    let line = raw.trim();
    if !line.starts_with(DIRECTIVE_MARKER) {
        return ManifestLine::Plain;
    }

    let body = &line[1..];
    match body.split_once(':') {
        Some((name, args)) => ManifestLine::Directive {
            name: name.to_string(),
            arguments: split_attribute_list(args),
        },
        None => ManifestLine::Directive {
            name: body.to_string(),
            arguments: Vec::new(),
        },
    }
}

/// Returns the `URI` of the first `EXT-X-MEDIA` directive with `TYPE=AUDIO`.
///
/// The URI is returned as written; relative references are left to the caller.
pub fn find_audio_playlist(manifest: &str) -> Result<String, ResolutionError> {
    manifest
        .lines()
        .map(parse_line)
        .find(|line| line.is_directive(MEDIA_DIRECTIVE) && line.argument("TYPE") == Some("AUDIO"))
        .and_then(|line| line.argument("URI").map(str::to_string))
        .ok_or(ResolutionError::AudioVariantNotFound)
}
