// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Media URL resolution.
//!
//! Episode audio references point at a relinker that either redirects to a
//! direct `.mp3` file or answers with an HLS master playlist. In the latter
//! case the playable URL is the playlist URL with its filename replaced by
//! the last entry of the playlist.

use tracing::debug;
use url::Url;

use crate::error::ResolveError;
use crate::http::HttpClient;

/// Extension of a directly downloadable media file
const MEDIA_EXTENSION: &str = ".mp3";

/// Scheme-less prefix some provider references use instead of `https`
const BROKEN_SCHEME_PREFIX: &str = "ttp";

/// Rewrite the provider's truncated `ttp…` prefix to `https`
pub fn normalize_audio_url(raw: &str) -> String {
    match raw.strip_prefix(BROKEN_SCHEME_PREFIX) {
        Some(rest) => format!("https{rest}"),
        None => raw.to_string(),
    }
}

/// A playable media location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMedia {
    pub url: Url,
    /// Size in bytes, when the server announced it for a direct file
    pub length: Option<u64>,
}

/// Resolve an episode's audio reference to a direct media file URL
///
/// Only the headers of a direct media response are awaited; the body is read
/// when the reference turns out to be a manifest.
pub async fn resolve_media_url<C: HttpClient>(
    client: &C,
    audio_ref: &str,
) -> Result<ResolvedMedia, ResolveError> {
    let url = normalize_audio_url(audio_ref);
    let failed = |e| ResolveError::RequestFailed {
        url: url.clone(),
        source: e,
    };

    let response = client.get_stream(&url).await.map_err(failed)?;

    if !response.is_success() {
        return Err(ResolveError::HttpStatus {
            url,
            status: response.status,
        });
    }

    let final_url = Url::parse(&response.url).map_err(|_| ResolveError::InvalidUrl {
        url: response.url.clone(),
    })?;

    if is_direct_media(&final_url) {
        debug!(
            %final_url,
            length = ?response.content_length,
            "reference resolved to a direct media file"
        );
        return Ok(ResolvedMedia {
            url: final_url,
            length: response.content_length,
        });
    }

    let body = response.bytes().await.map_err(failed)?;
    let manifest = String::from_utf8_lossy(&body);
    let segment = manifest_segment(&manifest).ok_or_else(|| ResolveError::EmptyManifest {
        url: final_url.to_string(),
    })?;

    debug!(%final_url, segment, "resolving through manifest");
    Ok(ResolvedMedia {
        url: substitute_segment(&final_url, segment)?,
        length: None,
    })
}

/// Whether the path names a media file; the query string is not considered
fn is_direct_media(url: &Url) -> bool {
    url.path().ends_with(MEDIA_EXTENSION)
}

/// Pick the segment reference from a manifest body
///
/// The body is split on newlines, the final element (the blank left by the
/// trailing newline) is dropped and the new final element is returned.
pub fn manifest_segment(manifest: &str) -> Option<&str> {
    let mut lines: Vec<&str> = manifest.split('\n').collect();
    lines.pop();

    lines
        .pop()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Resolve `segment` against the manifest URL
///
/// The manifest's query string carries over unless the segment brings its own.
pub fn substitute_segment(url: &Url, segment: &str) -> Result<Url, ResolveError> {
    let mut resolved = url.join(segment).map_err(|_| ResolveError::InvalidUrl {
        url: format!("{url} + {segment}"),
    })?;

    if !segment.contains('?') {
        resolved.set_query(url.query());
    }

    Ok(resolved)
}
