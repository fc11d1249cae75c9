// mediaprobe-core/src/fetch.rs
//
// Blocking download of a remote input's bytes. The library is then fed the
// content through its buffer interface, so remote analysis never depends on
// network support having been compiled into libmediainfo.

use crate::error::{CoreError, CoreResult};
use crate::input::scheme_of;

/// Schemes this layer knows how to fetch.
pub const SUPPORTED_SCHEMES: &[&str] = &["http", "https"];

/// Largest body accepted from a remote input (4 GiB).
const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024 * 1024;

/// Fetches the full body of `url`.
///
/// Unsupported schemes fail before any network access. Transport errors and
/// non-success statuses surface as [`CoreError::RuntimeFailure`].
pub fn fetch_url(url: &str) -> CoreResult<Vec<u8>> {
    let scheme = scheme_of(url)
        .ok_or_else(|| CoreError::RuntimeFailure(format!("Not a URL: {}", url)))?;
    if !SUPPORTED_SCHEMES
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(scheme))
    {
        return Err(CoreError::RuntimeFailure(format!(
            "Unsupported URL scheme '{}' in {}",
            scheme, url
        )));
    }

    log::debug!("GET {}", url);
    let response = ureq::get(url)
        .call()
        .map_err(|e| CoreError::RuntimeFailure(format!("Failed to fetch {}: {}", url, e)))?;

    let mut body = response.into_body();
    let data = body
        .with_config()
        .limit(MAX_BODY_BYTES)
        .read_to_vec()
        .map_err(|e| CoreError::RuntimeFailure(format!("Failed to read {}: {}", url, e)))?;

    log::debug!("Fetched {} bytes from {}", data.len(), url);
    Ok(data)
}
