//! Blocking HTTP GET of a single image into a `.part` temp file.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use tempfile::NamedTempFile;

use super::error::FetchError;
use crate::config::FetchConfig;

/// A downloaded file waiting to be persisted. Deleted when dropped.
#[derive(Debug)]
pub struct TempDownload {
    file: NamedTempFile,
    len: u64,
}

impl TempDownload {
    #[cfg(test)]
    pub(crate) fn from_parts(file: NamedTempFile, len: u64) -> Self {
        Self { file, len }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of bytes downloaded.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves the file to `dest` without overwriting an existing file.
    /// On failure the temp file is deleted.
    pub(crate) fn persist_to(self, dest: &Path) -> std::io::Result<()> {
        self.file
            .persist_noclobber(dest)
            .map(|_| ())
            .map_err(|e| e.error)
    }
}

/// Downloads `url` with a single GET into a new temp file under `tmp_dir`.
///
/// Only http(s) URLs are fetched. Redirects are followed up to `max_redirects`;
/// a non-2xx final status, a body over `max_bytes`, or any transport error is a
/// failure, and the partial temp file is removed.
pub fn download_to_temp(
    url: &str,
    tmp_dir: &Path,
    opts: &FetchConfig,
) -> Result<TempDownload, FetchError> {
    let parsed = url::Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }

    let mut file = tempfile::Builder::new()
        .prefix("sideload-")
        .suffix(".part")
        .tempfile_in(tmp_dir)?;
    let mut written: u64 = 0;
    let mut too_large = false;
    let mut write_error: Option<std::io::Error> = None;

    let mut easy = curl::easy::Easy::new();
    easy.url(parsed.as_str())?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirects)?;
    easy.useragent(&opts.user_agent)?;
    easy.connect_timeout(Duration::from_secs(opts.connect_timeout_secs))?;
    easy.timeout(Duration::from_secs(opts.timeout_secs))?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if written + data.len() as u64 > opts.max_bytes {
                too_large = true;
                return Ok(0); // abort transfer
            }
            match file.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    write_error = Some(e);
                    Ok(0)
                }
            }
        })?;
        transfer.perform()
    };

    if too_large {
        return Err(FetchError::TooLarge {
            max: opts.max_bytes,
        });
    }
    if let Some(e) = write_error {
        return Err(FetchError::Io(e));
    }
    performed?;

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    file.flush()?;

    tracing::debug!(url, bytes = written, path = %file.path().display(), "fetched to temp");
    Ok(TempDownload { file, len: written })
}
