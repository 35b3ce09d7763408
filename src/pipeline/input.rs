//! Input resolution: turn a user-supplied path or URL into an [`UploadedFile`].
//!
//! The declared name is what classification runs on, so it is taken from
//! the file name (local) or the last URL path segment (remote), never from
//! sniffed content.

use crate::error::TrailError;
use crate::record::UploadedFile;
use std::path::PathBuf;
use tracing::{debug, info};

/// Name used when a URL has no usable last path segment.
const FALLBACK_NAME: &str = "download";

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Load one upload from a local path or an HTTP/HTTPS URL.
pub async fn load_upload(input: &str, timeout_secs: u64) -> Result<UploadedFile, TrailError> {
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        read_local(input).await
    }
}

/// Load every input, in order. Stops at the first unreadable one.
pub async fn load_uploads(
    inputs: &[String],
    timeout_secs: u64,
) -> Result<Vec<UploadedFile>, TrailError> {
    let mut files = Vec::with_capacity(inputs.len());
    for input in inputs {
        files.push(load_upload(input, timeout_secs).await?);
    }
    Ok(files)
}

async fn read_local(path_str: &str) -> Result<UploadedFile, TrailError> {
    let path = PathBuf::from(path_str);

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TrailError::PermissionDenied { path });
        }
        Err(_) => return Err(TrailError::FileNotFound { path }),
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path_str.to_string());
    debug!("Read {} ({} bytes)", path.display(), bytes.len());
    Ok(UploadedFile::new(name, bytes))
}

async fn download_url(url: &str, timeout_secs: u64) -> Result<UploadedFile, TrailError> {
    info!("Downloading upload from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| TrailError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            TrailError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            TrailError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(TrailError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let name = filename_from_url(url);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| TrailError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    info!("Downloaded {} ({} bytes)", name, bytes.len());
    Ok(UploadedFile::new(name, bytes.to_vec()))
}

/// Last non-empty path segment of `url`, or [`FALLBACK_NAME`].
fn filename_from_url(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|last| !last.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/lake.jpg"));
        assert!(is_url("http://example.com/diary.docx"));
        assert!(!is_url("/tmp/lake.jpg"));
        assert!(!is_url("lake.jpg"));
        assert!(!is_url(""));
    }

    #[test]
    fn filename_comes_from_last_segment() {
        assert_eq!(filename_from_url("https://x.org/trips/IMG_1.HEIC"), "IMG_1.HEIC");
        assert_eq!(filename_from_url("https://x.org/a/b.docx?dl=1"), "b.docx");
        assert_eq!(filename_from_url("https://x.org/"), FALLBACK_NAME);
        assert_eq!(filename_from_url("https://x.org"), FALLBACK_NAME);
    }

    #[tokio::test]
    async fn local_file_keeps_declared_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Sunset.JPG");
        std::fs::write(&path, b"jpeg-ish").unwrap();

        let file = load_upload(path.to_str().unwrap(), 5).await.unwrap();
        assert_eq!(file.name, "Sunset.JPG");
        assert_eq!(file.bytes, b"jpeg-ish");
    }

    #[tokio::test]
    async fn missing_file_is_fatal() {
        let err = load_upload("/definitely/not/here.docx", 5).await.unwrap_err();
        assert!(matches!(err, TrailError::FileNotFound { .. }));
    }

    #[tokio::test]
    async fn uploads_load_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.docx");
        let b = dir.path().join("b.png");
        std::fs::write(&a, b"A").unwrap();
        std::fs::write(&b, b"B").unwrap();

        let inputs = vec![
            b.to_string_lossy().into_owned(),
            a.to_string_lossy().into_owned(),
        ];
        let files = load_uploads(&inputs, 5).await.unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["b.png", "a.docx"]);
    }
}
