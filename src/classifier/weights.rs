//! Download-if-absent cache for the classifier weights.
//!
//! The weights live at a fixed local path derived from the model id. If the
//! file is missing and a URL is configured it is fetched once into a temp file
//! next to the target, checked against the expected SHA-256 (when one is
//! configured) and then renamed into place, so a half-written download is
//! never mistaken for a cached model.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};

use super::ClassifierError;
use crate::config::AppConfig;

/// Where to find the weights and how to get them when they are missing.
#[derive(Debug, Clone)]
pub struct WeightsSource {
    pub path: PathBuf,
    pub url: Option<String>,
    pub sha256: Option<String>,
    pub timeout: Duration,
}

impl WeightsSource {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            path: config.model_path.clone(),
            url: config.model_url.clone(),
            sha256: config.model_sha256.clone(),
            timeout: config.download_timeout,
        }
    }
}

/// Return the path of a usable weights file, downloading it if needed.
pub fn ensure_weights(source: &WeightsSource) -> Result<PathBuf, ClassifierError> {
    if source.path.is_file() {
        if let Some(expected) = &source.sha256 {
            let bytes = std::fs::read(&source.path)?;
            verify_checksum(&bytes, expected)?;
        }
        tracing::debug!(path = %source.path.display(), "Using cached classifier weights");
        return Ok(source.path.clone());
    }

    let Some(url) = &source.url else {
        return Err(ClassifierError::WeightsMissing(source.path.clone()));
    };

    tracing::info!(%url, path = %source.path.display(), "Downloading classifier weights");
    let bytes = fetch(url, source.timeout)?;

    if let Some(expected) = &source.sha256 {
        verify_checksum(&bytes, expected)?;
    }

    persist(&source.path, &bytes)?;
    tracing::info!(
        path = %source.path.display(),
        size_bytes = bytes.len(),
        "Classifier weights cached"
    );
    Ok(source.path.clone())
}

fn fetch(url: &str, timeout: Duration) -> Result<Vec<u8>, ClassifierError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClassifierError::Download(format!("HTTP client: {e}")))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| ClassifierError::Download(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ClassifierError::Download(format!("{url} returned {status}")));
    }

    let bytes = response
        .bytes()
        .map_err(|e| ClassifierError::Download(format!("Reading body: {e}")))?;
    if bytes.is_empty() {
        return Err(ClassifierError::Download(format!("{url} returned an empty body")));
    }
    Ok(bytes.to_vec())
}

fn persist(path: &Path, bytes: &[u8]) -> Result<(), ClassifierError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ClassifierError::Io(e.error))?;
    Ok(())
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn verify_checksum(bytes: &[u8], expected: &str) -> Result<(), ClassifierError> {
    let actual = sha256_hex(bytes);
    if actual.eq_ignore_ascii_case(expected.trim()) {
        Ok(())
    } else {
        Err(ClassifierError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write as _};
    use std::net::TcpListener;

    fn source(path: PathBuf, url: Option<String>, sha256: Option<String>) -> WeightsSource {
        WeightsSource {
            path,
            url,
            sha256,
            timeout: Duration::from_secs(5),
        }
    }

    /// Serve one canned HTTP response on an ephemeral port.
    fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let head = format!(
                    "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                let _ = stream.write_all(head.as_bytes());
                let _ = stream.write_all(body);
            }
        });
        format!("http://{addr}/weights.onnx")
    }

    #[test]
    fn cached_file_is_used_without_url() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.onnx");
        std::fs::write(&path, b"weights").unwrap();

        let resolved = ensure_weights(&source(path.clone(), None, None)).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    fn missing_file_without_url_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("absent.onnx");

        let err = ensure_weights(&source(path.clone(), None, None)).unwrap_err();
        assert!(matches!(err, ClassifierError::WeightsMissing(p) if p == path));
    }

    #[test]
    fn cached_file_with_wrong_checksum_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.onnx");
        std::fs::write(&path, b"tampered").unwrap();

        let err = ensure_weights(&source(path, None, Some(sha256_hex(b"original"))))
            .unwrap_err();
        assert!(matches!(err, ClassifierError::ChecksumMismatch { .. }));
    }

    #[test]
    fn download_populates_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("model.onnx");
        let url = serve_once("HTTP/1.1 200 OK", b"onnx-bytes");

        let resolved = ensure_weights(&source(
            path.clone(),
            Some(url),
            Some(sha256_hex(b"onnx-bytes")),
        ))
        .unwrap();

        assert_eq!(resolved, path);
        assert_eq!(std::fs::read(&path).unwrap(), b"onnx-bytes");
    }

    #[test]
    fn download_with_bad_checksum_leaves_no_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.onnx");
        let url = serve_once("HTTP/1.1 200 OK", b"corrupted");

        let err = ensure_weights(&source(
            path.clone(),
            Some(url),
            Some(sha256_hex(b"expected")),
        ))
        .unwrap_err();

        assert!(matches!(err, ClassifierError::ChecksumMismatch { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn http_error_is_a_download_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("model.onnx");
        let url = serve_once("HTTP/1.1 404 Not Found", b"");

        let err = ensure_weights(&source(path.clone(), Some(url), None)).unwrap_err();
        assert!(matches!(err, ClassifierError::Download(_)));
        assert!(!path.exists());
    }

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
