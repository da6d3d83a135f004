use std::path::Path;

use log::info;

use crate::error::LoadError;

/// Where the L1 menu tools publish their example rate tables.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/cms-l1-dpg/L1MenuTools/master/piechart-tool";

/// URL a missing table is fetched from: the table path appended to `base_url`.
pub fn remote_url(base_url: &str, path: &Path) -> String {
    let rel = path.to_string_lossy().replace('\\', "/");
    let rel = rel.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{}", base_url.trim_end_matches('/'), rel)
}

/// Make sure `path` exists locally, downloading it once if it does not.
///
/// There is no retry: any failure surfaces as [`LoadError::Fetch`].
pub fn ensure_local(path: &Path, base_url: &str) -> Result<(), LoadError> {
    if path.exists() {
        info!("Rate table exists, no need to download it");
        return Ok(());
    }
    download(path, base_url)
}

#[cfg(feature = "fetch")]
fn download(path: &Path, base_url: &str) -> Result<(), LoadError> {
    let url = remote_url(base_url, path);
    info!("{} not found, fetching {url}", path.display());

    let fetch_err = |reason: String| LoadError::Fetch {
        url: url.clone(),
        reason,
    };

    let response = reqwest::blocking::get(&url).map_err(|e| fetch_err(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(fetch_err(format!("HTTP {status}")));
    }
    let body = response.bytes().map_err(|e| fetch_err(e.to_string()))?;

    let io_err = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    std::fs::write(path, &body).map_err(io_err)?;

    info!("saved {} bytes to {}", body.len(), path.display());
    Ok(())
}

#[cfg(not(feature = "fetch"))]
fn download(path: &Path, _base_url: &str) -> Result<(), LoadError> {
    Err(LoadError::NotFound(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_relative_path() {
        assert_eq!(
            remote_url(DEFAULT_BASE_URL, Path::new("example-inputs/output_Run2unpacked.csv")),
            format!("{DEFAULT_BASE_URL}/example-inputs/output_Run2unpacked.csv")
        );
        assert_eq!(
            remote_url("https://host/tool/", Path::new("./table.csv")),
            "https://host/tool/table.csv"
        );
    }

    #[test]
    fn existing_file_is_left_alone() {
        let file = tempfile::NamedTempFile::new().unwrap();
        ensure_local(file.path(), "http://127.0.0.1:9/unreachable").unwrap();
    }
}
