//! File system operations and path handling utilities
//!
//! Directory listing, recursive deletion, path normalization and a few
//! file-backed helpers used when serving a site.

use crate::error::FileError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::{Path, PathBuf};

type Result<T> = std::result::Result<T, FileError>;

fn io_error(path: &Path, source: std::io::Error) -> FileError {
    FileError::Io {
        path: path.to_string_lossy().to_string(),
        source,
    }
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_directory_exists<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| io_error(path, e))?;
    }
    Ok(())
}

/// Names of the sub-directories of `dir`, sorted
///
/// Plain files are skipped.
pub fn get_dir_list<P: AsRef<Path>>(dir: P) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| io_error(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| io_error(dir, e))?;
        if entry.path().is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Prefix `/` unless already present
pub fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Suffix `/` unless already present
pub fn ensure_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Trim whitespace and make sure the path starts and ends with `/`
///
/// # Examples
/// ```
/// use sitekit_core::utils::file::normalize_dir_path;
/// assert_eq!(normalize_dir_path(" var/www "), "/var/www/");
/// assert_eq!(normalize_dir_path("/var/www/"), "/var/www/");
/// ```
pub fn normalize_dir_path(path: &str) -> String {
    ensure_leading_slash(&ensure_trailing_slash(path.trim()))
}

/// True when the normalized path is an existing directory the current user
/// may write to
pub fn is_directory(dir: &str) -> bool {
    let normalized = normalize_dir_path(dir);
    match fs::metadata(&normalized) {
        Ok(metadata) => metadata.is_dir() && is_writable(Path::new(&normalized), &metadata),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn is_writable(path: &Path, _metadata: &fs::Metadata) -> bool {
    rustix::fs::access(path, rustix::fs::Access::WRITE_OK).is_ok()
}

#[cfg(not(unix))]
fn is_writable(_path: &Path, metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

/// Delete a file, or a directory tree bottom-up
///
/// A missing path is always reported as [`FileError::NotFound`]. When some
/// entries cannot be removed the rest of the tree is still processed and the
/// survivors are listed in [`FileError::PartialDelete`].
pub fn delete_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(FileError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(io_error(path, e)),
    };

    if !metadata.is_dir() {
        return fs::remove_file(path).map_err(|e| io_error(path, e));
    }

    let mut failed = Vec::new();
    remove_tree(path, &mut failed);
    if failed.is_empty() {
        log::debug!("Deleted directory tree {}", path.display());
        Ok(())
    } else {
        log::warn!(
            "Deleting {} left {} entries behind",
            path.display(),
            failed.len()
        );
        Err(FileError::PartialDelete {
            path: path.to_path_buf(),
            failed,
        })
    }
}

fn remove_tree(dir: &Path, failed: &mut Vec<PathBuf>) {
    match fs::read_dir(dir) {
        Ok(entries) => {
            for entry in entries.flatten() {
                let child = entry.path();
                let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
                if is_dir {
                    remove_tree(&child, failed);
                } else if fs::remove_file(&child).is_err() {
                    failed.push(child);
                }
            }
        }
        Err(_) => {
            failed.push(dir.to_path_buf());
            return;
        }
    }

    if fs::remove_dir(dir).is_err() {
        failed.push(dir.to_path_buf());
    }
}

/// True when `dir` contains the URL rewrite file (`.htaccess` by default)
pub fn is_url_rewrite<P: AsRef<Path>>(dir: P, file: Option<&str>) -> bool {
    dir.as_ref().join(file.unwrap_or(".htaccess")).is_file()
}

fn data_uri_mime_type(extension: &str) -> Option<&'static str> {
    match extension {
        "gif" => Some("image/gif"),
        "jpg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "ico" => Some("image/x-icon"),
        "eot" => Some("application/vnd.ms-fontobject"),
        "otf" | "ttf" | "woff" => Some("application/octet-stream"),
        _ => None,
    }
}

/// Encode an image or font file as a `data:` URI
///
/// Only gif, jpg, png, ico, eot, otf, ttf and woff are accepted; the format
/// is decided by the file extension.
pub fn base64_data_uri<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mime_type =
        data_uri_mime_type(&extension).ok_or_else(|| FileError::UnsupportedFormat {
            extension: extension.clone(),
        })?;

    let content = fs::read(path).map_err(|e| io_error(path, e))?;
    Ok(format!("data:{};base64,{}", mime_type, STANDARD.encode(content)))
}
