//! Zip archive extraction

use crate::error::ArchiveError;
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

/// Extract every entry of the zip archive at `file` into `dir`
///
/// Entries whose names would escape `dir` are rejected by the zip reader.
pub fn zip_extract<P: AsRef<Path>, Q: AsRef<Path>>(file: P, dir: Q) -> Result<(), ArchiveError> {
    let file = file.as_ref();
    let dir = dir.as_ref();
    let path = file.to_string_lossy().to_string();

    let reader = File::open(file).map_err(|e| ArchiveError::Open {
        path: path.clone(),
        source: e.into(),
    })?;
    let mut archive = ZipArchive::new(reader).map_err(|source| ArchiveError::Open {
        path: path.clone(),
        source,
    })?;

    archive.extract(dir).map_err(|source| ArchiveError::Extract {
        path,
        destination: dir.to_string_lossy().to_string(),
        source,
    })?;

    log::debug!(
        "Extracted {} entries from {} into {}",
        archive.len(),
        file.display(),
        dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::CompressionMethod;
    use zip::write::FileOptions;

    fn write_sample_zip(path: &Path) {
        let file = File::create(path).expect("create zip");
        let mut zip = zip::ZipWriter::new(file);
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);

        zip.add_directory("theme/", options).expect("add dir");
        zip.start_file("theme/style.css", options).expect("start file");
        zip.write_all(b"body { margin: 0 }").expect("write entry");
        zip.start_file("readme.txt", options).expect("start file");
        zip.write_all(b"hello").expect("write entry");
        zip.finish().expect("finish zip");
    }

    #[test]
    fn test_zip_extract_writes_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive = temp_dir.path().join("theme.zip");
        write_sample_zip(&archive);

        let out = temp_dir.path().join("out");
        zip_extract(&archive, &out).expect("extract");

        let css = std::fs::read_to_string(out.join("theme/style.css")).expect("read css");
        assert_eq!(css, "body { margin: 0 }");
        assert!(out.join("readme.txt").is_file());
    }

    #[test]
    fn test_zip_extract_missing_archive() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = zip_extract(temp_dir.path().join("none.zip"), temp_dir.path());
        assert!(matches!(result, Err(ArchiveError::Open { .. })));
    }

    #[test]
    fn test_zip_extract_rejects_non_zip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let bogus = temp_dir.path().join("bogus.zip");
        std::fs::write(&bogus, b"not a zip file").expect("write");

        let result = zip_extract(&bogus, temp_dir.path().join("out"));
        assert!(matches!(result, Err(ArchiveError::Open { .. })));
    }
}
