//! ``src/fs/operations.rs``
//!
//! Destructive actions on the selected file: delete, gzip, gunzip.
//! All of them block until done; the widget reloads the listing afterwards.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, info, instrument};

use crate::error::AppError;

/// Suffix produced by compress and consumed by decompress.
pub const COMPRESSED_SUFFIX: &str = ".gz";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Delete,
    Compress,
    Decompress,
}

impl Operation {
    #[must_use]
    pub const fn operation_name(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Compress => "compress",
            Self::Decompress => "decompress",
        }
    }
}

pub trait FileOperator {
    fn delete(&self, path: &Path) -> Result<(), AppError>;

    /// Gzip `path` into `path.gz` and remove `path`. Returns the new path.
    fn compress(&self, path: &Path) -> Result<PathBuf, AppError>;

    /// Gunzip `path` (which ends in `.gz`) next to itself and remove it.
    /// Returns the new path.
    fn decompress(&self, path: &Path) -> Result<PathBuf, AppError>;

    fn perform(&self, operation: Operation, path: &Path) -> Result<(), AppError> {
        match operation {
            Operation::Delete => self.delete(path),
            Operation::Compress => self.compress(path).map(|_| ()),
            Operation::Decompress => self.decompress(path).map(|_| ()),
        }
    }
}

/// Whether `name` carries the compressed suffix, ignoring case.
#[must_use]
pub fn is_compressed(name: &str) -> bool {
    name.len() > COMPRESSED_SUFFIX.len()
        && name
            .get(name.len() - COMPRESSED_SUFFIX.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(COMPRESSED_SUFFIX))
}

/// Real filesystem operator backed by `std::fs` and `flate2`.
#[derive(Debug, Clone, Copy)]
pub struct FsOperator {
    pub level: Compression,
}

impl Default for FsOperator {
    fn default() -> Self {
        Self {
            level: Compression::default(),
        }
    }
}

impl FsOperator {
    /// Stream `src` through `pipe` into a fresh `dst`. A partial `dst` is
    /// removed on failure; `src` is removed on success.
    fn transcode<F>(operation: &str, src: &Path, dst: &Path, pipe: F) -> Result<(), AppError>
    where
        F: FnOnce(BufReader<File>, BufWriter<File>) -> io::Result<()>,
    {
        let fail = |e: io::Error| AppError::file_operation_failed(operation, src, e.to_string());

        if dst.exists() {
            return Err(AppError::file_operation_failed(
                operation,
                src,
                format!("{} already exists", dst.display()),
            ));
        }

        let input = File::open(src).map_err(fail)?;
        let output = File::create(dst).map_err(fail)?;

        if let Err(e) = pipe(BufReader::new(input), BufWriter::new(output)) {
            if let Err(cleanup) = fs::remove_file(dst) {
                debug!("Could not remove partial {}: {cleanup}", dst.display());
            }
            return Err(fail(e));
        }

        fs::remove_file(src).map_err(fail)
    }
}

impl FileOperator for FsOperator {
    #[instrument(level = "info", skip(self))]
    fn delete(&self, path: &Path) -> Result<(), AppError> {
        fs::remove_file(path)
            .map_err(|e| AppError::file_operation_failed("delete", path, e.to_string()))?;
        info!("Deleted {}", path.display());
        Ok(())
    }

    #[instrument(level = "info", skip(self))]
    fn compress(&self, path: &Path) -> Result<PathBuf, AppError> {
        let mut target = path.as_os_str().to_owned();
        target.push(COMPRESSED_SUFFIX);
        let target = PathBuf::from(target);

        let level = self.level;
        Self::transcode("compress", path, &target, |mut input, output| {
            let mut encoder = GzEncoder::new(output, level);
            io::copy(&mut input, &mut encoder)?;
            encoder.finish()?.flush()
        })?;

        info!("Compressed {} -> {}", path.display(), target.display());
        Ok(target)
    }

    #[instrument(level = "info", skip(self))]
    fn decompress(&self, path: &Path) -> Result<PathBuf, AppError> {
        if !is_compressed(&path.to_string_lossy()) {
            return Err(AppError::file_operation_failed(
                "decompress",
                path,
                format!("not a {COMPRESSED_SUFFIX} file"),
            ));
        }
        let target = path.with_extension("");

        Self::transcode("decompress", path, &target, |input, mut output| {
            let mut decoder = GzDecoder::new(input);
            io::copy(&mut decoder, &mut output)?;
            output.flush()
        })?;

        info!("Decompressed {} -> {}", path.display(), target.display());
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_compress_decompress_on_disk() {
        let tmp = TempDir::new().unwrap();
        let original = tmp.path().join("match.mvd");
        let payload = b"demo payload ".repeat(100);
        fs::write(&original, &payload).unwrap();

        let op = FsOperator::default();
        let packed = op.compress(&original).unwrap();
        assert_eq!(packed, tmp.path().join("match.mvd.gz"));
        assert!(!original.exists());
        assert!(fs::metadata(&packed).unwrap().len() < payload.len() as u64);

        let unpacked = op.decompress(&packed).unwrap();
        assert_eq!(unpacked, original);
        assert!(!packed.exists());
        assert_eq!(fs::read(&original).unwrap(), payload);
    }

    #[test]
    fn test_failed_decompress_leaves_source() {
        let tmp = TempDir::new().unwrap();
        let bogus = tmp.path().join("bogus.mvd.gz");
        fs::write(&bogus, b"not gzip at all").unwrap();

        let err = FsOperator::default().decompress(&bogus).unwrap_err();
        assert!(matches!(err, AppError::FileOperationFailed { .. }));
        assert!(bogus.exists());
        assert!(!tmp.path().join("bogus.mvd").exists());
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.mvd");
        fs::write(&src, b"a").unwrap();
        fs::write(tmp.path().join("a.mvd.gz"), b"old").unwrap();

        assert!(FsOperator::default().compress(&src).is_err());
        assert!(src.exists());
    }

    #[test]
    fn test_delete_and_perform() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("a.mvd");
        fs::write(&src, b"a").unwrap();

        FsOperator::default().perform(Operation::Delete, &src).unwrap();
        assert!(!src.exists());
        assert!(FsOperator::default().delete(&src).is_err());
    }

    #[test]
    fn test_is_compressed() {
        assert!(is_compressed("a.mvd.GZ"));
        assert!(!is_compressed(".gz"));
        assert!(!is_compressed("a.tgz"));
    }
}
