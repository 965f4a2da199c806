//! ``src/fs/archive.rs``
//!
//! Tar archive listing, plain or gzip-compressed. Members are reported with
//! their path inside the archive; the archive file is opened and closed
//! within a single `enumerate` call.

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::ControlFlow;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::error::AppError;
use crate::fs::enumerator::{ArchiveReader, EntryEnumerator, RawEntry, Visit};
use crate::model::entry::ModifiedAt;

const TAR_SUFFIXES: [&str; 3] = [".tar", ".tar.gz", ".tgz"];

#[derive(Debug, Clone, Copy, Default)]
pub struct TarEnumerator;

impl TarEnumerator {
    fn open(path: &Path) -> Result<Archive<Box<dyn Read>>, AppError> {
        let file = File::open(path).map_err(|e| AppError::enumeration(path, e))?;
        let reader = BufReader::new(file);

        let lower = path.to_string_lossy().to_ascii_lowercase();
        let stream: Box<dyn Read> = if lower.ends_with(".gz") || lower.ends_with(".tgz") {
            Box::new(GzDecoder::new(reader))
        } else {
            Box::new(reader)
        };

        Ok(Archive::new(stream))
    }
}

impl EntryEnumerator for TarEnumerator {
    fn enumerate(&self, root: &Path, visit: &mut Visit<'_>) -> Result<(), AppError> {
        let mut archive = Self::open(root)?;
        let members = archive
            .entries()
            .map_err(|e| AppError::archive(root, e.to_string()))?;

        for member in members {
            let member = member.map_err(|e| AppError::archive(root, e.to_string()))?;
            let header = member.header();
            let kind = header.entry_type();
            if !(kind.is_file() || kind.is_dir()) {
                continue;
            }

            let path = member
                .path()
                .map_err(|e| AppError::archive(root, e.to_string()))?;
            let text = path.to_string_lossy();
            let name = text.trim_start_matches("./").trim_end_matches('/');
            if name.is_empty() {
                continue;
            }

            let leaf = name.rsplit('/').next().unwrap_or(name);
            let raw = RawEntry {
                name: name.to_string(),
                is_dir: kind.is_dir(),
                is_hidden: leaf.starts_with('.'),
                size: header.size().unwrap_or(0),
                modified: header
                    .mtime()
                    .map(ModifiedAt::from_unix_secs)
                    .unwrap_or_default(),
            };

            if visit(raw).is_break() {
                debug!("Stopped listing {} early", root.display());
                break;
            }
        }

        Ok(())
    }
}

impl ArchiveReader for TarEnumerator {
    fn is_archive(&self, name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        TAR_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io;
    use tar::{Builder, EntryType, Header};
    use tempfile::TempDir;

    fn file_header(size: u64) -> Header {
        let mut header = Header::new_gnu();
        header.set_size(size);
        header.set_mode(0o644);
        header.set_mtime(1_700_000_000);
        header
    }

    fn write_tar_gz(path: &Path, members: &[(&str, &[u8])]) {
        let file = File::create(path).unwrap();
        let mut builder = Builder::new(GzEncoder::new(file, Compression::default()));
        for (name, data) in members {
            if name.ends_with('/') {
                let mut header = file_header(0);
                header.set_entry_type(EntryType::Directory);
                header.set_mode(0o755);
                builder.append_data(&mut header, name, io::empty()).unwrap();
            } else {
                let mut header = file_header(data.len() as u64);
                builder.append_data(&mut header, name, *data).unwrap();
            }
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn collect(path: &Path) -> Vec<RawEntry> {
        let mut out = Vec::new();
        TarEnumerator
            .enumerate(path, &mut |raw| {
                out.push(raw);
                ControlFlow::Continue(())
            })
            .unwrap();
        out
    }

    #[test]
    fn test_lists_members_with_paths() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("pack.tar.gz");
        write_tar_gz(
            &path,
            &[
                ("demos/", &b""[..]),
                ("demos/a.mvd", &b"abc"[..]),
                ("demos/.hidden.mvd", &b""[..]),
                ("readme.txt", &b"hi"[..]),
            ],
        );

        let members = collect(&path);
        assert_eq!(members.len(), 4);

        assert_eq!(members[0].name, "demos");
        assert!(members[0].is_dir);

        assert_eq!(members[1].name, "demos/a.mvd");
        assert_eq!(members[1].size, 3);
        assert_eq!(members[1].modified, ModifiedAt::from_unix_secs(1_700_000_000));

        assert!(members[2].is_hidden);
        assert!(!members[3].is_hidden);
    }

    #[test]
    fn test_plain_tar_and_early_break() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("plain.tar");
        {
            let mut builder = Builder::new(File::create(&path).unwrap());
            for name in ["1.mvd", "2.mvd", "3.mvd"] {
                let mut header = file_header(1);
                builder.append_data(&mut header, name, &b"x"[..]).unwrap();
            }
            builder.finish().unwrap();
        }

        let mut seen = Vec::new();
        TarEnumerator
            .enumerate(&path, &mut |raw| {
                seen.push(raw.name);
                if seen.len() == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(seen, vec!["1.mvd", "2.mvd"]);
    }

    #[test]
    fn test_open_failures() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.tar");
        assert!(matches!(
            TarEnumerator.enumerate(&missing, &mut |_| ControlFlow::Continue(())),
            Err(AppError::Enumeration { .. })
        ));

        let garbage = tmp.path().join("garbage.tgz");
        std::fs::write(&garbage, b"definitely not gzip").unwrap();
        assert!(TarEnumerator
            .enumerate(&garbage, &mut |_| ControlFlow::Continue(()))
            .is_err());
    }

    #[test]
    fn test_is_archive() {
        assert!(TarEnumerator.is_archive("a.TAR"));
        assert!(TarEnumerator.is_archive("a.tar.gz"));
        assert!(TarEnumerator.is_archive("a.tgz"));
        assert!(!TarEnumerator.is_archive("a.mvd.gz"));
        assert!(!TarEnumerator.is_archive("tar"));
    }
}
