use crate::error::Result;
use crate::MetadataSource;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feedmon_common::path_date::is_folder_placeholder;
use feedmon_common::types::FileRecord;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists files from a directory tree laid out as `<root>/<bucket>/<key>`.
///
/// Useful for mirrored buckets and for exercising the pipeline without
/// cloud credentials.
pub struct LocalDirSource {
    root: PathBuf,
}

impl LocalDirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

fn object_key(bucket_dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(bucket_dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

fn walk_bucket(bucket_dir: &Path, prefix: &str) -> Result<Vec<FileRecord>> {
    if !bucket_dir.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("bucket directory {} does not exist", bucket_dir.display()),
        )
        .into());
    }

    let mut records = Vec::new();
    for entry in WalkDir::new(bucket_dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(key) = object_key(bucket_dir, entry.path()) else {
            continue;
        };
        if !key.starts_with(prefix) || is_folder_placeholder(&key) {
            continue;
        }

        let metadata = entry.metadata()?;
        let modified: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_default();
        records.push(FileRecord::new(key, metadata.len(), modified));
    }
    Ok(records)
}

#[async_trait]
impl MetadataSource for LocalDirSource {
    fn name(&self) -> &str {
        "local"
    }

    async fn list_files(&self, bucket: &str, prefix: &str) -> Result<Vec<FileRecord>> {
        let bucket_dir = self.root.join(bucket);
        let prefix_owned = prefix.to_string();
        let records =
            tokio::task::spawn_blocking(move || walk_bucket(&bucket_dir, &prefix_owned)).await??;

        tracing::info!(bucket, prefix, files = records.len(), "Listed local bucket");
        Ok(records)
    }
}
