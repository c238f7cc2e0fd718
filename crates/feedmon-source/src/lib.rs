//! Object listing for feed buckets.
//!
//! A [`MetadataSource`] enumerates the objects under a bucket/prefix and
//! turns each into a [`FileRecord`] with its delivery date inferred from the
//! object path. Built-in sources list Google Cloud Storage through its JSON
//! API ([`gcs::GcsMetadataSource`]) or walk a local directory tree that
//! mirrors bucket layout ([`local::LocalDirSource`]).

pub mod error;
pub mod gcs;
pub mod local;

use async_trait::async_trait;
use error::Result;
use feedmon_common::types::FileRecord;

/// Lists the files delivered for a feed.
///
/// Implementations must drop folder placeholder objects. Files whose date
/// cannot be inferred are still returned, with `inferred_date = None`.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Source type name (e.g., `"gcs"`, `"local"`), used in logs.
    fn name(&self) -> &str;

    /// Lists every object under `bucket` whose key starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be completed.
    async fn list_files(&self, bucket: &str, prefix: &str) -> Result<Vec<FileRecord>>;
}
