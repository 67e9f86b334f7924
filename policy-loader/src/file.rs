//! Local file schema loader.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::decode::decode_payload;
use crate::source::{SchemaSource, SourceLocation};
use crate::traits::{LoaderError, LoaderResult, SchemaLoader};

/// Reads schemas from the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

#[async_trait]
impl SchemaLoader for FileLoader {
    async fn load(&self, source: &SchemaSource) -> LoaderResult<String> {
        let SourceLocation::Path(path) = source.location() else {
            return Err(LoaderError::configuration(format!(
                "file loader cannot fetch remote URL {source}"
            )));
        };
        let location = path.display().to_string();

        let payload = tokio::fs::read(path)
            .await
            .map_err(|err| LoaderError::fetch(&location, err.to_string()))?;
        debug!(%location, bytes = payload.len(), "schema read from disk");

        decode_payload(&location, Bytes::from(payload), source.encoding())
    }
}
