//! Schema loaders for policy templates.
//!
//! A loader turns a [`SchemaSource`] into decoded text with a single read
//! attempt. [`SourceLoader`] dispatches to the file or HTTP implementation
//! based on the source location; both share the trait in [`traits`].

#![warn(missing_docs, clippy::pedantic)]

pub mod file;
pub mod http;
pub mod source;
pub mod traits;

mod decode;

use async_trait::async_trait;

pub use file::FileLoader;
pub use http::{HttpConfig, HttpLoader};
pub use source::{Encoding, SchemaSource, SourceLocation};
pub use traits::{LoaderError, LoaderResult, SchemaLoader};

/// Loader that reads local paths from disk and URLs over HTTP(S).
#[derive(Debug)]
pub struct SourceLoader {
    file: FileLoader,
    http: HttpLoader,
}

impl SourceLoader {
    /// Creates a loader whose HTTP side uses `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Configuration`] if the HTTP client cannot be built.
    pub fn new(config: HttpConfig) -> LoaderResult<Self> {
        Ok(Self {
            file: FileLoader,
            http: HttpLoader::new(config)?,
        })
    }
}

#[async_trait]
impl SchemaLoader for SourceLoader {
    async fn load(&self, source: &SchemaSource) -> LoaderResult<String> {
        match source.location() {
            SourceLocation::Path(_) => self.file.load(source).await,
            SourceLocation::Url(_) => self.http.load(source).await,
        }
    }
}
