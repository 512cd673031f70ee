use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{debug, info};

use crate::compose::{SvgTemplate, compose_document};
use crate::foundation::error::{AvatrError, AvatrResult};
use crate::parts::{PartFragment, SLOT_NAMES, fragment_path, parse_fragment};
use crate::render::rasterize_png;
use crate::schema::{JobRequest, PaletteEntry};
use crate::store::{IMMUTABLE_CACHE, ObjectStore, PNG_CONTENT_TYPE};

/// Backend half of the pipeline: fetches the selected fragments, merges them,
/// rasterizes, and stores the PNG under the job's key.
pub struct CompositionWorker {
    store: Arc<dyn ObjectStore>,
    template: SvgTemplate,
}

impl CompositionWorker {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            template: SvgTemplate::default(),
        }
    }

    /// Run one job to completion.
    ///
    /// The only write is the final `put`, so a failure at any step leaves the
    /// store untouched.
    #[tracing::instrument(skip(self, job), fields(key = %job.key))]
    pub async fn process(&self, job: &JobRequest) -> AvatrResult<()> {
        let png = self.compose_png(&job.parts, &job.palette).await?;
        self.store
            .put(&job.key, png, PNG_CONTENT_TYPE, IMMUTABLE_CACHE)
            .await?;
        info!("stored rendered avatar");
        Ok(())
    }

    /// Fetch, merge, and rasterize one avatar without storing it.
    ///
    /// All 13 fragment fetches run concurrently; any missing or unparsable
    /// fragment fails the whole composition.
    pub async fn compose_png(&self, parts: &[u32], palette: &[PaletteEntry]) -> AvatrResult<Vec<u8>> {
        if parts.len() != SLOT_NAMES.len() {
            return Err(AvatrError::validation(format!(
                "job has {} part indices, expected {}",
                parts.len(),
                SLOT_NAMES.len()
            )));
        }

        let fragments = self.fetch_fragments(parts).await?;
        let svg = compose_document(&self.template, &fragments, palette);
        debug!(bytes = svg.len(), "composed avatar document");
        rasterize_png(&svg)
    }

    async fn fetch_fragments(&self, parts: &[u32]) -> AvatrResult<Vec<PartFragment>> {
        let fetches = SLOT_NAMES.iter().zip(parts).map(|(slot, &index)| {
            let path = fragment_path(slot, index);
            let store = Arc::clone(&self.store);
            async move {
                let bytes = store
                    .get(&path)
                    .await
                    .map_err(|e| AvatrError::fragment(format!("fetch of `{path}` failed: {e}")))?;
                let text = String::from_utf8(bytes)
                    .map_err(|_| AvatrError::fragment(format!("`{path}` is not UTF-8")))?;
                parse_fragment(&text)
                    .map_err(|e| AvatrError::fragment(format!("parse of `{path}` failed: {e}")))
            }
        });
        try_join_all(fetches).await
    }
}
