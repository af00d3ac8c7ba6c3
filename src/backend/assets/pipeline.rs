/**
 * Asset Pipeline
 *
 * Produces the binary assets a stampbook references by URL:
 *
 * - **Covers** - generated from the book's city and state at creation
 * - **Photos** - uploaded by the visitor
 * - **Stamps** - sticker art generated from a description of a photo
 *
 * Every operation ends with the object stored and a public URL returned.
 * `discard` removes an object again when the record that would have
 * referenced it could not be written.
 */

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::generation::{GenerationError, ImageGenerator, ImageSize};
use super::storage::{extension_for, sanitize_filename, ObjectStore, ObjectStoreError, StoredObject};

/// Prompt template for book covers
pub fn cover_prompt(city: &str, state: &str) -> String {
    format!("make an illustration of {city}, {state}, include landmarks")
}

/// Prompt template for stamp stickers
pub fn stamp_prompt(description: &str) -> String {
    format!(
        "make a travel stamp sticker in a flat illustrated style, bold outlines, \
         limited colors, white die-cut border, of the following scene: {description}"
    )
}

#[derive(Debug, Error)]
pub enum AssetError {
    /// No image generator is configured
    #[error("image generation is not configured")]
    GeneratorUnavailable,

    #[error("{0} is empty")]
    EmptyUpload(&'static str),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Storage(#[from] ObjectStoreError),
}

/// Generates, uploads and discards stampbook assets
#[derive(Clone)]
pub struct AssetPipeline {
    objects: Arc<dyn ObjectStore>,
    images: Option<Arc<dyn ImageGenerator>>,
}

impl AssetPipeline {
    pub fn new(objects: Arc<dyn ObjectStore>, images: Option<Arc<dyn ImageGenerator>>) -> Self {
        Self { objects, images }
    }

    pub fn can_generate(&self) -> bool {
        self.images.is_some()
    }

    fn generator(&self) -> Result<&Arc<dyn ImageGenerator>, AssetError> {
        self.images.as_ref().ok_or(AssetError::GeneratorUnavailable)
    }

    /// Generate and store the cover illustration for a city
    pub async fn generate_cover(&self, city: &str, state: &str) -> Result<StoredObject, AssetError> {
        let generator = self.generator()?;
        let image = generator.generate_image(&cover_prompt(city, state), ImageSize::COVER).await?;

        let key = format!(
            "covers/ai_generated_image_{}_{}.png",
            Utc::now().format("%Y%m%d_%H%M%S"),
            Uuid::new_v4().simple()
        );
        let stored = self.objects.put_object(&key, Bytes::from(image), "image/png").await?;
        tracing::info!(city, state, url = %stored.url, "cover generated");
        Ok(stored)
    }

    /// Store a visitor photo under a unique key
    ///
    /// A name without an extension gets one from the content type, so the
    /// media route serves the photo with the right type.
    pub async fn upload_photo(
        &self,
        filename: Option<&str>,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, AssetError> {
        if bytes.is_empty() {
            return Err(AssetError::EmptyUpload("file"));
        }
        let mut name = sanitize_filename(filename.unwrap_or("upload"));
        if !name.contains('.') {
            if let Some(ext) = extension_for(content_type) {
                name = format!("{name}.{ext}");
            }
        }
        let key = format!("photos/{}-{}", Uuid::new_v4().simple(), name);
        Ok(self.objects.put_object(&key, bytes, content_type).await?)
    }

    /// Describe the reference photo, then render a sticker from the description
    pub async fn generate_stamp_image(&self, reference: &[u8], content_type: &str) -> Result<StoredObject, AssetError> {
        if reference.is_empty() {
            return Err(AssetError::EmptyUpload("reference_image"));
        }
        let generator = self.generator()?;

        let description = generator.describe_image(reference, content_type).await?;
        tracing::debug!(%description, "reference image described");

        let image = generator.generate_image(&stamp_prompt(&description), ImageSize::STAMP).await?;
        let key = format!("stamps/{}.png", Uuid::new_v4().simple());
        Ok(self.objects.put_object(&key, Bytes::from(image), "image/png").await?)
    }

    /// Best-effort removal of an object nothing will reference
    pub async fn discard(&self, object: &StoredObject) {
        if let Err(e) = self.objects.delete_object(&object.key).await {
            tracing::warn!(key = %object.key, "failed to discard object: {}", e);
        }
    }

    /// Hold a stored object until the record referencing it is written
    ///
    /// The object is discarded unless [`PendingObject::keep`] is called,
    /// including when the owning future is dropped mid-await.
    pub fn pending(&self, object: StoredObject) -> PendingObject {
        PendingObject {
            assets: self.clone(),
            object: Some(object),
        }
    }
}

/// A stored object awaiting the record that will reference it
pub struct PendingObject {
    assets: AssetPipeline,
    object: Option<StoredObject>,
}

impl PendingObject {
    /// The record is written; the object stays
    pub fn keep(mut self) {
        self.object = None;
    }

    /// The record will not be written; remove the object now
    pub async fn discard(mut self) {
        if let Some(object) = self.object.take() {
            self.assets.discard(&object).await;
        }
    }
}

impl Drop for PendingObject {
    fn drop(&mut self) {
        let Some(object) = self.object.take() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(key = %object.key, "no runtime to discard abandoned object");
            return;
        };
        tracing::warn!(key = %object.key, "request abandoned, discarding object");
        let assets = self.assets.clone();
        runtime.spawn(async move { assets.discard(&object).await });
    }
}
