//! Assets Module
//!
//! Covers, photos and stamp stickers: generation, storage and the
//! multipart upload endpoints.
//!
//! - **`storage`** - `ObjectStore` trait, local and in-memory adapters
//! - **`generation`** - `ImageGenerator` trait and the Hyperbolic client
//! - **`pipeline`** - `AssetPipeline`, the operations handlers call
//! - **`handlers`** - `/upload-photo`, `/stampbook/generate-stamp-image`

/// Object storage
pub mod storage;

/// Image generation
pub mod generation;

/// Asset pipeline
pub mod pipeline;

/// HTTP handlers
pub mod handlers;

pub use generation::{GenerationError, HyperbolicClient, ImageGenerator, ImageSize};
pub use handlers::{generate_stamp_image, upload_photo, MAX_UPLOAD_BYTES};
pub use pipeline::{AssetError, AssetPipeline, PendingObject};
pub use storage::{LocalObjectStore, MemoryObjectStore, ObjectStore, ObjectStoreError, StoredObject};
