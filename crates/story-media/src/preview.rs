//! Preview handle allocation.
//!
//! Preview URLs behave like file descriptors: each allocation must be
//! released exactly once, on replacement, removal, or teardown. Release is
//! always explicit; a handle dropped without release is a leak and is logged
//! as such.

use std::collections::HashSet;
use std::sync::Mutex;
use uuid::Uuid;

use story_core::models::{MediaFile, PreviewUrl};

/// Owns one preview allocation. Consumed by `PreviewAllocator::release`.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    url: PreviewUrl,
    released: bool,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &PreviewUrl {
        &self.url
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(preview_id = %self.id, "Preview handle dropped without release");
        }
    }
}

/// Allocates and releases preview handles for selected media
pub trait PreviewAllocator: Send + Sync {
    fn allocate(&self, file: &MediaFile) -> PreviewHandle;
    fn release(&self, handle: PreviewHandle);
    /// Number of allocations not yet released
    fn live_count(&self) -> usize;
}

/// In-memory preview registry. Hands out `blob:` URLs keyed by allocation id
/// and tracks live allocations so teardown paths can be verified.
#[derive(Debug, Default)]
pub struct BlobPreviewAllocator {
    live: Mutex<HashSet<Uuid>>,
}

impl BlobPreviewAllocator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreviewAllocator for BlobPreviewAllocator {
    fn allocate(&self, file: &MediaFile) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.live
            .lock()
            .expect("preview registry lock poisoned")
            .insert(id);
        tracing::debug!(preview_id = %id, filename = %file.name, "Allocated preview handle");
        PreviewHandle {
            id,
            url: PreviewUrl(format!("blob:{}", id)),
            released: false,
        }
    }

    fn release(&self, mut handle: PreviewHandle) {
        let removed = self
            .live
            .lock()
            .expect("preview registry lock poisoned")
            .remove(&handle.id);
        if !removed {
            tracing::warn!(preview_id = %handle.id, "Released a preview handle that was not live");
        }
        handle.released = true;
        tracing::debug!(preview_id = %handle.id, "Released preview handle");
    }

    fn live_count(&self) -> usize {
        self.live
            .lock()
            .expect("preview registry lock poisoned")
            .len()
    }
}
