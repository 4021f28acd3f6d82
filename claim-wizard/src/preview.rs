use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

use crate::validate::MediaType;

/// One registered preview payload.
#[derive(Debug, Clone)]
pub struct PreviewEntry {
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Arc<Vec<u8>>,
}

/// In-memory registry of image previews, the process-side analog of browser
/// object URLs. Entries are owned by [`PreviewHandle`]s: the handle lives on
/// the uploaded file it belongs to, and dropping it revokes the entry, so
/// removing a file, resetting a session's documents, or tearing the session
/// down releases its previews deterministically.
#[derive(Debug, Default)]
pub struct PreviewStore {
    entries: DashMap<Uuid, PreviewEntry>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preview and hand back the owning token.
    pub fn create(
        self: &Arc<Self>,
        file_name: impl Into<String>,
        media_type: MediaType,
        bytes: Arc<Vec<u8>>,
    ) -> PreviewHandle {
        let id = Uuid::new_v4();
        self.entries.insert(
            id,
            PreviewEntry {
                file_name: file_name.into(),
                media_type,
                bytes,
            },
        );
        PreviewHandle {
            id,
            store: Arc::clone(self),
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<PreviewEntry> {
        self.entries.get(id).map(|e| e.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Owner-side token for one preview entry. Not cloneable: exactly one owner.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    store: Arc<PreviewStore>,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.store.entries.remove(&self.id);
    }
}
