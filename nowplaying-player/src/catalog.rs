//! # Items & Catalog
//!
//! Types describing what can be played, and the identity-path contract a
//! restoration collaborator uses to re-attach to the same logical item
//! after a restart.
//!
//! ## Overview
//!
//! A [`PlaybackItem`] is a lightweight handle: a stable id, a display
//! name, and a resolvable [`MediaLocation`]. Items are owned by an
//! external catalog; the coordinator only clones handles and never manages
//! their lifecycle.
//!
//! A [`Catalog`] maps between items and *identity paths*: the sequence of
//! ids from the catalog root down to an item. Identity paths are stable
//! across process restarts, so a presentation layer can persist the path
//! of the current item and resolve it again later. Re-attaching always
//! reconstructs the playback session from scratch.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

// ============================================================================
// Media Locations
// ============================================================================

/// Resolvable location of a playable source.
///
/// The location is opaque to the coordinator; only the audio engine
/// interprets it. `Eq + Hash` so engines can key lookup tables by location.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaLocation {
    /// Audio stored on the local filesystem.
    LocalFile {
        /// Absolute path to the audio file
        path: PathBuf,
    },

    /// Audio held in memory (e.g., a recording not yet flushed to disk).
    InMemory {
        /// Raw source data (encoded format, not PCM)
        data: bytes::Bytes,
        /// Optional hint about the container/codec
        hint: Option<String>,
    },
}

impl MediaLocation {
    /// Returns `true` if the audio data is already in memory.
    pub fn is_in_memory(&self) -> bool {
        matches!(self, MediaLocation::InMemory { .. })
    }

    /// Short log-safe description: basename for files, a size tag for
    /// in-memory data.
    pub fn describe(&self) -> String {
        match self {
            MediaLocation::LocalFile { path } => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "<unnamed file>".to_string()),
            MediaLocation::InMemory { data, .. } => format!("<memory: {} bytes>", data.len()),
        }
    }
}

// ============================================================================
// Playback Items
// ============================================================================

/// Handle to a playable source: a stable id, a name, and a location.
///
/// Equality is identity: two handles compare equal iff they refer to the
/// same catalog entry, regardless of name or location edits.
#[derive(Debug, Clone)]
pub struct PlaybackItem {
    id: Uuid,
    name: String,
    location: MediaLocation,
}

impl PlaybackItem {
    /// Creates a new item with a fresh id.
    pub fn new(name: impl Into<String>, location: MediaLocation) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            location,
        }
    }

    /// The stable identity of this item.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the audio lives.
    pub fn location(&self) -> &MediaLocation {
        &self.location
    }
}

impl PartialEq for PlaybackItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PlaybackItem {}

// ============================================================================
// Catalog
// ============================================================================

/// Resolves identity paths to items and items back to identity paths.
///
/// An identity path is the chain of ids from the catalog root (inclusive)
/// down to the item (inclusive). Implementations are the owning store for
/// items; the coordinator never mutates a catalog.
pub trait Catalog: Send + Sync {
    /// Resolves a full identity path to the item it names.
    ///
    /// Returns `None` if any segment of the path no longer exists or the
    /// chain does not match the catalog's current structure.
    fn item_at_path(&self, path: &[Uuid]) -> Option<PlaybackItem>;

    /// Produces the identity path for an item id, root first.
    fn path_for(&self, item_id: Uuid) -> Option<Vec<Uuid>>;
}

/// In-memory folder-tree catalog.
///
/// Suitable for tests and for hosts whose item store is small enough to
/// mirror in memory. Folders carry no names here; only the id chain
/// matters for the identity-path contract.
pub struct MemoryCatalog {
    inner: RwLock<CatalogInner>,
}

struct CatalogInner {
    root: Uuid,
    /// folder id -> parent folder id (root maps to None)
    folders: HashMap<Uuid, Option<Uuid>>,
    /// item id -> (containing folder, item)
    items: HashMap<Uuid, (Uuid, PlaybackItem)>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        let root = Uuid::new_v4();
        let mut folders = HashMap::new();
        folders.insert(root, None);
        Self {
            inner: RwLock::new(CatalogInner {
                root,
                folders,
                items: HashMap::new(),
            }),
        }
    }

    /// Id of the root folder. Every identity path starts with it.
    pub fn root_id(&self) -> Uuid {
        self.inner.read().root
    }

    /// Creates a folder under `parent` and returns its id.
    ///
    /// Returns `None` if `parent` is not a known folder.
    pub fn add_folder(&self, parent: Uuid) -> Option<Uuid> {
        let mut inner = self.inner.write();
        if !inner.folders.contains_key(&parent) {
            return None;
        }
        let id = Uuid::new_v4();
        inner.folders.insert(id, Some(parent));
        Some(id)
    }

    /// Places an item into `folder`. Returns `false` if the folder is
    /// unknown or the item id is already present.
    pub fn add_item(&self, folder: Uuid, item: PlaybackItem) -> bool {
        let mut inner = self.inner.write();
        if !inner.folders.contains_key(&folder) || inner.items.contains_key(&item.id()) {
            return false;
        }
        inner.items.insert(item.id(), (folder, item));
        true
    }

    /// Removes an item. Returns the removed handle, if any.
    pub fn remove_item(&self, item_id: Uuid) -> Option<PlaybackItem> {
        self.inner.write().items.remove(&item_id).map(|(_, item)| item)
    }

    /// Looks an item up by id.
    pub fn item(&self, item_id: Uuid) -> Option<PlaybackItem> {
        self.inner
            .read()
            .items
            .get(&item_id)
            .map(|(_, item)| item.clone())
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for MemoryCatalog {
    fn item_at_path(&self, path: &[Uuid]) -> Option<PlaybackItem> {
        let inner = self.inner.read();

        let (&item_id, folder_chain) = path.split_last()?;
        let (containing_folder, item) = inner.items.get(&item_id)?;

        // The folder chain must match the item's ancestry exactly,
        // root first.
        let mut expected = Vec::new();
        let mut cursor = Some(*containing_folder);
        while let Some(folder) = cursor {
            expected.push(folder);
            cursor = *inner.folders.get(&folder)?;
        }
        expected.reverse();

        if folder_chain == expected.as_slice() {
            Some(item.clone())
        } else {
            None
        }
    }

    fn path_for(&self, item_id: Uuid) -> Option<Vec<Uuid>> {
        let inner = self.inner.read();
        let (containing_folder, _) = inner.items.get(&item_id)?;

        let mut path = vec![item_id];
        let mut cursor = Some(*containing_folder);
        while let Some(folder) = cursor {
            path.push(folder);
            cursor = *inner.folders.get(&folder)?;
        }
        path.reverse();
        Some(path)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn local(name: &str) -> MediaLocation {
        MediaLocation::LocalFile {
            path: PathBuf::from(format!("/recordings/{name}")),
        }
    }

    #[test]
    fn item_equality_is_identity() {
        let a = PlaybackItem::new("Memo", local("a.m4a"));
        let b = PlaybackItem::new("Memo", local("a.m4a"));
        assert_ne!(a, b);

        let mut renamed = a.clone();
        renamed.name = "Renamed".to_string();
        assert_eq!(a, renamed);
    }

    #[test]
    fn location_describe_is_log_safe() {
        assert_eq!(local("memo.m4a").describe(), "memo.m4a");

        let mem = MediaLocation::InMemory {
            data: bytes::Bytes::from_static(&[0, 1, 2]),
            hint: None,
        };
        assert_eq!(mem.describe(), "<memory: 3 bytes>");
        assert!(mem.is_in_memory());
    }

    #[test]
    fn path_round_trip_through_nested_folders() {
        let catalog = MemoryCatalog::new();
        let folder = catalog.add_folder(catalog.root_id()).unwrap();
        let subfolder = catalog.add_folder(folder).unwrap();

        let item = PlaybackItem::new("Memo", local("memo.m4a"));
        assert!(catalog.add_item(subfolder, item.clone()));

        let path = catalog.path_for(item.id()).unwrap();
        assert_eq!(path, vec![catalog.root_id(), folder, subfolder, item.id()]);

        let resolved = catalog.item_at_path(&path).unwrap();
        assert_eq!(resolved, item);
        assert_eq!(resolved.name(), "Memo");
    }

    #[test]
    fn stale_path_does_not_resolve() {
        let catalog = MemoryCatalog::new();
        let item = PlaybackItem::new("Memo", local("memo.m4a"));
        assert!(catalog.add_item(catalog.root_id(), item.clone()));

        let path = catalog.path_for(item.id()).unwrap();
        catalog.remove_item(item.id());

        assert!(catalog.item_at_path(&path).is_none());
        assert!(catalog.path_for(item.id()).is_none());
    }

    #[test]
    fn mismatched_folder_chain_does_not_resolve() {
        let catalog = MemoryCatalog::new();
        let folder_a = catalog.add_folder(catalog.root_id()).unwrap();
        let folder_b = catalog.add_folder(catalog.root_id()).unwrap();

        let item = PlaybackItem::new("Memo", local("memo.m4a"));
        assert!(catalog.add_item(folder_a, item.clone()));

        let wrong_path = vec![catalog.root_id(), folder_b, item.id()];
        assert!(catalog.item_at_path(&wrong_path).is_none());

        // Truncated paths are rejected too.
        assert!(catalog.item_at_path(&[item.id()]).is_none());
        assert!(catalog.item_at_path(&[]).is_none());
    }

    #[test]
    fn duplicate_item_ids_rejected() {
        let catalog = MemoryCatalog::new();
        let item = PlaybackItem::new("Memo", local("memo.m4a"));
        assert!(catalog.add_item(catalog.root_id(), item.clone()));
        assert!(!catalog.add_item(catalog.root_id(), item));
    }
}
