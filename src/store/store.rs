//! Record store
//!
//! Owns the in-memory document of one file. Mutations only touch memory;
//! [`RecordStore::commit`] writes the whole document back.
//!
//! Lifecycle:
//! - `create`: fresh empty document, committed immediately (overwrites)
//! - `load`: existing file parsed verbatim, fails if the file is missing
//! - `insert` / `update` / `delete`: in-memory only
//! - `commit`: replaces the file with the current document
//! - drop: nothing is written
//!
//! One store per file. Mutation takes `&mut self`, so sharing a store across
//! threads needs a lock held by the caller; two stores over the same path
//! silently overwrite each other's commits.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::{DuplicatePolicy, StoreConfig};
use super::errors::{StoreError, StoreResult};
use super::index::IdIndex;
use super::persist;
use super::query::Query;
use crate::document::{xml, DocumentMapper, Element, MappingResult};
use crate::schema::{Record, Schema};

/// Outcome of decoding one record element during a scan.
#[derive(Debug)]
pub struct ScanEntry<T> {
    /// The element's identifier, if it has one
    pub id: Option<String>,
    pub result: MappingResult<T>,
}

/// File-backed store of `T` records keyed by caller-supplied identifiers.
pub struct RecordStore<T: Record> {
    path: PathBuf,
    config: StoreConfig,
    mapper: DocumentMapper<T>,
    root: Element,
    index: IdIndex,
    dirty: bool,
}

impl<T: Record> RecordStore<T> {
    /// Creates an empty store at `path` with the default configuration.
    ///
    /// An existing file at `path` is overwritten.
    pub fn create(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::create_with(path, StoreConfig::default())
    }

    /// Creates an empty store at `path` and commits it immediately.
    ///
    /// # Errors
    ///
    /// - `Schema` if `T` cannot be reflected (e.g. `UnconstructibleType`)
    /// - `Io` if the empty document cannot be written
    pub fn create_with(path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let mapper = DocumentMapper::<T>::new()?;
        let root = Element::new(mapper.schema().collection_name.clone());

        let mut store = Self {
            path: path.as_ref().to_path_buf(),
            config,
            mapper,
            root,
            index: IdIndex::default(),
            dirty: true,
        };
        store.commit()?;

        info!(
            path = %store.path.display(),
            record_type = T::TYPE_NAME,
            "created record store"
        );
        Ok(store)
    }

    /// Loads the store at `path` with the default configuration.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::load_with(path, StoreConfig::default())
    }

    /// Loads an existing store file.
    ///
    /// The document is taken as is. Record elements are only checked
    /// against `T` when they are decoded.
    ///
    /// # Errors
    ///
    /// - `StoreNotFound` if `path` is not an existing file; nothing is created
    /// - `Schema` if `T` cannot be reflected
    /// - `Document` if the file is not well-formed XML
    pub fn load_with(path: impl AsRef<Path>, config: StoreConfig) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mapper = DocumentMapper::<T>::new()?;
        let text = persist::read_document(&path)?;
        let root = xml::parse(&text)?;

        let collection_name = &mapper.schema().collection_name;
        if root.name() != collection_name {
            warn!(
                path = %path.display(),
                expected = %collection_name,
                found = root.name(),
                "unexpected root element name"
            );
        }

        let index = IdIndex::build(&root, T::TYPE_NAME);
        if index.unidentified() > 0 {
            warn!(
                path = %path.display(),
                count = index.unidentified(),
                "record elements without an ID attribute cannot be looked up"
            );
        }

        info!(
            path = %path.display(),
            record_type = T::TYPE_NAME,
            records = index.len(),
            "loaded record store"
        );

        Ok(Self {
            path,
            config,
            mapper,
            root,
            index,
            dirty: false,
        })
    }

    /// Appends `record` under `id`.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if `id` is present and the policy is `Reject`. With
    /// `Allow` the record is appended and stays shadowed by the earlier one.
    pub fn insert(&mut self, id: impl Into<String>, record: &T) -> StoreResult<()> {
        let id = id.into();
        if self.index.contains(&id) && self.config.duplicate_ids == DuplicatePolicy::Reject {
            return Err(StoreError::DuplicateId(id));
        }

        let element = self.mapper.encode(record, &id);
        let position = self.root.push_child(element);
        self.index.insert(&id, position);
        self.dirty = true;

        debug!(id = %id, "inserted record");
        Ok(())
    }

    /// Appends `record` under a fresh UUID v4 identifier and returns it.
    pub fn insert_generated(&mut self, record: &T) -> StoreResult<String> {
        let id = Uuid::new_v4().to_string();
        self.insert(id.clone(), record)?;
        Ok(id)
    }

    /// Removes the record stored under `id`.
    ///
    /// # Errors
    ///
    /// `NotFound` if no record has this identifier.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let position = self.position(id)?;
        self.root.remove_child(position);
        // positions after the removed element shift, and a shadowed
        // duplicate may now be the first match
        self.index = IdIndex::build(&self.root, T::TYPE_NAME);
        self.dirty = true;

        debug!(id = %id, "deleted record");
        Ok(())
    }

    /// Overwrites the stored fields of `id` with the present values of
    /// `record`. Absent values keep what is stored.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record has this identifier
    /// - `Mapping(MissingFieldNode)` if the stored element lacks a leaf;
    ///   the element is left unchanged
    pub fn update(&mut self, id: &str, record: &T) -> StoreResult<()> {
        let position = self.position(id)?;
        let element = self
            .root
            .child_at_mut(position)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.mapper.update_in_place(element, record)?;
        self.dirty = true;

        debug!(id = %id, "updated record");
        Ok(())
    }

    /// Decodes the record stored under `id`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no record has this identifier
    /// - `Mapping(FieldConversion)` if a stored value does not fit its field
    pub fn read(&self, id: &str) -> StoreResult<T> {
        let position = self.position(id)?;
        let element = self
            .root
            .children()
            .get(position)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(self.mapper.decode(element)?)
    }

    /// Decodes every record in document order.
    ///
    /// Records that fail to decode are skipped and logged; use
    /// [`scan`](Self::scan) to see the failures.
    pub fn read_all(&self) -> Vec<T> {
        self.scan()
            .into_iter()
            .filter_map(|entry| match entry.result {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        path = %self.path.display(),
                        id = entry.id.as_deref().unwrap_or(""),
                        error = %e,
                        "skipping undecodable record"
                    );
                    None
                }
            })
            .collect()
    }

    /// Decodes every record in document order, keeping per-record failures.
    pub fn scan(&self) -> Vec<ScanEntry<T>> {
        self.records()
            .map(|element| ScanEntry {
                id: DocumentMapper::<T>::identifier(element).map(str::to_string),
                result: self.mapper.decode(element),
            })
            .collect()
    }

    /// Snapshot of [`read_all`](Self::read_all) for in-memory filtering.
    pub fn query(&self) -> Query<T> {
        Query::new(self.read_all())
    }

    /// Writes the whole in-memory document to the store path.
    ///
    /// The previous file is replaced atomically. On error the file is
    /// untouched and the store stays dirty.
    pub fn commit(&mut self) -> StoreResult<()> {
        let text = xml::write(&self.root, &self.config.write_options()).map_err(|source| {
            StoreError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        persist::write_atomic(&self.path, &text, self.config.create_dirs)?;
        self.dirty = false;

        info!(
            path = %self.path.display(),
            records = self.len(),
            bytes = text.len(),
            "committed record store"
        );
        Ok(())
    }

    /// Number of record elements, duplicates included
    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.records().next().is_none()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Identifiers in document order, duplicates included
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.records().filter_map(DocumentMapper::<T>::identifier)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        self.mapper.schema()
    }

    /// Whether there are mutations not yet committed
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The in-memory document root
    pub fn document(&self) -> &Element {
        &self.root
    }

    fn records(&self) -> impl Iterator<Item = &Element> + '_ {
        self.root.children_named(T::TYPE_NAME)
    }

    fn position(&self, id: &str) -> StoreResult<usize> {
        self.index
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

impl<T: Record> fmt::Debug for RecordStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore")
            .field("path", &self.path)
            .field("record_type", &T::TYPE_NAME)
            .field("records", &self.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl<T: Record> Drop for RecordStore<T> {
    fn drop(&mut self) {
        if self.dirty {
            warn!(
                path = %self.path.display(),
                "record store dropped with uncommitted changes"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MappingError;
    use tempfile::TempDir;

    crate::record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Task {
            title: String,
            priority: u8,
            done: bool,
        }
    }

    fn task(title: &str, priority: u8) -> Task {
        Task {
            title: title.into(),
            priority,
            done: false,
        }
    }

    fn setup() -> (TempDir, RecordStore<Task>) {
        let temp = TempDir::new().unwrap();
        let store = RecordStore::create(temp.path().join("tasks.xml")).unwrap();
        (temp, store)
    }

    #[test]
    fn test_create_is_clean_and_empty() {
        let (_temp, store) = setup();
        assert!(store.is_empty());
        assert!(!store.is_dirty());
        assert_eq!(store.document().name(), "Tasks");
        assert!(store.path().exists());
    }

    #[test]
    fn test_insert_marks_dirty() {
        let (_temp, mut store) = setup();
        store.insert("a", &task("write", 1)).unwrap();
        assert!(store.is_dirty());
        assert_eq!(store.len(), 1);
        store.commit().unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_duplicate_rejected_by_default() {
        let (_temp, mut store) = setup();
        store.insert("a", &task("one", 1)).unwrap();

        let result = store.insert("a", &task("two", 2));

        assert!(matches!(result, Err(StoreError::DuplicateId(id)) if id == "a"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_duplicate_allowed_first_wins() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::new().with_duplicate_ids(DuplicatePolicy::Allow);
        let mut store = RecordStore::create_with(temp.path().join("t.xml"), config).unwrap();

        store.insert("a", &task("first", 1)).unwrap();
        store.insert("b", &task("other", 1)).unwrap();
        store.insert("a", &task("second", 2)).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.read("a").unwrap().title, "first");
        assert_eq!(store.ids().collect::<Vec<_>>(), vec!["a", "b", "a"]);

        // removing the first exposes the shadowed duplicate
        store.delete("a").unwrap();
        assert_eq!(store.read("a").unwrap().title, "second");
        assert_eq!(store.read("b").unwrap().title, "other");
    }

    #[test]
    fn test_missing_id_operations_report_not_found() {
        let (_temp, mut store) = setup();
        assert!(store.read("nope").unwrap_err().is_not_found());
        assert!(store.update("nope", &task("x", 1)).unwrap_err().is_not_found());
        assert!(store.delete("nope").unwrap_err().is_not_found());
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_insert_generated() {
        let (_temp, mut store) = setup();
        let id = store.insert_generated(&task("auto", 3)).unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
        assert_eq!(store.read(&id).unwrap(), task("auto", 3));
    }

    #[test]
    fn test_scan_reports_bad_record_and_read_all_skips_it() {
        let (_temp, mut store) = setup();
        store.insert("good", &task("fine", 1)).unwrap();
        store.insert("bad", &task("broken", 1)).unwrap();

        // corrupt the stored priority of "bad"
        let position = store.position("bad").unwrap();
        store
            .root
            .child_at_mut(position)
            .and_then(|e| e.child_mut("priority"))
            .unwrap()
            .set_text("high");

        let entries = store.scan();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].result.is_ok());
        assert_eq!(entries[1].id.as_deref(), Some("bad"));
        assert!(matches!(
            entries[1].result,
            Err(MappingError::FieldConversion { .. })
        ));

        assert_eq!(store.read_all(), vec![task("fine", 1)]);
        assert!(matches!(
            store.read("bad"),
            Err(StoreError::Mapping(MappingError::FieldConversion { .. }))
        ));
    }

    #[test]
    fn test_query() {
        let (_temp, mut store) = setup();
        store.insert("a", &task("low", 1)).unwrap();
        store.insert("b", &task("high", 9)).unwrap();
        store.insert("c", &task("mid", 5)).unwrap();

        let urgent: Vec<_> = store.query().matching(|t| t.priority >= 5).collect();
        assert_eq!(urgent, vec![task("high", 9), task("mid", 5)]);
        assert_eq!(store.query().len(), 3);
    }
}
