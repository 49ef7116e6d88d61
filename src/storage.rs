//! Storage
//!
//! Persistence of induction runs. The inducer only talks to the [`Storage`]
//! trait; every write of one run is scoped by its run id, so distinct runs can
//! share one storage without interfering.
//!
//! [`FileStorage`] lays a run out as
//!
//! ```text
//! <root>/<run id>/tree.json                     tree snapshot
//! <root>/<run id>/<feature>/<value>.csv         subset reaching a root child
//!                                               (names percent-encoded)
//! <root>/<run id>/<feature>/<value>/<f2>/<v2>.csv
//! <root>/<run id>/model.json                    model, written on success
//! <root>/<run id>/meta.json                     listing metadata, written last
//! ```
use crate::errors::GainsplitError;
use crate::model::{Model, ModelIO, ModelMeta};
use crate::node::Node;
use crate::utils::{encode_path_segment, file_safe_name};
use hashbrown::HashMap;
use log::{debug, warn};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

const TREE_FILE: &str = "tree.json";
const MODEL_FILE: &str = "model.json";
const META_FILE: &str = "meta.json";

/// Location of a write inside a run: the run id plus the feature/value
/// decisions leading to the node being written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageHint {
    pub run_id: String,
    pub path: Vec<(String, String)>,
}

impl StorageHint {
    /// Hint for the root of a run.
    pub fn root(run_id: &str) -> Self {
        StorageHint {
            run_id: run_id.to_string(),
            path: Vec::new(),
        }
    }

    /// Hint for the child reached by `feature == value`.
    pub fn child(&self, feature: &str, value: &str) -> Self {
        let mut path = self.path.clone();
        path.push((feature.to_string(), value.to_string()));
        StorageHint {
            run_id: self.run_id.clone(),
            path,
        }
    }
}

impl fmt::Display for StorageHint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.run_id)?;
        for (feature, value) in &self.path {
            write!(f, "/{}={}", feature, value)?;
        }
        Ok(())
    }
}

/// Durable home for the artifacts of induction runs.
pub trait Storage: Send + Sync {
    /// Store the records reaching the node at `hint`.
    fn write_table(&self, hint: &StorageHint, headers: &[String], rows: &[Vec<String>]) -> Result<(), GainsplitError>;

    /// Store the tree of a run, replacing any earlier snapshot.
    fn write_tree_snapshot(&self, hint: &StorageHint, tree: &Node) -> Result<(), GainsplitError>;

    /// Store a finished model. Only models written here are listed.
    fn write_model(&self, model: &Model) -> Result<(), GainsplitError>;

    fn read_tree(&self, run_id: &str) -> Result<Node, GainsplitError>;

    fn read_model(&self, run_id: &str) -> Result<Model, GainsplitError>;

    /// Metadata of every finished model, in no particular order.
    fn list_models(&self) -> Result<Vec<ModelMeta>, GainsplitError>;
}

/// Filesystem storage rooted at a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        FileStorage {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory of one run. Run ids are used verbatim as directory names,
    /// so they must already be file safe.
    pub fn run_dir(&self, run_id: &str) -> Result<PathBuf, GainsplitError> {
        if run_id.is_empty() || file_safe_name(run_id) != run_id {
            return Err(GainsplitError::InvalidParameter(
                "run_id".to_string(),
                "non-empty [A-Za-z0-9_-] string".to_string(),
                run_id.to_string(),
            ));
        }
        Ok(self.root.join(run_id))
    }

    /// File a subset table is written to. Features and values are
    /// percent-encoded, so distinct values never share a file.
    pub fn table_path(&self, hint: &StorageHint) -> Result<PathBuf, GainsplitError> {
        let mut path = self.run_dir(&hint.run_id)?;
        match hint.path.split_last() {
            None => path.push("data.csv"),
            Some(((feature, value), parents)) => {
                for (f, v) in parents {
                    path.push(encode_path_segment(f));
                    path.push(encode_path_segment(v));
                }
                path.push(encode_path_segment(feature));
                path.push(format!("{}.csv", encode_path_segment(value)));
            }
        }
        Ok(path)
    }

    fn existing_file(&self, run_id: &str, name: &str) -> Result<PathBuf, GainsplitError> {
        let path = self.run_dir(run_id)?.join(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(GainsplitError::ModelNotFound(run_id.to_string()))
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), GainsplitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| GainsplitError::UnableToWrite(format!("{}: {}", parent.display(), e)))?;
    }
    Ok(())
}

/// Write through a temporary sibling and rename, so readers never see a
/// half-written file.
fn write_atomic(path: &Path, contents: &str) -> Result<(), GainsplitError> {
    ensure_parent(path)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).map_err(|e| GainsplitError::UnableToWrite(format!("{}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path).map_err(|e| GainsplitError::UnableToWrite(format!("{}: {}", path.display(), e)))
}

impl Storage for FileStorage {
    fn write_table(&self, hint: &StorageHint, headers: &[String], rows: &[Vec<String>]) -> Result<(), GainsplitError> {
        let path = self.table_path(hint)?;
        ensure_parent(&path)?;
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .map_err(|e| GainsplitError::UnableToWrite(format!("{}: {}", path.display(), e)))?;
        debug!("Wrote {} rows for {} to {}", rows.len(), hint, path.display());
        Ok(())
    }

    fn write_tree_snapshot(&self, hint: &StorageHint, tree: &Node) -> Result<(), GainsplitError> {
        let path = self.run_dir(&hint.run_id)?.join(TREE_FILE);
        let json = serde_json::to_string_pretty(tree).map_err(|e| GainsplitError::UnableToWrite(e.to_string()))?;
        write_atomic(&path, &json)?;
        debug!("Wrote tree snapshot for {} to {}", hint, path.display());
        Ok(())
    }

    fn write_model(&self, model: &Model) -> Result<(), GainsplitError> {
        let dir = self.run_dir(&model.id)?;
        write_atomic(&dir.join(MODEL_FILE), &model.json_dump()?)?;
        write_atomic(&dir.join(META_FILE), &model.meta().json_dump()?)?;
        debug!("Wrote model {} to {}", model.id, dir.display());
        Ok(())
    }

    fn read_tree(&self, run_id: &str) -> Result<Node, GainsplitError> {
        let path = self.existing_file(run_id, TREE_FILE)?;
        let json = fs::read_to_string(&path).map_err(|e| GainsplitError::UnableToRead(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| GainsplitError::UnableToRead(format!("{}: {}", path.display(), e)))
    }

    fn read_model(&self, run_id: &str) -> Result<Model, GainsplitError> {
        let path = self.existing_file(run_id, MODEL_FILE)?;
        Model::load(path)
    }

    fn list_models(&self) -> Result<Vec<ModelMeta>, GainsplitError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let entries =
            fs::read_dir(&self.root).map_err(|e| GainsplitError::UnableToRead(format!("{}: {}", self.root.display(), e)))?;
        let mut metas = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| GainsplitError::UnableToRead(e.to_string()))?;
            let meta_path = entry.path().join(META_FILE);
            if !meta_path.is_file() {
                continue;
            }
            match ModelMeta::load(&meta_path) {
                Ok(meta) => metas.push(meta),
                Err(e) => warn!("Skipping unreadable model metadata {}: {}", meta_path.display(), e),
            }
        }
        Ok(metas)
    }
}

/// A stored table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Default)]
struct MemoryState {
    tables: HashMap<StorageHint, Table>,
    /// Hints of each run in first-write order.
    table_order: HashMap<String, Vec<StorageHint>>,
    snapshots: HashMap<String, Node>,
    models: HashMap<String, Model>,
}

/// Storage kept in memory, shareable between threads.
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, GainsplitError> {
        self.state
            .lock()
            .map_err(|e| GainsplitError::UnableToWrite(format!("memory storage: {}", e)))
    }

    pub fn table(&self, hint: &StorageHint) -> Option<Table> {
        let state = self.lock().ok()?;
        state.tables.get(hint).cloned()
    }

    /// Tables of one run, in the order they were first written.
    pub fn tables(&self, run_id: &str) -> Vec<(StorageHint, Table)> {
        match self.lock() {
            Ok(state) => state
                .table_order
                .get(run_id)
                .map(|hints| {
                    hints
                        .iter()
                        .filter_map(|h| state.tables.get(h).map(|t| (h.clone(), t.clone())))
                        .collect()
                })
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    pub fn snapshot(&self, run_id: &str) -> Option<Node> {
        let state = self.lock().ok()?;
        state.snapshots.get(run_id).cloned()
    }
}

impl Storage for MemoryStorage {
    fn write_table(&self, hint: &StorageHint, headers: &[String], rows: &[Vec<String>]) -> Result<(), GainsplitError> {
        let table = Table {
            headers: headers.to_vec(),
            rows: rows.to_vec(),
        };
        let mut state = self.lock()?;
        if state.tables.insert(hint.clone(), table).is_none() {
            state
                .table_order
                .entry(hint.run_id.clone())
                .or_default()
                .push(hint.clone());
        }
        Ok(())
    }

    fn write_tree_snapshot(&self, hint: &StorageHint, tree: &Node) -> Result<(), GainsplitError> {
        let mut state = self.lock()?;
        state.snapshots.insert(hint.run_id.clone(), tree.clone());
        Ok(())
    }

    fn write_model(&self, model: &Model) -> Result<(), GainsplitError> {
        let mut state = self.lock()?;
        state.models.insert(model.id.clone(), model.clone());
        Ok(())
    }

    fn read_tree(&self, run_id: &str) -> Result<Node, GainsplitError> {
        self.snapshot(run_id)
            .ok_or_else(|| GainsplitError::ModelNotFound(run_id.to_string()))
    }

    fn read_model(&self, run_id: &str) -> Result<Model, GainsplitError> {
        let state = self.lock()?;
        state
            .models
            .get(run_id)
            .cloned()
            .ok_or_else(|| GainsplitError::ModelNotFound(run_id.to_string()))
    }

    fn list_models(&self) -> Result<Vec<ModelMeta>, GainsplitError> {
        let state = self.lock()?;
        Ok(state.models.values().map(Model::meta).collect())
    }
}
