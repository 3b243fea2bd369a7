use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use labelsync_core::DocumentRef;

use super::DEFAULT_MAX_BATCH_OPS;
use super::r#trait::{Document, DocumentStore, StoreError, WriteOp};

/// In-memory document store.
///
/// Intended for tests/dev. Enforces the same all-or-nothing commit and
/// per-batch ceiling as the production store, and counts successful commits
/// so tests can assert that an operation produced no writes.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    docs: RwLock<HashMap<DocumentRef, Document>>,
    max_batch_ops: usize,
    commits: AtomicUsize,
    fail_next_commit: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_max_batch_ops(DEFAULT_MAX_BATCH_OPS)
    }

    pub fn with_max_batch_ops(max_batch_ops: usize) -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
            max_batch_ops,
            commits: AtomicUsize::new(0),
            fail_next_commit: AtomicBool::new(false),
        }
    }

    /// Seed a document directly, bypassing batches (fixtures).
    pub fn insert(&self, doc_ref: DocumentRef, doc: Document) -> Result<(), StoreError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        docs.insert(doc_ref, doc);
        Ok(())
    }

    /// Synchronous read of the current state of a document.
    pub fn snapshot(&self, doc_ref: &DocumentRef) -> Option<Document> {
        self.docs.read().ok()?.get(doc_ref).cloned()
    }

    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of successfully applied batches.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    /// Make the next `commit` fail with `StoreError::Unavailable` without
    /// applying anything.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn apply(docs: &mut HashMap<DocumentRef, Document>, op: WriteOp) -> Result<(), StoreError> {
        match op {
            WriteOp::Create { doc_ref, fields } => {
                if docs.contains_key(&doc_ref) {
                    return Err(StoreError::AlreadyExists(doc_ref));
                }
                docs.insert(doc_ref, fields);
            }
            WriteOp::Update { doc_ref, updates } => {
                let Some(doc) = docs.get_mut(&doc_ref) else {
                    return Err(StoreError::NotFound(doc_ref));
                };
                for u in updates {
                    doc.insert(u.path, u.value);
                }
            }
            WriteOp::Delete { doc_ref, must_exist } => {
                if docs.remove(&doc_ref).is_none() && must_exist {
                    return Err(StoreError::NotFound(doc_ref));
                }
            }
        }
        Ok(())
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, doc_ref: &DocumentRef) -> Result<Option<Document>, StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(docs.get(doc_ref).cloned())
    }

    async fn commit(&self, ops: Vec<WriteOp>) -> Result<(), StoreError> {
        if ops.len() > self.max_batch_ops {
            return Err(StoreError::BatchTooLarge {
                ops: ops.len(),
                max: self.max_batch_ops,
            });
        }

        if self.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("injected commit failure".to_string()));
        }

        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        // Apply to a working copy; publish only if every operation succeeds.
        let mut staged = docs.clone();
        for op in ops {
            Self::apply(&mut staged, op)?;
        }
        *docs = staged;

        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn max_batch_ops(&self) -> usize {
        self.max_batch_ops
    }
}
