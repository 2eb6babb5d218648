use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Outcome of [`Collection::update_one_unless`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<R> {
    Applied(R),
    Conflict,
    Missing,
}

/// An in-memory collection of documents.
///
/// Documents keep insertion order. Queries are predicates over the typed
/// document; every mutating call holds the write lock for its whole duration,
/// so a read-check-write done inside one `update_one` closure is atomic with
/// respect to other callers.
#[derive(Debug)]
pub struct Collection<T> {
    name: &'static str,
    docs: RwLock<Vec<T>>,
    revision: AtomicU64,
}

impl<T: Clone> Collection<T> {
    pub fn new(name: &'static str) -> Self {
        Self::with_documents(name, Vec::new())
    }

    pub fn with_documents(name: &'static str, docs: Vec<T>) -> Self {
        Self {
            name,
            docs: RwLock::new(docs),
            revision: AtomicU64::new(0),
        }
    }

    /// Number of mutations applied since the collection was created
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    fn touch(&self) {
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    pub async fn insert(&self, doc: T) {
        self.docs.write().await.push(doc);
        self.touch();
        tracing::trace!(collection = self.name, "inserted document");
    }

    /// Insert `doc` unless a document matching `conflict` already exists.
    ///
    /// The check and the insert share one write lock. Returns whether the
    /// document was inserted.
    pub async fn insert_unless<C>(&self, doc: T, conflict: C) -> bool
    where
        C: Fn(&T) -> bool,
    {
        let mut docs = self.docs.write().await;
        if docs.iter().any(|existing| conflict(existing)) {
            return false;
        }
        docs.push(doc);
        drop(docs);
        self.touch();
        tracing::trace!(collection = self.name, "inserted document");
        true
    }

    pub async fn find_one<F>(&self, filter: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.docs.read().await.iter().find(|doc| filter(doc)).cloned()
    }

    pub async fn find<F>(&self, filter: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.docs
            .read()
            .await
            .iter()
            .filter(|doc| filter(doc))
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<T> {
        self.docs.read().await.clone()
    }

    pub async fn count<F>(&self, filter: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        self.docs.read().await.iter().filter(|doc| filter(doc)).count()
    }

    /// Apply `update` to the first matching document and return its result,
    /// or `None` when nothing matched.
    pub async fn update_one<F, U, R>(&self, filter: F, update: U) -> Option<R>
    where
        F: Fn(&T) -> bool,
        U: FnOnce(&mut T) -> R,
    {
        let mut docs = self.docs.write().await;
        let doc = docs.iter_mut().find(|doc| filter(doc))?;
        let result = update(doc);
        drop(docs);
        self.touch();
        Some(result)
    }

    /// Like [`Collection::update_one`], but leaves the match untouched when
    /// some other document satisfies `conflict`.
    pub async fn update_one_unless<F, C, U, R>(
        &self,
        filter: F,
        conflict: C,
        update: U,
    ) -> Guarded<R>
    where
        F: Fn(&T) -> bool,
        C: Fn(&T) -> bool,
        U: FnOnce(&mut T) -> R,
    {
        let mut docs = self.docs.write().await;
        let Some(position) = docs.iter().position(|doc| filter(doc)) else {
            return Guarded::Missing;
        };
        let clash = docs
            .iter()
            .enumerate()
            .any(|(i, doc)| i != position && conflict(doc));
        if clash {
            return Guarded::Conflict;
        }
        let result = update(&mut docs[position]);
        drop(docs);
        self.touch();
        Guarded::Applied(result)
    }

    /// Apply `update` to every matching document; returns the match count
    pub async fn update_many<F, U>(&self, filter: F, mut update: U) -> usize
    where
        F: Fn(&T) -> bool,
        U: FnMut(&mut T),
    {
        let mut docs = self.docs.write().await;
        let mut matched = 0;
        for doc in docs.iter_mut().filter(|doc| filter(doc)) {
            update(doc);
            matched += 1;
        }
        drop(docs);
        if matched > 0 {
            self.touch();
        }
        matched
    }

    pub async fn delete_one<F>(&self, filter: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        let mut docs = self.docs.write().await;
        let position = docs.iter().position(|doc| filter(doc))?;
        let removed = docs.remove(position);
        drop(docs);
        self.touch();
        Some(removed)
    }

    pub async fn delete_many<F>(&self, filter: F) -> usize
    where
        F: Fn(&T) -> bool,
    {
        let mut docs = self.docs.write().await;
        let before = docs.len();
        docs.retain(|doc| !filter(doc));
        let removed = before - docs.len();
        drop(docs);
        if removed > 0 {
            self.touch();
        }
        removed
    }
}
