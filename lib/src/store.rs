//! The quad store: named graphs of [`TripleIndex`]es over one [`TermPool`].

use crate::errors::{Result, StoreError};
use crate::index::TripleIndex;
use crate::pool::TermPool;
use crate::term::{ObjectRef, Position, Quad, QuadRef, TermId, WILDCARD};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Observer called after a quad was added or removed.
///
/// The store is handed over mutably and is fully consistent when the hook
/// runs, so the hook may add, remove and query re-entrantly.
pub type Hook = Arc<dyn Fn(&mut QuadStore, QuadRef<'_>) + Send + Sync>;

/// In-memory quad store.
///
/// Subjects, predicates and graph names are text; objects are text or a
/// [`Value`](crate::Value). Each graph keeps its triples in SPO, POS and OSP
/// order over identifiers from a single shared [`TermPool`]. The text `"*"`
/// is the wildcard: it matches anything in a query pattern and can never be
/// stored.
///
/// ```
/// use quadstore::QuadStore;
///
/// let mut store = QuadStore::new();
/// assert!(store.add("alice", "knows", "bob", ""));
/// assert!(!store.add("alice", "knows", "bob", ""));
/// assert_eq!(store.count("alice", "*", "*", "*"), 1);
/// assert_eq!(store.remove("*", "knows", "*", "*"), 1);
/// assert!(store.is_empty());
/// ```
#[derive(Clone, Default)]
pub struct QuadStore {
    pub(crate) graphs: HashMap<String, TripleIndex>,
    pub(crate) len: usize,
    pub(crate) pool: TermPool,
    // bumped by `clear`, which recycles term identifiers
    epoch: u64,
    on_add: Option<Hook>,
    on_remove: Option<Hook>,
}

impl QuadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from any sequence of quads.
    pub fn from_quads<I, Q>(quads: I) -> Self
    where
        I: IntoIterator<Item = Q>,
        Q: Into<Quad>,
    {
        quads.into_iter().collect()
    }

    /// Total number of quads across all graphs.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty graphs.
    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    /// Number of quads in `graph`; 0 for graphs the store does not hold.
    pub fn graph_len(&self, graph: &str) -> usize {
        self.graphs.get(graph).map_or(0, TripleIndex::len)
    }

    pub fn pool(&self) -> &TermPool {
        &self.pool
    }

    pub fn set_on_add<F>(&mut self, hook: F)
    where
        F: Fn(&mut QuadStore, QuadRef<'_>) + Send + Sync + 'static,
    {
        self.on_add = Some(Arc::new(hook));
    }

    pub fn set_on_remove<F>(&mut self, hook: F)
    where
        F: Fn(&mut QuadStore, QuadRef<'_>) + Send + Sync + 'static,
    {
        self.on_remove = Some(Arc::new(hook));
    }

    pub fn clear_on_add(&mut self) {
        self.on_add = None;
    }

    pub fn clear_on_remove(&mut self) {
        self.on_remove = None;
    }

    /// Add a quad, returning false if it was already present.
    ///
    /// # Panics
    ///
    /// Panics if any term is the wildcard `"*"`. Use [`QuadStore::try_add`]
    /// for data that has not been validated.
    pub fn add<'a>(
        &mut self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
    ) -> bool {
        match self.try_add(subject, predicate, object, graph) {
            Ok(added) => added,
            Err(e) => panic!("{}", e),
        }
    }

    /// Add a quad, returning false if it was already present and an error if
    /// any term is the wildcard. A rejected quad leaves the store untouched.
    pub fn try_add<'a>(
        &mut self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
    ) -> Result<bool> {
        let object = object.into();
        if graph == WILDCARD {
            return Err(StoreError::Wildcard(Position::Graph));
        }
        let s = self.pool.intern_text(subject);
        let p = self.pool.intern_text(predicate);
        let o = self.pool.intern(object);
        let wildcard = [
            (s, Position::Subject),
            (p, Position::Predicate),
            (o, Position::Object),
        ]
        .into_iter()
        .find(|(id, _)| id.is_wildcard());
        if let Some((_, pos)) = wildcard {
            self.release_all([s, p, o]);
            return Err(StoreError::Wildcard(pos));
        }

        let added = match self.graphs.get_mut(graph) {
            Some(index) => index.insert(s, p, o),
            None => {
                debug!("creating graph {:?}", graph);
                let mut index = TripleIndex::new();
                index.insert(s, p, o);
                self.graphs.insert(graph.to_owned(), index);
                true
            }
        };
        if !added {
            self.release_all([s, p, o]);
            return Ok(false);
        }
        self.len += 1;

        if let Some(hook) = self.on_add.clone() {
            hook(self, QuadRef::new(subject, predicate, object, graph));
        }
        Ok(true)
    }

    /// Remove every quad matching the pattern, returning how many were
    /// removed. `"*"` matches anything in any position.
    pub fn remove<'a>(
        &mut self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
    ) -> usize {
        let Some(pattern) = self.lookup_pattern(subject, predicate, object.into()) else {
            return 0;
        };
        let epoch = self.epoch;
        let mut removed = 0;
        for name in self.scope_names(graph) {
            for ids in self.matching_ids(&name, pattern) {
                if self.epoch != epoch {
                    return removed;
                }
                let [ts, tp, to] = ids;
                let Some(index) = self.graphs.get_mut(&name) else {
                    break;
                };
                // A hook may already have removed it.
                if !index.remove(ts, tp, to) {
                    continue;
                }
                self.len -= 1;
                removed += 1;
                let hook = self.on_remove.clone();
                let quad = hook.as_ref().map(|_| self.quad_ref(ids, &name).into_owned());
                self.release_all(ids);
                if let (Some(hook), Some(quad)) = (hook, quad) {
                    hook(self, quad.as_ref());
                }
            }
            if self.graphs.get(&name).is_some_and(TripleIndex::is_empty) {
                debug!("dropping empty graph {:?}", name);
                self.graphs.remove(&name);
            }
        }
        removed
    }

    /// Like [`QuadStore::some_with`], but `test` gets the store mutably and
    /// may add, remove and query while the walk is in progress.
    ///
    /// The matching quads are snapshotted before the first call. A quad that
    /// `test` removes before the walk reaches it is skipped, and quads added
    /// during the walk are not visited. Clearing the store ends the walk.
    ///
    /// ```
    /// use quadstore::QuadStore;
    ///
    /// let mut store = QuadStore::from_quads([["a", "p", "b"], ["b", "p", "c"]]);
    /// store.for_each_with_mut("*", "p", "*", "*", |store, quad| {
    ///     store.add(quad.subject, "seen", "yes", quad.graph);
    /// });
    /// assert_eq!(store.count("*", "seen", "yes", ""), 2);
    /// ```
    pub fn some_with_mut<'a, F>(
        &mut self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
        mut test: F,
    ) -> bool
    where
        F: FnMut(&mut QuadStore, QuadRef<'_>) -> bool,
    {
        let Some(pattern) = self.lookup_pattern(subject, predicate, object.into()) else {
            return false;
        };
        let snapshot: Vec<(String, Vec<[TermId; 3]>)> = self
            .scope_names(graph)
            .into_iter()
            .map(|name| {
                let matches = self.matching_ids(&name, pattern);
                (name, matches)
            })
            .collect();
        let epoch = self.epoch;
        for (name, matches) in snapshot {
            for ids in matches {
                if self.epoch != epoch {
                    return false;
                }
                let [s, p, o] = ids;
                let present = self
                    .graphs
                    .get(&name)
                    .is_some_and(|index| index.contains(s, p, o));
                if !present {
                    continue;
                }
                let quad = self.quad_ref(ids, &name).into_owned();
                if test(self, quad.as_ref()) {
                    return true;
                }
            }
        }
        false
    }

    /// Call `f` for every matching quad, handing it the store mutably. See
    /// [`QuadStore::some_with_mut`] for which quads are visited.
    pub fn for_each_with_mut<'a, F>(
        &mut self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
        mut f: F,
    ) where
        F: FnMut(&mut QuadStore, QuadRef<'_>),
    {
        self.some_with_mut(subject, predicate, object, graph, |store, quad| {
            f(store, quad);
            false
        });
    }

    /// Drop every quad and term. Hooks stay registered but are not called.
    pub fn clear(&mut self) {
        self.graphs.clear();
        self.len = 0;
        self.pool = TermPool::new();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Names of the graphs a graph pattern covers, copied so the store can
    /// change while they are walked.
    fn scope_names(&self, graph: &str) -> Vec<String> {
        if graph == WILDCARD {
            self.graphs.keys().cloned().collect()
        } else if self.graphs.contains_key(graph) {
            vec![graph.to_owned()]
        } else {
            Vec::new()
        }
    }

    fn matching_ids(&self, graph: &str, [s, p, o]: [TermId; 3]) -> Vec<[TermId; 3]> {
        let mut matches = Vec::new();
        if let Some(index) = self.graphs.get(graph) {
            index.some_match(s, p, o, |ids| {
                matches.push(ids);
                false
            });
        }
        matches
    }

    fn release_all(&mut self, ids: [TermId; 3]) {
        for id in ids {
            self.pool.release(id);
        }
    }

    /// Resolve a query pattern to identifiers without taking references.
    /// `None` means some term is unknown, so nothing can match.
    pub(crate) fn lookup_pattern(
        &self,
        subject: &str,
        predicate: &str,
        object: ObjectRef<'_>,
    ) -> Option<[TermId; 3]> {
        Some([
            self.pool.lookup_text(subject)?,
            self.pool.lookup_text(predicate)?,
            self.pool.lookup(object)?,
        ])
    }

    pub(crate) fn term(&self, id: TermId) -> ObjectRef<'_> {
        match self.pool.resolve(id) {
            Some(term) => term,
            None => panic!("term {} is indexed but not interned", id),
        }
    }

    pub(crate) fn text(&self, id: TermId) -> &str {
        match self.term(id) {
            ObjectRef::Text(text) => text,
            ObjectRef::Value(v) => panic!("term {} is the value {}, expected text", id, v),
        }
    }

    pub(crate) fn quad_ref<'s>(&'s self, [s, p, o]: [TermId; 3], graph: &'s str) -> QuadRef<'s> {
        QuadRef::from_spo([self.term(s), self.term(p), self.term(o)], graph)
    }
}

impl fmt::Debug for QuadStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadStore")
            .field("len", &self.len)
            .field("graphs", &self.graphs.len())
            .field("terms", &self.pool.len())
            .field("on_add", &self.on_add.is_some())
            .field("on_remove", &self.on_remove.is_some())
            .finish()
    }
}

/// One `[subject predicate object graph]` line per quad, sorted by graph,
/// subject, predicate and object.
impl fmt::Display for QuadStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for quad in self.quads() {
            writeln!(f, "{}", quad)?;
        }
        Ok(())
    }
}

impl<Q: Into<Quad>> Extend<Q> for QuadStore {
    fn extend<I: IntoIterator<Item = Q>>(&mut self, quads: I) {
        for quad in quads {
            let quad = quad.into();
            self.add(&quad.subject, &quad.predicate, &quad.object, &quad.graph);
        }
    }
}

impl<Q: Into<Quad>> FromIterator<Q> for QuadStore {
    fn from_iter<I: IntoIterator<Item = Q>>(quads: I) -> Self {
        let mut store = QuadStore::new();
        store.extend(quads);
        store
    }
}
