//! Pattern queries over a [`QuadStore`].
//!
//! Every query takes a pattern of four terms where `"*"` matches anything.
//! A term the pool has never seen cannot match, so such patterns answer
//! empty without touching any index.

use crate::index::TripleIndex;
use crate::store::QuadStore;
use crate::term::{ObjectRef, Position, Quad, QuadRef, TermId, WILDCARD};
use std::collections::HashSet;

impl QuadStore {
    /// Graphs in scope of a graph pattern: all of them for `"*"`, otherwise
    /// the named graph if it exists.
    fn scope<'s>(
        &'s self,
        graph: &str,
    ) -> impl Iterator<Item = (&'s str, &'s TripleIndex)> + 's {
        let exact = if graph == WILDCARD {
            None
        } else {
            self.graphs.get_key_value(graph)
        };
        let all = (graph == WILDCARD).then(|| self.graphs.iter());
        exact
            .into_iter()
            .chain(all.into_iter().flatten())
            .map(|(name, index)| (name.as_str(), index))
    }

    /// Number of quads matching the pattern.
    pub fn count<'a>(
        &self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
    ) -> usize {
        let Some([s, p, o]) = self.lookup_pattern(subject, predicate, object.into()) else {
            return 0;
        };
        self.scope(graph).map(|(_, index)| index.count(s, p, o)).sum()
    }

    /// True as soon as `test` returns true for a matching quad. Remaining
    /// buckets and graphs are not visited.
    pub fn some_with<'s, 'a, F>(
        &'s self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
        mut test: F,
    ) -> bool
    where
        F: FnMut(QuadRef<'s>) -> bool,
    {
        let Some([s, p, o]) = self.lookup_pattern(subject, predicate, object.into()) else {
            return false;
        };
        self.scope(graph).any(|(name, index)| {
            index.some_match(s, p, o, |ids| test(self.quad_ref(ids, name)))
        })
    }

    /// True if `test` holds for every matching quad.
    ///
    /// An empty match set yields false, not vacuous truth. `test` is not
    /// called again after the first quad it rejects.
    pub fn every_with<'s, 'a, F>(
        &'s self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
        mut test: F,
    ) -> bool
    where
        F: FnMut(QuadRef<'s>) -> bool,
    {
        let mut visited = false;
        let failed = self.some_with(subject, predicate, object, graph, |quad| {
            visited = true;
            !test(quad)
        });
        visited && !failed
    }

    /// Call `f` for every matching quad.
    ///
    /// The quads handed to `f` borrow the store, so `f` can query it but not
    /// change it. [`QuadStore::for_each_with_mut`] allows mutation.
    ///
    /// ```compile_fail
    /// use quadstore::QuadStore;
    ///
    /// let mut store = QuadStore::from_quads([["a", "p", "b"]]);
    /// store.for_each_with("*", "*", "*", "*", |quad| {
    ///     store.add(quad.subject, "seen", "yes", quad.graph);
    /// });
    /// ```
    pub fn for_each_with<'s, 'a, F>(
        &'s self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
        mut f: F,
    ) where
        F: FnMut(QuadRef<'s>),
    {
        self.some_with(subject, predicate, object, graph, |quad| {
            f(quad);
            false
        });
    }

    pub fn some<'s, F>(&'s self, test: F) -> bool
    where
        F: FnMut(QuadRef<'s>) -> bool,
    {
        self.some_with(WILDCARD, WILDCARD, WILDCARD, WILDCARD, test)
    }

    pub fn every<'s, F>(&'s self, test: F) -> bool
    where
        F: FnMut(QuadRef<'s>) -> bool,
    {
        self.every_with(WILDCARD, WILDCARD, WILDCARD, WILDCARD, test)
    }

    pub fn for_each<'s, F>(&'s self, f: F)
    where
        F: FnMut(QuadRef<'s>),
    {
        self.for_each_with(WILDCARD, WILDCARD, WILDCARD, WILDCARD, f)
    }

    /// True if at least one quad matches the pattern.
    pub fn contains<'a>(
        &self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
    ) -> bool {
        self.some_with(subject, predicate, object, graph, |_| true)
    }

    /// Snapshot of every quad, sorted by graph, subject, predicate, object.
    pub fn quads(&self) -> Vec<Quad> {
        let mut quads = Vec::with_capacity(self.len);
        self.for_each(|quad| quads.push(quad.into_owned()));
        quads.sort();
        quads
    }

    /// Distinct identifiers in `target` position across the graph scope.
    fn some_distinct<F>(
        &self,
        target: Position,
        ids: [TermId; 3],
        graph: &str,
        mut visit: F,
    ) -> bool
    where
        F: FnMut(TermId) -> bool,
    {
        let [s, p, o] = ids;
        let mut seen = HashSet::new();
        self.scope(graph).any(|(_, index)| {
            index.some_term(target, s, p, o, |id| seen.insert(id) && visit(id))
        })
    }

    /// Call `f` once per distinct subject of quads matching
    /// `(*, predicate, object, graph)`.
    pub fn for_subjects<'s, 'a, F>(
        &'s self,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
        mut f: F,
    ) where
        F: FnMut(&'s str),
    {
        let Some(ids) = self.lookup_pattern(WILDCARD, predicate, object.into()) else {
            return;
        };
        self.some_distinct(Position::Subject, ids, graph, |id| {
            f(self.text(id));
            false
        });
    }

    /// Call `f` once per distinct predicate of quads matching
    /// `(subject, *, object, graph)`.
    pub fn for_predicates<'s, 'a, F>(
        &'s self,
        subject: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
        mut f: F,
    ) where
        F: FnMut(&'s str),
    {
        let Some(ids) = self.lookup_pattern(subject, WILDCARD, object.into()) else {
            return;
        };
        self.some_distinct(Position::Predicate, ids, graph, |id| {
            f(self.text(id));
            false
        });
    }

    /// Call `f` once per distinct object of quads matching
    /// `(subject, predicate, *, graph)`.
    pub fn for_objects<'s, F>(&'s self, subject: &str, predicate: &str, graph: &str, mut f: F)
    where
        F: FnMut(ObjectRef<'s>),
    {
        let Some(ids) = self.lookup_pattern(subject, predicate, ObjectRef::Text(WILDCARD)) else {
            return;
        };
        self.some_distinct(Position::Object, ids, graph, |id| {
            f(self.term(id));
            false
        });
    }

    /// Call `f` once per graph holding at least one quad matching
    /// `(subject, predicate, object)`.
    pub fn for_graphs<'s, 'a, F>(
        &'s self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        mut f: F,
    ) where
        F: FnMut(&'s str),
    {
        let Some([s, p, o]) = self.lookup_pattern(subject, predicate, object.into()) else {
            return;
        };
        for (name, index) in self.scope(WILDCARD) {
            if index.some_match(s, p, o, |_| true) {
                f(name);
            }
        }
    }

    pub fn find_subjects<'a>(
        &self,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
    ) -> Vec<&str> {
        let mut out = Vec::new();
        self.for_subjects(predicate, object, graph, |s| out.push(s));
        out
    }

    pub fn find_predicates<'a>(
        &self,
        subject: &str,
        object: impl Into<ObjectRef<'a>>,
        graph: &str,
    ) -> Vec<&str> {
        let mut out = Vec::new();
        self.for_predicates(subject, object, graph, |p| out.push(p));
        out
    }

    pub fn find_objects(&self, subject: &str, predicate: &str, graph: &str) -> Vec<ObjectRef<'_>> {
        let mut out = Vec::new();
        self.for_objects(subject, predicate, graph, |o| out.push(o));
        out
    }

    pub fn find_graphs<'a>(
        &self,
        subject: &str,
        predicate: &str,
        object: impl Into<ObjectRef<'a>>,
    ) -> Vec<&str> {
        let mut out = Vec::new();
        self.for_graphs(subject, predicate, object, |g| out.push(g));
        out
    }
}
