//! Per-graph triple index kept in three key orderings.
//!
//! Every ordering is a three level nested map `k0 -> k1 -> {k2}`. The
//! orderings always hold the same set of (s, p, o) triples; [`IndexOrder`]
//! picks the one whose bound keys come first for a given pattern.

use crate::term::{Position, TermId};
use std::collections::{HashMap, HashSet};

pub type IndexLeaf = HashSet<TermId>;
pub type IndexMid = HashMap<TermId, IndexLeaf>;
pub type IndexRoot = HashMap<TermId, IndexMid>;

/// One level of a nested index.
///
/// `some_match` visits every entry when `key` is the wildcard and at most
/// the single entry stored under `key` otherwise. It stops and returns true
/// as soon as `visit` does.
pub trait IndexLevel {
    type Child;

    fn some_match<F>(&self, key: TermId, visit: F) -> bool
    where
        F: FnMut(TermId, &Self::Child) -> bool;
}

impl<V> IndexLevel for HashMap<TermId, V> {
    type Child = V;

    fn some_match<F>(&self, key: TermId, mut visit: F) -> bool
    where
        F: FnMut(TermId, &V) -> bool,
    {
        if key.is_wildcard() {
            self.iter().any(|(k, child)| visit(*k, child))
        } else {
            match self.get(&key) {
                Some(child) => visit(key, child),
                None => false,
            }
        }
    }
}

impl IndexLevel for HashSet<TermId> {
    type Child = ();

    fn some_match<F>(&self, key: TermId, mut visit: F) -> bool
    where
        F: FnMut(TermId, &()) -> bool,
    {
        if key.is_wildcard() {
            self.iter().any(|k| visit(*k, &()))
        } else {
            self.contains(&key) && visit(key, &())
        }
    }
}

/// Key ordering of one of the three index structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexOrder {
    Spo,
    Pos,
    Osp,
}

impl IndexOrder {
    /// Ordering to traverse for a pattern, chosen from which of (s, p, o)
    /// are bound.
    pub fn select(s: TermId, p: TermId, o: TermId) -> IndexOrder {
        match (s.is_bound(), p.is_bound(), o.is_bound()) {
            (true, true, _) => IndexOrder::Spo,
            (true, false, true) => IndexOrder::Osp,
            (true, false, false) => IndexOrder::Spo,
            (false, true, _) => IndexOrder::Pos,
            (false, false, true) => IndexOrder::Osp,
            (false, false, false) => IndexOrder::Spo,
        }
    }

    /// Ordering and level to enumerate distinct terms of `target` given the
    /// (s, p, o) pattern. The `target` slot of the pattern is ignored.
    /// Graph names are not part of a triple index, so `target` is never
    /// [`Position::Graph`].
    pub(crate) fn project(
        target: Position,
        s: TermId,
        p: TermId,
        o: TermId,
    ) -> (IndexOrder, usize) {
        match target {
            Position::Subject => match (p.is_bound(), o.is_bound()) {
                (true, true) => (IndexOrder::Pos, 2),
                (true, false) => (IndexOrder::Spo, 0),
                (false, true) => (IndexOrder::Osp, 1),
                (false, false) => (IndexOrder::Spo, 0),
            },
            Position::Predicate => match (s.is_bound(), o.is_bound()) {
                (true, true) => (IndexOrder::Osp, 2),
                (true, false) => (IndexOrder::Spo, 1),
                (false, _) => (IndexOrder::Pos, 0),
            },
            Position::Object => match (s.is_bound(), p.is_bound()) {
                (true, true) => (IndexOrder::Spo, 2),
                (true, false) => (IndexOrder::Osp, 0),
                (false, true) => (IndexOrder::Pos, 1),
                (false, false) => (IndexOrder::Osp, 0),
            },
            Position::Graph => panic!("graph names are not stored in a triple index"),
        }
    }

    /// Permute (s, p, o) into this ordering's key order.
    pub fn keys(self, s: TermId, p: TermId, o: TermId) -> [TermId; 3] {
        match self {
            IndexOrder::Spo => [s, p, o],
            IndexOrder::Pos => [p, o, s],
            IndexOrder::Osp => [o, s, p],
        }
    }

    /// Inverse of [`IndexOrder::keys`].
    pub fn to_spo(self, keys: [TermId; 3]) -> [TermId; 3] {
        let [a, b, c] = keys;
        match self {
            IndexOrder::Spo => [a, b, c],
            IndexOrder::Pos => [c, a, b],
            IndexOrder::Osp => [b, c, a],
        }
    }
}

fn insert_into(root: &mut IndexRoot, [k0, k1, k2]: [TermId; 3]) -> bool {
    root.entry(k0).or_default().entry(k1).or_default().insert(k2)
}

// Emptied leaf and middle buckets are dropped; the root map itself stays.
fn remove_from(root: &mut IndexRoot, [k0, k1, k2]: [TermId; 3]) -> bool {
    let Some(mid) = root.get_mut(&k0) else {
        return false;
    };
    let Some(leaf) = mid.get_mut(&k1) else {
        return false;
    };
    if !leaf.remove(&k2) {
        return false;
    }
    if leaf.is_empty() {
        mid.remove(&k1);
    }
    if mid.is_empty() {
        root.remove(&k0);
    }
    true
}

/// The triples of one graph, stored as SPO, POS and OSP.
#[derive(Debug, Clone, Default)]
pub struct TripleIndex {
    len: usize,
    spo: IndexRoot,
    pos: IndexRoot,
    osp: IndexRoot,
}

impl TripleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn root(&self, order: IndexOrder) -> &IndexRoot {
        match order {
            IndexOrder::Spo => &self.spo,
            IndexOrder::Pos => &self.pos,
            IndexOrder::Osp => &self.osp,
        }
    }

    /// Insert a bound triple. Returns false if it was already present, in
    /// which case only SPO was consulted.
    pub fn insert(&mut self, s: TermId, p: TermId, o: TermId) -> bool {
        if !insert_into(&mut self.spo, [s, p, o]) {
            return false;
        }
        insert_into(&mut self.pos, IndexOrder::Pos.keys(s, p, o));
        insert_into(&mut self.osp, IndexOrder::Osp.keys(s, p, o));
        self.len += 1;
        true
    }

    /// Remove a bound triple from all three orderings.
    pub fn remove(&mut self, s: TermId, p: TermId, o: TermId) -> bool {
        remove_from(&mut self.pos, IndexOrder::Pos.keys(s, p, o));
        remove_from(&mut self.osp, IndexOrder::Osp.keys(s, p, o));
        if !remove_from(&mut self.spo, [s, p, o]) {
            return false;
        }
        self.len -= 1;
        true
    }

    pub fn contains(&self, s: TermId, p: TermId, o: TermId) -> bool {
        self.spo
            .get(&s)
            .and_then(|mid| mid.get(&p))
            .is_some_and(|leaf| leaf.contains(&o))
    }

    /// Walk the triples matching `(s, p, o)` through the selected ordering,
    /// handing each one to `visit` in (s, p, o) order. Stops and returns true
    /// as soon as `visit` does.
    pub fn some_match<F>(&self, s: TermId, p: TermId, o: TermId, mut visit: F) -> bool
    where
        F: FnMut([TermId; 3]) -> bool,
    {
        let order = IndexOrder::select(s, p, o);
        let [k0, k1, k2] = order.keys(s, p, o);
        self.root(order).some_match(k0, |a, mid| {
            mid.some_match(k1, |b, leaf| {
                leaf.some_match(k2, |c, _| visit(order.to_spo([a, b, c])))
            })
        })
    }

    /// Number of triples matching `(s, p, o)`.
    pub fn count(&self, s: TermId, p: TermId, o: TermId) -> usize {
        if s.is_wildcard() && p.is_wildcard() && o.is_wildcard() {
            return self.len;
        }
        let order = IndexOrder::select(s, p, o);
        let [k0, k1, k2] = order.keys(s, p, o);
        let mut n = 0;
        self.root(order).some_match(k0, |_, mid| {
            mid.some_match(k1, |_, leaf| {
                n += if k2.is_wildcard() {
                    leaf.len()
                } else {
                    usize::from(leaf.contains(&k2))
                };
                false
            })
        });
        n
    }

    /// Visit the distinct terms in `target` position among triples matching
    /// the other two slots of `(s, p, o)`. Stops and returns true as soon as
    /// `visit` does.
    pub(crate) fn some_term<F>(
        &self,
        target: Position,
        s: TermId,
        p: TermId,
        o: TermId,
        mut visit: F,
    ) -> bool
    where
        F: FnMut(TermId) -> bool,
    {
        let (order, level) = IndexOrder::project(target, s, p, o);
        let (s, p, o) = match target {
            Position::Subject => (TermId::WILDCARD, p, o),
            Position::Predicate => (s, TermId::WILDCARD, o),
            _ => (s, p, TermId::WILDCARD),
        };
        let [k0, k1, k2] = order.keys(s, p, o);
        let any = |_: TermId, _: &()| true;
        let root = self.root(order);
        match level {
            0 => root.some_match(k0, |a, mid| {
                mid.some_match(k1, |_, leaf| leaf.some_match(k2, any)) && visit(a)
            }),
            1 => root.some_match(k0, |_, mid| {
                mid.some_match(k1, |b, leaf| leaf.some_match(k2, any) && visit(b))
            }),
            _ => root.some_match(k0, |_, mid| {
                mid.some_match(k1, |_, leaf| leaf.some_match(k2, |c, _| visit(c)))
            }),
        }
    }
}
