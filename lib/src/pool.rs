//! Reference-counted interning of term values to [`TermId`]s.

use crate::term::{ObjectRef, TermId, Value, WILDCARD};
use log::trace;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug)]
struct Entry<T: ?Sized> {
    term: Arc<T>,
    refs: usize,
}

impl<T: ?Sized> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self {
            term: self.term.clone(),
            refs: self.refs,
        }
    }
}

/// Bidirectional mapping between term values and identifiers.
///
/// Every successful [`TermPool::intern_text`] / [`TermPool::intern_value`]
/// adds one reference to the term, every [`TermPool::release`] removes one,
/// and the mapping is dropped once the count reaches zero. The wildcard `"*"`
/// is permanently mapped to [`TermId::WILDCARD`] and is never counted.
#[derive(Debug, Clone)]
pub struct TermPool {
    text_ids: HashMap<Arc<str>, TermId>,
    text_terms: HashMap<TermId, Entry<str>>,
    next_text: u64,
    value_ids: HashMap<Arc<Value>, TermId>,
    value_terms: HashMap<TermId, Entry<Value>>,
    next_value: u64,
}

impl Default for TermPool {
    fn default() -> Self {
        Self::new()
    }
}

impl TermPool {
    pub fn new() -> Self {
        let mut text_ids = HashMap::new();
        text_ids.insert(Arc::from(WILDCARD), TermId::WILDCARD);
        Self {
            text_ids,
            text_terms: HashMap::new(),
            next_text: 1,
            value_ids: HashMap::new(),
            value_terms: HashMap::new(),
            next_value: TermId::VALUE_BIT,
        }
    }

    /// Intern a text term, returning its identifier.
    ///
    /// Interning `"*"` returns the wildcard identifier without taking a
    /// reference.
    pub fn intern_text(&mut self, text: &str) -> TermId {
        if let Some(&id) = self.text_ids.get(text) {
            if id.is_bound() {
                if let Some(entry) = self.text_terms.get_mut(&id) {
                    entry.refs += 1;
                }
            }
            return id;
        }
        let id = TermId(self.next_text);
        self.next_text += 1;
        let term: Arc<str> = Arc::from(text);
        self.text_ids.insert(term.clone(), id);
        self.text_terms.insert(id, Entry { term, refs: 1 });
        id
    }

    /// Intern a non-textual value, returning its identifier.
    pub fn intern_value(&mut self, value: &Value) -> TermId {
        if let Some(&id) = self.value_ids.get(value) {
            if let Some(entry) = self.value_terms.get_mut(&id) {
                entry.refs += 1;
            }
            return id;
        }
        let id = TermId(self.next_value);
        self.next_value += 1;
        let term = Arc::new(value.clone());
        self.value_ids.insert(term.clone(), id);
        self.value_terms.insert(id, Entry { term, refs: 1 });
        id
    }

    pub fn intern(&mut self, term: ObjectRef<'_>) -> TermId {
        match term {
            ObjectRef::Text(s) => self.intern_text(s),
            ObjectRef::Value(v) => self.intern_value(v),
        }
    }

    /// Identifier of a text term without touching its reference count.
    pub fn lookup_text(&self, text: &str) -> Option<TermId> {
        self.text_ids.get(text).copied()
    }

    pub fn lookup_value(&self, value: &Value) -> Option<TermId> {
        self.value_ids.get(value).copied()
    }

    pub fn lookup(&self, term: ObjectRef<'_>) -> Option<TermId> {
        match term {
            ObjectRef::Text(s) => self.lookup_text(s),
            ObjectRef::Value(v) => self.lookup_value(v),
        }
    }

    /// The term behind an identifier, or `None` if it is not live.
    pub fn resolve(&self, id: TermId) -> Option<ObjectRef<'_>> {
        if id.is_wildcard() {
            return Some(ObjectRef::Text(WILDCARD));
        }
        if id.is_value() {
            self.value_terms
                .get(&id)
                .map(|e| ObjectRef::Value(&*e.term))
        } else {
            self.text_terms
                .get(&id)
                .map(|e| ObjectRef::Text(&*e.term))
        }
    }

    pub fn resolve_text(&self, id: TermId) -> Option<&str> {
        self.resolve(id).and_then(ObjectRef::as_str)
    }

    /// Drop one reference to `id`, evicting the term when none remain.
    ///
    /// Releasing the wildcard is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live; that means a reference was released twice.
    pub fn release(&mut self, id: TermId) {
        if id.is_wildcard() {
            return;
        }
        if id.is_value() {
            let entry = match self.value_terms.get_mut(&id) {
                Some(entry) => entry,
                None => panic!("released unknown value id {}", id),
            };
            entry.refs -= 1;
            if entry.refs == 0 {
                if let Some(entry) = self.value_terms.remove(&id) {
                    trace!("evicting value {} ({})", entry.term, id);
                    self.value_ids.remove(&*entry.term);
                }
            }
        } else {
            let entry = match self.text_terms.get_mut(&id) {
                Some(entry) => entry,
                None => panic!("released unknown text id {}", id),
            };
            entry.refs -= 1;
            if entry.refs == 0 {
                if let Some(entry) = self.text_terms.remove(&id) {
                    trace!("evicting text {:?} ({})", entry.term, id);
                    self.text_ids.remove(&*entry.term);
                }
            }
        }
    }

    /// Current reference count of `id`; zero when it is not live.
    pub fn ref_count(&self, id: TermId) -> usize {
        if id.is_value() {
            self.value_terms.get(&id).map_or(0, |e| e.refs)
        } else {
            self.text_terms.get(&id).map_or(0, |e| e.refs)
        }
    }

    /// Number of live terms, not counting the wildcard.
    pub fn len(&self) -> usize {
        self.text_terms.len() + self.value_terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
