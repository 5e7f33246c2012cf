//! Term values, term identifiers and quads.
//!
//! Subjects, predicates and graph names are always text. Objects are either
//! text or a comparable non-textual [`Value`]; [`Object`] and [`ObjectRef`]
//! carry that distinction as a tagged union.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The literal term value that means "match anything" in a query pattern.
pub const WILDCARD: &str = "*";

/// Compact identifier of an interned term.
///
/// Identifier `0` is reserved for the wildcard. Text identifiers count up
/// from 1; non-textual value identifiers count up from [`TermId::VALUE_BIT`]
/// so the two spaces never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermId(pub(crate) u64);

impl TermId {
    /// The wildcard identifier.
    pub const WILDCARD: TermId = TermId(0);
    /// High bit marking identifiers of non-textual values.
    pub const VALUE_BIT: u64 = 1 << 63;

    pub fn as_u64(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn is_wildcard(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_bound(self) -> bool {
        self.0 != 0
    }

    /// True if the identifier belongs to the non-textual value space.
    #[inline]
    pub fn is_value(self) -> bool {
        self.0 & Self::VALUE_BIT != 0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_value() {
            write!(f, "v{}", self.0 & !Self::VALUE_BIT)
        } else {
            write!(f, "t{}", self.0)
        }
    }
}

/// Role of a term within a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Subject,
    Predicate,
    Object,
    Graph,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Subject => write!(f, "subject"),
            Position::Predicate => write!(f, "predicate"),
            Position::Object => write!(f, "object"),
            Position::Graph => write!(f, "graph"),
        }
    }
}

/// A comparable non-textual object value.
///
/// Floats compare and hash by bit pattern, which keeps equality total and
/// consistent with hashing (`NaN == NaN`, `0.0 != -0.0`).
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bytes(Vec<u8>),
    /// RDF literal with optional datatype or language tag.
    Literal {
        lex: String,
        datatype: Option<String>,
        lang: Option<String>,
    },
}

impl Value {
    /// Literal without datatype or language.
    pub fn plain_literal(lex: impl Into<String>) -> Self {
        Value::Literal {
            lex: lex.into(),
            datatype: None,
            lang: None,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Bool(_) => 0,
            Value::Int(_) => 1,
            Value::UInt(_) => 2,
            Value::Float(_) => 3,
            Value::Bytes(_) => 4,
            Value::Literal { .. } => 5,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (
                Value::Literal {
                    lex: l1,
                    datatype: d1,
                    lang: g1,
                },
                Value::Literal {
                    lex: l2,
                    datatype: d2,
                    lang: g2,
                },
            ) => l1 == l2 && d1 == d2 && g1 == g2,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Value::Bool(v) => v.hash(state),
            Value::Int(v) => v.hash(state),
            Value::UInt(v) => v.hash(state),
            Value::Float(v) => v.to_bits().hash(state),
            Value::Bytes(v) => v.hash(state),
            Value::Literal {
                lex,
                datatype,
                lang,
            } => {
                lex.hash(state);
                datatype.hash(state);
                lang.hash(state);
            }
        }
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::UInt(a), Value::UInt(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            (
                Value::Literal {
                    lex: l1,
                    datatype: d1,
                    lang: g1,
                },
                Value::Literal {
                    lex: l2,
                    datatype: d2,
                    lang: g2,
                },
            ) => (l1, d1, g1).cmp(&(l2, d2, g2)),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::UInt(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bytes(v) => {
                write!(f, "0x")?;
                for b in v {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            Value::Literal {
                lex,
                datatype,
                lang,
            } => {
                write!(f, "\"{}\"", lex)?;
                if let Some(lang) = lang {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Owned object term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Object {
    Text(String),
    Value(Value),
}

impl Object {
    pub fn as_ref(&self) -> ObjectRef<'_> {
        match self {
            Object::Text(s) => ObjectRef::Text(s),
            Object::Value(v) => ObjectRef::Value(v),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::Text(s) => Some(s),
            Object::Value(_) => None,
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

/// Borrowed object term, as passed to queries and callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectRef<'a> {
    Text(&'a str),
    Value(&'a Value),
}

impl<'a> ObjectRef<'a> {
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            ObjectRef::Text(s) => Some(s),
            ObjectRef::Value(_) => None,
        }
    }

    pub fn as_value(self) -> Option<&'a Value> {
        match self {
            ObjectRef::Text(_) => None,
            ObjectRef::Value(v) => Some(v),
        }
    }

    /// True only for the wildcard text; values are never wildcards.
    pub fn is_wildcard(self) -> bool {
        matches!(self, ObjectRef::Text(s) if s == WILDCARD)
    }

    pub fn into_owned(self) -> Object {
        match self {
            ObjectRef::Text(s) => Object::Text(s.to_owned()),
            ObjectRef::Value(v) => Object::Value(v.clone()),
        }
    }
}

impl fmt::Display for ObjectRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectRef::Text(s) => f.write_str(s),
            ObjectRef::Value(v) => v.fmt(f),
        }
    }
}

impl<'a> From<&'a str> for ObjectRef<'a> {
    fn from(s: &'a str) -> Self {
        ObjectRef::Text(s)
    }
}

impl<'a> From<&'a String> for ObjectRef<'a> {
    fn from(s: &'a String) -> Self {
        ObjectRef::Text(s)
    }
}

impl<'a> From<&'a Value> for ObjectRef<'a> {
    fn from(v: &'a Value) -> Self {
        ObjectRef::Value(v)
    }
}

impl<'a> From<&'a Object> for ObjectRef<'a> {
    fn from(o: &'a Object) -> Self {
        o.as_ref()
    }
}

impl From<&str> for Object {
    fn from(s: &str) -> Self {
        Object::Text(s.to_owned())
    }
}

impl From<String> for Object {
    fn from(s: String) -> Self {
        Object::Text(s)
    }
}

impl From<Value> for Object {
    fn from(v: Value) -> Self {
        Object::Value(v)
    }
}

impl From<ObjectRef<'_>> for Object {
    fn from(o: ObjectRef<'_>) -> Self {
        o.into_owned()
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(v)
    }
}

impl From<bool> for Object {
    fn from(v: bool) -> Self {
        Object::Value(Value::Bool(v))
    }
}

impl From<i64> for Object {
    fn from(v: i64) -> Self {
        Object::Value(Value::Int(v))
    }
}

impl From<u64> for Object {
    fn from(v: u64) -> Self {
        Object::Value(Value::UInt(v))
    }
}

impl From<f64> for Object {
    fn from(v: f64) -> Self {
        Object::Value(Value::Float(v))
    }
}

/// Borrowed subject-predicate-object-graph quad handed to callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadRef<'a> {
    pub subject: &'a str,
    pub predicate: &'a str,
    pub object: ObjectRef<'a>,
    pub graph: &'a str,
}

impl<'a> QuadRef<'a> {
    pub fn new(
        subject: &'a str,
        predicate: &'a str,
        object: impl Into<ObjectRef<'a>>,
        graph: &'a str,
    ) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
            graph,
        }
    }

    /// Assemble a quad from terms resolved in (s, p, o) order.
    ///
    /// Subjects and predicates are interned as text, so a value in either
    /// slot means the pool and the index disagree.
    pub(crate) fn from_spo(terms: [ObjectRef<'a>; 3], graph: &'a str) -> Self {
        let [s, p, o] = terms;
        let text = |t: ObjectRef<'a>, pos: Position| match t {
            ObjectRef::Text(s) => s,
            ObjectRef::Value(v) => unreachable!("{} slot holds non-text term {}", pos, v),
        };
        Self {
            subject: text(s, Position::Subject),
            predicate: text(p, Position::Predicate),
            object: o,
            graph,
        }
    }

    pub fn into_owned(self) -> Quad {
        Quad {
            subject: self.subject.to_owned(),
            predicate: self.predicate.to_owned(),
            object: self.object.into_owned(),
            graph: self.graph.to_owned(),
        }
    }
}

impl fmt::Display for QuadRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {} {} {}]",
            self.subject, self.predicate, self.object, self.graph
        )
    }
}

/// Owned subject-predicate-object-graph quad.
///
/// Quads order by graph, then subject, predicate and object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: String,
    pub predicate: String,
    pub object: Object,
    pub graph: String,
}

impl Quad {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<Object>,
        graph: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            graph: graph.into(),
        }
    }

    pub fn as_ref(&self) -> QuadRef<'_> {
        QuadRef {
            subject: &self.subject,
            predicate: &self.predicate,
            object: self.object.as_ref(),
            graph: &self.graph,
        }
    }
}

impl Ord for Quad {
    fn cmp(&self, other: &Self) -> Ordering {
        (&self.graph, &self.subject, &self.predicate, &self.object).cmp(&(
            &other.graph,
            &other.subject,
            &other.predicate,
            &other.object,
        ))
    }
}

impl PartialOrd for Quad {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_ref().fmt(f)
    }
}

impl From<[&str; 4]> for Quad {
    fn from(q: [&str; 4]) -> Self {
        Quad::new(q[0], q[1], q[2], q[3])
    }
}

/// A triple lands in the default (unnamed) graph.
impl From<[&str; 3]> for Quad {
    fn from(t: [&str; 3]) -> Self {
        Quad::new(t[0], t[1], t[2], "")
    }
}

impl From<QuadRef<'_>> for Quad {
    fn from(q: QuadRef<'_>) -> Self {
        q.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn term_id_spaces() {
        assert!(TermId::WILDCARD.is_wildcard());
        assert!(!TermId(1).is_value());
        assert!(TermId(TermId::VALUE_BIT).is_value());
        assert!(TermId(TermId::VALUE_BIT).is_bound());
        assert_eq!(TermId(TermId::VALUE_BIT + 3).to_string(), "v3");
        assert_eq!(TermId(7).to_string(), "t7");
    }

    #[test]
    fn float_values_compare_by_bits() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
        let mut set = HashSet::new();
        set.insert(Value::Float(1.5));
        assert!(set.contains(&Value::Float(1.5)));
        assert!(!set.contains(&Value::Int(1)));
    }

    #[test]
    fn values_of_different_variants_are_distinct() {
        assert_ne!(Value::Int(1), Value::UInt(1));
        assert_ne!(Value::Bool(true), Value::Int(1));
        assert!(Value::Bool(true) < Value::Int(0));
        assert!(Value::Int(2) < Value::Int(3));
    }

    #[test]
    fn only_wildcard_text_is_wildcard() {
        assert!(ObjectRef::from("*").is_wildcard());
        assert!(!ObjectRef::from("**").is_wildcard());
        let lit = Value::plain_literal("*");
        assert!(!ObjectRef::from(&lit).is_wildcard());
    }

    #[test]
    fn literal_display() {
        let v = Value::Literal {
            lex: "42".into(),
            datatype: Some("http://ex/i".into()),
            lang: None,
        };
        assert_eq!(v.to_string(), "\"42\"^^<http://ex/i>");
        let v = Value::Literal {
            lex: "en".into(),
            datatype: None,
            lang: Some("en".into()),
        };
        assert_eq!(v.to_string(), "\"en\"@en");
        assert_eq!(Value::Bytes(vec![0xab, 0x01]).to_string(), "0xab01");
    }

    #[test]
    fn quads_sort_by_graph_first() {
        let mut quads: Vec<Quad> = vec![
            ["s1", "p1", "o1", "g2"].into(),
            ["s2", "p1", "o1", "g1"].into(),
            ["s1", "p2", "o1", "g1"].into(),
            ["s1", "p1", "o1", "g1"].into(),
        ];
        quads.sort();
        let rendered: Vec<String> = quads.iter().map(|q| q.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "[s1 p1 o1 g1]",
                "[s1 p2 o1 g1]",
                "[s2 p1 o1 g1]",
                "[s1 p1 o1 g2]",
            ]
        );
    }

    #[test]
    fn triple_goes_to_default_graph() {
        let q: Quad = ["s", "p", "o"].into();
        assert_eq!(q.graph, "");
        assert_eq!(q.object, Object::Text("o".into()));
    }
}
