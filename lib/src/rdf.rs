//! Loading RDF documents into a [`QuadStore`] with oxigraph's parsers.
//!
//! IRIs are stored as their string, blank nodes as `_:label`. Literals
//! follow [`Config::literals`] and statements in the document's default
//! graph go to [`Config::default_graph`].

use crate::config::{Config, LiteralMode};
use crate::store::QuadStore;
use crate::term::{Object, Value};
use anyhow::{anyhow, Result};
use log::{debug, info, warn};
use oxigraph::io::{RdfFormat, RdfParseError, RdfParser};
use oxigraph::model::{GraphName, Literal, NamedOrBlankNode, Term};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Infers the serialization of a file from its extension.
pub fn format_from_path(path: &Path) -> Option<RdfFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "nt" => Some(RdfFormat::NTriples),
        "nq" => Some(RdfFormat::NQuads),
        "ttl" => Some(RdfFormat::Turtle),
        "n3" => Some(RdfFormat::N3),
        "trig" => Some(RdfFormat::TriG),
        "rdf" | "xml" | "owl" => Some(RdfFormat::RdfXml),
        other => RdfFormat::from_extension(other),
    }
}

/// Outcome of loading one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Statements parsed.
    pub read: usize,
    /// Statements that were new to the store.
    pub added: usize,
    /// Statements the store already held.
    pub duplicates: usize,
    /// Malformed statements and statements using the wildcard as a term.
    pub skipped: usize,
}

impl LoadReport {
    pub fn merge(&mut self, other: LoadReport) {
        self.read += other.read;
        self.added += other.added;
        self.duplicates += other.duplicates;
        self.skipped += other.skipped;
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} read, {} added, {} duplicates, {} skipped",
            self.read, self.added, self.duplicates, self.skipped
        )
    }
}

fn literal_object(lit: Literal, mode: LiteralMode) -> Object {
    let lex = lit.value().to_string();
    match mode {
        LiteralMode::Lexical => Object::Text(lex),
        LiteralMode::Typed => {
            if let Some(lang) = lit.language() {
                Object::Value(Value::Literal {
                    lex,
                    datatype: None,
                    lang: Some(lang.to_string()),
                })
            } else {
                let dt = lit.datatype().as_str().to_string();
                Object::Value(Value::Literal {
                    lex,
                    datatype: Some(dt),
                    lang: None,
                })
            }
        }
    }
}

impl QuadStore {
    /// Parse `reader` as `format` and add every statement to the store.
    ///
    /// In strict mode the first malformed statement or wildcard term is an
    /// error; statements added before it stay in the store. Otherwise such
    /// statements are logged and skipped. I/O errors always abort.
    pub fn load_from_reader<R: Read>(
        &mut self,
        reader: R,
        format: RdfFormat,
        config: &Config,
    ) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        for quad in RdfParser::from_format(format).for_reader(reader) {
            let quad = match quad {
                Ok(quad) => quad,
                Err(RdfParseError::Io(e)) => return Err(e.into()),
                Err(e) if config.strict => {
                    return Err(anyhow!("Failed to parse {} document: {}", format, e))
                }
                Err(e) => {
                    warn!("Skipping malformed statement: {}", e);
                    report.skipped += 1;
                    continue;
                }
            };
            report.read += 1;

            let subject = match quad.subject {
                NamedOrBlankNode::NamedNode(nn) => nn.as_str().to_string(),
                NamedOrBlankNode::BlankNode(bn) => format!("_:{}", bn.as_str()),
            };
            let predicate = quad.predicate.as_str().to_string();
            let object = match quad.object {
                Term::NamedNode(nn) => Object::Text(nn.as_str().to_string()),
                Term::BlankNode(bn) => Object::Text(format!("_:{}", bn.as_str())),
                Term::Literal(lit) => literal_object(lit, config.literals),
            };
            let graph = match quad.graph_name {
                GraphName::DefaultGraph => config.default_graph.clone(),
                GraphName::NamedNode(nn) => nn.as_str().to_string(),
                GraphName::BlankNode(bn) => format!("_:{}", bn.as_str()),
            };

            match self.try_add(&subject, &predicate, &object, &graph) {
                Ok(true) => report.added += 1,
                Ok(false) => report.duplicates += 1,
                Err(e) if config.strict => {
                    return Err(anyhow!("Statement {}: {}", report.read, e));
                }
                Err(e) => {
                    warn!("Skipping statement {}: {}", report.read, e);
                    report.skipped += 1;
                }
            }
        }
        debug!("Parsed {} document: {}", format, report);
        Ok(report)
    }

    /// Load a file, inferring its format from the extension.
    pub fn load_file(&mut self, path: &Path, config: &Config) -> Result<LoadReport> {
        let format = format_from_path(path)
            .ok_or_else(|| anyhow!("Cannot infer RDF format of {}", path.display()))?;
        let file = File::open(path)
            .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
        let report = self.load_from_reader(BufReader::new(file), format, config)?;
        info!("Loaded {}: {}", path.display(), report);
        Ok(report)
    }
}
