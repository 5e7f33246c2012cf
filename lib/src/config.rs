//! Configuration for loading RDF data into a quad store.

use anyhow::Result;
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufReader, Write};
use std::path::Path;

/// How RDF literals become object terms.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LiteralMode {
    /// Keep literals as [`Value::Literal`](crate::Value::Literal) with their
    /// datatype or language tag.
    #[default]
    Typed,
    /// Keep only the lexical form, stored as text.
    Lexical,
}

impl fmt::Display for LiteralMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LiteralMode::Typed => write!(f, "typed"),
            LiteralMode::Lexical => write!(f, "lexical"),
        }
    }
}

#[derive(Serialize, Deserialize, Builder, Debug, Clone, PartialEq)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct Config {
    // graph name for statements in the source's default graph
    pub default_graph: String,
    pub literals: LiteralMode,
    // strict mode (the first bad statement aborts loading)
    pub strict: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_graph: String::new(),
            literals: LiteralMode::Typed,
            strict: false,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn save_to_file(&self, file: &Path) -> Result<()> {
        let config_str = serde_json::to_string_pretty(&self)?;
        let mut file = std::fs::File::create(file)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        let file = std::fs::File::open(file)?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)?;
        Ok(config)
    }

    /// Prints out the current Config in a clear and readable way for command line output.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  Default Graph: {:?}", self.default_graph);
        println!("  Literals: {}", self.literals);
        println!("  Strict: {}", self.strict);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builder_fills_defaults() {
        let config = Config::builder().strict(true).build().unwrap();
        assert!(config.strict);
        assert_eq!(config.default_graph, "");
        assert_eq!(config.literals, LiteralMode::Typed);
    }

    #[test]
    fn save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("quadstore.json");
        let config = Config::builder()
            .default_graph("urn:default")
            .literals(LiteralMode::Lexical)
            .build()
            .unwrap();
        config.save_to_file(&path).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"literals": "lexical"}"#).unwrap();
        assert_eq!(config.literals, LiteralMode::Lexical);
        assert!(!config.strict);
    }
}
