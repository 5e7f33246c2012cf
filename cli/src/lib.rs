use anyhow::{anyhow, Error, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use oxigraph::io::RdfFormat;
use quadstore::rdf::{format_from_path, LoadReport};
use quadstore::{Config, LiteralMode, Object, Quad, QuadStore, Value};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

#[derive(Debug, Parser)]
#[command(name = "quadstore")]
#[command(about = "Load RDF files into an in-memory quad store and query them by pattern")]
#[command(arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false", global = true)]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false", global = true)]
    debug: bool,
    /// JSON configuration file; the flags below override its values
    #[clap(long, short, global = true)]
    config: Option<PathBuf>,
    /// Graph name given to statements in a document's default graph
    #[clap(long, global = true)]
    default_graph: Option<String>,
    /// Store literals by their lexical form only, as plain text
    #[clap(long, action, global = true)]
    lexical_literals: bool,
    /// Strict mode - the first malformed statement aborts loading
    #[clap(long, action, default_value = "false", global = true)]
    strict: bool,
    /// Serialization of all inputs, given as a file extension (nt, nq, ttl, trig, n3, rdf).
    /// Inferred from each file name by default
    #[clap(long, short, global = true)]
    format: Option<String>,
}

/// A quad pattern; `*` matches anything.
#[derive(Debug, Args)]
struct PatternArgs {
    /// Subject to match
    #[clap(long, short, default_value = "*")]
    subject: String,
    /// Predicate to match
    #[clap(long, short, default_value = "*")]
    predicate: String,
    /// Object to match: an IRI, a blank node or an RDF literal such as '"42"^^<dt>' or '"hi"@en'
    #[clap(long, short, default_value = "*")]
    object: String,
    /// Graph to match; the empty string is the default graph
    #[clap(long, short, default_value = "*")]
    graph: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Target {
    Subjects,
    Predicates,
    Objects,
    Graphs,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the number of quads, graphs and distinct terms
    Stat {
        /// Also list every graph with its number of quads
        #[clap(long, short = 'l', action)]
        list: bool,
        /// Output as JSON
        #[clap(long, action, default_value = "false")]
        json: bool,
        /// RDF files to load
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the number of quads matching a pattern
    Count {
        #[command(flatten)]
        pattern: PatternArgs,
        /// RDF files to load
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the quads matching a pattern, sorted by graph, subject, predicate and object
    Match {
        #[command(flatten)]
        pattern: PatternArgs,
        /// Print at most this many quads
        #[clap(long)]
        limit: Option<usize>,
        /// RDF files to load
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print the distinct terms found in one position of the quads matching a pattern.
    /// The pattern's own entry for that position is ignored
    Find {
        /// Which position to list
        #[clap(value_enum)]
        target: Target,
        #[command(flatten)]
        pattern: PatternArgs,
        /// Output as JSON
        #[clap(long, action, default_value = "false")]
        json: bool,
        /// RDF files to load
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
    },
    /// Print every quad in the store, one `[s p o g]` line each
    Dump {
        /// RDF files to load
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
    },
}

impl Commands {
    fn inputs(&self) -> &[PathBuf] {
        match self {
            Commands::Stat { inputs, .. }
            | Commands::Count { inputs, .. }
            | Commands::Match { inputs, .. }
            | Commands::Find { inputs, .. }
            | Commands::Dump { inputs } => inputs,
        }
    }
}

pub fn run() -> Result<()> {
    let cmd = Cli::parse();
    execute(cmd)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd)
}

fn build_config(cmd: &Cli) -> Result<Config> {
    let mut config = match &cmd.config {
        Some(path) => Config::from_file(path)?,
        None => Config::builder().build()?,
    };
    if let Some(graph) = &cmd.default_graph {
        config.default_graph = graph.clone();
    }
    if cmd.lexical_literals {
        config.literals = LiteralMode::Lexical;
    }
    if cmd.strict {
        config.strict = true;
    }
    Ok(config)
}

fn load_inputs(
    inputs: &[PathBuf],
    format: Option<RdfFormat>,
    config: &Config,
) -> Result<QuadStore> {
    let mut store = QuadStore::new();
    let mut total = LoadReport::default();
    for path in inputs {
        let report = match format {
            Some(format) => {
                let file = File::open(path)
                    .map_err(|e| anyhow!("Failed to open {}: {}", path.display(), e))?;
                store.load_from_reader(BufReader::new(file), format, config)?
            }
            None => store.load_file(path, config)?,
        };
        total.merge(report);
    }
    info!(
        "Loaded {} files ({}): {} quads in {} graphs",
        inputs.len(),
        total,
        store.len(),
        store.graph_count()
    );
    Ok(store)
}

/// Parses a pattern's object argument. Arguments starting with a double
/// quote are RDF literals; `<iri>` is unwrapped; anything else is taken as
/// is.
fn parse_object(arg: &str, mode: LiteralMode) -> Result<Object> {
    if let Some(body) = arg.strip_prefix('"') {
        let end = body
            .rfind('"')
            .ok_or_else(|| anyhow!("Unterminated literal: {}", arg))?;
        let lex = body[..end].to_string();
        let suffix = &body[end + 1..];
        if mode == LiteralMode::Lexical {
            if !suffix.is_empty() {
                return Err(anyhow!(
                    "Literal {} has a language or datatype but literals are stored lexically",
                    arg
                ));
            }
            return Ok(Object::Text(lex));
        }
        let value = if suffix.is_empty() {
            Value::Literal {
                lex,
                datatype: Some(XSD_STRING.to_string()),
                lang: None,
            }
        } else if let Some(lang) = suffix.strip_prefix('@') {
            Value::Literal {
                lex,
                datatype: None,
                lang: Some(lang.to_string()),
            }
        } else if let Some(dt) = suffix
            .strip_prefix("^^<")
            .and_then(|rest| rest.strip_suffix('>'))
        {
            Value::Literal {
                lex,
                datatype: Some(dt.to_string()),
                lang: None,
            }
        } else {
            return Err(anyhow!("Cannot parse literal {}", arg));
        };
        return Ok(Object::Value(value));
    }
    Ok(Object::Text(unwrap_iri(arg).to_string()))
}

fn unwrap_iri(arg: &str) -> &str {
    arg.strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .unwrap_or(arg)
}

fn parse_format(name: &str) -> Result<RdfFormat> {
    format_from_path(Path::new(&format!("input.{}", name)))
        .ok_or_else(|| anyhow!("Unknown RDF format: {}", name))
}

fn execute(cmd: Cli) -> Result<()> {
    // CLI flags for verbosity take precedence. If nothing is set, we default to "warn".
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    let config = build_config(&cmd)?;
    if cmd.verbose || cmd.debug {
        config.print();
    }
    let format = cmd.format.as_deref().map(parse_format).transpose()?;
    let store = load_inputs(cmd.command.inputs(), format, &config)?;

    match cmd.command {
        Commands::Stat { list, json, .. } => {
            let mut graphs: BTreeMap<&str, usize> = BTreeMap::new();
            store.for_graphs("*", "*", "*", |g| {
                graphs.insert(g, store.graph_len(g));
            });
            if json {
                let mut out = serde_json::json!({
                    "quads": store.len(),
                    "graphs": store.graph_count(),
                    "terms": store.pool().len(),
                });
                if list {
                    out["per_graph"] = serde_json::json!(graphs);
                }
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("Quads: {}", store.len());
                println!("Graphs: {}", store.graph_count());
                println!("Terms: {}", store.pool().len());
                if list {
                    for (graph, len) in &graphs {
                        let name = if graph.is_empty() { "(default)" } else { graph };
                        println!("  {} {}", name, len);
                    }
                }
            }
        }
        Commands::Count { pattern, .. } => {
            let object = parse_object(&pattern.object, config.literals)?;
            let count = store.count(
                unwrap_iri(&pattern.subject),
                unwrap_iri(&pattern.predicate),
                &object,
                unwrap_iri(&pattern.graph),
            );
            println!("{}", count);
        }
        Commands::Match { pattern, limit, .. } => {
            let object = parse_object(&pattern.object, config.literals)?;
            let mut quads: Vec<Quad> = Vec::new();
            store.for_each_with(
                unwrap_iri(&pattern.subject),
                unwrap_iri(&pattern.predicate),
                &object,
                unwrap_iri(&pattern.graph),
                |q| quads.push(q.into_owned()),
            );
            quads.sort();
            for quad in quads.iter().take(limit.unwrap_or(usize::MAX)) {
                println!("{}", quad);
            }
        }
        Commands::Find {
            target,
            pattern,
            json,
            ..
        } => {
            let object = parse_object(&pattern.object, config.literals)?;
            let s = unwrap_iri(&pattern.subject);
            let p = unwrap_iri(&pattern.predicate);
            let g = unwrap_iri(&pattern.graph);
            let mut terms: Vec<String> = match target {
                Target::Subjects => store
                    .find_subjects(p, &object, g)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                Target::Predicates => store
                    .find_predicates(s, &object, g)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                Target::Objects => store
                    .find_objects(s, p, g)
                    .into_iter()
                    .map(|o| o.to_string())
                    .collect(),
                Target::Graphs => store
                    .find_graphs(s, p, &object)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            };
            terms.sort();
            if json {
                println!("{}", serde_json::to_string_pretty(&terms)?);
            } else {
                for term in terms {
                    println!("{}", term);
                }
            }
        }
        Commands::Dump { .. } => {
            print!("{}", store);
        }
    }

    Ok(())
}
