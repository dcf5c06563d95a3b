use std::fmt;
use std::path::{Path, PathBuf};
use std::process;

use articulate_core::catalog::{self, CourseRecord};
use articulate_core::renderer::{self, Card, Instruction, NotePosition, SeparatorLevel};
use articulate_core::{assist, fingerprint, html, Error};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// articulate: course articulation trees
///
/// Normalize, render, and fingerprint the sending-course articulations of
/// receiving-course records.
#[derive(Parser)]
#[command(name = "articulate", version, about, long_about = None)]
struct Cli {
    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Log normalization decisions (overridden by ARTICULATE_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize articulations to canonical JSON
    Normalize {
        /// Path to a courses JSON file (a record list or one record)
        file: PathBuf,
        /// Receiving-course key; all courses when omitted
        #[arg(long)]
        key: Option<String>,
    },

    /// Render one course's articulation cards
    Render {
        /// Path to a courses JSON file
        file: PathBuf,
        /// Receiving-course key
        #[arg(long)]
        key: String,
        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: Format,
    },

    /// List receiving courses in catalog order
    Courses {
        /// Path to a courses JSON file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute the SHA-256 fingerprint of a course's canonical articulations
    Hash {
        /// Path to a courses JSON file
        file: PathBuf,
        /// Receiving-course key
        #[arg(long)]
        key: String,
    },

    /// Convert an upstream sendingArticulation object to the tree schema
    Convert {
        /// Path to a sendingArticulation JSON file
        file: PathBuf,
    },

    /// Show version information
    Version,
}

// ── Errors ────────────────────────────────────────────────

enum CliError {
    Read { path: PathBuf, source: std::io::Error },
    Core(Error),
}

impl CliError {
    /// 1 = course not found, 2 = anything else
    fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(Error::CourseNotFound(_)) => 1,
            _ => 2,
        }
    }
}

impl From<Error> for CliError {
    fn from(err: Error) -> Self {
        CliError::Core(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Core(err.into())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Read { path, source } => write!(f, "cannot read {}: {}", path.display(), source),
            CliError::Core(err) => write!(f, "{}", err),
        }
    }
}

// ── Entry point ───────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    let exit_code = match run(cli.command) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            err.exit_code()
        }
    };

    process::exit(exit_code);
}

fn init_tracing(quiet: bool, verbose: bool) {
    let default = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_env("ARTICULATE_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands) -> Result<String, CliError> {
    match command {
        Commands::Normalize { file, key } => normalize(&file, key.as_deref()),
        Commands::Render { file, key, format } => render(&file, &key, format),
        Commands::Courses { file, json } => courses(&file, json),
        Commands::Hash { file, key } => {
            let records = load_records(&file)?;
            let found = catalog::articulations_for(&records, &key)?;
            Ok(format!("{}\n", fingerprint::articulations_hash(&found.articulations)?))
        }
        Commands::Convert { file } => {
            let value: Value = serde_json::from_str(&read(&file)?)?;
            let tree = assist::build_tree(&value);
            if tree.is_none() {
                debug!(file = %file.display(), "no articulation to convert");
            }
            Ok(format!("{}\n", serde_json::to_string_pretty(&tree)?))
        }
        Commands::Version => Ok(format!(
            "articulate {} (articulate-core {})\n",
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_VERSION")
        )),
    }
}

// ── Commands ──────────────────────────────────────────────

fn normalize(file: &Path, key: Option<&str>) -> Result<String, CliError> {
    let records = load_records(file)?;
    let output = match key {
        Some(key) => serde_json::to_value(catalog::articulations_for(&records, key)?)?,
        None => Value::Array(
            records
                .iter()
                .map(|record| {
                    json!({
                        "key": record.key,
                        "courseFull": record.full_label(),
                        "articulations": articulate_core::normalize_articulations(record),
                    })
                })
                .collect(),
        ),
    };
    Ok(format!("{}\n", serde_json::to_string_pretty(&output)?))
}

fn render(file: &Path, key: &str, format: Format) -> Result<String, CliError> {
    let records = load_records(file)?;
    let found = catalog::articulations_for(&records, key)?;
    let cards = renderer::render_cards(&found.articulations);

    let output = match format {
        Format::Html => html::cards_markup(&cards),
        Format::Json => format!("{}\n", serde_json::to_string_pretty(&cards)?),
        Format::Text => {
            let mut out = format!("{}\n", found.course_full.bold());
            if cards.is_empty() {
                out.push_str("  (no articulations)\n");
            }
            for card in &cards {
                write_outline_card(&mut out, card);
            }
            out
        }
    };
    Ok(output)
}

fn courses(file: &Path, as_json: bool) -> Result<String, CliError> {
    let mut records = load_records(file)?;
    catalog::sort_records(&mut records);

    if as_json {
        let rows: Vec<Value> = records
            .iter()
            .map(|r| json!({"key": r.key, "label": r.option_label()}))
            .collect();
        return Ok(format!("{}\n", serde_json::to_string_pretty(&rows)?));
    }

    let mut out = String::new();
    for record in &records {
        out.push_str(&record.option_label());
        out.push('\n');
    }
    Ok(out)
}

// ── Text outline ──────────────────────────────────────────

fn write_outline_card(out: &mut String, card: &Card) {
    out.push('\n');
    out.push_str(&format!("{}\n", card.college.cyan().bold()));
    for item in &card.items {
        write_outline(out, item, 1);
    }
}

fn write_outline(out: &mut String, instruction: &Instruction, depth: usize) {
    let pad = "  ".repeat(depth);
    match instruction {
        Instruction::Item { children } => {
            for child in children {
                write_outline(out, child, depth);
            }
        }
        Instruction::Box { shape, children } => {
            out.push_str(&format!("{}[{}]\n", pad, shape.class_name().trim_start_matches("group-box-")));
            for child in children {
                write_outline(out, child, depth + 1);
            }
        }
        Instruction::Chip { label } => out.push_str(&format!("{}{}\n", pad, label)),
        Instruction::Notes { notes, position } => {
            let marker = match position {
                NotePosition::Above => "^",
                NotePosition::Below => "*",
            };
            for note in notes {
                out.push_str(&format!("{}{} {}\n", pad, marker, note.italic().dimmed()));
            }
        }
        Instruction::Separator { conjunction, level } => {
            let label = match level {
                SeparatorLevel::Course => conjunction.label().yellow(),
                SeparatorLevel::Group => conjunction.label().magenta().bold(),
            };
            out.push_str(&format!("{}{}\n", pad, label));
        }
    }
}

// ── Helpers ───────────────────────────────────────────────

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_records(path: &Path) -> Result<Vec<CourseRecord>, CliError> {
    let records = catalog::parse_records(&read(path)?)?;
    debug!(file = %path.display(), records = records.len(), "loaded course records");
    Ok(records)
}
