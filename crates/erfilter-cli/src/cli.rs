//! Command-line interface for the erfilter utility
//!
//! Combines diagram files, drops the selected entities and renders the
//! result as Mermaid source or a standalone HTML page.

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::debug;

use erfilter::core::logging::init_logging;
use erfilter::prelude::*;
use erfilter::{combine_sources, inspect, strip_bom, DEFAULT_DIAGRAM_FILE};

/// erfilter - Remove entities from Mermaid ER diagrams
#[derive(Parser)]
#[command(name = "erfilter")]
#[command(about = "Filter entities out of Mermaid ER diagrams and render the result")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (defaults to ERFILTER_LOG_LEVEL, then RUST_LOG, then info)
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (defaults to ERFILTER_LOG_FORMAT, then compact)
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Which diagram files to read
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct SourceArgs {
    /// Diagram files, combined in order (repeat or comma-separate; - reads stdin)
    #[arg(short, long = "file", value_delimiter = ',', default_value = DEFAULT_DIAGRAM_FILE)]
    pub files: Vec<String>,

    /// Directory diagram file paths are relative to
    #[arg(long)]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter diagram files and render the result
    Render {
        #[command(flatten)]
        sources: SourceArgs,

        /// Entities to remove (repeat or comma-separate)
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Keep entities left without relationships
        #[arg(long)]
        no_prune_orphans: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Mmd)]
        format: OutputFormat,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Padding around the ER diagram, in pixels
        #[arg(long, default_value_t = 20)]
        padding: u32,

        /// Mermaid security level
        #[arg(long, value_enum, default_value_t = SecurityChoice::Loose)]
        security_level: SecurityChoice,

        /// Let Mermaid render on page load
        #[arg(long)]
        start_on_load: bool,

        /// Title of the HTML page
        #[arg(long)]
        title: Option<String>,
    },

    /// List entities and relationships in diagram files
    Entities {
        #[command(flatten)]
        sources: SourceArgs,

        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Check whether the input is an ER diagram
    Detect {
        #[command(flatten)]
        sources: SourceArgs,
    },
}

/// Output formats for the render command
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Filtered Mermaid source
    #[default]
    Mmd,
    /// Standalone HTML page rendering the diagram with Mermaid
    Html,
}

/// Mermaid security levels
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum SecurityChoice {
    Strict,
    #[default]
    Loose,
    Antiscript,
    Sandbox,
}

impl From<SecurityChoice> for SecurityLevel {
    fn from(value: SecurityChoice) -> Self {
        match value {
            SecurityChoice::Strict => SecurityLevel::Strict,
            SecurityChoice::Loose => SecurityLevel::Loose,
            SecurityChoice::Antiscript => SecurityLevel::Antiscript,
            SecurityChoice::Sandbox => SecurityLevel::Sandbox,
        }
    }
}

/// Loads diagram files from disk, or stdin for `-`
///
/// Stdin is read once; repeating `-` yields the same text again.
pub struct CliLoader {
    files: FileSystemLoader,
    stdin: Mutex<Option<String>>,
}

impl CliLoader {
    pub fn new(root: Option<PathBuf>) -> Self {
        let files = match root {
            Some(root) => FileSystemLoader::with_root(root),
            None => FileSystemLoader::new(),
        };
        Self {
            files,
            stdin: Mutex::new(None),
        }
    }

    fn load_stdin<F>(&self, read: F) -> Result<String, FilterError>
    where
        F: FnOnce() -> io::Result<String>,
    {
        let mut cached = self.stdin.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(content) = cached.as_ref() {
            debug!("Reusing stdin already read");
            return Ok(content.clone());
        }
        let content = read()
            .map(strip_bom)
            .map_err(|e| FilterError::source_load("<stdin>", e))?;
        *cached = Some(content.clone());
        Ok(content)
    }
}

impl SourceLoader for CliLoader {
    fn load(&self, id: &str) -> Result<String, FilterError> {
        if id == "-" {
            self.load_stdin(|| {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            })
        } else {
            self.files.load(id)
        }
    }
}

/// Main CLI application
pub struct ErFilterApp;

impl ErFilterApp {
    pub fn new() -> Self {
        Self
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        let level = cli.log_level.map(|l| l.as_str());
        let format = cli.log_format.map(|f| f.as_str());
        if let Err(e) = init_logging(level, format) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("erfilter v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Render {
                sources,
                exclude,
                no_prune_orphans,
                format,
                output,
                padding,
                security_level,
                start_on_load,
                title,
            } => {
                let filter = if no_prune_orphans {
                    DiagramFilter::exclusion_only()
                } else {
                    DiagramFilter::prune_orphans()
                };
                let config = RenderConfig::new(start_on_load, security_level.into(), padding);
                let renderer = Self::build_renderer(format, title);
                let exclude = exclude.into_iter().filter(|name| !name.is_empty()).collect();
                let selection = Selection::new(sources.files, exclude);

                let pipeline = Pipeline::new(Box::new(CliLoader::new(sources.root)), renderer)
                    .with_filter(filter)
                    .with_config(config);
                self.render_command(&pipeline, &selection, output, cli.verbose)
            }
            Commands::Entities { sources, json } => self.entities_command(sources, json),
            Commands::Detect { sources } => self.detect_command(sources, cli.verbose),
        }
    }

    fn build_renderer(format: OutputFormat, title: Option<String>) -> Box<dyn DiagramRenderer> {
        match format {
            OutputFormat::Mmd => Box::new(MermaidSourceRenderer::new()),
            OutputFormat::Html => {
                let renderer = HtmlRenderer::new();
                Box::new(match title {
                    Some(title) => renderer.with_title(title),
                    None => renderer,
                })
            }
        }
    }

    /// Handle the render command
    fn render_command(
        &self,
        pipeline: &Pipeline,
        selection: &Selection,
        output: Option<PathBuf>,
        verbose: bool,
    ) -> Result<()> {
        if verbose {
            eprintln!(
                "Combining {} file(s), excluding [{}] ({})",
                selection.files.len(),
                selection.exclude.sorted().join(", "),
                pipeline.filter().mode()
            );
        }

        let result = pipeline.run_with_stats(selection)?;

        if verbose {
            let stats = &result.stats;
            eprintln!(
                "Removed {} line(s), {} relationship(s)",
                stats.lines_removed(),
                stats.relationships_removed
            );
            if !stats.excluded_entities.is_empty() {
                eprintln!("Excluded: {}", stats.excluded_entities.join(", "));
            }
            if !stats.orphaned_entities.is_empty() {
                eprintln!("Orphaned: {}", stats.orphaned_entities.join(", "));
            }
        }

        self.write_output(output, &result.rendered)
    }

    /// Handle the entities command
    fn entities_command(&self, sources: SourceArgs, json: bool) -> Result<()> {
        let loader = CliLoader::new(sources.root);
        let text = combine_sources(&loader, &sources.files)?;
        let summary = inspect(&text);

        if json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        println!("Entities:");
        for entity in &summary.entities {
            println!("  {}", entity);
        }
        println!();
        println!("Relationships:");
        for rel in &summary.relationships {
            println!(
                "  {} -- {}",
                rel.first.as_deref().unwrap_or("?"),
                rel.second.as_deref().unwrap_or("?")
            );
        }

        let orphans = summary.orphans();
        if !orphans.is_empty() {
            println!();
            println!("Without relationships: {}", orphans.join(", "));
        }
        Ok(())
    }

    /// Handle the detect command
    fn detect_command(&self, sources: SourceArgs, verbose: bool) -> Result<()> {
        let loader = CliLoader::new(sources.root);
        let text = combine_sources(&loader, &sources.files)?;
        let detector = ErDetector::new();

        if verbose {
            eprintln!("Confidence: {:.2}", detector.confidence(&text));
        }

        if detector.detect(&text) {
            println!("{}", detector.diagram_type());
            Ok(())
        } else {
            Err(anyhow!("Could not detect an ER diagram"))
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ErFilterApp {
    fn default() -> Self {
        Self::new()
    }
}
