use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use schematic_core::config::{self, CONFIG_FILE_NAME, SchematicConfig};
use schematic_core::graph::Document;
use schematic_core::ir::{ClientSpec, ReturnDescriptor};
use schematic_core::parse;
use schematic_core::transform;
use schematic_core::{CodeGenerator, GeneratedFile};
use schematic_go::{GoClientConfig, GoClientGenerator};

/// Source name meaning standard input.
const STDIN: &str = "-";

#[derive(Parser)]
#[command(
    name = "schematic",
    about = "Go client generator for JSON Hyper-Schema",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a Go client from a hyper-schema
    Generate {
        /// Schema file (JSON or YAML), or `-` for standard input
        schema: Option<String>,

        /// Output file; standard output when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Go package name
        #[arg(long)]
        package: Option<String>,

        /// Skip description comments
        #[arg(long)]
        no_comments: bool,
    },

    /// Check that a schema resolves and analyzes cleanly
    Validate {
        /// Schema file, or `-` for standard input
        schema: String,
    },

    /// Print the resolved resources and operations of a schema
    Inspect {
        /// Schema file, or `-` for standard input
        schema: String,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: InspectFormat,
    },

    /// Write a default .schematic.yaml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Clone, ValueEnum)]
enum InspectFormat {
    Yaml,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            schema,
            output,
            package,
            no_comments,
        } => cmd_generate(schema, output, package, no_comments),

        Commands::Validate { schema } => cmd_validate(&schema),

        Commands::Inspect { schema, format } => cmd_inspect(&schema, format),

        Commands::Init { force } => cmd_init(Path::new(CONFIG_FILE_NAME), force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "schematic", &mut io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<SchematicConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))
}

fn read_source(name: &str) -> Result<String> {
    if name == STDIN {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .context("failed to read schema from standard input")?;
        return Ok(content);
    }
    fs::read_to_string(name).with_context(|| format!("failed to read {name}"))
}

/// Parse, resolve and analyze a schema into the client model.
fn load_spec(name: &str, cfg: &SchematicConfig) -> Result<ClientSpec> {
    let content = read_source(name)?;
    let raw = parse::from_source(name, &content)
        .with_context(|| format!("failed to parse {name}"))?;
    let mut doc = Document::from_raw(raw);
    let spec = transform::transform_with_options(&mut doc, &cfg.naming(), &cfg.transform_options())
        .with_context(|| format!("failed to analyze {name}"))?;
    log::debug!(
        "loaded {name}: {} resources, {} operations",
        spec.resources.len(),
        spec.operation_count()
    );
    Ok(spec)
}

/// Run the whole pipeline for a configuration and return the generated file.
fn generate_client(cfg: &SchematicConfig) -> Result<GeneratedFile> {
    let ir = load_spec(&cfg.input, cfg)?;
    let go_config = GoClientConfig {
        comments: cfg.comments,
        naming: cfg.naming(),
    };
    let mut files = GoClientGenerator.generate(&ir, &go_config)?;
    files
        .pop()
        .context("generator produced no output")
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

fn cmd_generate(
    schema: Option<String>,
    output: Option<PathBuf>,
    package: Option<String>,
    no_comments: bool,
) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    if let Some(schema) = schema {
        cfg.input = schema;
    }
    if let Some(output) = output {
        cfg.output = Some(output.display().to_string());
    }
    if package.is_some() {
        cfg.package = package;
    }
    if no_comments {
        cfg.comments = false;
    }

    let file = generate_client(&cfg)?;
    match cfg.output {
        Some(ref output) => {
            let path = PathBuf::from(output);
            write_output(&path, &file.content)?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{}", file.content),
    }
    Ok(())
}

fn cmd_validate(schema: &str) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let ir = load_spec(schema, &cfg)?;

    eprintln!("Valid hyper-schema: {}", ir.info.title);
    eprintln!("  Version: {}", ir.info.version);
    eprintln!("  Package: {}", ir.package);
    eprintln!("  Resources: {}", ir.resources.len());
    eprintln!("  Operations: {}", ir.operation_count());
    eprintln!("Validation successful.");
    Ok(())
}

fn cmd_inspect(schema: &str, format: InspectFormat) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();
    let ir = load_spec(schema, &cfg)?;

    let summary = build_inspect_summary(&ir);

    match format {
        InspectFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        InspectFormat::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn return_kind(returns: &ReturnDescriptor) -> &'static str {
    match returns {
        ReturnDescriptor::Empty => "empty",
        ReturnDescriptor::Named { .. } => "named",
        ReturnDescriptor::Collection { .. } => "collection",
        ReturnDescriptor::Result { .. } => "result",
        ReturnDescriptor::Scalar(_) => "scalar",
    }
}

fn build_inspect_summary(ir: &ClientSpec) -> serde_json::Value {
    let resources: Vec<serde_json::Value> = ir
        .resources
        .iter()
        .map(|resource| {
            let operations: Vec<serde_json::Value> = resource
                .operations
                .iter()
                .map(|op| {
                    serde_json::json!({
                        "name": op.name.pascal_case,
                        "rel": op.rel,
                        "method": op.method.as_str(),
                        "href": op.href,
                        "parameters": op.parameters.iter().map(|p| &p.name).collect::<Vec<_>>(),
                        "returns": return_kind(&op.returns),
                    })
                })
                .collect();
            serde_json::json!({
                "name": resource.name.pascal_case,
                "operations": operations,
            })
        })
        .collect();

    serde_json::json!({
        "info": {
            "title": ir.info.title,
            "version": ir.info.version,
        },
        "package": ir.package,
        "base_url": ir.base_url,
        "resources": resources,
    })
}

fn cmd_init(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(config_path, config::default_config_content())
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
