use clap::{Parser, Subcommand, ValueEnum};
use schema_mapper::engine::ConflictPolicy;
use schema_mapper::prelude::*;
use schema_mapper::schema::{EntityDescription, field_paths};
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Execute and inspect schema mappings from the command line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a saved mapping against a source document
    Execute {
        /// Path to the source schema JSON file
        source: String,
        /// Path to the destination schema JSON file
        destination: String,
        /// Path to the mapping document JSON file
        mapping: String,
        /// Path to the input (source) document JSON file
        input: String,

        /// Where to write the produced document; stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// How to handle two connections writing the same destination path
        #[arg(long, value_enum, default_value_t = ConflictCli::LastWriteWins)]
        conflicts: ConflictCli,

        /// Print a step-by-step explanation of the run
        #[arg(short, long)]
        trace: bool,
    },
    /// Check that schema files parse and satisfy the tree invariants
    Validate {
        /// One or more schema JSON files
        #[arg(required = true)]
        schemas: Vec<String>,
    },
    /// List every mappable field path of a schema
    Paths {
        /// Path to a schema JSON file
        schema: String,
    },
    /// Convert an entity description (title/properties/required) into a schema tree
    Convert {
        /// Path to the entity description JSON file
        entity: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ConflictCli {
    LastWriteWins,
    Reject,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Execute {
            source,
            destination,
            mapping,
            input,
            output,
            conflicts,
            trace,
        } => run_execute(&source, &destination, &mapping, &input, output, conflicts, trace),
        Command::Validate { schemas } => run_validate(&schemas),
        Command::Paths { schema } => run_paths(&schema),
        Command::Convert { entity } => run_convert(&entity),
    }
}

fn run_execute(
    source_path: &str,
    destination_path: &str,
    mapping_path: &str,
    input_path: &str,
    output_path: Option<String>,
    conflicts: ConflictCli,
    show_trace: bool,
) {
    let total_start = Instant::now();

    let source = load_schema(source_path);
    let destination = load_schema(destination_path);
    let mapping = MappingDocument::from_json(&read_file(mapping_path)).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load mapping '{}': {}", mapping_path, e))
    });
    let input_json = read_file(input_path);

    let policy = match conflicts {
        ConflictCli::LastWriteWins => ConflictPolicy::LastWriteWins,
        ConflictCli::Reject => ConflictPolicy::Reject,
    };
    let executor = Executor::builder().conflict_policy(policy).build();
    let mut session = MappingSession::new(source, destination)
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid schemas: {}", e)))
        .with_executor(executor);

    let report = session.import_mapping(&mapping);
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }
    eprintln!(
        "Loaded {} connection(s) and {} functoid(s).",
        report.connections.len(),
        report.transforms.len()
    );

    let run_start = Instant::now();
    let outcome = session
        .execute_json(&input_json)
        .unwrap_or_else(|e| exit_with_error(&format!("Execution failed: {}", e)));
    let run_duration = run_start.elapsed();

    for warning in &outcome.warnings {
        eprintln!("Warning: {}", warning);
    }
    if show_trace {
        eprintln!("\n--- Trace ---");
        eprintln!("{}", TraceFormatter::format_trace(&outcome.trace));
    }

    let rendered = serde_json::to_string_pretty(&outcome.output)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render output: {}", e)));
    match output_path {
        Some(path) => {
            fs::write(&path, rendered).unwrap_or_else(|e| {
                exit_with_error(&format!("Failed to write output '{}': {}", path, e))
            });
            eprintln!("Wrote output document to '{}'.", path);
        }
        None => println!("{}", rendered),
    }

    eprintln!("\n--- Performance Summary ---");
    eprintln!("Execution:            {:?}", run_duration);
    eprintln!("Total:                {:?}", total_start.elapsed());
}

fn run_validate(paths: &[String]) {
    let mut failures = 0;
    for path in paths {
        match SchemaNode::from_json(&read_file(path)) {
            Ok(schema) => println!(
                "OK    {} (root '{}', {} field(s))",
                path,
                schema.name(),
                field_paths(&schema).len()
            ),
            Err(e) => {
                failures += 1;
                println!("FAIL  {}: {}", path, e);
            }
        }
    }
    if failures > 0 {
        exit_with_error(&format!("{} schema file(s) failed validation", failures));
    }
}

fn run_paths(path: &str) {
    let schema = load_schema(path);
    for field in field_paths(&schema) {
        println!("{}", field);
    }
}

fn run_convert(path: &str) {
    let schema = EntityDescription::from_json(&read_file(path))
        .and_then(IntoSchema::into_schema)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to convert '{}': {}", path, e)));
    let rendered = serde_json::to_string_pretty(&schema)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to render schema: {}", e)));
    println!("{}", rendered);
}

fn load_schema(path: &str) -> SchemaNode {
    SchemaNode::from_json(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load schema '{}': {}", path, e)))
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read file '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
