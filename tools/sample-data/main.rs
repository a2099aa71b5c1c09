use chrono::{Days, NaiveDate, TimeZone, Utc};
use clap::Parser;
use rand::Rng;
use rand::rngs::ThreadRng;
use schema_mapper::path::FieldPath;
use schema_mapper::schema::{DataType, FieldNode, SchemaNode, traverse};
use serde_json::{Map, Value, json};
use std::fs;
use std::path::{Path, PathBuf};

const WORDS: &[&str] = &[
    "John", "Jane", "Doe", "Smith", "Main Street", "Springfield", "Acme", "Contoso", "Oak",
    "River", "North", "Blue",
];

/// A CLI tool to generate sample source documents for a schema
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the source schema JSON file
    schema: String,

    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_input.json")]
    output: String,

    /// Number of documents to generate; more than one writes one numbered file
    /// per document (`generated_input_1.json`, `generated_input_2.json`, ...)
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Probability (0.0 - 1.0) that a non-required field is left out
    #[arg(long, default_value_t = 0.0)]
    missing_rate: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.missing_rate) {
        eprintln!(
            "Error: --missing-rate ({}) must be between 0.0 and 1.0",
            cli.missing_rate
        );
        std::process::exit(1);
    }

    let schema = SchemaNode::from_json(&fs::read_to_string(&cli.schema)?)?;
    println!(
        "Generating {} document(s) for schema '{}' (missing rate {})...",
        cli.count,
        schema.name(),
        cli.missing_rate
    );

    for index in 1..=cli.count {
        let document = generate_document(&schema, &mut rng, cli.missing_rate)?;
        let path = if cli.count == 1 {
            PathBuf::from(&cli.output)
        } else {
            numbered_path(Path::new(&cli.output), index)
        };
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        println!(
            "Successfully generated and saved sample data to '{}'",
            path.display()
        );
    }
    Ok(())
}

/// `out/data.json` with index 2 becomes `out/data_2.json`.
fn numbered_path(output: &Path, index: usize) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{}_{}.{}", stem, index, ext.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    output.with_file_name(name)
}

/// Builds one document holding a value for every field of `schema`.
fn generate_document(
    schema: &SchemaNode,
    rng: &mut ThreadRng,
    missing_rate: f64,
) -> Result<Value, schema_mapper::error::PathError> {
    let mut document = Value::Object(Map::new());
    let fields: Vec<(FieldPath, &FieldNode)> = traverse(schema)
        .filter_map(|(path, node)| node.as_field().map(|field| (path, field)))
        .collect();

    for (path, field) in fields {
        let required = field.metadata.required == Some(true);
        if !required && missing_rate > 0.0 && rng.random_bool(missing_rate) {
            continue;
        }
        path.assign(&mut document, generate_value(field, rng))?;
    }
    Ok(document)
}

fn generate_value(field: &FieldNode, rng: &mut ThreadRng) -> Value {
    if let Some(default) = &field.metadata.default_value {
        if rng.random_bool(0.25) {
            return Value::String(default.clone());
        }
    }

    match field.data_type {
        DataType::String => match field.metadata.format.as_deref() {
            Some("email") => json!(format!("{}@example.com", random_word(rng).to_lowercase())),
            _ => json!(random_word(rng)),
        },
        DataType::Integer => json!(rng.random_range(0..10_000)),
        DataType::Number => json!((rng.random_range(0.0..1000.0_f64) * 100.0).round() / 100.0),
        DataType::Boolean => json!(rng.random_bool(0.5)),
        DataType::Date => {
            let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default();
            let date = base
                .checked_add_days(Days::new(rng.random_range(0..2000)))
                .unwrap_or(base);
            json!(date.format("%Y-%m-%d").to_string())
        }
        DataType::Datetime => {
            let seconds = rng.random_range(1_577_836_800..1_767_225_600_i64);
            match Utc.timestamp_opt(seconds, 0).single() {
                Some(timestamp) => json!(timestamp.to_rfc3339()),
                None => Value::Null,
            }
        }
        DataType::Guid => json!(random_guid(rng)),
        DataType::Array => {
            let len = rng.random_range(0..4);
            Value::Array((0..len).map(|_| json!(random_word(rng))).collect())
        }
        DataType::Object => Value::Object(Map::new()),
    }
}

fn random_word(rng: &mut ThreadRng) -> &'static str {
    WORDS[rng.random_range(0..WORDS.len())]
}

fn random_guid(rng: &mut ThreadRng) -> String {
    let bits: u128 = rng.random();
    let hex = format!("{:032x}", bits);
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_path_keeps_directory_and_extension() {
        assert_eq!(
            numbered_path(Path::new("out/data.json"), 2),
            PathBuf::from("out/data_2.json")
        );
        assert_eq!(numbered_path(Path::new("data"), 1), PathBuf::from("data_1"));
    }
}
