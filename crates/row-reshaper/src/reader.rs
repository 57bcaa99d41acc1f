//! CSV reading and variant construction.

use rand::Rng;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::error::ReshapeError;
use crate::reshape::{augmented_variant, base_variant};

/// Column holding the JSON body when none is configured.
pub const DEFAULT_BODY_COLUMN: &str = "body";

/// Configuration for reading the input file
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the column holding the JSON object of each row
    pub body_column: String,

    /// CSV delimiter character (default: ',')
    pub delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            body_column: DEFAULT_BODY_COLUMN.to_string(),
            delimiter: b',',
        }
    }
}

/// Both event collections derived from one input file, in row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variants {
    pub base: Vec<Value>,
    pub augmented: Vec<Value>,
}

/// Parse the body column of every row into a JSON object.
pub fn read_bodies<R: Read>(
    reader: R,
    config: &Config,
) -> Result<Vec<Map<String, Value>>, ReshapeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(config.delimiter)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();
    debug!("CSV headers: {headers:?}");

    let body_index = headers
        .iter()
        .position(|h| h == &config.body_column)
        .ok_or_else(|| ReshapeError::MissingColumn {
            column: config.body_column.clone(),
            headers: headers.clone(),
        })?;

    let mut bodies = Vec::new();
    for (i, result) in csv_reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let cell = record.get(body_index).unwrap_or_default();

        let value: Value = serde_json::from_str(cell)
            .map_err(|source| ReshapeError::InvalidJson { row, source })?;

        match value {
            Value::Object(map) => bodies.push(map),
            other => {
                return Err(ReshapeError::NotAnObject {
                    row,
                    found: json_type_name(&other),
                })
            }
        }
    }

    Ok(bodies)
}

/// Read `path` once and build the base and augmented collections.
pub fn load_variants<R: Rng + ?Sized>(
    path: impl AsRef<Path>,
    config: &Config,
    rng: &mut R,
) -> Result<Variants, ReshapeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ReshapeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let bodies = read_bodies(BufReader::new(file), config)?;
    info!("Read {} rows from {}", bodies.len(), path.display());

    let variants = Variants {
        base: bodies
            .iter()
            .enumerate()
            .map(|(i, body)| Value::Object(base_variant(body, i)))
            .collect(),
        augmented: bodies
            .iter()
            .enumerate()
            .map(|(i, body)| Value::Object(augmented_variant(body, i, rng)))
            .collect(),
    };

    Ok(variants)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
