// FILENAME: core\persistence\src\csv_reader.rs

use crate::config::{LoaderConfig, NullTokens};
use crate::PersistenceError;
use csv::{ByteRecord, ReaderBuilder};
use encoding_rs::Encoding;
use engine::{FieldValue, RawDataset, Record};
use log::{debug, info};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub fn load_csv(path: &Path, config: &LoaderConfig) -> Result<RawDataset, PersistenceError> {
    debug!("Loading survey data from {}", path.display());
    let file = File::open(path)?;
    load_reader(BufReader::new(file), config)
}

/// Reads a CSV byte stream, keeping only the whitelisted columns (renamed to
/// their canonical names) and replacing null tokens with `FieldValue::Missing`.
pub fn load_reader<R: Read>(source: R, config: &LoaderConfig) -> Result<RawDataset, PersistenceError> {
    config.validate()?;
    let encoding = Encoding::for_label(config.encoding.as_bytes())
        .ok_or_else(|| PersistenceError::UnsupportedEncoding(config.encoding.clone()))?;
    let null_tokens = NullTokens::new(&config.null_tokens);

    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter_byte()?)
        .flexible(true) // Short rows read as missing trailing cells
        .from_reader(source);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|h| decode(encoding, h).trim().trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut selected = Vec::with_capacity(config.columns.len());
    for column in &config.columns {
        let index = headers
            .iter()
            .position(|h| *h == column.source)
            .ok_or_else(|| PersistenceError::SchemaMismatch {
                column: column.source.clone(),
            })?;
        selected.push(index);
    }

    let mut dataset = RawDataset::new(config.columns.iter().map(|c| c.name.clone()).collect());
    let mut record = ByteRecord::new();
    let mut source_row: u32 = 0;

    while reader.read_byte_record(&mut record)? {
        let values = selected
            .iter()
            .map(|&index| match record.get(index) {
                Some(bytes) => {
                    let text = decode(encoding, bytes);
                    if null_tokens.is_null(&text) {
                        FieldValue::Missing
                    } else {
                        FieldValue::Text(text.trim().to_string())
                    }
                }
                None => FieldValue::Missing,
            })
            .collect();
        dataset.rows.push(Record::new(source_row, values));
        source_row += 1;
    }

    info!(
        "Loaded {} rows, {} of {} source columns kept",
        dataset.len(),
        selected.len(),
        headers.len()
    );
    Ok(dataset)
}

fn decode<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> Cow<'a, str> {
    let (text, _had_errors) = encoding.decode_without_bom_handling(bytes);
    text
}
