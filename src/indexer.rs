use crate::config::Settings;
use crate::engine::EngineClient;
use crate::error::IndexError;
use crate::schema::build_index_config;
use crate::synonyms;
use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// One index action: the header names the document id, the body is the
/// record without its identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOperation {
    pub id: String,
    pub body: Map<String, Value>,
}

impl BulkOperation {
    pub fn header(&self) -> Value {
        json!({ "index": { "_id": self.id } })
    }

    /// Header line then body line, each newline-terminated.
    pub fn write_lines(&self, out: &mut String) -> Result<(), IndexError> {
        out.push_str(&serde_json::to_string(&self.header())?);
        out.push('\n');
        out.push_str(&serde_json::to_string(&self.body)?);
        out.push('\n');
        Ok(())
    }
}

/// Turn one corpus record into a bulk operation, consuming its identifier.
///
/// String and numeric identifiers are accepted; anything else is a schema
/// mismatch.
pub fn frame_record(
    position: usize,
    mut record: Map<String, Value>,
    id_field: &str,
) -> Result<BulkOperation, IndexError> {
    let mismatch = || IndexError::SchemaMismatch {
        position,
        field: id_field.to_string(),
    };

    let id = match record.remove(id_field) {
        Some(Value::String(id)) if !id.is_empty() => id,
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(mismatch()),
    };

    Ok(BulkOperation { id, body: record })
}

/// Frame a whole batch. The first bad record aborts the batch.
pub fn frame_batch(records: Vec<Value>, id_field: &str) -> Result<Vec<BulkOperation>, IndexError> {
    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| match record {
            Value::Object(record) => frame_record(position, record, id_field),
            _ => Err(IndexError::SchemaMismatch {
                position,
                field: id_field.to_string(),
            }),
        })
        .collect()
}

/// Newline-delimited bulk payload, pairs kept in batch order.
pub fn to_ndjson(operations: &[BulkOperation]) -> Result<String, IndexError> {
    let mut payload = String::new();
    for op in operations {
        op.write_lines(&mut payload)?;
    }
    Ok(payload)
}

/// Read a corpus file holding a JSON array of topic records.
pub fn load_corpus(path: &Path) -> Result<Vec<Value>, IndexError> {
    let reader = BufReader::new(File::open(path)?);
    match serde_json::from_reader(reader)? {
        Value::Array(records) => Ok(records),
        other => Err(IndexError::CorpusShape(format!(
            "expected an array, found {}",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Frame the configured corpus into a bulk payload.
pub fn frame_corpus(settings: &Settings) -> Result<(usize, String)> {
    let corpus_path = settings.corpus_path();
    let records = load_corpus(&corpus_path)
        .with_context(|| format!("reading corpus {}", corpus_path.display()))?;

    let operations = frame_batch(records, &settings.id_field)?;
    let payload = to_ndjson(&operations)?;
    Ok((operations.len(), payload))
}

/// Compile synonyms, recreate the index and bulk-load the corpus.
///
/// The synonym list and configuration are built before anything touches the
/// engine, so a malformed configuration file or an empty corpus never drops
/// the live index.
pub async fn build_index(settings: &Settings, engine: &EngineClient) -> Result<()> {
    info!("Starting index build...");
    info!("Engine: {} | Index: {}", settings.engine_url, settings.index);

    let start_time = Instant::now();

    synonyms::compile_to_file(&settings.synonyms_source(), &settings.compiled_synonyms_path())
        .context("compiling synonym list")?;

    let config = build_index_config(&settings.resource_paths());

    info!("Framing corpus {}", settings.corpus_path().display());
    let (record_count, payload) = frame_corpus(settings)?;
    let framed = start_time.elapsed().as_secs_f64();
    info!(
        "[Progress] Framed {} records | Elapsed: {:.1}s | Speed: {:.0} records/sec",
        record_count,
        framed,
        record_count as f64 / framed.max(f64::EPSILON)
    );

    if record_count == 0 {
        anyhow::bail!(
            "corpus {} has no records; leaving index {} untouched",
            settings.corpus_path().display(),
            settings.index
        );
    }

    let created = engine.recreate_index(&config).await?;
    if !created.is_success() {
        warn!("Index creation returned {}: {}", created.status, created.body);
        anyhow::bail!("engine rejected index configuration ({})", created.status);
    }

    info!("Sending bulk payload ({} bytes)...", payload.len());
    let loaded = engine.bulk(payload).await?;
    if !loaded.is_success() {
        warn!("Bulk load returned {}: {}", loaded.status, loaded.body);
        anyhow::bail!("engine rejected bulk load ({})", loaded.status);
    }

    let total_elapsed = start_time.elapsed();
    info!("✓ Indexing complete!");
    info!("  Total records indexed: {}", record_count);
    info!("  Total time: {:.2} seconds", total_elapsed.as_secs_f64());

    Ok(())
}
