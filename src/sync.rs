//! Batch entry points, one per stage. Each takes its configuration
//! explicitly and reports what it did.

use tracing::{debug, info, instrument, warn};

use crate::config::{ExtractConfig, LoadConfig};
use crate::error::{Result, ToolError};
use crate::extract::{ExtractReport, extract_sheets};
use crate::io::{document, excel_read};
use crate::load::client::PostgrestClient;
use crate::load::schema::required_schema;
use crate::load::{ImportSummary, Importer};
use crate::model::{DocumentStats, ScoreboardDocument};

/// Extracts the scoreboard workbook into the intermediate JSON document.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %config.input.display(), output = %config.output.display())
)]
pub fn excel_to_json(config: &ExtractConfig) -> Result<ExtractReport> {
    ensure_exists(&config.input)?;

    let sheets = excel_read::read_sheets(&config.input)?;
    info!(sheet_count = sheets.len(), "read sheets from workbook");

    let report = extract_sheets(&sheets);
    document::write_document(&config.output, &report.document)?;

    let stats = DocumentStats::of(&report.document);
    info!(
        people = stats.people,
        entries = stats.entries,
        commitments = stats.commitments,
        skipped = report.skipped.len(),
        "extraction complete"
    );
    Ok(report)
}

/// Runs the full import of the intermediate document into the store.
#[instrument(level = "info", skip_all, fields(input = %config.input.display(), store = %config.store.url))]
pub fn json_to_store(config: &LoadConfig) -> Result<ImportSummary> {
    info!("the store must already have the tables printed by the `schema` command");
    debug!(schema = %required_schema(), "required schema");
    let document = load_document(config)?;
    let mut importer = Importer::new(PostgrestClient::new(&config.store)?, config.pacing);
    importer.run(&document)?;
    finish(importer)
}

/// Imports only the commitments, for users an earlier run created.
#[instrument(level = "info", skip_all, fields(input = %config.input.display(), store = %config.store.url))]
pub fn json_commitments_to_store(config: &LoadConfig) -> Result<ImportSummary> {
    let document = load_document(config)?;
    let mut importer = Importer::new(PostgrestClient::new(&config.store)?, config.pacing);
    importer.run_commitments_only(&document)?;
    finish(importer)
}

fn load_document(config: &LoadConfig) -> Result<ScoreboardDocument> {
    ensure_exists(&config.input)?;
    let document = document::read_document(&config.input)?;
    let stats = DocumentStats::of(&document);
    info!(
        people = stats.people,
        entries = stats.entries,
        commitments = stats.commitments,
        "loaded intermediate document"
    );
    Ok(document)
}

fn finish(importer: Importer<PostgrestClient>) -> Result<ImportSummary> {
    let summary = importer.into_summary();
    if !summary.failures.is_empty() {
        warn!(failures = summary.failures.len(), "import finished with failures");
    } else {
        info!("import finished");
    }
    Ok(summary)
}

fn ensure_exists(path: &std::path::Path) -> Result<()> {
    if !path.exists() {
        return Err(ToolError::MissingInput(path.to_path_buf()));
    }
    Ok(())
}
