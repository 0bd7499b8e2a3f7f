use super::AnalysisExport;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pretty-printed JSON. Non-finite numbers are written as `null`.
pub fn write_json(export: &AnalysisExport, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, export)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn to_json_string(export: &AnalysisExport) -> Result<String> {
    Ok(serde_json::to_string_pretty(export)?)
}
