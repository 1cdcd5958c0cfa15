use crate::types::AcquiredCalendar;
use anyhow::Result;
use std::fs;
use std::path::Path;

/// Write acquisition output files to the given directory.
///
/// Creates the directory if it doesn't exist, then writes:
/// - `availability.json` — the full structured calendar (downstream input)
/// - `source.md` — provenance info
pub fn write_calendar(calendar: &AcquiredCalendar, output_dir: &str) -> Result<()> {
    let dir = Path::new(output_dir);
    fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(calendar)?;
    fs::write(dir.join("availability.json"), &json)?;
    tracing::info!(
        path = %dir.join("availability.json").display(),
        days = calendar.days.len(),
        "Wrote availability JSON"
    );

    fs::write(dir.join("source.md"), calendar.source_md())?;
    tracing::info!(path = %dir.join("source.md").display(), "Wrote source provenance");

    Ok(())
}
