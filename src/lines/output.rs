use crate::error::Result;
use crate::model::ReportEntry;
use console::style;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the report as indented UTF-8 JSON. The file only appears at `path`
/// once fully written.
pub fn write_report(entries: &[ReportEntry], path: &Path) -> Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, entries)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn print_summary(entries: &[ReportEntry], path: &Path) {
    let counted = entries.iter().filter(|e| e.chosen_branch.is_some()).count();
    let lines: u64 = entries.iter().map(ReportEntry::total_lines).sum();
    println!(
        "{} {} projects written to {} ({} with code, {} lines)",
        style("✓").green().bold(),
        entries.len(),
        style(path.display()).bold(),
        counted,
        lines
    );
}
