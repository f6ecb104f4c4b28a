use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::report::{ReportError, RunSummary};

pub fn write_summary(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    Ok(())
}
