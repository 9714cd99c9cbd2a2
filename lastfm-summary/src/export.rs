use crate::models::ArtistCount;
use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};

const HEADER: [&str; 2] = ["Artist", "Play Count"];

/// `<dir>/<username>_<year>_summary.csv`
pub fn output_path(dir: &Path, username: &str, year: i32) -> PathBuf {
    dir.join(format!("{username}_{year}_summary.csv"))
}

/// Writes the aggregate as UTF-8 CSV, replacing any existing file.
///
/// Names containing a comma, a double quote or a line break are quoted,
/// with inner quotes doubled. Everything else is written as is.
pub fn write_csv(data: &[ArtistCount], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);

    writer.write_record(HEADER)?;
    for entry in data {
        let plays = entry.plays.to_string();
        writer.write_record([entry.artist.as_str(), plays.as_str()])?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    tracing::info!("CSV saved to {}", path.display());
    Ok(())
}
