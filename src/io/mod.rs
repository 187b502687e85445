//! File formats for the three inputs and the output layer.
//!
//! - `csv` - delimited tables (BPI and update inputs, attribute-only output)
//! - `tables` - typed records from the delimited tables
//! - `shp` - zone layer from an ESRI shapefile
//! - `geojson` - zone layer from GeoJSON, and the GeoJSON output sink
//!
//! Outputs go through [`PendingWrite`] so a failed run never leaves a partial file behind.

pub mod csv;
pub mod geojson;
pub mod shp;
pub mod tables;

use std::{fs::{self, File}, io::Write, path::{Path, PathBuf}};

use anyhow::{bail, Context, Result};
use geo::MultiPolygon;
use tempfile::NamedTempFile;

use crate::{config::ZoneColumns, types::ZoneLayer};

/// Read a zone layer, picking the format from the file extension.
pub fn read_zone_layer(path: &Path, columns: &ZoneColumns) -> Result<ZoneLayer<MultiPolygon<f64>>> {
    let ext = path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("shp") => shp::read_zone_layer(path, columns),
        Some("geojson" | "json") => geojson::read_zone_layer(path, columns),
        _ => bail!("[io] Unsupported zone layer format: {}", path.display()),
    }
}

pub fn assert_not_stdout(path: &Path) -> Result<()> {
    if path == Path::new("-") {
        bail!("stdout is not supported; provide a real file path.");
    }
    Ok(())
}

/// Write-then-rename wrapper for atomic outputs.
pub struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

/// Open a temp file next to `target`; nothing appears at `target` until [`PendingWrite::commit`].
pub fn open_for_write(target: &Path, force: bool) -> Result<PendingWrite> {
    assert_not_stdout(target)?;
    let parent = target.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(parent)
        .with_context(|| format!("create dir {}", parent.display()))?;
    if !force && target.exists() {
        bail!("Refusing to overwrite existing file: {} (use --force)", target.display());
    }
    let tmp = NamedTempFile::new_in(parent).context("create temp file")?;

    Ok(PendingWrite { target: target.to_path_buf(), tmp })
}

impl PendingWrite {
    /// Flush and move the temp file into place.
    pub fn commit(mut self) -> Result<()> {
        self.tmp.flush()?;
        self.tmp.as_file().sync_all().ok(); // best-effort fsync file
        self.tmp.persist(&self.target)
            .with_context(|| format!("rename to {}", self.target.display()))?;
        if let Some(dir) = self.target.parent() {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.tmp.write(buf)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.tmp.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_write_is_invisible_until_commit() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out").join("zones.geojson");

        let mut pending = open_for_write(&target, false).unwrap();
        pending.write_all(b"{}").unwrap();
        assert!(!target.exists());

        pending.commit().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn refuses_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("zones.csv");
        fs::write(&target, "old").unwrap();

        assert!(open_for_write(&target, false).is_err());

        let mut pending = open_for_write(&target, true).unwrap();
        pending.write_all(b"new").unwrap();
        pending.commit().unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "new");
    }

    #[test]
    fn rejects_stdout_and_unknown_formats() {
        assert!(assert_not_stdout(Path::new("-")).is_err());
        assert!(open_for_write(Path::new("-"), true).is_err());
        assert!(read_zone_layer(Path::new("zones.kml"), &ZoneColumns::default()).is_err());
    }
}
