// File: src/persistence.rs
use crate::core::model::LanguageModel;
use crate::core::types::TrigramCounts;
use crate::error::{Result, StringsError};
use crate::parser::write_model;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

const SNAPSHOT_MAGIC: [u8; 4] = *b"SSTM";
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    magic: [u8; 4],
    version: u32,
    model: &'a LanguageModel,
}

#[derive(Deserialize)]
struct Snapshot {
    magic: [u8; 4],
    version: u32,
    model: LanguageModel,
}

/// Writes to a temp file beside `path`, then renames it into place.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        write(&mut writer)?;
        writer.flush()?;
    }

    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Saves counts as a model file readable by [`crate::parser::parse_model_file`].
pub fn save_model_file(counts: &TrigramCounts, model_type: &str, path: &Path) -> Result<()> {
    write_atomically(path, |writer| write_model(counts, model_type, writer))?;
    info!(path = %path.display(), model_type, "wrote model file");
    Ok(())
}

/// Saves a built model so it can be loaded without re-parsing and smoothing.
pub fn save_compiled(model: &LanguageModel, path: &Path) -> Result<()> {
    let snapshot = SnapshotRef {
        magic: SNAPSHOT_MAGIC,
        version: SNAPSHOT_VERSION,
        model,
    };
    write_atomically(path, |writer| Ok(bincode::serialize_into(writer, &snapshot)?))?;
    info!(path = %path.display(), "wrote compiled model");
    Ok(())
}

pub fn load_compiled(path: &Path) -> Result<LanguageModel> {
    let reader = BufReader::new(File::open(path)?);
    let snapshot: Snapshot = bincode::deserialize_from(reader)?;

    if snapshot.magic != SNAPSHOT_MAGIC {
        return Err(StringsError::Snapshot("not a compiled trigram model".to_string()));
    }
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(StringsError::Snapshot(format!(
            "unsupported snapshot version {}",
            snapshot.version
        )));
    }
    snapshot.model.validate_shape()?;

    Ok(snapshot.model)
}
