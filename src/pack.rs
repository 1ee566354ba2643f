//! Daily pack encoding and output.
//!
//! The pack is a MessagePack map with string keys (`id`, `title`, `puzzles`),
//! the same container format the puzzle files use. Each run replaces the
//! output file completely:
//!
//! 1. Encode the whole pack in memory.
//! 2. Write it to a hidden sibling file (`.<name>.tmp`).
//! 3. Rename the sibling over the target.
//!
//! Readers of the output path see either the previous pack or the new one,
//! never a partial write.

use crate::types::DailyPack;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PackError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("MessagePack encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("MessagePack decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

/// Encode a pack as MessagePack with named fields.
pub fn encode_pack(pack: &DailyPack) -> Result<Vec<u8>, PackError> {
    Ok(rmp_serde::to_vec_named(pack)?)
}

/// Decode a pack previously produced by [`encode_pack`].
pub fn decode_pack(bytes: &[u8]) -> Result<DailyPack, PackError> {
    Ok(rmp_serde::from_slice(bytes)?)
}

/// Encode `pack` and replace the file at `path` with it.
///
/// Creates the parent directory if needed. Returns the number of bytes written.
pub fn write_pack(path: &Path, pack: &DailyPack) -> Result<usize, PackError> {
    let bytes = encode_pack(pack)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let staging = staging_path(path);
    fs::write(&staging, &bytes)?;
    if let Err(e) = fs::rename(&staging, path) {
        if let Err(cleanup) = fs::remove_file(&staging) {
            tracing::debug!(
                "Could not remove staging file {}: {}",
                staging.display(),
                cleanup
            );
        }
        return Err(e.into());
    }
    Ok(bytes.len())
}

/// Read and decode the pack at `path`.
pub fn read_pack(path: &Path) -> Result<DailyPack, PackError> {
    let bytes = fs::read(path)?;
    decode_pack(&bytes)
}

fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "pack".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
