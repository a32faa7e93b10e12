//! Write build output to STL files.

use std::path::{Path, PathBuf};

use tracing::info;
use trinket_mesh::stl::StlFormat;

use crate::{ExportError, Generated};

/// Write each `(key, file stem)` pair of `outputs` to `dir/<stem>.stl`.
///
/// Returns the written paths in `outputs` order. Stops at the first missing
/// solid or I/O error.
pub fn export(
    generated: &Generated,
    outputs: &[(&str, &str)],
    dir: &Path,
    format: StlFormat,
) -> Result<Vec<PathBuf>, ExportError> {
    let mut written = Vec::with_capacity(outputs.len());
    for &(key, stem) in outputs {
        let solid = generated
            .get(key)
            .ok_or_else(|| ExportError::MissingSolid(key.to_string()))?;
        let path = dir.join(format!("{stem}.stl"));
        solid
            .write_stl_as(&path, format)
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), triangles = solid.num_triangles(), "wrote STL");
        written.push(path);
    }
    Ok(written)
}
