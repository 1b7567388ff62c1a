use thiserror::Error;

use crate::variation::{Selection, Variation, VariationSet};

/// Reasons a submitted variation list cannot be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no image selected for the {role} (row {index} has no file)")]
    MissingSelection { role: &'static str, index: usize },
}

/// Normalizes submitted rows into a [`VariationSet`].
///
/// `rows[0]` is the new background and is kept verbatim. Later rows are kept
/// only when they name a file. Both selections address rows by their position
/// in `rows` before any filtering, so the stored file is whatever that row held
/// at submit time.
pub fn commit(
    rows: &[Variation],
    gm_index: usize,
    pl_index: usize,
) -> Result<VariationSet, ValidationError> {
    let gm_selection = select(rows, gm_index, "GM")?;
    let pl_selection = select(rows, pl_index, "players")?;

    let background = rows.first().map(|row| row.file.clone()).unwrap_or_default();
    let variations: Vec<Variation> = rows
        .iter()
        .skip(1)
        .filter(|row| row.has_file())
        .cloned()
        .collect();

    log::debug!(
        "committing background {background} with {} variation(s), gm={} pl={}",
        variations.len(),
        gm_selection.file,
        pl_selection.file
    );

    Ok(VariationSet {
        variations,
        background,
        gm_selection,
        pl_selection,
    })
}

fn select(rows: &[Variation], index: usize, role: &'static str) -> Result<Selection, ValidationError> {
    match rows.get(index) {
        Some(row) if row.has_file() => Ok(Selection::new(index, row.file.clone())),
        _ => Err(ValidationError::MissingSelection { role, index }),
    }
}
