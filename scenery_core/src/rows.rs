use std::fmt;

use crate::variation::{Variation, VariationSet};

/// Stable identity of an editing row.
///
/// Ids are never renumbered when rows are removed; the submitted order is the
/// iteration order of [`VariationRows`], so gaps are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub u32);

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRow {
    pub id: RowId,
    pub variation: Variation,
}

/// Working copy of a scene's variations while the form is open.
///
/// The first row is the default background and is never removed by the row
/// operations.
#[derive(Debug, Clone, Default)]
pub struct VariationRows {
    rows: Vec<EditRow>,
}

impl VariationRows {
    /// Builds the rows for a stored set: the default row labelled
    /// `default_label`, one row per variation, then a trailing blank row.
    pub fn from_set(set: &VariationSet, default_label: &str) -> Self {
        let mut rows = VariationRows::default();
        rows.add_row(default_label, set.background.clone());
        for variation in &set.variations {
            rows.add_row(variation.name.clone(), variation.file.clone());
        }
        rows.add_row("", "");
        rows
    }

    /// Appends a row whose id is one past the highest id present.
    pub fn add_row(&mut self, name: impl Into<String>, file: impl Into<String>) -> RowId {
        let id = self.next_id();
        self.rows.push(EditRow {
            id,
            variation: Variation::new(name, file),
        });
        id
    }

    /// Removes the row with `id`. The default row stays put.
    pub fn remove_row(&mut self, id: RowId) -> Option<Variation> {
        let position = self.position(id)?;
        if position == 0 {
            return None;
        }
        Some(self.rows.remove(position).variation)
    }

    /// Drops every non-default row with neither a name nor a file.
    pub fn remove_blank_rows(&mut self) {
        let mut first = true;
        self.rows.retain(|row| {
            let keep = first || !row.variation.is_blank();
            first = false;
            keep
        });
    }

    /// Merges scan results: blank placeholders are removed, discovered rows are
    /// appended at consecutive ids, and a fresh blank row closes the list.
    pub fn merge_scanned(&mut self, found: Vec<Variation>) -> Vec<RowId> {
        self.remove_blank_rows();
        let ids = found
            .into_iter()
            .map(|variation| self.add_row(variation.name, variation.file))
            .collect();
        self.add_row("", "");
        ids
    }

    pub fn position(&self, id: RowId) -> Option<usize> {
        self.rows.iter().position(|row| row.id == id)
    }

    pub fn id_at(&self, position: usize) -> Option<RowId> {
        self.rows.get(position).map(|row| row.id)
    }

    pub fn get(&self, id: RowId) -> Option<&Variation> {
        self.rows.iter().find(|row| row.id == id).map(|row| &row.variation)
    }

    pub fn set_name(&mut self, id: RowId, name: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(variation) => {
                variation.name = name.into();
                true
            }
            None => false,
        }
    }

    pub fn set_file(&mut self, id: RowId, file: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(variation) => {
                variation.file = file.into();
                true
            }
            None => false,
        }
    }

    pub fn default_row(&self) -> Option<&EditRow> {
        self.rows.first()
    }

    /// File paths of every row, blanks included.
    pub fn files(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.variation.file.clone()).collect()
    }

    /// Rows in submission order.
    pub fn to_variations(&self) -> Vec<Variation> {
        self.rows.iter().map(|row| row.variation.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn get_mut(&mut self, id: RowId) -> Option<&mut Variation> {
        self.rows
            .iter_mut()
            .find(|row| row.id == id)
            .map(|row| &mut row.variation)
    }

    fn next_id(&self) -> RowId {
        self.rows
            .iter()
            .map(|row| row.id.0 + 1)
            .max()
            .map(RowId)
            .unwrap_or(RowId(0))
    }
}
