//! Immutable row-indexed tables.
//!
//! A [`Frame`] pairs a Polars DataFrame with the [`RowIndex`] naming its
//! rows. Every operation returns a new frame; columns that an operation does
//! not touch are shared with the input (Polars columns are reference
//! counted), so deriving a frame costs only the columns it rewrites.

use polars::prelude::*;

use cellview_model::{Result, WorldError};

use crate::row_index::{RowIndex, check_mask, next_generation};

/// Identity stamp of a frame value.
///
/// Clones keep the stamp; every derived frame gets a new one. Comparing
/// stamps is the O(1) "is this the same table" check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    fn fresh() -> Self {
        Self(next_generation())
    }
}

/// A DataFrame whose rows are named by a [`RowIndex`].
///
/// A frame with no columns still has rows: its height is the length of its
/// row index, which is what keeps an empty expression cache aligned with the
/// observation tables.
#[derive(Debug, Clone)]
pub struct Frame {
    id: FrameId,
    data: DataFrame,
    row_index: RowIndex,
}

impl Frame {
    /// Build a frame from data and a matching row index.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::LengthMismatch`] when the data has columns and
    /// its height differs from the row index length.
    pub fn new(data: DataFrame, row_index: RowIndex) -> Result<Self> {
        if data.width() > 0 && data.height() != row_index.len() {
            let column = data
                .get_column_names()
                .first()
                .map(|name| name.to_string())
                .unwrap_or_default();
            return Err(WorldError::LengthMismatch {
                column,
                expected: row_index.len(),
                actual: data.height(),
            });
        }
        Ok(Self {
            id: FrameId::fresh(),
            data,
            row_index,
        })
    }

    /// Build a frame over global ids `0..height`.
    pub fn from_data(data: DataFrame) -> Self {
        let row_index = RowIndex::identity(data.height());
        Self {
            id: FrameId::fresh(),
            data,
            row_index,
        }
    }

    /// A frame with rows but no columns.
    pub fn empty(row_index: RowIndex) -> Self {
        Self {
            id: FrameId::fresh(),
            data: DataFrame::empty(),
            row_index,
        }
    }

    pub fn identity(&self) -> FrameId {
        self.id
    }

    pub fn row_index(&self) -> &RowIndex {
        &self.row_index
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn height(&self) -> usize {
        self.row_index.len()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    /// True when the frame has no columns.
    pub fn is_empty(&self) -> bool {
        self.data.width() == 0
    }

    pub fn column_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect()
    }

    pub fn has_col(&self, name: &str) -> bool {
        self.data.column(name).is_ok()
    }

    /// Column by name.
    pub fn col(&self, name: &str) -> Result<&Series> {
        self.data
            .column(name)
            .map(Column::as_materialized_series)
            .map_err(|_| WorldError::unknown_column(name))
    }

    /// Column by position.
    pub fn icol(&self, index: usize) -> Result<&Series> {
        self.data
            .get_columns()
            .get(index)
            .map(Column::as_materialized_series)
            .ok_or_else(|| WorldError::unknown_column(format!("#{index}")))
    }

    /// True when `name` refers to the same column buffer in both frames.
    pub fn shares_column(&self, other: &Frame, name: &str) -> bool {
        match (self.col(name), other.col(name)) {
            (Ok(a), Ok(b)) => std::sync::Arc::ptr_eq(&a.0, &b.0),
            _ => false,
        }
    }

    /// Add a new column.
    ///
    /// # Errors
    ///
    /// Fails with [`WorldError::DuplicateColumn`] if the column exists and
    /// with [`WorldError::LengthMismatch`] if `data` is not one value per row.
    pub fn with_col(&self, name: &str, data: Series) -> Result<Frame> {
        if self.has_col(name) {
            return Err(WorldError::DuplicateColumn {
                column: name.to_string(),
            });
        }
        self.check_len(name, &data)?;
        let column = named(data, name).into_column();
        let data = if self.is_empty() {
            DataFrame::new(vec![column])?
        } else {
            let mut data = self.data.clone();
            data.with_column(column)?;
            data
        };
        Ok(self.derive(data))
    }

    /// Remove a column.
    pub fn drop_col(&self, name: &str) -> Result<Frame> {
        if !self.has_col(name) {
            return Err(WorldError::unknown_column(name));
        }
        let data = self.data.drop(name)?;
        Ok(self.derive(data))
    }

    /// Rename a column, keeping its position and data.
    pub fn rename_col(&self, from: &str, to: &str) -> Result<Frame> {
        if !self.has_col(from) {
            return Err(WorldError::unknown_column(from));
        }
        if from != to && self.has_col(to) {
            return Err(WorldError::DuplicateColumn {
                column: to.to_string(),
            });
        }
        let mut data = self.data.clone();
        data.rename(from, to.into())?;
        Ok(self.derive(data))
    }

    /// Replace the data of an existing column.
    pub fn replace_col_data(&self, name: &str, data: Series) -> Result<Frame> {
        if !self.has_col(name) {
            return Err(WorldError::unknown_column(name));
        }
        self.check_len(name, &data)?;
        let mut frame = self.data.clone();
        frame.with_column(named(data, name).into_column())?;
        Ok(self.derive(frame))
    }

    /// Keep the rows whose mask entry is `true`, preserving order.
    pub fn isubset_mask(&self, mask: &[bool]) -> Result<Frame> {
        let row_index = self.row_index.isubset_mask(mask)?;
        self.isubset_mask_onto(mask, &row_index)
    }

    /// Masked subset that adopts an already subsetted row index.
    ///
    /// Used to give several tables of one World the very same row index.
    pub fn isubset_mask_onto(&self, mask: &[bool], row_index: &RowIndex) -> Result<Frame> {
        check_mask(mask, self.height())?;
        let selected = mask.iter().filter(|&&keep| keep).count();
        if selected != row_index.len() {
            return Err(WorldError::MaskLength {
                expected: row_index.len(),
                actual: selected,
            });
        }
        let data = if self.is_empty() {
            DataFrame::empty()
        } else {
            let mask = BooleanChunked::from_slice("mask".into(), mask);
            self.data.filter(&mask)?
        };
        Ok(Self {
            id: FrameId::fresh(),
            data,
            row_index: row_index.clone(),
        })
    }

    /// Rows named by `rows` (all must be present) restricted to `columns`.
    ///
    /// The result adopts `rows` as its row index.
    pub fn subset(&self, rows: &RowIndex, columns: &[&str]) -> Result<Frame> {
        let positions = self.row_index.positions(rows)?;
        let take = IdxCa::from_vec("take".into(), positions);
        let mut taken = Vec::with_capacity(columns.len());
        for name in columns {
            taken.push(self.col(name)?.take(&take)?.into_column());
        }
        let data = if taken.is_empty() {
            DataFrame::empty()
        } else {
            DataFrame::new(taken)?
        };
        Frame::new(data, rows.clone())
    }

    /// Same data under a different row index of equal length.
    pub fn with_row_index(&self, row_index: RowIndex) -> Result<Frame> {
        Frame::new(self.data.clone(), row_index)
    }

    /// Build a new frame by transforming every column.
    ///
    /// `f` receives the column position, label and data. Returning a clone
    /// of the input column keeps it shared with this frame.
    pub fn map_columns<F>(&self, mut f: F) -> Result<Frame>
    where
        F: FnMut(usize, &str, &Series) -> Result<Series>,
    {
        if self.is_empty() {
            return Ok(self.derive(DataFrame::empty()));
        }
        let mut columns = Vec::with_capacity(self.width());
        for (index, column) in self.data.get_columns().iter().enumerate() {
            let series = column.as_materialized_series();
            let label = series.name().to_string();
            let mapped = f(index, &label, series)?;
            self.check_len(&label, &mapped)?;
            columns.push(named(mapped, &label).into_column());
        }
        Ok(self.derive(DataFrame::new(columns)?))
    }

    fn derive(&self, data: DataFrame) -> Frame {
        Frame {
            id: FrameId::fresh(),
            data,
            row_index: self.row_index.clone(),
        }
    }

    fn check_len(&self, name: &str, data: &Series) -> Result<()> {
        if data.len() != self.height() {
            return Err(WorldError::LengthMismatch {
                column: name.to_string(),
                expected: self.height(),
                actual: data.len(),
            });
        }
        Ok(())
    }
}

/// Content equality: same row sequence and equal columns (nulls equal).
///
/// Use [`Frame::identity`] for the O(1) identity check.
impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.row_index == other.row_index
            && self.column_names() == other.column_names()
            && self
                .data
                .get_columns()
                .iter()
                .zip(other.data.get_columns())
                .all(|(a, b)| {
                    a.as_materialized_series()
                        .equals_missing(b.as_materialized_series())
                })
    }
}

/// Give `series` the column name, leaving its buffer shared when the name
/// already matches. Renaming makes the series unique.
fn named(series: Series, name: &str) -> Series {
    if series.name().as_str() == name {
        series
    } else {
        series.with_name(name.into())
    }
}

/// Restrict a column aligned with `from` to the rows of `to`.
pub fn subset_series(series: &Series, from: &RowIndex, to: &RowIndex) -> Result<Series> {
    if series.len() != from.len() {
        return Err(WorldError::LengthMismatch {
            column: series.name().to_string(),
            expected: from.len(),
            actual: series.len(),
        });
    }
    let take = IdxCa::from_vec("take".into(), from.positions(to)?);
    Ok(series.take(&take)?)
}
