use indexmap::IndexMap;
use tracing::debug;

use crate::core::Timestamp;
use crate::error::{SketchError, SketchResult};
use crate::table::CellValue;

/// Time-indexed table with one column per series and trailing constant columns.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    time_col: String,
    index: Vec<Timestamp>,
    columns: IndexMap<String, Vec<Option<CellValue>>>,
    constants: IndexMap<String, String>,
}

impl WideTable {
    #[must_use]
    pub fn new(time_col: impl Into<String>, index: Vec<Timestamp>) -> Self {
        Self {
            time_col: time_col.into(),
            index,
            columns: IndexMap::new(),
            constants: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn time_col(&self) -> &str {
        &self.time_col
    }

    #[must_use]
    pub fn index(&self) -> &[Timestamp] {
        &self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether `name` is already taken by the time column, a value column or a constant.
    #[must_use]
    pub fn is_name_taken(&self, name: &str) -> bool {
        name == self.time_col || self.columns.contains_key(name) || self.constants.contains_key(name)
    }

    pub fn insert_column(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<CellValue>>,
    ) -> SketchResult<()> {
        let name = name.into();
        if self.is_name_taken(&name) {
            return Err(SketchError::InvalidData(format!(
                "column `{name}` already exists"
            )));
        }
        if values.len() != self.index.len() {
            return Err(SketchError::InvalidData(format!(
                "column `{name}` has {} values for {} rows",
                values.len(),
                self.index.len()
            )));
        }
        debug!(column = %name, rows = values.len(), "insert wide column");
        self.columns.insert(name, values);
        Ok(())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<CellValue>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Adds a constant column broadcast to every row; re-setting a constant replaces its value.
    pub fn set_constant(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> SketchResult<()> {
        let name = name.into();
        if name == self.time_col || self.columns.contains_key(&name) {
            return Err(SketchError::InvalidData(format!(
                "constant `{name}` collides with an existing column"
            )));
        }
        self.constants.insert(name, value.into());
        Ok(())
    }

    #[must_use]
    pub fn constants(&self) -> &IndexMap<String, String> {
        &self.constants
    }

    /// Header row: time column, value columns in insertion order, then constants.
    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        std::iter::once(self.time_col.clone())
            .chain(self.columns.keys().cloned())
            .chain(self.constants.keys().cloned())
            .collect()
    }
}
