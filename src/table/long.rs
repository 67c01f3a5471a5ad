use indexmap::IndexMap;

use crate::core::Timestamp;
use crate::table::CellValue;

/// One (timestamp, group id) row of a long table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub time: Timestamp,
    pub group: String,
    /// One slot per measurement, in `LongTable::measurements` order.
    pub values: Vec<Option<CellValue>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongTable {
    time_col: String,
    grouping_col: String,
    measurements: Vec<String>,
    rows: Vec<LongRow>,
    constants: IndexMap<String, String>,
}

impl LongTable {
    pub(crate) fn new(
        time_col: String,
        grouping_col: String,
        measurements: Vec<String>,
        rows: Vec<LongRow>,
        constants: IndexMap<String, String>,
    ) -> Self {
        Self {
            time_col,
            grouping_col,
            measurements,
            rows,
            constants,
        }
    }

    #[must_use]
    pub fn time_col(&self) -> &str {
        &self.time_col
    }

    #[must_use]
    pub fn grouping_col(&self) -> &str {
        &self.grouping_col
    }

    #[must_use]
    pub fn measurements(&self) -> &[String] {
        &self.measurements
    }

    #[must_use]
    pub fn rows(&self) -> &[LongRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn constants(&self) -> &IndexMap<String, String> {
        &self.constants
    }

    /// Values of `measurement` for rows whose group id is `group`, in row order.
    #[must_use]
    pub fn measurement_for_group(
        &self,
        group: &str,
        measurement: &str,
    ) -> Option<Vec<(Timestamp, Option<&CellValue>)>> {
        let slot = self.measurements.iter().position(|name| name == measurement)?;
        Some(
            self.rows
                .iter()
                .filter(|row| row.group == group)
                .map(|row| (row.time, row.values[slot].as_ref()))
                .collect(),
        )
    }

    #[must_use]
    pub fn headers(&self) -> Vec<String> {
        [self.time_col.clone(), self.grouping_col.clone()]
            .into_iter()
            .chain(self.measurements.iter().cloned())
            .chain(self.constants.keys().cloned())
            .collect()
    }
}
