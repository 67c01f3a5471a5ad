//! Wide-to-long reshaping.
//!
//! Each measurement group unpivots a set of wide columns into one value column,
//! renaming the source column to a group id. The melted sets are then full
//! outer joined on (time, group id) in group order and sorted by time.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Timestamp;
use crate::error::{SketchError, SketchResult};
use crate::table::{CellValue, LongRow, LongTable, WideTable};

/// One logical measurement spread over several wide columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementGroup {
    /// Destination value column in the long table.
    pub value_column: String,
    /// Wide columns holding instances of this measurement.
    pub columns: Vec<String>,
    /// Group id per wide column. Columns without an entry keep their own name.
    #[serde(default)]
    pub mapping: IndexMap<String, String>,
}

impl MeasurementGroup {
    #[must_use]
    pub fn new(value_column: impl Into<String>) -> Self {
        Self {
            value_column: value_column.into(),
            columns: Vec::new(),
            mapping: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>, group_id: impl Into<String>) -> Self {
        let column = column.into();
        self.mapping.insert(column.clone(), group_id.into());
        self.columns.push(column);
        self
    }

    #[must_use]
    pub fn group_id<'a>(&'a self, column: &'a str) -> &'a str {
        self.mapping.get(column).map_or(column, String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSpec {
    pub measurements: Vec<MeasurementGroup>,
}

impl GroupingSpec {
    #[must_use]
    pub fn new(measurements: Vec<MeasurementGroup>) -> Self {
        Self { measurements }
    }

    /// Checks the grouping against `wide` without reshaping anything.
    pub fn validate(&self, wide: &WideTable, time_col: &str, grouping_col: &str) -> SketchResult<()> {
        if wide.time_col() != time_col {
            return Err(SketchError::MissingColumns {
                measurement: "time".to_owned(),
                missing: vec![time_col.to_owned()],
            });
        }
        if grouping_col.trim().is_empty() {
            return Err(SketchError::InvalidGrouping(
                "grouping column name must not be empty".to_owned(),
            ));
        }
        if grouping_col == time_col {
            return Err(SketchError::InvalidGrouping(format!(
                "grouping column `{grouping_col}` collides with the time column"
            )));
        }
        if self.measurements.is_empty() {
            return Err(SketchError::InvalidGrouping(
                "at least one measurement group is required".to_owned(),
            ));
        }

        let mut destinations = HashSet::new();
        for group in &self.measurements {
            let name = group.value_column.as_str();
            if name.trim().is_empty() {
                return Err(SketchError::InvalidGrouping(
                    "measurement name must not be empty".to_owned(),
                ));
            }
            if name == time_col || name == grouping_col {
                return Err(SketchError::InvalidGrouping(format!(
                    "measurement `{name}` collides with the time or grouping column"
                )));
            }
            if wide.constants().contains_key(name) {
                return Err(SketchError::InvalidGrouping(format!(
                    "measurement `{name}` collides with a constant column"
                )));
            }
            if !destinations.insert(name) {
                return Err(SketchError::InvalidGrouping(format!(
                    "measurement `{name}` is listed twice"
                )));
            }
            if group.columns.is_empty() {
                return Err(SketchError::InvalidGrouping(format!(
                    "measurement `{name}` has no columns"
                )));
            }

            let missing: Vec<String> = group
                .columns
                .iter()
                .filter(|column| wide.column(column).is_none())
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(SketchError::MissingColumns {
                    measurement: name.to_owned(),
                    missing,
                });
            }

            let mut group_ids = HashSet::new();
            for column in &group.columns {
                if !group_ids.insert(group.group_id(column)) {
                    return Err(SketchError::InvalidGrouping(format!(
                        "measurement `{name}` maps more than one column to {grouping_col} `{}`",
                        group.group_id(column)
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Unpivots `wide` into a long table keyed by (`time_col`, `grouping_col`).
///
/// The spec is validated first; nothing is reshaped if any named column is
/// missing. Rows of the result are the full outer join of every melted set:
/// keys first seen in a later group are appended after earlier ones, and a
/// combination absent from a group leaves that measurement empty. The final
/// sort by time is stable. Constants of `wide` are carried over.
pub fn reshape(
    wide: &WideTable,
    time_col: &str,
    grouping_col: &str,
    spec: &GroupingSpec,
) -> SketchResult<LongTable> {
    spec.validate(wide, time_col, grouping_col)?;

    let width = spec.measurements.len();
    let mut merged: IndexMap<(Timestamp, String), Vec<Option<CellValue>>> = IndexMap::new();
    for (slot, group) in spec.measurements.iter().enumerate() {
        let melted = melt(wide, group);
        debug!(
            measurement = %group.value_column,
            columns = group.columns.len(),
            rows = melted.len(),
            "melted measurement group"
        );
        for (key, value) in melted {
            merged.entry(key).or_insert_with(|| vec![None; width])[slot] = value;
        }
    }

    let mut rows: Vec<LongRow> = merged
        .into_iter()
        .map(|((time, group), values)| LongRow {
            time,
            group,
            values,
        })
        .collect();
    rows.sort_by_key(|row| row.time);
    debug!(rows = rows.len(), measurements = width, "reshaped to long format");

    Ok(LongTable::new(
        time_col.to_owned(),
        grouping_col.to_owned(),
        spec.measurements
            .iter()
            .map(|group| group.value_column.clone())
            .collect(),
        rows,
        wide.constants().clone(),
    ))
}

/// Column-major melt of one group, with source column names replaced by group ids.
fn melt(
    wide: &WideTable,
    group: &MeasurementGroup,
) -> Vec<((Timestamp, String), Option<CellValue>)> {
    let mut melted = Vec::with_capacity(group.columns.len() * wide.len());
    for column in &group.columns {
        let Some(values) = wide.column(column) else {
            continue;
        };
        let group_id = group.group_id(column);
        melted.extend(
            wide.index()
                .iter()
                .zip(values)
                .map(|(time, value)| ((*time, group_id.to_owned()), value.clone())),
        );
    }
    melted
}

/// English ordinal for a positive count: 1st, 2nd, 3rd, 4th, 11th, 21st.
#[must_use]
pub fn ordinal(n: usize) -> String {
    let suffix = if (10..=20).contains(&(n % 100)) {
        "th"
    } else {
        match n % 10 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        }
    };
    format!("{n}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::ordinal;

    #[test]
    fn ordinals_follow_english_suffix_rules() {
        let rendered: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101, 111]
            .into_iter()
            .map(ordinal)
            .collect();
        assert_eq!(
            rendered,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st", "111th"]
        );
    }
}
