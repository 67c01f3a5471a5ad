use std::collections::HashSet;
use std::io::{Read, Write};

use chrono::FixedOffset;
use tracing::debug;

use crate::core::{format_timestamp, parse_timestamp};
use crate::error::{SketchError, SketchResult};
use crate::table::{CellValue, LongTable, WideTable, render_cell};

impl WideTable {
    /// Writes one header row and one row per timestamp.
    pub fn write_csv<W: Write>(&self, writer: W) -> SketchResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.headers())?;

        let columns: Vec<&[Option<CellValue>]> = self
            .column_names()
            .filter_map(|name| self.column(name))
            .collect();
        for (row, time) in self.index().iter().enumerate() {
            let mut record = Vec::with_capacity(1 + columns.len() + self.constants().len());
            record.push(format_timestamp(*time));
            record.extend(columns.iter().map(|values| render_cell(values[row].as_ref())));
            record.extend(self.constants().values().cloned());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        debug!(rows = self.len(), columns = columns.len(), "wrote wide csv");
        Ok(())
    }

    pub fn to_csv_string(&self) -> SketchResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|err| SketchError::InvalidData(format!("csv output is not utf-8: {err}")))
    }

    /// Reads a wide table from delimited text.
    ///
    /// The time column is `time_col` when given, otherwise the first column.
    /// Naive timestamps are interpreted in `offset`. Every other column becomes
    /// a value column; empty cells are missing.
    pub fn read_csv<R: Read>(
        reader: R,
        time_col: Option<&str>,
        offset: FixedOffset,
    ) -> SketchResult<Self> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();
        if headers.is_empty() {
            return Err(SketchError::InvalidData("csv has no header row".to_owned()));
        }

        let time_idx = match time_col {
            Some(name) => headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| SketchError::MissingColumns {
                    measurement: "time".to_owned(),
                    missing: vec![name.to_owned()],
                })?,
            None => 0,
        };

        let mut seen_times = HashSet::new();
        let mut index = Vec::new();
        let mut values: Vec<Vec<Option<CellValue>>> = vec![Vec::new(); headers.len()];
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let raw_time = record.get(time_idx).unwrap_or_default();
            let time = parse_timestamp(raw_time, offset).ok_or_else(|| {
                SketchError::InvalidData(format!(
                    "row {}: `{raw_time}` is not a timestamp",
                    row + 1
                ))
            })?;
            if !seen_times.insert(time) {
                return Err(SketchError::InvalidData(format!(
                    "row {}: duplicate timestamp `{raw_time}`",
                    row + 1
                )));
            }
            index.push(time);
            for (col, column_values) in values.iter_mut().enumerate() {
                if col != time_idx {
                    column_values.push(record.get(col).and_then(CellValue::parse));
                }
            }
        }

        let mut table = Self::new(headers[time_idx].clone(), index);
        for (col, (header, column_values)) in headers.into_iter().zip(values).enumerate() {
            if col != time_idx {
                table.insert_column(header, column_values)?;
            }
        }
        debug!(
            rows = table.len(),
            columns = table.column_count(),
            "read wide csv"
        );
        Ok(table)
    }
}

impl LongTable {
    pub fn write_csv<W: Write>(&self, writer: W) -> SketchResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.headers())?;

        for row in self.rows() {
            let mut record = Vec::with_capacity(2 + row.values.len() + self.constants().len());
            record.push(format_timestamp(row.time));
            record.push(row.group.clone());
            record.extend(row.values.iter().map(|cell| render_cell(cell.as_ref())));
            record.extend(self.constants().values().cloned());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        debug!(rows = self.len(), "wrote long csv");
        Ok(())
    }

    pub fn to_csv_string(&self) -> SketchResult<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|err| SketchError::InvalidData(format!("csv output is not utf-8: {err}")))
    }
}
