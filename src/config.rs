//! Session configuration: raw scalar settings resolved into a validated grid.
//!
//! Settings arrive as text from flags, a JSON file or prompts. Resolution is
//! all-or-nothing: any malformed or inconsistent value fails before a capture
//! session can be created.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::core::{TimeGrid, ValueRange, parse_offset, parse_period, parse_timestamp};
use crate::error::{SketchError, SketchResult};

/// One user-facing session setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingField {
    Start,
    End,
    Timezone,
    Period,
    YMin,
    YMax,
    TimeCol,
    Constants,
}

impl SettingField {
    pub const ALL: [Self; 8] = [
        Self::Start,
        Self::End,
        Self::Timezone,
        Self::Period,
        Self::YMin,
        Self::YMax,
        Self::TimeCol,
        Self::Constants,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Timezone => "timezone",
            Self::Period => "period",
            Self::YMin => "y_min",
            Self::YMax => "y_max",
            Self::TimeCol => "time_col",
            Self::Constants => "constants",
        }
    }

    #[must_use]
    pub fn default_value(self) -> &'static str {
        match self {
            Self::Start => "2023-01-01",
            Self::End => "2023-01-02",
            Self::Timezone => "UTC",
            Self::Period => "5min",
            Self::YMin => "0",
            Self::YMax => "100",
            Self::TimeCol => "timestamp",
            Self::Constants => "",
        }
    }

    #[must_use]
    pub fn prompt(self) -> &'static str {
        match self {
            Self::Start => "Enter Start Time (Default 2023-01-01 00:00:00): ",
            Self::End => "Enter End Time (Default 2023-01-02 00:00:00): ",
            Self::Timezone => "Enter Timezone [UTC or +HH:MM] (Default UTC): ",
            Self::Period => "Enter Period [e.g. 30s, 5min, 1h] (Default 5min): ",
            Self::YMin => "Enter Minimum y Value (Default 0): ",
            Self::YMax => "Enter Maximum y Value (Default 100): ",
            Self::TimeCol => "Enter Name of Time Column (Default 'timestamp'): ",
            Self::Constants => "Enter Constant Values [e.g. id=1, version=3] (Default None): ",
        }
    }
}

/// Raw, possibly incomplete session settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    pub start: Option<String>,
    pub end: Option<String>,
    pub timezone: Option<String>,
    pub period: Option<String>,
    #[serde(deserialize_with = "scalar_as_text")]
    pub y_min: Option<String>,
    #[serde(deserialize_with = "scalar_as_text")]
    pub y_max: Option<String>,
    pub time_col: Option<String>,
    pub constants: Option<String>,
}

impl SessionSettings {
    pub fn from_json(raw: &str) -> SketchResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    #[must_use]
    pub fn get(&self, field: SettingField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    pub fn set(&mut self, field: SettingField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// Fields still unset, in prompting order.
    #[must_use]
    pub fn missing(&self) -> Vec<SettingField> {
        SettingField::ALL
            .into_iter()
            .filter(|field| self.slot(*field).is_none())
            .collect()
    }

    /// Keeps every value already set and takes the rest from `fallback`.
    #[must_use]
    pub fn or(mut self, fallback: Self) -> Self {
        for field in SettingField::ALL {
            if self.slot(field).is_none() {
                *self.slot_mut(field) = fallback.slot(field).clone();
            }
        }
        self
    }

    /// Validates every setting, falling back to defaults for unset ones.
    pub fn resolve(&self) -> SketchResult<SessionConfig> {
        let value = |field: SettingField| self.get(field).unwrap_or(field.default_value());

        let offset = parse_offset(value(SettingField::Timezone)).ok_or_else(|| {
            invalid(
                SettingField::Timezone,
                value(SettingField::Timezone),
                "use UTC or a fixed offset such as +02:00",
            )
        })?;
        let start = parse_timestamp(value(SettingField::Start), offset).ok_or_else(|| {
            invalid(
                SettingField::Start,
                value(SettingField::Start),
                "expected a date or datetime",
            )
        })?;
        let end = parse_timestamp(value(SettingField::End), offset).ok_or_else(|| {
            invalid(
                SettingField::End,
                value(SettingField::End),
                "expected a date or datetime",
            )
        })?;
        let period = parse_period(value(SettingField::Period)).ok_or_else(|| {
            invalid(
                SettingField::Period,
                value(SettingField::Period),
                "expected a duration such as 5min",
            )
        })?;
        let y_min = parse_number(SettingField::YMin, value(SettingField::YMin))?;
        let y_max = parse_number(SettingField::YMax, value(SettingField::YMax))?;
        let time_col = value(SettingField::TimeCol).trim().to_owned();
        if time_col.is_empty() {
            return Err(invalid(
                SettingField::TimeCol,
                "",
                "time column name must not be empty",
            ));
        }
        let constants = parse_constants(value(SettingField::Constants))?;
        if constants.contains_key(&time_col) {
            return Err(invalid(
                SettingField::Constants,
                &time_col,
                "constant collides with the time column",
            ));
        }

        let value_range = ValueRange::new(y_min, y_max)?;
        let grid = TimeGrid::new(start, end, period)?;
        debug!(
            %start,
            %end,
            cardinality = grid.len(),
            constants = constants.len(),
            "resolved session config"
        );

        Ok(SessionConfig {
            grid,
            value_range,
            time_col,
            constants,
        })
    }

    fn slot(&self, field: SettingField) -> &Option<String> {
        match field {
            SettingField::Start => &self.start,
            SettingField::End => &self.end,
            SettingField::Timezone => &self.timezone,
            SettingField::Period => &self.period,
            SettingField::YMin => &self.y_min,
            SettingField::YMax => &self.y_max,
            SettingField::TimeCol => &self.time_col,
            SettingField::Constants => &self.constants,
        }
    }

    fn slot_mut(&mut self, field: SettingField) -> &mut Option<String> {
        match field {
            SettingField::Start => &mut self.start,
            SettingField::End => &mut self.end,
            SettingField::Timezone => &mut self.timezone,
            SettingField::Period => &mut self.period,
            SettingField::YMin => &mut self.y_min,
            SettingField::YMax => &mut self.y_max,
            SettingField::TimeCol => &mut self.time_col,
            SettingField::Constants => &mut self.constants,
        }
    }
}

/// Fully validated, immutable session configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub grid: TimeGrid,
    pub value_range: ValueRange,
    pub time_col: String,
    pub constants: IndexMap<String, String>,
}

/// Parses `name=value` pairs separated by commas. Blank input means no constants.
pub fn parse_constants(raw: &str) -> SketchResult<IndexMap<String, String>> {
    let mut constants = IndexMap::new();
    for pair in raw.split(',').map(str::trim).filter(|pair| !pair.is_empty()) {
        let (name, value) = pair.split_once('=').ok_or_else(|| {
            invalid(SettingField::Constants, pair, "expected name=value")
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid(
                SettingField::Constants,
                pair,
                "constant name must not be empty",
            ));
        }
        if constants
            .insert(name.to_owned(), value.trim().to_owned())
            .is_some()
        {
            return Err(invalid(
                SettingField::Constants,
                name,
                "constant is defined twice",
            ));
        }
    }
    Ok(constants)
}

fn parse_number(field: SettingField, raw: &str) -> SketchResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| invalid(field, raw, "expected a number"))
}

fn invalid(field: SettingField, raw: &str, reason: &str) -> SketchError {
    SketchError::InvalidConfig(format!("{} `{raw}`: {reason}", field.key()))
}

fn scalar_as_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Number(f64),
        Text(String),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|scalar| match scalar {
        Scalar::Number(number) => number.to_string(),
        Scalar::Text(text) => text,
    }))
}
