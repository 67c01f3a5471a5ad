use std::collections::VecDeque;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::core::{parse_timestamp, timestamp_to_unix_seconds};
use crate::error::{SketchError, SketchResult};

/// Input event delivered by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PointerEvent {
    /// Click already in native coordinates: unix seconds and value.
    Native { x: f64, y: f64 },
    /// Click in canvas pixels; mapped through the canvas layout.
    Pixel { x: f64, y: f64 },
    /// The user stopped drawing the current series.
    EndOfInput,
}

/// Blocking source of pointer events for one series at a time.
pub trait ClickSource {
    fn next_event(&mut self) -> SketchResult<PointerEvent>;
}

/// Pre-recorded events; yields `EndOfInput` once exhausted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptedClicks {
    events: VecDeque<PointerEvent>,
}

impl ScriptedClicks {
    #[must_use]
    pub fn new(events: impl IntoIterator<Item = PointerEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push_back(event);
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl ClickSource for ScriptedClicks {
    fn next_event(&mut self) -> SketchResult<PointerEvent> {
        Ok(self.events.pop_front().unwrap_or(PointerEvent::EndOfInput))
    }
}

/// Parses a console click of the form `TIME VALUE`.
///
/// The value is the last whitespace-separated token, so the time may contain
/// spaces. Non-finite values are rejected.
#[must_use]
pub fn parse_click_line(line: &str, offset: FixedOffset) -> Option<PointerEvent> {
    let (time, value) = line.trim().rsplit_once(char::is_whitespace)?;
    let time = parse_timestamp(time, offset)?;
    let value = value.parse::<f64>().ok().filter(|value| value.is_finite())?;
    Some(PointerEvent::Native {
        x: timestamp_to_unix_seconds(time),
        y: value,
    })
}

/// One click of a drawing script, with a human-readable time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedClick {
    pub time: String,
    pub value: f64,
}

/// A named series drawn from a list of scripted clicks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesScript {
    pub name: String,
    pub clicks: Vec<ScriptedClick>,
}

impl SeriesScript {
    /// Parses a JSON array of series scripts.
    pub fn load_all(raw: &str) -> SketchResult<Vec<Self>> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Converts the clicks to native events; naive times use `offset`.
    pub fn to_clicks(&self, offset: FixedOffset) -> SketchResult<ScriptedClicks> {
        let events = self
            .clicks
            .iter()
            .map(|click| {
                let time = parse_timestamp(&click.time, offset).ok_or_else(|| {
                    SketchError::InvalidData(format!(
                        "series `{}`: `{}` is not a timestamp",
                        self.name, click.time
                    ))
                })?;
                Ok(PointerEvent::Native {
                    x: timestamp_to_unix_seconds(time),
                    y: click.value,
                })
            })
            .collect::<SketchResult<Vec<_>>>()?;
        Ok(ScriptedClicks::new(events))
    }
}
