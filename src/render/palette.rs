use crate::render::Color;

/// Named series color taken from the cyclic session palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesColor {
    pub name: &'static str,
    pub color: Color,
}

pub const SERIES_PALETTE: [SeriesColor; 9] = [
    SeriesColor {
        name: "blue",
        color: Color::rgb(0.0, 0.0, 1.0),
    },
    SeriesColor {
        name: "green",
        color: Color::rgb(0.0, 0.502, 0.0),
    },
    SeriesColor {
        name: "cyan",
        color: Color::rgb(0.0, 1.0, 1.0),
    },
    SeriesColor {
        name: "purple",
        color: Color::rgb(0.502, 0.0, 0.502),
    },
    SeriesColor {
        name: "orange",
        color: Color::rgb(1.0, 0.647, 0.0),
    },
    SeriesColor {
        name: "brown",
        color: Color::rgb(0.647, 0.165, 0.165),
    },
    SeriesColor {
        name: "pink",
        color: Color::rgb(1.0, 0.753, 0.796),
    },
    SeriesColor {
        name: "gray",
        color: Color::rgb(0.502, 0.502, 0.502),
    },
    SeriesColor {
        name: "olive",
        color: Color::rgb(0.502, 0.502, 0.0),
    },
];

pub const GRID_LINE_COLOR: Color = Color::rgba(1.0, 0.0, 0.0, 0.6);

pub const LABEL_COLOR: Color = Color::rgb(0.1, 0.1, 0.1);

/// Color for the series with the given zero-based ordinal; wraps around the palette.
#[must_use]
pub fn series_color(ordinal: usize) -> SeriesColor {
    SERIES_PALETTE[ordinal % SERIES_PALETTE.len()]
}
