pub mod primitives;
pub mod scale;
pub mod time_grid;
pub mod types;

pub use primitives::{
    delta_minutes, format_timestamp, parse_offset, parse_period, parse_timestamp,
    timestamp_to_unix_seconds, unix_seconds_to_timestamp,
};
pub use scale::{LinearScale, ScaleAxis};
pub use time_grid::{MAX_GRID_POINTS, TimeGrid};
pub use types::{GridPoint, Timestamp, ValueRange, Viewport};
