use thiserror::Error;

pub type SketchResult<T> = Result<T, SketchError>;

#[derive(Debug, Error)]
pub enum SketchError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("series `{0}` already exists in this session")]
    DuplicateSeries(String),

    #[error("no series is open; call begin_series first")]
    NoActiveSeries,

    #[error("series `{0}` is still open")]
    SeriesAlreadyOpen(String),

    #[error("columns not found for `{measurement}`: {missing:?}")]
    MissingColumns {
        measurement: String,
        missing: Vec<String>,
    },

    #[error("invalid grouping: {0}")]
    InvalidGrouping(String),

    #[error("input closed before a response was received")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
