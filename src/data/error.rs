use thiserror::Error;

/// Domain-level parse failures. File-level IO is reported through `anyhow`
/// by the loader, which wraps these with the offending path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("'{0}' is not a \"team (year)\" label")]
    LabelFormat(String),

    #[error("'{0}' is not a known year option")]
    UnknownYear(String),

    #[error("team name '{0}' is blank, equals the aggregate name or contains \" (\"")]
    TeamName(String),

    #[error("statistics table has no '{0}' row")]
    MissingIndexRow(&'static str),

    #[error("geometry: {0}")]
    Geometry(String),
}
