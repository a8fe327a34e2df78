use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("implausible dimensions: {0}")]
    ImplausibleDimensions(String),
    #[error("unknown fitting kind '{0}'")]
    UnknownKind(String),
    #[error("part '{0}' not found")]
    PartNotFound(String),
    #[error("table misses columns required for {kind}: {}", columns.join(", "))]
    MissingColumns { kind: String, columns: Vec<String> },
    #[error("key column '{0}' is not in the table header")]
    MissingKeyColumn(String),
    #[error("not unique key '{key}' in column {column}")]
    DuplicateKey { key: String, column: String },
    #[error("row has no value in column '{0}'")]
    MissingValue(String),
    #[error("column '{column}': {source}")]
    InvalidValue {
        column: String,
        #[source]
        source: ose_piping_base::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Shapeops(#[from] ose_piping_shapeops::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
