#[cfg(feature = "python")]
use pyo3::exceptions::PyRuntimeError;
#[cfg(feature = "python")]
use pyo3::PyErr;
use thiserror::Error;

/// Fatal pipeline error. Row-level data-quality problems never surface here;
/// they are counted in [`crate::wear_log::DropStats`] instead.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("InvalidData: {0}")]
    InvalidData(String),

    #[error("Config: {0}")]
    Config(String),
}

impl From<toml::de::Error> for LoadError {
    fn from(err: toml::de::Error) -> Self {
        LoadError::Config(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<LoadError> for PyErr {
    fn from(err: LoadError) -> PyErr {
        PyRuntimeError::new_err(err.to_string())
    }
}
