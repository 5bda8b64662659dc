use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlipError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Conversion error: {0}")]
    Convert(String),
}

impl From<zip::result::ZipError> for SlipError {
    fn from(err: zip::result::ZipError) -> Self {
        SlipError::Template(format!("bad document package: {}", err))
    }
}

impl From<quick_xml::Error> for SlipError {
    fn from(err: quick_xml::Error) -> Self {
        SlipError::Template(format!("bad document XML: {}", err))
    }
}

impl From<csv::Error> for SlipError {
    fn from(err: csv::Error) -> Self {
        SlipError::Fetch(format!("CSV: {}", err))
    }
}

impl From<reqwest::Error> for SlipError {
    fn from(err: reqwest::Error) -> Self {
        SlipError::Fetch(format!("HTTP: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for SlipError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        SlipError::Fetch(format!("could not sign service-account token: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, SlipError>;
