//! Error types for Expofloor Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Stall {0} is not available for booking")]
    StallUnavailable(String),

    #[error("Stall {0} is already selected")]
    AlreadySelected(String),

    #[error("Stall {0} is not in the current selection")]
    NotSelected(String),

    #[error("No stalls selected")]
    EmptySelection,

    #[error("No such discount option: {0}")]
    UnknownDiscount(usize),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
