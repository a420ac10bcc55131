use std::result;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown option `{0}`, the only recognized option is `show_vars`")]
    UnknownOption(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = result::Result<T, Error>;

// Configuration parsing reports through eyre; keep the whole chain in the message.
impl From<eyre::Report> for Error {
    fn from(err: eyre::Report) -> Self {
        Error::Config(format!("{err:#}"))
    }
}
