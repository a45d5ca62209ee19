//! Error types for workspace provisioning.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] armory_config::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
