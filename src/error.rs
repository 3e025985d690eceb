use std::convert::Infallible;

use thiserror::Error;

use crate::host::HostError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Invalid permission level: {0}")]
    InvalidPermission(String),

    #[error("host rejected `{name}`: {source}")]
    Host {
        name: String,
        #[source]
        source: HostError,
    },

    #[error("commands have already been registered with the host")]
    AlreadyRegistered,
}

impl From<Infallible> for CommandError {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
