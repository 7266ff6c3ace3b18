use std::sync::Arc;

use tokio::sync::{
    broadcast,
    mpsc::error::{SendError, TrySendError},
};

use crate::TabId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Couldn't send the message: {0}")]
    SendError(String),

    #[error("The message channel has reached its capacity.")]
    ChannelIsFull,

    #[error("The peer endpoint has closed its channel.")]
    ChannelClosed,

    #[error("Component task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Host has already started.")]
    HostAlreadyStarted,

    #[error("Host must be started first.")]
    HostNotStarted,

    #[error("A page is already open for tab {0}.")]
    PageAlreadyOpen(TabId),

    #[error("Couldn't encode or decode a message: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Invalid scene description: {0}")]
    InvalidScene(String),

    #[error("Error external to scenescope occurred: {0}")]
    External(Arc<str>),
}

impl<T> From<SendError<T>> for Error {
    fn from(e: SendError<T>) -> Self {
        Error::SendError(e.to_string())
    }
}

impl<T> From<TrySendError<T>> for Error {
    fn from(e: TrySendError<T>) -> Self {
        match e {
            TrySendError::Full(_) => Error::ChannelIsFull,
            TrySendError::Closed(_) => Error::ChannelClosed,
        }
    }
}

impl<T> From<broadcast::error::SendError<T>> for Error {
    fn from(_: broadcast::error::SendError<T>) -> Self {
        Error::ChannelClosed
    }
}
