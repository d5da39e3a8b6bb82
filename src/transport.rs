use futures_util::future::LocalBoxFuture;
use thiserror::Error;

use codenames_core::{EndTurnRequest, GuessRequest, NextGameRequest, RefreshRequest, Snapshot};

pub type TransportFuture<'a> = LocalBoxFuture<'a, Result<Snapshot, TransportError>>;

/// The four calls the game server answers, each with a full snapshot.
pub trait GameTransport {
    fn refresh(&self, request: RefreshRequest) -> TransportFuture<'_>;
    fn guess(&self, request: GuessRequest) -> TransportFuture<'_>;
    fn end_turn(&self, request: EndTurnRequest) -> TransportFuture<'_>;
    fn next_game(&self, request: NextGameRequest) -> TransportFuture<'_>;
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid server url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed snapshot: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server unavailable: {0}")]
    Unavailable(String),
}
