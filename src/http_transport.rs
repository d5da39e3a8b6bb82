use reqwest::Client;
use serde::Serialize;
use tracing::debug;
use url::Url;

use codenames_core::{
    decode_json, EndTurnRequest, GuessRequest, NextGameRequest, RefreshRequest, Snapshot,
    END_TURN_PATH, GUESS_PATH, NEXT_GAME_PATH, REFRESH_PATH,
};

use crate::transport::{GameTransport, TransportError, TransportFuture};

/// JSON-over-HTTP transport; every call is a POST returning a snapshot.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        Ok(self.base.join(path)?)
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Snapshot, TransportError> {
        let url = self.endpoint(path)?;
        debug!(%url, "post");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(unreachable_server)?;
        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).trim().to_string(),
            });
        }
        Ok(decode_json(&bytes)?)
    }
}

/// A server that cannot be reached at all is reported apart from one that
/// answered badly.
fn unreachable_server(err: reqwest::Error) -> TransportError {
    if err.is_connect() || err.is_timeout() {
        TransportError::Unavailable(err.to_string())
    } else {
        TransportError::Request(err)
    }
}

impl GameTransport for HttpTransport {
    fn refresh(&self, request: RefreshRequest) -> TransportFuture<'_> {
        Box::pin(async move { self.post(REFRESH_PATH, &request).await })
    }

    fn guess(&self, request: GuessRequest) -> TransportFuture<'_> {
        Box::pin(async move { self.post(GUESS_PATH, &request).await })
    }

    fn end_turn(&self, request: EndTurnRequest) -> TransportFuture<'_> {
        Box::pin(async move { self.post(END_TURN_PATH, &request).await })
    }

    fn next_game(&self, request: NextGameRequest) -> TransportFuture<'_> {
        Box::pin(async move { self.post(NEXT_GAME_PATH, &request).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_keep_base_path() {
        let transport = HttpTransport::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            transport.endpoint(REFRESH_PATH).unwrap().as_str(),
            "http://localhost:8080/api/game-state"
        );
        let transport = HttpTransport::new("http://localhost:8080").unwrap();
        assert_eq!(
            transport.endpoint(NEXT_GAME_PATH).unwrap().as_str(),
            "http://localhost:8080/next-game"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(&format!("http://{addr}")).unwrap();
        let result = transport.refresh(RefreshRequest::new("lobby-7", None)).await;
        assert!(matches!(result, Err(TransportError::Unavailable(_))));
    }

    #[test]
    fn rejects_garbage_base() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(TransportError::Url(_))
        ));
    }
}
