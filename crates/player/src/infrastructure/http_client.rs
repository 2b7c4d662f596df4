//! HTTP adapter for the remote game service

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

use lastplanner_domain::{GameState, GameStatePatch, SessionId, UserId};
use lastplanner_shared::{routes, ErrorResponse, SaveGameRequest, UserProfile, USER_ID_HEADER};

use crate::ports::outbound::{GameServicePort, SyncError};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// reqwest-backed client for the engine's REST API.
#[derive(Clone)]
pub struct HttpGameService {
    client: Client,
    base_url: Url,
    user_id: Option<UserId>,
}

impl HttpGameService {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url,
            user_id: None,
        }
    }

    /// Forward this account id in the identity header on every request.
    pub fn with_user_id(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Build an endpoint URL from a route path plus extra (escaped) segments.
    fn endpoint(&self, route: &str, extra: &[&str]) -> Result<Url, SyncError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SyncError::Validation(format!("Unusable API URL: {}", self.base_url)))?;
            segments.pop_if_empty();
            segments.extend(route.split('/').filter(|s| !s.is_empty()));
            segments.extend(extra);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.user_id {
            Some(user_id) => builder.header(USER_ID_HEADER, user_id.as_str()),
            None => builder,
        }
    }

    /// Send and map transport failures and error statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<Response, SyncError> {
        let response = builder
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => Err(SyncError::NotFound),
            StatusCode::UNAUTHORIZED => Err(SyncError::NotAuthenticated),
            _ => {
                let message = match response.json::<ErrorResponse>().await {
                    Ok(body) => body.message,
                    Err(_) => status.canonical_reason().unwrap_or("Unknown error").to_string(),
                };
                Err(SyncError::Server {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SyncError> {
        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                SyncError::Network(e.to_string())
            } else {
                SyncError::Validation(e.to_string())
            }
        })
    }

    async fn decode_state(response: Response) -> Result<GameState, SyncError> {
        let state: GameState = Self::decode(response).await?;
        state
            .validate()
            .map_err(|e| SyncError::Validation(e.to_string()))?;
        Ok(state)
    }
}

#[async_trait]
impl GameServicePort for HttpGameService {
    async fn load(&self, session_id: &SessionId) -> Result<GameState, SyncError> {
        let url = self.endpoint(routes::GAME, &[session_id.as_str()])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::decode_state(response).await
    }

    async fn save(&self, request: &SaveGameRequest) -> Result<GameState, SyncError> {
        let url = self.endpoint(routes::GAME, &[])?;
        let response = self
            .send(self.request(Method::POST, url).json(request))
            .await?;
        Self::decode_state(response).await
    }

    async fn update(
        &self,
        session_id: &SessionId,
        patch: &GameStatePatch,
    ) -> Result<GameState, SyncError> {
        let url = self.endpoint(routes::GAME, &[session_id.as_str()])?;
        let response = self
            .send(self.request(Method::PATCH, url).json(patch))
            .await?;
        Self::decode_state(response).await
    }

    async fn reset(&self, session_id: &SessionId) -> Result<(), SyncError> {
        let url = self.endpoint(routes::GAME, &[session_id.as_str()])?;
        match self.send(self.request(Method::DELETE, url)).await {
            Ok(_) | Err(SyncError::NotFound) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn profile(&self) -> Result<UserProfile, SyncError> {
        let url = self.endpoint(routes::USER, &[])?;
        let response = self.send(self.request(Method::GET, url)).await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(base: &str) -> HttpGameService {
        HttpGameService::new(Url::parse(base).expect("url"), Duration::from_millis(500))
    }

    #[test]
    fn endpoints_append_to_the_base_path() {
        let root = service("http://localhost:3000");
        assert_eq!(
            root.endpoint(routes::GAME, &["abc"]).expect("url").as_str(),
            "http://localhost:3000/api/game/abc"
        );

        let prefixed = service("https://example.test/lastplanner/");
        assert_eq!(
            prefixed.endpoint(routes::USER, &[]).expect("url").as_str(),
            "https://example.test/lastplanner/api/user"
        );
    }

    #[test]
    fn session_ids_are_escaped_as_one_segment() {
        let url = service("http://localhost:3000")
            .endpoint(routes::GAME, &["a/b c"])
            .expect("url");
        assert_eq!(url.path(), "/api/game/a%2Fb%20c");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_network_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("addr").port()
        };
        let result = service(&format!("http://127.0.0.1:{port}"))
            .load(&SessionId::new("s").expect("id"))
            .await;
        assert!(matches!(result, Err(SyncError::Network(_))));
    }
}
