use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;

use crate::FetchError;

/// Performs one GET and yields the body. No retries.
pub trait Fetch: Send + Sync + 'static {
    fn get(&self, url: &str) -> impl Future<Output = Result<Bytes, FetchError>> + Send;
}

/// [`Fetch`] over HTTP(S)
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Timeouts are left to the client, [`None`] keeps reqwest's default of no deadline
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<Bytes, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?)
    }
}

#[derive(Debug, Clone)]
enum Response {
    Payload(Bytes),
    Status(u16),
    Unreachable,
}

#[derive(Debug, Clone)]
struct Route {
    latency: Duration,
    response: Response,
}

/// [`Fetch`] serving preloaded payloads from memory after a per-url latency.
///
/// Unknown urls answer 404. Every request is recorded, see [`MemoryFetcher::requests`].
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    routes: HashMap<String, Route>,
    requests: Mutex<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(
        mut self,
        url: impl Into<String>,
        payload: impl Into<Bytes>,
        latency: Duration,
    ) -> Self {
        self.routes.insert(
            url.into(),
            Route {
                latency,
                response: Response::Payload(payload.into()),
            },
        );
        self
    }

    pub fn with_status(mut self, url: impl Into<String>, status: u16, latency: Duration) -> Self {
        self.routes.insert(
            url.into(),
            Route {
                latency,
                response: Response::Status(status),
            },
        );
        self
    }

    /// Requests to `url` fail at the transport level
    pub fn with_unreachable(mut self, url: impl Into<String>, latency: Duration) -> Self {
        self.routes.insert(
            url.into(),
            Route {
                latency,
                response: Response::Unreachable,
            },
        );
        self
    }

    /// Every url requested so far, in request order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Fetch for MemoryFetcher {
    async fn get(&self, url: &str) -> Result<Bytes, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
        let route = self.routes.get(url).cloned();
        let Some(route) = route else {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            });
        };
        tokio::time::sleep(route.latency).await;
        match route.response {
            Response::Payload(bytes) => Ok(bytes),
            Response::Status(status) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Response::Unreachable => Err(FetchError::Transport {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            }),
        }
    }
}
