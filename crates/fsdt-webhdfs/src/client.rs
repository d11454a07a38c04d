//! WebHDFS HTTP client implementation.

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};

use fsdt_core::error::{Error, ProtocolError, TransportError};

use crate::endpoints::{PATH_PREFIX, RemoteExceptionResponse};

/// Map a reqwest error onto the shared transport error.
pub(crate) fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// HTTP client for WebHDFS root operations.
#[derive(Debug, Clone)]
pub struct WebHdfsClient {
    client: reqwest::Client,
    endpoint: String,
}

impl WebHdfsClient {
    /// Create a client for the namenode at `base` (e.g. `http://nn:9870`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base: &str) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fsdt/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(transport_error)?;

        Ok(Self {
            client,
            endpoint: format!("{}{}/", base.trim_end_matches('/'), PATH_PREFIX),
        })
    }

    /// Returns the root operation URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Run a GET operation and parse its JSON body.
    #[instrument(skip(self, params), fields(endpoint = %self.endpoint))]
    pub async fn get<Q, R>(&self, op: &str, params: &Q) -> Result<R, Error>
    where
        Q: Serialize,
        R: DeserializeOwned,
    {
        debug!(op, "WebHDFS GET");

        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        self.handle_response(response).await
    }

    /// Run a PUT operation whose response body is ignored.
    #[instrument(skip(self, params), fields(endpoint = %self.endpoint))]
    pub async fn put_no_response<Q>(&self, op: &str, params: &Q) -> Result<(), Error>
    where
        Q: Serialize,
    {
        debug!(op, "WebHDFS PUT");

        let response = self
            .client
            .put(&self.endpoint)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        trace!(status = %status, "WebHDFS response");
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Protocol(Self::parse_error_response(response).await))
        }
    }

    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<R, Error> {
        let status = response.status();
        trace!(status = %status, "WebHDFS response");

        if status.is_success() {
            response.json::<R>().await.map_err(transport_error)
        } else {
            Err(Error::Protocol(Self::parse_error_response(response).await))
        }
    }

    async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
        let status = response.status().as_u16();

        match response.json::<RemoteExceptionResponse>().await {
            Ok(body) => ProtocolError::new(
                status,
                body.remote_exception.exception,
                body.remote_exception.message,
            ),
            Err(_) => ProtocolError::new(status, None, None),
        }
    }
}
