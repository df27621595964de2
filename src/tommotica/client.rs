use crate::app_config::AppConfig;
use crate::tommotica::error::TransportError;
use reqwest::header::HeaderValue;
use reqwest::{Client, ClientBuilder, IntoUrl, RequestBuilder, Response, header};
use std::time::Duration;
use thiserror::Error;

const PUSH_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the upstream service, applies basic authentication to every request when a password is configured.
#[derive(Debug, Clone)]
pub struct TommoticaClient {
    client: Client,
    credentials: Option<Credentials>,
}

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

impl TommoticaClient {
    pub fn get(&self, url: impl IntoUrl) -> RequestBuilder {
        self.authenticate(self.client.get(url))
    }

    pub fn put(&self, url: impl IntoUrl) -> RequestBuilder {
        self.authenticate(self.client.put(url))
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => request.basic_auth(&credentials.username, Some(&credentials.password)),
            None => request,
        }
    }
}

/// Client for request/response calls, every request is bounded by the configured timeout.
pub fn new_client(config: &AppConfig) -> Result<TommoticaClient, TommoticaClientError> {
    let client = builder().timeout(config.tommotica().request_timeout()).build()?;
    Ok(with_credentials(client, config))
}

/// Client for the long-lived push session, only connecting is bounded.
pub fn new_push_client(config: &AppConfig) -> Result<TommoticaClient, TommoticaClientError> {
    let client = builder().connect_timeout(PUSH_CONNECT_TIMEOUT).build()?;
    Ok(with_credentials(client, config))
}

fn builder() -> ClientBuilder {
    let mut headers = header::HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"))));

    Client::builder().default_headers(headers)
}

fn with_credentials(client: Client, config: &AppConfig) -> TommoticaClient {
    let tommotica = config.tommotica();
    let credentials = tommotica.password().map(|password| Credentials {
        username: tommotica.username().to_string(),
        password: password.to_string(),
    });

    TommoticaClient { client, credentials }
}

/// Turns a non-success status into a transport error.
pub(crate) fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            url: response.url().to_string(),
            status,
        });
    }

    Ok(response)
}

#[derive(Error, Debug)]
pub enum TommoticaClientError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
}
