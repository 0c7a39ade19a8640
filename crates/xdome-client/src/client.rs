//! HTTP client for the xDome REST API.
//!
//! Issues one authenticated request per call and classifies the outcome:
//! classified API rejections (400, 401, 404) carry the server's own
//! description, transport failures map to fixed human-readable messages.

use super::server_url::{join_endpoint, normalize_base_url};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::error::Error as StdError;
use std::io::ErrorKind;
use std::time::Duration;

/// xDome HTTP client configuration.
#[derive(Debug, Clone)]
pub struct XdomeClientConfig {
    /// Server URL; scheme optional, trailing slashes tolerated
    pub server_url: String,
    /// API key sent as a bearer token
    pub api_key: String,
    /// Verify the server's TLS certificate
    pub verify_ssl: bool,
    /// Request timeout
    pub timeout: Duration,
    /// Deadline for the TCP connect and TLS handshake
    pub connect_timeout: Duration,
}

impl Default for XdomeClientConfig {
    fn default() -> Self {
        Self {
            server_url: "https://localhost".to_string(),
            api_key: String::new(),
            verify_ssl: true,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// A successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Parsed JSON body
    Json(Value),
    /// Unparsed response, returned for `DELETE`
    Raw {
        /// HTTP status code
        status: u16,
        /// Response text
        body: String,
    },
}

impl Reply {
    /// The JSON body, or the raw text as a JSON string.
    #[must_use]
    pub fn into_json(self) -> Value {
        match self {
            Reply::Json(value) => value,
            Reply::Raw { body, .. } => Value::String(body),
        }
    }
}

/// HTTP client for xDome API operations.
#[derive(Debug)]
pub struct XdomeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl XdomeClient {
    /// Create a new xDome client.
    ///
    /// # Errors
    ///
    /// Returns error if the server URL is invalid or the HTTP client cannot
    /// be created.
    pub fn new(config: XdomeClientConfig) -> Result<Self, ClientError> {
        let base_url = normalize_base_url(&config.server_url)
            .map_err(|e| ClientError::Init(e.to_string()))?;

        if !config.verify_ssl {
            tracing::warn!(%base_url, "TLS certificate verification disabled");
        }

        let client = Client::builder()
            .use_rustls_tls()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    /// Normalized server URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request with an optional JSON body.
    ///
    /// # Errors
    ///
    /// Returns error on transport failures, non-success statuses, or an
    /// unparseable success body.
    pub async fn send<B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Reply, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = join_endpoint(&self.base_url, endpoint);
        tracing::info!(%method, %url, "Executing request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| transport_error(&e))?;

        let reply = classify(&method, status, text)?;
        tracing::info!(%url, status = status.as_u16(), "Request succeeded");
        Ok(reply)
    }

    /// POST a JSON body and return the parsed response.
    ///
    /// # Errors
    ///
    /// See [`XdomeClient::send`].
    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, endpoint, Some(body))
            .await
            .map(Reply::into_json)
    }
}

/// Map a response status and body to a reply or an error.
fn classify(method: &Method, status: StatusCode, text: String) -> Result<Reply, ClientError> {
    let code = status.as_u16();

    if status.is_success() {
        if *method == Method::DELETE {
            return Ok(Reply::Raw {
                status: code,
                body: text,
            });
        }
        return serde_json::from_str(&text)
            .map(Reply::Json)
            .map_err(|e| ClientError::Parse(e.to_string()));
    }

    let parsed: Option<Value> = serde_json::from_str(&text).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|body| body.get(name))
            .and_then(description_text)
    };

    let description = match code {
        400 | 404 => field("message"),
        401 => field("error").or_else(|| field("message")),
        _ => {
            tracing::error!(status = code, body = %text, "Unexpected response status");
            return Err(ClientError::UnexpectedStatus {
                status: code,
                body: text,
            });
        }
    };

    let error_description = description.unwrap_or(text);
    tracing::error!(status = code, %error_description, "Request rejected by server");
    Err(ClientError::Api {
        status: code,
        error_description,
    })
}

/// Text of an error field; empty strings and nulls count as absent.
fn description_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn transport_error(err: &reqwest::Error) -> ClientError {
    let mapped = if is_certificate_error(err) {
        ClientError::Tls
    } else if err.is_timeout() {
        if err.is_connect() {
            ClientError::ConnectTimeout
        } else {
            ClientError::ReadTimeout
        }
    } else if err.is_connect() || is_dropped_connection(err) {
        ClientError::Connection
    } else {
        ClientError::Request(err.to_string())
    };
    tracing::error!(error = %err, "Transport failure");
    mapped
}

/// Whether any error in the source chain is a certificate failure.
fn is_certificate_error(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.to_string().to_lowercase().contains("certificate") {
            return true;
        }
        current = e.source();
    }
    false
}

/// Whether the peer closed or reset the connection mid-exchange.
fn is_dropped_connection(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(hyper_err) = e.downcast_ref::<hyper::Error>() {
            if hyper_err.is_incomplete_message() || hyper_err.is_closed() {
                return true;
            }
        }
        if let Some(io_err) = e.downcast_ref::<std::io::Error>() {
            if matches!(
                io_err.kind(),
                ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe
            ) {
                return true;
            }
        }
        current = e.source();
    }
    false
}

/// Errors that can occur with the xDome client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Client initialization failed
    #[error("client init error: {0}")]
    Init(String),
    /// Server rejected the request (400, 401, 404)
    #[error("{error_description}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Description reported by the server
        error_description: String,
    },
    /// Any other non-success status
    #[error("{body}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Raw response text
        body: String,
    },
    /// TLS handshake rejected the certificate
    #[error("SSL certificate validation failed")]
    Tls,
    /// Timed out while connecting
    #[error("The request timed out while trying to connect to the server")]
    ConnectTimeout,
    /// Timed out waiting for the response
    #[error("The server did not send any data in the allotted amount of time")]
    ReadTimeout,
    /// Connection could not be established
    #[error("Invalid endpoint or credentials")]
    Connection,
    /// Other request failure
    #[error("request error: {0}")]
    Request(String),
    /// Success body was not valid JSON
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// HTTP status code, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::UnexpectedStatus { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }
}
