//! Connector runtime.
//!
//! A [`Connector`] owns one configured client and turns operation
//! parameters into a single POST each. The free functions take a
//! configuration per call, mirroring how the operations are invoked by
//! name.

use crate::config::ConnectorConfig;
use crate::error::ConnectorError;
use crate::operation::Operation;
use serde_json::{json, Value};
use xdome_client::XdomeClient;
use xdome_core::{build_request, normalize_payload, BuildOptions, Params, Resource};

const HEALTH_ENDPOINT: &str = "/api/v1/alerts";

/// Configured connector instance.
#[derive(Debug)]
pub struct Connector {
    client: XdomeClient,
    options: BuildOptions,
}

impl Connector {
    /// Create a connector from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(config: &ConnectorConfig) -> Result<Self, ConnectorError> {
        let client = XdomeClient::new(config.client_config()).map_err(|e| logged(e.into()))?;
        Ok(Self {
            client,
            options: config.build_options(),
        })
    }

    /// Run `operation` with `params`.
    ///
    /// # Errors
    ///
    /// Returns error if the payload cannot be built or the request fails.
    pub async fn run(&self, operation: Operation, params: &Params) -> Result<Value, ConnectorError> {
        tracing::debug!(%operation, "Running operation");
        match operation.resource() {
            Some(resource) => self.query(resource, params).await,
            None => self.execute_generic(params).await,
        }
    }

    /// Query a resource with filter parameters.
    ///
    /// # Errors
    ///
    /// Returns error if the payload cannot be built or the request fails.
    pub async fn query(&self, resource: Resource, params: &Params) -> Result<Value, ConnectorError> {
        let request = build_request(params, resource, &self.options).map_err(|e| logged(e.into()))?;
        self.client
            .post(request.endpoint(), &request)
            .await
            .map_err(|e| logged(e.into()))
    }

    /// List alerts.
    ///
    /// # Errors
    ///
    /// See [`Connector::query`].
    pub async fn get_alerts(&self, params: &Params) -> Result<Value, ConnectorError> {
        self.query(Resource::Alerts, params).await
    }

    /// List devices.
    ///
    /// # Errors
    ///
    /// See [`Connector::query`].
    pub async fn get_devices(&self, params: &Params) -> Result<Value, ConnectorError> {
        self.query(Resource::Devices, params).await
    }

    /// List OT activity events.
    ///
    /// # Errors
    ///
    /// See [`Connector::query`].
    pub async fn get_ot_events(&self, params: &Params) -> Result<Value, ConnectorError> {
        self.query(Resource::OtEvents, params).await
    }

    /// List vulnerabilities.
    ///
    /// # Errors
    ///
    /// See [`Connector::query`].
    pub async fn get_vulnerabilities(&self, params: &Params) -> Result<Value, ConnectorError> {
        self.query(Resource::Vulnerabilities, params).await
    }

    /// POST `params.parameters` to `params.endpoint` without filter building.
    ///
    /// # Errors
    ///
    /// Returns error if `endpoint` is missing or the request fails.
    pub async fn execute_generic(&self, params: &Params) -> Result<Value, ConnectorError> {
        let params = normalize_payload(params);
        let endpoint = params
            .get("endpoint")
            .and_then(Value::as_str)
            .ok_or_else(|| logged(ConnectorError::message("Missing required parameter: endpoint")))?;
        let body = params.get("parameters").unwrap_or(&Value::Null);

        self.client
            .post(endpoint, body)
            .await
            .map_err(|e| logged(e.into()))
    }

    /// Probe the server with a one-alert query.
    ///
    /// Returns `false` when the server answers with an empty or falsy body.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn check_health(&self) -> Result<bool, ConnectorError> {
        let probe = json!({"limit": 1, "fields": ["id", "alert_name"]});
        let response = self
            .client
            .post(HEALTH_ENDPOINT, &probe)
            .await
            .map_err(|e| logged(e.into()))?;

        let available = is_truthy(&response);
        if available {
            tracing::info!(base_url = %self.client.base_url(), "xDome connector available");
        } else {
            tracing::warn!(base_url = %self.client.base_url(), "xDome returned an empty health response");
        }
        Ok(available)
    }
}

/// List alerts.
///
/// # Errors
///
/// Returns error if the client cannot be created or the query fails.
pub async fn get_alerts(config: &ConnectorConfig, params: &Params) -> Result<Value, ConnectorError> {
    Connector::new(config)?.get_alerts(params).await
}

/// List devices.
///
/// # Errors
///
/// Returns error if the client cannot be created or the query fails.
pub async fn get_devices(config: &ConnectorConfig, params: &Params) -> Result<Value, ConnectorError> {
    Connector::new(config)?.get_devices(params).await
}

/// List OT activity events.
///
/// # Errors
///
/// Returns error if the client cannot be created or the query fails.
pub async fn get_ot_events(
    config: &ConnectorConfig,
    params: &Params,
) -> Result<Value, ConnectorError> {
    Connector::new(config)?.get_ot_events(params).await
}

/// List vulnerabilities.
///
/// # Errors
///
/// Returns error if the client cannot be created or the query fails.
pub async fn get_vulnerabilities(
    config: &ConnectorConfig,
    params: &Params,
) -> Result<Value, ConnectorError> {
    Connector::new(config)?.get_vulnerabilities(params).await
}

/// Call an arbitrary endpoint.
///
/// # Errors
///
/// Returns error if `endpoint` is missing or the request fails.
pub async fn execute_generic_claroty_api(
    config: &ConnectorConfig,
    params: &Params,
) -> Result<Value, ConnectorError> {
    Connector::new(config)?.execute_generic(params).await
}

/// Check that the server is reachable with the configured credentials.
///
/// # Errors
///
/// Returns error if the client cannot be created or the probe fails.
pub async fn check_health(config: &ConnectorConfig) -> Result<bool, ConnectorError> {
    Connector::new(config)?.check_health().await
}

/// Run an operation by name.
///
/// # Errors
///
/// Returns error if the name is unknown or the operation fails.
pub async fn dispatch(
    config: &ConnectorConfig,
    name: &str,
    params: &Params,
) -> Result<Value, ConnectorError> {
    let operation: Operation = name.parse().map_err(logged)?;
    Connector::new(config)?.run(operation, params).await
}

fn logged(err: ConnectorError) -> ConnectorError {
    tracing::error!(error = %err, "Connector operation failed");
    err
}

/// JSON truthiness: null, false, zero, and empty values are falsy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
