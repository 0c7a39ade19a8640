//! # xDome Operations
//!
//! The connector surface: configuration, the named operations, and the
//! health check.
//!
//! ## Operations
//!
//! | Name | Endpoint |
//! |------|----------|
//! | `get_alerts` | `/api/v1/alerts` |
//! | `get_devices` | `/api/v1/devices` |
//! | `get_ot_events` | `/api/v1/ot_activity_events` |
//! | `get_vulnerabilities` | `/api/v1/vulnerabilities` |
//! | `execute_generic_claroty_api` | `params.endpoint` |
//!
//! Every failure is reported as a [`ConnectorError`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connector;
pub mod error;
pub mod operation;

pub use config::{ConfigError, ConnectorConfig};
pub use connector::{
    check_health, dispatch, execute_generic_claroty_api, get_alerts, get_devices, get_ot_events,
    get_vulnerabilities, Connector,
};
pub use error::{ConnectorError, ErrorDetail};
pub use operation::Operation;
