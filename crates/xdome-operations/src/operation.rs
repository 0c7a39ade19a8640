//! Named connector operations.

use crate::error::ConnectorError;
use std::fmt;
use std::str::FromStr;
use xdome_core::Resource;

/// An operation the connector can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// List alerts
    GetAlerts,
    /// List devices
    GetDevices,
    /// List OT activity events
    GetOtEvents,
    /// List vulnerabilities
    GetVulnerabilities,
    /// POST an arbitrary body to an arbitrary endpoint
    ExecuteGenericApi,
}

impl Operation {
    /// All operations, in a stable order.
    pub const ALL: [Operation; 5] = [
        Operation::GetAlerts,
        Operation::GetDevices,
        Operation::GetOtEvents,
        Operation::GetVulnerabilities,
        Operation::ExecuteGenericApi,
    ];

    /// Name the operation is invoked by.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Operation::GetAlerts => "get_alerts",
            Operation::GetDevices => "get_devices",
            Operation::GetOtEvents => "get_ot_events",
            Operation::GetVulnerabilities => "get_vulnerabilities",
            Operation::ExecuteGenericApi => "execute_generic_claroty_api",
        }
    }

    /// Resource queried, or `None` for the generic call.
    #[must_use]
    pub fn resource(&self) -> Option<Resource> {
        match self {
            Operation::GetAlerts => Some(Resource::Alerts),
            Operation::GetDevices => Some(Resource::Devices),
            Operation::GetOtEvents => Some(Resource::OtEvents),
            Operation::GetVulnerabilities => Some(Resource::Vulnerabilities),
            Operation::ExecuteGenericApi => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = ConnectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| ConnectorError::message(format!("Unsupported operation: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
    }

    #[test]
    fn generic_call_has_no_resource() {
        assert_eq!(Operation::ExecuteGenericApi.resource(), None);
        assert_eq!(Operation::GetOtEvents.resource(), Some(Resource::OtEvents));
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "get_sites".parse::<Operation>().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported operation: get_sites");
    }
}
