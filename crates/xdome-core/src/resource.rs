//! Queryable xDome resources.
//!
//! Each resource has a fixed endpoint and a fixed, ordered checklist of
//! fields that are folded into `in` filter operands when present.

use serde::{Deserialize, Serialize};
use std::fmt;

const ALERT_FIELDS: &[&str] = &["id", "category"];

const DEVICE_FIELDS: &[&str] = &[
    "device_type",
    "mac_oui_list",
    "model",
    "software_or_firmware_version",
    "purdue_level",
    "known_vulnerabilities",
    "risk_score",
];

const OT_EVENT_FIELDS: &[&str] = &["event_id", "event_type", "dest_asset_id", "source_asset_id"];

const VULNERABILITY_FIELDS: &[&str] = &["id", "name", "vulnerability_type", "cve_ids"];

/// A resource collection exposed by the xDome API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Security alerts
    Alerts,
    /// Managed devices
    Devices,
    /// OT activity events
    OtEvents,
    /// Known vulnerabilities
    Vulnerabilities,
}

impl Resource {
    /// All resources, in a stable order.
    pub const ALL: [Resource; 4] = [
        Resource::Alerts,
        Resource::Devices,
        Resource::OtEvents,
        Resource::Vulnerabilities,
    ];

    /// API path queried for this resource.
    #[must_use]
    pub fn endpoint(&self) -> &'static str {
        match self {
            Resource::Alerts => "/api/v1/alerts",
            Resource::Devices => "/api/v1/devices",
            Resource::OtEvents => "/api/v1/ot_activity_events",
            Resource::Vulnerabilities => "/api/v1/vulnerabilities",
        }
    }

    /// Fields eligible for automatic filter construction, in the order
    /// their operands are emitted.
    #[must_use]
    pub fn field_checklist(&self) -> &'static [&'static str] {
        match self {
            Resource::Alerts => ALERT_FIELDS,
            Resource::Devices => DEVICE_FIELDS,
            Resource::OtEvents => OT_EVENT_FIELDS,
            Resource::Vulnerabilities => VULNERABILITY_FIELDS,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Resource::Alerts => "alerts",
            Resource::Devices => "devices",
            Resource::OtEvents => "ot_events",
            Resource::Vulnerabilities => "vulnerabilities",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_versioned_paths() {
        for resource in Resource::ALL {
            assert!(resource.endpoint().starts_with("/api/v1/"));
        }
        assert_eq!(Resource::OtEvents.endpoint(), "/api/v1/ot_activity_events");
    }

    #[test]
    fn checklists_keep_declared_order() {
        assert_eq!(Resource::Alerts.field_checklist(), &["id", "category"]);
        assert_eq!(Resource::Devices.field_checklist()[4], "purdue_level");
        assert_eq!(Resource::Vulnerabilities.field_checklist().last(), Some(&"cve_ids"));
    }
}
