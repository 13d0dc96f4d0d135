//! Read-only declarations of the platform operations.
//!
//! Each write operation lists the fields the platform assigns itself. They are
//! removed from request bodies, so a resource read from the API can be sent
//! back as is.

use std::sync::LazyLock;

use http::Method;

use super::operation::{Operation, OperationTable};

const ALARM: &str = "application/vnd.com.nsn.cumulocity.alarm+json";
const ALARM_COLLECTION: &str = "application/vnd.com.nsn.cumulocity.alarmcollection+json";
const EVENT: &str = "application/vnd.com.nsn.cumulocity.event+json";
const EVENT_COLLECTION: &str = "application/vnd.com.nsn.cumulocity.eventcollection+json";
const MEASUREMENT: &str = "application/vnd.com.nsn.cumulocity.measurement+json";
const MANAGED_OBJECT: &str = "application/vnd.com.nsn.cumulocity.managedobject+json";
const OPERATION: &str = "application/vnd.com.nsn.cumulocity.operation+json";
const USER: &str = "application/vnd.com.nsn.cumulocity.user+json";
const JSON: &str = "application/json";
const MULTIPART: &str = "multipart/form-data";
const OCTET_STREAM: &str = "application/octet-stream";

/// `POST /alarm/alarms`
pub static CREATE_ALARM: Operation = Operation {
    id: "createAlarm",
    method: Method::POST,
    path: "/alarm/alarms",
    content_type: Some(ALARM),
    accept: Some(ALARM),
    read_only: &[
        "id",
        "self",
        "count",
        "creationTime",
        "firstOccurrenceTime",
        "lastUpdated",
        "source.name",
        "source.self",
    ],
    bulk: false,
};

/// `PUT /alarm/alarms/{id}`
///
/// Only `status`, `severity`, `text` and custom fragments can change.
pub static UPDATE_ALARM: Operation = Operation {
    id: "updateAlarm",
    method: Method::PUT,
    path: "/alarm/alarms/{id}",
    content_type: Some(ALARM),
    accept: Some(ALARM),
    read_only: &[
        "id",
        "self",
        "count",
        "creationTime",
        "firstOccurrenceTime",
        "lastUpdated",
        "source",
        "type",
        "time",
    ],
    bulk: false,
};

/// `GET /alarm/alarms`
pub static LIST_ALARMS: Operation = Operation {
    id: "listAlarms",
    method: Method::GET,
    path: "/alarm/alarms",
    content_type: None,
    accept: Some(ALARM_COLLECTION),
    read_only: &[],
    bulk: false,
};

/// `GET /alarm/alarms/{id}`
pub static GET_ALARM: Operation = Operation {
    id: "getAlarm",
    method: Method::GET,
    path: "/alarm/alarms/{id}",
    content_type: None,
    accept: Some(ALARM),
    read_only: &[],
    bulk: false,
};

/// `POST /event/events`
pub static CREATE_EVENT: Operation = Operation {
    id: "createEvent",
    method: Method::POST,
    path: "/event/events",
    content_type: Some(EVENT),
    accept: Some(EVENT),
    read_only: &[
        "id",
        "self",
        "creationTime",
        "lastUpdated",
        "source.name",
        "source.self",
        "c8y_IsBinary",
    ],
    bulk: false,
};

/// `PUT /event/events/{id}`
///
/// Only `text` and custom fragments can change.
pub static UPDATE_EVENT: Operation = Operation {
    id: "updateEvent",
    method: Method::PUT,
    path: "/event/events/{id}",
    content_type: Some(EVENT),
    accept: Some(EVENT),
    read_only: &[
        "id",
        "self",
        "creationTime",
        "lastUpdated",
        "source",
        "type",
        "time",
        "c8y_IsBinary",
    ],
    bulk: false,
};

/// `GET /event/events`
pub static LIST_EVENTS: Operation = Operation {
    id: "listEvents",
    method: Method::GET,
    path: "/event/events",
    content_type: None,
    accept: Some(EVENT_COLLECTION),
    read_only: &[],
    bulk: false,
};

/// `POST /event/events/{id}/binaries`
///
/// Multipart upload; the returned event carries `c8y_IsBinary`.
pub static UPLOAD_EVENT_BINARY: Operation = Operation {
    id: "uploadEventBinary",
    method: Method::POST,
    path: "/event/events/{id}/binaries",
    content_type: Some(MULTIPART),
    accept: Some(JSON),
    read_only: &[],
    bulk: false,
};

/// `GET /event/events/{id}/binaries`
pub static DOWNLOAD_EVENT_BINARY: Operation = Operation {
    id: "downloadEventBinary",
    method: Method::GET,
    path: "/event/events/{id}/binaries",
    content_type: None,
    accept: Some(OCTET_STREAM),
    read_only: &[],
    bulk: false,
};

/// `POST /measurement/measurements`
pub static CREATE_MEASUREMENT: Operation = Operation {
    id: "createMeasurement",
    method: Method::POST,
    path: "/measurement/measurements",
    content_type: Some(MEASUREMENT),
    accept: Some(MEASUREMENT),
    read_only: &["id", "self", "source.name", "source.self"],
    bulk: false,
};

/// `POST /inventory/managedObjects`
pub static CREATE_MANAGED_OBJECT: Operation = Operation {
    id: "createManagedObject",
    method: Method::POST,
    path: "/inventory/managedObjects",
    content_type: Some(MANAGED_OBJECT),
    accept: Some(MANAGED_OBJECT),
    read_only: &[
        "id",
        "self",
        "creationTime",
        "lastUpdated",
        "owner",
        "assetParents",
        "childAssets",
        "childDevices",
        "childAdditions",
        "deviceParents",
        "additionParents",
        "c8y_IsBinary",
    ],
    bulk: false,
};

/// `PUT /inventory/managedObjects/{id}`
pub static UPDATE_MANAGED_OBJECT: Operation = Operation {
    id: "updateManagedObject",
    method: Method::PUT,
    path: "/inventory/managedObjects/{id}",
    content_type: Some(MANAGED_OBJECT),
    accept: Some(MANAGED_OBJECT),
    read_only: &[
        "id",
        "self",
        "creationTime",
        "lastUpdated",
        "assetParents",
        "childAssets",
        "childDevices",
        "childAdditions",
        "deviceParents",
        "additionParents",
        "c8y_IsBinary",
    ],
    bulk: false,
};

/// `POST /devicecontrol/operations`
pub static CREATE_OPERATION: Operation = Operation {
    id: "createOperation",
    method: Method::POST,
    path: "/devicecontrol/operations",
    content_type: Some(OPERATION),
    accept: Some(OPERATION),
    read_only: &[
        "id",
        "self",
        "creationTime",
        "status",
        "failureReason",
        "bulkOperationId",
        "deviceName",
        "deviceExternalIDs",
    ],
    bulk: false,
};

/// `PUT /devicecontrol/operations/{id}`
///
/// Devices report progress through `status` and `failureReason`.
pub static UPDATE_OPERATION: Operation = Operation {
    id: "updateOperation",
    method: Method::PUT,
    path: "/devicecontrol/operations/{id}",
    content_type: Some(OPERATION),
    accept: Some(OPERATION),
    read_only: &[
        "id",
        "self",
        "creationTime",
        "deviceId",
        "deviceName",
        "bulkOperationId",
        "deviceExternalIDs",
    ],
    bulk: false,
};

/// `POST /user/{tenantId}/users`
pub static CREATE_USER: Operation = Operation {
    id: "createUser",
    method: Method::POST,
    path: "/user/{tenantId}/users",
    content_type: Some(USER),
    accept: Some(USER),
    read_only: &[
        "id",
        "self",
        "lastPasswordChange",
        "passwordStrength",
        "twoFactorAuthenticationEnabled",
        "effectiveRoles",
        "groups",
        "roles",
        "applications",
        "devicePermissions",
    ],
    bulk: false,
};

/// `PUT /user/{tenantId}/users/{userId}`
///
/// The user name is fixed once created.
pub static UPDATE_USER: Operation = Operation {
    id: "updateUser",
    method: Method::PUT,
    path: "/user/{tenantId}/users/{userId}",
    content_type: Some(USER),
    accept: Some(USER),
    read_only: &[
        "id",
        "self",
        "userName",
        "lastPasswordChange",
        "passwordStrength",
        "twoFactorAuthenticationEnabled",
        "effectiveRoles",
        "groups",
        "roles",
        "applications",
        "devicePermissions",
    ],
    bulk: false,
};

static OPERATIONS: LazyLock<OperationTable> = LazyLock::new(|| {
    OperationTable::new([
        &CREATE_ALARM,
        &UPDATE_ALARM,
        &LIST_ALARMS,
        &GET_ALARM,
        &CREATE_EVENT,
        &UPDATE_EVENT,
        &LIST_EVENTS,
        &UPLOAD_EVENT_BINARY,
        &DOWNLOAD_EVENT_BINARY,
        &CREATE_MEASUREMENT,
        &CREATE_MANAGED_OBJECT,
        &UPDATE_MANAGED_OBJECT,
        &CREATE_OPERATION,
        &UPDATE_OPERATION,
        &CREATE_USER,
        &UPDATE_USER,
    ])
    .expect("valid read-only declarations")
});

/// The process-wide operation table.
///
/// # Example
///
/// ```rust
/// use c8y_core::catalog;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rules = catalog::operations().rules("createAlarm")?;
/// assert!(rules.iter().any(|path| path.to_string() == "source.self"));
/// # Ok(())
/// # }
/// ```
pub fn operations() -> &'static OperationTable {
    &OPERATIONS
}
