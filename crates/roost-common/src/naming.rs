//! Service name and routing group helpers
//!
//! Service names may contain `/`, which would collide with the store's
//! structural separator, so they are escaped before being written into a path.

use crate::{PATH_SEPARATOR, SERVICE_NAME_ESCAPE};

/// Normalize a raw routing group.
///
/// Absent and blank groups both collapse to the canonical empty group;
/// anything else is trimmed.
///
/// # Examples
///
/// ```
/// use roost_common::normalize_group;
///
/// assert_eq!(normalize_group(None), "");
/// assert_eq!(normalize_group(Some("  ")), "");
/// assert_eq!(normalize_group(Some(" gray ")), "gray");
/// ```
pub fn normalize_group(group: Option<&str>) -> String {
    group.map(str::trim).unwrap_or_default().to_string()
}

/// Escape a service name so it can be used as a single path segment.
pub fn escape_service_name(service_name: &str) -> String {
    service_name.replace(PATH_SEPARATOR, &SERVICE_NAME_ESCAPE.to_string())
}

/// Reverse [`escape_service_name`].
pub fn unescape_service_name(escaped: &str) -> String {
    escaped.replace(SERVICE_NAME_ESCAPE, &PATH_SEPARATOR.to_string())
}
