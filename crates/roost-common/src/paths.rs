//! Registry path layout in the coordination store
//!
//! | Node kind          | Path                                          |
//! |--------------------|-----------------------------------------------|
//! | service address    | `<service>/<escaped name>[/<group>]`          |
//! | host weight        | `<weight>/<host:port>`                        |
//! | ephemeral address  | `<ephemeral>/<escaped name>[@<group>]`        |

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoostError};
use crate::naming::escape_service_name;
use crate::{GROUP_SEPARATOR, PATH_SEPARATOR};

pub const DEFAULT_SERVICE_PATH: &str = "/DP/SERVER";
pub const DEFAULT_WEIGHT_PATH: &str = "/DP/WEIGHT";
pub const DEFAULT_EPHEMERAL_SERVICE_PATH: &str = "/DP/EPHEMERAL";

/// The three path prefixes under which service registration data lives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryPaths {
    pub service: String,
    pub weight: String,
    pub ephemeral: String,
}

impl Default for RegistryPaths {
    fn default() -> Self {
        Self {
            service: DEFAULT_SERVICE_PATH.to_string(),
            weight: DEFAULT_WEIGHT_PATH.to_string(),
            ephemeral: DEFAULT_EPHEMERAL_SERVICE_PATH.to_string(),
        }
    }
}

impl RegistryPaths {
    /// Create a validated path layout.
    pub fn new(
        service: impl Into<String>,
        weight: impl Into<String>,
        ephemeral: impl Into<String>,
    ) -> Result<Self> {
        let paths = Self {
            service: service.into(),
            weight: weight.into(),
            ephemeral: ephemeral.into(),
        };
        paths.validate()?;
        Ok(paths)
    }

    /// Check that every prefix is an absolute path without a trailing separator
    /// and that no prefix equals or lies below another.
    pub fn validate(&self) -> Result<()> {
        let prefixes = [&self.service, &self.weight, &self.ephemeral];
        for prefix in prefixes {
            validate_prefix(prefix)?;
        }
        for (i, outer) in prefixes.iter().enumerate() {
            for (j, inner) in prefixes.iter().enumerate() {
                if i != j && is_same_or_below(inner, outer) {
                    return Err(RoostError::IllegalArgument(format!(
                        "registry path prefix '{}' overlaps '{}'",
                        inner, outer
                    )));
                }
            }
        }
        Ok(())
    }

    /// Path of the address node for `service_name` in `group`.
    pub fn service_path(&self, service_name: &str, group: &str) -> String {
        let mut path = format!(
            "{}{}{}",
            self.service,
            PATH_SEPARATOR,
            escape_service_name(service_name)
        );
        if !group.is_empty() {
            path.push(PATH_SEPARATOR);
            path.push_str(group);
        }
        path
    }

    /// Path of the weight node for a `host:port` server.
    pub fn weight_path(&self, server: &str) -> String {
        format!("{}{}{}", self.weight, PATH_SEPARATOR, server)
    }

    /// Path of the ephemeral container holding one child per live host.
    pub fn ephemeral_service_path(&self, service_name: &str, group: &str) -> String {
        let mut path = format!(
            "{}{}{}",
            self.ephemeral,
            PATH_SEPARATOR,
            escape_service_name(service_name)
        );
        if !group.is_empty() {
            path.push(GROUP_SEPARATOR);
            path.push_str(group);
        }
        path
    }
}

fn is_same_or_below(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(PATH_SEPARATOR))
}

fn validate_prefix(prefix: &str) -> Result<()> {
    let invalid = |reason| RoostError::InvalidPathPrefix {
        prefix: prefix.to_string(),
        reason,
    };
    if !prefix.starts_with(PATH_SEPARATOR) {
        return Err(invalid("must start with '/'"));
    }
    if prefix.len() == 1 || prefix.ends_with(PATH_SEPARATOR) {
        return Err(invalid("must not end with '/'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths_are_valid() {
        assert!(RegistryPaths::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_prefixes() {
        assert!(RegistryPaths::new("DP/SERVER", "/DP/WEIGHT", "/DP/EPHEMERAL").is_err());
        assert!(RegistryPaths::new("/DP/SERVER/", "/DP/WEIGHT", "/DP/EPHEMERAL").is_err());
        assert!(RegistryPaths::new("/", "/DP/WEIGHT", "/DP/EPHEMERAL").is_err());
        assert!(RegistryPaths::new("/DP/SERVER", "/DP/SERVER", "/DP/EPHEMERAL").is_err());
    }

    #[test]
    fn test_nested_prefixes_rejected() {
        assert!(RegistryPaths::new("/DP", "/DP/WEIGHT", "/DP/EPHEMERAL").is_err());
        assert!(RegistryPaths::new("/DP/SERVER", "/DP/SERVER/WEIGHT", "/DP/EPHEMERAL").is_err());
        assert!(RegistryPaths::new("/DP/SERVER", "/DP/WEIGHT", "/DP/WEIGHT/EPH").is_err());

        let err = RegistryPaths::new("/DP", "/DP/WEIGHT", "/X/EPHEMERAL").unwrap_err();
        assert_eq!(
            err,
            RoostError::IllegalArgument(
                "registry path prefix '/DP/WEIGHT' overlaps '/DP'".to_string()
            )
        );
    }

    #[test]
    fn test_sibling_prefixes_sharing_text_accepted() {
        assert!(RegistryPaths::new("/DP/SERVER", "/DP/SERVERWEIGHT", "/DP/EPHEMERAL").is_ok());
    }

    #[test]
    fn test_service_path() {
        let paths = RegistryPaths::default();
        assert_eq!(paths.service_path("svcA", ""), "/DP/SERVER/svcA");
        assert_eq!(paths.service_path("svcA", "groupX"), "/DP/SERVER/svcA/groupX");
        assert_eq!(
            paths.service_path("http://demo/svc", ""),
            "/DP/SERVER/http:^^demo^svc"
        );
    }

    #[test]
    fn test_weight_path() {
        let paths = RegistryPaths::default();
        assert_eq!(paths.weight_path("10.0.0.1:8080"), "/DP/WEIGHT/10.0.0.1:8080");
    }

    #[test]
    fn test_ephemeral_service_path() {
        let paths = RegistryPaths::default();
        assert_eq!(paths.ephemeral_service_path("svcA", ""), "/DP/EPHEMERAL/svcA");
        assert_eq!(
            paths.ephemeral_service_path("svcA", "groupX"),
            "/DP/EPHEMERAL/svcA@groupX"
        );
    }
}
