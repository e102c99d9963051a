//! Classification of coordination store paths
//!
//! A store path is parsed into a [`PathDescriptor`] without touching the
//! store, so classification can be tested against literal strings.

use std::cmp::Reverse;

use roost_common::{
    GROUP_SEPARATOR, PATH_SEPARATOR, RegistryPaths, normalize_group, unescape_service_name,
};

/// Which registry node a path refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathKind {
    ServiceAddress,
    Weight,
    EphemeralAddress,
}

impl PathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathKind::ServiceAddress => "address",
            PathKind::Weight => "weight",
            PathKind::EphemeralAddress => "ephemeral_address",
        }
    }
}

/// Parsed form of a registry path.
///
/// Address kinds carry a service name, weight carries a server; the group is
/// always normalized and is empty for weight paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathDescriptor {
    kind: PathKind,
    service_name: Option<String>,
    group: String,
    server: Option<String>,
    raw_path: String,
}

impl PathDescriptor {
    fn service(kind: PathKind, raw_path: &str, service_name: &str, group: Option<&str>) -> Self {
        Self {
            kind,
            service_name: Some(unescape_service_name(service_name)),
            group: normalize_group(group),
            server: None,
            raw_path: raw_path.to_string(),
        }
    }

    fn weight(raw_path: &str, server: &str) -> Self {
        Self {
            kind: PathKind::Weight,
            service_name: None,
            group: String::new(),
            server: Some(server.to_string()),
            raw_path: raw_path.to_string(),
        }
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }
}

/// Parses store paths according to a [`RegistryPaths`] layout.
#[derive(Debug, Clone, Default)]
pub struct PathClassifier {
    paths: RegistryPaths,
}

impl PathClassifier {
    pub fn new(paths: RegistryPaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &RegistryPaths {
        &self.paths
    }

    /// Classify a path, returning `None` when it matches no known prefix or
    /// has nothing after the prefix.
    pub fn classify(&self, path: &str) -> Option<PathDescriptor> {
        if path.is_empty() {
            return None;
        }

        // Longest prefix wins when a layout nests one prefix under another
        let mut prefixes = [
            (PathKind::ServiceAddress, self.paths.service.as_str()),
            (PathKind::Weight, self.paths.weight.as_str()),
            (PathKind::EphemeralAddress, self.paths.ephemeral.as_str()),
        ];
        prefixes.sort_by_key(|(_, prefix)| Reverse(prefix.len()));

        let (kind, rest) = prefixes.iter().find_map(|(kind, prefix)| {
            strip_prefix_segment(path, prefix).map(|rest| (*kind, rest))
        })?;

        match kind {
            PathKind::Weight => Some(PathDescriptor::weight(path, rest)),
            PathKind::ServiceAddress | PathKind::EphemeralAddress => {
                let separator = if kind == PathKind::ServiceAddress {
                    PATH_SEPARATOR
                } else {
                    GROUP_SEPARATOR
                };
                let (service_name, group) = split_once_opt(rest, separator);
                if service_name.is_empty() {
                    return None;
                }
                Some(PathDescriptor::service(kind, path, service_name, group))
            }
        }
    }
}

/// Remainder of `path` after `prefix` and one separator, if non-empty.
fn strip_prefix_segment<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)?
        .strip_prefix(PATH_SEPARATOR)
        .filter(|rest| !rest.is_empty())
}

fn split_once_opt(value: &str, separator: char) -> (&str, Option<&str>) {
    match value.split_once(separator) {
        Some((head, tail)) => (head, Some(tail)),
        None => (value, None),
    }
}
