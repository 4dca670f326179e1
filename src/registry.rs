use crate::entry::OperationDescriptor;
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// HTTP methods an operation can be registered under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "delete" => Ok(HttpMethod::Delete),
            "patch" => Ok(HttpMethod::Patch),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

/// All operations registered for a single path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<OperationDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<OperationDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub put: Option<OperationDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<OperationDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patch: Option<OperationDescriptor>,
}

impl PathEntry {
    fn slot(&mut self, method: HttpMethod) -> &mut Option<OperationDescriptor> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Patch => &mut self.patch,
        }
    }

    pub fn get_method(&self, method: HttpMethod) -> Option<&OperationDescriptor> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
        }
    }
}

/// Accumulates operations by normalized path
#[derive(Debug, Default)]
pub struct SpecRegistry {
    paths: BTreeMap<String, PathEntry>,
}

impl SpecRegistry {
    pub fn new() -> Self {
        debug!("Initializing SpecRegistry");
        Self::default()
    }

    /// Insert or replace the operation for `(path, method)`.
    pub fn register(&mut self, path: &str, method: HttpMethod, entry: OperationDescriptor) {
        let slot = self.paths.entry(path.to_string()).or_default().slot(method);
        if slot.is_some() {
            warn!("Replacing previously registered operation {} {}", method, path);
        }
        *slot = Some(entry);
    }

    /// All registrations made so far.
    pub fn snapshot(&self) -> &BTreeMap<String, PathEntry> {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Compute the externally visible path of a route.
///
/// `base_path` is stripped from the route group prefix, the route path is
/// rooted, both are joined, and `:param` segments become `{param}`. An empty
/// route path roots to `/` like any other, so it keeps the trailing slash.
pub fn normalize_path(base_path: &str, group_prefix: &str, path: &str) -> String {
    let mut prefix = group_prefix;
    if !base_path.is_empty() {
        prefix = prefix.strip_prefix(base_path).unwrap_or(prefix);
    }
    let prefix = prefix.trim_end_matches('/');

    let joined = if path.starts_with('/') {
        format!("{}{}", prefix, path)
    } else {
        format!("{}/{}", prefix, path)
    };
    convert_path_format(&joined)
}

/// Convert `:param` segments to the `{param}` form
fn convert_path_format(path: &str) -> String {
    path.split('/')
        .map(|part| match part.strip_prefix(':') {
            Some(name) => format!("{{{}}}", name),
            None => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(summary: &str) -> OperationDescriptor {
        OperationDescriptor {
            summary: summary.to_string(),
            tags: vec!["t".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_method_parsing_is_case_insensitive() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!(matches!(
            "options".parse::<HttpMethod>(),
            Err(Error::InvalidMethod(_))
        ));
    }

    #[test]
    fn test_register_and_snapshot() {
        let mut registry = SpecRegistry::new();
        assert!(registry.is_empty());

        registry.register("/users", HttpMethod::Get, entry("list"));
        registry.register("/users", HttpMethod::Post, entry("create"));
        registry.register("/users/{id}", HttpMethod::Get, entry("show"));

        assert_eq!(registry.len(), 2);
        let users = &registry.snapshot()["/users"];
        assert_eq!(users.get_method(HttpMethod::Get).unwrap().summary, "list");
        assert_eq!(users.get_method(HttpMethod::Post).unwrap().summary, "create");
        assert!(users.get_method(HttpMethod::Put).is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = SpecRegistry::new();
        registry.register("/users", HttpMethod::Get, entry("A"));
        registry.register("/users", HttpMethod::Get, entry("B"));

        let users = &registry.snapshot()["/users"];
        assert_eq!(users.get.as_ref().unwrap().summary, "B");
        assert!(users.post.is_none());
    }

    #[test]
    fn test_path_entry_serializes_only_present_methods() {
        let mut registry = SpecRegistry::new();
        registry.register("/ping", HttpMethod::Get, entry("ping"));

        let json = serde_json::to_value(registry.snapshot()).unwrap();
        let methods: Vec<_> = json["/ping"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(methods, vec!["get"]);
    }

    #[test]
    fn test_normalize_strips_base_path() {
        assert_eq!(normalize_path("/api/v1", "/api/v1/users", "/list"), "/users/list");
        assert_eq!(normalize_path("/api/v1", "/api/v1", "ping"), "/ping");
    }

    #[test]
    fn test_normalize_without_base_path() {
        assert_eq!(normalize_path("", "/users", "list"), "/users/list");
        assert_eq!(normalize_path("", "/", "/ping"), "/ping");
        assert_eq!(normalize_path("", "", "ping"), "/ping");
    }

    #[test]
    fn test_normalize_empty_path() {
        assert_eq!(normalize_path("/api", "/api/users", ""), "/users/");
        assert_eq!(normalize_path("/api", "/api/users", "/"), "/users/");
        assert_eq!(normalize_path("/api", "/api", ""), "/");
        assert_eq!(normalize_path("", "", ""), "/");
    }

    #[test]
    fn test_normalize_keeps_foreign_prefix() {
        assert_eq!(normalize_path("/api/v1", "/admin", "/stats"), "/admin/stats");
    }

    #[test]
    fn test_normalize_converts_path_params() {
        assert_eq!(
            normalize_path("", "/users", "/:id/posts/:post_id"),
            "/users/{id}/posts/{post_id}"
        );
        assert_eq!(normalize_path("", "/users", "/{id}"), "/users/{id}");
    }
}
