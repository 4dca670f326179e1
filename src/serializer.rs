//! Rendering of the assembled document to JSON or YAML.
//!
//! The HTTP endpoint serves JSON directly; these helpers back the offline
//! dump of the command-line tool.

use crate::api_doc::SpecDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Serializes a document to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(doc: &SpecDocument) -> Result<String> {
    debug!("Serializing spec document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize spec document to YAML")
}

/// Serializes a document to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &SpecDocument) -> Result<String> {
    debug!("Serializing spec document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize spec document to JSON")
}

/// Write a rendered document to `path`.
///
/// The content is staged in a sibling `.tmp` file and renamed into place, so
/// a failed dump leaves any previous document untouched. Missing parent
/// directories are created.
pub fn write_document(content: &str, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut staging = path.as_os_str().to_owned();
    staging.push(".tmp");
    let staging = PathBuf::from(staging);

    fs::write(&staging, content)
        .with_context(|| format!("Failed to stage spec document at {}", staging.display()))?;
    fs::rename(&staging, path)
        .with_context(|| format!("Failed to move spec document to {}", path.display()))?;

    debug!("Dumped {} bytes of spec document to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_doc::{Info, SpecDocument, SWAGGER_VERSION};
    use crate::entry::OperationDescriptor;
    use crate::registry::PathEntry;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// Helper function to create a minimal document for testing
    fn create_test_document() -> SpecDocument {
        let mut paths = BTreeMap::new();
        paths.insert(
            "/users".to_string(),
            PathEntry {
                get: Some(OperationDescriptor {
                    summary: "List users".to_string(),
                    tags: vec!["users".to_string()],
                    ..Default::default()
                }),
                ..Default::default()
            },
        );

        SpecDocument {
            base_path: "/api".to_string(),
            swagger: SWAGGER_VERSION.to_string(),
            info: Info {
                description: "A test API".to_string(),
                title: "Test API".to_string(),
                version: "1.0.0".to_string(),
            },
            definition: BTreeMap::new(),
            paths,
            security_definitions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&create_test_document()).unwrap();

        assert!(yaml.contains("swagger:"));
        assert!(yaml.contains("2.0"));
        assert!(yaml.contains("basePath: /api"));
        assert!(yaml.contains("title: Test API"));
        assert!(yaml.contains("/users:"));
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&create_test_document()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["swagger"], "2.0");
        assert_eq!(parsed["paths"]["/users"]["get"]["summary"], "List users");
        // Pretty printed
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_yaml_round_trips_into_document() {
        let doc = create_test_document();
        let yaml = serialize_yaml(&doc).unwrap();
        let back: SpecDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_write_document_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("spec.json");

        write_document("{}", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_write_document_replaces_previous_dump() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("spec.yaml");
        fs::write(&path, "stale").unwrap();

        let yaml = serialize_yaml(&create_test_document()).unwrap();
        write_document(&yaml, &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), yaml);
        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec!["spec.yaml"]);
    }
}
