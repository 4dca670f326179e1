//! Parser for field serialization tags.
//!
//! A tag is a comma separated list: the first segment overrides the exposed
//! name, every following segment is an option. Options are bare flags such
//! as `omitempty` or `key=value` pairs.

/// Name that drops a field from the schema entirely.
pub const SKIP_MARKER: &str = "-";

/// Flag that makes a field optional.
pub const OMIT_EMPTY: &str = "omitempty";

/// One option after the name segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOption {
    Flag(String),
    Pair { key: String, value: String },
}

/// A parsed serialization tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Override name, empty when the tag does not rename the field
    pub name: String,
    pub options: Vec<TagOption>,
}

impl FieldTag {
    pub fn parse(tag: &str) -> Self {
        let mut segments = tag.split(',');
        let name = segments.next().unwrap_or_default().trim().to_string();
        let options = segments
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(|segment| match segment.split_once('=') {
                Some((key, value)) => TagOption::Pair {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                None => TagOption::Flag(segment.to_string()),
            })
            .collect();

        Self { name, options }
    }

    /// Whether the bare flag `option` is present.
    pub fn contains(&self, option: &str) -> bool {
        self.options
            .iter()
            .any(|o| matches!(o, TagOption::Flag(flag) if flag == option))
    }

    /// Value of the first `key=value` option named `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.options.iter().find_map(|o| match o {
            TagOption::Pair { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }
}

/// Outcome of resolving a field against its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldName {
    Skip,
    Exposed { name: String, omittable: bool },
}

/// Decide the exposed name of a field and whether it may be omitted.
pub fn resolve_field(raw_name: &str, tag: &str) -> FieldName {
    let parsed = FieldTag::parse(tag);
    let name = if parsed.name.is_empty() {
        raw_name.to_string()
    } else {
        parsed.name.clone()
    };

    if name == SKIP_MARKER {
        return FieldName::Skip;
    }

    FieldName::Exposed {
        name,
        omittable: parsed.contains(OMIT_EMPTY),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_empty_tag() {
        let tag = FieldTag::parse("");
        assert_eq!(tag, FieldTag::default());
    }

    #[test]
    fn test_parse_name_and_options() {
        let tag = FieldTag::parse("user_name,omitempty,format=date-time");
        assert_eq!(tag.name, "user_name");
        assert_eq!(
            tag.options,
            vec![
                TagOption::Flag("omitempty".to_string()),
                TagOption::Pair {
                    key: "format".to_string(),
                    value: "date-time".to_string(),
                },
            ]
        );
        assert!(tag.contains("omitempty"));
        assert!(!tag.contains("format"));
        assert_eq!(tag.value("format"), Some("date-time"));
        assert_eq!(tag.value("missing"), None);
    }

    #[test]
    fn test_options_without_name() {
        let tag = FieldTag::parse(",omitempty");
        assert!(tag.name.is_empty());
        assert!(tag.contains("omitempty"));
    }

    #[test]
    fn test_empty_segments_are_ignored() {
        let tag = FieldTag::parse("id,,omitempty,");
        assert_eq!(tag.options.len(), 1);
    }

    #[test]
    fn test_resolve_uses_raw_name_without_override() {
        assert_eq!(
            resolve_field("Message", ""),
            FieldName::Exposed {
                name: "Message".to_string(),
                omittable: false,
            }
        );
    }

    #[test]
    fn test_resolve_override_and_omittable() {
        assert_eq!(
            resolve_field("Message", "message,omitempty"),
            FieldName::Exposed {
                name: "message".to_string(),
                omittable: true,
            }
        );
    }

    #[test]
    fn test_resolve_skip_marker() {
        assert_eq!(resolve_field("Password", "-"), FieldName::Skip);
        assert_eq!(resolve_field("Password", "-,omitempty"), FieldName::Skip);
    }

    #[test]
    fn test_omitempty_must_be_an_exact_flag() {
        let resolved = resolve_field("Count", "count,omitemptyish");
        assert_eq!(
            resolved,
            FieldName::Exposed {
                name: "count".to_string(),
                omittable: false,
            }
        );
    }
}
