//! Core type definitions shared by the filter and its driver
//!
//! Exclusion sets, filter modes and the render options handed to Mermaid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::FilterError;

/// Header line that opens an ER diagram
pub const ER_HEADER: &str = "erDiagram";

/// Diagram file loaded when the caller selects none
pub const DEFAULT_DIAGRAM_FILE: &str = "diagrams/database.mmd";

/// Entity names to remove from a diagram
///
/// Names match exactly: case-sensitive, no normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a comma-separated list such as `"Audit,Session"`
    ///
    /// Empty items are ignored, so `""` yields an empty set.
    pub fn from_csv(list: &str) -> Self {
        list.split(',').filter(|s| !s.is_empty()).collect()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Check whether an entity reference is excluded
    ///
    /// A missing reference (`None`) is never excluded.
    pub fn contains(&self, name: Option<&str>) -> bool {
        name.is_some_and(|n| self.names.contains(n))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Names in sorted order, for stable log and CLI output
    pub fn sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for ExclusionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.names.extend(iter.into_iter().map(Into::into));
    }
}

/// Which passes the filter runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum FilterMode {
    /// Remove excluded entities and their relationships only
    ExclusionOnly,
    /// Also remove entities left without any relationship
    #[default]
    PruneOrphans,
}

impl FilterMode {
    pub fn prunes_orphans(&self) -> bool {
        matches!(self, FilterMode::PruneOrphans)
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::ExclusionOnly => write!(f, "exclusion-only"),
            FilterMode::PruneOrphans => write!(f, "prune-orphans"),
        }
    }
}

/// Mermaid `securityLevel` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecurityLevel {
    Strict,
    #[default]
    Loose,
    Antiscript,
    Sandbox,
}

impl fmt::Display for SecurityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityLevel::Strict => write!(f, "strict"),
            SecurityLevel::Loose => write!(f, "loose"),
            SecurityLevel::Antiscript => write!(f, "antiscript"),
            SecurityLevel::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl FromStr for SecurityLevel {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(SecurityLevel::Strict),
            "loose" => Ok(SecurityLevel::Loose),
            "antiscript" => Ok(SecurityLevel::Antiscript),
            "sandbox" => Ok(SecurityLevel::Sandbox),
            other => Err(FilterError::config_error(format!(
                "Unknown security level: {}",
                other
            ))),
        }
    }
}

/// ER-specific render options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErConfig {
    pub diagram_padding: u32,
}

impl Default for ErConfig {
    fn default() -> Self {
        Self {
            diagram_padding: 20,
        }
    }
}

/// Options passed to the rendering engine
///
/// Serializes to the shape `mermaid.initialize` expects:
/// `{"startOnLoad":false,"securityLevel":"loose","er":{"diagramPadding":20}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    pub start_on_load: bool,
    pub security_level: SecurityLevel,
    pub er: ErConfig,
}

impl RenderConfig {
    pub fn new(start_on_load: bool, security_level: SecurityLevel, diagram_padding: u32) -> Self {
        Self {
            start_on_load,
            security_level,
            er: ErConfig { diagram_padding },
        }
    }

    /// The configuration as a JSON object literal
    pub fn to_json(&self) -> Result<String, FilterError> {
        serde_json::to_string(self).map_err(|e| FilterError::config_error(e.to_string()))
    }
}

/// Which files to combine and which entities to drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub files: Vec<String>,
    pub exclude: ExclusionSet,
}

impl Selection {
    pub fn new(files: Vec<String>, exclude: ExclusionSet) -> Self {
        let files = if files.is_empty() {
            vec![DEFAULT_DIAGRAM_FILE.to_string()]
        } else {
            files
        };
        Self { files, exclude }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(Vec::new(), ExclusionSet::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_set_from_csv() {
        let set = ExclusionSet::from_csv("Audit,,Session");
        assert_eq!(set.len(), 2);
        assert!(set.contains(Some("Audit")));
        assert!(set.contains(Some("Session")));
        assert!(!set.contains(Some("audit")));
        assert!(ExclusionSet::from_csv("").is_empty());
    }

    #[test]
    fn test_exclusion_set_missing_reference() {
        let set: ExclusionSet = ["A"].into_iter().collect();
        assert!(!set.contains(None));
    }

    #[test]
    fn test_exclusion_set_sorted() {
        let mut set = ExclusionSet::new();
        set.extend(["Zebra", "Apple"]);
        assert!(set.insert("Mango"));
        assert!(!set.insert("Apple"));
        assert_eq!(set.sorted(), vec!["Apple", "Mango", "Zebra"]);
    }

    #[test]
    fn test_filter_mode_default() {
        assert_eq!(FilterMode::default(), FilterMode::PruneOrphans);
        assert!(FilterMode::PruneOrphans.prunes_orphans());
        assert!(!FilterMode::ExclusionOnly.prunes_orphans());
        assert_eq!(FilterMode::ExclusionOnly.to_string(), "exclusion-only");
    }

    #[test]
    fn test_render_config_json_shape() {
        let json = RenderConfig::default().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"startOnLoad":false,"securityLevel":"loose","er":{"diagramPadding":20}}"#
        );
    }

    #[test]
    fn test_render_config_roundtrip_custom() {
        let config = RenderConfig::new(true, SecurityLevel::Strict, 8);
        let json = config.to_json().unwrap();
        let parsed: RenderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_security_level_parsing() {
        assert_eq!("STRICT".parse::<SecurityLevel>().unwrap(), SecurityLevel::Strict);
        assert_eq!("sandbox".parse::<SecurityLevel>().unwrap(), SecurityLevel::Sandbox);
        assert!("open".parse::<SecurityLevel>().is_err());
        assert_eq!(SecurityLevel::Antiscript.to_string(), "antiscript");
    }

    #[test]
    fn test_selection_defaults_to_builtin_diagram() {
        let selection = Selection::default();
        assert_eq!(selection.files, vec![DEFAULT_DIAGRAM_FILE.to_string()]);
        assert!(selection.exclude.is_empty());

        let explicit = Selection::new(vec!["a.mmd".into()], ExclusionSet::from_csv("X"));
        assert_eq!(explicit.files, vec!["a.mmd".to_string()]);
    }
}
