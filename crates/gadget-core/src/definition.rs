//! Gadgets definition types and parsing
//!
//! The definition is a YAML document of the form:
//!
//! ```yaml
//! workspace:
//!   enable_all: true
//! gadgets:
//!   <category>:
//!     <gadget>:
//!       description: "..."
//!       code: [file.ts, file.less]
//!       resourceLoader: { ... }
//! ```
//!
//! Categories and gadgets keep their document order.

use crate::error::DefinitionError;
use crate::paths;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

/// File name of the definition copy written under the scaffold root
pub const DEFINITION_FILE_NAME: &str = "gadgets-definition.yaml";

/// The Utaite Wiki gadgets definition bundled with the tool
pub const EMBEDDED_DEFINITION: &str = include_str!("../assets/gadgets-definition.yaml");

/// Which gadgets are active when checking the tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Workspace {
    /// Select every gadget except those listed in `disable`
    #[serde(default, deserialize_with = "null_as_default")]
    pub enable_all: bool,

    /// Gadget ids to select when `enable_all` is false
    #[serde(default, deserialize_with = "null_as_default")]
    pub enable: Vec<String>,

    /// Gadget ids to skip when `enable_all` is true
    #[serde(default, deserialize_with = "null_as_default")]
    pub disable: Vec<String>,
}

/// A single gadget definition.
///
/// Only `code` is decoded strictly. The other fields stay raw YAML so that a
/// value of an unexpected shape never blocks scaffolding; the accessors
/// interpret them on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Gadget {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub description: Value,

    /// Source and style files, in the order they are listed
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: Vec<String>,

    /// Never selected, regardless of the workspace block
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub disabled: Value,

    /// Gadget ids that must load before this one
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub requires: Value,

    /// ResourceLoader options, kept as-is for the wiki runtime
    #[serde(
        rename = "resourceLoader",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_loader: Option<Value>,

    /// Any other keys present in the document
    #[serde(flatten)]
    pub extra: Mapping,
}

impl Gadget {
    /// Description text; scalar values are shown as written
    pub fn description(&self) -> Option<String> {
        match &self.description {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> Result<bool, String> {
        match &self.disabled {
            Value::Null => Ok(false),
            Value::Bool(b) => Ok(*b),
            other => Err(format!("`disabled` must be a boolean, found {:?}", other)),
        }
    }

    pub fn requires(&self) -> Result<Vec<String>, String> {
        if self.requires.is_null() {
            return Ok(Vec::new());
        }
        serde_yaml::from_value(self.requires.clone())
            .map_err(|e| format!("`requires` must be a list of gadget ids: {}", e))
    }
}

/// A named gadget inside a category
#[derive(Debug, Clone, PartialEq)]
pub struct GadgetEntry {
    pub name: String,
    pub gadget: Gadget,
}

/// A category and its gadgets, in document order
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub gadgets: Vec<GadgetEntry>,
}

/// Parsed gadgets definition document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GadgetsDefinition {
    /// Raw `workspace` block, decoded by [`GadgetsDefinition::workspace`]
    #[serde(default)]
    pub workspace: Value,

    #[serde(default, deserialize_with = "deserialize_categories")]
    pub gadgets: Vec<Category>,
}

impl GadgetsDefinition {
    /// Parse a definition from YAML text
    pub fn parse(text: &str) -> Result<Self, DefinitionError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Decode the `workspace` block; a missing block selects nothing
    pub fn workspace(&self) -> Result<Workspace, String> {
        if self.workspace.is_null() {
            return Ok(Workspace::default());
        }
        serde_yaml::from_value(self.workspace.clone())
            .map_err(|e| format!("invalid workspace block: {}", e))
    }

    /// Iterate over every `(category, gadget)` pair in document order
    pub fn entries(&self) -> impl Iterator<Item = (&Category, &GadgetEntry)> {
        self.gadgets
            .iter()
            .flat_map(|category| category.gadgets.iter().map(move |entry| (category, entry)))
    }

    /// Look up a gadget by category and name
    pub fn find(&self, category: &str, name: &str) -> Option<&Gadget> {
        self.gadgets
            .iter()
            .find(|c| c.name == category)?
            .gadgets
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.gadget)
    }

    /// Total number of files listed across all gadgets
    pub fn file_count(&self) -> usize {
        self.entries().map(|(_, e)| e.gadget.code.len()).sum()
    }
}

/// Where the definition text comes from
#[derive(Debug, Clone)]
pub enum DefinitionSource {
    Embedded,
    File(PathBuf),
}

impl DefinitionSource {
    /// Use the given file when present, the embedded definition otherwise
    pub fn from_option(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Embedded,
        }
    }

    /// Read and parse the definition
    pub fn load(&self) -> Result<LoadedDefinition, DefinitionError> {
        let text = match self {
            Self::Embedded => EMBEDDED_DEFINITION.to_string(),
            Self::File(path) => read_definition(path)?,
        };
        let definition = GadgetsDefinition::parse(&text)?;
        Ok(LoadedDefinition { text, definition })
    }
}

/// The raw definition text alongside its parsed form
#[derive(Debug, Clone)]
pub struct LoadedDefinition {
    pub text: String,
    pub definition: GadgetsDefinition,
}

fn read_definition(path: &Path) -> Result<String, DefinitionError> {
    std::fs::read_to_string(path).map_err(|source| DefinitionError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Treat an explicit `null` the same as a missing key
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_categories<'de, D>(deserializer: D) -> Result<Vec<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Mapping> = Option::deserialize(deserializer)?;

    let mut categories = Vec::new();
    for (key, value) in raw.unwrap_or_default() {
        let category = key_to_segment(&key, "category").map_err(de::Error::custom)?;

        let gadgets: Option<Mapping> = serde_yaml::from_value(value)
            .map_err(|e| de::Error::custom(format!("category '{}': {}", category, e)))?;

        let mut entries = Vec::new();
        for (key, value) in gadgets.unwrap_or_default() {
            let name = key_to_segment(&key, "gadget").map_err(de::Error::custom)?;
            let gadget: Option<Gadget> = serde_yaml::from_value(value).map_err(|e| {
                de::Error::custom(format!("gadget '{}/{}': {}", category, name, e))
            })?;
            let gadget = gadget.unwrap_or_default();

            for filename in &gadget.code {
                paths::validate_segment("file", filename).map_err(|e| {
                    de::Error::custom(format!("gadget '{}/{}': {}", category, name, e))
                })?;
            }

            entries.push(GadgetEntry { name, gadget });
        }

        categories.push(Category {
            name: category,
            gadgets: entries,
        });
    }

    Ok(categories)
}

/// Convert a mapping key into a single path segment
fn key_to_segment(key: &Value, kind: &str) -> Result<String, String> {
    let name = match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => return Err(format!("{} name must be a string, found {:?}", kind, other)),
    };
    paths::validate_segment(kind, &name)?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
workspace:
  enable_all: false
  enable:
    - core/CustomTabber

gadgets:
  core:
    CustomTabber:
      description: "Custom Tabber functionality."
      code:
        - CustomTabber.ts
      resourceLoader:
        default: true
        hidden: true
    videopreview:
      code:
        - PreviewVid.less
        - PreviewVid.ts
  styling:
    badge:
      description: "Badge styling."
      code:
        - badge.less
"#;

    #[test]
    fn test_parse_preserves_document_order() {
        let def = GadgetsDefinition::parse(SAMPLE).unwrap();

        let categories: Vec<&str> = def.gadgets.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(categories, vec!["core", "styling"]);

        let core: Vec<&str> = def.gadgets[0]
            .gadgets
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(core, vec!["CustomTabber", "videopreview"]);

        let preview = def.find("core", "videopreview").unwrap();
        assert_eq!(preview.code, vec!["PreviewVid.less", "PreviewVid.ts"]);
    }

    #[test]
    fn test_parse_workspace_block() {
        let def = GadgetsDefinition::parse(SAMPLE).unwrap();
        let workspace = def.workspace().unwrap();
        assert!(!workspace.enable_all);
        assert_eq!(workspace.enable, vec!["core/CustomTabber"]);
        assert!(workspace.disable.is_empty());
    }

    #[test]
    fn test_resource_loader_kept_opaque() {
        let def = GadgetsDefinition::parse(SAMPLE).unwrap();
        let tabber = def.find("core", "CustomTabber").unwrap();

        let loader = tabber.resource_loader.as_ref().unwrap();
        assert_eq!(loader["default"], Value::Bool(true));
        assert_eq!(loader["hidden"], Value::Bool(true));

        let serialized = serde_yaml::to_string(tabber).unwrap();
        assert!(serialized.contains("resourceLoader:"));
        assert!(serialized.contains("hidden: true"));
    }

    #[test]
    fn test_unknown_fields_preserved() {
        let text = r#"
gadgets:
  core:
    thing:
      code: [thing.ts]
      peers: [other]
"#;
        let def = GadgetsDefinition::parse(text).unwrap();
        let thing = def.find("core", "thing").unwrap();
        assert!(thing.extra.contains_key("peers"));
        assert!(serde_yaml::to_string(thing).unwrap().contains("peers:"));
    }

    #[test]
    fn test_missing_code_means_no_files() {
        let text = r#"
gadgets:
  moderation:
    nothing:
      description: "No files."
    empty:
    nullcode:
      code:
  emptycategory:
"#;
        let def = GadgetsDefinition::parse(text).unwrap();
        assert_eq!(def.file_count(), 0);
        assert_eq!(def.gadgets.len(), 2);
        assert_eq!(def.gadgets[0].gadgets.len(), 3);
        assert!(def.gadgets[1].gadgets.is_empty());
    }

    #[test]
    fn test_missing_gadgets_key_is_empty() {
        let def = GadgetsDefinition::parse("workspace:\n  enable_all: true\n").unwrap();
        assert!(def.gadgets.is_empty());
        assert!(def.workspace().unwrap().enable_all);
    }

    #[test]
    fn test_loose_fields_parse_and_decode_on_demand() {
        let text = r#"
workspace: [core/a]
gadgets:
  core:
    a:
      description: 2024
      code: [a.ts]
      disabled: "yes"
      requires: core/b
    b:
      code: [b.ts]
      disabled: true
      requires: [core/a]
"#;
        let def = GadgetsDefinition::parse(text).unwrap();
        assert!(def.workspace().is_err());

        let a = def.find("core", "a").unwrap();
        assert_eq!(a.description(), Some("2024".to_string()));
        assert_eq!(a.code, vec!["a.ts"]);
        assert!(a.is_disabled().is_err());
        assert!(a.requires().is_err());

        let b = def.find("core", "b").unwrap();
        assert_eq!(b.description(), None);
        assert_eq!(b.is_disabled(), Ok(true));
        assert_eq!(b.requires(), Ok(vec!["core/a".to_string()]));
    }

    #[test]
    fn test_null_workspace_fields_use_defaults() {
        let def = GadgetsDefinition::parse("workspace:
  enable_all:
  enable:
").unwrap();
        let workspace = def.workspace().unwrap();
        assert!(!workspace.enable_all);
        assert!(workspace.enable.is_empty());
    }

    #[test]
    fn test_duplicate_gadget_name_rejected() {
        let text = "gadgets:\n  core:\n    a:\n      code: [a.ts]\n    a:\n      code: [b.ts]\n";
        assert!(matches!(
            GadgetsDefinition::parse(text).unwrap_err(),
            DefinitionError::Parse(_)
        ));
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = GadgetsDefinition::parse("gadgets:\n  core: [unterminated\n").unwrap_err();
        assert!(matches!(err, DefinitionError::Parse(_)));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = GadgetsDefinition::parse("gadgets:\n  core:\n    x:\n      code: 5\n")
            .unwrap_err();
        assert!(err.to_string().contains("core/x"));
    }

    #[test]
    fn test_path_like_names_rejected() {
        assert!(GadgetsDefinition::parse("gadgets:\n  ../up:\n    x:\n      code: []\n").is_err());
        assert!(GadgetsDefinition::parse("gadgets:\n  core:\n    a/b:\n      code: []\n").is_err());
        assert!(
            GadgetsDefinition::parse("gadgets:\n  core:\n    x:\n      code: [sub/x.ts]\n")
                .is_err()
        );
    }

    #[test]
    fn test_spaces_and_symbols_in_names_allowed() {
        let text = r#"
gadgets:
  "moderation & housekeeping":
    "bottom toolbar":
      code:
        - bottom toolbar.ts
"#;
        let def = GadgetsDefinition::parse(text).unwrap();
        assert!(def.find("moderation & housekeeping", "bottom toolbar").is_some());
    }

    #[test]
    fn test_embedded_definition_parses() {
        let loaded = DefinitionSource::Embedded.load().unwrap();
        assert_eq!(loaded.text, EMBEDDED_DEFINITION);

        let def = &loaded.definition;
        assert!(def.workspace().unwrap().enable_all);
        assert_eq!(def.gadgets[0].name, "core");
        assert_eq!(def.gadgets[0].gadgets[0].name, "CustomTabber");

        let badge = def.find("styling", "badge").unwrap();
        assert_eq!(badge.code, vec!["badge.less"]);

        let names: Vec<&str> = def.gadgets.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "core",
                "Contents",
                "utility",
                "blog",
                "styling",
                "external",
                "community",
                "moderation & housekeeping",
            ]
        );
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = DefinitionSource::File(dir.path().join("absent.yaml"));
        assert!(matches!(
            source.load().unwrap_err(),
            DefinitionError::Read { .. }
        ));
    }

    #[test]
    fn test_load_from_file_keeps_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defs.yaml");
        std::fs::write(&path, SAMPLE).unwrap();

        let loaded = DefinitionSource::from_option(Some(path)).load().unwrap();
        assert_eq!(loaded.text, SAMPLE);
        assert_eq!(loaded.definition.file_count(), 4);
    }
}
