//! Loading every source declared in a configuration document.
//!
//! ```xml
//! <tilecache>
//!   <source name="vmap0" type="wms">
//!     <url>http://vmap0.tiles.osgeo.org/wms/vmap0</url>
//!     <wmsparams><LAYERS>basic</LAYERS></wmsparams>
//!   </source>
//! </tilecache>
//! ```
//!
//! Elements other than `<source>` belong to other subsystems and are skipped.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ConfigNode;
use crate::error::{ConfigErrors, SourceError};
use crate::source::{create_source, Source, SourceType};

/// Configured sources, keyed by name. Read-only once loaded.
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn Source>>,
    order: Vec<String>,
}

impl SourceRegistry {
    /// Read and load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigErrors> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path).map_err(|e| {
            SourceError::InvalidConfig(format!("failed to read {}: {}", path.display(), e))
        })?;
        info!(path = %path.display(), "Loading source configuration");
        Self::from_xml(&xml)
    }

    /// Parse and load a configuration document.
    pub fn from_xml(xml: &str) -> Result<Self, ConfigErrors> {
        let root = ConfigNode::parse_str(xml)?;
        Self::from_config(&root)
    }

    /// Create, parse and check every `<source>` child of `root`.
    ///
    /// Loading continues past broken sources so that all problems are
    /// reported together.
    pub fn from_config(root: &ConfigNode) -> Result<Self, ConfigErrors> {
        let mut registry = SourceRegistry::default();
        let mut errors = ConfigErrors::new();
        let mut seen = HashSet::new();

        for node in root.children_named("source") {
            let Some(name) = node.attribute("name").filter(|n| !n.is_empty()) else {
                errors.push(SourceError::InvalidConfig(
                    "source element has no name attribute".to_string(),
                ));
                continue;
            };

            // broken sources still claim their name
            if !seen.insert(name) {
                errors.push(SourceError::InvalidConfig(format!(
                    "duplicate source name: {}",
                    name
                )));
                continue;
            }

            let source_type = match node.attribute("type") {
                Some(t) => match t.parse::<SourceType>() {
                    Ok(t) => t,
                    Err(_) => {
                        errors.push(SourceError::InvalidConfig(format!(
                            "source {} has unknown type: {}",
                            name, t
                        )));
                        continue;
                    }
                },
                None => {
                    errors.push(SourceError::InvalidConfig(format!(
                        "source {} has no type attribute",
                        name
                    )));
                    continue;
                }
            };

            let mut source = create_source(source_type, name);
            source.configuration_parse(node);
            if let Err(check) = source.configuration_check() {
                errors.extend(check);
                continue;
            }

            debug!(source = %name, source_type = %source_type, "Configured source");
            registry.order.push(name.to_string());
            registry.sources.insert(name.to_string(), Arc::from(source));
        }

        errors.into_result()?;
        info!(count = registry.len(), "Loaded sources");
        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Source>> {
        self.sources.get(name).cloned()
    }

    /// Source names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::config;

    #[test]
    fn test_loads_all_sources_in_order() {
        let registry = SourceRegistry::from_xml(config::TWO_SOURCES).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["vmap0", "nexrad"]);

        let nexrad = registry.get("nexrad").unwrap();
        assert_eq!(nexrad.name(), "nexrad");
        assert_eq!(nexrad.source_type(), SourceType::Wms);
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_single_source_document() {
        let root = ConfigNode::parse_str(config::WMS_SOURCE).unwrap();
        let wrapped = ConfigNode::new("tilecache").with_child(root);
        let registry = SourceRegistry::from_config(&wrapped).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["vmap0"]);
    }

    #[test]
    fn test_reports_every_problem() {
        let errors = SourceRegistry::from_xml(config::BROKEN_SOURCES)
            .err()
            .unwrap();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "wms source nourl has no url".to_string(),
                "wms source nothing has no url".to_string(),
                "wms source nothing has no LAYERS".to_string(),
                "invalid configuration: source element has no name attribute".to_string(),
                "invalid configuration: source gdal has unknown type: gdal".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_names() {
        let xml = r#"<tilecache>
  <source name="a" type="wms"><url>http://x</url><wmsparams><LAYERS>l</LAYERS></wmsparams></source>
  <source name="a" type="wms"><url>http://y</url><wmsparams><LAYERS>l</LAYERS></wmsparams></source>
</tilecache>"#;
        let errors = SourceRegistry::from_xml(xml).err().unwrap();
        assert_eq!(errors.to_string(), "invalid configuration: duplicate source name: a");
    }

    #[test]
    fn test_duplicate_of_broken_source() {
        let xml = r#"<tilecache>
  <source name="a" type="wms"><url>http://x</url></source>
  <source name="a" type="wms"><url>http://y</url><wmsparams><LAYERS>l</LAYERS></wmsparams></source>
</tilecache>"#;
        let errors = SourceRegistry::from_xml(xml).err().unwrap();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "wms source a has no LAYERS".to_string(),
                "invalid configuration: duplicate source name: a".to_string(),
            ]
        );
    }

    #[test]
    fn test_hand_built_config() {
        let root = ConfigNode::new("tilecache")
            .with_child(
                ConfigNode::new("source")
                    .with_attribute("name", "osm")
                    .with_attribute("type", "WMS")
                    .with_child(ConfigNode::new("url").with_text("http://osm.example/wms"))
                    .with_child(
                        ConfigNode::new("wmsparams")
                            .with_child(ConfigNode::new("LAYERS").with_text("osm")),
                    ),
            )
            .with_child(ConfigNode::new("cache").with_attribute("name", "disk"));

        let registry = SourceRegistry::from_config(&root).unwrap();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["osm"]);
        assert_eq!(registry.get("osm").unwrap().source_type(), SourceType::Wms);
    }

    #[test]
    fn test_missing_type() {
        let xml = r#"<tilecache><source name="a"/></tilecache>"#;
        let errors = SourceRegistry::from_xml(xml).err().unwrap();
        assert_eq!(errors.to_string(), "invalid configuration: source a has no type attribute");
    }

    #[test]
    fn test_malformed_xml() {
        let errors = SourceRegistry::from_xml("<tilecache><source>").err().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().all(SourceError::is_configuration));
    }
}
