//! Session-scoped category and consequence registries.
//!
//! Both registries are append-only while a session lives. Category order is
//! the seed order followed by new categories in the order they were first
//! seen; `reset` is the only way back to the seed.

use crate::config::ViewerConfig;
use crate::error::Result;
use indexmap::IndexSet;
use lazy_static::lazy_static;
use protvista_protocol::{CategoryDescriptor, VisualizationType};
use std::fs;
use tracing::info;

const RUNTIME_CATEGORIES_PATH: &str = "data/resources/categories.json";
const BUILTIN_CATEGORIES_JSON: &str = include_str!("../assets/categories.json");

lazy_static! {
    static ref DEFAULT_CATEGORIES: Vec<CategoryDescriptor> = load_default_categories();
}

pub fn parse_categories(json_text: &str) -> Result<Vec<CategoryDescriptor>> {
    Ok(serde_json::from_str(json_text)?)
}

fn load_default_categories() -> Vec<CategoryDescriptor> {
    if let Ok(text) = fs::read_to_string(RUNTIME_CATEGORIES_PATH) {
        if let Ok(custom) = parse_categories(&text) {
            if !custom.is_empty() {
                return custom;
            }
        }
    }
    parse_categories(BUILTIN_CATEGORIES_JSON).unwrap_or_default()
}

pub fn default_categories() -> &'static [CategoryDescriptor] {
    &DEFAULT_CATEGORIES
}

/// `"NEW_THING"` -> `"New thing"`.
pub fn convert_name_to_label(name: &str) -> String {
    let spaced = name.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRegistry {
    descriptors: Vec<CategoryDescriptor>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self::seeded()
    }
}

impl CategoryRegistry {
    pub fn seeded() -> Self {
        Self::from_descriptors(default_categories().to_vec())
    }

    pub fn from_descriptors(descriptors: Vec<CategoryDescriptor>) -> Self {
        let mut ret = Self {
            descriptors: Vec::with_capacity(descriptors.len()),
        };
        ret.add_categories(descriptors);
        ret
    }

    /// A descriptor for a category seen in data but not registered yet.
    pub fn descriptor_for_unknown(name: &str) -> CategoryDescriptor {
        CategoryDescriptor {
            name: name.to_string(),
            label: convert_name_to_label(name),
            visualization_type: VisualizationType::Basic,
        }
    }

    pub fn descriptors(&self) -> &[CategoryDescriptor] {
        &self.descriptors
    }

    pub fn names_in_order(&self) -> Vec<&str> {
        self.descriptors.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.descriptors.iter().any(|d| d.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&CategoryDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Appends descriptors whose names are not registered yet and returns
    /// how many were added.
    pub fn add_categories(&mut self, descriptors: Vec<CategoryDescriptor>) -> usize {
        let before = self.descriptors.len();
        for descriptor in descriptors {
            if !self.contains(&descriptor.name) {
                self.descriptors.push(descriptor);
            }
        }
        let added = self.descriptors.len() - before;
        if added > 0 {
            info!(
                added,
                total = self.descriptors.len(),
                "Registered new feature categories"
            );
        }
        added
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsequenceRegistry {
    types: IndexSet<String>,
}

impl ConsequenceRegistry {
    /// Returns `true` when `consequence` was not known before.
    pub fn add(&mut self, consequence: &str) -> bool {
        if self.types.contains(consequence) {
            return false;
        }
        self.types.insert(consequence.to_string())
    }

    pub fn contains(&self, consequence: &str) -> bool {
        self.types.contains(consequence)
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// State shared by every pipeline call of one viewer instance.
#[derive(Debug, Clone, Default)]
pub struct Session {
    config: ViewerConfig,
    pub categories: CategoryRegistry,
    pub consequences: ConsequenceRegistry,
}

impl Session {
    pub fn init(config: ViewerConfig) -> Self {
        Self {
            config,
            categories: CategoryRegistry::seeded(),
            consequences: ConsequenceRegistry::default(),
        }
    }

    pub fn reset(&mut self) {
        self.categories = CategoryRegistry::seeded();
        self.consequences = ConsequenceRegistry::default();
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn is_external_source(&self, source: Option<&str>) -> bool {
        self.config.is_external_source(source)
    }
}
