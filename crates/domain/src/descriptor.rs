//! Index and constraint descriptors.
//!
//! An [`IndexDescriptor`] is one entry of the database's schema catalog: either a
//! plain secondary index or a uniqueness constraint (which the engine backs with
//! an index of the same name). Descriptors are read from the live catalog or from
//! a dump file.
//!
//! The serialized shape is the dump file format: one camelCase JSON object per
//! line, e.g.
//!
//! ```json
//! {"id":3,"name":"person_name","state":"ONLINE","populationPercent":100.0,
//!  "uniqueness":false,"type":"BTREE","entityType":"NODE",
//!  "labelsOrTypes":["Person"],"properties":["name"],"indexProvider":"native-btree-1.0"}
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

/// Provider used when a dump file carries no (or a blank) provider.
pub const DEFAULT_INDEX_PROVIDER: &str = "native-btree-1.0";

/// Provider substituted by `dump --lucene` for indexes covering selected properties.
pub const ALTERNATE_INDEX_PROVIDER: &str = "lucene+native-3.0";

/// Whether a descriptor is a plain index or a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
    PlainIndex,
    UniquenessConstraint,
}

impl IndexKind {
    /// Cypher keyword used by `CREATE`/`DROP` statements.
    pub fn keyword(&self) -> &'static str {
        match self {
            IndexKind::PlainIndex => "INDEX",
            IndexKind::UniquenessConstraint => "CONSTRAINT",
        }
    }
}

/// The kind of graph entity a descriptor applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    #[default]
    Node,
    Relationship,
}

impl EntityType {
    /// Parse the `entityType` column of the index catalog.
    pub fn from_catalog(value: &str) -> Self {
        if value.eq_ignore_ascii_case("RELATIONSHIP") {
            EntityType::Relationship
        } else {
            EntityType::Node
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Node => write!(f, "NODE"),
            EntityType::Relationship => write!(f, "RELATIONSHIP"),
        }
    }
}

/// One index or uniqueness constraint of the schema catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    /// Database-assigned id. Not stable across instances; display only.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    /// Stable, user-visible name. Key for skip and resume logic.
    pub name: String,
    /// Live-only build state; meaningless when read from a file.
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    /// Live-only population progress; meaningless when read from a file.
    #[serde(default, deserialize_with = "null_as_default")]
    pub population_percent: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub uniqueness: bool,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub index_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub entity_type: EntityType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels_or_types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Vec<String>,
    #[serde(default = "default_provider", deserialize_with = "provider_or_default")]
    pub index_provider: String,
}

fn default_provider() -> String {
    DEFAULT_INDEX_PROVIDER.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn provider_or_default<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(default_provider))
}

impl IndexDescriptor {
    /// A plain node index on `label` covering `properties`.
    pub fn index(
        name: impl Into<String>,
        label: impl Into<String>,
        properties: &[&str],
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            state: String::new(),
            population_percent: 0.0,
            uniqueness: false,
            index_type: "BTREE".to_string(),
            entity_type: EntityType::Node,
            labels_or_types: vec![label.into()],
            properties: properties.iter().map(|p| p.to_string()).collect(),
            index_provider: default_provider(),
        }
    }

    /// A node uniqueness constraint on `label`.`property`.
    pub fn unique_constraint(
        name: impl Into<String>,
        label: impl Into<String>,
        property: impl Into<String>,
    ) -> Self {
        Self {
            uniqueness: true,
            properties: vec![property.into()],
            ..Self::index(name, label, &[])
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_labels(mut self, labels: &[&str]) -> Self {
        self.labels_or_types = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn with_entity_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = entity_type;
        self
    }

    pub fn with_index_type(mut self, index_type: impl Into<String>) -> Self {
        self.index_type = index_type.into();
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.index_provider = provider.into();
        self
    }

    pub fn with_live_state(mut self, state: impl Into<String>, population_percent: f64) -> Self {
        self.state = state.into();
        self.population_percent = population_percent;
        self
    }

    pub fn kind(&self) -> IndexKind {
        if self.uniqueness {
            IndexKind::UniquenessConstraint
        } else {
            IndexKind::PlainIndex
        }
    }

    pub fn first_label(&self) -> Option<&str> {
        self.labels_or_types.first().map(String::as_str)
    }

    pub fn first_property(&self) -> Option<&str> {
        self.properties.first().map(String::as_str)
    }

    /// Spans more than one label/type; row counts are ambiguous for these.
    pub fn is_multi_label(&self) -> bool {
        self.labels_or_types.len() > 1
    }

    /// Why this descriptor can never be submitted for creation, if it can't.
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if self.labels_or_types.is_empty() {
            Some("no label or relationship type")
        } else if self.properties.is_empty() {
            Some("no properties")
        } else {
            None
        }
    }

    /// [`DomainError::Validation`] naming this descriptor if it cannot be created.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self.invalid_reason() {
            Some(reason) => Err(DomainError::validation(format!(
                "descriptor '{}' has {reason}",
                self.name
            ))),
            None => Ok(()),
        }
    }

    /// Has at least one label/type and one property.
    pub fn is_buildable(&self) -> bool {
        self.invalid_reason().is_none()
    }

    /// True if any covered property is in `properties`.
    pub fn covers_any(&self, properties: &HashSet<String>) -> bool {
        self.properties.iter().any(|p| properties.contains(p))
    }
}

impl fmt::Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} on {}:[{}]({})",
            self.kind().keyword().to_lowercase(),
            self.name,
            self.entity_type,
            self.labels_or_types.join(","),
            self.properties.join(",")
        )
    }
}

/// Canonical catalog order.
///
/// Uniqueness constraints come first, then descriptors are ordered by declared
/// type, then by label set (fewer labels first, then the sorted label lists
/// lexicographically), then by name. The order is total for distinct names, so
/// repeated reads of an unchanged catalog always sort identically.
pub fn canonical_cmp(a: &IndexDescriptor, b: &IndexDescriptor) -> Ordering {
    b.uniqueness
        .cmp(&a.uniqueness)
        .then_with(|| a.index_type.cmp(&b.index_type))
        .then_with(|| compare_labels(&a.labels_or_types, &b.labels_or_types))
        .then_with(|| a.name.cmp(&b.name))
}

fn compare_labels(a: &[String], b: &[String]) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| {
        let mut a_sorted: Vec<&String> = a.iter().collect();
        let mut b_sorted: Vec<&String> = b.iter().collect();
        a_sorted.sort();
        b_sorted.sort();
        a_sorted.cmp(&b_sorted)
    })
}

/// Sort descriptors into [`canonical_cmp`] order.
pub fn sort_canonical(descriptors: &mut [IndexDescriptor]) {
    descriptors.sort_by(canonical_cmp);
}
