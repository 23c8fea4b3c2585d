// used to (de)serialize the design-time attributes persisted with a page
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// used to print out readable forms of a taxonomy
use std::fmt;

// lookup maps and dedup sets are keyed by small ids or slugs
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;

// ------------- Identifiers -------------
pub type TermId = u64;
pub type InstanceId = u64;

pub type IdHasher = BuildHasherDefault<SeaHasher>;

/// Reads an instance id the way hosts persist it: either a JSON number or a
/// string holding digits.
pub fn instance_id_of(value: &Value) -> Option<InstanceId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<InstanceId>().ok(),
        _ => None,
    }
}

fn deserialize_instance_id<'de, D>(deserializer: D) -> Result<Option<InstanceId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(instance_id_of))
}

// ------------- Taxonomy -------------
/// A named term namespace. Serialized as its slug, so `category` and
/// `post_tag` stay wire compatible with what the host stores.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Taxonomy {
    Category,
    Tag,
    Other(String),
}

impl Taxonomy {
    pub const CATEGORY: &'static str = "category";
    pub const TAG: &'static str = "post_tag";

    pub fn slug(&self) -> &str {
        match self {
            Taxonomy::Category => Self::CATEGORY,
            Taxonomy::Tag => Self::TAG,
            Taxonomy::Other(slug) => slug,
        }
    }
    pub fn is_hierarchical(&self) -> bool {
        matches!(self, Taxonomy::Category)
    }
    // an unconfigured control carries an empty slug until normalized
    pub fn is_unset(&self) -> bool {
        self.slug().is_empty()
    }
}
impl Default for Taxonomy {
    fn default() -> Self {
        Taxonomy::Other(String::new())
    }
}
impl From<String> for Taxonomy {
    fn from(slug: String) -> Self {
        match slug.as_str() {
            Self::CATEGORY => Taxonomy::Category,
            Self::TAG => Taxonomy::Tag,
            _ => Taxonomy::Other(slug),
        }
    }
}
impl From<&str> for Taxonomy {
    fn from(slug: &str) -> Self {
        Taxonomy::from(slug.to_string())
    }
}
impl From<Taxonomy> for String {
    fn from(taxonomy: Taxonomy) -> Self {
        taxonomy.slug().to_string()
    }
}
impl fmt::Display for Taxonomy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

// ------------- Term -------------
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRecord {
    pub id: TermId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub parent_id: Option<TermId>,
}

impl TermRecord {
    pub fn new(id: TermId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            slug: name.to_lowercase().replace(' ', "-"),
            parent_id: None,
        }
    }
    pub fn child_of(mut self, parent: TermId) -> Self {
        self.parent_id = Some(parent);
        self
    }
}

/// Which label of a term a user-entered token is compared against.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum NameField {
    #[default]
    Name,
    Slug,
}

impl NameField {
    pub fn of<'t>(&self, term: &'t TermRecord) -> &'t str {
        match self {
            NameField::Name => &term.name,
            NameField::Slug => &term.slug,
        }
    }
}

// ------------- Filter instance -------------
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Select,
    Checkboxes,
}

impl InputType {
    pub fn is_multi(&self) -> bool {
        matches!(self, InputType::Checkboxes)
    }
}

/// Design-time configuration of one filter control. Field names on the wire
/// are the attribute names the host persists with the page.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterInstanceConfig {
    #[serde(default, deserialize_with = "deserialize_instance_id")]
    pub instance_id: Option<InstanceId>,
    #[serde(rename = "selectedTaxonomyType", default)]
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default)]
    pub child_only: bool,
    #[serde(rename = "allTags", default)]
    pub include_all_terms: bool,
    #[serde(rename = "selectedTerms", default)]
    pub selected_term_ids: Vec<TermId>,
}

impl FilterInstanceConfig {
    pub fn new(instance_id: InstanceId, taxonomy: Taxonomy) -> Self {
        Self {
            instance_id: Some(instance_id),
            taxonomy,
            ..Self::default()
        }
    }
    /// Fills in what a freshly placed control is missing: the taxonomy
    /// falls back to categories and the instance takes `fresh_instance_id`.
    /// Returns true when anything changed.
    pub fn normalize(&mut self, fresh_instance_id: InstanceId) -> bool {
        let mut changed = false;
        if self.taxonomy.is_unset() {
            self.taxonomy = Taxonomy::Category;
            changed = true;
        }
        if self.instance_id.is_none() {
            self.instance_id = Some(fresh_instance_id);
            changed = true;
        }
        changed
    }
    // term ids belong to one namespace, so they cannot survive a switch
    pub fn set_taxonomy(&mut self, taxonomy: Taxonomy) {
        if self.taxonomy != taxonomy {
            self.selected_term_ids.clear();
        }
        self.taxonomy = taxonomy;
    }
    pub fn wants_children(&self) -> bool {
        self.child_only && self.taxonomy.is_hierarchical()
    }
    pub fn offers_all_terms(&self) -> bool {
        self.include_all_terms && !self.taxonomy.is_hierarchical()
    }
}
