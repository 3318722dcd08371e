pub mod date;
pub mod memory;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

pub use date::GedcomDate;
pub use memory::MemoryTreeStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read tree data: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tree data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate tree id: {0}")]
    DuplicateTree(u32),
}

/// Sex of an individual, as recorded in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Sex {
    M,
    F,
    U,
}

impl Default for Sex {
    fn default() -> Self {
        Sex::U
    }
}

impl Sex {
    pub fn code(&self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
            Sex::U => "U",
        }
    }
}

/// A dated, located life event (birth, death, marriage).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    pub date: Option<GedcomDate>,
    pub place: Option<String>,
}

/// An individual in a tree. Identified by xref within the tree.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRecord {
    pub xref: String,
    pub name: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub birth: Option<Event>,
    #[serde(default)]
    pub death: Option<Event>,
}

/// A family union. Spouses and children are xref references into the same
/// tree; any of them may be absent or dangling.
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyRecord {
    pub xref: String,
    #[serde(default)]
    pub husband: Option<String>,
    #[serde(default)]
    pub wife: Option<String>,
    #[serde(default)]
    pub marriage: Option<Event>,
    #[serde(default)]
    pub children: Vec<String>,
}

/// One genealogical tree: ordered collections of persons and families.
#[derive(Debug, Deserialize)]
pub struct Tree {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub individuals: Vec<PersonRecord>,
    #[serde(default)]
    pub families: Vec<FamilyRecord>,
    #[serde(skip)]
    person_index: HashMap<String, usize>,
}

impl Tree {
    /// Build the xref lookup index. Called once after deserialization.
    fn index(&mut self) {
        self.person_index = self
            .individuals
            .iter()
            .enumerate()
            .map(|(i, p)| (p.xref.clone(), i))
            .collect();
    }

    /// Look up an individual by xref.
    pub fn person(&self, xref: &str) -> Option<&PersonRecord> {
        self.person_index.get(xref).map(|&i| &self.individuals[i])
    }
}

/// Read access to the tree collection backing the API.
///
/// The API only ever resolves a tree by id and walks its collections; how
/// trees are stored is this trait's concern, so tests can swap in a seeded
/// store and a future backend can page records out of a database.
#[async_trait]
pub trait TreeStore: Send + Sync {
    async fn find_tree(&self, id: u32) -> Result<Option<Arc<Tree>>, StoreError>;
    async fn tree_count(&self) -> Result<usize, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_lookup_by_xref() {
        let mut tree: Tree = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "smoke",
            "individuals": [
                {"xref": "I1", "name": "Ada Byron", "sex": "F"},
                {"xref": "I2", "name": "William King", "sex": "M"}
            ]
        }))
        .unwrap();
        tree.index();

        assert_eq!(tree.person("I2").unwrap().name, "William King");
        assert!(tree.person("I9").is_none());
    }

    #[test]
    fn test_family_defaults_are_empty() {
        let family: FamilyRecord =
            serde_json::from_value(serde_json::json!({"xref": "F1"})).unwrap();
        assert!(family.husband.is_none());
        assert!(family.wife.is_none());
        assert!(family.marriage.is_none());
        assert!(family.children.is_empty());
    }

    #[test]
    fn test_sex_defaults_to_unknown() {
        let person: PersonRecord =
            serde_json::from_value(serde_json::json!({"xref": "I1", "name": "N. N."})).unwrap();
        assert_eq!(person.sex, Sex::U);
        assert_eq!(person.sex.code(), "U");
    }
}
