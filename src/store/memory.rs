use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::{StoreError, Tree, TreeStore};

#[derive(Debug, Deserialize)]
struct TreeFile {
    trees: Vec<Tree>,
}

/// Tree store backed by a JSON file loaded once at startup.
///
/// Record order inside each tree is the file order, which is what the API's
/// pagination windows over. The store is immutable after load; the admin path
/// replaces the file and restarts the server.
#[derive(Debug)]
pub struct MemoryTreeStore {
    trees: HashMap<u32, Arc<Tree>>,
}

impl MemoryTreeStore {
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        let file: TreeFile = serde_json::from_str(raw)?;

        let mut trees = HashMap::with_capacity(file.trees.len());
        for mut tree in file.trees {
            tree.index();
            let id = tree.id;
            if trees.insert(id, Arc::new(tree)).is_some() {
                return Err(StoreError::DuplicateTree(id));
            }
        }

        Ok(Self { trees })
    }
}

#[async_trait]
impl TreeStore for MemoryTreeStore {
    async fn find_tree(&self, id: u32) -> Result<Option<Arc<Tree>>, StoreError> {
        Ok(self.trees.get(&id).cloned())
    }

    async fn tree_count(&self) -> Result<usize, StoreError> {
        Ok(self.trees.len())
    }
}
