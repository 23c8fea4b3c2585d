use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::clauses::InstanceConfigs;
use crate::taxonomy::{instance_id_of, FilterInstanceConfig, Taxonomy};

pub const LIST_BLOCK: &str = "core/query";

/// Anything with ordered children that can be searched.
pub trait Node: Sized {
    fn children(&self) -> &[Self];
}

/// Collects the descendants of `root` matching `predicate`, depth first and
/// in document order. A match is taken as a whole; its own descendants are
/// not searched. `root` itself is never tested.
pub fn collect_matching<'n, N, P>(root: &'n N, predicate: &P) -> Vec<&'n N>
where
    N: Node,
    P: Fn(&N) -> bool,
{
    let mut found = Vec::new();
    for child in root.children() {
        if predicate(child) {
            found.push(child);
        } else {
            found.extend(collect_matching(child, predicate));
        }
    }
    found
}

// ------------- Block -------------
/// A parsed host block.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub block_name: Option<String>,
    #[serde(default)]
    pub attrs: Map<String, Value>,
    #[serde(default)]
    pub inner_blocks: Vec<Block>,
}

impl Node for Block {
    fn children(&self) -> &[Block] {
        &self.inner_blocks
    }
}

impl Block {
    pub fn new(name: &str) -> Self {
        Self {
            block_name: Some(name.to_string()),
            ..Self::default()
        }
    }
    pub fn with_attr(mut self, key: &str, value: Value) -> Self {
        self.attrs.insert(key.to_string(), value);
        self
    }
    pub fn with_child(mut self, child: Block) -> Self {
        self.inner_blocks.push(child);
        self
    }
    pub fn is(&self, name: &str) -> bool {
        self.block_name.as_deref() == Some(name)
    }
    /// Reads the block's attributes as a filter configuration.
    pub fn filter_config(&self) -> Option<FilterInstanceConfig> {
        serde_json::from_value(Value::Object(self.attrs.clone())).ok()
    }
}

// ------------- List block -------------
/// A list block that accepts injected filter clauses: client side pagination
/// switched on and a stable query id present.
#[derive(Debug)]
pub struct ListBlock<'b> {
    block: &'b Block,
    query_id: u64,
}

impl<'b> ListBlock<'b> {
    pub fn from_block(block: &'b Block) -> Option<Self> {
        if !block.is(LIST_BLOCK) {
            return None;
        }
        if block.attrs.get("enhancedPagination") != Some(&Value::Bool(true)) {
            return None;
        }
        let query_id = block.attrs.get("queryId").and_then(instance_id_of)?;
        Some(Self { block, query_id })
    }
    pub fn query_id(&self) -> u64 {
        self.query_id
    }
    /// Maps every nested filter block's instance id to its taxonomy. Filter
    /// blocks missing either attribute are left out; a repeated instance id
    /// keeps the last block.
    pub fn instance_configs(&self, filter_block: &str) -> InstanceConfigs {
        collect_matching(self.block, &|b: &Block| b.is(filter_block))
            .into_iter()
            .filter_map(|b| {
                let instance_id = b.attrs.get("instanceId").and_then(instance_id_of)?;
                let taxonomy = b.attrs.get("selectedTaxonomyType")?.as_str()?;
                Some((instance_id, Taxonomy::from(taxonomy)))
            })
            .collect()
    }
}
