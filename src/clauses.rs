//! Request side of the filter: turns the term parameters of an incoming
//! request into taxonomy clauses for the list's query.
//!
//! Nothing here looks terms up. Term ids travel as the strings found in the
//! URL and the list query engine decides what to do with ids it does not
//! know.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::sync::{self, parse_term_parameter};
use crate::taxonomy::{IdHasher, InstanceId, Taxonomy};
use crate::tree::{Block, ListBlock};

/// Instance id -> taxonomy of every filter placed in one list.
pub type InstanceConfigs = HashMap<InstanceId, Taxonomy, IdHasher>;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TaxonomyClause {
    pub taxonomy: Taxonomy,
    pub terms: Vec<String>,
    pub include_children: bool,
}

impl TaxonomyClause {
    pub fn new(taxonomy: Taxonomy, terms: Vec<String>) -> Self {
        Self { taxonomy, terms, include_children: false }
    }
    fn to_value(&self) -> Value {
        json!({
            "taxonomy": self.taxonomy.slug(),
            "terms": self.terms,
            "include_children": self.include_children,
        })
    }
}

#[derive(Clone, Debug)]
pub struct ListQueryContext {
    pub list_id: String,
    pub request_parameters: Vec<(String, String)>,
}

impl ListQueryContext {
    pub fn new(list_id: &str, request_parameters: Vec<(String, String)>) -> Self {
        Self {
            list_id: list_id.to_string(),
            request_parameters,
        }
    }
    /// Takes the parameters from a raw, still encoded query string.
    pub fn from_query(list_id: &str, query: &str) -> Self {
        let parameters = url::form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self::new(list_id, parameters)
    }
}

/// One clause per term parameter of this list whose instance is known,
/// in request order. Everything else is ignored.
pub fn build(context: &ListQueryContext, configs: &InstanceConfigs) -> Vec<TaxonomyClause> {
    let mut clauses = Vec::new();
    for (name, value) in &context.request_parameters {
        let Some((list, instance_id)) = parse_term_parameter(name) else {
            continue;
        };
        if list != context.list_id {
            continue;
        }
        let Some(taxonomy) = configs.get(&instance_id) else {
            debug!(parameter=%name, "no filter with this instance id");
            continue;
        };
        if value.is_empty() {
            continue;
        }
        // no trimming, empty pieces stay
        let terms = value.split(',').map(str::to_string).collect();
        clauses.push(TaxonomyClause::new(taxonomy.clone(), terms));
    }
    clauses
}

/// Appends `clauses` to the `tax_query` entry of a list's query vars,
/// creating it when missing.
pub fn inject_clauses(query_vars: &mut Map<String, Value>, clauses: &[TaxonomyClause]) {
    let tax_query = query_vars
        .entry("tax_query")
        .or_insert_with(|| Value::Array(Vec::new()));
    match tax_query {
        Value::Array(existing) => existing.extend(clauses.iter().map(TaxonomyClause::to_value)),
        // keyed form, e.g. with a "relation" entry next to numbered clauses
        Value::Object(existing) => {
            let mut next = existing
                .keys()
                .filter_map(|k| k.parse::<usize>().ok())
                .max()
                .map_or(0, |last| last + 1);
            for clause in clauses {
                existing.insert(next.to_string(), clause.to_value());
                next += 1;
            }
        }
        other => *other = Value::Array(clauses.iter().map(TaxonomyClause::to_value).collect()),
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Injection {
    pub list_id: String,
    pub clauses: Vec<TaxonomyClause>,
}

/// Everything the host needs to filter one list block for one request.
/// `None` when the block does not take injected clauses at all.
pub fn plan_injection(block: &Block, query: &str, list_prefix: &str, filter_block: &str) -> Option<Injection> {
    let list = ListBlock::from_block(block)?;
    let list_id = sync::list_id(list_prefix, list.query_id());
    let configs = list.instance_configs(filter_block);
    let context = ListQueryContext::from_query(&list_id, query);
    let clauses = build(&context, &configs);
    Some(Injection { list_id, clauses })
}
