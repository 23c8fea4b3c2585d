use serde::Serialize;
use tracing::debug;

use crate::catalog::{Lookup, TermCatalog, TermQuery};
use crate::expander::expand;
use crate::sync::{checkbox_group, split_values, term_parameter};
use crate::taxonomy::{FilterInstanceConfig, InputType, TermId, TermRecord};

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct FilterOption {
    pub id: TermId,
    pub name: String,
    pub selected: bool,
}

/// Everything needed to draw one filter control for the current request.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct FilterView {
    pub label: String,
    pub input_type: InputType,
    pub param_name: String,
    pub group_name: String,
    pub options: Vec<FilterOption>,
    pub selected: Vec<TermId>,
}

/// Coerces a raw URL token to a term id; anything not a non-negative
/// integer reads as 0.
fn term_id_of(raw: &str) -> TermId {
    raw.trim().parse::<TermId>().unwrap_or(0)
}

/// The terms a configured control offers, before any URL state is applied.
pub fn offered_terms<C>(config: &FilterInstanceConfig, catalog: &C) -> Lookup<Vec<TermRecord>>
where
    C: TermCatalog + ?Sized,
{
    if config.wants_children() {
        expand(catalog, &config.taxonomy, &config.selected_term_ids, true)
    } else if config.offers_all_terms() {
        catalog.fetch(&config.taxonomy, &TermQuery::All)
    } else {
        expand(catalog, &config.taxonomy, &config.selected_term_ids, false)
    }
}

/// Assembles the view for `config` inside list `list_id`, marking options
/// that the request's term parameter selects.
pub fn assemble<C>(
    config: &FilterInstanceConfig,
    list_prefix: &str,
    list_id: &str,
    catalog: &C,
    request_parameters: &[(String, String)],
) -> Lookup<FilterView>
where
    C: TermCatalog + ?Sized,
{
    let instance_id = config.instance_id.unwrap_or_default();
    let param_name = term_parameter(list_id, instance_id);
    let selected: Vec<TermId> = request_parameters
        .iter()
        .find(|(k, _)| *k == param_name)
        .map(|(_, v)| split_values(v).iter().map(|raw| term_id_of(raw)).collect())
        .unwrap_or_default();
    let terms = match offered_terms(config, catalog) {
        Lookup::Pending => {
            debug!(instance = instance_id, "term catalog still loading");
            return Lookup::Pending;
        }
        Lookup::Ready(terms) => terms,
    };
    let options = terms
        .into_iter()
        .map(|t| FilterOption {
            selected: selected.contains(&t.id),
            id: t.id,
            name: t.name,
        })
        .collect();
    Lookup::Ready(FilterView {
        label: config.label.clone(),
        input_type: config.input_type,
        param_name,
        group_name: checkbox_group(list_prefix, instance_id),
        options,
        selected,
    })
}
