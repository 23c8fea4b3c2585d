use crate::catalog::{Lookup, TermCatalog, TermQuery};
use crate::taxonomy::{Taxonomy, TermId, TermRecord};

/// Computes the terms a control offers for the configured `selected` ids.
///
/// Without `child_only` this is the selected terms themselves, in the order
/// they were selected; ids the catalog no longer knows are skipped. With
/// `child_only` it is the direct children of every selected id, one fetch
/// per parent, concatenated parent by parent. Children reachable from two
/// parents show up twice.
///
/// Any fetch still loading makes the whole expansion pending.
pub fn expand<C>(catalog: &C, taxonomy: &Taxonomy, selected: &[TermId], child_only: bool) -> Lookup<Vec<TermRecord>>
where
    C: TermCatalog + ?Sized,
{
    if selected.is_empty() {
        return Lookup::Ready(Vec::new());
    }
    if !child_only {
        return catalog
            .fetch(taxonomy, &TermQuery::Include(selected.to_vec()))
            .map(|found| {
                selected
                    .iter()
                    .filter_map(|id| found.iter().find(|t| t.id == *id).cloned())
                    .collect()
            });
    }
    let mut children = Vec::new();
    for parent in selected {
        match catalog.fetch(taxonomy, &TermQuery::ChildrenOf(*parent)) {
            Lookup::Pending => return Lookup::Pending,
            Lookup::Ready(found) => children.extend(found),
        }
    }
    Lookup::Ready(children)
}
