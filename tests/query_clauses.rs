use serde_json::{json, Map, Value};

use taxfilter::clauses::{build, inject_clauses, plan_injection, InstanceConfigs, ListQueryContext, TaxonomyClause};
use taxfilter::taxonomy::Taxonomy;
use taxfilter::tree::{collect_matching, Block, ListBlock};

const FILTER: &str = "ctlt/query-taxonomy-filter";

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn category_at(instance: u64) -> InstanceConfigs {
    let mut configs = InstanceConfigs::default();
    configs.insert(instance, Taxonomy::Category);
    configs
}

fn filter(instance: Value, taxonomy: &str) -> Block {
    Block::new(FILTER)
        .with_attr("instanceId", instance)
        .with_attr("selectedTaxonomyType", json!(taxonomy))
}

fn listing() -> Block {
    Block::new("core/query")
        .with_attr("queryId", json!(3))
        .with_attr("enhancedPagination", json!(true))
        .with_child(
            Block::new("core/group")
                .with_child(filter(json!(1), "category"))
                .with_child(Block::new("core/columns").with_child(filter(json!("2"), "post_tag"))),
        )
        .with_child(Block::new(FILTER).with_attr("instanceId", json!(5)))
        .with_child(Block::new("core/post-template"))
}

#[test]
fn comma_value_becomes_one_clause() {
    let context = ListQueryContext::new("list", params(&[("list-term-2", "7,9")]));
    let clauses = build(&context, &category_at(2));
    assert_eq!(
        clauses,
        vec![TaxonomyClause { taxonomy: Taxonomy::Category, terms: vec!["7".into(), "9".into()], include_children: false }]
    );
}

#[test]
fn foreign_parameters_are_ignored() {
    let context = ListQueryContext::new(
        "list",
        params(&[("other-term-2", "5"), ("list-term-8", "1"), ("list-page", "2"), ("list-term-", "4"), ("list-term-2", "")]),
    );
    assert!(build(&context, &category_at(2)).is_empty());
}

#[test]
fn malformed_ids_pass_through() {
    let context = ListQueryContext::from_query("list", "?list-term-2=abc%2C-4%2C7");
    let clauses = build(&context, &category_at(2));
    assert_eq!(clauses[0].terms, vec!["abc", "-4", "7"]);
}

#[test]
fn one_clause_per_filter_in_request_order() {
    let mut configs = category_at(2);
    configs.insert(4, Taxonomy::Tag);
    let context = ListQueryContext::from_query("query-3", "query-3-term-4=20&x=1&query-3-term-2=7");
    let clauses = build(&context, &configs);
    let taxonomies: Vec<&str> = clauses.iter().map(|c| c.taxonomy.slug()).collect();
    assert_eq!(taxonomies, vec!["post_tag", "category"]);
}

#[test]
fn tree_walk_stops_at_matches() {
    let root = Block::new("root")
        .with_child(Block::new("a").with_child(Block::new("b")))
        .with_child(Block::new("c").with_child(Block::new("a")));
    let found = collect_matching(&root, &|b: &Block| b.is("a"));
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|b| b.is("a")));
    assert!(collect_matching(&root, &|b: &Block| b.is("root")).is_empty());
}

#[test]
fn list_block_maps_nested_filters() {
    let block = listing();
    let list = ListBlock::from_block(&block).expect("injectable");
    assert_eq!(list.query_id(), 3);
    let configs = list.instance_configs(FILTER);
    assert_eq!(configs.len(), 2);
    assert_eq!(configs.get(&1), Some(&Taxonomy::Category));
    assert_eq!(configs.get(&2), Some(&Taxonomy::Tag));
}

#[test]
fn only_enhanced_lists_with_an_id_take_clauses() {
    let plain = Block::new("core/query").with_attr("queryId", json!(3));
    assert!(ListBlock::from_block(&plain).is_none());
    let anonymous = Block::new("core/query").with_attr("enhancedPagination", json!(true));
    assert!(ListBlock::from_block(&anonymous).is_none());
    let other = Block::new("core/group")
        .with_attr("queryId", json!(3))
        .with_attr("enhancedPagination", json!(true));
    assert!(plan_injection(&other, "query-3-term-1=4", "query", FILTER).is_none());
}

#[test]
fn injection_plan_from_parsed_blocks() {
    let parsed: Block = serde_json::from_value(json!({
        "blockName": "core/query",
        "attrs": {"queryId": 3, "enhancedPagination": true},
        "innerBlocks": [
            {"blockName": FILTER, "attrs": {"instanceId": 1, "selectedTaxonomyType": "category"}, "innerBlocks": []}
        ]
    }))
    .unwrap();
    let injection = plan_injection(&parsed, "query-3-term-1=4%2C5&query-3-page=2", "query", FILTER).unwrap();
    assert_eq!(injection.list_id, "query-3");
    assert_eq!(injection.clauses, vec![TaxonomyClause::new(Taxonomy::Category, vec!["4".into(), "5".into()])]);
}

#[test]
fn clauses_join_existing_tax_query() {
    let clauses = vec![TaxonomyClause::new(Taxonomy::Tag, vec!["20".into()])];

    let mut fresh = Map::new();
    inject_clauses(&mut fresh, &clauses);
    assert_eq!(fresh["tax_query"], json!([{"taxonomy": "post_tag", "terms": ["20"], "include_children": false}]));

    let mut keyed: Map<String, Value> = serde_json::from_value(json!({
        "post_type": "post",
        "tax_query": {"relation": "AND", "0": {"taxonomy": "category", "terms": [1]}}
    }))
    .unwrap();
    inject_clauses(&mut keyed, &clauses);
    assert_eq!(keyed["tax_query"]["1"]["taxonomy"], json!("post_tag"));
    assert_eq!(keyed["tax_query"]["relation"], json!("AND"));
}

#[test]
fn sparse_keyed_tax_query_keeps_every_clause() {
    let clauses = vec![
        TaxonomyClause::new(Taxonomy::Tag, vec!["20".into()]),
        TaxonomyClause::new(Taxonomy::Category, vec!["6".into()]),
    ];
    let mut keyed: Map<String, Value> = serde_json::from_value(json!({
        "tax_query": {
            "relation": "AND",
            "0": {"taxonomy": "category", "terms": [1]},
            "2": {"taxonomy": "genre", "terms": [3]}
        }
    }))
    .unwrap();
    inject_clauses(&mut keyed, &clauses);
    let tax_query = &keyed["tax_query"];
    assert_eq!(tax_query["0"]["taxonomy"], json!("category"));
    assert_eq!(tax_query["2"]["taxonomy"], json!("genre"), "existing clause must survive");
    assert_eq!(tax_query["3"]["taxonomy"], json!("post_tag"));
    assert_eq!(tax_query["4"]["taxonomy"], json!("category"));
    assert_eq!(tax_query["relation"], json!("AND"));
}

#[test]
fn raw_pieces_reach_the_query_engine() {
    let context = ListQueryContext::new("list", params(&[("list-term-2", " 7,,9 ")]));
    let clauses = build(&context, &category_at(2));
    assert_eq!(clauses[0].terms, vec![" 7", "", "9 "]);
}

#[test]
fn zero_padded_instance_is_not_a_filter() {
    let context = ListQueryContext::from_query("list", "list-term-02=5&list-term-2=6");
    let clauses = build(&context, &category_at(2));
    assert_eq!(clauses, vec![TaxonomyClause::new(Taxonomy::Category, vec!["6".into()])]);
}
