use serde_json::json;

use taxfilter::clauses::plan_injection;
use taxfilter::settings::Settings;
use taxfilter::taxonomy::{FilterInstanceConfig, InputType, Taxonomy};
use taxfilter::tree::Block;

#[test]
fn persisted_attributes_deserialize() {
    let config: FilterInstanceConfig = serde_json::from_value(json!({
        "instanceId": "12",
        "selectedTaxonomyType": "post_tag",
        "label": "All tags",
        "inputType": "checkboxes",
        "childOnly": true,
        "allTags": true,
        "selectedTerms": [4, 9]
    }))
    .unwrap();
    assert_eq!(config.instance_id, Some(12));
    assert_eq!(config.taxonomy, Taxonomy::Tag);
    assert_eq!(config.input_type, InputType::Checkboxes);
    assert_eq!(config.selected_term_ids, vec![4, 9]);
    assert!(config.offers_all_terms());
    assert!(!config.wants_children());
}

#[test]
fn fresh_block_normalizes() {
    let block = Block::new("ctlt/query-taxonomy-filter").with_attr("selectedTaxonomyType", json!(""));
    let mut config = block.filter_config().unwrap();
    assert!(config.taxonomy.is_unset());
    assert_eq!(config.instance_id, None);

    assert!(config.normalize(41));
    assert_eq!(config.taxonomy, Taxonomy::Category);
    assert_eq!(config.instance_id, Some(41));
    assert!(!config.normalize(42));
    assert_eq!(config.instance_id, Some(41));
}

#[test]
fn switching_taxonomy_clears_terms() {
    let mut config = FilterInstanceConfig::new(1, Taxonomy::Category);
    config.selected_term_ids = vec![3, 5];
    config.set_taxonomy(Taxonomy::Category);
    assert_eq!(config.selected_term_ids, vec![3, 5]);
    config.set_taxonomy(Taxonomy::Tag);
    assert!(config.selected_term_ids.is_empty());
}

#[test]
fn taxonomy_serializes_as_slug() {
    assert_eq!(serde_json::to_value(Taxonomy::Tag).unwrap(), json!("post_tag"));
    assert_eq!(serde_json::to_value(Taxonomy::from("genre")).unwrap(), json!("genre"));
    let parsed: Taxonomy = serde_json::from_value(json!("category")).unwrap();
    assert_eq!(parsed, Taxonomy::Category);
}

#[test]
fn settings_defaults_without_file() {
    let settings = Settings::load(None).expect("defaults");
    assert_eq!(settings.list_prefix, "query");
    assert_eq!(settings.filter_block, "ctlt/query-taxonomy-filter");
    assert!(settings.catalog.is_none());
}

#[test]
fn settings_file_overrides_defaults() {
    let path = std::env::temp_dir().join("taxfilter_settings_test.toml");
    std::fs::write(&path, "list_prefix = \"listing\"\nbind = \"0.0.0.0:9000\"\n").unwrap();
    let settings = Settings::load(path.to_str()).expect("settings file");
    assert_eq!(settings.list_prefix, "listing");
    assert_eq!(settings.bind, "0.0.0.0:9000");
    assert_eq!(settings.log, "info");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_settings_file_is_an_error() {
    assert!(Settings::load(Some("/nonexistent/taxfilter.toml")).is_err());
}

#[test]
fn default_settings_find_filters_in_a_parsed_page() {
    let settings = Settings::load(None).expect("defaults");
    let parsed: Block = serde_json::from_value(json!({
        "blockName": "core/query",
        "attrs": {"queryId": 3, "enhancedPagination": true},
        "innerBlocks": [
            {"blockName": "ctlt/query-taxonomy-filter", "attrs": {"instanceId": 1, "selectedTaxonomyType": "category"}, "innerBlocks": []}
        ]
    }))
    .unwrap();
    let injection = plan_injection(&parsed, "query-3-term-1=4", &settings.list_prefix, &settings.filter_block).unwrap();
    assert_eq!(injection.clauses.len(), 1, "default filter block name must match the block");
    assert_eq!(injection.clauses[0].terms, vec!["4"]);
}
