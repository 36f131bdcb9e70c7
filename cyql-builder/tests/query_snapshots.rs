//! End-to-end tests: fluent builder → renderer → assembler.
//!
//! Rendered text is asserted bit-exact because it feeds a real query
//! engine. Run `cargo insta review` to update inline snapshots when making
//! intentional changes.

use cyql_builder::{Capture, Error, QueryBuilder, prepare_queries};
use cyql_ir::{Params, Rendered, props};

#[test]
fn test_merge_and_return_round_trip() {
    let mut qb = QueryBuilder::new();
    let account = qb.node_ref();
    qb.merge()
        .node("Account", props! { "id" => "abc" }, Capture::node(account))
        .unwrap();
    qb.return_([account.into()]).unwrap();

    let prepared = prepare_queries(&qb.build().unwrap()).unwrap();
    assert_eq!(prepared.text, "MERGE (a:Account { id: $id__a })\nRETURN a");
    assert_eq!(prepared.parameters, props! { "id__a" => "abc" });
}

#[test]
fn test_name_ref_behaves_like_node_ref_for_return() {
    let mut qb = QueryBuilder::new();
    let account = qb.name_ref();
    qb.merge()
        .node("Account", props! { "id" => "abc" }, Capture::name(account))
        .unwrap();
    qb.return_([account.into()]).unwrap();

    let prepared = prepare_queries(&qb.build().unwrap()).unwrap();
    assert_eq!(prepared.text, "MERGE (a:Account { id: $id__a })\nRETURN a");
}

#[test]
fn test_on_create_set_round_trip() {
    let mut qb = QueryBuilder::new();
    let account = qb.node_ref();
    qb.merge()
        .node("Account", props! { "id" => "abc" }, Capture::node(account))
        .unwrap()
        .on_create()
        .set(account, props! { "name" => "Max" })
        .unwrap()
        .return_([account.into()])
        .unwrap();

    let prepared = prepare_queries(&qb.build().unwrap()).unwrap();
    assert_eq!(
        prepared.text,
        "MERGE (a:Account { id: $id__a })\nON CREATE SET a.name = $name__a\nRETURN a"
    );
    assert_eq!(
        prepared.parameters,
        props! { "id__a" => "abc", "name__a" => "Max" }
    );
}

#[test]
fn test_lazy_names_for_parameterized_uncaptured_elements() {
    let mut qb = QueryBuilder::new();
    let account = qb.node_ref();
    // The captured node takes "a" eagerly; the nameless relation carries
    // properties, so it must pick up the next free name at build time.
    qb.merge()
        .node("Account", props! { "id" => "abc" }, Capture::node(account))
        .unwrap()
        .relation("Bar", props! { "id" => "xyz" }, Capture::NONE)
        .unwrap()
        .node("Other", Params::new(), Capture::NONE)
        .unwrap();

    let rendered = qb.build().unwrap();
    // The lazy name "b" shows up in the parameter placeholder and the
    // declared variables, never in the pattern itself.
    insta::assert_snapshot!(
        rendered[0].text,
        @"MERGE (a:Account { id: $id__a })-[:Bar { id: $id__b }]->(:Other)"
    );
    assert_eq!(rendered[0].variable_names, ["a", "b"]);
    assert_eq!(
        rendered[0].parameters,
        props! { "id__a" => "abc", "id__b" => "xyz" }
    );
}

#[test]
fn test_fully_structural_chain_stays_nameless() {
    let mut qb = QueryBuilder::new();
    qb.match_()
        .node("Account", Params::new(), Capture::NONE)
        .unwrap()
        .relation("Bar", props! { "id" => "xyz" }, Capture::NONE)
        .unwrap();

    let rendered = qb.build().unwrap();
    // Only the parameterized relation is named, and it receives the first
    // name in the sequence because nothing was allocated eagerly. Being
    // lazy, that name stays out of the pattern text.
    insta::assert_snapshot!(
        rendered[0].text,
        @"MATCH (:Account)-[:Bar { id: $id__a }]->"
    );
    assert_eq!(rendered[0].variable_names, ["a"]);
}

#[test]
fn test_multi_clause_statement_snapshot() {
    let mut qb = QueryBuilder::new();
    let account = qb.node_ref();
    let network = qb.node_ref();
    qb.merge()
        .node("Account", props! { "steamId" => "7656" }, Capture::node(account))
        .unwrap()
        .on_create()
        .set(account, props! { "name" => "Max", "info" => "hi" })
        .unwrap();
    qb.merge()
        .node("Network", props! { "name" => "EU" }, Capture::node(network))
        .unwrap();
    qb.return_([account.into(), network.into()]).unwrap();

    let prepared = prepare_queries(&qb.build().unwrap()).unwrap();
    insta::assert_snapshot!(prepared.text, @r"
    MERGE (a:Account { steamId: $steamId__a })
    ON CREATE SET a.name = $name__a, a.info = $info__a
    MERGE (b:Network { name: $name__b })
    RETURN a, b
    ");
    assert_eq!(
        prepared.parameters,
        props! {
            "steamId__a" => "7656",
            "name__a" => "Max",
            "info__a" => "hi",
            "name__b" => "EU",
        }
    );
}

#[test]
fn test_duplicate_variables_across_independent_runs() {
    let build_one = || {
        let mut qb = QueryBuilder::new();
        let reference = qb.node_ref();
        qb.merge()
            .node("Account", props! { "id" => "abc" }, Capture::node(reference))
            .unwrap();
        qb.build().unwrap()
    };

    // Two independent builders both name their first element "a".
    let first = build_one();
    let second = build_one();
    let err = prepare_queries(first.iter().chain(second.iter())).unwrap_err();
    assert!(matches!(err, Error::DuplicateVariable { name } if name == "a"));
}

#[test]
fn test_hand_built_fragments_merge_with_builder_output() {
    let mut qb = QueryBuilder::new();
    let account = qb.node_ref();
    qb.merge()
        .node("Account", props! { "id" => "abc" }, Capture::node(account))
        .unwrap();
    let mut fragments = qb.build().unwrap();

    fragments.push(Rendered {
        text: "MERGE (a)-[r:IS_PART_OF]->(n)".to_owned(),
        parameters: Params::new(),
        variable_names: vec!["r".to_owned()],
    });
    fragments.push(Rendered::text_only("RETURN a, r"));

    let prepared = prepare_queries(&fragments).unwrap();
    insta::assert_snapshot!(prepared.text, @r"
    MERGE (a:Account { id: $id__a })
    MERGE (a)-[r:IS_PART_OF]->(n)
    RETURN a, r
    ");
}

#[test]
fn test_prepared_parameters_serialize_flat() {
    let mut qb = QueryBuilder::new();
    let account = qb.node_ref();
    qb.merge()
        .node("Account", props! { "id" => "abc" }, Capture::node(account))
        .unwrap()
        .on_create()
        .set(account, props! { "name" => "Max" })
        .unwrap();

    let prepared = prepare_queries(&qb.build().unwrap()).unwrap();
    let json = serde_json::to_value(&prepared.parameters).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "id__a": "abc", "name__a": "Max" })
    );
}
