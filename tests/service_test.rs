//! Integration tests for request handling and output formatting.

use npshuffle::application::{ApplicationError, ParaphraseRequest, ParaphraseService};
use npshuffle::config::Settings;
use npshuffle::domain::{DomainError, ParseTree, TreePosition};
use npshuffle::util::testing;

const PAIR: &str = "(NP (NP (NNP Tom)) (CC and) (NP (NNP Jerry)))";

fn seeded_service(margin: usize) -> ParaphraseService {
    ParaphraseService::new(&Settings {
        seed: Some(42),
        margin,
        ..Settings::default()
    })
}

#[test]
fn given_wide_margin_when_handle_then_trees_are_flat() {
    testing::init_test_setup();
    let service = seeded_service(70);

    let response = service
        .handle(&ParaphraseRequest::new(PAIR, None))
        .expect("handle");

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        serde_json::json!({
            "paraphrases": [{"tree": "(NP (NP (NNP Jerry)) (CC and) (NP (NNP Tom)))"}]
        })
    );
}

#[test]
fn given_narrow_margin_when_handle_then_trees_are_indented() {
    let service = seeded_service(20);

    let response = service
        .handle(&ParaphraseRequest::new(PAIR, None))
        .expect("handle");

    let tree = &response.paraphrases[0].tree;
    assert_eq!(
        tree,
        "(NP\n  (NP (NNP Jerry))\n  (CC and)\n  (NP (NNP Tom)))"
    );
    // indentation is whitespace only, the tree parses back unchanged
    let reparsed: ParseTree = tree.parse().expect("reparse");
    assert_eq!(
        reparsed.to_string(),
        "(NP (NP (NNP Jerry)) (CC and) (NP (NNP Tom)))"
    );
}

#[test]
fn given_request_limit_when_handle_then_caps_result() {
    let service = seeded_service(200);
    let text = "(NP (NP A) (, ,) (NP B) (, ,) (NP C) (CC and) (NP D))";

    let response = service
        .handle(&ParaphraseRequest::new(text, Some(4)))
        .expect("handle");

    assert_eq!(response.paraphrases.len(), 4);
}

#[test]
fn given_same_seed_when_handle_twice_then_responses_match() {
    let text = "(NP (NP A) (, ,) (NP B) (, ,) (NP C) (CC and) (NP D))";
    let request = ParaphraseRequest::new(text, Some(6));

    let first = seeded_service(200).handle(&request).expect("handle");
    let second = seeded_service(200).handle(&request).expect("handle");

    assert_eq!(first, second);
}

#[test]
fn given_json_request_when_deserialized_then_handles_like_built_request() {
    let request: ParaphraseRequest =
        serde_json::from_str(&format!(r#"{{"tree": "{}", "limit": 3}}"#, PAIR)).unwrap();

    let response = seeded_service(70).handle(&request).expect("handle");

    assert_eq!(request.limit, Some(3));
    assert_eq!(response.paraphrases.len(), 1);
}

#[test]
fn given_tree_without_coordination_when_handle_then_empty_list() {
    let response = seeded_service(70)
        .handle(&ParaphraseRequest::new("(S (NP (PRP It)) (VP (VBZ works)))", None))
        .expect("handle");

    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"paraphrases":[]}"#
    );
}

#[test]
fn given_unbalanced_text_when_handle_then_reports_parse_offset() {
    let err = seeded_service(70)
        .handle(&ParaphraseRequest::new("(S (NP John)", None))
        .unwrap_err();

    match err {
        ApplicationError::Domain(DomainError::Parse { offset, message }) => {
            assert_eq!(offset, 12);
            assert_eq!(message, "unexpected end of input");
        }
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn given_nested_coordination_when_spans_then_reports_both_levels() {
    let text = "(NP (NP (NP (NNP A)) (CC and) (NP (NNP B))) (, ,) (NP (NNP C)) (CC or) (NP (NNP D)))";

    let spans = seeded_service(70).spans(text).expect("spans");

    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].position, TreePosition::root());
    assert_eq!(spans[0].variants, Some(120));
    assert_eq!(spans[1].position, TreePosition::from(vec![0]));
    assert_eq!(spans[1].variants, Some(2));
    assert_eq!(
        spans[1].subtree.to_string(),
        "(NP (NP (NNP A)) (CC and) (NP (NNP B)))"
    );
}
