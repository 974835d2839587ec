mod common;

use common::{base_graph, dense_weights, engine_with, graph_with, weights_with_bias};
use mulehunter_core::engine::AnalyzeRequest;
use mulehunter_core::error::EngineError;
use mulehunter_core::model::ScoringEngine;
use mulehunter_core::model::SageModel;
use mulehunter_core::verdict::{self, Verdict};
use mulehunter_core::view;

fn request(source: &str, target: &str, amount: f64) -> AnalyzeRequest {
    AnalyzeRequest {
        source_id: source.to_string(),
        target_id: target.to_string(),
        amount,
        timestamp: String::new(),
    }
}

#[test]
fn scenario_known_source_unseen_target() {
    // Base: {"A": 0, "B": 1}, edge A -> B. Analyzing A -> C (500) must
    // cold-start C at index 2 and surface both links in order.
    let engine = engine_with(base_graph(), &weights_with_bias(0.0));
    let report = engine.analyze(&request("A", "C", 500.0)).unwrap();

    assert_eq!(report.node_id, "A");
    assert_eq!(report.out_degree, 2);
    assert_eq!(report.linked_accounts, vec!["Card_B", "Card_unknown"]);
    assert_eq!(report.population_size, "2 Nodes");
    assert_eq!(report.model_version, "test-v1");
    // Zero weights: both logits are 0, so the fraud probability is 0.5.
    assert_eq!(report.risk_score, 0.5);
    assert_eq!(report.verdict, Verdict::Safe);
}

#[test]
fn repeated_calls_are_deterministic() {
    let engine = engine_with(base_graph(), &dense_weights());
    let first = engine.analyze(&request("A", "C", 500.0)).unwrap();
    for _ in 0..3 {
        let again = engine.analyze(&request("A", "C", 500.0)).unwrap();
        assert_eq!(again.risk_score, first.risk_score);
        assert_eq!(again.verdict, first.verdict);
        assert_eq!(again.linked_accounts, first.linked_accounts);
    }
}

#[test]
fn snapshot_unchanged_after_analyze_calls() {
    let engine = engine_with(base_graph(), &dense_weights());
    let assets = engine.store().get().unwrap();
    let features_before = assets.graph.features.clone();
    let edges_before = assets.graph.edges.clone();

    engine.analyze(&request("A", "C", 500.0)).unwrap();
    engine.analyze(&request("fresh", "fresh", 7.5)).unwrap();

    assert_eq!(assets.graph.features, features_before);
    assert_eq!(assets.graph.edges, edges_before);
}

#[test]
fn cold_start_source_is_scored_not_rejected() {
    let engine = engine_with(base_graph(), &weights_with_bias(0.0));
    let report = engine.analyze(&request("never-seen", "B", 42.0)).unwrap();

    assert_eq!(report.out_degree, 1);
    assert_eq!(report.risk_ratio, 1.0);
    assert_eq!(report.linked_accounts, vec!["Card_B"]);
}

#[test]
fn self_loop_is_accepted_and_visible() {
    let engine = engine_with(base_graph(), &weights_with_bias(0.0));
    let report = engine.analyze(&request("A", "A", 100.0)).unwrap();

    // One more outgoing edge than the persisted profile records.
    assert_eq!(report.out_degree, 2);
    assert!(report.linked_accounts.contains(&"Card_A".to_string()));
}

#[test]
fn linked_accounts_cap_at_three_in_edge_order() {
    let graph = graph_with(
        &["A", "B", "C", "D", "E"],
        &[(0, 1), (0, 2), (0, 3), (0, 4)],
    );
    let engine = engine_with(graph, &weights_with_bias(0.0));
    let report = engine.analyze(&request("A", "F", 50.0)).unwrap();

    assert_eq!(report.linked_accounts, vec!["Card_B", "Card_C", "Card_D"]);
}

#[test]
fn biased_model_produces_critical_verdict() {
    // Output bias of 3.0 on the fraud logit: p = e^3 / (1 + e^3) ~ 0.9526.
    let engine = engine_with(base_graph(), &weights_with_bias(3.0));
    let report = engine.analyze(&request("A", "B", 100.0)).unwrap();

    assert!(report.risk_score > 0.85);
    assert_eq!(report.verdict, Verdict::Critical);
}

#[test]
fn invalid_amount_is_rejected_at_the_boundary() {
    let engine = engine_with(base_graph(), &weights_with_bias(0.0));
    for amount in [0.0, -5.0, f64::NAN] {
        match engine.analyze(&request("A", "B", amount)) {
            Err(EngineError::InvalidAmount(_)) => {}
            other => panic!("expected InvalidAmount, got {other:?}"),
        }
    }
}

#[test]
fn verdict_thresholds_are_strict() {
    assert_eq!(verdict::classify(0.86), Verdict::Critical);
    assert_eq!(verdict::classify(0.85), Verdict::Suspicious);
    assert_eq!(verdict::classify(0.61), Verdict::Suspicious);
    assert_eq!(verdict::classify(0.6), Verdict::Safe);
    assert_eq!(verdict::classify(0.0), Verdict::Safe);
}

#[test]
fn score_is_a_probability_distribution() {
    let base = base_graph();
    let model = SageModel::from_weights(&dense_weights()).unwrap();
    let view = view::extend(&base, "A", "C", 500.0);

    let probs = model
        .score(&view.features, &view.edges, view.source_index)
        .unwrap();
    assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    assert!((probs[0] + probs[1] - 1.0).abs() < 1e-6);
}

#[test]
fn health_tracks_asset_state() {
    let engine = engine_with(base_graph(), &weights_with_bias(0.0));
    let health = engine.health();
    assert_eq!(health.status, "HEALTHY");
    assert_eq!(health.nodes_count, 2);
}
