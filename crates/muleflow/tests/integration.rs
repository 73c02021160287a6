//! Integration tests for the muleflow engine.
//!
//! These exercise the full pipeline end to end: known laundering scenarios,
//! the universal report invariants, and the threshold boundaries.

use muleflow::prelude::*;

const HOUR: i64 = 3_600_000;
/// 2024-01-01 00:00:00 UTC in epoch milliseconds.
const BASE: i64 = 1_704_067_200_000;

fn tx(id: &str, from: &str, to: &str, amount: f64, hours: i64) -> Transaction {
    Transaction::new(id, from, to, amount, BASE + hours * HOUR)
}

fn analyze(txs: &[Transaction]) -> AnalysisOutcome {
    AnalysisEngine::with_defaults()
        .analyze(txs)
        .expect("analysis should succeed")
}

// ============================================================================
// Laundering Scenarios
// ============================================================================

#[test]
fn scenario_triangle_cycle() {
    let outcome = analyze(&[
        tx("T1", "A", "B", 1500.0, 1),
        tx("T2", "B", "C", 1400.0, 2),
        tx("T3", "C", "A", 1350.0, 3),
    ]);
    let report = &outcome.report;

    assert_eq!(report.fraud_rings.len(), 1);
    let ring = &report.fraud_rings[0];
    assert_eq!(ring.ring_id, "RING_001");
    assert_eq!(ring.pattern_type, RingPattern::Cycle);
    assert_eq!(ring.member_accounts, vec!["A", "B", "C"]);
    assert_eq!(ring.risk_score, 40.0);

    assert_eq!(report.suspicious_accounts.len(), 3);
    for account in &report.suspicious_accounts {
        assert_eq!(account.suspicion_score, 40.0);
        assert_eq!(account.detected_patterns, vec![PatternTag::CycleLength3]);
        assert_eq!(account.ring_id.as_deref(), Some("RING_001"));
    }
}

#[test]
fn scenario_fan_in_smurfing() {
    let txs: Vec<Transaction> = (0..12)
        .map(|i| {
            tx(
                &format!("T{i}"),
                &format!("S{i}"),
                "X",
                250.0,
                i as i64 * 4, // all within 48 hours
            )
        })
        .collect();
    let outcome = analyze(&txs);
    let report = &outcome.report;

    assert_eq!(report.suspicious_accounts.len(), 1);
    let x = &report.suspicious_accounts[0];
    assert_eq!(x.account_id, "X");
    assert_eq!(x.suspicion_score, 25.0);
    assert_eq!(x.detected_patterns, vec![PatternTag::FanIn]);
    assert_eq!(x.ring_id.as_deref(), Some("RING_001"));

    assert_eq!(report.fraud_rings.len(), 1);
    assert_eq!(report.fraud_rings[0].pattern_type, RingPattern::FanIn);

    for i in 0..12 {
        let node = outcome.graph.node_by_id(&format!("S{i}")).unwrap();
        assert!(!node.is_suspicious, "senders must not be flagged");
    }
}

#[test]
fn scenario_payroll_exemption() {
    let txs: Vec<Transaction> = (0..15)
        .map(|i| {
            Transaction::new(
                format!("P{i}"),
                "P",
                format!("W{i}"),
                1000.0,
                BASE + i as i64 * 10 * HOUR / 15,
            )
        })
        .collect();
    let outcome = analyze(&txs);
    let report = &outcome.report;

    assert!(report.suspicious_accounts.is_empty());
    assert!(report.fraud_rings.is_empty());

    let p = outcome.graph.node_by_id("P").unwrap();
    assert!(!p.is_suspicious);
    assert!(p.ring_id.is_none());
}

#[test]
fn scenario_payroll_with_cycle_keeps_both_tags() {
    let mut txs: Vec<Transaction> = (0..15)
        .map(|i| {
            Transaction::new(
                format!("P{i}"),
                "P",
                format!("W{i}"),
                1000.0,
                BASE + i as i64 * 10 * HOUR / 15,
            )
        })
        .collect();
    txs.push(tx("C1", "P", "Q", 800.0, 20));
    txs.push(tx("C2", "Q", "R", 750.0, 21));
    txs.push(tx("C3", "R", "P", 700.0, 22));
    let outcome = analyze(&txs);
    let report = &outcome.report;

    let p = report
        .suspicious_accounts
        .iter()
        .find(|a| a.account_id == "P")
        .expect("P stays flagged");
    assert_eq!(p.suspicion_score, 65.0);
    assert_eq!(
        p.detected_patterns,
        vec![PatternTag::CycleLength3, PatternTag::FanOut]
    );

    assert_eq!(report.fraud_rings.len(), 1);
    assert_eq!(report.fraud_rings[0].pattern_type, RingPattern::Cycle);
    assert_eq!(p.ring_id.as_deref(), Some("RING_001"));
}

#[test]
fn scenario_shell_chain() {
    let mut txs = vec![
        tx("T1", "A", "B", 900.0, 1),
        tx("T2", "B", "C", 880.0, 2),
        tx("T3", "C", "D", 860.0, 3),
        tx("T4", "D", "E", 840.0, 4),
    ];
    // Make the endpoints busy without crossing any burst threshold.
    for i in 0..5 {
        txs.push(tx(&format!("TA{i}"), "A", &format!("X{i}"), 50.0, 100 + i as i64 * 80));
        txs.push(tx(&format!("TE{i}"), &format!("Y{i}"), "E", 50.0, 100 + i as i64 * 80));
    }
    let outcome = analyze(&txs);
    let report = &outcome.report;

    for id in ["A", "B", "C", "D", "E"] {
        let account = report
            .suspicious_accounts
            .iter()
            .find(|a| a.account_id == id)
            .unwrap_or_else(|| panic!("{id} should be flagged"));
        assert_eq!(account.suspicion_score, 20.0);
        assert_eq!(account.detected_patterns, vec![PatternTag::ShellChain]);
    }

    assert_eq!(report.fraud_rings.len(), 1);
    let ring = &report.fraud_rings[0];
    assert_eq!(ring.pattern_type, RingPattern::ShellChain);
    assert_eq!(ring.member_accounts, vec!["A", "B", "C", "D", "E"]);
    assert_eq!(ring.risk_score, 20.0);
}

#[test]
fn scenario_high_velocity_sender() {
    // Varied amounts keep H clear of the payroll exemption.
    let txs: Vec<Transaction> = (0..25)
        .map(|i| {
            Transaction::new(
                format!("T{i}"),
                "H",
                format!("R{i}"),
                100.0 + 15.0 * i as f64,
                BASE + i as i64 * 12 * HOUR / 25,
            )
        })
        .collect();
    let outcome = analyze(&txs);
    let report = &outcome.report;

    let h = report
        .suspicious_accounts
        .iter()
        .find(|a| a.account_id == "H")
        .expect("H should be flagged");
    assert_eq!(h.suspicion_score, 35.0);
    assert_eq!(
        h.detected_patterns,
        vec![PatternTag::FanOut, PatternTag::HighVelocity]
    );

    assert_eq!(report.fraud_rings.len(), 1);
    assert_eq!(report.fraud_rings[0].pattern_type, RingPattern::FanOut);
    assert_eq!(h.ring_id.as_deref(), Some("RING_001"));
}

// ============================================================================
// Universal Properties
// ============================================================================

/// A mixed batch exercising every detector at once.
fn mixed_batch() -> Vec<Transaction> {
    let mut txs = vec![
        tx("T1", "A", "B", 1500.0, 1),
        tx("T2", "B", "C", 1400.0, 2),
        tx("T3", "C", "A", 1350.0, 3),
    ];
    for i in 0..11 {
        txs.push(tx(&format!("F{i}"), &format!("S{i}"), "HUB", 90.0, 10 + i as i64));
    }
    txs.push(tx("L1", "U", "V", 400.0, 30));
    txs.push(tx("L2", "V", "W", 390.0, 31));
    txs.push(tx("L3", "W", "K", 380.0, 32));
    for i in 0..22 {
        txs.push(Transaction::new(
            format!("V{i}"),
            "FAST",
            format!("Z{}", i % 4),
            60.0,
            BASE + (40 * 60 + i as i64 * 30) * 60_000,
        ));
    }
    txs
}

#[test]
fn property_flag_score_tag_consistency() {
    let outcome = analyze(&mixed_batch());

    // The report cardinality matches positive scores in the node table.
    let positive = outcome
        .graph
        .nodes
        .iter()
        .filter(|n| n.suspicion_score > 0.0)
        .count();
    assert_eq!(outcome.report.suspicious_accounts.len(), positive);

    // Scores bounded and consistent with tags.
    for node in &outcome.graph.nodes {
        assert!((0.0..=100.0).contains(&node.suspicion_score));
        assert_eq!(node.is_suspicious, node.suspicion_score > 0.0);
        assert_eq!(node.is_suspicious, !node.detected_patterns.is_empty());
    }
}

#[test]
fn property_rings_disjoint_and_referenced() {
    let outcome = analyze(&mixed_batch());
    let report = &outcome.report;

    // No account in two rings.
    let mut seen = std::collections::HashSet::new();
    for ring in &report.fraud_rings {
        for member in &ring.member_accounts {
            assert!(seen.insert(member.clone()), "{member} in two rings");
        }
    }

    // Every referenced ring exists.
    let ids: std::collections::HashSet<&str> =
        report.fraud_rings.iter().map(|r| r.ring_id.as_str()).collect();
    for account in &report.suspicious_accounts {
        if let Some(ring_id) = &account.ring_id {
            assert!(ids.contains(ring_id.as_str()));
        }
    }

    // Contiguous ids in assignment order.
    for (i, ring) in report.fraud_rings.iter().enumerate() {
        assert_eq!(ring.ring_id, format!("RING_{:03}", i + 1));
    }
}

#[test]
fn property_repeated_runs_identical() {
    let txs = mixed_batch();
    let first = analyze(&txs).report;
    let second = analyze(&txs).report;

    // Everything except processing time is byte-identical.
    assert_eq!(
        serde_json::to_string(&first.suspicious_accounts).unwrap(),
        serde_json::to_string(&second.suspicious_accounts).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.fraud_rings).unwrap(),
        serde_json::to_string(&second.fraud_rings).unwrap()
    );
    assert_eq!(
        first.summary.total_accounts_analyzed,
        second.summary.total_accounts_analyzed
    );
    assert_eq!(
        first.summary.suspicious_accounts_flagged,
        second.summary.suspicious_accounts_flagged
    );
}

#[test]
fn property_unrelated_transaction_is_monotone() {
    // A transaction that closes no cycle and crosses no threshold leaves
    // previously clean accounts clean and flagged accounts unchanged.
    let mut txs = mixed_batch();
    let before = analyze(&txs).report;

    txs.push(tx("EXTRA", "LONER1", "LONER2", 10.0, 500));
    let after = analyze(&txs).report;

    assert_eq!(
        serde_json::to_string(&before.suspicious_accounts).unwrap(),
        serde_json::to_string(&after.suspicious_accounts).unwrap()
    );
    assert!(after
        .suspicious_accounts
        .iter()
        .all(|a| a.account_id != "LONER1" && a.account_id != "LONER2"));
}

// ============================================================================
// Threshold Boundaries
// ============================================================================

#[test]
fn boundary_smurf_threshold() {
    let batch = |count: usize| -> Vec<Transaction> {
        (0..count)
            .map(|i| tx(&format!("T{i}"), &format!("S{i}"), "X", 100.0, i as i64))
            .collect()
    };

    let nine = analyze(&batch(9)).report;
    assert!(nine.suspicious_accounts.is_empty());

    let ten = analyze(&batch(10)).report;
    assert_eq!(ten.suspicious_accounts.len(), 1);
    assert_eq!(
        ten.suspicious_accounts[0].detected_patterns,
        vec![PatternTag::FanIn]
    );
}

#[test]
fn boundary_velocity_threshold() {
    let batch = |count: usize| -> Vec<Transaction> {
        (0..count)
            .map(|i| {
                Transaction::new(
                    format!("T{i}"),
                    "H",
                    format!("R{}", i % 3),
                    80.0,
                    BASE + i as i64 * 10 * 60_000,
                )
            })
            .collect()
    };

    let nineteen = analyze(&batch(19)).report;
    assert!(nineteen.suspicious_accounts.is_empty());

    let twenty = analyze(&batch(20)).report;
    assert_eq!(twenty.suspicious_accounts.len(), 1);
    assert_eq!(
        twenty.suspicious_accounts[0].detected_patterns,
        vec![PatternTag::HighVelocity]
    );
}

#[test]
fn boundary_cycle_lengths() {
    // Length 2 and length 6 are never reported; 5 is.
    let two = analyze(&[tx("T1", "A", "B", 100.0, 1), tx("T2", "B", "A", 100.0, 2)]).report;
    assert!(two.suspicious_accounts.is_empty());

    let six: Vec<Transaction> = ["A", "B", "C", "D", "E", "F"]
        .iter()
        .enumerate()
        .map(|(i, from)| {
            let to = ["B", "C", "D", "E", "F", "A"][i];
            tx(&format!("T{i}"), from, to, 100.0, i as i64)
        })
        .collect();
    let six = analyze(&six).report;
    assert!(six
        .suspicious_accounts
        .iter()
        .all(|a| a.detected_patterns.iter().all(|t| !matches!(
            t,
            PatternTag::CycleLength3 | PatternTag::CycleLength4 | PatternTag::CycleLength5
        ))));

    let five: Vec<Transaction> = ["A", "B", "C", "D", "E"]
        .iter()
        .enumerate()
        .map(|(i, from)| {
            let to = ["B", "C", "D", "E", "A"][i];
            tx(&format!("T{i}"), from, to, 100.0, i as i64)
        })
        .collect();
    let five = analyze(&five).report;
    assert_eq!(five.suspicious_accounts.len(), 5);
    for account in &five.suspicious_accounts {
        assert!(account.detected_patterns.contains(&PatternTag::CycleLength5));
    }
}

#[test]
fn boundary_self_loop_is_not_a_cycle() {
    let outcome = analyze(&[tx("T1", "A", "A", 100.0, 1)]);
    assert!(outcome.report.suspicious_accounts.is_empty());

    let a = outcome.graph.node_by_id("A").unwrap();
    assert_eq!(a.total_transactions, 2);
}
