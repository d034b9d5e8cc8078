//! Client-side prediction + reconciliation: the client predicts ahead of
//! what the server has acknowledged, then replays the unacknowledged tail
//! once the server's snapshot arrives.

#![cfg(feature = "client")]

use rtype_core::client::{InputHistory, PredictionEngine};

#[test]
fn reconciliation_replays_unacknowledged_inputs_after_partial_loss() {
    let mut prediction = PredictionEngine::new(100.0, 100.0, 200.0);
    let mut history = InputHistory::new(12);

    for seq in 1..=10u32 {
        history.push(seq, 1, 0, false);
        prediction.apply_local_input(1, 0);
    }

    // Server only processed seqs 1..=5 and reports its own authoritative
    // position for that point in time.
    let server_x = 100.0 + 5.0 * 200.0 * (1.0 / 60.0);
    history.acknowledge(5);
    prediction.reconcile(server_x, 100.0, 20.0, &history);

    let (x, y) = prediction.position();
    let expected_x = server_x + 5.0 * 200.0 * (1.0 / 60.0);
    assert!((x - expected_x).abs() < 0.5, "x = {x}, expected {expected_x}");
    assert_eq!(y, 100.0);
    assert_eq!(history.len(), 5);
}
