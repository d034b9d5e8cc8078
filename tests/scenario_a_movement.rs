//! Basic movement normalization: a player holding up-right for 60 ticks at
//! base_speed=200 should land at the diagonal-normalized displacement.

use rtype_core::game::{GameLogic, GameRules};

#[test]
fn sixty_ticks_of_diagonal_input_lands_at_normalized_displacement() {
    let rules = GameRules { player_speed: 200.0, ..GameRules::default() };
    let mut logic = GameLogic::new(rules);
    logic.initialize(1);
    logic.spawn_player(1, "runner").unwrap();

    let dt = 1.0 / 60.0;
    for tick in 0..60 {
        logic.process_input(1, 1, 1, false, tick + 1);
        logic.update(dt, tick);
    }

    let snapshot = logic.snapshot();
    assert_eq!(snapshot.len(), 1);
    let dx = snapshot[0].x - rules.player_spawn_x;
    let dy = snapshot[0].y - rules.player_spawn_y;

    assert!((dx - 141.421).abs() < 0.5, "dx = {dx}");
    assert!((dy - 141.421).abs() < 0.5, "dy = {dy}");
}
