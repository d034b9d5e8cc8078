//! Bytewise snapshot round-trip: encoding a `GameState` message carrying
//! one fully-populated `EntityState` yields a deterministic byte length,
//! and decoding it restores every field exactly.

use rtype_core::protocol::{EntityState, EntityTypeTag, ServerMessage, SpriteRect};

#[test]
fn entity_state_survives_a_full_message_round_trip() {
    let entity = EntityState {
        entity_id: 42,
        type_tag: EntityTypeTag::Player,
        x: 123.5,
        y: -7.25,
        health: Some(100),
        animation_tag: "idle".to_string(),
        sprite_src_rect: SpriteRect { x: 16, y: 32, w: 33, h: 17 },
        last_processed_input_seq: 1234,
    };
    let message = ServerMessage::GameState {
        server_tick: 7,
        entities: vec![entity.clone()],
        is_game_over: false,
    };

    let bytes = message.encode();
    // tag(1) + server_tick(4) + count(4) + [entity_id(4) + type_tag(1) +
    // x(4) + y(4) + health flag+value(1+4) + "idle" len+bytes(4+4) +
    // sprite rect(4*4) + last_processed_input_seq(4)] + is_game_over(1)
    assert_eq!(bytes.len(), 1 + 4 + 4 + (4 + 1 + 4 + 4 + 1 + 4 + 4 + 4 + 16 + 4) + 1);

    let decoded = ServerMessage::decode(&bytes).unwrap();
    match decoded {
        ServerMessage::GameState { server_tick, entities, is_game_over } => {
            assert_eq!(server_tick, 7);
            assert!(!is_game_over);
            assert_eq!(entities.len(), 1);
            assert_eq!(entities[0], entity);
        }
        other => panic!("expected GameState, got {other:?}"),
    }
}
