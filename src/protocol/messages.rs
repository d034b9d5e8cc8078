//! The protocol catalog, spec §4.7, verbatim: every message type,
//! direction, reliability and payload field listed in the spec table.

use crate::net::SendFlags;

use super::error::{ProtocolError, ProtocolResult};
use super::wire::{Reader, Writer};

/// Reliability class a message is cataloged under (spec §4.7). The
/// transport only distinguishes two classes, so `Unreliable` and
/// `Unsequenced` both ride as `SendFlags::Unsequenced`; the three-way
/// split is kept here because it is what the catalog actually says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reliability {
    Reliable,
    Unreliable,
    Unsequenced,
}

impl From<Reliability> for SendFlags {
    fn from(reliability: Reliability) -> Self {
        match reliability {
            Reliability::Reliable => SendFlags::Reliable,
            Reliability::Unreliable | Reliability::Unsequenced => SendFlags::Unsequenced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityTypeTag {
    Player,
    EnemyDrone,
    EnemyTurret,
    EnemyBoss,
    Projectile,
}

impl EntityTypeTag {
    fn to_u8(self) -> u8 {
        match self {
            EntityTypeTag::Player => 0,
            EntityTypeTag::EnemyDrone => 1,
            EntityTypeTag::EnemyTurret => 2,
            EntityTypeTag::EnemyBoss => 3,
            EntityTypeTag::Projectile => 4,
        }
    }

    fn from_u8(tag: u8) -> ProtocolResult<Self> {
        Ok(match tag {
            0 => EntityTypeTag::Player,
            1 => EntityTypeTag::EnemyDrone,
            2 => EntityTypeTag::EnemyTurret,
            3 => EntityTypeTag::EnemyBoss,
            4 => EntityTypeTag::Projectile,
            other => {
                return Err(ProtocolError::InvalidEnumTag {
                    field: "EntityTypeTag",
                    tag: other,
                });
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub entity_id: u32,
    pub type_tag: EntityTypeTag,
    pub x: f32,
    pub y: f32,
    pub health: Option<i32>,
    pub animation_tag: String,
    pub sprite_src_rect: SpriteRect,
    pub last_processed_input_seq: u32,
}

impl EntityState {
    fn write(&self, w: &mut Writer) {
        w.u32(self.entity_id);
        w.u8(self.type_tag.to_u8());
        w.f32(self.x);
        w.f32(self.y);
        match self.health {
            Some(h) => {
                w.bool(true);
                w.i32(h);
            }
            None => {
                w.bool(false);
            }
        }
        w.string(&self.animation_tag);
        w.i32(self.sprite_src_rect.x);
        w.i32(self.sprite_src_rect.y);
        w.i32(self.sprite_src_rect.w);
        w.i32(self.sprite_src_rect.h);
        w.u32(self.last_processed_input_seq);
    }

    fn read(r: &mut Reader) -> ProtocolResult<Self> {
        let entity_id = r.u32()?;
        let type_tag = EntityTypeTag::from_u8(r.u8()?)?;
        let x = r.f32()?;
        let y = r.f32()?;
        let health = if r.bool()? { Some(r.i32()?) } else { None };
        let animation_tag = r.string()?;
        let sprite_src_rect = SpriteRect {
            x: r.i32()?,
            y: r.i32()?,
            w: r.i32()?,
            h: r.i32()?,
        };
        let last_processed_input_seq = r.u32()?;
        Ok(Self {
            entity_id,
            type_tag,
            x,
            y,
            health,
            animation_tag,
            sprite_src_rect,
            last_processed_input_seq,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionTag {
    Up,
    Down,
    Left,
    Right,
    Shoot,
}

impl ActionTag {
    fn to_u8(self) -> u8 {
        match self {
            ActionTag::Up => 0,
            ActionTag::Down => 1,
            ActionTag::Left => 2,
            ActionTag::Right => 3,
            ActionTag::Shoot => 4,
        }
    }

    fn from_u8(tag: u8) -> ProtocolResult<Self> {
        Ok(match tag {
            0 => ActionTag::Up,
            1 => ActionTag::Down,
            2 => ActionTag::Left,
            3 => ActionTag::Right,
            4 => ActionTag::Shoot,
            other => return Err(ProtocolError::InvalidEnumTag { field: "ActionTag", tag: other }),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub seq: u32,
    pub actions: Vec<ActionTag>,
}

impl InputSnapshot {
    fn write(&self, w: &mut Writer) {
        w.u32(self.seq);
        w.u8(self.actions.len() as u8);
        for action in &self.actions {
            w.u8(action.to_u8());
        }
    }

    fn read(r: &mut Reader) -> ProtocolResult<Self> {
        let seq = r.u32()?;
        let count = r.u8()? as usize;
        let mut actions = Vec::with_capacity(count);
        for _ in 0..count {
            actions.push(ActionTag::from_u8(r.u8()?)?);
        }
        Ok(Self { seq, actions })
    }

    /// Cardinal (dx, dy) derived from the action tags, per spec §4.5/§4.7.
    pub fn movement(&self) -> (i8, i8) {
        let mut dx = 0_i8;
        let mut dy = 0_i8;
        for action in &self.actions {
            match action {
                ActionTag::Left => dx -= 1,
                ActionTag::Right => dx += 1,
                ActionTag::Up => dy -= 1,
                ActionTag::Down => dy += 1,
                ActionTag::Shoot => {}
            }
        }
        (dx.clamp(-1, 1), dy.clamp(-1, 1))
    }

    pub fn shoot(&self) -> bool {
        self.actions.contains(&ActionTag::Shoot)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeftRoomReason {
    Disconnected,
    Kicked,
    RoomClosed,
}

impl LeftRoomReason {
    fn to_u8(self) -> u8 {
        match self {
            LeftRoomReason::Disconnected => 0,
            LeftRoomReason::Kicked => 1,
            LeftRoomReason::RoomClosed => 2,
        }
    }

    fn from_u8(tag: u8) -> ProtocolResult<Self> {
        Ok(match tag {
            0 => LeftRoomReason::Disconnected,
            1 => LeftRoomReason::Kicked,
            2 => LeftRoomReason::RoomClosed,
            other => {
                return Err(ProtocolError::InvalidEnumTag {
                    field: "LeftRoomReason",
                    tag: other,
                });
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomSummary {
    pub room_id: u32,
    pub name: String,
    pub count: u32,
    pub max: u32,
    pub private: bool,
    pub state: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoomMember {
    pub player_id: u64,
    pub name: String,
    pub host: bool,
    pub spectator: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    HandshakeRequest { player_name: String },
    RegisterAccount { username: String, password: String },
    LoginAccount { username: String, password: String },
    RequestRoomList,
    CreateRoom { name: String, max_players: u32, private: bool },
    JoinRoom { room_id: u32 },
    LeaveRoom,
    StartGame,
    PlayerInput { snapshots: Vec<InputSnapshot> },
    ChatMessage { text: String },
    Ping { timestamp: u64 },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    HandshakeAck { assigned_player_id: u64 },
    AuthResult { ok: bool, message: String, authed_name: String },
    RoomList { rooms: Vec<RoomSummary> },
    CreateRoomResult { room_id: u32 },
    RoomState { room_name: String, members: Vec<RoomMember> },
    LeftRoom { player_id: u64, reason: LeftRoomReason, message: String },
    GameStart { your_entity_id: u32, server_tick: u32, entities: Vec<EntityState> },
    GameState { server_tick: u32, entities: Vec<EntityState>, is_game_over: bool },
    GameruleUpdate { rules: Vec<(String, f32)> },
    ChatMessage { player_id: u64, name: String, text: String, timestamp: u64 },
    Pong { timestamp: u64 },
}

mod tag {
    pub const HANDSHAKE_REQUEST: u8 = 0;
    pub const REGISTER_ACCOUNT: u8 = 1;
    pub const LOGIN_ACCOUNT: u8 = 2;
    pub const REQUEST_ROOM_LIST: u8 = 3;
    pub const CREATE_ROOM: u8 = 4;
    pub const JOIN_ROOM: u8 = 5;
    pub const LEAVE_ROOM: u8 = 6;
    pub const START_GAME: u8 = 7;
    pub const PLAYER_INPUT: u8 = 8;
    pub const CHAT_MESSAGE_C2S: u8 = 9;
    pub const PING: u8 = 10;

    pub const HANDSHAKE_ACK: u8 = 100;
    pub const AUTH_RESULT: u8 = 101;
    pub const ROOM_LIST: u8 = 102;
    pub const CREATE_ROOM_RESULT: u8 = 103;
    pub const ROOM_STATE: u8 = 104;
    pub const LEFT_ROOM: u8 = 105;
    pub const GAME_START: u8 = 106;
    pub const GAME_STATE: u8 = 107;
    pub const GAMERULE_UPDATE: u8 = 108;
    pub const CHAT_MESSAGE_S2C: u8 = 109;
    pub const PONG: u8 = 110;
}

impl ClientMessage {
    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        match self {
            ClientMessage::HandshakeRequest { player_name } => {
                w.u8(tag::HANDSHAKE_REQUEST).string(player_name);
            }
            ClientMessage::RegisterAccount { username, password } => {
                w.u8(tag::REGISTER_ACCOUNT).string(username).string(password);
            }
            ClientMessage::LoginAccount { username, password } => {
                w.u8(tag::LOGIN_ACCOUNT).string(username).string(password);
            }
            ClientMessage::RequestRoomList => {
                w.u8(tag::REQUEST_ROOM_LIST);
            }
            ClientMessage::CreateRoom { name, max_players, private } => {
                w.u8(tag::CREATE_ROOM).string(name).u32(*max_players).bool(*private);
            }
            ClientMessage::JoinRoom { room_id } => {
                w.u8(tag::JOIN_ROOM).u32(*room_id);
            }
            ClientMessage::LeaveRoom => {
                w.u8(tag::LEAVE_ROOM);
            }
            ClientMessage::StartGame => {
                w.u8(tag::START_GAME);
            }
            ClientMessage::PlayerInput { snapshots } => {
                w.u8(tag::PLAYER_INPUT);
                w.u8(snapshots.len() as u8);
                for snapshot in snapshots {
                    snapshot.write(&mut w);
                }
            }
            ClientMessage::ChatMessage { text } => {
                w.u8(tag::CHAT_MESSAGE_C2S).string(text);
            }
            ClientMessage::Ping { timestamp } => {
                w.u8(tag::PING).u64(*timestamp);
            }
        }
        w.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let mut r = Reader::new(bytes);
        let type_byte = r.u8()?;
        Ok(match type_byte {
            tag::HANDSHAKE_REQUEST => ClientMessage::HandshakeRequest { player_name: r.string()? },
            tag::REGISTER_ACCOUNT => ClientMessage::RegisterAccount {
                username: r.string()?,
                password: r.string()?,
            },
            tag::LOGIN_ACCOUNT => ClientMessage::LoginAccount {
                username: r.string()?,
                password: r.string()?,
            },
            tag::REQUEST_ROOM_LIST => ClientMessage::RequestRoomList,
            tag::CREATE_ROOM => ClientMessage::CreateRoom {
                name: r.string()?,
                max_players: r.u32()?,
                private: r.bool()?,
            },
            tag::JOIN_ROOM => ClientMessage::JoinRoom { room_id: r.u32()? },
            tag::LEAVE_ROOM => ClientMessage::LeaveRoom,
            tag::START_GAME => ClientMessage::StartGame,
            tag::PLAYER_INPUT => {
                let count = r.u8()? as usize;
                let mut snapshots = Vec::with_capacity(count);
                for _ in 0..count {
                    snapshots.push(InputSnapshot::read(&mut r)?);
                }
                ClientMessage::PlayerInput { snapshots }
            }
            tag::CHAT_MESSAGE_C2S => ClientMessage::ChatMessage { text: r.string()? },
            tag::PING => ClientMessage::Ping { timestamp: r.u64()? },
            other => return Err(ProtocolError::UnknownMessageType(other)),
        })
    }
}

impl ServerMessage {
    /// The reliability class this message is cataloged under (spec
    /// §4.7), used to pick the right `SendFlags` at the transport.
    pub fn reliability(&self) -> Reliability {
        match self {
            ServerMessage::HandshakeAck { .. } => Reliability::Reliable,
            ServerMessage::AuthResult { .. } => Reliability::Reliable,
            ServerMessage::RoomList { .. } => Reliability::Reliable,
            ServerMessage::CreateRoomResult { .. } => Reliability::Reliable,
            ServerMessage::RoomState { .. } => Reliability::Reliable,
            ServerMessage::LeftRoom { .. } => Reliability::Reliable,
            ServerMessage::GameStart { .. } => Reliability::Reliable,
            ServerMessage::GameState { .. } => Reliability::Unsequenced,
            ServerMessage::GameruleUpdate { .. } => Reliability::Reliable,
            ServerMessage::ChatMessage { .. } => Reliability::Reliable,
            ServerMessage::Pong { .. } => Reliability::Unreliable,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut w = Writer::new();
        match self {
            ServerMessage::HandshakeAck { assigned_player_id } => {
                w.u8(tag::HANDSHAKE_ACK).u64(*assigned_player_id);
            }
            ServerMessage::AuthResult { ok, message, authed_name } => {
                w.u8(tag::AUTH_RESULT).bool(*ok).string(message).string(authed_name);
            }
            ServerMessage::RoomList { rooms } => {
                w.u8(tag::ROOM_LIST);
                w.u32(rooms.len() as u32);
                for room in rooms {
                    w.u32(room.room_id)
                        .string(&room.name)
                        .u32(room.count)
                        .u32(room.max)
                        .bool(room.private)
                        .u8(room.state);
                }
            }
            ServerMessage::CreateRoomResult { room_id } => {
                w.u8(tag::CREATE_ROOM_RESULT).u32(*room_id);
            }
            ServerMessage::RoomState { room_name, members } => {
                w.u8(tag::ROOM_STATE).string(room_name);
                w.u32(members.len() as u32);
                for member in members {
                    w.u64(member.player_id)
                        .string(&member.name)
                        .bool(member.host)
                        .bool(member.spectator);
                }
            }
            ServerMessage::LeftRoom { player_id, reason, message } => {
                w.u8(tag::LEFT_ROOM).u64(*player_id).u8(reason.to_u8()).string(message);
            }
            ServerMessage::GameStart { your_entity_id, server_tick, entities } => {
                w.u8(tag::GAME_START).u32(*your_entity_id).u32(*server_tick);
                w.u32(entities.len() as u32);
                for entity in entities {
                    entity.write(&mut w);
                }
            }
            ServerMessage::GameState { server_tick, entities, is_game_over } => {
                w.u8(tag::GAME_STATE).u32(*server_tick);
                w.u32(entities.len() as u32);
                for entity in entities {
                    entity.write(&mut w);
                }
                w.bool(*is_game_over);
            }
            ServerMessage::GameruleUpdate { rules } => {
                w.u8(tag::GAMERULE_UPDATE);
                w.u32(rules.len() as u32);
                for (key, value) in rules {
                    w.string(key).f32(*value);
                }
            }
            ServerMessage::ChatMessage { player_id, name, text, timestamp } => {
                w.u8(tag::CHAT_MESSAGE_S2C)
                    .u64(*player_id)
                    .string(name)
                    .string(text)
                    .u64(*timestamp);
            }
            ServerMessage::Pong { timestamp } => {
                w.u8(tag::PONG).u64(*timestamp);
            }
        }
        w.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> ProtocolResult<Self> {
        let mut r = Reader::new(bytes);
        let type_byte = r.u8()?;
        Ok(match type_byte {
            tag::HANDSHAKE_ACK => ServerMessage::HandshakeAck { assigned_player_id: r.u64()? },
            tag::AUTH_RESULT => ServerMessage::AuthResult {
                ok: r.bool()?,
                message: r.string()?,
                authed_name: r.string()?,
            },
            tag::ROOM_LIST => {
                let count = r.u32()? as usize;
                let mut rooms = Vec::with_capacity(count);
                for _ in 0..count {
                    rooms.push(RoomSummary {
                        room_id: r.u32()?,
                        name: r.string()?,
                        count: r.u32()?,
                        max: r.u32()?,
                        private: r.bool()?,
                        state: r.u8()?,
                    });
                }
                ServerMessage::RoomList { rooms }
            }
            tag::CREATE_ROOM_RESULT => ServerMessage::CreateRoomResult { room_id: r.u32()? },
            tag::ROOM_STATE => {
                let room_name = r.string()?;
                let count = r.u32()? as usize;
                let mut members = Vec::with_capacity(count);
                for _ in 0..count {
                    members.push(RoomMember {
                        player_id: r.u64()?,
                        name: r.string()?,
                        host: r.bool()?,
                        spectator: r.bool()?,
                    });
                }
                ServerMessage::RoomState { room_name, members }
            }
            tag::LEFT_ROOM => ServerMessage::LeftRoom {
                player_id: r.u64()?,
                reason: LeftRoomReason::from_u8(r.u8()?)?,
                message: r.string()?,
            },
            tag::GAME_START => {
                let your_entity_id = r.u32()?;
                let server_tick = r.u32()?;
                let count = r.u32()? as usize;
                let mut entities = Vec::with_capacity(count);
                for _ in 0..count {
                    entities.push(EntityState::read(&mut r)?);
                }
                ServerMessage::GameStart { your_entity_id, server_tick, entities }
            }
            tag::GAME_STATE => {
                let server_tick = r.u32()?;
                let count = r.u32()? as usize;
                let mut entities = Vec::with_capacity(count);
                for _ in 0..count {
                    entities.push(EntityState::read(&mut r)?);
                }
                let is_game_over = r.bool()?;
                ServerMessage::GameState { server_tick, entities, is_game_over }
            }
            tag::GAMERULE_UPDATE => {
                let count = r.u32()? as usize;
                let mut rules = Vec::with_capacity(count);
                for _ in 0..count {
                    rules.push((r.string()?, r.f32()?));
                }
                ServerMessage::GameruleUpdate { rules }
            }
            tag::CHAT_MESSAGE_S2C => ServerMessage::ChatMessage {
                player_id: r.u64()?,
                name: r.string()?,
                text: r.string()?,
                timestamp: r.u64()?,
            },
            tag::PONG => ServerMessage::Pong { timestamp: r.u64()? },
            other => return Err(ProtocolError::UnknownMessageType(other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_state_round_trip_is_bytewise_exact() {
        let state = EntityState {
            entity_id: 42,
            type_tag: EntityTypeTag::Player,
            x: 123.5,
            y: -7.25,
            health: Some(100),
            animation_tag: "idle".to_string(),
            sprite_src_rect: SpriteRect { x: 16, y: 32, w: 33, h: 17 },
            last_processed_input_seq: 1234,
        };

        let mut w = Writer::new();
        state.write(&mut w);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        let decoded = EntityState::read(&mut r).unwrap();
        assert_eq!(decoded, state);

        let mut w2 = Writer::new();
        decoded.write(&mut w2);
        assert_eq!(w2.into_bytes(), bytes);
    }

    #[test]
    fn player_input_round_trip_preserves_order_and_dedup_key() {
        let msg = ClientMessage::PlayerInput {
            snapshots: vec![
                InputSnapshot { seq: 1, actions: vec![ActionTag::Right, ActionTag::Shoot] },
                InputSnapshot { seq: 2, actions: vec![ActionTag::Left] },
            ],
        };
        let bytes = msg.encode();
        let decoded = ClientMessage::decode(&bytes).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn unknown_message_type_is_reported_not_panicking() {
        let bytes = vec![250u8, 1, 2, 3];
        let err = ClientMessage::decode(&bytes).unwrap_err();
        matches!(err, ProtocolError::UnknownMessageType(250));
    }

    #[test]
    fn movement_derives_cardinal_from_actions() {
        let snap = InputSnapshot { seq: 0, actions: vec![ActionTag::Right, ActionTag::Down] };
        assert_eq!(snap.movement(), (1, 1));
        assert!(!snap.shoot());
    }

    #[test]
    fn game_state_round_trip() {
        let msg = ServerMessage::GameState {
            server_tick: 500,
            entities: vec![EntityState {
                entity_id: 1,
                type_tag: EntityTypeTag::EnemyDrone,
                x: 1.0,
                y: 2.0,
                health: None,
                animation_tag: String::new(),
                sprite_src_rect: SpriteRect { x: 0, y: 0, w: 0, h: 0 },
                last_processed_input_seq: 0,
            }],
            is_game_over: true,
        };
        let bytes = msg.encode();
        assert_eq!(ServerMessage::decode(&bytes).unwrap(), msg);
    }
}
