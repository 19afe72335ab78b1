//! Protocol module - JSON message types for the AI adapter
//!
//! Line-delimited JSON. Every message carries `type` and `seq`; server
//! messages also carry `ts` (milliseconds since the Unix epoch).
//!
//! # Sequence numbers
//!
//! Client `seq` values must strictly increase per connection. A server
//! message that answers a request echoes that request's `seq`: the welcome
//! and the observation sent after a hello, the observation answering an
//! observe, every ack, and every error. Observations broadcast after the
//! session changes answer no request and carry a server-wide counter that
//! starts at 1 and increases by one per broadcast.

use serde::{Deserialize, Serialize};

use crate::core::{MoveResult, SpawnedTile};
use crate::types::{Direction, GameStatus, Row, Tile, GRID_SIZE};

/// Protocol version spoken by this server. Clients must share the major part.
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Client hello message (first message on a connection)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HelloMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAction {
    Move,
    Restart,
}

/// Direction spelled the way it travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionLower {
    Up,
    Down,
    Left,
    Right,
}

impl From<Direction> for DirectionLower {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => Self::Up,
            Direction::Down => Self::Down,
            Direction::Left => Self::Left,
            Direction::Right => Self::Right,
        }
    }
}

impl From<DirectionLower> for Direction {
    fn from(d: DirectionLower) -> Self {
        match d {
            DirectionLower::Up => Self::Up,
            DirectionLower::Down => Self::Down,
            DirectionLower::Left => Self::Left,
            DirectionLower::Right => Self::Right,
        }
    }
}

/// Command message (controller only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CommandMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
    pub action: CommandAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<DirectionLower>,
}

/// Request for a one-off observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObserveMessage {
    pub seq: u64,
    #[serde(default)]
    pub ts: u64,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    ProtocolMismatch,
    NotController,
    InvalidCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignedRole {
    Controller,
    Observer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLower {
    Active,
    Won,
    Lost,
}

impl From<GameStatus> for StatusLower {
    fn from(s: GameStatus) -> Self {
        match s {
            GameStatus::Active => Self::Active,
            GameStatus::Won => Self::Won,
            GameStatus::Lost => Self::Lost,
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    pub client_id: u64,
    pub role: AssignedRole,
    pub game_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnedWire {
    pub row: u8,
    pub col: u8,
    pub value: Tile,
}

impl From<SpawnedTile> for SpawnedWire {
    fn from(s: SpawnedTile) -> Self {
        Self {
            row: s.row as u8,
            col: s.col as u8,
            value: s.value,
        }
    }
}

/// Acknowledgment for an applied command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    pub changed: bool,
    pub status: StatusLower,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawned: Option<SpawnedWire>,
}

/// Error message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Per-direction legality in an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LegalMoves {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Session state (sent to a requesting client or broadcast after a change)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub grid: [Row; GRID_SIZE],
    pub status: StatusLower,
    pub episode_id: u32,
    pub moves: u32,
    pub max_tile: Tile,
    pub win_tile: Tile,
    pub legal: LegalMoves,
}

// ============== Message Parsing ==============

/// Parsed incoming message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Observe(ObserveMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Parse one inbound line.
///
/// A well-formed object with an unrecognized `type` is `Unknown`, not an
/// error, so the server can answer with the right `seq`.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
        #[serde(rename = "observe")]
        Observe(ObserveMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Header {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let header = serde_json::from_str::<Header>(json)?;
            let msg_type = header.msg_type.unwrap_or_default();
            if matches!(msg_type.as_str(), "hello" | "command" | "observe") {
                return Err(e);
            }
            Ok(ParsedMessage::Unknown(UnknownMessage {
                seq: header.seq.unwrap_or(0),
                msg_type,
            }))
        }
    }
}

/// Pull `seq` out of a line that failed to parse, if it is there at all.
pub fn extract_seq_best_effort(line: &str) -> Option<u64> {
    let value: serde_json::Value = serde_json::from_str(line).ok()?;
    value.get("seq")?.as_u64()
}

/// `true` when `version` has the same major component as ours.
pub fn is_compatible_version(version: &str) -> bool {
    let ours = PROTOCOL_VERSION.split('.').next();
    let theirs = version.split('.').next().filter(|s| !s.is_empty());
    theirs.is_some() && theirs == ours
}

// ============== Utility Functions ==============

/// Create a hello message (used by tests and sample clients)
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
    }
}

pub fn create_welcome(seq: u64, client_id: u64, role: AssignedRole) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: PROTOCOL_VERSION.to_string(),
        client_id,
        role,
        game_id: "tui-2048".to_string(),
    }
}

/// Create an acknowledgment for an applied command.
///
/// A restart is acknowledged as a change with the fresh session status.
pub fn create_ack(seq: u64, changed: bool, status: GameStatus, spawned: Option<SpawnedTile>) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        changed,
        status: status.into(),
        spawned: spawned.map(Into::into),
    }
}

pub fn create_move_ack(seq: u64, result: &MoveResult) -> AckMessage {
    create_ack(seq, result.changed, result.status(), result.spawned)
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
