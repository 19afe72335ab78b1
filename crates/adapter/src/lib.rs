//! Adapter module - AI control via TCP socket with JSON protocol
//!
//! Lets an external agent play the game over a TCP socket. The terminal
//! player and the agent act on the same session.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7848)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//!    and an initial `observation`
//! 3. **Controller Assignment**: First client to hello becomes the controller;
//!    the role is released when that client disconnects
//! 4. **Commanding**: Controller sends `command` (move or restart), receives
//!    an `ack`, and every handshaken client gets a fresh `observation`
//! 5. **Polling**: Any handshaken client may send `observe`
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: client info and protocol version (major must be 1)
//! - **command**: `{"action":"move","direction":"left"}` or `{"action":"restart"}`
//! - **observe**: request the current state
//!
//! ## Server → Client
//!
//! - **welcome**: assigned role (`controller` or `observer`)
//! - **ack**: whether the grid changed, resulting status, spawned tile
//! - **observation**: grid, status, moves, episode, largest tile, legal moves
//! - **error**: `handshake_required`, `protocol_mismatch`, `not_controller`,
//!   or `invalid_command`
//!
//! # Environment Variables
//!
//! - `TWENTY48_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `TWENTY48_AI_PORT`: Port number (default: 7848)
//! - `TWENTY48_AI_DISABLED`: Set to "1" or "true" to disable adapter entirely
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000000,"protocol_version":"1.0.0","client_id":1,"role":"controller","game_id":"tui-2048"}
//! Server -> Client: {"type":"observation","seq":1,"ts":1700000000000,"grid":[[2,0,0,0],...],"status":"active",...}
//! Client -> Server: {"type":"command","seq":2,"action":"move","direction":"left"}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000001,"changed":true,"status":"active","spawned":{"row":3,"col":1,"value":2}}
//! ```
//!
//! # Testing
//!
//! ```bash
//! nc 127.0.0.1 7848
//! {"type":"hello","seq":1,"client":{"name":"nc","version":"0"},"protocol_version":"1.0.0"}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use tui_2048_core as core;
pub use tui_2048_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::Adapter;
pub use server::{
    build_observation, lock_session, run_server, shared_session, ServerConfig, ServerState,
    SharedSession, DEFAULT_PORT,
};
