//! Adapter module - remote play via TCP socket with a JSON protocol
//!
//! External agents (bots, solvers, test harnesses) play the current session
//! through a line-delimited JSON protocol over TCP.
//!
//! # Protocol Overview
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller;
//!    when it disconnects the lowest remaining client id is promoted
//! 4. **Commanding**: Controller sends `tap`, `reset` or `load` commands
//! 5. **Observation Streaming**: After each applied command, streaming clients
//!    receive the full session state
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Handshake with client info and `requested.stream_observations`
//! - **command**: `action` is `tap` (with `row`, `col`), `reset` or `load` (with `seed`)
//!
//! ## Server → Client
//!
//! - **welcome**: Assigned role and server capabilities
//! - **observation**: Grid, selection, turn/limit, score, moves, affected cells,
//!   submission memo once available, and a stable `state_hash`
//! - **ack**: Command applied
//! - **error**: `code` is one of `handshake_required`, `protocol_mismatch`,
//!   `not_controller`, `invalid_command`, `invalid_seed`, `backpressure`
//!
//! # Environment Variables
//!
//! - `CARD_CRUSH_AI_HOST`: Bind address (default: "127.0.0.1")
//! - `CARD_CRUSH_AI_PORT`: Port number (default: 7878)
//! - `CARD_CRUSH_AI_MAX_PENDING`: Command queue bound (default: 10)
//! - `CARD_CRUSH_AI_DISABLED`: Set to "1" or "true" to disable the adapter
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1700000000000,"client":{"name":"bot","version":"0.1"},"protocol_version":"1.0.0"}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1700000000001,"protocol_version":"1.0.0","client_id":1,"role":"controller",...}
//! Server -> Client: {"type":"observation","seq":1,"ts":1700000000002,"seed":"abc","grid_size":6,"grid":[[...]],...}
//! Client -> Server: {"type":"command","seq":2,"ts":1700000000003,"action":"tap","row":2,"col":1}
//! Server -> Client: {"type":"ack","seq":2,"ts":1700000000004,"status":"ok"}
//! ```
//!
//! Connect with netcat for manual testing:
//!
//! ```bash
//! nc 127.0.0.1 7878
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;

pub use card_crush_core as core;
pub use card_crush_types as types;

pub use protocol::*;
pub use runtime::{apply_command, Adapter, Applied, CommandRouter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::{build_observation, run_server, AdapterStats, ClientOutbound, ServerConfig};
