//! TCP server for the remote-play adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking; the session itself lives in the game loop.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::core::SessionSnapshot;
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};

/// Stable 64-bit FNV-1a hasher for `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl std::hash::Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(u8::is_ascii_digit).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
        }
    }
}

impl ServerConfig {
    /// Create from `CARD_CRUSH_AI_*` environment variables.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("CARD_CRUSH_AI_HOST").unwrap_or(defaults.host);
        let port = env::var("CARD_CRUSH_AI_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let max_pending_commands = env::var("CARD_CRUSH_AI_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pending_commands);

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }

    /// `CARD_CRUSH_AI_DISABLED` is `1` or `true`.
    pub fn is_disabled() -> bool {
        std::env::var("CARD_CRUSH_AI_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

/// Connection counters shared with the front-end status panel.
#[derive(Debug, Default)]
pub struct AdapterStats {
    clients: AtomicU16,
    streaming: AtomicU16,
    /// Controller client id, 0 when nobody controls.
    controller: AtomicU64,
}

impl AdapterStats {
    pub fn client_count(&self) -> u16 {
        self.clients.load(Ordering::Relaxed)
    }

    pub fn streaming_count(&self) -> u16 {
        self.streaming.load(Ordering::Relaxed)
    }

    pub fn controller_id(&self) -> Option<u64> {
        match self.controller.load(Ordering::Relaxed) {
            0 => None,
            id => Some(id),
        }
    }

    fn publish(&self, clients: &[ClientHandle], controller: Option<u64>) {
        let handshaken = clients.iter().filter(|c| c.handshaken).count();
        let streaming = clients.iter().filter(|c| c.stream_observations).count();
        self.clients.store(handshaken as u16, Ordering::Relaxed);
        self.streaming.store(streaming as u16, Ordering::Relaxed);
        self.controller.store(controller.unwrap_or(0), Ordering::Relaxed);
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<u64>>,
    stats: Arc<AdapterStats>,
}

impl ServerState {
    pub fn new(config: ServerConfig, stats: Arc<AdapterStats>) -> Self {
        Self {
            config,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            stats,
        }
    }

    async fn send_to(&self, client_id: u64, msg: ClientOutbound) {
        let clients = self.clients.read().await;
        if let Some(c) = clients.iter().find(|c| c.id == client_id) {
            let _ = c.tx.send(msg);
        }
    }
}

async fn is_handshaken(state: &ServerState, client_id: u64) -> bool {
    let clients = state.clients.read().await;
    clients
        .iter()
        .find(|c| c.id == client_id)
        .map(|c| c.handshaken)
        .unwrap_or(false)
}

async fn check_and_update_seq(state: &ServerState, client_id: u64, seq: u64) -> bool {
    let mut clients = state.clients.write().await;
    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
        return true;
    };

    match client.last_seq {
        Some(prev) if seq <= prev => false,
        _ => {
            client.last_seq = Some(seq);
            true
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: u64,
    pub addr: SocketAddr,
    pub is_controller: bool,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Ack(AckMessage),
    Error(ErrorMessage),
    Welcome(WelcomeMessage),
    Observation(Arc<ObservationMessage>),
}

impl ClientOutbound {
    fn encode_into(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        fn write<T: Serialize>(buf: &mut Vec<u8>, value: &T) -> serde_json::Result<()> {
            serde_json::to_writer(&mut *buf, value)?;
            buf.push(b'\n');
            Ok(())
        }

        buf.clear();
        match self {
            ClientOutbound::Ack(m) => write(buf, m),
            ClientOutbound::Error(m) => write(buf, m),
            ClientOutbound::Welcome(m) => write(buf, m),
            ClientOutbound::Observation(m) => write(buf, m.as_ref()),
        }
    }
}

/// Start the TCP server.
///
/// `ready_tx` receives the bound address (useful with port 0). `stats`, when
/// given, is kept up to date with connection counts.
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
    stats: Option<Arc<AdapterStats>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind adapter on {addr}"))?;
    let bound = listener.local_addr()?;
    println!("[Adapter] TCP server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config, stats.unwrap_or_default()));
    let mut client_id_counter = 0u64;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                match msg {
                    OutboundMessage::ToClientObservation { client_id, obs } => {
                        state
                            .send_to(client_id, ClientOutbound::Observation(Arc::new(obs)))
                            .await;
                    }
                    OutboundMessage::BroadcastObservation { obs } => {
                        let obs = Arc::new(obs);
                        let clients = state.clients.read().await;
                        for c in clients.iter().filter(|c| c.stream_observations) {
                            let _ = c.tx.send(ClientOutbound::Observation(Arc::clone(&obs)));
                        }
                    }
                    OutboundMessage::ToClientAck { client_id, ack } => {
                        state.send_to(client_id, ClientOutbound::Ack(ack)).await;
                    }
                    OutboundMessage::ToClientError { client_id, err } => {
                        state.send_to(client_id, ClientOutbound::Error(err)).await;
                    }
                }
            }
        });
    }

    // Accept incoming connections
    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        println!("[Adapter] Client {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx).await {
                eprintln!("[Adapter] Client {} error: {}", client_id, e);
            }
            println!("[Adapter] Client {} disconnected", client_id);
        });
    }
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: u64,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            is_controller: false,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            if msg.encode_into(&mut buf).is_err() {
                continue;
            }
            if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
                break;
            }
        }
    });

    let send_error = |seq: u64, code: ErrorCode, message: &str| {
        let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
    };

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, hello.seq).await
                {
                    send_error(hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                if !hello.protocol_version.starts_with(PROTOCOL_MAJOR) {
                    send_error(
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                let (role, controller_id) = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    let became_controller = controller.is_none();
                    if became_controller {
                        *controller = Some(client_id);
                        println!("[Adapter] Client {} is now controller", client_id);
                    }
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.stream_observations = hello.requested.stream_observations;
                        client.is_controller |= became_controller;
                    }
                    state.stats.publish(&clients, *controller);

                    let role = if *controller == Some(client_id) {
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    (role, *controller)
                };

                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id,
                    role,
                    controller_id,
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if hello.requested.stream_observations {
                    let _ = command_tx.try_send(InboundCommand {
                        client_id,
                        seq: hello.seq,
                        payload: InboundPayload::SnapshotRequest,
                    });
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !is_handshaken(&state, client_id).await {
                    send_error(cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }

                if !check_and_update_seq(&state, client_id, cmd.seq).await {
                    send_error(cmd.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                let is_controller = *state.controller.read().await == Some(client_id);
                if !is_controller {
                    send_error(cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err((code, message)) => {
                        send_error(cmd.seq, code, &message);
                        continue;
                    }
                };

                // Ack is sent by the game loop once the command is applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(mapped),
                    })
                    .is_err()
                {
                    send_error(cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, unknown.seq).await
                {
                    send_error(unknown.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                send_error(unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                send_error(seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {}", e));
            }
        }
    }

    // Remove the client; promote the lowest remaining handshaken id if it controlled.
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;

        clients.retain(|c| c.id != client_id);

        if *controller == Some(client_id) {
            let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            *controller = next_id;
            match next_id {
                Some(new_id) => {
                    if let Some(c) = clients.iter_mut().find(|c| c.id == new_id) {
                        c.is_controller = true;
                    }
                    println!("[Adapter] Client {} promoted to controller", new_id);
                }
                None => println!("[Adapter] Controller {} released", client_id),
            }
        }
        state.stats.publish(&clients, *controller);
    }

    drop(tx);
    let _ = write_task.await;

    Ok(())
}

/// Map a protocol command into a session command.
fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, (ErrorCode, String)> {
    match cmd.action {
        CommandAction::Tap => match (cmd.row, cmd.col) {
            (Some(row), Some(col)) => Ok(ClientCommand::Tap { row, col }),
            _ => Err((ErrorCode::InvalidCommand, "tap requires row and col".to_string())),
        },
        CommandAction::Reset => Ok(ClientCommand::Reset),
        CommandAction::Load => match cmd.seed.as_deref().map(str::trim) {
            Some(seed) if !seed.is_empty() => Ok(ClientCommand::Load {
                seed: seed.to_string(),
            }),
            _ => Err((ErrorCode::InvalidSeed, "load requires a non-empty seed".to_string())),
        },
    }
}

/// Build an observation from a session snapshot.
///
/// `memo` is only included once the session can be submitted.
pub fn build_observation(
    snap: &SessionSnapshot,
    seq: u64,
    memo: Option<&str>,
    last_tap: Option<TapResult>,
) -> ObservationMessage {
    use std::hash::{Hash, Hasher};

    let grid: Vec<Vec<u8>> = snap.rows().map(<[u8]>::to_vec).collect();

    let mut hasher = Fnv1aHasher::new();
    snap.seed.hash(&mut hasher);
    grid.hash(&mut hasher);
    snap.selected.hash(&mut hasher);
    snap.turn.hash(&mut hasher);
    snap.turn_limit.hash(&mut hasher);
    snap.score.hash(&mut hasher);
    for entry in &snap.moves {
        entry.to_string().hash(&mut hasher);
    }
    snap.affected.hash(&mut hasher);
    let state_hash = StateHash(hasher.finish());

    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        seed: snap.seed.clone(),
        grid_size: snap.grid_size,
        grid,
        selected: snap.selected.map(|p| [p.row, p.col]),
        turn: snap.turn,
        turn_limit: snap.turn_limit,
        score: snap.score,
        moves: snap.moves.iter().map(ToString::to_string).collect(),
        affected: snap.affected.to_pairs(),
        can_submit: snap.can_submit,
        memo: memo.filter(|_| snap.can_submit).map(str::to_string),
        last_tap,
        state_hash,
    }
}
