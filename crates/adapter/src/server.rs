//! TCP server for the AI adapter
//!
//! Accepts connections, runs the hello/command/observe protocol, and applies
//! controller commands directly to the shared session.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info, warn};

use crate::core::{Session, SessionSnapshot};
use crate::protocol::*;
use crate::types::{Direction, GameAction};

/// The session shared by the terminal loop and adapter tasks.
///
/// Every access takes the lock for one call and releases it before any
/// `.await`.
pub type SharedSession = Arc<Mutex<Session>>;

pub fn shared_session(session: Session) -> SharedSession {
    Arc::new(Mutex::new(session))
}

/// Lock the session, recovering from a poisoned lock (the grid is `Copy`
/// and always left consistent between calls).
pub fn lock_session(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

pub const DEFAULT_PORT: u16 = 7848;

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Create from `TWENTY48_AI_HOST` / `TWENTY48_AI_PORT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = lookup("TWENTY48_AI_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "127.0.0.1".to_string());
        let port = lookup("TWENTY48_AI_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self { host, port }
    }

    /// `TWENTY48_AI_DISABLED` set to `1` or `true`.
    pub fn is_disabled() -> bool {
        std::env::var("TWENTY48_AI_DISABLED")
            .map(|v| is_truthy(&v))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }
}

pub(crate) fn is_truthy(v: &str) -> bool {
    let v = v.trim();
    v == "1" || v.eq_ignore_ascii_case("true")
}

/// Handle to a connected client
struct ClientHandle {
    id: usize,
    addr: SocketAddr,
    handshaken: bool,
    last_seq: Option<u64>,
    tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
enum ClientOutbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Error(ErrorMessage),
    Observation(ObservationMessage),
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    session: SharedSession,
    clients: RwLock<Vec<ClientHandle>>,
    controller: RwLock<Option<usize>>,
    next_client_id: AtomicUsize,
    observation_seq: AtomicU64,
    // Mirrors of `clients`/`controller` readable without awaiting.
    client_count: AtomicUsize,
    has_controller: AtomicBool,
}

impl ServerState {
    pub fn new(config: ServerConfig, session: SharedSession) -> Self {
        Self {
            config,
            session,
            clients: RwLock::new(Vec::new()),
            controller: RwLock::new(None),
            next_client_id: AtomicUsize::new(1),
            observation_seq: AtomicU64::new(0),
            client_count: AtomicUsize::new(0),
            has_controller: AtomicBool::new(false),
        }
    }

    pub fn client_count(&self) -> usize {
        self.client_count.load(Ordering::Relaxed)
    }

    pub fn has_controller(&self) -> bool {
        self.has_controller.load(Ordering::Relaxed)
    }

    /// Send the current session state to every handshaken client.
    ///
    /// Broadcasts answer no request, so they carry the server's own
    /// observation counter as `seq`.
    pub async fn broadcast_observation(&self, snap: &SessionSnapshot) {
        let obs = build_observation(self.next_observation_seq(), snap);
        let clients = self.clients.read().await;
        for c in clients.iter().filter(|c| c.handshaken) {
            let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
        }
    }

    fn next_observation_seq(&self) -> u64 {
        self.observation_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn is_handshaken(&self, client_id: usize) -> bool {
        let clients = self.clients.read().await;
        clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| c.handshaken)
            .unwrap_or(false)
    }

    /// Record `seq` for the client; `false` if it does not strictly increase.
    async fn check_and_update_seq(&self, client_id: usize, seq: u64) -> bool {
        let mut clients = self.clients.write().await;
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

    async fn is_controller(&self, client_id: usize) -> bool {
        *self.controller.read().await == Some(client_id)
    }

    /// Mark the client handshaken and assign a role. The first client to
    /// complete a hello while no controller exists becomes the controller.
    async fn complete_handshake(&self, client_id: usize, seq: u64) -> AssignedRole {
        {
            let mut clients = self.clients.write().await;
            if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                client.handshaken = true;
                client.last_seq = Some(seq);
            }
        }

        let mut controller = self.controller.write().await;
        match *controller {
            Some(id) if id == client_id => AssignedRole::Controller,
            Some(_) => AssignedRole::Observer,
            None => {
                *controller = Some(client_id);
                self.has_controller.store(true, Ordering::Relaxed);
                info!(client_id, "client is now controller");
                AssignedRole::Controller
            }
        }
    }

    async fn register(&self, id: usize, addr: SocketAddr, tx: mpsc::UnboundedSender<ClientOutbound>) {
        let mut clients = self.clients.write().await;
        clients.push(ClientHandle {
            id,
            addr,
            handshaken: false,
            last_seq: None,
            tx,
        });
        self.client_count.store(clients.len(), Ordering::Relaxed);
    }

    async fn unregister(&self, client_id: usize) {
        {
            let mut clients = self.clients.write().await;
            clients.retain(|c| c.id != client_id);
            self.client_count.store(clients.len(), Ordering::Relaxed);
        }
        let mut controller = self.controller.write().await;
        if *controller == Some(client_id) {
            *controller = None;
            self.has_controller.store(false, Ordering::Relaxed);
            info!(client_id, "controller released");
        }
    }

    async fn peer_addr(&self, client_id: usize) -> Option<SocketAddr> {
        let clients = self.clients.read().await;
        clients.iter().find(|c| c.id == client_id).map(|c| c.addr)
    }
}

/// Build an observation from a snapshot.
pub fn build_observation(seq: u64, snap: &SessionSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        ts: current_timestamp_ms(),
        grid: snap.grid,
        status: snap.status.into(),
        episode_id: snap.episode_id,
        moves: snap.moves,
        max_tile: snap.max_tile,
        win_tile: snap.win_tile,
        legal: LegalMoves {
            up: snap.is_legal(Direction::Up),
            down: snap.is_legal(Direction::Down),
            left: snap.is_legal(Direction::Left),
            right: snap.is_legal(Direction::Right),
        },
    }
}

/// Bind the configured address and serve until the listener fails.
///
/// `ready_tx` receives the bound address (useful with port 0).
pub async fn run_server(
    state: Arc<ServerState>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = state.config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind adapter on {addr}"))?;
    let bound = listener.local_addr()?;
    info!(%bound, "adapter listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    loop {
        let (socket, peer) = listener.accept().await?;
        let client_id = state.next_client_id.fetch_add(1, Ordering::Relaxed);
        info!(client_id, %peer, "client connected");

        let state = Arc::clone(&state);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, peer, client_id, state).await {
                warn!(client_id, error = %e, "client error");
            }
            info!(client_id, "client disconnected");
        });
    }
}

/// Handle a single client connection.
///
/// The client is unregistered exactly once here, whether the read loop ends
/// on EOF, a protocol mismatch, or an I/O error.
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
) -> anyhow::Result<()> {
    let (reader, writer) = socket.into_split();

    let (tx, rx) = mpsc::unbounded_channel::<ClientOutbound>();
    state.register(client_id, addr, tx.clone()).await;

    let write_task = tokio::spawn(write_loop(writer, rx));

    let result = read_loop(BufReader::new(reader), client_id, &state, &tx).await;

    if let Some(peer) = state.peer_addr(client_id).await {
        debug!(client_id, %peer, "closing connection");
    }
    // The registered handle holds a sender clone; drop both so the writer
    // drains queued replies (e.g. a protocol_mismatch error) and exits.
    drop(tx);
    state.unregister(client_id).await;
    let _ = write_task.await;
    result
}

async fn read_loop(
    mut reader: BufReader<tokio::net::tcp::OwnedReadHalf>,
    client_id: usize,
    state: &ServerState,
    tx: &mpsc::UnboundedSender<ClientOutbound>,
) -> anyhow::Result<()> {
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if state.is_handshaken(client_id).await
                    && !state.check_and_update_seq(client_id, hello.seq).await
                {
                    send_error(tx, hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                if !is_compatible_version(&hello.protocol_version) {
                    warn!(client_id, version = %hello.protocol_version, "protocol mismatch");
                    send_error(
                        tx,
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                let role = state.complete_handshake(client_id, hello.seq).await;
                debug!(client_id, client = %hello.client.name, ?role, "hello");
                let _ = tx.send(ClientOutbound::Welcome(create_welcome(hello.seq, client_id as u64, role)));

                let snap = lock_session(&state.session).snapshot();
                let _ = tx.send(ClientOutbound::Observation(build_observation(hello.seq, &snap)));
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(tx, cmd.seq, ErrorCode::HandshakeRequired, "send hello before command");
                    continue;
                }
                if !state.check_and_update_seq(client_id, cmd.seq).await {
                    send_error(tx, cmd.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                if !state.is_controller(client_id).await {
                    send_error(tx, cmd.seq, ErrorCode::NotController, "only the controller may send commands");
                    continue;
                }

                let action = match map_command(&cmd) {
                    Ok(a) => a,
                    Err(message) => {
                        send_error(tx, cmd.seq, ErrorCode::InvalidCommand, message);
                        continue;
                    }
                };

                let (ack, snap) = {
                    let mut session = lock_session(&state.session);
                    let ack = match session.apply_action(action) {
                        Some(result) => create_move_ack(cmd.seq, &result),
                        None => create_ack(cmd.seq, true, session.status(), None),
                    };
                    (ack, session.snapshot())
                };
                let _ = tx.send(ClientOutbound::Ack(ack));
                state.broadcast_observation(&snap).await;
            }

            Ok(ParsedMessage::Observe(obs)) => {
                if !state.is_handshaken(client_id).await {
                    send_error(tx, obs.seq, ErrorCode::HandshakeRequired, "send hello before observe");
                    continue;
                }
                if !state.check_and_update_seq(client_id, obs.seq).await {
                    send_error(tx, obs.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                let snap = lock_session(&state.session).snapshot();
                let _ = tx.send(ClientOutbound::Observation(build_observation(obs.seq, &snap)));
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                warn!(client_id, msg_type = %unknown.msg_type, "unknown message type");
                send_error(
                    tx,
                    unknown.seq,
                    ErrorCode::InvalidCommand,
                    &format!("unknown message type: {}", unknown.msg_type),
                );
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                warn!(client_id, error = %e, "malformed message");
                send_error(tx, seq, ErrorCode::InvalidCommand, &format!("parse error: {e}"));
            }
        }
    }

    Ok(())
}

fn map_command(cmd: &CommandMessage) -> Result<GameAction, &'static str> {
    match cmd.action {
        CommandAction::Move => cmd
            .direction
            .map(|d| GameAction::Move(d.into()))
            .ok_or("move requires a direction"),
        CommandAction::Restart => Ok(GameAction::Restart),
    }
}

fn send_error(tx: &mpsc::UnboundedSender<ClientOutbound>, seq: u64, code: ErrorCode, message: &str) {
    let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
}

async fn write_loop(
    mut writer: tokio::net::tcp::OwnedWriteHalf,
    mut rx: mpsc::UnboundedReceiver<ClientOutbound>,
) {
    let mut buf: Vec<u8> = Vec::with_capacity(1024);
    while let Some(msg) = rx.recv().await {
        buf.clear();
        let encoded = match &msg {
            ClientOutbound::Welcome(m) => encode_line(&mut buf, m),
            ClientOutbound::Ack(m) => encode_line(&mut buf, m),
            ClientOutbound::Error(m) => encode_line(&mut buf, m),
            ClientOutbound::Observation(m) => encode_line(&mut buf, m),
        };
        if encoded.is_err() {
            continue;
        }
        if writer.write_all(&buf).await.is_err() || writer.flush().await.is_err() {
            break;
        }
    }
    let _ = writer.shutdown().await;
}

fn encode_line<T: Serialize>(buf: &mut Vec<u8>, msg: &T) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *buf, msg)?;
    buf.push(b'\n');
    Ok(())
}
