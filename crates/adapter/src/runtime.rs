//! Adapter runtime integration.
//!
//! Bridges the sync game loop with the async TCP server.

use std::sync::Arc;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;

use crate::core::{Session, SessionSnapshot, TapOutcome};
use crate::protocol::{create_ack, create_error, AckMessage, ErrorCode, ErrorMessage, ObservationMessage};
use crate::server::{build_observation, run_server, AdapterStats, ServerConfig};
use crate::types::Pos;

/// Command delivered to the game loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: u64,
    pub seq: u64,
    pub payload: InboundPayload,
}

#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// A client finished its handshake and wants the current state.
    SnapshotRequest,
    Command(ClientCommand),
}

/// Command payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    Tap { row: u8, col: u8 },
    Reset,
    Load { seed: String },
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientObservation { client_id: u64, obs: ObservationMessage },
    BroadcastObservation { obs: ObservationMessage },
    ToClientAck { client_id: u64, ack: AckMessage },
    ToClientError { client_id: u64, err: ErrorMessage },
}

/// A command that changed the session.
#[derive(Debug, Clone)]
pub enum Applied {
    Tap(TapOutcome),
    Reset,
    Load,
}

impl Applied {
    pub fn tap_outcome(&self) -> Option<&TapOutcome> {
        match self {
            Applied::Tap(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Apply a remote command to the session.
///
/// Taps never fail; their outcome is kept for the front-end's animation.
/// A `load` with an unusable seed leaves the session untouched.
pub fn apply_command(
    session: &mut Session,
    command: &ClientCommand,
) -> Result<Applied, (ErrorCode, String)> {
    match command {
        ClientCommand::Tap { row, col } => Ok(Applied::Tap(session.tap(Pos::new(*row, *col)))),
        ClientCommand::Reset => {
            session.reset();
            Ok(Applied::Reset)
        }
        ClientCommand::Load { seed } => session
            .load(seed)
            .map(|_| Applied::Load)
            .map_err(|e| (ErrorCode::InvalidSeed, e.to_string())),
    }
}

/// Applies inbound commands to a session and queues the replies.
///
/// Replies are `ack` or `error` to the sender, then an observation: to the
/// sender for a snapshot request, to every streaming client after an applied
/// command.
#[derive(Debug, Default)]
pub struct CommandRouter {
    seq: u64,
}

impl CommandRouter {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    /// Returns what was applied, if anything, so the caller can follow up.
    pub fn handle(
        &mut self,
        inbound: InboundCommand,
        session: &mut Session,
        snap: &mut SessionSnapshot,
        out: &mpsc::UnboundedSender<OutboundMessage>,
    ) -> Option<Applied> {
        match inbound.payload {
            InboundPayload::SnapshotRequest => {
                session.snapshot_into(snap);
                let memo = session.can_submit().then(|| session.submission().memo());
                let obs = build_observation(snap, self.next_seq(), memo.as_deref(), None);
                let _ = out.send(OutboundMessage::ToClientObservation {
                    client_id: inbound.client_id,
                    obs,
                });
                None
            }
            InboundPayload::Command(command) => match apply_command(session, &command) {
                Ok(applied) => {
                    let _ = out.send(OutboundMessage::ToClientAck {
                        client_id: inbound.client_id,
                        ack: create_ack(inbound.seq),
                    });
                    session.snapshot_into(snap);
                    let memo = session.can_submit().then(|| session.submission().memo());
                    let last_tap = applied.tap_outcome().map(Into::into);
                    let obs = build_observation(snap, self.next_seq(), memo.as_deref(), last_tap);
                    let _ = out.send(OutboundMessage::BroadcastObservation { obs });
                    Some(applied)
                }
                Err((code, message)) => {
                    let _ = out.send(OutboundMessage::ToClientError {
                        client_id: inbound.client_id,
                        err: create_error(inbound.seq, code, &message),
                    });
                    None
                }
            },
        }
    }
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
    stats: Arc<AdapterStats>,
    router: CommandRouter,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns `Ok(None)` if `CARD_CRUSH_AI_DISABLED` is set.
    pub fn start_from_env() -> anyhow::Result<Option<Self>> {
        if ServerConfig::is_disabled() {
            println!("[Adapter] Remote play disabled via CARD_CRUSH_AI_DISABLED");
            return Ok(None);
        }
        Self::start(ServerConfig::from_env()).map(Some)
    }

    pub fn start(config: ServerConfig) -> anyhow::Result<Self> {
        config.socket_addr()?;

        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let stats = Arc::new(AdapterStats::default());

        let rt = Runtime::new().context("create tokio runtime")?;
        let server_stats = Arc::clone(&stats);
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, None, Some(server_stats)).await {
                eprintln!("[Adapter] Server stopped: {:#}", e);
            }
        });

        Ok(Self {
            _rt: rt,
            cmd_rx,
            out_tx,
            stats,
            router: CommandRouter::new(),
        })
    }

    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }

    pub fn stats(&self) -> &AdapterStats {
        &self.stats
    }

    /// Apply one inbound command; see [`CommandRouter::handle`].
    pub fn handle(
        &mut self,
        inbound: InboundCommand,
        session: &mut Session,
        snap: &mut SessionSnapshot,
    ) -> Option<Applied> {
        self.router.handle(inbound, session, snap, &self.out_tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_tap_and_reset() {
        let mut session = Session::new("abc").unwrap();
        let applied = apply_command(&mut session, &ClientCommand::Tap { row: 0, col: 0 }).unwrap();
        assert!(matches!(applied, Applied::Tap(TapOutcome::Selected(_))));

        let applied = apply_command(&mut session, &ClientCommand::Tap { row: 0, col: 1 }).unwrap();
        assert!(matches!(applied.tap_outcome(), Some(TapOutcome::Swapped(_))));
        assert_eq!(session.turn(), 1);

        let applied = apply_command(&mut session, &ClientCommand::Reset).unwrap();
        assert!(applied.tap_outcome().is_none());
        assert_eq!(session.turn(), 0);
        assert!(session.moves().is_empty());
    }

    #[test]
    fn test_apply_load_rejects_empty_seed() {
        let mut session = Session::new("abc").unwrap();
        session.tap(Pos::new(0, 0));
        session.tap(Pos::new(0, 1));

        let err = apply_command(&mut session, &ClientCommand::Load { seed: String::new() });
        assert!(matches!(err, Err((ErrorCode::InvalidSeed, _))));
        assert_eq!(session.seed(), "abc");
        assert_eq!(session.turn(), 1);

        apply_command(&mut session, &ClientCommand::Load { seed: "xyz".to_string() }).unwrap();
        assert_eq!(session.seed(), "xyz");
        assert_eq!(session.turn(), 0);
    }

    #[test]
    fn test_router_replies_ack_then_observation() {
        let mut session = Session::new("abc").unwrap();
        let mut snap = SessionSnapshot::default();
        let mut router = CommandRouter::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let applied = router.handle(
            InboundCommand {
                client_id: 3,
                seq: 10,
                payload: InboundPayload::Command(ClientCommand::Tap { row: 1, col: 2 }),
            },
            &mut session,
            &mut snap,
            &tx,
        );
        assert!(matches!(applied, Some(Applied::Tap(TapOutcome::Selected(_)))));

        match rx.try_recv().unwrap() {
            OutboundMessage::ToClientAck { client_id, ack } => {
                assert_eq!(client_id, 3);
                assert_eq!(ack.seq, 10);
            }
            other => panic!("expected ack, got {other:?}"),
        }
        match rx.try_recv().unwrap() {
            OutboundMessage::BroadcastObservation { obs } => {
                assert_eq!(obs.seq, 1);
                assert_eq!(obs.selected, Some([1, 2]));
            }
            other => panic!("expected observation, got {other:?}"),
        }

        let applied = router.handle(
            InboundCommand {
                client_id: 3,
                seq: 11,
                payload: InboundPayload::Command(ClientCommand::Load { seed: String::new() }),
            },
            &mut session,
            &mut snap,
            &tx,
        );
        assert!(applied.is_none());
        assert!(matches!(
            rx.try_recv().unwrap(),
            OutboundMessage::ToClientError { err, .. } if err.code == ErrorCode::InvalidSeed
        ));
        assert!(rx.try_recv().is_err());
    }
}
