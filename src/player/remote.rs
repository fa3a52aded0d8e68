//! Proxy for an opponent playing on another machine.
//!
//! Socket I/O never runs on the phase machine's thread. Connecting happens
//! on a spawned task polled from `pre_game_prepare`; once connected a worker
//! task owns the transport, takes [`Command`]s and sends back reports that
//! `tick` turns into `fire` and `hit` calls.

use std::fmt;

use log::{debug, info, warn};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::core::{Cell, ShotOutcome};
use crate::protocol::Message;
use crate::transport::{TcpTransport, Transport};

use super::{Player, PlayerLink};

/// Where to find the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Bind this address and accept a single peer.
    Listen(String),
    /// Connect to a peer listening on this address.
    Connect(String),
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Listen(addr) => write!(f, "listen on {}", addr),
            Endpoint::Connect(addr) => write!(f, "connect to {}", addr),
        }
    }
}

#[derive(Debug)]
enum Command {
    /// Wait for the peer's next shot.
    ReceiveShot,
    /// Send our shot and wait for the peer to resolve it.
    ResolveShot(Cell),
    /// Tell the peer how its shot went.
    ReportHit(Cell, ShotOutcome),
}

#[derive(Debug)]
enum WorkerReport {
    Shot(Cell),
    Hit(Cell, ShotOutcome),
    Failed(String),
}

type PendingConnection = oneshot::Receiver<anyhow::Result<Box<dyn Transport>>>;

enum Connection {
    Idle,
    Pending(PendingConnection),
    Connected(Box<dyn Transport>),
    Ready {
        commands: mpsc::UnboundedSender<Command>,
        reports: mpsc::UnboundedReceiver<WorkerReport>,
    },
    Closed,
}

pub struct RemotePlayer {
    link: PlayerLink,
    endpoint: Option<Endpoint>,
    connection: Connection,
}

impl RemotePlayer {
    /// Remote player that connects or accepts lazily, during PREPARE.
    pub fn new(link: PlayerLink, endpoint: Endpoint) -> Self {
        Self {
            link,
            endpoint: Some(endpoint),
            connection: Connection::Idle,
        }
    }

    /// Remote player over an already established transport.
    pub fn with_transport(link: PlayerLink, transport: Box<dyn Transport>) -> Self {
        Self {
            link,
            endpoint: None,
            connection: Connection::Connected(transport),
        }
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// `true` once the worker owns a live connection.
    pub fn is_connected(&self) -> bool {
        matches!(self.connection, Connection::Ready { .. })
    }

    fn start_connecting(&mut self, runtime: &Handle) {
        let Some(endpoint) = self.endpoint.clone() else {
            return;
        };
        info!("player {}: trying to {}", self.link.seat(), endpoint);
        let (tx, rx) = oneshot::channel();
        runtime.spawn(async move {
            let result = match endpoint {
                Endpoint::Listen(addr) => TcpTransport::accept_one(addr).await,
                Endpoint::Connect(addr) => TcpTransport::connect(addr).await,
            };
            let _ = tx.send(result.map(|t| Box::new(t) as Box<dyn Transport>));
        });
        self.connection = Connection::Pending(rx);
    }

    fn start_worker(&mut self, runtime: &Handle, transport: Box<dyn Transport>) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        runtime.spawn(run_worker(transport, cmd_rx, report_tx));
        self.connection = Connection::Ready {
            commands: cmd_tx,
            reports: report_rx,
        };
    }

    fn command(&mut self, command: Command) {
        let sent = match &self.connection {
            Connection::Ready { commands, .. } => commands.send(command).is_ok(),
            _ => false,
        };
        if !sent {
            self.connection = Connection::Closed;
            self.link.fail("remote peer is not connected");
        }
    }
}

impl Player for RemotePlayer {
    fn pre_game_prepare(&mut self) -> bool {
        let runtime = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("player {}: no async runtime to connect on: {}", self.link.seat(), e);
                return false;
            }
        };
        match std::mem::replace(&mut self.connection, Connection::Idle) {
            Connection::Idle => {
                self.start_connecting(&runtime);
                false
            }
            Connection::Pending(mut rx) => match rx.try_recv() {
                Ok(Ok(transport)) => {
                    info!("player {}: connected", self.link.seat());
                    self.start_worker(&runtime, transport);
                    true
                }
                Ok(Err(e)) => {
                    warn!("player {}: connection failed: {:#}", self.link.seat(), e);
                    false
                }
                Err(oneshot::error::TryRecvError::Empty) => {
                    self.connection = Connection::Pending(rx);
                    false
                }
                Err(oneshot::error::TryRecvError::Closed) => false,
            },
            Connection::Connected(transport) => {
                self.start_worker(&runtime, transport);
                true
            }
            ready @ Connection::Ready { .. } => {
                self.connection = ready;
                true
            }
            Connection::Closed => {
                self.connection = Connection::Closed;
                false
            }
        }
    }

    fn start_game(&mut self) {
        debug!("player {}: remote game started", self.link.seat());
    }

    fn request_shot(&mut self) {
        self.command(Command::ReceiveShot);
    }

    fn request_hit(&mut self, at: Cell) {
        self.command(Command::ResolveShot(at));
    }

    fn show_hit(&mut self, at: Cell, outcome: ShotOutcome) {
        self.command(Command::ReportHit(at, outcome));
    }

    fn tick(&mut self) {
        loop {
            let report = match &mut self.connection {
                Connection::Ready { reports, .. } => match reports.try_recv() {
                    Ok(report) => report,
                    Err(mpsc::error::TryRecvError::Empty) => return,
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        WorkerReport::Failed("remote worker stopped".to_string())
                    }
                },
                _ => return,
            };
            match report {
                WorkerReport::Shot(cell) => {
                    if !self.fire(cell) {
                        self.connection = Connection::Closed;
                        self.link.fail(format!("peer fired twice at {}", cell));
                        return;
                    }
                }
                WorkerReport::Hit(cell, outcome) => self.hit(cell, outcome),
                WorkerReport::Failed(reason) => {
                    warn!("player {}: {}", self.link.seat(), reason);
                    self.connection = Connection::Closed;
                    self.link.fail(reason);
                    return;
                }
            }
        }
    }

    fn link(&self) -> &PlayerLink {
        &self.link
    }

    fn link_mut(&mut self) -> &mut PlayerLink {
        &mut self.link
    }
}

async fn run_worker(
    mut transport: Box<dyn Transport>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    reports: mpsc::UnboundedSender<WorkerReport>,
) {
    while let Some(command) = commands.recv().await {
        let result = match command {
            Command::ReceiveShot => receive_shot(transport.as_mut()).await.map(Some),
            Command::ResolveShot(cell) => resolve_shot(transport.as_mut(), cell).await.map(Some),
            Command::ReportHit(cell, outcome) => transport
                .send(Message::hit(cell, outcome))
                .await
                .map(|()| None),
        };
        match result {
            Ok(Some(report)) => {
                if reports.send(report).is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => {
                let _ = reports.send(WorkerReport::Failed(format!("{:#}", e)));
                break;
            }
        }
    }
    debug!("remote worker finished");
}

async fn receive_shot(transport: &mut dyn Transport) -> anyhow::Result<WorkerReport> {
    match transport.recv().await? {
        msg @ Message::Shot { .. } => Ok(WorkerReport::Shot(msg.cell()?)),
        other => anyhow::bail!("protocol violation: expected shot, got {}", other.kind()),
    }
}

async fn resolve_shot(transport: &mut dyn Transport, cell: Cell) -> anyhow::Result<WorkerReport> {
    transport.send(Message::shot(cell)).await?;
    match transport.recv().await? {
        msg @ Message::Hit { .. } => Ok(WorkerReport::Hit(msg.cell()?, msg.outcome()?)),
        other => anyhow::bail!("protocol violation: expected hit, got {}", other.kind()),
    }
}
