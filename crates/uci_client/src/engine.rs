//! The engine adapter.
//!
//! A reader task owns the engine's output and resolves pending
//! registrations: every line is offered to the registrations in the order
//! they were made, and the first one expecting that kind of line is removed
//! and answered. A stopped search leaves its registration behind without a
//! receiver, so the `bestmove` the engine still owes for it is swallowed
//! instead of answering the next request.
//!
//! A writer task owns the engine's input. A registration and the command
//! lines it waits on are queued together without an await in between, so a
//! caller that is cancelled midway never strands a registration without its
//! command, and never leaves half a line on the wire.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chess_core::UciMove;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::limits::GoLimits;
use crate::protocol::{EngineLine, Expect, parse_best_move, parse_line, position_fen, setoption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
    Closed,
}

type Reply = Result<String, EngineError>;
/// Resolves once the writer task flushed a queued command.
type Written = oneshot::Receiver<std::io::Result<()>>;

/// One command line for the writer task.
struct Outgoing {
    line: String,
    /// Told the outcome once the line is flushed
    written: Option<oneshot::Sender<std::io::Result<()>>>,
}

struct Registration {
    id: u64,
    expect: Expect,
    /// Marks the registration of the outstanding best-move request.
    search: bool,
    /// `None` once the request was stopped; the reply is then discarded.
    tx: Option<oneshot::Sender<Reply>>,
}

struct Shared {
    pending: Mutex<Vec<Registration>>,
    next_id: AtomicU64,
    state: watch::Sender<EngineState>,
}

impl Shared {
    fn pending(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(
        &self,
        pending: &mut Vec<Registration>,
        expect: Expect,
        search: bool,
    ) -> (u64, oneshot::Receiver<Reply>) {
        let (tx, rx) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        pending.push(Registration {
            id,
            expect,
            search,
            tx: Some(tx),
        });
        (id, rx)
    }

    fn unregister(&self, id: u64) {
        self.pending().retain(|r| r.id != id);
    }

    fn dispatch(&self, line: &str) {
        let parsed = parse_line(line);
        if parsed == EngineLine::Other {
            trace!(line, "from engine");
            return;
        }
        debug!(line, "from engine");

        let mut pending = self.pending();
        let Some(pos) = pending.iter().position(|r| r.expect.matches(&parsed)) else {
            trace!(line, "unsolicited engine reply");
            return;
        };
        match pending.remove(pos).tx {
            Some(tx) => {
                // The requester may have given up already
                let _ = tx.send(Ok(line.to_string()));
            }
            None => debug!(line, "discarded reply of a stopped search"),
        }
    }

    /// Mark the connection dead and fail everything still waiting.
    fn close(&self) {
        self.state.send_replace(EngineState::Closed);
        let pending = std::mem::take(&mut *self.pending());
        for reg in pending {
            if let Some(tx) = reg.tx {
                let _ = tx.send(Err(EngineError::Closed));
            }
        }
    }

    fn set_state_unless_closed(&self, next: EngineState) {
        self.state.send_if_modified(|s| {
            if *s == EngineState::Closed {
                false
            } else {
                *s = next;
                true
            }
        });
    }
}

async fn read_loop<R>(reader: R, shared: Arc<Shared>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => shared.dispatch(&line),
            Ok(None) => {
                if *shared.state.borrow() != EngineState::Closed {
                    warn!("engine closed its output");
                }
                break;
            }
            Err(e) => {
                warn!(error = %e, "failed to read from engine");
                break;
            }
        }
    }
    shared.close();
}

async fn write_loop<W>(mut writer: W, mut queue: mpsc::UnboundedReceiver<Outgoing>, shared: Arc<Shared>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(out) = queue.recv().await {
        debug!(command = %out.line, "to engine");
        let res = async {
            writer.write_all(out.line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await
        }
        .await;
        let failed = res.is_err();
        if let Err(e) = &res {
            warn!(error = %e, "failed to write to engine");
            shared.close();
        }
        if let Some(written) = out.written {
            let _ = written.send(res);
        }
        if failed {
            break;
        }
    }
}

/// Wait until the writer task has flushed a queued line.
async fn flushed(written: Written) -> Result<(), EngineError> {
    match written.await {
        Ok(res) => Ok(res?),
        // Writer task gone after an earlier failure
        Err(_) => Err(EngineError::Closed),
    }
}

/// A UCI engine reached over a child process or any async byte transport.
///
/// All methods take `&self`; share the adapter behind an `Arc`.
pub struct UciEngine {
    shared: Arc<Shared>,
    queue: mpsc::UnboundedSender<Outgoing>,
    config: EngineConfig,
    child: Mutex<Option<Child>>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl UciEngine {
    /// Launch the configured executable. The process is killed when the
    /// adapter is dropped. Must be called inside a tokio runtime.
    pub fn spawn(config: EngineConfig) -> Result<Self, EngineError> {
        let spawn_err = |source| EngineError::Spawn {
            path: config.path.clone(),
            source,
        };
        let mut child = Command::new(&config.path)
            .args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_err)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_err(std::io::Error::other("stdin not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_err(std::io::Error::other("stdout not captured")))?;
        info!(path = %config.path, pid = ?child.id(), "engine process started");

        let engine = Self::from_transport(stdout, stdin, config);
        *engine.child.lock().unwrap_or_else(PoisonError::into_inner) = Some(child);
        Ok(engine)
    }

    /// Drive an engine over an existing transport. Must be called inside a
    /// tokio runtime.
    pub fn from_transport<R, W>(reader: R, writer: W, config: EngineConfig) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (state, _) = watch::channel(EngineState::Uninitialized);
        let shared = Arc::new(Shared {
            pending: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            state,
        });
        let (queue, outgoing) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_loop(reader, Arc::clone(&shared)));
        let writer = tokio::spawn(write_loop(writer, outgoing, Arc::clone(&shared)));
        Self {
            shared,
            queue,
            config,
            child: Mutex::new(None),
            reader,
            writer,
        }
    }

    pub fn state(&self) -> EngineState {
        *self.shared.state.borrow()
    }

    /// Run the UCI handshake. Concurrent callers wait for the first one.
    pub async fn initialize(&self) -> Result<(), EngineError> {
        let mut claimed = false;
        self.shared.state.send_if_modified(|s| {
            if *s == EngineState::Uninitialized {
                *s = EngineState::Initializing;
                claimed = true;
            }
            claimed
        });
        if !claimed {
            return self.ensure_ready().await;
        }

        match self.handshake().await {
            Ok(()) => {
                self.shared.set_state_unless_closed(EngineState::Ready);
                info!(
                    skill_level = self.config.skill_level,
                    threads = self.config.threads,
                    "engine ready"
                );
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "engine handshake failed");
                self.shared.set_state_unless_closed(EngineState::Failed);
                Err(e)
            }
        }
    }

    async fn handshake(&self) -> Result<(), EngineError> {
        self.request("uci", Expect::UciOk).await?;
        self.send(&setoption("Skill Level", self.config.skill_level))
            .await?;
        self.send(&setoption("Threads", self.config.threads)).await?;
        self.request("isready", Expect::ReadyOk).await?;
        Ok(())
    }

    /// Stop any search and tell the engine a new game starts.
    pub async fn new_game(&self) -> Result<(), EngineError> {
        self.ensure_ready().await?;
        self.stop().await?;
        self.send("ucinewgame").await?;
        self.request("isready", Expect::ReadyOk).await?;
        Ok(())
    }

    /// Ask for the best move in `fen`. Empty `limits` fall back to the
    /// configured defaults. `Ok(None)` means the engine found no move.
    ///
    /// A request issued during the handshake waits for it to finish. Any
    /// outstanding request is stopped first.
    pub async fn best_move(
        &self,
        fen: &str,
        limits: GoLimits,
    ) -> Result<Option<UciMove>, EngineError> {
        self.ensure_ready().await?;
        self.stop().await?;

        let go = limits.or(self.config.default_limits()).to_command();
        let (id, rx, written) =
            self.submit(&[position_fen(fen), go], Expect::BestMove, true)?;
        if let Err(e) = flushed(written).await {
            self.shared.unregister(id);
            return Err(e);
        }

        let line = rx.await.map_err(|_| EngineError::Closed)??;
        parse_best_move(&line)
    }

    /// Reject the outstanding best-move request with
    /// [`EngineError::Stopped`] and tell the engine to stop. A no-op when
    /// nothing is searching.
    pub async fn stop(&self) -> Result<(), EngineError> {
        let written = {
            let mut pending = self.shared.pending();
            let Some(reg) = pending.iter_mut().find(|r| r.search) else {
                return Ok(());
            };
            reg.search = false;
            if let Some(tx) = reg.tx.take() {
                let _ = tx.send(Err(EngineError::Stopped));
            }
            self.enqueue(vec!["stop".to_string()])?
        };
        flushed(written).await
    }

    /// Send `quit` and wait briefly for the process to exit.
    pub async fn shutdown(&self) {
        let _ = self.stop().await;
        let _ = self.send("quit").await;
        self.shared.close();

        let child = self
            .child
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(mut child) = child
            && timeout(Duration::from_millis(500), child.wait()).await.is_err()
        {
            warn!("engine ignored quit, killing it");
            let _ = child.kill().await;
        }
        info!("engine shut down");
    }

    async fn ensure_ready(&self) -> Result<(), EngineError> {
        let mut rx = self.shared.state.subscribe();
        let state = rx
            .wait_for(|s| *s != EngineState::Initializing)
            .await
            .map(|s| *s)
            .unwrap_or(EngineState::Closed);
        match state {
            EngineState::Ready => Ok(()),
            EngineState::Uninitialized | EngineState::Initializing => {
                Err(EngineError::NotInitialized)
            }
            EngineState::Failed => Err(EngineError::Unavailable),
            EngineState::Closed => Err(EngineError::Closed),
        }
    }

    /// Send `cmd` and wait for the reply `expect` names, bounded by the
    /// handshake timeout.
    async fn request(&self, cmd: &str, expect: Expect) -> Result<String, EngineError> {
        let (id, rx, written) = self.submit(&[cmd.to_string()], expect, false)?;
        if let Err(e) = flushed(written).await {
            self.shared.unregister(id);
            return Err(e);
        }
        match timeout(self.config.handshake_timeout(), rx).await {
            Ok(reply) => reply.map_err(|_| EngineError::Closed)?,
            Err(_) => {
                self.shared.unregister(id);
                Err(EngineError::Timeout(expect.command()))
            }
        }
    }

    async fn send(&self, line: &str) -> Result<(), EngineError> {
        let written = self.enqueue(vec![line.to_string()])?;
        flushed(written).await
    }

    /// Register for `expect` and queue `lines` in one step, under the lock
    /// that orders registrations.
    fn submit(
        &self,
        lines: &[String],
        expect: Expect,
        search: bool,
    ) -> Result<(u64, oneshot::Receiver<Reply>, Written), EngineError> {
        let mut pending = self.shared.pending();
        if *self.shared.state.borrow() == EngineState::Closed {
            return Err(EngineError::Closed);
        }
        let (id, rx) = self.shared.register(&mut pending, expect, search);
        match self.enqueue(lines.to_vec()) {
            Ok(written) => Ok((id, rx, written)),
            Err(e) => {
                pending.retain(|r| r.id != id);
                Err(e)
            }
        }
    }

    /// Hand `lines` to the writer task. The receiver resolves once the last
    /// one is flushed.
    fn enqueue(&self, lines: Vec<String>) -> Result<Written, EngineError> {
        let (tx, rx) = oneshot::channel();
        let mut written = Some(tx);
        let count = lines.len();
        for (i, line) in lines.into_iter().enumerate() {
            let out = Outgoing {
                line,
                written: if i + 1 == count { written.take() } else { None },
            };
            self.queue.send(out).map_err(|_| EngineError::Closed)?;
        }
        Ok(rx)
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}
