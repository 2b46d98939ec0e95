//! Media engine - the platform playback facility
//!
//! `StreamEngine` fetches an MP3 over HTTP on the tokio runtime, then hands
//! the bytes to a dedicated engine thread that owns the rodio output stream
//! and the per-track sink. Preparation, failure and natural completion are
//! reported back asynchronously as `EngineNotification`s tagged with the
//! session epoch they belong to; the controller discards tags it no longer
//! recognizes.

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread;
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tokio::sync::mpsc::UnboundedSender;

const ENGINE_TICK_MS: u64 = 200;
const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;

/// Asynchronous completion/error/ready notifications from the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineNotification {
    /// Session epoch the notification refers to.
    pub epoch: u64,
    pub kind: NotificationKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    /// Preparation finished; playback can start. Duration is 0 when the
    /// decoder cannot report one.
    Ready { duration_ms: u64 },
    /// Preparation or playback failed.
    Error { message: String },
    /// The track played to its natural end.
    Completed,
}

/// The prepare/play/pause/seek primitives the controller drives. Commands
/// are fire-and-forget; readiness and failure arrive later as
/// notifications.
pub trait MediaEngine: Send + Sync {
    /// Open the resource and prepare it for playback, asynchronously.
    fn prepare(&self, epoch: u64, url: String);
    fn play(&self);
    fn pause(&self);
    fn seek(&self, position_ms: u64);
    /// Playback volume, 0.0..=1.0. Persists across track loads.
    fn set_volume(&self, volume: f32);
    /// Current playback position of the prepared track.
    fn position_ms(&self) -> u64;
    /// Release the current track, if any.
    fn reset(&self);
}

enum EngineCommand {
    Load { epoch: u64, data: Vec<u8> },
    Play,
    Pause,
    Seek { position_ms: u64 },
    SetVolume(f32),
    /// Release the current track and refuse any load at or below `up_to`.
    Reset { up_to: u64 },
    Shutdown,
}

/// HTTP + rodio implementation of [`MediaEngine`].
pub struct StreamEngine {
    cmd_tx: Sender<EngineCommand>,
    http: reqwest::Client,
    notice_tx: UnboundedSender<EngineNotification>,
    position_ms: Arc<AtomicU64>,
    /// Highest epoch handed to `prepare`, so a reset can fence off every
    /// fetch still in flight.
    prepared_epoch: AtomicU64,
}

impl StreamEngine {
    /// Spawn the engine thread. Blocks until the audio output stream is
    /// initialized there (or fails); the output stream is not `Send`, so
    /// it has to be opened on the thread that owns it.
    pub fn new(notice_tx: UnboundedSender<EngineNotification>) -> anyhow::Result<Self> {
        let (cmd_tx, cmd_rx) = channel::<EngineCommand>();
        let (init_tx, init_rx) = channel::<Result<(), String>>();
        let position_ms = Arc::new(AtomicU64::new(0));

        let http = build_http_client()?;

        let worker_notices = notice_tx.clone();
        let worker_position = position_ms.clone();
        thread::Builder::new()
            .name("media-engine".to_string())
            .spawn(move || {
                let stream = match OutputStreamBuilder::open_default_stream() {
                    Ok(stream) => {
                        let _ = init_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(format!("failed to open audio output: {e}")));
                        return;
                    }
                };

                let worker = EngineWorker {
                    stream,
                    sink: None,
                    epoch: 0,
                    floor: 0,
                    volume: 1.0,
                    notice_tx: worker_notices,
                    position_ms: worker_position,
                };
                worker.run(cmd_rx);
            })?;

        init_rx
            .recv()
            .map_err(|_| anyhow::anyhow!("media engine thread died during init"))?
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Self {
            cmd_tx,
            http,
            notice_tx,
            position_ms,
            prepared_epoch: AtomicU64::new(0),
        })
    }

    fn send(&self, cmd: EngineCommand) {
        let _ = self.cmd_tx.send(cmd);
    }
}

impl MediaEngine for StreamEngine {
    fn prepare(&self, epoch: u64, url: String) {
        self.prepared_epoch.fetch_max(epoch, Ordering::SeqCst);
        let http = self.http.clone();
        let cmd_tx = self.cmd_tx.clone();
        let notice_tx = self.notice_tx.clone();

        tokio::spawn(async move {
            tracing::debug!(epoch, url = %url, "Fetching stream");
            match fetch(&http, &url).await {
                Ok(data) => {
                    tracing::debug!(epoch, bytes = data.len(), "Stream fetched");
                    let _ = cmd_tx.send(EngineCommand::Load { epoch, data });
                }
                Err(e) => {
                    tracing::warn!(epoch, error = %e, "Stream fetch failed");
                    let _ = notice_tx.send(EngineNotification {
                        epoch,
                        kind: NotificationKind::Error {
                            message: format!("fetch failed: {e}"),
                        },
                    });
                }
            }
        });
    }

    fn play(&self) {
        self.send(EngineCommand::Play);
    }

    fn pause(&self) {
        self.send(EngineCommand::Pause);
    }

    fn seek(&self, position_ms: u64) {
        self.send(EngineCommand::Seek { position_ms });
    }

    fn set_volume(&self, volume: f32) {
        self.send(EngineCommand::SetVolume(volume));
    }

    fn position_ms(&self) -> u64 {
        self.position_ms.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        // Fence at the last prepared epoch so a fetch that was still in
        // flight when we reset cannot load after the fact.
        self.send(EngineCommand::Reset {
            up_to: self.prepared_epoch.load(Ordering::SeqCst),
        });
    }
}

impl Drop for StreamEngine {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}

async fn fetch(http: &reqwest::Client, url: &str) -> anyhow::Result<Vec<u8>> {
    let response = http.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// Bounds the connect and per-read phases instead of the whole transfer,
/// so a long download of a large track is not cut off mid-body.
fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .read_timeout(Duration::from_secs(READ_TIMEOUT_SECS))
        .build()
}

/// A load is stale when its epoch was fenced off by a reset, or when a
/// newer load already landed.
fn stale_load(epoch: u64, floor: u64, current: u64) -> bool {
    epoch <= floor || epoch < current
}

/// Runs on the dedicated engine thread; sole owner of the output stream
/// and the current sink.
struct EngineWorker {
    // Must stay alive for the lifetime of the engine.
    stream: OutputStream,
    sink: Option<Sink>,
    epoch: u64,
    /// Highest epoch retired by a reset. Loads at or below it are refused.
    floor: u64,
    /// 0.0..=1.0, applied to every sink this worker creates.
    volume: f32,
    notice_tx: UnboundedSender<EngineNotification>,
    position_ms: Arc<AtomicU64>,
}

impl EngineWorker {
    fn run(mut self, cmd_rx: Receiver<EngineCommand>) {
        let tick = Duration::from_millis(ENGINE_TICK_MS);

        loop {
            match cmd_rx.recv_timeout(tick) {
                Ok(cmd) => {
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            self.tick();
        }

        self.clear();
    }

    fn handle_command(&mut self, cmd: EngineCommand) -> bool {
        match cmd {
            EngineCommand::Load { epoch, data } => self.load(epoch, data),
            EngineCommand::Play => {
                if let Some(sink) = &self.sink {
                    sink.play();
                }
            }
            EngineCommand::Pause => {
                if let Some(sink) = &self.sink {
                    sink.pause();
                }
            }
            EngineCommand::Seek { position_ms } => {
                if let Some(sink) = &self.sink {
                    if sink.try_seek(Duration::from_millis(position_ms)).is_err() {
                        tracing::warn!(position_ms, "Seek rejected by decoder");
                    } else {
                        self.position_ms.store(position_ms, Ordering::Relaxed);
                    }
                }
            }
            EngineCommand::SetVolume(volume) => {
                self.volume = volume.clamp(0.0, 1.0);
                if let Some(sink) = &self.sink {
                    sink.set_volume(self.volume);
                }
            }
            EngineCommand::Reset { up_to } => {
                self.clear();
                self.floor = self.floor.max(up_to);
            }
            EngineCommand::Shutdown => return true,
        }

        false
    }

    fn load(&mut self, epoch: u64, data: Vec<u8>) {
        // A slow fetch from a superseded or reset session must not evict
        // the current track, or resurrect one nobody owns anymore.
        if stale_load(epoch, self.floor, self.epoch) {
            tracing::debug!(
                epoch,
                floor = self.floor,
                current = self.epoch,
                "Ignoring stale load"
            );
            return;
        }

        self.clear();

        let decoder = match Decoder::new(Cursor::new(data)) {
            Ok(decoder) => decoder,
            Err(e) => {
                let _ = self.notice_tx.send(EngineNotification {
                    epoch,
                    kind: NotificationKind::Error {
                        message: format!("decode failed: {e}"),
                    },
                });
                return;
            }
        };

        let duration_ms = decoder
            .total_duration()
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        // Prepared but not started; the controller decides when to play.
        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(decoder);

        self.epoch = epoch;
        self.sink = Some(sink);

        let _ = self.notice_tx.send(EngineNotification {
            epoch,
            kind: NotificationKind::Ready { duration_ms },
        });
    }

    fn tick(&mut self) {
        if let Some(sink) = &self.sink {
            self.position_ms
                .store(sink.get_pos().as_millis() as u64, Ordering::Relaxed);

            if sink.empty() {
                let _ = self.notice_tx.send(EngineNotification {
                    epoch: self.epoch,
                    kind: NotificationKind::Completed,
                });
                self.clear();
            }
        }
    }

    fn clear(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.position_ms.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_at_or_below_the_reset_fence_are_refused() {
        // Fresh worker accepts the first load.
        assert!(!stale_load(1, 0, 0));
        // The session was reset while this fetch was still in flight.
        assert!(stale_load(1, 1, 0));
        // A later load after that reset goes through.
        assert!(!stale_load(2, 1, 0));
        // Slow fetch from a load that was superseded without a reset.
        assert!(stale_load(1, 0, 2));
    }

    #[test]
    fn http_client_builds_with_phase_timeouts() {
        assert!(build_http_client().is_ok());
    }
}
