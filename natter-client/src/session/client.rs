//! Chat session over a single TCP connection

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use futures::SinkExt;
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, ReadHalf, WriteHalf};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{debug, info, warn};

use natter_protocol::{
    Attachment, ChunkCodec, CodecError, OutboundCodec, OutboundFrame, TextMessage, MAX_CHUNK_SIZE,
};
use natter_utils::{NatterError, Result};

use super::config::SessionConfig;
use super::event::{Notice, SessionEvent};
use super::receive::receive_loop;
use super::sink::EventSink;
use super::state::ConnectionState;

/// Trait alias for streams a session can run over
pub trait StreamTrait: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> StreamTrait for T {}

pub(crate) type BoxedStream = Box<dyn StreamTrait>;
pub(crate) type FrameReader = FramedRead<ReadHalf<BoxedStream>, ChunkCodec>;
type FrameWriter = FramedWrite<WriteHalf<BoxedStream>, OutboundCodec>;

/// State shared between the session owner and its receive task
pub(crate) struct Shared {
    addr: String,
    sink: Arc<dyn EventSink>,
    state: Mutex<ConnectionState>,
    /// Present iff the state is `Connected`; taken exactly once on close
    writer: tokio::sync::Mutex<Option<FrameWriter>>,
    write_timeout: Option<Duration>,
}

impl Shared {
    pub(crate) fn addr(&self) -> &str {
        &self.addr
    }

    pub(crate) fn notify(&self, event: impl Into<SessionEvent>) {
        self.sink.notify(event.into());
    }

    pub(crate) fn state(&self) -> ConnectionState {
        *self.state.lock()
    }

    pub(crate) fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    fn set_state(&self, state: ConnectionState) {
        *self.state.lock() = state;
    }

    /// Move `Connected -> Closed`; only one caller ever gets `true`
    fn begin_close(&self) -> bool {
        let mut state = self.state.lock();
        if *state != ConnectionState::Connected {
            return false;
        }
        *state = ConnectionState::Closed;
        true
    }

    /// Close the connection if it is still open
    ///
    /// Returns whether this call did the teardown. Never fails: shutdown
    /// errors are logged and swallowed.
    pub(crate) async fn shutdown(&self) -> bool {
        if !self.begin_close() {
            return false;
        }

        let writer = self.writer.lock().await.take();
        match writer {
            Some(mut writer) => match with_timeout(self.write_timeout, async {
                writer.close().await.map_err(|e| codec_error(e, &self.addr))
            })
            .await
            {
                Ok(()) => {
                    info!(addr = %self.addr, "Disconnected from server");
                    self.notify(Notice::Disconnected);
                }
                Err(e) => warn!("Error during socket shutdown: {}", e),
            },
            None => warn!("Connected session had no writer"),
        }
        true
    }

    /// Write one frame completely, or fail
    async fn write_frame(&self, frame: OutboundFrame) -> Result<()> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(NatterError::ConnectionClosed)?;
        with_timeout(self.write_timeout, async {
            writer
                .send(frame)
                .await
                .map_err(|e| codec_error(e, &self.addr))
        })
        .await
    }
}

/// Client-side chat session
///
/// Owns one TCP connection and the task reading from it. None of the
/// public operations return errors: every outcome, good or bad, is
/// reported to the [`EventSink`].
pub struct Session {
    config: SessionConfig,
    pub(super) shared: Arc<Shared>,
    pub(super) receive_task: Option<JoinHandle<()>>,
}

impl Session {
    /// Create a session (not yet connected)
    pub fn new(config: SessionConfig, sink: impl EventSink + 'static) -> Self {
        Self::with_sink(config, Arc::new(sink))
    }

    /// Create a session with an already shared sink
    pub fn with_sink(config: SessionConfig, sink: Arc<dyn EventSink>) -> Self {
        let shared = Shared {
            addr: config.addr(),
            sink,
            state: Mutex::new(ConnectionState::Disconnected),
            writer: tokio::sync::Mutex::new(None),
            write_timeout: config.write_timeout,
        };

        Self {
            config,
            shared: Arc::new(shared),
            receive_task: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get current connection state
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    pub fn is_connected(&self) -> bool {
        self.shared.is_connected()
    }

    /// Whether the receive task is still running
    pub fn has_receive_task(&self) -> bool {
        self.receive_task
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Connect, announce the username and start receiving
    ///
    /// Only a fresh session connects; there is no reconnect.
    pub async fn connect(&mut self) {
        let state = self.state();
        if state != ConnectionState::Disconnected {
            debug!(%state, "Ignoring connect on a session that is not disconnected");
            return;
        }

        self.shared.set_state(ConnectionState::Connecting);
        info!(addr = %self.config.addr(), username = %self.config.username, "Connecting");

        match self.establish().await {
            Ok(()) => {}
            Err(NatterError::ConnectionRefused { addr }) => {
                warn!(%addr, "Connection refused");
                self.shared.set_state(ConnectionState::Disconnected);
                self.shared.notify(Notice::ConnectRefused);
            }
            Err(e) => {
                warn!("Failed to connect: {}", e);
                self.shared.set_state(ConnectionState::Disconnected);
                self.shared.notify(Notice::ConnectFailed(e.to_string()));
            }
        }
    }

    async fn establish(&mut self) -> Result<()> {
        let addr = self.config.addr();
        let stream = with_timeout(self.config.connect_timeout, async {
            TcpStream::connect(&addr)
                .await
                .map_err(|e| NatterError::from_io(e, &addr))
        })
        .await?;

        self.attach(Box::new(stream)).await
    }

    /// Take over an open stream: handshake, then start the receive task
    pub(crate) async fn attach(&mut self, stream: BoxedStream) -> Result<()> {
        let shared = Arc::clone(&self.shared);
        let (read_half, write_half) = tokio::io::split(stream);

        let mut writer = FramedWrite::new(write_half, OutboundCodec::new());
        let handshake = OutboundFrame::Handshake {
            username: self.config.username.clone(),
        };
        with_timeout(self.config.write_timeout, async {
            writer
                .send(handshake)
                .await
                .map_err(|e| codec_error(e, shared.addr()))
        })
        .await?;

        *shared.writer.lock().await = Some(writer);
        shared.set_state(ConnectionState::Connected);
        shared.notify(Notice::Connected {
            username: self.config.username.clone(),
        });

        let reader = FramedRead::with_capacity(read_half, ChunkCodec::new(), MAX_CHUNK_SIZE);
        self.receive_task = Some(tokio::spawn(receive_loop(
            shared,
            reader,
            self.config.read_timeout,
        )));
        Ok(())
    }

    /// Send one chat line and echo it locally
    ///
    /// The server does not echo our own lines back, so the echo is the
    /// only way the sender sees them.
    pub async fn send_text(&mut self, text: &str) {
        if !self.is_connected() {
            self.shared.notify(Notice::NotConnected);
            return;
        }

        let message = TextMessage::new(self.config.username.as_str(), text);
        let rendered = message.to_string();

        match self.shared.write_frame(OutboundFrame::Text(message)).await {
            Ok(()) => self.shared.notify(SessionEvent::Message(rendered)),
            Err(e) => {
                warn!("Failed to send message: {}", e);
                self.shared.notify(Notice::SendFailed(e.to_string()));
                self.teardown().await;
            }
        }
    }

    /// Send a local file as an inline attachment
    ///
    /// A file that cannot be read leaves the connection open; a failed
    /// socket write closes it.
    pub async fn send_attachment(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();

        if !self.is_connected() {
            self.shared.notify(Notice::AttachmentNotConnected);
            return;
        }

        match self.push_attachment(path).await {
            Ok(filename) => self.shared.notify(Notice::AttachmentSent { filename }),
            Err(NatterError::InvalidInput(reason)) => {
                debug!(path = %path.display(), %reason, "Rejected attachment path");
                self.shared.notify(Notice::InvalidFilePath);
            }
            Err(e) => {
                warn!(path = %path.display(), "Failed to send attachment: {}", e);
                self.shared.notify(Notice::AttachmentFailed(e.to_string()));
                if e.is_fatal() {
                    self.teardown().await;
                }
            }
        }
    }

    async fn push_attachment(&self, path: &Path) -> Result<String> {
        check_attachment_path(path).await?;

        let payload = tokio::fs::read(path)
            .await
            .map_err(|source| NatterError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;

        let attachment = Attachment::from_path(self.config.username.as_str(), path, payload);
        let filename = attachment.filename.clone();
        debug!(%filename, bytes = attachment.payload.len(), "Sending attachment");

        self.shared
            .write_frame(OutboundFrame::Attachment(attachment))
            .await?;
        Ok(filename)
    }

    /// Close the connection; safe to call any number of times
    pub async fn close(&mut self) {
        self.teardown().await;
    }

    async fn teardown(&mut self) {
        let closed_here = self.shared.shutdown().await;

        if let Some(handle) = self.receive_task.take() {
            // A task that closed the session itself is finishing on its own
            if closed_here {
                handle.abort();
            }
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    warn!("Receive task failed: {}", e);
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(handle) = self.receive_task.take() {
            handle.abort();
        }
    }
}

/// Run `fut`, bounded by `limit` when one is set
pub(crate) async fn with_timeout<T, F>(limit: Option<Duration>, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| NatterError::timeout(limit))?,
        None => fut.await,
    }
}

/// Reject an empty path or one that does not exist
pub(super) async fn check_attachment_path(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(NatterError::invalid_input("empty attachment path"));
    }
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return Err(NatterError::invalid_input(format!(
            "{} does not exist",
            path.display()
        )));
    }
    Ok(())
}

pub(crate) fn codec_error(err: CodecError, addr: &str) -> NatterError {
    match err {
        CodecError::Io(e) => NatterError::from_io(e, addr),
    }
}
