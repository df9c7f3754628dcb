//! Background receive loop

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tracing::{debug, info, trace, warn};

use natter_utils::NatterError;

use super::client::{codec_error, with_timeout, FrameReader, Shared};
use super::event::{Notice, SessionEvent};

/// Forward inbound chunks to the sink until the connection ends
///
/// Each read is surfaced as one message, undecoded. A read that ends the
/// stream is a normal disconnect and does not close the session; only a
/// reset does.
pub(crate) async fn receive_loop(
    shared: Arc<Shared>,
    mut reader: FrameReader,
    read_timeout: Option<Duration>,
) {
    while shared.is_connected() {
        let next = with_timeout(read_timeout, async {
            reader
                .next()
                .await
                .transpose()
                .map_err(|e| codec_error(e, shared.addr()))
        })
        .await;

        match next {
            Ok(Some(chunk)) => {
                trace!(bytes = chunk.len(), "Received chunk");
                let text = String::from_utf8_lossy(&chunk).into_owned();
                shared.notify(SessionEvent::Message(text));
            }
            Ok(None) => {
                info!("Server closed connection");
                break;
            }
            Err(NatterError::ConnectionReset) => {
                warn!("Connection reset by server");
                shared.notify(Notice::ResetByServer);
                shared.shutdown().await;
                break;
            }
            Err(e) => {
                if shared.is_connected() {
                    warn!("Failed to receive message: {}", e);
                    shared.notify(Notice::ReceiveFailed(e.to_string()));
                }
                break;
            }
        }
    }

    debug!("Receive loop exited");
}
