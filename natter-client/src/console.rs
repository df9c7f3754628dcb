//! Line-oriented console front-end
//!
//! Stands in for a graphical window: reads commands from stdin, drives
//! the [`Session`], and prints every session event on stdout.

use std::ops::ControlFlow;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};

use natter_utils::Result;

use crate::commands::{parse_command, Command, ParseError, TEST_MESSAGE};
use crate::session::{ChannelSink, Session, SessionConfig, SessionEvent};

/// Format an event for display
///
/// Tagged `[SERVER]` while the session is connected and `[SYSTEM]`
/// otherwise, judged at the moment of display.
pub fn render(event: &SessionEvent, connected: bool) -> String {
    let tag = if connected { "SERVER" } else { "SYSTEM" };
    format!("[{}] {}", tag, event)
}

fn show(event: &SessionEvent, session: &Session) {
    println!("{}", render(event, session.is_connected()));
}

fn show_pending(events: &mut UnboundedReceiver<SessionEvent>, session: &Session) {
    while let Ok(event) = events.try_recv() {
        show(&event, session);
    }
}

/// Run one chat session against stdin/stdout until quit or end of input
pub async fn run(config: SessionConfig) -> Result<()> {
    let (sink, mut events) = ChannelSink::channel();
    let mut session = Session::new(config, sink);

    session.connect().await;
    show_pending(&mut events, &session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut outcome = Ok(());

    loop {
        tokio::select! {
            Some(event) = events.recv() => show(&event, &session),
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if handle_line(&mut session, &line).await.is_break() {
                        break;
                    }
                }
                Ok(None) => {
                    info!("End of input");
                    break;
                }
                Err(e) => {
                    warn!("Failed to read input: {}", e);
                    outcome = Err(e.into());
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    session.close().await;
    show_pending(&mut events, &session);
    outcome
}

/// Act on one input line
async fn handle_line(session: &mut Session, line: &str) -> ControlFlow<()> {
    match parse_command(line) {
        Ok(Command::Say(text)) => session.send_text(&text).await,
        Ok(Command::Attach(path)) => session.send_attachment(&path).await,
        Ok(Command::Test) => session.send_text(TEST_MESSAGE).await,
        Ok(Command::Quit) => return ControlFlow::Break(()),
        Ok(Command::Unknown(name)) => println!("[SYSTEM] unknown command: /{}", name),
        Err(ParseError::Empty) => {}
        Err(e) => println!("[SYSTEM] {}", e),
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Notice;

    #[test]
    fn test_render_connected_tag() {
        let event = SessionEvent::Message("alice: hi".into());
        assert_eq!(render(&event, true), "[SERVER] alice: hi");
    }

    #[test]
    fn test_render_disconnected_tag() {
        let event = SessionEvent::Notice(Notice::ConnectRefused);
        assert_eq!(render(&event, false), "[SYSTEM] could not connect");
    }

    #[tokio::test]
    async fn test_handle_line_quit_breaks() {
        let (sink, _events) = ChannelSink::channel();
        let mut session = Session::new(SessionConfig::default(), sink);
        assert!(handle_line(&mut session, "/quit").await.is_break());
    }

    #[tokio::test]
    async fn test_handle_line_routes_to_session() {
        let (sink, mut events) = ChannelSink::channel();
        let mut session = Session::new(SessionConfig::default(), sink);

        assert!(handle_line(&mut session, "hello").await.is_continue());
        assert!(handle_line(&mut session, "/file /no/such/file").await.is_continue());
        assert!(handle_line(&mut session, "/test").await.is_continue());
        assert!(handle_line(&mut session, "").await.is_continue());

        // Not connected, so every send reports why it did nothing
        assert_eq!(events.try_recv().unwrap(), Notice::NotConnected.into());
        assert_eq!(events.try_recv().unwrap(), Notice::AttachmentNotConnected.into());
        assert_eq!(events.try_recv().unwrap(), Notice::NotConnected.into());
        assert!(events.try_recv().is_err());
    }
}
