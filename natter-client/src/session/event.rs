//! Events delivered to the [`EventSink`](super::EventSink)

use std::fmt;

/// Status notices produced by the session itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Connected { username: String },
    ConnectRefused,
    ConnectFailed(String),
    NotConnected,
    SendFailed(String),
    AttachmentNotConnected,
    InvalidFilePath,
    AttachmentSent { filename: String },
    AttachmentFailed(String),
    ResetByServer,
    ReceiveFailed(String),
    Disconnected,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { username } => write!(f, "connected as {}", username),
            Self::ConnectRefused => f.write_str("could not connect"),
            Self::ConnectFailed(detail) => write!(f, "unexpected connection error: {}", detail),
            Self::NotConnected => f.write_str("cannot send: not connected"),
            Self::SendFailed(detail) => write!(f, "error sending message: {}", detail),
            Self::AttachmentNotConnected => f.write_str("cannot send attachment: not connected"),
            Self::InvalidFilePath => f.write_str("invalid file path"),
            Self::AttachmentSent { filename } => write!(f, "attachment '{}' sent", filename),
            Self::AttachmentFailed(detail) => write!(f, "failed to send attachment: {}", detail),
            Self::ResetByServer => f.write_str("connection reset by server"),
            Self::ReceiveFailed(detail) => write!(f, "error receiving message: {}", detail),
            Self::Disconnected => f.write_str("disconnected from server"),
        }
    }
}

/// One display event
///
/// `Message` carries either a raw inbound chunk or the local echo of a
/// sent line. Inbound attachment frames arrive as plain `Message`s too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Message(String),
    Notice(Notice),
}

impl SessionEvent {
    pub fn is_notice(&self) -> bool {
        matches!(self, Self::Notice(_))
    }
}

impl From<Notice> for SessionEvent {
    fn from(notice: Notice) -> Self {
        Self::Notice(notice)
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Message(text) => f.write_str(text),
            Self::Notice(notice) => notice.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        assert_eq!(
            Notice::Connected { username: "Guest".into() }.to_string(),
            "connected as Guest"
        );
        assert_eq!(Notice::ConnectRefused.to_string(), "could not connect");
        assert_eq!(
            Notice::AttachmentSent { filename: "c.png".into() }.to_string(),
            "attachment 'c.png' sent"
        );
        assert_eq!(
            Notice::ReceiveFailed("boom".into()).to_string(),
            "error receiving message: boom"
        );
    }

    #[test]
    fn test_event_display_is_plain_text() {
        let msg = SessionEvent::Message("alice: hi".into());
        assert_eq!(msg.to_string(), "alice: hi");
        assert!(!msg.is_notice());

        let notice: SessionEvent = Notice::Disconnected.into();
        assert_eq!(notice.to_string(), "disconnected from server");
        assert!(notice.is_notice());
    }
}
