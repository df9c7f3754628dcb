//! Outbound frame definitions

use std::fmt;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::{BufMut, BytesMut};

/// Leading tag of an attachment frame
pub const ATTACHMENT_TAG: &str = "IMAGE";

/// Field separator inside an attachment frame
const FIELD_SEP: &str = ")@(";

/// Errors from parsing an attachment line
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Not an attachment frame")]
    NotAttachment,

    #[error("Malformed attachment frame: {0}")]
    Malformed(&'static str),

    #[error("Invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A chat line as it goes on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    pub username: String,
    pub text: String,
}

impl TextMessage {
    pub fn new(username: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for TextMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.username, self.text)
    }
}

/// A file sent inline as base64
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub username: String,
    /// Short name only, never a path
    pub filename: String,
    /// Raw file contents (encoded on the wire)
    pub payload: Vec<u8>,
}

impl Attachment {
    /// Build an attachment for a local file, keeping only its basename
    pub fn from_path(username: impl Into<String>, path: &Path, payload: Vec<u8>) -> Self {
        Self {
            username: username.into(),
            filename: basename(path),
            payload,
        }
    }

    /// Render the complete frame, trailing newline included
    pub fn to_line(&self) -> String {
        format!(
            "{}@({}{}{}{}{})\n",
            ATTACHMENT_TAG,
            self.username,
            FIELD_SEP,
            self.filename,
            FIELD_SEP,
            STANDARD.encode(&self.payload)
        )
    }

    /// Parse an attachment frame
    ///
    /// The trailing newline is optional. The username is taken up to the
    /// first separator and the payload after the last one, so a filename
    /// may itself contain the separator.
    pub fn parse(line: &str) -> Result<Self, FrameError> {
        let body = line
            .strip_prefix(ATTACHMENT_TAG)
            .and_then(|rest| rest.strip_prefix("@("))
            .ok_or(FrameError::NotAttachment)?;
        let body = body.strip_suffix('\n').unwrap_or(body);
        let body = body
            .strip_suffix(')')
            .ok_or(FrameError::Malformed("missing closing parenthesis"))?;

        let (username, rest) = body
            .split_once(FIELD_SEP)
            .ok_or(FrameError::Malformed("missing filename field"))?;
        let (filename, encoded) = rest
            .rsplit_once(FIELD_SEP)
            .ok_or(FrameError::Malformed("missing payload field"))?;

        Ok(Self {
            username: username.to_string(),
            filename: filename.to_string(),
            payload: STANDARD.decode(encoded)?,
        })
    }
}

/// Everything the client writes to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundFrame {
    /// Username announcement, sent once after connect
    Handshake { username: String },
    /// Chat line
    Text(TextMessage),
    /// Inline file
    Attachment(Attachment),
}

impl OutboundFrame {
    /// Append the wire bytes of this frame to `dst`
    pub fn write_to(&self, dst: &mut BytesMut) {
        match self {
            Self::Handshake { username } => dst.put_slice(username.as_bytes()),
            Self::Text(msg) => dst.put_slice(msg.to_string().as_bytes()),
            Self::Attachment(attachment) => dst.put_slice(attachment.to_line().as_bytes()),
        }
    }
}

/// Final path component, lossily decoded
///
/// Returns an empty string for paths without one (e.g. `/` or `..`).
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(frame: &OutboundFrame) -> Vec<u8> {
        let mut buf = BytesMut::new();
        frame.write_to(&mut buf);
        buf.to_vec()
    }

    #[test]
    fn test_handshake_is_raw_username() {
        let frame = OutboundFrame::Handshake {
            username: "Guest".into(),
        };
        assert_eq!(wire(&frame), b"Guest");
    }

    #[test]
    fn test_text_frame_has_no_terminator() {
        let frame = OutboundFrame::Text(TextMessage::new("Guest", "hi"));
        assert_eq!(wire(&frame), b"Guest: hi");
    }

    #[test]
    fn test_text_frame_keeps_utf8() {
        let msg = TextMessage::new("Гість", "привіт");
        assert_eq!(msg.to_string(), "Гість: привіт");
        assert_eq!(wire(&OutboundFrame::Text(msg)), "Гість: привіт".as_bytes());
    }

    #[test]
    fn test_attachment_frame_strips_directories() {
        let attachment = Attachment::from_path("Guest", Path::new("a/b/c.png"), vec![1, 2, 3]);
        assert_eq!(attachment.filename, "c.png");
        assert_eq!(attachment.to_line(), "IMAGE@(Guest)@(c.png)@(AQID)\n");
        assert_eq!(
            wire(&OutboundFrame::Attachment(attachment)),
            b"IMAGE@(Guest)@(c.png)@(AQID)\n"
        );
    }

    #[test]
    fn test_attachment_empty_payload() {
        let attachment = Attachment::from_path("Guest", Path::new("empty.bin"), Vec::new());
        assert_eq!(attachment.to_line(), "IMAGE@(Guest)@(empty.bin)@()\n");
    }

    #[test]
    fn test_attachment_payload_survives_parse() {
        for size in [0usize, 1, 12_345] {
            let payload: Vec<u8> = (0..size).map(|i| (i * 31 % 256) as u8).collect();
            let attachment = Attachment::from_path("Guest", Path::new("/tmp/blob.bin"), payload.clone());

            let parsed = Attachment::parse(&attachment.to_line()).unwrap();
            assert_eq!(parsed.payload, payload, "size {}", size);
            assert_eq!(parsed.filename, "blob.bin");
            assert_eq!(parsed.username, "Guest");
        }
    }

    #[test]
    fn test_parse_filename_containing_separator() {
        let parsed = Attachment::parse("IMAGE@(bob)@(odd)@(name.txt)@(AQID)\n").unwrap();
        assert_eq!(parsed.username, "bob");
        assert_eq!(parsed.filename, "odd)@(name.txt");
        assert_eq!(parsed.payload, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_rejects_text_frame() {
        let result = Attachment::parse("Guest: hi");
        assert!(matches!(result, Err(FrameError::NotAttachment)));
    }

    #[test]
    fn test_parse_rejects_truncated_frame() {
        let result = Attachment::parse("IMAGE@(Guest)@(c.png)@(AQ");
        assert!(matches!(result, Err(FrameError::Malformed(_))));

        let result = Attachment::parse("IMAGE@(Guest)");
        assert!(matches!(result, Err(FrameError::Malformed(_))));
    }

    #[test]
    fn test_parse_rejects_bad_base64() {
        let result = Attachment::parse("IMAGE@(Guest)@(c.png)@(!!!!)\n");
        assert!(matches!(result, Err(FrameError::Base64(_))));
    }

    #[test]
    fn test_basename() {
        assert_eq!(basename(Path::new("/home/user/photo.jpg")), "photo.jpg");
        assert_eq!(basename(Path::new("photo.jpg")), "photo.jpg");
        assert_eq!(basename(Path::new("/")), "");
    }
}
