//! STOMP frame parsing and encoding

use std::fmt::Write as _;

use super::command::StompCommand;

/// Frame decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    #[error("Unknown STOMP command: {0}")]
    UnknownCommand(String),
}

/// A single STOMP frame
///
/// Headers keep their wire order; lookups return the first occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StompFrame {
    pub command: StompCommand,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl StompFrame {
    pub fn new(command: StompCommand) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Value of the first header named `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// `heart-beat` header as `(outgoing_ms, incoming_ms)`
    pub fn heart_beat(&self) -> Option<(u64, u64)> {
        let (out, inc) = self.get("heart-beat")?.split_once(',')?;
        Some((out.trim().parse().ok()?, inc.trim().parse().ok()?))
    }

    // ------------------------------------------------------------------
    // Client frames
    // ------------------------------------------------------------------

    /// CONNECT carrying the access token and our heart-beat offer
    pub fn connect(access_token: Option<&str>, heart_beat: (u64, u64)) -> Self {
        let frame = Self::new(StompCommand::Connect)
            .header("accept-version", "1.1,1.2")
            .header("heart-beat", format!("{},{}", heart_beat.0, heart_beat.1));
        match access_token {
            Some(token) => frame.header("Authorization", format!("Bearer {token}")),
            None => frame,
        }
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Self::new(StompCommand::Subscribe)
            .header("id", id)
            .header("destination", destination)
    }

    pub fn unsubscribe(id: &str) -> Self {
        Self::new(StompCommand::Unsubscribe).header("id", id)
    }

    /// SEND with `content-length` counted in UTF-8 bytes
    pub fn send(destination: &str, content_type: &str, body: &str) -> Self {
        Self::new(StompCommand::Send)
            .header("destination", destination)
            .header("content-type", content_type)
            .header("content-length", body.len().to_string())
            .body(body)
    }

    pub fn disconnect() -> Self {
        Self::new(StompCommand::Disconnect)
    }

    // ------------------------------------------------------------------
    // Codec
    // ------------------------------------------------------------------

    /// Parse one frame from a WebSocket text message
    ///
    /// Returns `Ok(None)` for heart-beats (bare EOLs) and empty input.
    pub fn parse(raw: &str) -> Result<Option<Self>, FrameError> {
        let raw = raw.trim_start_matches(['\r', '\n']);
        if raw.is_empty() || raw.starts_with('\0') {
            return Ok(None);
        }

        let (head, body) = split_head(raw);
        let body = match body.find('\0') {
            Some(end) => &body[..end],
            None => body,
        };

        let mut lines = head.split('\n').map(|l| l.trim_end_matches('\r'));
        let command: StompCommand = lines.next().unwrap_or_default().trim().parse()?;

        let headers = lines
            .filter_map(|line| line.split_once(':'))
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            .collect();

        Ok(Some(Self {
            command,
            headers,
            body: body.to_string(),
        }))
    }

    /// Encode as `COMMAND\nk:v\n...\n\nbody\0`
    pub fn to_wire(&self) -> String {
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(self.command.as_str());
        out.push('\n');
        for (k, v) in &self.headers {
            let _ = writeln!(out, "{k}:{v}");
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }
}

/// Split at the first blank line, LF or CRLF
fn split_head(raw: &str) -> (&str, &str) {
    let lf = raw.find("\n\n").map(|i| (i, 2));
    let crlf = raw.find("\r\n\r\n").map(|i| (i, 4));

    match lf.into_iter().chain(crlf).min_by_key(|(i, _)| *i) {
        Some((i, len)) => (&raw[..i], &raw[i + len..]),
        None => (raw, ""),
    }
}

impl std::fmt::Display for StompFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.command)?;
        if let Some(dest) = self.get("destination") {
            write!(f, " {dest}")?;
        }
        Ok(())
    }
}
