//! STOMP commands

use super::frame::FrameError;

/// Frame command (the first line of every frame)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StompCommand {
    /// Open a session (client only)
    Connect,
    /// Alternate spelling of CONNECT in STOMP 1.2 (client only)
    Stomp,
    /// Session accepted (server only)
    Connected,
    /// Publish to a destination (client only)
    Send,
    /// Start receiving from a destination (client only)
    Subscribe,
    /// Stop receiving (client only)
    Unsubscribe,
    /// Message delivered to a subscription (server only)
    Message,
    /// Acknowledgement of a `receipt` header (server only)
    Receipt,
    /// Server-side failure, usually followed by a close (server only)
    Error,
    /// Graceful session end (client only)
    Disconnect,
}

impl StompCommand {
    /// Wire name of the command
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connect => "CONNECT",
            Self::Stomp => "STOMP",
            Self::Connected => "CONNECTED",
            Self::Send => "SEND",
            Self::Subscribe => "SUBSCRIBE",
            Self::Unsubscribe => "UNSUBSCRIBE",
            Self::Message => "MESSAGE",
            Self::Receipt => "RECEIPT",
            Self::Error => "ERROR",
            Self::Disconnect => "DISCONNECT",
        }
    }

    /// Check if this command can be sent by the server
    #[must_use]
    pub const fn is_server_command(self) -> bool {
        matches!(
            self,
            Self::Connected | Self::Message | Self::Receipt | Self::Error
        )
    }
}

impl std::str::FromStr for StompCommand {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Self::Connect),
            "STOMP" => Ok(Self::Stomp),
            "CONNECTED" => Ok(Self::Connected),
            "SEND" => Ok(Self::Send),
            "SUBSCRIBE" => Ok(Self::Subscribe),
            "UNSUBSCRIBE" => Ok(Self::Unsubscribe),
            "MESSAGE" => Ok(Self::Message),
            "RECEIPT" => Ok(Self::Receipt),
            "ERROR" => Ok(Self::Error),
            "DISCONNECT" => Ok(Self::Disconnect),
            other => Err(FrameError::UnknownCommand(other.to_string())),
        }
    }
}

impl std::fmt::Display for StompCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_commands() {
        for cmd in [
            StompCommand::Connect,
            StompCommand::Connected,
            StompCommand::Message,
            StompCommand::Error,
            StompCommand::Disconnect,
        ] {
            assert_eq!(cmd.as_str().parse::<StompCommand>().unwrap(), cmd);
        }
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!(
            "connected".parse::<StompCommand>(),
            Err(FrameError::UnknownCommand(c)) if c == "connected"
        ));
    }

    #[test]
    fn test_server_commands() {
        assert!(StompCommand::Message.is_server_command());
        assert!(!StompCommand::Send.is_server_command());
    }
}
