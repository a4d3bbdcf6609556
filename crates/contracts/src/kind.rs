use serde::{Deserialize, Serialize};

/// The four message categories the gateway can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Email,
    Sms,
    Push,
    Chat,
}

impl Kind {
    /// All kinds, in the canonical order used for stats and iteration.
    pub const ALL: [Kind; 4] = [Kind::Email, Kind::Sms, Kind::Push, Kind::Chat];

    /// Lowercase wire name (`email`, `sms`, `push`, `chat`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Email => "email",
            Kind::Sms => "sms",
            Kind::Push => "push",
            Kind::Chat => "chat",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(Kind::Email.to_string(), "email");
        assert_eq!(Kind::Sms.to_string(), "sms");
        assert_eq!(Kind::Push.to_string(), "push");
        assert_eq!(Kind::Chat.to_string(), "chat");
    }

    #[test]
    fn serde_lowercase() {
        let json = serde_json::to_string(&Kind::Push).unwrap();
        assert_eq!(json, "\"push\"");
        let back: Kind = serde_json::from_str("\"sms\"").unwrap();
        assert_eq!(back, Kind::Sms);
    }
}
