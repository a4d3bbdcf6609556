use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::kind::Kind;

/// A file attachment carried by an email or chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<u8>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Result of a single send call.
///
/// `id` is opaque and provider-defined; the memory provider generates a
/// fresh uuid per call, vendor providers return whatever their API did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SendResult {
    pub id: String,
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, String>,
}

/// An email message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Email {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_name: Option<String>,
    pub to: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plain_text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

/// An SMS message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: Vec<String>,
    pub message: String,
}

/// A push notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Push {
    pub device_tokens: Vec<String>,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
}

/// An interactive button attached to a chat message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatButton {
    pub id: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A message for chat/social platforms (WhatsApp, Telegram, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Chat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub to: Vec<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub template_params: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ChatButton>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// Marker trait tying a message value type to its [`Kind`].
///
/// Implemented by the four message types only; everything generic over a
/// message kind (senders, the registry, the store) is parameterized over
/// this trait instead of being hand-copied four times.
pub trait Message: Clone + Send + Sync + 'static {
    const KIND: Kind;
}

impl Message for Email {
    const KIND: Kind = Kind::Email;
}

impl Message for Sms {
    const KIND: Kind = Kind::Sms;
}

impl Message for Push {
    const KIND: Kind = Kind::Push;
}

impl Message for Chat {
    const KIND: Kind = Kind::Chat;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn email_serde_skips_empty_fields() {
        let email = Email {
            to: vec!["a@b.com".into()],
            subject: "hi".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(&email).unwrap();
        assert_eq!(json["to"][0], "a@b.com");
        assert_eq!(json["subject"], "hi");
        assert!(json.get("cc").is_none());
        assert!(json.get("html").is_none());
    }

    #[test]
    fn message_kinds() {
        assert_eq!(Email::KIND, Kind::Email);
        assert_eq!(Sms::KIND, Kind::Sms);
        assert_eq!(Push::KIND, Kind::Push);
        assert_eq!(Chat::KIND, Kind::Chat);
    }
}
