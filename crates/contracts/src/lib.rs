//! Message contracts shared across all relay crates.
//!
//! Providers (vendor clients, the devbox memory interceptor) implement the
//! [`Sender`] trait for one or more message kinds; the dispatch core only
//! ever talks to `dyn Sender<M>`.

pub mod error;
pub mod kind;
pub mod message;
pub mod sender;

pub use {
    error::{Error, Result},
    kind::Kind,
    message::{Attachment, Chat, ChatButton, Email, Message, Push, SendResult, Sms},
    sender::{DynSender, Sender},
};
