use std::{
    future::Future,
    path::{Path, PathBuf},
};

use crate::foundation::error::BoilerResult;

/// A chat-platform user.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subject {
    pub id: u64,
    /// Display name, used for logging only.
    pub name: String,
}

impl Subject {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// Who invoked a command, and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interaction {
    pub requester: Subject,
    /// `None` in direct messages.
    pub guild_name: Option<String>,
}

/// A reply: text, an optional file, or both.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reply {
    pub content: String,
    pub attachment: Option<PathBuf>,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            attachment: None,
        }
    }

    pub fn with_file(content: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            content: content.into(),
            attachment: Some(path.into()),
        }
    }
}

/// Where avatars come from.
pub trait AvatarSource: Send + Sync {
    /// Content hash or version key of the subject's current avatar.
    fn avatar_key(&self, subject: &Subject) -> String;

    /// Download the avatar to `dest`, returning its size in bytes.
    fn fetch_avatar(
        &self,
        subject: &Subject,
        dest: &Path,
    ) -> impl Future<Output = BoilerResult<u64>> + Send;
}

/// Two-phase reply channel for one interaction.
pub trait ResponseSink: Send {
    /// Acknowledge now, reply later. Must precede any slow work.
    fn defer(&mut self) -> impl Future<Output = BoilerResult<()>> + Send;

    fn send(&mut self, reply: Reply) -> impl Future<Output = BoilerResult<()>> + Send;
}

#[cfg(test)]
#[path = "../../tests/unit/handler/platform.rs"]
mod tests;
