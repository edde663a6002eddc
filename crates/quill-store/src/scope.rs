//! Per-user key namespacing.

use std::fmt;

/// Label logged for the shared anonymous namespace.
pub const ANONYMOUS_LABEL: &str = "default";

/// Namespace every collection key is resolved in.
///
/// An authenticated user gets `"{base}_{user_id}"`; without a user the bare
/// base key is used, which is the namespace older single-user data lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct UserScope {
    user_id: Option<String>,
}

impl UserScope {
    /// The shared namespace.
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// A user's namespace. A blank id means no user.
    pub fn user(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        if user_id.trim().is_empty() {
            Self::anonymous()
        } else {
            Self {
                user_id: Some(user_id),
            }
        }
    }

    pub fn from_option(user_id: Option<&str>) -> Self {
        user_id.map(Self::user).unwrap_or_default()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    /// Resolve a base collection key in this scope.
    pub fn key(&self, base: &str) -> String {
        match &self.user_id {
            Some(user) => format!("{}_{}", base, user),
            None => base.to_string(),
        }
    }
}

impl fmt::Display for UserScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.user_id.as_deref().unwrap_or(ANONYMOUS_LABEL))
    }
}
