use std::fmt;

use super::HarnessError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    AdminAccess,
    AdminRefresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Access => "access token",
            TokenKind::Refresh => "refresh token",
            TokenKind::AdminAccess => "admin access token",
            TokenKind::AdminRefresh => "admin refresh token",
        };
        f.write_str(name)
    }
}

/// Credentials captured by the login cases and replayed by later requests.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub admin_access_token: Option<String>,
    pub admin_refresh_token: Option<String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: TokenKind) -> Option<&str> {
        match kind {
            TokenKind::Access => self.access_token.as_deref(),
            TokenKind::Refresh => self.refresh_token.as_deref(),
            TokenKind::AdminAccess => self.admin_access_token.as_deref(),
            TokenKind::AdminRefresh => self.admin_refresh_token.as_deref(),
        }
    }

    /// A missing token is an error so the calling case is reported as failed.
    pub fn require(&self, kind: TokenKind) -> Result<&str, HarnessError> {
        self.get(kind).ok_or(HarnessError::MissingToken(kind))
    }

    pub fn set(&mut self, kind: TokenKind, token: String) {
        let slot = match kind {
            TokenKind::Access => &mut self.access_token,
            TokenKind::Refresh => &mut self.refresh_token,
            TokenKind::AdminAccess => &mut self.admin_access_token,
            TokenKind::AdminRefresh => &mut self.admin_refresh_token,
        };
        *slot = Some(token);
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none()
            && self.refresh_token.is_none()
            && self.admin_access_token.is_none()
            && self.admin_refresh_token.is_none()
    }
}
