use crate::{management::Session, spotify::OAuthSessionManager, types::TokenInfo};

/// Outcome of checking a session's token before a user-scoped call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionToken {
    /// A usable token, refreshed in the session if it had expired.
    Valid(TokenInfo),
    /// The session never had a token.
    Absent,
    /// The token could not be recovered and the session was cleared.
    Invalidated(String),
}

/// Applies the token transition policy to one session.
///
/// `NoToken -> Valid -> Expired -> (Refreshed | Invalidated)`. At most one
/// refresh is attempted per call.
///
/// Two concurrent requests from the same session (e.g. duplicate tabs) can
/// both see an expired token and refresh it twice; the later write wins.
pub struct SessionTokenManager<'a> {
    oauth: &'a OAuthSessionManager,
}

impl<'a> SessionTokenManager<'a> {
    pub fn new(oauth: &'a OAuthSessionManager) -> Self {
        Self { oauth }
    }

    pub async fn ensure(&self, session: &Session) -> SessionToken {
        let Some(token) = session.token().await else {
            return SessionToken::Absent;
        };

        if self.oauth.is_valid(&token) {
            return SessionToken::Valid(token);
        }

        if token.refresh_token.is_none() {
            tracing::warn!("expired token without refresh token, clearing session");
            session.clear().await;
            return SessionToken::Invalidated(
                "Your session is no longer valid, please sign in again.".to_string(),
            );
        }

        match self.oauth.refresh(&token).await {
            Ok(refreshed) => {
                session.set_token(&refreshed).await;
                tracing::info!("token refreshed and stored in session");
                SessionToken::Valid(refreshed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, clearing session");
                session.clear().await;
                SessionToken::Invalidated(
                    "Your session could not be renewed, please sign in again.".to_string(),
                )
            }
        }
    }
}
