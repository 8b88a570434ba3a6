use std::cell::RefCell;

use crate::error::Result;
use crate::interface::RequestApi;
use crate::model::dtos::LoginParams;
use crate::model::structs::User;
use crate::storage::TokenStore;

/// Bearer token and the user it belongs to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
}

/// Holds the session in memory and mirrors the token into a durable store.
pub struct SessionManager<S> {
    store: S,
    state: RefCell<Session>,
}

impl<S: TokenStore> SessionManager<S> {
    /// Pick up a token persisted by an earlier run. The user stays unknown until `check_auth`.
    pub fn restore(store: S) -> Self {
        let token = store.load().unwrap_or_else(|e| {
            log::error!("Error reading stored token: {e}");
            None
        });

        Self {
            store,
            state: RefCell::new(Session { token, user: None }),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().user.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Send credentials; on success the token and user are kept and persisted.
    ///
    /// Rejections and transport failures are returned untouched so the caller
    /// can choose between the server's detail and a generic message.
    pub async fn login<C: RequestApi>(
        &self,
        client: &C,
        username: &str,
        password: &str,
    ) -> Result<User> {
        let reply = client
            .login(LoginParams {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        if let Err(e) = self.store.save(&reply.access_token) {
            log::warn!("Error persisting token: {e}");
        }

        log::info!("logged in as {}", reply.user);
        let mut state = self.state.borrow_mut();
        state.token = Some(reply.access_token);
        state.user = Some(reply.user.clone());
        Ok(reply.user)
    }

    /// Drop the session locally. The server is not told.
    pub fn logout(&self) {
        self.discard();
        log::info!("logged out");
    }

    /// Re-validate a held token against the server.
    ///
    /// Any answer other than a user, including transport failures, discards the token.
    pub async fn check_auth<C: RequestApi>(&self, client: &C) -> Option<User> {
        let token = self.token()?;

        match client.current_user(&token).await {
            Ok(Some(user)) => {
                log::debug!("restored session for {user}");
                self.state.borrow_mut().user = Some(user.clone());
                Some(user)
            }
            Ok(None) => {
                log::debug!("server returned no user for stored token");
                self.discard();
                None
            }
            Err(e) if e.is_rejection() => {
                log::debug!("stored token rejected: {e}");
                self.discard();
                None
            }
            Err(e) => {
                log::error!("Error checking auth: {e}");
                self.discard();
                None
            }
        }
    }

    fn discard(&self) {
        *self.state.borrow_mut() = Session::default();
        if let Err(e) = self.store.clear() {
            log::warn!("Error clearing stored token: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{teacher, FakeServer, TEACHER_TOKEN};
    use crate::storage::MemoryTokenStore;

    #[tokio::test]
    async fn login_persists_token_and_user() {
        let server = FakeServer::default();
        let session = SessionManager::restore(MemoryTokenStore::default());

        let user = session.login(&server, "mrodriguez", "art123").await.unwrap();

        assert_eq!(user, teacher());
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some(TEACHER_TOKEN));
        assert_eq!(session.store().load().unwrap().as_deref(), Some(TEACHER_TOKEN));
    }

    #[tokio::test]
    async fn bad_credentials_leave_no_token() {
        let server = FakeServer::default();
        let session = SessionManager::restore(MemoryTokenStore::default());

        let err = session.login(&server, "mrodriguez", "wrong").await.unwrap_err();

        assert_eq!(err.rejection_detail(), Some("Invalid username or password"));
        assert!(!session.is_authenticated());
        assert_eq!(session.store().load().unwrap(), None);
    }

    #[tokio::test]
    async fn check_auth_without_token_skips_the_server() {
        let server = FakeServer::default();
        let session = SessionManager::restore(MemoryTokenStore::default());

        assert_eq!(session.check_auth(&server).await, None);
        assert_eq!(server.me_calls.get(), 0);
    }

    #[tokio::test]
    async fn check_auth_restores_user_for_valid_token() {
        let server = FakeServer::default();
        let session = SessionManager::restore(MemoryTokenStore::with_token(TEACHER_TOKEN));
        assert!(!session.is_authenticated());

        assert_eq!(session.check_auth(&server).await, Some(teacher()));
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn check_auth_discards_expired_token() {
        let server = FakeServer::default();
        let session = SessionManager::restore(MemoryTokenStore::with_token("expired"));

        assert_eq!(session.check_auth(&server).await, None);
        assert_eq!(session.snapshot(), Session::default());
        assert_eq!(session.store().load().unwrap(), None);
    }

    #[tokio::test]
    async fn check_auth_discards_token_when_offline() {
        let server = FakeServer::default();
        server.offline.set(true);
        let session = SessionManager::restore(MemoryTokenStore::with_token(TEACHER_TOKEN));

        assert_eq!(session.check_auth(&server).await, None);
        assert_eq!(session.token(), None);
        assert_eq!(session.store().load().unwrap(), None);
    }

    #[tokio::test]
    async fn logout_clears_memory_and_store() {
        let server = FakeServer::default();
        let session = SessionManager::restore(MemoryTokenStore::default());
        session.login(&server, "mrodriguez", "art123").await.unwrap();

        session.logout();

        assert_eq!(session.snapshot(), Session::default());
        assert_eq!(session.store().load().unwrap(), None);
    }
}
