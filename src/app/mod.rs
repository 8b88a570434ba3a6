//! Application module - handles core application logic
//!
//! `App` drives login, activity listing and participant changes against any
//! `RequestApi`, keeping the visible state in a `Screen`. The browser page and
//! the terminal front end are thin layers over it.

use std::cell::{Ref, RefCell};

use crate::interface::RequestApi;
use crate::model::dtos::{ParticipantAction, ParticipantParams};
use crate::session::SessionManager;
use crate::storage::TokenStore;
use crate::view::{ActivitiesPane, ActivityListView, BannerKind, Screen};

// Platform-specific modules
#[cfg(feature = "no-wasm")]
pub mod terminal;

#[cfg(feature = "wasm")]
pub mod gloo;

pub const LOGIN_FAILED: &str = "Login failed";
pub const LOGIN_RETRY: &str = "Login failed. Please try again.";
pub const GENERIC_ERROR: &str = "An error occurred";

/// Controller shared by every front end.
///
/// Methods take `&self` and release the screen before each await, so event
/// handlers may overlap. Overlapping refreshes race; the last to resolve wins.
pub struct App<C, S> {
    client: C,
    session: SessionManager<S>,
    screen: RefCell<Screen>,
}

impl<C: RequestApi, S: TokenStore> App<C, S> {
    pub fn new(client: C, store: S) -> Self {
        Self {
            client,
            session: SessionManager::restore(store),
            screen: RefCell::new(Screen::default()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn session(&self) -> &SessionManager<S> {
        &self.session
    }

    pub fn screen(&self) -> Ref<'_, Screen> {
        self.screen.borrow()
    }

    /// Validate any stored token, then load the activity list.
    pub async fn start(&self) {
        self.check_auth().await;
        self.fetch_activities().await;
    }

    pub async fn check_auth(&self) {
        self.session.check_auth(&self.client).await;
        self.update_user();
    }

    pub fn open_login(&self) {
        self.screen.borrow_mut().login_modal_open = true;
    }

    pub fn close_login(&self) {
        let mut screen = self.screen.borrow_mut();
        screen.login_modal_open = false;
        screen.login_error = None;
    }

    /// Returns true when the user is now signed in.
    pub async fn submit_login(&self, username: &str, password: &str) -> bool {
        match self.session.login(&self.client, username, password).await {
            Ok(_) => {
                self.close_login();
                self.update_user();
                self.fetch_activities().await;
                true
            }
            Err(e) if e.is_rejection() => {
                let message = e.rejection_detail().unwrap_or(LOGIN_FAILED).to_string();
                self.screen.borrow_mut().login_error = Some(message);
                false
            }
            Err(e) => {
                log::error!("Error logging in: {e}");
                self.screen.borrow_mut().login_error = Some(LOGIN_RETRY.to_string());
                false
            }
        }
    }

    pub async fn logout(&self) {
        self.session.logout();
        self.update_user();
        self.fetch_activities().await;
    }

    /// Replace the whole activity list, or show the static failure text.
    pub async fn fetch_activities(&self) {
        let pane = match self.client.activities().await {
            Ok(board) => {
                let signed_in = self.session.is_authenticated();
                ActivitiesPane::Loaded(ActivityListView::render(&board, signed_in))
            }
            Err(e) => {
                log::error!("Error fetching activities: {e}");
                ActivitiesPane::Failed
            }
        };

        self.screen.borrow_mut().set_activities(pane);
    }

    /// Returns true when the server accepted the signup.
    pub async fn signup(&self, activity: &str, email: &str) -> bool {
        self.change_participant(ParticipantAction::Signup, activity, email)
            .await
    }

    /// Returns true when the server removed the participant.
    pub async fn unregister(&self, activity: &str, email: &str) -> bool {
        self.change_participant(ParticipantAction::Unregister, activity, email)
            .await
    }

    pub fn dismiss_banner(&self, id: u64) -> bool {
        self.screen.borrow_mut().dismiss_banner(id)
    }

    async fn change_participant(
        &self,
        action: ParticipantAction,
        activity: &str,
        email: &str,
    ) -> bool {
        let token = self.session.token();
        let params = ParticipantParams {
            activity: activity.to_string(),
            email: email.to_string(),
        };

        let reply = match action {
            ParticipantAction::Signup => self.client.signup(token.as_deref(), params).await,
            ParticipantAction::Unregister => {
                self.client.unregister(token.as_deref(), params).await
            }
        };

        match reply {
            Ok(reply) => {
                self.screen
                    .borrow_mut()
                    .show_banner(BannerKind::Success, reply.message);
                self.fetch_activities().await;
                true
            }
            Err(e) if e.is_rejection() => {
                let text = e.rejection_detail().unwrap_or(GENERIC_ERROR).to_string();
                self.screen.borrow_mut().show_banner(BannerKind::Error, text);
                false
            }
            Err(e) => {
                log::error!("Error on {} for {activity}: {e}", action.segment());
                self.screen
                    .borrow_mut()
                    .show_banner(BannerKind::Error, action.failure_message());
                false
            }
        }
    }

    fn update_user(&self) {
        let user = self.session.user();
        self.screen.borrow_mut().show_user(user.as_ref());
    }
}
