//! In-memory stand-in for the signup server, used by the controller tests.

use std::cell::{Cell, RefCell};

use crate::client::decode_reply;
use crate::error::{Error, ErrorKind, Result};
use crate::interface::RequestApi;
use crate::model::dtos::{LoginParams, LoginResponse, MessageResponse, ParticipantParams};
use crate::model::structs::{Activity, ActivityBoard, User};

pub const TEACHER_TOKEN: &str = "token-mrodriguez";

pub struct FakeServer {
    board: RefCell<Vec<(String, Activity)>>,
    pub offline: Cell<bool>,
    /// Rejections carry no `detail`.
    pub bare_rejections: Cell<bool>,
    /// Every request gets a non-JSON 502 from a proxy in front of the server.
    pub gateway_down: Cell<bool>,
    pub activities_calls: Cell<usize>,
    pub me_calls: Cell<usize>,
    pub mutation_calls: Cell<usize>,
}

pub fn teacher() -> User {
    User {
        username: Some("mrodriguez".to_string()),
        full_name: "Maria Rodriguez".to_string(),
        role: "teacher".to_string(),
    }
}

fn activity(schedule: &str, max: u32, participants: &[&str]) -> Activity {
    Activity {
        description: format!("Meets {schedule}"),
        schedule: schedule.to_string(),
        max_participants: max,
        participants: participants.iter().map(|p| p.to_string()).collect(),
    }
}

fn offline() -> Error {
    std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused").into()
}

impl Default for FakeServer {
    fn default() -> Self {
        Self {
            board: RefCell::new(vec![
                (
                    "Chess Club".to_string(),
                    activity("Fridays, 3:30 PM - 5:00 PM", 12, &["michael@mergington.edu"]),
                ),
                (
                    "Programming Class".to_string(),
                    activity("Tuesdays, 3:30 PM - 4:30 PM", 2, &[]),
                ),
                (
                    "Gym Class".to_string(),
                    activity(
                        "Mondays, 2:00 PM - 3:00 PM",
                        1,
                        &["john@mergington.edu", "olivia@mergington.edu"],
                    ),
                ),
            ]),
            offline: Cell::new(false),
            bare_rejections: Cell::new(false),
            gateway_down: Cell::new(false),
            activities_calls: Cell::new(0),
            me_calls: Cell::new(0),
            mutation_calls: Cell::new(0),
        }
    }
}

impl FakeServer {
    pub fn participants(&self, name: &str) -> Vec<String> {
        self.board
            .borrow()
            .iter()
            .find(|(candidate, _)| candidate == name)
            .map(|(_, activity)| activity.participants.clone())
            .unwrap_or_default()
    }

    fn rejected(&self, status: u16, detail: &str) -> Error {
        let detail = (!self.bare_rejections.get()).then(|| detail.to_string());
        ErrorKind::Rejected { status, detail }.into()
    }

    fn authorize(&self, token: Option<&str>) -> Result<()> {
        match token {
            Some(TEACHER_TOKEN) => Ok(()),
            Some(_) => Err(self.rejected(401, "Invalid or expired token")),
            None => Err(self.rejected(401, "Not authenticated")),
        }
    }

    fn connect(&self) -> Result<()> {
        if self.offline.get() {
            Err(offline())
        } else if self.gateway_down.get() {
            decode_reply(502, false, "<html>Bad Gateway</html>")
        } else {
            Ok(())
        }
    }
}

impl RequestApi for FakeServer {
    async fn login(&self, params: LoginParams) -> Result<LoginResponse> {
        self.connect()?;
        if params.username == "mrodriguez" && params.password == "art123" {
            Ok(LoginResponse {
                access_token: TEACHER_TOKEN.to_string(),
                token_type: Some("bearer".to_string()),
                user: teacher(),
            })
        } else {
            Err(self.rejected(401, "Invalid username or password"))
        }
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>> {
        self.me_calls.set(self.me_calls.get() + 1);
        self.connect()?;
        self.authorize(Some(token))?;
        Ok(Some(teacher()))
    }

    async fn activities(&self) -> Result<ActivityBoard> {
        self.activities_calls.set(self.activities_calls.get() + 1);
        self.connect()?;
        Ok(self.board.borrow().iter().cloned().collect())
    }

    async fn signup(&self, token: Option<&str>, params: ParticipantParams) -> Result<MessageResponse> {
        self.mutation_calls.set(self.mutation_calls.get() + 1);
        self.connect()?;
        self.authorize(token)?;

        let mut board = self.board.borrow_mut();
        let (_, activity) = board
            .iter_mut()
            .find(|(name, _)| *name == params.activity)
            .ok_or_else(|| self.rejected(404, "Activity not found"))?;
        if activity.participants.contains(&params.email) {
            return Err(self.rejected(400, "Student is already signed up"));
        }
        activity.participants.push(params.email.clone());

        Ok(MessageResponse {
            message: format!("Signed up {} for {}", params.email, params.activity),
        })
    }

    async fn unregister(
        &self,
        token: Option<&str>,
        params: ParticipantParams,
    ) -> Result<MessageResponse> {
        self.mutation_calls.set(self.mutation_calls.get() + 1);
        self.connect()?;
        self.authorize(token)?;

        let mut board = self.board.borrow_mut();
        let (_, activity) = board
            .iter_mut()
            .find(|(name, _)| *name == params.activity)
            .ok_or_else(|| self.rejected(404, "Activity not found"))?;
        let before = activity.participants.len();
        activity.participants.retain(|p| *p != params.email);
        if activity.participants.len() == before {
            return Err(self.rejected(400, "Student is not signed up for this activity"));
        }

        Ok(MessageResponse {
            message: format!("Unregistered {} from {}", params.email, params.activity),
        })
    }
}
