//! Visible UI state and the activity list markup.
//!
//! `Screen` is what the controller maintains; the browser page paints it into
//! the DOM and the terminal front end prints it.

use std::fmt::Write as _;
use std::time::Duration;

use crate::model::structs::{ActivityBoard, User};

/// How long a status banner stays up.
pub const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

pub const LOAD_FAILED_TEXT: &str = "Failed to load activities. Please try again later.";
pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";
pub const DELETE_LABEL: &str = "\u{274c}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

impl BannerKind {
    /// CSS class applied to the message element.
    pub fn class_name(self) -> &'static str {
        match self {
            BannerKind::Success => "success",
            BannerKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: u64,
    pub text: String,
    pub kind: BannerKind,
    pub hide_after: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantRow {
    pub email: String,
    pub removable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    pub spots_left: i64,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

/// One card and one select option per activity, in board order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityListView {
    pub cards: Vec<ActivityCard>,
    pub options: Vec<SelectOption>,
}

impl ActivityListView {
    pub fn render(board: &ActivityBoard, signed_in: bool) -> Self {
        let mut view = Self::default();

        for (name, details) in board.iter() {
            view.cards.push(ActivityCard {
                name: name.to_string(),
                description: details.description.clone(),
                schedule: details.schedule.clone(),
                spots_left: details.spots_left(),
                participants: details
                    .participants
                    .iter()
                    .map(|email| ParticipantRow {
                        email: email.clone(),
                        removable: signed_in,
                    })
                    .collect(),
            });
            view.options.push(SelectOption {
                value: name.to_string(),
                label: name.to_string(),
            });
        }

        view
    }

    pub fn delete_controls(&self) -> usize {
        self.cards
            .iter()
            .flat_map(|card| &card.participants)
            .filter(|row| row.removable)
            .count()
    }

    pub fn to_html(&self) -> String {
        self.cards.iter().map(ActivityCard::to_html).collect()
    }

    /// Select options behind the fixed placeholder.
    pub fn options_html(&self) -> String {
        let mut html = format!(r#"<option value="">{SELECT_PLACEHOLDER}</option>"#);
        for option in &self.options {
            let _ = write!(
                html,
                r#"<option value="{}">{}</option>"#,
                escape_html(&option.value),
                escape_html(&option.label)
            );
        }
        html
    }
}

impl ActivityCard {
    pub fn to_html(&self) -> String {
        let name = escape_html(&self.name);

        let participants = if self.participants.is_empty() {
            "<p><em>No participants yet</em></p>".to_string()
        } else {
            let mut items = String::new();
            for row in &self.participants {
                let email = escape_html(&row.email);
                let _ = write!(items, r#"<li><span class="participant-email">{email}</span>"#);
                if row.removable {
                    let _ = write!(
                        items,
                        r#"<button class="delete-btn" data-activity="{name}" data-email="{email}">{DELETE_LABEL}</button>"#
                    );
                }
                items.push_str("</li>");
            }
            format!(
                r#"<div class="participants-section"><h5>Participants:</h5><ul class="participants-list">{items}</ul></div>"#
            )
        };

        format!(
            r#"<div class="activity-card"><h4>{name}</h4><p>{}</p><p><strong>Schedule:</strong> {}</p><p><strong>Availability:</strong> {} spots left</p><div class="participants-container">{participants}</div></div>"#,
            escape_html(&self.description),
            escape_html(&self.schedule),
            self.spots_left,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActivitiesPane {
    #[default]
    Loading,
    Loaded(ActivityListView),
    Failed,
}

impl ActivitiesPane {
    pub fn to_html(&self) -> String {
        match self {
            ActivitiesPane::Loading => "<p>Loading activities...</p>".to_string(),
            ActivitiesPane::Loaded(view) => view.to_html(),
            ActivitiesPane::Failed => format!("<p>{LOAD_FAILED_TEXT}</p>"),
        }
    }

    pub fn list(&self) -> Option<&ActivityListView> {
        match self {
            ActivitiesPane::Loaded(view) => Some(view),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// "Full Name (role)" while signed in.
    pub user_display: Option<String>,
    pub login_button_visible: bool,
    pub signup_visible: bool,
    pub activities: ActivitiesPane,
    /// Bumped on every fetch outcome so painters can skip unchanged lists.
    pub activities_revision: u64,
    pub banner: Option<Banner>,
    pub login_error: Option<String>,
    pub login_modal_open: bool,
    next_banner_id: u64,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            user_display: None,
            login_button_visible: true,
            signup_visible: false,
            activities: ActivitiesPane::default(),
            activities_revision: 0,
            banner: None,
            login_error: None,
            login_modal_open: false,
            next_banner_id: 0,
        }
    }
}

impl Screen {
    pub fn show_user(&mut self, user: Option<&User>) {
        self.user_display = user.map(User::to_string);
        self.login_button_visible = user.is_none();
        self.signup_visible = user.is_some();
    }

    pub fn set_activities(&mut self, pane: ActivitiesPane) {
        self.activities = pane;
        self.activities_revision += 1;
    }

    pub fn show_banner(&mut self, kind: BannerKind, text: impl Into<String>) -> Banner {
        self.next_banner_id += 1;
        let banner = Banner {
            id: self.next_banner_id,
            text: text.into(),
            kind,
            hide_after: BANNER_TIMEOUT,
        };
        self.banner = Some(banner.clone());
        banner
    }

    /// Hide the banner only if it is still the one the timer was started for.
    pub fn dismiss_banner(&mut self, id: u64) -> bool {
        if self.banner.as_ref().is_some_and(|b| b.id == id) {
            self.banner = None;
            true
        } else {
            false
        }
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
