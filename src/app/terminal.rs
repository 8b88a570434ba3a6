//! No-WASM front end
//!
//! Prints the controller's screen to the terminal, one command per run.

use std::fmt::Write as _;

use crate::view::{ActivitiesPane, Screen, LOAD_FAILED_TEXT};

const RULE: &str = "=====================================";

pub fn render_screen(screen: &Screen) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    match &screen.user_display {
        Some(user) => {
            let _ = writeln!(out, "Signed in as: {user}");
        }
        None => {
            let _ = writeln!(out, "Not signed in");
        }
    }
    let _ = writeln!(out, "{RULE}");

    match &screen.activities {
        ActivitiesPane::Loading => {
            let _ = writeln!(out, "Loading activities...");
        }
        ActivitiesPane::Failed => {
            let _ = writeln!(out, "{LOAD_FAILED_TEXT}");
        }
        ActivitiesPane::Loaded(list) => {
            for card in &list.cards {
                let _ = writeln!(out, "{}", card.name);
                let _ = writeln!(out, "  {}", card.description);
                let _ = writeln!(out, "  Schedule: {}", card.schedule);
                let _ = writeln!(out, "  Availability: {} spots left", card.spots_left);
                if card.participants.is_empty() {
                    let _ = writeln!(out, "  No participants yet");
                } else {
                    let _ = writeln!(out, "  Participants:");
                    for row in &card.participants {
                        let marker = if row.removable { "  [removable]" } else { "" };
                        let _ = writeln!(out, "    - {}{marker}", row.email);
                    }
                }
                let _ = writeln!(out, "{RULE}");
            }
        }
    }

    if let Some(error) = &screen.login_error {
        let _ = writeln!(out, "[error] {error}");
    }
    if let Some(banner) = &screen.banner {
        let _ = writeln!(out, "[{}] {}", banner.kind.class_name(), banner.text);
    }

    out
}

pub fn print_screen(screen: &Screen) {
    print!("{}", render_screen(screen));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::structs::{Activity, ActivityBoard, User};
    use crate::view::{ActivityListView, BannerKind};

    #[test]
    fn prints_user_activities_and_banner() {
        let board: ActivityBoard = vec![(
            "Chess Club".to_string(),
            Activity {
                description: "Learn strategies".to_string(),
                schedule: "Fridays".to_string(),
                max_participants: 12,
                participants: vec!["michael@mergington.edu".to_string()],
            },
        )]
        .into_iter()
        .collect();

        let mut screen = Screen::default();
        screen.show_user(Some(&User {
            username: None,
            full_name: "Maria Rodriguez".to_string(),
            role: "teacher".to_string(),
        }));
        screen.set_activities(ActivitiesPane::Loaded(ActivityListView::render(&board, true)));
        screen.show_banner(BannerKind::Success, "Signed up");

        let out = render_screen(&screen);
        assert!(out.contains("Signed in as: Maria Rodriguez (teacher)"));
        assert!(out.contains("  Availability: 11 spots left"));
        assert!(out.contains("    - michael@mergington.edu  [removable]"));
        assert!(out.ends_with("[success] Signed up\n"));
    }

    #[test]
    fn prints_load_failure() {
        let mut screen = Screen::default();
        screen.set_activities(ActivitiesPane::Failed);

        let out = render_screen(&screen);
        assert!(out.contains("Not signed in"));
        assert!(out.contains(LOAD_FAILED_TEXT));
    }
}
