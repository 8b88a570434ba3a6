//! Login dialog focus handling.
//!
//! The decisions live here so they can be tested without a browser; the page
//! module applies them to real elements.

/// Elements that can take keyboard focus inside the dialog.
pub const FOCUSABLE_SELECTOR: &str = concat!(
    "a[href], button:not([disabled]), textarea:not([disabled]), ",
    "input:not([disabled]), select:not([disabled]), [tabindex]:not([tabindex=\"-1\"])"
);

/// Element focused when the dialog opens.
pub const FIRST_INPUT_SELECTOR: &str = "input:not([disabled])";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Tab { shift: bool },
    Escape,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_event(key: &str, shift: bool) -> Self {
        match key {
            "Tab" => Key::Tab { shift },
            "Escape" => Key::Escape,
            _ => Key::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapAction {
    /// Let the browser move focus.
    Ignore,
    /// Prevent default and wrap to the first element.
    FocusFirst,
    /// Prevent default and wrap to the last element.
    FocusLast,
    Close,
}

/// Decide how a key press inside the open dialog is handled.
///
/// `active` is the index of the focused element among the `count` focusable ones.
pub fn trap_focus(key: Key, active: Option<usize>, count: usize) -> TrapAction {
    if count == 0 {
        return match key {
            Key::Escape => TrapAction::Close,
            _ => TrapAction::Ignore,
        };
    }

    match key {
        Key::Tab { shift: true } if active == Some(0) => TrapAction::FocusLast,
        Key::Tab { shift: false } if active == Some(count - 1) => TrapAction::FocusFirst,
        Key::Escape => TrapAction::Close,
        _ => TrapAction::Ignore,
    }
}

/// Open flag plus the element to hand focus back to.
#[derive(Debug)]
pub struct ModalState<T> {
    open: bool,
    return_focus: Option<T>,
}

impl<T> Default for ModalState<T> {
    fn default() -> Self {
        Self {
            open: false,
            return_focus: None,
        }
    }
}

impl<T> ModalState<T> {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self, previously_focused: Option<T>) {
        self.open = true;
        self.return_focus = previously_focused;
    }

    /// Returns the element that had focus before the dialog opened.
    pub fn close(&mut self) -> Option<T> {
        self.open = false;
        self.return_focus.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_wraps_from_last_to_first() {
        let tab = Key::from_event("Tab", false);
        assert_eq!(trap_focus(tab, Some(3), 4), TrapAction::FocusFirst);
        assert_eq!(trap_focus(tab, Some(1), 4), TrapAction::Ignore);
    }

    #[test]
    fn shift_tab_wraps_from_first_to_last() {
        let back = Key::from_event("Tab", true);
        assert_eq!(trap_focus(back, Some(0), 4), TrapAction::FocusLast);
        assert_eq!(trap_focus(back, Some(2), 4), TrapAction::Ignore);
    }

    #[test]
    fn focus_outside_the_dialog_is_left_alone() {
        assert_eq!(trap_focus(Key::Tab { shift: false }, None, 4), TrapAction::Ignore);
        assert_eq!(trap_focus(Key::Tab { shift: true }, None, 4), TrapAction::Ignore);
    }

    #[test]
    fn escape_closes() {
        assert_eq!(trap_focus(Key::from_event("Escape", false), Some(1), 4), TrapAction::Close);
        assert_eq!(trap_focus(Key::Escape, None, 0), TrapAction::Close);
        assert_eq!(trap_focus(Key::from_event("Enter", false), Some(0), 4), TrapAction::Ignore);
    }

    #[test]
    fn single_element_wraps_onto_itself() {
        assert_eq!(trap_focus(Key::Tab { shift: false }, Some(0), 1), TrapAction::FocusFirst);
        assert_eq!(trap_focus(Key::Tab { shift: true }, Some(0), 1), TrapAction::FocusLast);
    }

    #[test]
    fn close_hands_back_previous_focus_once() {
        let mut modal = ModalState::default();
        assert!(!modal.is_open());

        modal.open(Some("login-btn"));
        assert!(modal.is_open());

        assert_eq!(modal.close(), Some("login-btn"));
        assert!(!modal.is_open());
        assert_eq!(modal.close(), None);
    }
}
