//! Input actions and termination flags.
//!
//! Platform event decoding lives in [`crate::window`]; this module holds the
//! platform-free pieces so the mapping rules and the exit logic stay
//! unit-testable.

use x11::keysym::XK_Escape;
use x11::xlib::KeySym;

/// A recognized side effect of one platform event. Everything else the
/// window receives is silently ignored.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    /// The window manager's close affordance was used.
    CloseRequested,
    /// Escape was pressed.
    EscapePressed,
    /// `F`/`f` was pressed.
    ToggleFullscreen,
    /// The platform reported a new window size.
    Resized { width: i32, height: i32 },
}

/// Mouse buttons recognized by the scene. All are currently no-ops.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

impl MouseButton {
    /// Maps an X11 button code; codes outside 1..=5 are unrecognized.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(Self::Left),
            2 => Some(Self::Middle),
            3 => Some(Self::Right),
            4 => Some(Self::WheelUp),
            5 => Some(Self::WheelDown),
            _ => None,
        }
    }
}

/// Maps a key press (keysym plus the looked-up ASCII character) to an action.
pub fn key_action(keysym: KeySym, ascii: Option<char>) -> Option<Action> {
    if keysym == KeySym::from(XK_Escape) {
        return Some(Action::EscapePressed);
    }

    match ascii {
        Some('F') | Some('f') => Some(Action::ToggleFullscreen),
        _ => None,
    }
}

/// Termination state of the render loop.
///
/// The loop exits when either flag is set, but only after rendering the
/// frame of the iteration that observed it.
#[derive(Debug, Default, Copy, Clone)]
pub struct LoopState {
    close_requested: bool,
    escape_pressed: bool,
}

impl LoopState {
    pub fn note_close_requested(&mut self) {
        self.close_requested = true;
    }

    pub fn note_escape_pressed(&mut self) {
        self.escape_pressed = true;
    }

    /// Close button observed OR escape observed.
    pub fn should_exit(&self) -> bool {
        self.close_requested || self.escape_pressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_maps_to_escape_pressed() {
        assert_eq!(
            key_action(KeySym::from(XK_Escape), None),
            Some(Action::EscapePressed)
        );
    }

    #[test]
    fn f_maps_to_fullscreen_toggle_in_both_cases() {
        assert_eq!(key_action(0, Some('f')), Some(Action::ToggleFullscreen));
        assert_eq!(key_action(0, Some('F')), Some(Action::ToggleFullscreen));
    }

    #[test]
    fn other_keys_map_to_nothing() {
        assert_eq!(key_action(0, Some('x')), None);
        assert_eq!(key_action(0, None), None);
    }

    #[test]
    fn five_button_codes_are_recognized() {
        assert_eq!(MouseButton::from_code(1), Some(MouseButton::Left));
        assert_eq!(MouseButton::from_code(2), Some(MouseButton::Middle));
        assert_eq!(MouseButton::from_code(3), Some(MouseButton::Right));
        assert_eq!(MouseButton::from_code(4), Some(MouseButton::WheelUp));
        assert_eq!(MouseButton::from_code(5), Some(MouseButton::WheelDown));
        assert_eq!(MouseButton::from_code(6), None);
        assert_eq!(MouseButton::from_code(0), None);
    }

    #[test]
    fn either_flag_requests_exit() {
        let mut state = LoopState::default();
        assert!(!state.should_exit());

        state.note_escape_pressed();
        assert!(state.should_exit());

        let mut state = LoopState::default();
        state.note_close_requested();
        assert!(state.should_exit());
    }
}
