//! Key chords and key-down events
//!
//! A chord's canonical string is the lower-cased key followed by the held
//! modifiers in a fixed order, e.g. `p+ctrl+shift`. Control and the platform
//! meta key (Cmd on macOS) both count as `ctrl`.

use std::fmt;

/// Where keyboard focus is when a key goes down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusTarget {
    #[default]
    Canvas,
    Button,
    TextInput,
    TextArea,
    Select,
    ContentEditable,
}

impl FocusTarget {
    /// Typing into these must never trigger shortcuts
    pub fn is_editable(self) -> bool {
        match self {
            FocusTarget::Canvas | FocusTarget::Button => false,
            FocusTarget::TextInput
            | FocusTarget::TextArea
            | FocusTarget::Select
            | FocusTarget::ContentEditable => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chord {
    pub key: &'static str,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Chord {
    pub const fn key(key: &'static str) -> Self {
        Self {
            key,
            ctrl: false,
            alt: false,
            shift: false,
        }
    }

    pub const fn ctrl(self) -> Self {
        Self { ctrl: true, ..self }
    }

    pub const fn alt(self) -> Self {
        Self { alt: true, ..self }
    }

    pub const fn shift(self) -> Self {
        Self { shift: true, ..self }
    }

    pub fn canonical(&self) -> String {
        canonical_chord(self.key, self.ctrl, self.alt, self.shift)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.alt {
            write!(f, "Alt+")?;
        }
        if self.shift {
            write!(f, "Shift+")?;
        }
        let mut chars = self.key.chars();
        match chars.next() {
            Some(first) => write!(f, "{}{}", first.to_uppercase(), chars.as_str()),
            None => Ok(()),
        }
    }
}

fn canonical_chord(key: &str, ctrl: bool, alt: bool, shift: bool) -> String {
    let mut chord = key.to_lowercase();
    if ctrl {
        chord.push_str("+ctrl");
    }
    if alt {
        chord.push_str("+alt");
    }
    if shift {
        chord.push_str("+shift");
    }
    chord
}

/// A key-down as delivered by the host window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub ctrl: bool,
    /// Cmd on macOS, the Windows key elsewhere
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
    pub focus: FocusTarget,
}

impl KeyEvent {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: false,
            meta: false,
            alt: false,
            shift: false,
            focus: FocusTarget::Canvas,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }

    pub fn focused_on(mut self, focus: FocusTarget) -> Self {
        self.focus = focus;
        self
    }

    pub fn chord_string(&self) -> String {
        canonical_chord(&self.key, self.ctrl || self.meta, self.alt, self.shift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_and_chord_share_canonical_form() {
        let chord = Chord::key("p").ctrl().shift();
        let event = KeyEvent::new("P").with_meta().with_shift();
        assert_eq!(chord.canonical(), "p+ctrl+shift");
        assert_eq!(event.chord_string(), chord.canonical());
    }

    #[test]
    fn modifier_order_is_fixed() {
        let event = KeyEvent::new("x").with_shift().with_alt().with_ctrl();
        assert_eq!(event.chord_string(), "x+ctrl+alt+shift");
    }

    #[test]
    fn display_is_human_readable() {
        assert_eq!(Chord::key("arrowup").shift().to_string(), "Shift+Arrowup");
        assert_eq!(Chord::key("e").to_string(), "E");
    }

    #[test]
    fn text_controls_are_editable() {
        assert!(FocusTarget::TextInput.is_editable());
        assert!(FocusTarget::ContentEditable.is_editable());
        assert!(!FocusTarget::Canvas.is_editable());
        assert!(!FocusTarget::Button.is_editable());
    }
}
