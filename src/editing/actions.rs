//! Registered actions
//!
//! The closed set of things the user can trigger from the keyboard or a
//! button. Descriptors are built once at startup into an `ActionRegistry`
//! that is shared read-only by the dispatcher and the toolbar.

use crate::core::state::{UiSettings, UiToggle};
use crate::editing::chord::Chord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    TogglePlay,
    CopyPreviousPageToAll,
    CopyPreviousPageToSelected,
    CopyNextPageToAll,
    CopyNextPageToSelected,
    SnapToWholeStep,
    ToggleLockX,
    ToggleLockY,
    TogglePreviousPaths,
    ToggleNextPaths,
    SelectAll,
    ClearSelection,
    NudgeUp,
    NudgeDown,
    NudgeLeft,
    NudgeRight,
    ZoomIn,
    ZoomOut,
    ResetZoom,
}

impl ActionId {
    pub const ALL: [ActionId; 23] = [
        ActionId::NextPage,
        ActionId::PreviousPage,
        ActionId::FirstPage,
        ActionId::LastPage,
        ActionId::TogglePlay,
        ActionId::CopyPreviousPageToAll,
        ActionId::CopyPreviousPageToSelected,
        ActionId::CopyNextPageToAll,
        ActionId::CopyNextPageToSelected,
        ActionId::SnapToWholeStep,
        ActionId::ToggleLockX,
        ActionId::ToggleLockY,
        ActionId::TogglePreviousPaths,
        ActionId::ToggleNextPaths,
        ActionId::SelectAll,
        ActionId::ClearSelection,
        ActionId::NudgeUp,
        ActionId::NudgeDown,
        ActionId::NudgeLeft,
        ActionId::NudgeRight,
        ActionId::ZoomIn,
        ActionId::ZoomOut,
        ActionId::ResetZoom,
    ];

    /// Stable name used by UI bindings and logs
    pub fn name(self) -> &'static str {
        match self {
            ActionId::NextPage => "next_page",
            ActionId::PreviousPage => "previous_page",
            ActionId::FirstPage => "first_page",
            ActionId::LastPage => "last_page",
            ActionId::TogglePlay => "toggle_play",
            ActionId::CopyPreviousPageToAll => "copy_previous_page_to_all",
            ActionId::CopyPreviousPageToSelected => "copy_previous_page_to_selected",
            ActionId::CopyNextPageToAll => "copy_next_page_to_all",
            ActionId::CopyNextPageToSelected => "copy_next_page_to_selected",
            ActionId::SnapToWholeStep => "snap_to_whole_step",
            ActionId::ToggleLockX => "toggle_lock_x",
            ActionId::ToggleLockY => "toggle_lock_y",
            ActionId::TogglePreviousPaths => "toggle_previous_paths",
            ActionId::ToggleNextPaths => "toggle_next_paths",
            ActionId::SelectAll => "select_all",
            ActionId::ClearSelection => "clear_selection",
            ActionId::NudgeUp => "nudge_up",
            ActionId::NudgeDown => "nudge_down",
            ActionId::NudgeLeft => "nudge_left",
            ActionId::NudgeRight => "nudge_right",
            ActionId::ZoomIn => "zoom_in",
            ActionId::ZoomOut => "zoom_out",
            ActionId::ResetZoom => "reset_zoom",
        }
    }

    pub fn from_name(name: &str) -> Option<ActionId> {
        ActionId::ALL.into_iter().find(|id| id.name() == name)
    }
}

/// Static description of one action
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDescriptor {
    pub id: ActionId,
    pub label: &'static str,
    /// Label shown while the toggle this action flips is on
    pub label_when_on: Option<&'static str>,
    pub chord: Option<Chord>,
    /// The UI setting this action flips, if it is a toggle
    pub toggle: Option<UiToggle>,
}

impl ActionDescriptor {
    const fn new(id: ActionId, label: &'static str, chord: Option<Chord>) -> Self {
        Self {
            id,
            label,
            label_when_on: None,
            chord,
            toggle: None,
        }
    }

    const fn toggles(self, toggle: UiToggle, label_when_on: &'static str) -> Self {
        Self {
            toggle: Some(toggle),
            label_when_on: Some(label_when_on),
            ..self
        }
    }

    /// The label matching the current state of the action's toggle
    pub fn label_for(&self, ui: &UiSettings) -> &'static str {
        match (self.toggle, self.label_when_on) {
            (Some(toggle), Some(on)) if ui.get(toggle) => on,
            _ => self.label,
        }
    }

    /// Label with the chord appended, for tooltips and buttons
    pub fn label_with_chord(&self, ui: &UiSettings) -> String {
        match &self.chord {
            Some(chord) => format!("{} [{}]", self.label_for(ui), chord),
            None => self.label_for(ui).to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    descriptors: Vec<ActionDescriptor>,
}

impl ActionRegistry {
    pub fn from_descriptors(descriptors: Vec<ActionDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Every action with its default chord
    pub fn standard() -> Self {
        use ActionId::*;
        let descriptors = vec![
            ActionDescriptor::new(NextPage, "Next page", Some(Chord::key("e"))),
            ActionDescriptor::new(PreviousPage, "Previous page", Some(Chord::key("q"))),
            ActionDescriptor::new(FirstPage, "First page", Some(Chord::key("q").shift())),
            ActionDescriptor::new(LastPage, "Last page", Some(Chord::key("e").shift())),
            ActionDescriptor::new(TogglePlay, "Play", Some(Chord::key("space")))
                .toggles(UiToggle::Playing, "Pause"),
            ActionDescriptor::new(
                CopyPreviousPageToAll,
                "Set all marchers to previous page",
                Some(Chord::key("p").ctrl().shift()),
            ),
            ActionDescriptor::new(
                CopyPreviousPageToSelected,
                "Set selected marcher to previous page",
                Some(Chord::key("p").shift()),
            ),
            ActionDescriptor::new(
                CopyNextPageToAll,
                "Set all marchers to next page",
                Some(Chord::key("n").ctrl().shift()),
            ),
            ActionDescriptor::new(
                CopyNextPageToSelected,
                "Set selected marcher to next page",
                Some(Chord::key("n").shift()),
            ),
            ActionDescriptor::new(SnapToWholeStep, "Snap to nearest step", Some(Chord::key("1"))),
            ActionDescriptor::new(ToggleLockX, "Lock X", Some(Chord::key("x")))
                .toggles(UiToggle::LockX, "Unlock X"),
            ActionDescriptor::new(ToggleLockY, "Lock Y", Some(Chord::key("y")))
                .toggles(UiToggle::LockY, "Unlock Y"),
            ActionDescriptor::new(TogglePreviousPaths, "Show previous paths", Some(Chord::key("n")))
                .toggles(UiToggle::PreviousPaths, "Hide previous paths"),
            ActionDescriptor::new(ToggleNextPaths, "Show next paths", Some(Chord::key("m")))
                .toggles(UiToggle::NextPaths, "Hide next paths"),
            ActionDescriptor::new(SelectAll, "Select all", Some(Chord::key("a").ctrl())),
            ActionDescriptor::new(ClearSelection, "Clear selection", Some(Chord::key("escape"))),
            ActionDescriptor::new(NudgeUp, "Move up one step", Some(Chord::key("arrowup"))),
            ActionDescriptor::new(NudgeDown, "Move down one step", Some(Chord::key("arrowdown"))),
            ActionDescriptor::new(NudgeLeft, "Move left one step", Some(Chord::key("arrowleft"))),
            ActionDescriptor::new(NudgeRight, "Move right one step", Some(Chord::key("arrowright"))),
            ActionDescriptor::new(ZoomIn, "Zoom in", Some(Chord::key("=").ctrl())),
            ActionDescriptor::new(ZoomOut, "Zoom out", Some(Chord::key("-").ctrl())),
            ActionDescriptor::new(ResetZoom, "Fit field", Some(Chord::key("0").ctrl())),
        ];
        Self { descriptors }
    }

    pub fn get(&self, id: ActionId) -> Option<&ActionDescriptor> {
        self.descriptors.iter().find(|descriptor| descriptor.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_covers_every_action() {
        let registry = ActionRegistry::standard();
        assert_eq!(registry.len(), ActionId::ALL.len());
        for id in ActionId::ALL {
            assert!(registry.get(id).is_some(), "{} is not registered", id.name());
        }
    }

    #[test]
    fn names_round_trip() {
        for id in ActionId::ALL {
            assert_eq!(ActionId::from_name(id.name()), Some(id));
        }
        assert_eq!(ActionId::from_name("launch_fireworks"), None);
    }

    #[test]
    fn toggle_labels_follow_settings() {
        let registry = ActionRegistry::standard();
        let lock_x = registry.get(ActionId::ToggleLockX).unwrap();
        let mut ui = UiSettings::default();

        assert_eq!(lock_x.label_for(&ui), "Lock X");
        ui.lock_x = true;
        assert_eq!(lock_x.label_for(&ui), "Unlock X");
        assert_eq!(lock_x.label_with_chord(&ui), "Unlock X [X]");
    }
}
