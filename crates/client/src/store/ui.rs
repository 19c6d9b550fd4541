//! Which form or modal is visible, and what is selected.

use uuid::Uuid;

/// A form or modal. At most one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    StudentForm,
    NoteForm,
    SongForm,
    TeachingForm,
    Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiStore {
    open: Option<Panel>,
    selected_student: Option<Uuid>,
    selected_song: Option<Uuid>,
}

impl UiStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens `panel`, closing whichever was open.
    pub fn open(&mut self, panel: Panel) {
        if let Some(previous) = self.open.replace(panel) {
            if previous != panel {
                tracing::debug!(?previous, ?panel, "Switching panel");
            }
        }
    }

    /// Closes `panel` if it is the open one.
    pub fn close(&mut self, panel: Panel) {
        if self.open == Some(panel) {
            self.open = None;
        }
    }

    pub fn close_all(&mut self) {
        self.open = None;
    }

    pub fn is_open(&self, panel: Panel) -> bool {
        self.open == Some(panel)
    }

    pub fn open_panel(&self) -> Option<Panel> {
        self.open
    }

    pub fn select_student(&mut self, id: Uuid) {
        self.selected_student = Some(id);
    }

    pub fn select_song(&mut self, id: Uuid) {
        self.selected_song = Some(id);
    }

    pub fn selected_student(&self) -> Option<Uuid> {
        self.selected_student
    }

    pub fn selected_song(&self) -> Option<Uuid> {
        self.selected_song
    }

    pub fn clear_selection(&mut self) {
        self.selected_student = None;
        self.selected_song = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_a_panel_closes_the_others() {
        let mut ui = UiStore::new();
        ui.open(Panel::StudentForm);
        ui.open(Panel::Settings);

        assert!(ui.is_open(Panel::Settings));
        assert!(!ui.is_open(Panel::StudentForm));
    }

    #[test]
    fn test_close_only_affects_the_named_panel() {
        let mut ui = UiStore::new();
        ui.open(Panel::SongForm);

        ui.close(Panel::NoteForm);
        assert_eq!(ui.open_panel(), Some(Panel::SongForm));

        ui.close(Panel::SongForm);
        assert_eq!(ui.open_panel(), None);
    }

    #[test]
    fn test_selection() {
        let mut ui = UiStore::new();
        let student = Uuid::new_v4();
        let song = Uuid::new_v4();

        ui.select_student(student);
        ui.select_song(song);
        ui.open(Panel::TeachingForm);
        assert_eq!(ui.selected_student(), Some(student));
        assert_eq!(ui.selected_song(), Some(song));

        ui.clear_selection();
        assert_eq!(ui.selected_student(), None);
        assert!(ui.is_open(Panel::TeachingForm));
    }
}
