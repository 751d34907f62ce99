use crate::api::Session;

#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    pub sessions: Vec<Session>,
    pub highlighted: usize,
    pub selected: Option<String>,
    pub loading: bool,
}

impl Sidebar {
    pub fn set_sessions(&mut self, sessions: Vec<Session>) {
        self.sessions = sessions;
        self.loading = false;
        if let Some(index) = self
            .selected
            .as_deref()
            .and_then(|id| self.sessions.iter().position(|session| session.id == id))
        {
            self.highlighted = index;
        } else if self.highlighted >= self.sessions.len() {
            self.highlighted = self.sessions.len().saturating_sub(1);
        }
    }

    pub fn move_up(&mut self) {
        self.highlighted = self.highlighted.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.highlighted + 1 < self.sessions.len() {
            self.highlighted += 1;
        }
    }

    pub fn highlighted_session(&self) -> Option<&Session> {
        self.sessions.get(self.highlighted)
    }

    pub fn selected_title(&self) -> Option<&str> {
        let id = self.selected.as_deref()?;
        self.sessions
            .iter()
            .find(|session| session.id == id)
            .map(|session| session.title.as_str())
    }
}
