/// Multi-select state for the mentor gallery.
///
/// Selection keeps the order mentors were picked in. The cursor indexes the
/// gallery (registry order) and wraps at both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorPicker {
    selected: Vec<String>,
    cursor: usize,
}

impl MentorPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `mentor_id` if absent, remove it if present.
    pub fn toggle(&mut self, mentor_id: &str) {
        if self.is_selected(mentor_id) {
            self.selected.retain(|id| id != mentor_id);
        } else {
            self.selected.push(mentor_id.to_string());
        }
    }

    pub fn is_selected(&self, mentor_id: &str) -> bool {
        self.selected.iter().any(|id| id == mentor_id)
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: i32, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let len = len as i64;
        let next = (self.cursor as i64 + delta as i64).rem_euclid(len);
        self.cursor = next as usize;
    }

    /// Status line shown under the composer.
    pub fn summary(&self) -> String {
        match self.selected.len() {
            0 => "Select at least one mentor below".to_string(),
            1 => "1 mentor selected".to_string(),
            n => format!("{n} mentors selected"),
        }
    }
}
