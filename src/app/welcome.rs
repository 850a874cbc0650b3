//! Welcome screen form: battle name and room code

use rand::prelude::*;

use super::session::{generate_room_code_with_rng, ROOM_CODE_LEN};

/// Longest battle name the form accepts
pub const MAX_NAME_LEN: usize = 20;

/// Form field with keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    RoomCode,
}

/// Input state of the welcome screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WelcomeForm {
    pub name: String,
    pub room_code: String,
    pub focus: Field,
}

impl Default for WelcomeForm {
    fn default() -> Self {
        Self::new()
    }
}

impl WelcomeForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            room_code: String::new(),
            focus: Field::Name,
        }
    }

    /// Pre-fill from the command line
    pub fn prefilled(name: Option<&str>, room_code: Option<&str>) -> Self {
        let mut form = Self::new();
        for c in name.unwrap_or_default().chars() {
            form.push_name(c);
        }
        for c in room_code.unwrap_or_default().chars() {
            form.push_code(c);
        }
        form
    }

    /// Type a character into the focused field
    pub fn on_char(&mut self, c: char) {
        match self.focus {
            Field::Name => self.push_name(c),
            Field::RoomCode => self.push_code(c),
        }
    }

    pub fn on_backspace(&mut self) {
        match self.focus {
            Field::Name => self.name.pop(),
            Field::RoomCode => self.room_code.pop(),
        };
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Field::Name => Field::RoomCode,
            Field::RoomCode => Field::Name,
        };
    }

    /// A room can be created once a name is entered
    pub fn can_create(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Joining also needs a code
    pub fn can_join(&self) -> bool {
        self.can_create() && !self.room_code.is_empty()
    }

    /// Room code and name to submit; an empty code becomes a fresh one
    pub fn submission(&self) -> (String, String) {
        self.submission_with_rng(&mut rand::rng())
    }

    /// Submission with a specific RNG (for testing/seeding)
    pub fn submission_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> (String, String) {
        let room = if self.room_code.is_empty() {
            generate_room_code_with_rng(rng)
        } else {
            self.room_code.clone()
        };
        (room, self.name.clone())
    }

    fn push_name(&mut self, c: char) {
        if !c.is_control() && self.name.chars().count() < MAX_NAME_LEN {
            self.name.push(c);
        }
    }

    fn push_code(&mut self, c: char) {
        if c.is_ascii_alphanumeric() && self.room_code.len() < ROOM_CODE_LEN {
            self.room_code.push(c.to_ascii_uppercase());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn type_str(form: &mut WelcomeForm, s: &str) {
        for c in s.chars() {
            form.on_char(c);
        }
    }

    #[test]
    fn test_name_capped_at_twenty() {
        let mut form = WelcomeForm::new();
        type_str(&mut form, "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(form.name, "abcdefghijklmnopqrst");
    }

    #[test]
    fn test_code_is_upper_alnum_and_capped() {
        let mut form = WelcomeForm::new();
        form.toggle_focus();
        type_str(&mut form, "ab-c 12xyz");
        assert_eq!(form.room_code, "ABC12X");
    }

    #[test]
    fn test_backspace_edits_focused_field() {
        let mut form = WelcomeForm::prefilled(Some("Ada"), Some("abc"));
        form.on_backspace();
        assert_eq!(form.name, "Ad");
        form.toggle_focus();
        form.on_backspace();
        assert_eq!(form.room_code, "AB");
    }

    #[test]
    fn test_create_and_join_enablement() {
        let mut form = WelcomeForm::new();
        assert!(!form.can_create());
        type_str(&mut form, "   ");
        assert!(!form.can_create());

        let mut form = WelcomeForm::prefilled(Some("Ada"), None);
        assert!(form.can_create());
        assert!(!form.can_join());
        form.toggle_focus();
        form.on_char('q');
        assert!(form.can_join());
    }

    #[test]
    fn test_empty_code_generates_one() {
        let form = WelcomeForm::prefilled(Some("Ada"), None);
        let (room, name) = form.submission_with_rng(&mut StdRng::seed_from_u64(3));
        assert_eq!(room.len(), ROOM_CODE_LEN);
        assert_eq!(name, "Ada");
    }

    #[test]
    fn test_entered_code_is_kept() {
        let form = WelcomeForm::prefilled(Some("Ada"), Some("zz9"));
        assert_eq!(form.submission().0, "ZZ9");
    }
}
