//! Sign-up form state: field bindings, the tech list and focus handling

use super::avatar::select_avatar;
use super::field::FormField;
use super::schema::{RawSignup, RawTech};
use super::validation::FieldPath;

/// Initial knowledge level for a freshly added tech row
pub const DEFAULT_KNOWLEDGE: &str = "1";

/// Number of fixed inputs before the tech rows (avatar, name, email, password)
const FIXED_FIELDS: usize = 4;

/// Trait for common form operations
pub trait Form {
    fn field_count(&self) -> usize;
    fn active_field(&self) -> usize;
    fn set_active_field(&mut self, index: usize);
    fn next_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        self.set_active_field((current + 1) % count);
    }
    fn prev_field(&mut self) {
        let count = self.field_count();
        let current = self.active_field();
        if current == 0 {
            self.set_active_field(count - 1);
        } else {
            self.set_active_field(current - 1);
        }
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField>;
}

/// What currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldPath),
    AddTechButton,
    SubmitButton,
}

/// One repeatable tech sub-form
#[derive(Debug, Clone)]
pub struct TechRow {
    pub title: FormField,
    pub knowledge: FormField,
}

impl TechRow {
    pub fn new(index: usize) -> Self {
        Self {
            title: FormField::text(FieldPath::TechTitle(index), "Technology"),
            knowledge: FormField::number_with_value(
                FieldPath::TechKnowledge(index),
                "Level",
                DEFAULT_KNOWLEDGE,
            ),
        }
    }

    /// Point the row's bindings at a new position in the list
    fn reindex(&mut self, index: usize) {
        self.title.path = FieldPath::TechTitle(index);
        self.knowledge.path = FieldPath::TechKnowledge(index);
    }
}

/// The sign-up form
#[derive(Debug, Clone)]
pub struct SignupForm {
    pub avatar: FormField,
    pub name: FormField,
    pub email: FormField,
    pub password: FormField,
    pub techs: Vec<TechRow>,
    pub active_field_index: usize,
}

impl SignupForm {
    pub fn new() -> Self {
        Self {
            avatar: FormField::text(FieldPath::Avatar, "Avatar (file path)"),
            name: FormField::text(FieldPath::Name, "Name"),
            email: FormField::text(FieldPath::Email, "E-mail"),
            password: FormField::secret(FieldPath::Password, "Password"),
            techs: Vec::new(),
            active_field_index: 0,
        }
    }

    /// Look up the input bound to `path`. Unknown tech indices yield `None`.
    pub fn register_field(&mut self, path: FieldPath) -> Option<&mut FormField> {
        match path {
            FieldPath::Avatar => Some(&mut self.avatar),
            FieldPath::Name => Some(&mut self.name),
            FieldPath::Email => Some(&mut self.email),
            FieldPath::Password => Some(&mut self.password),
            FieldPath::Techs => None,
            FieldPath::TechTitle(i) => self.techs.get_mut(i).map(|row| &mut row.title),
            FieldPath::TechKnowledge(i) => self.techs.get_mut(i).map(|row| &mut row.knowledge),
        }
    }

    /// Append a default tech row and return its index
    pub fn add_tech(&mut self) -> usize {
        let index = self.techs.len();
        self.techs.push(TechRow::new(index));
        index
    }

    /// Remove the tech row at `index`. Out-of-range indices are ignored.
    pub fn remove_tech(&mut self, index: usize) -> bool {
        if index >= self.techs.len() {
            return false;
        }
        self.techs.remove(index);
        for (i, row) in self.techs.iter_mut().enumerate().skip(index) {
            row.reindex(i);
        }
        let max = self.field_count() - 1;
        self.active_field_index = self.active_field_index.min(max);
        true
    }

    /// Focus slot index for a field path, if the path is bound
    pub fn slot_of(&self, path: FieldPath) -> Option<usize> {
        match path {
            FieldPath::Avatar => Some(0),
            FieldPath::Name => Some(1),
            FieldPath::Email => Some(2),
            FieldPath::Password => Some(3),
            FieldPath::Techs => None,
            FieldPath::TechTitle(i) if i < self.techs.len() => Some(FIXED_FIELDS + i * 2),
            FieldPath::TechKnowledge(i) if i < self.techs.len() => Some(FIXED_FIELDS + i * 2 + 1),
            _ => None,
        }
    }

    /// Move focus to the input bound to `path`
    pub fn focus_path(&mut self, path: FieldPath) {
        if let Some(slot) = self.slot_of(path) {
            self.active_field_index = slot;
        }
    }

    fn focus_at(&self, index: usize) -> Focus {
        let tech_slots = self.techs.len() * 2;
        match index {
            0 => Focus::Field(FieldPath::Avatar),
            1 => Focus::Field(FieldPath::Name),
            2 => Focus::Field(FieldPath::Email),
            3 => Focus::Field(FieldPath::Password),
            i if i < FIXED_FIELDS + tech_slots => {
                let offset = i - FIXED_FIELDS;
                if offset % 2 == 0 {
                    Focus::Field(FieldPath::TechTitle(offset / 2))
                } else {
                    Focus::Field(FieldPath::TechKnowledge(offset / 2))
                }
            }
            i if i == FIXED_FIELDS + tech_slots => Focus::AddTechButton,
            _ => Focus::SubmitButton,
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus_at(self.active_field_index)
    }

    /// Index of the tech row holding focus, if any
    pub fn focused_tech(&self) -> Option<usize> {
        match self.focus() {
            Focus::Field(path) => path.tech_index(),
            _ => None,
        }
    }

    /// Snapshot the current input as unvalidated values
    pub fn to_raw(&self) -> RawSignup {
        RawSignup {
            avatar: select_avatar(self.avatar.as_text()),
            name: self.name.as_text().to_string(),
            email: self.email.as_text().to_string(),
            password: self.password.as_text().to_string(),
            techs: self
                .techs
                .iter()
                .map(|row| RawTech::new(row.title.as_text(), row.knowledge.as_text()))
                .collect(),
        }
    }
}

impl Default for SignupForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for SignupForm {
    fn field_count(&self) -> usize {
        // fixed fields, two inputs per tech row, add button, submit button
        FIXED_FIELDS + self.techs.len() * 2 + 2
    }
    fn active_field(&self) -> usize {
        self.active_field_index
    }
    fn set_active_field(&mut self, index: usize) {
        self.active_field_index = index.min(self.field_count() - 1);
    }
    fn get_active_field_mut(&mut self) -> Option<&mut FormField> {
        match self.focus() {
            Focus::Field(path) => self.register_field(path),
            Focus::AddTechButton | Focus::SubmitButton => None,
        }
    }
}
