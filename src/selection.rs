//! Selection Registry: the patient and doctor choices offered when booking.
//!
//! The registry mirrors the stored (identity, name) pairs. It must be
//! refreshed after every patient/doctor add or delete so the appointment
//! form never offers a deleted record. An empty list blocks booking.

use std::fmt;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::db::{DatabaseError, DoctorRepository, PatientRepository};
use crate::error::DeskError;

/// Separator between identity and name in a rendered option.
pub const OPTION_SEPARATOR: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Patient,
    Doctor,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Doctor => "doctor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistryState {
    Empty,
    Populated,
}

/// A selectable record carrying its identity. Displays as `"<id> - <name>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    pub id: i64,
    pub name: String,
}

impl SelectionOption {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Recover the identity from a rendered option: the token before the
    /// first `" - "` (or the whole text when there is none) as an integer.
    pub fn decode(text: &str) -> Result<i64, DeskError> {
        let token = text
            .split_once(OPTION_SEPARATOR)
            .map_or(text, |(head, _)| head);
        token.parse().map_err(|_| DeskError::NumericParse {
            field: "Selection",
            value: text.to_string(),
        })
    }
}

impl fmt::Display for SelectionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{OPTION_SEPARATOR}{}", self.id, self.name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionRegistry {
    patients: Vec<SelectionOption>,
    doctors: Vec<SelectionOption>,
}

impl SelectionRegistry {
    /// Build a registry populated from the store.
    pub fn load(conn: &Connection) -> Result<Self, DatabaseError> {
        let mut registry = Self::default();
        registry.refresh_all(conn)?;
        Ok(registry)
    }

    /// Reload one entity kind. On failure the list is left empty, which
    /// blocks booking until the next successful refresh.
    pub fn refresh(&mut self, conn: &Connection, kind: EntityKind) -> Result<(), DatabaseError> {
        self.list_mut(kind).clear();
        let pairs = match kind {
            EntityKind::Patient => PatientRepository::new(conn).name_index()?,
            EntityKind::Doctor => DoctorRepository::new(conn).name_index()?,
        };
        self.replace(kind, pairs);
        tracing::debug!(
            kind = kind.as_str(),
            options = self.options(kind).len(),
            "Selection registry refreshed"
        );
        Ok(())
    }

    pub fn refresh_all(&mut self, conn: &Connection) -> Result<(), DatabaseError> {
        self.refresh(conn, EntityKind::Patient)?;
        self.refresh(conn, EntityKind::Doctor)
    }

    /// Replace the options for `kind` with the given (identity, name) pairs.
    pub fn replace(&mut self, kind: EntityKind, pairs: Vec<(i64, String)>) {
        *self.list_mut(kind) = pairs
            .into_iter()
            .map(|(id, name)| SelectionOption { id, name })
            .collect();
    }

    pub fn options(&self, kind: EntityKind) -> &[SelectionOption] {
        match kind {
            EntityKind::Patient => &self.patients,
            EntityKind::Doctor => &self.doctors,
        }
    }

    pub fn state(&self, kind: EntityKind) -> RegistryState {
        if self.options(kind).is_empty() {
            RegistryState::Empty
        } else {
            RegistryState::Populated
        }
    }

    pub fn offers(&self, kind: EntityKind, id: i64) -> bool {
        self.find(kind, id).is_some()
    }

    pub fn find(&self, kind: EntityKind, id: i64) -> Option<&SelectionOption> {
        self.options(kind).iter().find(|o| o.id == id)
    }

    /// Turn a rendered option (or bare identity) back into the offered option.
    pub fn resolve(&self, kind: EntityKind, text: &str) -> Result<SelectionOption, DeskError> {
        let id = SelectionOption::decode(text)?;
        self.find(kind, id).cloned().ok_or_else(|| {
            DeskError::validation(format!("No {} with id {id} is available", kind.as_str()))
        })
    }

    /// Booking requires at least one patient and one doctor.
    pub fn ensure_bookable(&self) -> Result<(), DeskError> {
        if self.state(EntityKind::Patient) == RegistryState::Empty
            || self.state(EntityKind::Doctor) == RegistryState::Empty
        {
            return Err(DeskError::Precondition(
                "Please add patients and doctors first.".into(),
            ));
        }
        Ok(())
    }

    fn list_mut(&mut self, kind: EntityKind) -> &mut Vec<SelectionOption> {
        match kind {
            EntityKind::Patient => &mut self.patients,
            EntityKind::Doctor => &mut self.doctors,
        }
    }
}
