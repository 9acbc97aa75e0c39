//! Contact records exchanged between the `TaskDeck` client and the hub.
//!
//! Contacts are stored server-side; the hub assigns ids and creation
//! timestamps. The accent color is cosmetic and chosen client-side.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned row identifier for a contact.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct ContactId(pub i64);

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A contact row as stored by the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Server-assigned identifier, unique across contacts.
    pub id: ContactId,
    /// Display name, e.g. "Jane Doe".
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// UI accent color in `#rrggbb` form. Cosmetic only, never validated.
    pub color: String,
    /// When the row was inserted (set by the hub).
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a new contact. The hub assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewContact {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// UI accent color in `#rrggbb` form.
    pub color: String,
}

/// Partial update for an existing contact.
///
/// Fields left as `None` keep their stored value, mirroring a column-wise
/// `UPDATE ... SET` against the hub.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPatch {
    /// New display name, if changed.
    pub name: Option<String>,
    /// New email address, if changed.
    pub email: Option<String>,
    /// New phone number, if changed.
    pub phone: Option<String>,
    /// New accent color, if changed.
    pub color: Option<String>,
}

impl ContactPatch {
    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.color.is_none()
    }
}
