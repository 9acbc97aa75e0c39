//! Contact book view: list selection, detail panel, and the add/edit
//! dialog state machine.

use std::time::{Duration, Instant};

use taskdeck_proto::contact::{Contact, ContactId, ContactPatch, NewContact};

use super::Pending;

/// Accent colors assigned to new contacts, in `#rrggbb` form.
pub const ACCENT_PALETTE: [&str; 15] = [
    "#FF7A00", "#9327FF", "#6E52FF", "#FC71FF", "#FFBB2B", "#1FD7C1", "#462F8A", "#FF4646",
    "#00BEE8", "#FF5EB3", "#FFA35E", "#FFC701", "#0038FF", "#C3FF2B", "#FFE62B",
];

/// Pick an accent color for a contact based on their name.
#[must_use]
pub fn accent_color(name: &str) -> &'static str {
    let hash = name.bytes().fold(0u32, |acc, b| {
        acc.wrapping_mul(31).wrapping_add(u32::from(b))
    });
    ACCENT_PALETTE[(hash as usize) % ACCENT_PALETTE.len()]
}

/// Which field of the contact form currently has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    /// Display name field.
    Name,
    /// Email address field.
    Email,
    /// Phone number field.
    Phone,
}

/// Validation failures for the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ContactFormError {
    /// The name needs at least a first and a last part.
    #[error("please enter a first and last name")]
    NameIncomplete,
    /// The email address does not look like one.
    #[error("please enter a valid email address")]
    EmailInvalid,
    /// The phone number contains letters or too few digits.
    #[error("please enter a valid phone number")]
    PhoneInvalid,
}

/// Returns `true` when the name has at least two parts.
#[must_use]
pub fn valid_name(name: &str) -> bool {
    name.split_whitespace().count() >= 2
}

/// Returns `true` for `local@domain.tld`-shaped addresses.
#[must_use]
pub fn valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    // The domain needs an interior dot.
    domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Returns `true` for numbers made of digits and common separators,
/// with at least three digits overall.
#[must_use]
pub fn valid_phone(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    digits >= 3
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '/'))
}

/// Editable contact form used by both the add and the edit dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Display name input.
    pub name: String,
    /// Email address input.
    pub email: String,
    /// Phone number input.
    pub phone: String,
    /// Field with input focus.
    pub focus: FormField,
}

impl Default for FormField {
    fn default() -> Self {
        Self::Name
    }
}

impl ContactForm {
    /// A form prefilled from an existing contact, for editing.
    #[must_use]
    pub fn prefilled(contact: &Contact) -> Self {
        Self {
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            focus: FormField::Name,
        }
    }

    /// Move focus to the next field, wrapping around.
    pub const fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Phone,
            FormField::Phone => FormField::Name,
        };
    }

    /// Mutable access to the focused field's text.
    pub const fn focused_text(&mut self) -> &mut String {
        match self.focus {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
        }
    }

    /// Validate all fields, collecting every failure.
    ///
    /// # Errors
    ///
    /// Returns the list of failed checks, in field order.
    pub fn validate(&self) -> Result<(), Vec<ContactFormError>> {
        let mut errors = Vec::new();
        if !valid_name(&self.name) {
            errors.push(ContactFormError::NameIncomplete);
        }
        if !valid_email(&self.email) {
            errors.push(ContactFormError::EmailInvalid);
        }
        if !valid_phone(&self.phone) {
            errors.push(ContactFormError::PhoneInvalid);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Build an insert payload, assigning an accent color by name.
    ///
    /// # Errors
    ///
    /// Returns the validation failures if any field is invalid.
    pub fn to_new_contact(&self) -> Result<NewContact, Vec<ContactFormError>> {
        self.validate()?;
        Ok(NewContact {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            color: accent_color(self.name.trim()).to_string(),
        })
    }

    /// Build a full-field update patch. The stored accent color is kept.
    ///
    /// # Errors
    ///
    /// Returns the validation failures if any field is invalid.
    pub fn to_patch(&self) -> Result<ContactPatch, Vec<ContactFormError>> {
        self.validate()?;
        Ok(ContactPatch {
            name: Some(self.name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            phone: Some(self.phone.trim().to_string()),
            color: None,
        })
    }
}

/// Dialog state of the contacts screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactDialog {
    /// No dialog open; the list has focus.
    Closed,
    /// Add-contact dialog with an empty form.
    Adding(ContactForm),
    /// Edit dialog for an existing contact.
    Editing {
        /// The contact being edited.
        id: ContactId,
        /// The prefilled form.
        form: ContactForm,
    },
    /// Read-only detail panel for a contact.
    Viewing(ContactId),
}

/// State of the contacts screen.
///
/// Dialog exits are not applied immediately: they are scheduled with a
/// short delay (mirroring the slide-out animation) and applied on the
/// next tick. Scheduling while a transition is pending replaces it, so
/// rapid triggers never queue up.
#[derive(Debug)]
pub struct ContactsView {
    /// Index of the selected contact in the name-ordered list.
    pub selected: usize,
    /// Current dialog state.
    pub dialog: ContactDialog,
    pending: Option<Pending<ContactDialog>>,
}

/// Delay between a dialog exit trigger and the state actually changing.
pub const EXIT_DELAY: Duration = Duration::from_millis(220);

impl Default for ContactsView {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactsView {
    /// A fresh contacts view with no dialog open.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selected: 0,
            dialog: ContactDialog::Closed,
            pending: None,
        }
    }

    /// Open the add dialog immediately, cancelling any pending exit.
    pub fn open_add(&mut self) {
        self.pending = None;
        self.dialog = ContactDialog::Adding(ContactForm::default());
    }

    /// Open the edit dialog for a contact, prefilled.
    pub fn open_edit(&mut self, contact: &Contact) {
        self.pending = None;
        self.dialog = ContactDialog::Editing {
            id: contact.id,
            form: ContactForm::prefilled(contact),
        };
    }

    /// Open the detail panel for a contact.
    pub fn open_view(&mut self, id: ContactId) {
        self.pending = None;
        self.dialog = ContactDialog::Viewing(id);
    }

    /// Schedule a transition to another dialog state after `delay`.
    ///
    /// A previously scheduled transition is replaced; the latest request
    /// wins.
    pub fn schedule(&mut self, next: ContactDialog, now: Instant, delay: Duration) {
        self.pending = Some(Pending::new(next, now + delay));
    }

    /// Schedule the current dialog to close after `delay`.
    pub fn schedule_close(&mut self, now: Instant, delay: Duration) {
        self.schedule(ContactDialog::Closed, now, delay);
    }

    /// Whether a transition is currently pending.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Apply the pending transition if it is due.
    pub fn tick(&mut self, now: Instant) {
        if let Some(pending) = &self.pending
            && pending.is_due(now)
        {
            let pending = self.pending.take();
            if let Some(p) = pending {
                self.dialog = p.next;
            }
        }
    }

    /// Move the selection up.
    pub const fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    /// Move the selection down, bounded by the list length.
    pub fn select_next(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    /// Keep the selection valid after the list changed.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
