//! Field validation for the login and edit forms.
//!
//! Validation is a pure function from field values to per-field messages. A
//! form may be submitted only when its error set is empty.

pub mod validate;

pub use validate::{is_well_formed_email, validate_login, validate_user_form, LoginErrors, UserFormErrors};
