//! Form domain layer
//!
//! Field bindings, the tech list, validation rule chains and the sign-up
//! schema that turns raw input into a payload.

mod avatar;
mod field;
mod form_state;
mod schema;
mod validation;

pub use field::FormField;
pub use form_state::{Focus, Form, SignupForm, TechRow};
pub use schema::{SignupPayload, SignupSchema, DEFAULT_EMAIL_DOMAIN, DEFAULT_MAX_AVATAR_BYTES};
pub use validation::{FieldPath, ValidationErrors};

#[cfg(test)]
pub use avatar::MIB;
