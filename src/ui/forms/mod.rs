//! Form rendering module
//!
//! - `field_renderer`: Field rendering utilities
//! - `signup_form`: The sign-up form with its tech list

mod field_renderer;
mod signup_form;

pub use signup_form::draw_signup_form;
