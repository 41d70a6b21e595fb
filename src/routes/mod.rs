mod api;
mod form;
mod pages;

pub use api::*;
pub use form::SubmissionForm;
pub use pages::*;
