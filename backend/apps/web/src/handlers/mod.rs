//! App-level route handlers (landing page, contact, upload)

pub mod contact;
pub mod home;
pub mod upload;
