//! Request handlers

pub mod conference;
pub mod profile;
pub mod registration;
