//! Launch State: onboarding records, journey resumption and the launch
//! screen decision for a mobile app, served over a small REST API.

pub mod app;
pub mod config;
pub mod error;
pub mod navigation;
pub mod onboarding;
pub mod store;
