pub mod app;
pub mod completion;
pub mod config;
pub mod fan_out;
pub mod mentors;
pub mod message;
pub mod session;
pub mod store;
