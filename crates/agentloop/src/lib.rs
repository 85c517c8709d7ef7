pub mod agent;
pub mod client;
pub mod conversation;
pub mod errors;
pub mod models;
pub mod permission;
pub mod prompt_template;
pub mod providers;
pub mod tools;
