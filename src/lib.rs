pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod session;
pub mod types;
pub mod view;


pub use app::{app, AppState};
