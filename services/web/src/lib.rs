//! Server-rendered frontend for the Alabuga Mission Control platform
//!
//! Pilots complete missions to earn XP and mana, unlock ranks and collect
//! artifacts; HR staff moderate submissions from the admin panel. All
//! business rules live in the REST backend; this service composes pages,
//! handles forms and uploads, and manages the two signed session cookies.

pub mod config;
pub mod demo;
pub mod error;
pub mod gate;
pub mod models;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;
pub mod views;

pub use config::WebConfig;
pub use routes::create_router;
pub use state::AppState;
