//! Start-page widget service.
//!
//! Keeps weather and uptime snapshots fresh in the background and serves
//! them, together with the search settings, as a small JSON API.

pub mod config;
pub mod page;
pub mod server;
pub mod state;

pub use config::{Args, Config};
pub use page::PageModel;
pub use server::create_router;
pub use state::AppState;
