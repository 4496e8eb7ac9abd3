//! Server-rendered admin dashboard.
//!
//! Every page follows the same cycle: read the collections it needs from the
//! store, render HTML, and on a form post mutate the store then redirect so
//! the next GET re-reads fresh data.

pub mod error;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server, DashboardServer};
pub use types::WebContext;
