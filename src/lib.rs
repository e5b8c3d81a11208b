//! GSLASE messenger: a server-rendered chat site plus a simulated page host
//! that runs its theme-select page script outside the browser.

pub mod config;
pub mod db;
pub mod page;
pub mod rate_limit;
pub mod render;
pub mod routes;
pub mod services;
pub mod state;
