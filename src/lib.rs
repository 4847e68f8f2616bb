//! Interactive tournament explorer: composable filters over team-seasons and
//! a packed bubble layout of whatever survives them.

pub mod color;
pub mod config;
pub mod data;
pub mod layout;
pub mod select;
pub mod state;
