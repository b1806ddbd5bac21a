pub mod api;
pub mod core;
pub mod remote;
pub mod state;
pub mod web;
