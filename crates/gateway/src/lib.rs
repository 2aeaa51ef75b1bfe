pub mod api;
pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod runtime;
pub mod state;
