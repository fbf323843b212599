pub mod app;
pub mod carousel;
pub mod cli;
pub mod config;
pub mod contact;
pub mod deeplink;
pub mod filter;
pub mod model;
pub mod output;
pub mod page;
pub mod recent;
pub mod render;
pub mod runner;
pub mod store;
pub mod suggest;

#[cfg(test)]
mod tests;
