pub mod api;
pub mod canvas;
pub mod chat;
pub mod config;
pub mod geo;
pub mod map;
pub mod structs;
#[cfg(test)]
mod tests;

use std::error::Error;

/// Result alias shared by every widget flow.
pub type WidgetResult<T> = Result<T, Box<dyn Error + Send + Sync>>;
