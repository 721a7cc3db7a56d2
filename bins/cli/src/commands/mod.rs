//! Command implementations.

mod config;
mod render;

pub use config::{Sources, config_check_with_env, config_schema_output, config_show_with_env};
pub use render::{RenderTarget, render_with_env};
