mod args;
mod provider;
pub mod repl;

pub use args::{Cli, Commands, ConfigSubcommands};
pub use provider::{client_config_for_cli, create_backend};
