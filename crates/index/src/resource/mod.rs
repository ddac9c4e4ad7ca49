pub mod config_keys;
pub mod factory;
pub mod kinds;
pub mod post_process;
pub mod triggers;
