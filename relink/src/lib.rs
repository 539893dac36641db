pub mod commands;
pub mod handlers;

pub use handlers::{load_urls_from_file, parse_url_line, resolver_config_from_args};
