#[path = "handlers.rs"]
pub mod handlers;

pub use handlers::{
    ConfigOverrides, ExtractSummary, JsonLinesSink, build_config, enqueue_profiles, extract_pages,
    init_data_dir, load_payload, resolve_data_dir,
};
