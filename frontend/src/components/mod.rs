pub mod handlers;
pub mod header;
pub mod history_panel;
pub mod live_feed;
pub mod overlays;
pub mod results;
pub mod settings_panel;
pub mod stats_panel;
pub mod upload_section;
pub mod utils;
