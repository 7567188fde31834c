//! ProjMap Author
//!
//! Entry point for the projection mapping authoring tool.

use std::path::Path;

use projmap_author::app::AuthorApp;
use projmap_author::config::AppConfig;
use winit::event_loop::EventLoop;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("ProjMap Author starting...");

    let config = AppConfig::load(Path::new("projmap-author.json")).unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    // Create event loop and run application
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = AuthorApp::new(config);

    if let Err(e) = event_loop.run_app(&mut app) {
        log::error!("Event loop error: {}", e);
    }

    log::info!("ProjMap Author exiting");
}
