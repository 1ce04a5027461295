mod app;
mod assets;
mod error;
mod furniture;
mod geometry;
mod model;
mod units;

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).init();
}

fn main() -> eframe::Result<()> {
    init_logging();

    let settings = app::settings::resolve_settings();
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Room Planner")
            .with_inner_size([settings.window_width, settings.window_height]),
        ..Default::default()
    };
    eframe::run_native(
        "Room Planner",
        native_options,
        Box::new(|cc| Ok(Box::new(app::RoomPlannerApp::new(cc, settings)))),
    )
}
