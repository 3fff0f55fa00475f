use eframe::egui;
use log::info;

use crate::create_app;
use crate::settings::EditorSettings;

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    let settings = EditorSettings::from_env();
    info!(
        "starting graph editor (node diameter {}, {:?} edge policy)",
        settings.node_diameter, settings.edge_policy
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Graph Editor")
            .with_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Graph Editor",
        native_options,
        Box::new(|cc| Ok(Box::new(create_app(cc, settings)))),
    )
}
