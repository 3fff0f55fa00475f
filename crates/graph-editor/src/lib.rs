pub mod actions;
pub mod app;
pub mod canvas;
pub mod dialogs;
pub mod native;
pub mod settings;
pub mod state;

pub use app::GraphEditorApp;
pub use settings::EditorSettings;

/// Build the application for a freshly created eframe context.
pub fn create_app(
    _cc: &eframe::CreationContext<'_>,
    settings: EditorSettings,
) -> GraphEditorApp {
    GraphEditorApp::new(settings)
}
