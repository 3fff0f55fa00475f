use eframe::egui;
use labeled_graph::{EdgePolicy, Editor};

use crate::actions::Action;
use crate::canvas::Canvas;
use crate::dialogs;
use crate::settings::{CanvasVisuals, EditorSettings, NODE_DIAMETER_RANGE};
use crate::state::State;

pub struct GraphEditorApp {
    state: State,
    canvas: Canvas,
    visuals: CanvasVisuals,
}

impl GraphEditorApp {
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            state: State::new(Editor::new(settings.editor_options())),
            canvas: Canvas::new(),
            visuals: settings.visuals,
        }
    }

    fn show_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Create Node").clicked() {
                    let at = self.canvas.spawn_point();
                    self.state.dispatch(Action::CreateNode { at });
                }

                let two_selected =
                    self.state.editor.scene().selected_nodes().len() == 2;
                if ui
                    .add_enabled(two_selected, egui::Button::new("Create Edge"))
                    .on_disabled_hover_text("Select exactly two nodes")
                    .clicked()
                {
                    self.state.dispatch(Action::CreateEdge);
                }

                ui.separator();

                let options = *self.state.editor.options();
                let mut diameter = options.node_diameter;
                if ui
                    .add(
                        egui::Slider::new(
                            &mut diameter,
                            NODE_DIAMETER_RANGE.min..=NODE_DIAMETER_RANGE.max,
                        )
                        .step_by(NODE_DIAMETER_RANGE.step as f64)
                        .text("Diameter"),
                    )
                    .changed()
                {
                    self.state.dispatch(Action::SetNodeDiameter { diameter });
                }

                ui.separator();

                let mut policy = options.edge_policy;
                ui.label("Edges:");
                ui.selectable_value(&mut policy, EdgePolicy::Explicit, "Explicit");
                ui.selectable_value(&mut policy, EdgePolicy::Streaming, "Streaming");
                if policy != options.edge_policy {
                    self.state.dispatch(Action::SetEdgePolicy { policy });
                }
            });
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        let scene = self.state.editor.scene();
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Nodes: {}", scene.node_count()));
                ui.separator();
                ui.label(format!("Edges: {}", scene.edge_count()));
                ui.separator();
                ui.label(format!("Selected: {}", scene.selection().len()));
            });
        });
    }
}

impl eframe::App for GraphEditorApp {
    fn update(
        &mut self,
        ctx: &egui::Context,
        _frame: &mut eframe::Frame,
    ) {
        self.show_toolbar(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::canvas(&ctx.style()))
            .show(ctx, |ui| {
                let actions =
                    self.canvas.show(ui, &self.state.editor, &self.visuals);
                self.state.dispatch_all(actions);
            });

        let actions = dialogs::show_edit_dialogs(ctx, &self.state.editor);
        self.state.dispatch_all(actions);

        // Delete removes the selection unless a text field is being edited
        if !ctx.wants_keyboard_input()
            && ctx.input(|i| i.key_pressed(egui::Key::Delete))
        {
            self.state.dispatch(Action::DeleteSelection);
        }

        self.state.flush_actions();
    }
}
