use eframe::egui;
use labeled_graph::{EditSession, Editor};

use crate::actions::Action;

/// Show one window per open edit session and collect what the user did.
///
/// Closing a window through its title-bar button cancels the edit.
pub fn show_edit_dialogs(
    ctx: &egui::Context,
    editor: &Editor,
) -> Vec<Action> {
    let mut actions = Vec::new();
    for session in editor.sessions().iter() {
        actions.extend(show_edit_dialog(ctx, session));
    }
    actions
}

fn show_edit_dialog(
    ctx: &egui::Context,
    session: &EditSession,
) -> Vec<Action> {
    let shape = session.target();
    let mut open = true;
    let mut save = false;
    let mut key = session.key.clone();
    let mut value = session.value.clone();

    egui::Window::new(session.title())
        .id(egui::Id::new(("edit_dialog", shape, session.serial())))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Key:");
            ui.text_edit_singleline(&mut key);
            ui.label("Value:");
            let value_response = ui.text_edit_singleline(&mut value);

            let enter = value_response.lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Save").clicked() || enter {
                save = true;
            }
        });

    let mut actions = Vec::new();
    if key != session.key || value != session.value {
        actions.push(Action::UpdateEditBuffer { shape, key, value });
    }
    if save {
        actions.push(Action::SaveEdit { shape });
    } else if !open {
        actions.push(Action::CancelEdit { shape });
    }
    actions
}
