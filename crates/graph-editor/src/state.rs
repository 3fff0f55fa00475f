use crate::actions::{self, Action};
use labeled_graph::Editor;

pub struct State {
    pub editor: Editor,
    action_queue: Vec<Action>,
}

impl State {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            action_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.action_queue.extend(actions);
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            actions::update(&mut self.editor, action);
        }
    }
}
