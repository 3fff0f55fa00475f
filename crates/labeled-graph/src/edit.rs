use std::collections::BTreeMap;

use crate::label::KeyValue;
use crate::scene::ShapeId;

/// An open "edit key/value" form for one shape.
///
/// The buffers start as the string form of the shape's pair and are written
/// back verbatim on commit. Dropping the session without committing leaves
/// the shape untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    target: ShapeId,
    serial: u64,
    pub key: String,
    pub value: String,
}

impl EditSession {
    pub fn open(target: ShapeId, label: &KeyValue) -> Self {
        Self {
            target,
            serial: 0,
            key: label.key_text().to_owned(),
            value: label.value_text().to_owned(),
        }
    }

    pub fn target(&self) -> ShapeId {
        self.target
    }

    /// Tells apart sessions opened at different times for the same id,
    /// since ids of removed shapes are handed out again.
    pub fn serial(&self) -> u64 {
        self.serial
    }

    pub fn title(&self) -> &'static str {
        match self.target {
            ShapeId::Node(_) => "Edit Node",
            ShapeId::Edge(_) => "Edit Item",
        }
    }

    pub fn commit(self) -> KeyValue {
        KeyValue {
            key: Some(self.key),
            value: Some(self.value),
        }
    }
}

/// At most one open session per shape.
#[derive(Debug, Clone, Default)]
pub struct EditSessions {
    open: BTreeMap<ShapeId, EditSession>,
    opened: u64,
}

impl EditSessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session unless one is already open for `target`.
    ///
    /// Returns false when the existing session was reused.
    pub fn open(&mut self, target: ShapeId, label: &KeyValue) -> bool {
        if self.open.contains_key(&target) {
            return false;
        }
        self.opened += 1;
        let mut session = EditSession::open(target, label);
        session.serial = self.opened;
        self.open.insert(target, session);
        true
    }

    pub fn is_open(&self, target: ShapeId) -> bool {
        self.open.contains_key(&target)
    }

    pub fn get(&self, target: ShapeId) -> Option<&EditSession> {
        self.open.get(&target)
    }

    pub fn get_mut(&mut self, target: ShapeId) -> Option<&mut EditSession> {
        self.open.get_mut(&target)
    }

    /// Close a session and hand it back, e.g. to commit it.
    pub fn take(&mut self, target: ShapeId) -> Option<EditSession> {
        self.open.remove(&target)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(ShapeId) -> bool) {
        self.open.retain(|target, _| keep(*target));
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditSession> + '_ {
        self.open.values()
    }
}
