use eframe::egui::{
    self, Align2, Color32, FontId, Modifiers, Painter, Pos2, Sense,
    Stroke, StrokeKind,
};
use labeled_graph::{
    Caption, Editor, Point, Rect, SelectMode, ShapeId,
};

use crate::actions::Action;
use crate::settings::CanvasVisuals;

const NODE_FILL: Color32 = Color32::from_rgb(90, 140, 200);
const NODE_FILL_SELECTED: Color32 = Color32::from_rgb(240, 170, 60);
const EDGE_COLOR: Color32 = Color32::from_gray(170);
const EDGE_COLOR_SELECTED: Color32 = Color32::from_rgb(240, 170, 60);
const PENDING_RING_COLOR: Color32 = Color32::from_rgb(100, 100, 255);
const RUBBER_BAND_FILL: Color32 =
    Color32::from_rgba_premultiplied(60, 90, 160, 40);
const RUBBER_BAND_STROKE: Color32 = Color32::from_rgb(100, 140, 220);

/// Where "Create Node" puts a node before the pointer ever visited the
/// canvas and the canvas was never laid out.
const FALLBACK_SPAWN: Point = Point::new(100.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Pointer went down on a shape: dragging moves the selection.
    MovingSelection,
    /// Pointer went down on empty canvas: dragging draws a rubber band.
    BoxSelect {
        start: Point,
        current: Point,
        mode: SelectMode,
    },
}

/// Modifier keys to selection behaviour: Ctrl/Cmd toggles, Shift adds.
pub fn select_mode(modifiers: Modifiers) -> SelectMode {
    if modifiers.command {
        SelectMode::Toggle
    } else if modifiers.shift {
        SelectMode::Add
    } else {
        SelectMode::Replace
    }
}

pub fn to_canvas(origin: Pos2, pos: Pos2) -> Point {
    Point::new(pos.x - origin.x, pos.y - origin.y)
}

pub fn to_screen(origin: Pos2, p: Point) -> Pos2 {
    egui::pos2(p.x + origin.x, p.y + origin.y)
}

/// Drawing surface for the scene. Turns pointer input into actions.
pub struct Canvas {
    gesture: Gesture,
    last_pointer: Option<Point>,
    last_size: Option<egui::Vec2>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            last_pointer: None,
            last_size: None,
        }
    }

    /// Canvas position for a newly created node: the last pointer position
    /// over the canvas, else its centre.
    pub fn spawn_point(&self) -> Point {
        self.last_pointer
            .or_else(|| {
                self.last_size
                    .map(|size| Point::new(size.x / 2.0, size.y / 2.0))
            })
            .unwrap_or(FALLBACK_SPAWN)
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        editor: &Editor,
        visuals: &CanvasVisuals,
    ) -> Vec<Action> {
        let (response, painter) = ui.allocate_painter(
            ui.available_size(),
            Sense::click_and_drag(),
        );
        let origin = response.rect.min;
        self.last_size = Some(response.rect.size());

        if let Some(hover) = response.hover_pos() {
            self.last_pointer = Some(to_canvas(origin, hover));
        }

        let actions = self.handle_pointer(ui, &response, editor, origin);
        self.paint(&painter, editor, visuals, origin);
        actions
    }

    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        editor: &Editor,
        origin: Pos2,
    ) -> Vec<Action> {
        let scene = editor.scene();
        let mut actions = Vec::new();
        let (pressed, released, modifiers, pointer) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.modifiers,
                i.pointer.interact_pos(),
            )
        });
        let mode = select_mode(modifiers);
        let pointer = pointer.map(|p| to_canvas(origin, p));

        // Press: pick a shape or start a rubber band
        if pressed
            && response.hovered()
            && let Some(p) = pointer
        {
            match scene.hit_test(p) {
                Some(shape) => {
                    // Pressing an already selected shape keeps the group so
                    // it can be dragged together
                    if mode != SelectMode::Replace || !scene.is_selected(shape)
                    {
                        actions.push(Action::Select { shape, mode });
                    }
                    self.gesture = Gesture::MovingSelection;
                }
                None => {
                    if mode == SelectMode::Replace {
                        actions.push(Action::ClearSelection);
                    }
                    self.gesture = Gesture::BoxSelect {
                        start: p,
                        current: p,
                        mode,
                    };
                }
            }
        }

        if response.dragged() {
            match &mut self.gesture {
                Gesture::MovingSelection => {
                    let delta = response.drag_delta();
                    if delta != egui::Vec2::ZERO {
                        actions.push(Action::DragSelection {
                            dx: delta.x,
                            dy: delta.y,
                        });
                    }
                }
                Gesture::BoxSelect { current, .. } => {
                    if let Some(p) = pointer {
                        *current = p;
                    }
                }
                Gesture::Idle => {}
            }
        }

        // A plain click on one member of a group narrows the selection
        if response.clicked()
            && mode == SelectMode::Replace
            && let Some(p) = pointer
            && let Some(shape) = scene.hit_test(p)
        {
            actions.push(Action::Select { shape, mode });
        }

        if response.double_clicked()
            && let Some(p) = pointer
            && let Some(shape) = scene.hit_test(p)
        {
            actions.push(Action::OpenEditor { shape });
        }

        if released || response.drag_stopped() {
            if let Gesture::BoxSelect {
                start,
                current,
                mode,
            } = self.gesture
                && start != current
            {
                // Replace already cleared the selection on press
                let mode = match mode {
                    SelectMode::Replace => SelectMode::Add,
                    other => other,
                };
                actions.push(Action::SelectInRect {
                    rect: Rect::from_corners(start, current),
                    mode,
                });
            }
            self.gesture = Gesture::Idle;
        }

        actions
    }

    fn paint(
        &self,
        painter: &Painter,
        editor: &Editor,
        visuals: &CanvasVisuals,
        origin: Pos2,
    ) {
        let scene = editor.scene();
        let text_color = painter.ctx().style().visuals.text_color();
        let font = FontId::proportional(visuals.label_font_size);

        for (id, edge) in scene.edges() {
            let Some(line) = edge.line() else {
                continue;
            };
            let color = if scene.is_selected(ShapeId::Edge(id)) {
                EDGE_COLOR_SELECTED
            } else {
                EDGE_COLOR
            };
            painter.line_segment(
                [to_screen(origin, line.start), to_screen(origin, line.end)],
                Stroke::new(visuals.edge_width, color),
            );
            paint_caption(painter, &edge.captions().key, origin, &font, text_color);
            paint_caption(painter, &edge.captions().value, origin, &font, text_color);
        }

        let pending = editor.pending().waiting();
        for (id, node) in scene.nodes() {
            let selected = scene.is_selected(ShapeId::Node(id));
            let fill = if selected { NODE_FILL_SELECTED } else { NODE_FILL };
            let center = to_screen(origin, node.center());
            painter.circle(
                center,
                node.radius(),
                fill,
                Stroke::new(visuals.node_stroke_width, text_color),
            );
            if pending == Some(id) {
                painter.circle_stroke(
                    center,
                    node.radius() + 4.0,
                    Stroke::new(visuals.node_stroke_width, PENDING_RING_COLOR),
                );
            }
            paint_caption(painter, &node.captions().key, origin, &font, text_color);
            paint_caption(painter, &node.captions().value, origin, &font, text_color);
        }

        if let Gesture::BoxSelect { start, current, .. } = self.gesture
            && start != current
        {
            let rect = egui::Rect::from_two_pos(
                to_screen(origin, start),
                to_screen(origin, current),
            );
            painter.rect_filled(rect, 0.0, RUBBER_BAND_FILL);
            painter.rect_stroke(
                rect,
                0.0,
                Stroke::new(1.0, RUBBER_BAND_STROKE),
                StrokeKind::Inside,
            );
        }
    }
}

fn paint_caption(
    painter: &Painter,
    caption: &Caption,
    origin: Pos2,
    font: &FontId,
    color: Color32,
) {
    painter.text(
        to_screen(origin, caption.anchor),
        Align2::CENTER_TOP,
        &caption.text,
        font.clone(),
        color,
    );
}
