use crate::geometry::Point;

/// Text shown for an absent key or value.
pub const PLACEHOLDER: &str = "None";

/// Distance of the key caption above its reference point.
pub const KEY_CAPTION_OFFSET: f32 = 20.0;
/// Distance of the value caption below its reference point.
pub const VALUE_CAPTION_OFFSET: f32 = 5.0;

/// Optional key/value string pair attached to a node or an edge.
///
/// Both parts are opaque strings: nothing is parsed or validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValue {
    pub key: Option<String>,
    pub value: Option<String>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    pub fn key_text(&self) -> &str {
        self.key.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn value_text(&self) -> &str {
        self.value.as_deref().unwrap_or(PLACEHOLDER)
    }
}

/// A floating text label. `anchor` is the top-centre of the text box.
#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    pub anchor: Point,
}

/// The pair of captions that track a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Captions {
    pub key: Caption,
    pub value: Caption,
}

impl Captions {
    /// Key caption above `key_ref`, value caption below `value_ref`.
    pub fn layout(label: &KeyValue, key_ref: Point, value_ref: Point) -> Self {
        Self {
            key: Caption {
                text: label.key_text().to_owned(),
                anchor: key_ref.translated(0.0, -KEY_CAPTION_OFFSET),
            },
            value: Caption {
                text: label.value_text().to_owned(),
                anchor: value_ref.translated(0.0, VALUE_CAPTION_OFFSET),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_parts_render_as_placeholder() {
        let label = KeyValue::default();
        assert_eq!(label.key_text(), "None");
        assert_eq!(label.value_text(), "None");

        let captions =
            Captions::layout(&label, Point::new(0.0, 0.0), Point::new(0.0, 0.0));
        assert_eq!(captions.key.text, "None");
        assert_eq!(captions.value.text, "None");
    }

    #[test]
    fn test_caption_offsets() {
        let label = KeyValue::new("weight", "3");
        let captions = Captions::layout(
            &label,
            Point::new(40.0, 10.0),
            Point::new(40.0, 70.0),
        );

        assert_eq!(captions.key.anchor, Point::new(40.0, -10.0));
        assert_eq!(captions.value.anchor, Point::new(40.0, 75.0));
        assert_eq!(captions.key.text, "weight");
        assert_eq!(captions.value.text, "3");
    }
}
