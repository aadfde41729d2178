use serde::{Deserialize, Serialize};

/// Semantic category of a detected form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Name,
    File,
    Textarea,
    Select,
    Checkbox,
    Radio,
    Url,
    Date,
    Password,
    Submit,
    Button,
    Unknown,
}

impl FieldType {
    pub fn is_button_like(self) -> bool {
        matches!(self, FieldType::Submit | FieldType::Button)
    }
}

/// Viewport-relative pixel geometry of an element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Click target: the center of the box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// One option of a `<select>` element, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
    #[serde(default)]
    pub disabled: bool,
}

/// Normalized representation of one detected interactive element.
///
/// Created fresh on every DOM scan and never mutated afterwards; the page
/// may have changed by the next scan, so records are not reused across steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub element_id: String,
    pub field_type: FieldType,
    pub label: String,
    pub name: String,
    pub placeholder: String,
    pub required: bool,
    /// Best-effort CSS selector for external re-targeting only.
    pub selector: String,
    pub bounding_box: BoundingBox,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    #[serde(default)]
    pub is_next_button: bool,
    #[serde(default)]
    pub is_final_submit: bool,
}

impl FieldRecord {
    /// Display name for logs: label, else name, else placeholder, else id.
    pub fn display_name(&self) -> &str {
        if !self.label.is_empty() {
            &self.label
        } else if !self.name.is_empty() {
            &self.name
        } else if !self.placeholder.is_empty() {
            &self.placeholder
        } else {
            &self.element_id
        }
    }
}

/// Raw DOM element as extracted by the browser sidecar (one JSON object per
/// element). Carries everything the label-resolution chain needs so the core
/// never has to re-query the DOM.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawElement {
    /// Defaulted so a detached node reported without a tag surfaces as a
    /// per-element Malformed skip instead of failing the whole snapshot.
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub visible: bool,
    #[serde(rename = "ariaLabel", default)]
    pub aria_label: Option<String>,
    #[serde(rename = "className", default)]
    pub class_name: Option<String>,
    /// Own text content (buttons, contenteditable).
    #[serde(default)]
    pub text: Option<String>,
    /// Value attribute (submit inputs carry their caption here).
    #[serde(default)]
    pub value: Option<String>,
    /// Text of a `<label for=...>` pointing at this element.
    #[serde(rename = "labelFor", default)]
    pub label_for: Option<String>,
    /// Text of the nearest ancestor `<label>`.
    #[serde(rename = "ancestorLabel", default)]
    pub ancestor_label: Option<String>,
    /// Parent element's text content, for the last-resort label fallback.
    #[serde(rename = "parentText", default)]
    pub parent_text: Option<String>,
    #[serde(rename = "contentEditable", default)]
    pub content_editable: bool,
    #[serde(rename = "boundingBox", default)]
    pub bounding_box: Option<BoundingBox>,
    #[serde(default)]
    pub options: Vec<SelectOption>,
}

/// Attribute view handed to the classifier.
#[derive(Debug, Clone, Default)]
pub struct ElementAttributes<'a> {
    pub name: &'a str,
    pub id: &'a str,
    pub placeholder: &'a str,
    pub aria_label: &'a str,
    pub class: &'a str,
}

impl<'a> ElementAttributes<'a> {
    pub fn of(el: &'a RawElement) -> Self {
        Self {
            name: el.name.as_deref().unwrap_or(""),
            id: el.id.as_deref().unwrap_or(""),
            placeholder: el.placeholder.as_deref().unwrap_or(""),
            aria_label: el.aria_label.as_deref().unwrap_or(""),
            class: el.class_name.as_deref().unwrap_or(""),
        }
    }

    /// Lowercase concatenation of all textual attributes, for keyword scans.
    pub fn searchable(&self) -> String {
        [self.name, self.id, self.placeholder, self.aria_label, self.class]
            .join(" ")
            .to_lowercase()
    }
}
