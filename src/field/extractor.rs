use std::fmt;

use crate::field::button_role::{ButtonRole, classify_button};
use crate::field::classifier::classify;
use crate::field::field_model::{ElementAttributes, FieldRecord, FieldType, RawElement};

/// Why one element was skipped during a scan. Skips are local: the scan
/// always continues with the remaining elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementProcessingError {
    /// Element is not currently visible (layout-based, not just CSS display).
    NotVisible { index: usize },
    /// No bounding box could be obtained (fully collapsed element).
    MissingGeometry { index: usize },
    /// Element data is unusable (e.g. detached node reported with no tag).
    Malformed { index: usize, reason: String },
}

impl fmt::Display for ElementProcessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementProcessingError::NotVisible { index } => {
                write!(f, "element {} is not visible", index)
            }
            ElementProcessingError::MissingGeometry { index } => {
                write!(f, "element {} has no bounding box", index)
            }
            ElementProcessingError::Malformed { index, reason } => {
                write!(f, "element {} is malformed: {}", index, reason)
            }
        }
    }
}

impl std::error::Error for ElementProcessingError {}

/// Result of scanning one DOM snapshot.
#[derive(Debug, Default)]
pub struct FieldScan {
    pub fields: Vec<FieldRecord>,
    pub skipped: Vec<ElementProcessingError>,
}

/// Walk an extracted DOM snapshot and emit a `FieldRecord` per qualifying
/// visible element, in extraction order. One bad element never aborts the
/// scan; its error is collected into `skipped`.
pub fn find_fields(elements: &[RawElement]) -> FieldScan {
    let mut scan = FieldScan::default();

    for (index, el) in elements.iter().enumerate() {
        if !qualifies(el) {
            continue;
        }
        match extract_field(el, index) {
            Ok(field) => scan.fields.push(field),
            Err(skip) => scan.skipped.push(skip),
        }
    }

    scan
}

/// Interactive elements worth processing: non-hidden inputs (including
/// submit/button inputs), textareas, selects, buttons, and contenteditable
/// elements. Disabled elements are not interactive.
fn qualifies(el: &RawElement) -> bool {
    if el.disabled {
        return false;
    }
    match el.tag.as_str() {
        "input" => el.r#type.as_deref() != Some("hidden"),
        "textarea" | "select" | "button" => true,
        _ => el.content_editable,
    }
}

/// Extract a single qualifying element into a `FieldRecord`.
pub fn extract_field(
    el: &RawElement,
    index: usize,
) -> Result<FieldRecord, ElementProcessingError> {
    if el.tag.is_empty() {
        return Err(ElementProcessingError::Malformed {
            index,
            reason: "no tag name".into(),
        });
    }

    if !el.visible {
        return Err(ElementProcessingError::NotVisible { index });
    }

    let bounding_box = el
        .bounding_box
        .ok_or(ElementProcessingError::MissingGeometry { index })?;

    let attrs = ElementAttributes::of(el);
    let input_type = el.r#type.as_deref().unwrap_or("");
    let button_like = is_button_like(el);

    let label = if button_like {
        resolve_button_label(el)
    } else {
        resolve_label(el)
    };

    let (field_type, role) = if el.tag == "textarea" {
        (FieldType::Textarea, ButtonRole::Plain)
    } else if el.tag == "select" {
        (FieldType::Select, ButtonRole::Plain)
    } else if button_like {
        let role = classify_button(own_text(el), attrs.name, &label);
        let field_type = match role {
            ButtonRole::FinalSubmit => FieldType::Submit,
            ButtonRole::Next => FieldType::Button,
            // No navigation keywords: fall back to the type attribute.
            ButtonRole::Plain if input_type == "submit" => FieldType::Submit,
            ButtonRole::Plain => FieldType::Button,
        };
        (field_type, role)
    } else {
        (classify(input_type, &attrs), ButtonRole::Plain)
    };

    let element_id = if !attrs.id.is_empty() {
        attrs.id.to_string()
    } else if !attrs.name.is_empty() {
        attrs.name.to_string()
    } else {
        format!("field_{}", index)
    };

    Ok(FieldRecord {
        element_id,
        field_type,
        label,
        name: attrs.name.to_string(),
        placeholder: attrs.placeholder.to_string(),
        required: el.required,
        selector: derive_selector(el, &attrs, index),
        bounding_box,
        options: el.options.clone(),
        is_next_button: role == ButtonRole::Next,
        is_final_submit: role == ButtonRole::FinalSubmit,
    })
}

fn is_button_like(el: &RawElement) -> bool {
    el.tag == "button"
        || matches!(el.r#type.as_deref(), Some("submit") | Some("button"))
}

/// Own text content, falling back to the value attribute (submit inputs
/// carry their caption there).
fn own_text(el: &RawElement) -> &str {
    match el.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => el.value.as_deref().map(str::trim).unwrap_or(""),
    }
}

/// Ordered label fallback chain: `<label for>` text, nearest ancestor
/// `<label>`, aria-label, then parent text when it is short enough to be a
/// caption rather than a paragraph. First non-empty match wins.
fn resolve_label(el: &RawElement) -> String {
    let candidates = [
        el.label_for.as_deref(),
        el.ancestor_label.as_deref(),
        el.aria_label.as_deref(),
    ];

    for candidate in candidates.into_iter().flatten() {
        let trimmed = candidate.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    if let Some(parent) = el.parent_text.as_deref() {
        let trimmed = parent.trim();
        if !trimmed.is_empty() && trimmed.len() < 100 {
            return trimmed.to_string();
        }
    }

    String::new()
}

/// Buttons prefer their own caption before the label chain.
fn resolve_button_label(el: &RawElement) -> String {
    let text = own_text(el);
    if !text.is_empty() {
        return text.to_string();
    }
    resolve_label(el)
}

/// Best-effort unique selector: id, else name+tag, else positional. Used
/// only for external re-targeting, never by the matching logic.
fn derive_selector(el: &RawElement, attrs: &ElementAttributes, index: usize) -> String {
    if !attrs.id.is_empty() {
        format!("#{}", attrs.id)
    } else if !attrs.name.is_empty() {
        format!("{}[name='{}']", el.tag, attrs.name)
    } else {
        format!("{}:nth-of-type({})", el.tag, index + 1)
    }
}
