use crate::field::field_model::{ElementAttributes, FieldType};
use crate::field::keywords::{FIELD_KEYWORD_GROUPS, contains_any};

/// Classify a field from its type attribute and textual attributes.
///
/// The type attribute is the most reliable signal and always wins. Keyword
/// groups are only consulted when the type says nothing, in the fixed order
/// of `FIELD_KEYWORD_GROUPS` (name is checked before the rest).
pub fn classify(input_type: &str, attrs: &ElementAttributes) -> FieldType {
    if let Some(mapped) = direct_type(input_type) {
        return mapped;
    }

    let searchable = attrs.searchable();
    for (field_type, keywords) in FIELD_KEYWORD_GROUPS {
        if contains_any(&searchable, keywords) {
            return *field_type;
        }
    }

    if input_type == "text" {
        return FieldType::Text;
    }

    FieldType::Unknown
}

/// Direct type-attribute mapping, highest precedence.
fn direct_type(input_type: &str) -> Option<FieldType> {
    match input_type {
        "email" => Some(FieldType::Email),
        "tel" => Some(FieldType::Phone),
        "file" => Some(FieldType::File),
        "url" => Some(FieldType::Url),
        "date" => Some(FieldType::Date),
        "checkbox" => Some(FieldType::Checkbox),
        "radio" => Some(FieldType::Radio),
        "password" => Some(FieldType::Password),
        "submit" => Some(FieldType::Submit),
        "button" => Some(FieldType::Button),
        _ => None,
    }
}
