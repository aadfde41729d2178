use crate::field::keywords::{FINAL_SUBMIT_KEYWORDS, NEXT_KEYWORDS, contains_any};

/// Navigational role of a button-typed field. Next and FinalSubmit are
/// mutually exclusive; Plain buttons are excluded from traversal entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    Next,
    FinalSubmit,
    Plain,
}

/// Disambiguate "next/continue" navigation buttons from final submit buttons
/// using the shared keyword table. Next indicators win when both match
/// ("continue to submit" advances the form, it does not finish it).
pub fn classify_button(text: &str, name: &str, label: &str) -> ButtonRole {
    let searchable = format!("{} {} {}", text, name, label).to_lowercase();

    if contains_any(&searchable, NEXT_KEYWORDS) {
        ButtonRole::Next
    } else if contains_any(&searchable, FINAL_SUBMIT_KEYWORDS) {
        ButtonRole::FinalSubmit
    } else {
        ButtonRole::Plain
    }
}
