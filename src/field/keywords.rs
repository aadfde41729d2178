//! Shared keyword table used by both the field classifier and the button
//! role classifier. Additions here stay consistent across both.

use crate::field::field_model::FieldType;

pub const NAME_KEYWORDS: &[&str] =
    &["name", "first", "last", "full", "firstname", "lastname", "fullname"];

pub const EMAIL_KEYWORDS: &[&str] = &["email", "e-mail", "mail"];

pub const PHONE_KEYWORDS: &[&str] = &["phone", "tel", "telephone", "mobile", "cell"];

pub const FILE_KEYWORDS: &[&str] =
    &["resume", "cv", "upload", "file", "attachment", "document"];

pub const URL_KEYWORDS: &[&str] =
    &["linkedin", "portfolio", "website", "github", "url", "link"];

pub const DATE_KEYWORDS: &[&str] = &["date", "start", "available", "availability"];

/// Navigation buttons that advance a multi-step form.
pub const NEXT_KEYWORDS: &[&str] = &["next", "continue", "proceed", "forward", "step"];

/// Buttons that finalize a form. Doubles as the submit keyword group for
/// field classification.
pub const FINAL_SUBMIT_KEYWORDS: &[&str] = &["submit", "send", "apply", "finish", "complete"];

/// Keyword groups checked by the classifier when no direct type mapping
/// applies. Order is significant: the first group with a hit wins.
pub const FIELD_KEYWORD_GROUPS: &[(FieldType, &[&str])] = &[
    (FieldType::Name, NAME_KEYWORDS),
    (FieldType::Email, EMAIL_KEYWORDS),
    (FieldType::Phone, PHONE_KEYWORDS),
    (FieldType::File, FILE_KEYWORDS),
    (FieldType::Url, URL_KEYWORDS),
    (FieldType::Date, DATE_KEYWORDS),
    (FieldType::Submit, FINAL_SUBMIT_KEYWORDS),
];

/// True if any keyword occurs as a substring of `haystack` (caller lowercases).
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| haystack.contains(kw))
}
