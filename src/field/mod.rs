pub mod button_role;
pub mod classifier;
pub mod extractor;
pub mod field_model;
pub mod keywords;
