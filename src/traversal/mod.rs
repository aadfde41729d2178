pub mod controller;
pub mod traversal_model;
