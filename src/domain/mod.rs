pub mod ai;
pub mod entity;
pub mod field;
pub mod rules;
