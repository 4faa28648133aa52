pub mod concept_map;
pub mod document;
