//! File formats: the CSV token sheet and the token catalog XML

pub mod catalog;
pub mod tabular;
