// Copyright @yucwang 2026

pub mod envmap;
pub mod sky;
pub mod uniform;
