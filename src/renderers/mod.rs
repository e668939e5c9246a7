// Copyright @yucwang 2021

pub mod batch;
pub mod renderer;
pub mod simple;
pub mod worker;
