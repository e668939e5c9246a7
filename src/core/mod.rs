// Copyright @yucwang 2021

pub mod bvh;
pub mod environment;
pub mod error;
pub mod film;
pub mod integrator;
pub mod material;
pub mod rng;
pub mod scene;
pub mod sensor;
pub mod settings;
pub mod shape;
pub mod tangent_frame;
