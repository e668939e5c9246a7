// Copyright 2020 @TwoCookingMice

pub mod aabb;
pub mod bitmap;
pub mod bsphere;
pub mod constants;
pub mod energy;
pub mod ray;
pub mod warp;
