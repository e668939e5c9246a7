// Copyright @yucwang 2023

use super::constants::{ PI, TWO_PI, Float, Vector2f, Vector3f };

pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    if r1 == 0. && r2 == 0. {
        return Vector2f::new(0.0, 0.0)
    }

    let (r, phi) = if r1 * r1 > r2 * r2 {
        (r1, (PI / 4.0) * (r2 / r1))
    } else {
        (r2, (PI / 2.0) - (r1 / r2) * (PI / 4.0))
    };

    let (sin_phi, cos_phi) = phi.sin_cos();
    Vector2f::new(r * cos_phi, r * sin_phi)
}

/// Cosine-weighted direction around +z.
pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.0).sqrt();

    Vector3f::new(p.x, p.y, z)
}

/// Uniform direction inside the cone of half-angle `acos(cos_max)` around +z.
pub fn sample_uniform_cone(u: &Vector2f, cos_max: Float) -> Vector3f {
    let cos_theta = 1.0 - u.x * (1.0 - cos_max);
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let phi = TWO_PI * u.y;

    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}

/// Solid angle of a cone of half-angle `acos(cos_max)`.
pub fn cone_solid_angle(cos_max: Float) -> Float {
    TWO_PI * (1.0 - cos_max)
}

/// Uniform point inside the unit ball, by rejection.
pub fn sample_unit_ball<F: FnMut() -> Float>(mut next: F) -> Vector3f {
    loop {
        let p = Vector3f::new(2.0 * next() - 1.0, 2.0 * next() - 1.0, 2.0 * next() - 1.0);
        if p.norm_squared() < 1.0 {
            return p;
        }
    }
}
