use std::f64::consts::TAU;

use ultraviolet::DVec2;

use crate::config::Config;
use crate::star::Star;

/// Seeds `config.stars` bodies as a circular cloud around the origin with a
/// gentle prograde swirl.
///
/// Radius is uniform in `[0, sqrt(stars) / galaxy_density]`, the orbital
/// speed grows as `r^0.25`, and masses are uniform in `[1, 10]`.
pub fn seed_stars(config: &Config) -> Vec<Star> {
    let mut rng = fastrand::Rng::new();
    let rmax = (config.stars as f64).sqrt() / config.galaxy_density;

    (0..config.stars)
        .map(|_| {
            let r = rng.f64() * rmax;
            let dir = rng.f64() * TAU;
            let (sin, cos) = dir.sin_cos();
            let swirl = config.star_speed * r.powf(0.25);
            Star::new(
                DVec2::new(r * cos, r * sin),
                DVec2::new(swirl * sin, -swirl * cos),
                rng.f64() * 9.0 + 1.0,
            )
        })
        .collect()
}
