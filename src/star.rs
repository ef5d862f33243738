use ultraviolet::DVec2;

/// A single star in the simulation.
#[derive(Clone, Copy, Debug)]
pub struct Star {
    /// Position vector.
    pub pos: DVec2,
    /// Velocity vector.
    pub vel: DVec2,
    /// Half-step acceleration from the previous frame, already scaled by
    /// `dt * gravity / 2`. Carried between frames so velocity Verlet
    /// completes in a single pass per star.
    pub accel: DVec2,
    /// Mass of the star. Always positive.
    pub mass: f64,
}

impl Star {
    /// Creates a new star at rest in acceleration.
    pub fn new(pos: DVec2, vel: DVec2, mass: f64) -> Self {
        Self {
            pos,
            vel,
            accel: DVec2::zero(),
            mass,
        }
    }
}
