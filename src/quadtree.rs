use ultraviolet::DVec2;

use crate::star::Star;

/// One slot of a quad's four children.
///
/// A leaf carries the star's index together with its position and mass as
/// captured at insert time, so the acceleration walk reads the tree alone and
/// never touches the star array while workers are mutating it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Child {
    Empty,
    Star { star: u32, pos: DVec2, mass: f64 },
    Quad(u32),
}

/// An interior quadtree node covering a square region.
#[derive(Clone, Copy, Debug)]
pub struct Quad {
    /// Center of mass of all stars below this node.
    pub com: DVec2,
    /// Total mass of all stars below this node.
    pub mass: f64,
    /// Geometric center of the region.
    pub center: DVec2,
    /// Side length of the region. Strictly positive except for a degenerate
    /// root over coincident stars.
    pub size: f64,
    /// Child quadrants, indexed by [`Quad::quadrant`].
    pub children: [Child; 4],
}

impl Default for Quad {
    fn default() -> Self {
        Self {
            com: DVec2::zero(),
            mass: 0.0,
            center: DVec2::zero(),
            size: 0.0,
            children: [Child::Empty; 4],
        }
    }
}

impl Quad {
    /// Child slot index for a position: bit 0 set east of center, bit 1 set
    /// north of it (2 3 / 0 1). Positions exactly on a center line land on
    /// the lesser side.
    pub fn quadrant(&self, pos: DVec2) -> usize {
        ((pos.y > self.center.y) as usize) << 1 | (pos.x > self.center.x) as usize
    }
}

/// The Barnes-Hut quadtree, rebuilt every frame over a preallocated arena.
///
/// The arena holds `2 * stars` quad slots with a bump counter; index 0 is the
/// root. Between frames the used prefix is zeroed and the tree is empty.
#[derive(Debug)]
pub struct Quadtree {
    /// Acceptance parameter: a node is treated as a single mass when the
    /// distance to its center of mass exceeds `size * accuracy`.
    pub accuracy: f64,
    /// Softening added to the squared distance in the force kernel.
    pub epsilon: f64,
    quads: Vec<Quad>,
    used: usize,
}

impl Quadtree {
    const ROOT: usize = 0;

    /// Creates an empty tree with capacity for `stars` bodies.
    pub fn new(accuracy: f64, epsilon: f64, stars: usize) -> Self {
        Self {
            accuracy,
            epsilon,
            quads: vec![Quad::default(); 2 * stars],
            used: 0,
        }
    }

    /// The quads in use by the current frame, root first. Empty between
    /// frames.
    pub fn nodes(&self) -> &[Quad] {
        &self.quads[..self.used]
    }

    /// Rebuilds the tree over the current star positions.
    ///
    /// First pass computes the world bounds: the root is centered on the
    /// extent midpoint and sized to the larger extent, keeping every node
    /// square. Second pass inserts each star in turn, folding its mass into
    /// the center of mass of every quad visited on the way down.
    pub fn rebuild(&mut self, stars: &[Star]) {
        debug_assert_eq!(self.used, 0, "rebuild over a non-empty arena");

        let mut min = DVec2::broadcast(f64::INFINITY);
        let mut max = DVec2::broadcast(f64::NEG_INFINITY);
        for star in stars {
            min = min.min_by_component(star.pos);
            max = max.max_by_component(star.pos);
        }

        let root = &mut self.quads[Self::ROOT];
        root.center = (min + max) * 0.5;
        root.size = (max.x - min.x).max(max.y - min.y);
        self.used = 1;

        for (i, star) in stars.iter().enumerate() {
            self.insert(i as u32, star.pos, star.mass);
        }
    }

    /// Zeroes exactly the quads used by the last frame.
    pub fn clear(&mut self) {
        for quad in &mut self.quads[..self.used] {
            *quad = Quad::default();
        }
        self.used = 0;
    }

    fn alloc(&mut self) -> usize {
        if self.used == self.quads.len() {
            log::error!(
                "quad arena exhausted after {} nodes; coincident star positions?",
                self.used
            );
            panic!("quad arena exhausted after {} nodes", self.used);
        }
        let index = self.used;
        self.used += 1;
        index
    }

    /// Descends from the root, updating mass and center of mass at every
    /// visited quad, until the star lands in an empty slot. An occupied leaf
    /// splits: a new half-size quad takes over the slot, the old star is
    /// re-filed under it, and the descent continues. Two stars at
    /// bit-identical coordinates cannot be separated by any split, so the
    /// newcomer takes over the slot instead.
    fn insert(&mut self, star: u32, pos: DVec2, mass: f64) {
        let mut node = Self::ROOT;
        loop {
            let quad = &mut self.quads[node];

            let mass_sum = quad.mass + mass;
            quad.com = (quad.com * quad.mass + pos * mass) / mass_sum;
            quad.mass = mass_sum;

            let quadrant = quad.quadrant(pos);
            let q_center = quad.center;
            let q_size = quad.size;

            match quad.children[quadrant] {
                Child::Empty => {
                    quad.children[quadrant] = Child::Star { star, pos, mass };
                    return;
                }
                Child::Quad(next) => node = next as usize,
                Child::Star {
                    star: old,
                    pos: old_pos,
                    mass: old_mass,
                } => {
                    if old_pos == pos {
                        quad.children[quadrant] = Child::Star { star, pos, mass };
                        return;
                    }

                    let shift = q_size * 0.25;
                    let center = DVec2::new(
                        q_center.x + if quadrant & 0x1 != 0 { shift } else { -shift },
                        q_center.y + if quadrant & 0x2 != 0 { shift } else { -shift },
                    );

                    let next = self.alloc();
                    let new_quad = &mut self.quads[next];
                    new_quad.center = center;
                    new_quad.size = q_size * 0.5;
                    new_quad.com = old_pos;
                    new_quad.mass = old_mass;
                    let old_slot = new_quad.quadrant(old_pos);
                    new_quad.children[old_slot] = Child::Star {
                        star: old,
                        pos: old_pos,
                        mass: old_mass,
                    };

                    self.quads[node].children[quadrant] = Child::Quad(next as u32);
                    node = next;
                }
            }
        }
    }

    /// Gravitational acceleration at `pos`, walking the tree from the root.
    ///
    /// The result is unscaled: the caller applies the `dt * gravity / 2`
    /// factor.
    pub fn accel(&self, pos: DVec2) -> DVec2 {
        let mut accel = DVec2::zero();
        if self.used > 0 {
            self.node_accel(&self.quads[Self::ROOT], pos, &mut accel);
        }
        accel
    }

    /// A node whose center of mass is further away than `size * accuracy`
    /// contributes as a single point mass; otherwise its non-empty children
    /// are visited. A star leaf has size zero, so it always contributes
    /// unless it sits exactly at `pos` (the target itself, or a coincident
    /// star).
    fn node_accel(&self, quad: &Quad, pos: DVec2, accel: &mut DVec2) {
        let d = quad.com - pos;
        let dist_sq = d.mag_sq();
        if dist_sq.sqrt() > quad.size * self.accuracy {
            self.point_accel(d, dist_sq, quad.mass, accel);
        } else if quad.size > 0.0 {
            for child in &quad.children {
                match *child {
                    Child::Empty => {}
                    Child::Star { pos: star_pos, mass, .. } => {
                        let d = star_pos - pos;
                        let dist_sq = d.mag_sq();
                        if dist_sq > 0.0 {
                            self.point_accel(d, dist_sq, mass, accel);
                        }
                    }
                    Child::Quad(next) => {
                        self.node_accel(&self.quads[next as usize], pos, accel)
                    }
                }
            }
        }
    }

    // Keep the atan2/cos/sin form: it is not bit-equivalent to |a|*d/r, and
    // tests hold results to float parity.
    fn point_accel(&self, d: DVec2, dist_sq: f64, mass: f64, accel: &mut DVec2) {
        let angle = d.y.atan2(d.x);
        let accel_abs = mass / (dist_sq + self.epsilon);
        accel.x += accel_abs * angle.cos();
        accel.y += accel_abs * angle.sin();
    }
}
