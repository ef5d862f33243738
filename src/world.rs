use std::num::NonZeroUsize;
use std::thread;
use std::time::Instant;

use rayon::ThreadPool;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::quadtree::Quadtree;
use crate::star::Star;
use crate::utils;

/// The whole simulation state: star and quad arenas, the display buffer and
/// the worker pool. Dropping the world joins the workers and frees the
/// arenas.
pub struct World {
    config: Config,
    stars: Vec<Star>,
    tree: Quadtree,
    /// Star positions narrowed to f32 for the display layer, republished
    /// after every frame.
    disp: Vec<[f32; 2]>,
    /// None when a single worker suffices; the acceleration phase then runs
    /// inline on the calling thread.
    pool: Option<ThreadPool>,
    workers: usize,
    build_time: f64,
    accel_time: f64,
}

/// World construction failure.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to spawn worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl World {
    /// Validates the configuration, seeds the initial cloud and spawns the
    /// worker pool.
    pub fn new(config: Config) -> Result<Self, InitError> {
        config.validate()?;
        let stars = utils::seed_stars(&config);
        Self::with_stars(config, stars)
    }

    /// Builds a world over caller-supplied stars. The star count of the
    /// configuration is taken from the vector; stars are sorted by ascending
    /// mass so that light bodies fold into the center-of-mass accumulation
    /// first, which keeps the floating-point error of the sums low.
    pub fn with_stars(mut config: Config, mut stars: Vec<Star>) -> Result<Self, InitError> {
        config.stars = stars.len();
        config.validate()?;

        stars.sort_by(|a, b| a.mass.total_cmp(&b.mass));

        let workers = match config.workers {
            0 => thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            n => n,
        }
        .min(stars.len());

        let pool = if workers > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("star-worker-{i}"))
                    .build()?,
            )
        } else {
            None
        };

        log::info!("world init: {} stars, {} workers", stars.len(), workers);

        let tree = Quadtree::new(config.accuracy, config.epsilon, stars.len());
        let disp = stars
            .iter()
            .map(|s| [s.pos.x as f32, s.pos.y as f32])
            .collect();

        Ok(Self {
            config,
            stars,
            tree,
            disp,
            pool,
            workers,
            build_time: 0.0,
            accel_time: 0.0,
        })
    }

    /// Advances the simulation by one frame.
    ///
    /// The wall-clock delta is clamped to `1 / min_fps` before the `speed`
    /// multiplier is applied, so a rendering hiccup never integrates a
    /// destabilizing timestep. The frame then runs build, acceleration,
    /// integration, display publish and arena reset in sequence.
    pub fn step(&mut self, wall_dt: f64) {
        let dt = wall_dt.min(1.0 / self.config.min_fps) * self.config.speed;

        let start = Instant::now();
        self.tree.rebuild(&self.stars);
        self.build_time = start.elapsed().as_secs_f64();

        let start = Instant::now();
        self.accelerate(dt);
        for star in &mut self.stars {
            // Velocity Verlet: the stored acceleration carries dt/2, so this
            // is pos += v*dt + a*dt^2/2.
            star.pos += (star.vel + star.accel) * dt;
        }
        self.accel_time = start.elapsed().as_secs_f64();

        for (star, out) in self.stars.iter().zip(&mut self.disp) {
            *out = [star.pos.x as f32, star.pos.y as f32];
        }

        self.tree.clear();
    }

    /// Walks the tree for every star and applies the velocity half-update,
    /// fanning out over the pool when there is one.
    ///
    /// Worker `p` of `P` owns the contiguous star range
    /// `[n*p/P, n*(p+1)/P)`; the quad arena is shared read-only, so the
    /// partition is the only synchronization the phase needs.
    fn accelerate(&mut self, dt: f64) {
        let half_kick = dt * self.config.gravity / 2.0;
        let tree = &self.tree;
        let stars = self.stars.as_mut_slice();

        match &self.pool {
            Some(pool) => {
                let n = stars.len();
                let workers = self.workers;
                pool.scope(|scope| {
                    let mut rest = stars;
                    let mut start = 0;
                    for part in 0..workers {
                        let end = n * (part + 1) / workers;
                        let (chunk, tail) = rest.split_at_mut(end - start);
                        rest = tail;
                        start = end;
                        scope.spawn(move |_| kick_range(chunk, tree, half_kick));
                    }
                });
            }
            None => kick_range(stars, tree, half_kick),
        }
    }

    /// Display positions, stable for the lifetime of the world.
    pub fn positions(&self) -> &[[f32; 2]] {
        &self.disp
    }

    /// The stars, ordered by ascending mass.
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Wall-clock seconds the last frame spent building the tree.
    pub fn build_time(&self) -> f64 {
        self.build_time
    }

    /// Wall-clock seconds the last frame spent on acceleration and
    /// integration.
    pub fn accel_time(&self) -> f64 {
        self.accel_time
    }
}

/// One worker's share of the acceleration phase: walk the tree, scale by
/// `dt * gravity / 2` and complete the velocity Verlet update for each owned
/// star.
fn kick_range(stars: &mut [Star], tree: &Quadtree, half_kick: f64) {
    for star in stars {
        let accel = tree.accel(star.pos) * half_kick;
        star.vel += star.accel + accel;
        star.accel = accel;
    }
}
