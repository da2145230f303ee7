//! Adaptive level of detail
//!
//! Grows or shrinks a grid dimension so that the average frame time stays
//! inside a target band. The draw-stress scene submits `dimension^3` cubes.

use thiserror::Error;

/// Slack applied when comparing the accumulated frame time against the window.
const WINDOW_EPSILON: f64 = 1e-9;

/// Errors returned by [`LodConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LodConfigError {
    #[error("accumulation window must be positive, got {0}")]
    InvalidWindow(f64),
    #[error("frame rate thresholds must be positive (fast {fast}, slow {slow})")]
    NonPositiveRate { fast: f64, slow: f64 },
    #[error("slow threshold {slow} fps must be below fast threshold {fast} fps")]
    InvertedRates { fast: f64, slow: f64 },
    #[error("minimum dimension must be at least 1")]
    ZeroFloor,
    #[error("grow step must be at least 1")]
    ZeroGrowStep,
    #[error("shrink step must be at least 1")]
    ZeroShrinkStep,
    #[error("initial dimension {initial} is below the minimum {min}")]
    InitialBelowFloor { initial: u32, min: u32 },
}

/// Tuning parameters for [`AdaptiveLod`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodConfig {
    /// Dimension the controller starts at. Default: 12.
    pub initial_dimension: u32,
    /// Floor the dimension never drops below. Default: 2.
    pub min_dimension: u32,
    /// Amount added when frames are cheap. Default: 2.
    pub grow_step: u32,
    /// Amount removed when frames are expensive. Default: 1.
    pub shrink_step: u32,
    /// Length of the averaging window in seconds. Default: 1.0.
    pub window_secs: f64,
    /// An average faster than `1 / fast_fps` grows the dimension. Default: 65.
    pub fast_fps: f64,
    /// An average slower than `1 / slow_fps` shrinks the dimension. Default: 57.
    pub slow_fps: f64,
}

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            initial_dimension: 12,
            min_dimension: 2,
            grow_step: 2,
            shrink_step: 1,
            window_secs: 1.0,
            fast_fps: 65.0,
            slow_fps: 57.0,
        }
    }
}

impl LodConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting dimension.
    pub fn initial_dimension(mut self, dimension: u32) -> Self {
        self.initial_dimension = dimension;
        self
    }

    /// Set the dimension floor.
    pub fn min_dimension(mut self, dimension: u32) -> Self {
        self.min_dimension = dimension;
        self
    }

    /// Set the grow and shrink steps.
    pub fn steps(mut self, grow: u32, shrink: u32) -> Self {
        self.grow_step = grow;
        self.shrink_step = shrink;
        self
    }

    /// Set the averaging window length in seconds.
    pub fn window_secs(mut self, secs: f64) -> Self {
        self.window_secs = secs;
        self
    }

    /// Set the frame rate band as (slow, fast) frames per second.
    pub fn target_fps(mut self, slow: f64, fast: f64) -> Self {
        self.slow_fps = slow;
        self.fast_fps = fast;
        self
    }

    /// Frame time below which the dimension grows.
    pub fn fast_frame_time(&self) -> f64 {
        1.0 / self.fast_fps
    }

    /// Frame time above which the dimension shrinks.
    pub fn slow_frame_time(&self) -> f64 {
        1.0 / self.slow_fps
    }

    /// Check that the parameters describe a usable controller.
    pub fn validate(&self) -> Result<(), LodConfigError> {
        if self.window_secs.is_nan() || self.window_secs <= 0.0 {
            return Err(LodConfigError::InvalidWindow(self.window_secs));
        }
        let rate_ok = |fps: f64| fps.is_finite() && fps > 0.0;
        if !rate_ok(self.fast_fps) || !rate_ok(self.slow_fps) {
            return Err(LodConfigError::NonPositiveRate {
                fast: self.fast_fps,
                slow: self.slow_fps,
            });
        }
        if self.slow_fps >= self.fast_fps {
            return Err(LodConfigError::InvertedRates {
                fast: self.fast_fps,
                slow: self.slow_fps,
            });
        }
        if self.min_dimension == 0 {
            return Err(LodConfigError::ZeroFloor);
        }
        if self.grow_step == 0 {
            return Err(LodConfigError::ZeroGrowStep);
        }
        if self.shrink_step == 0 {
            return Err(LodConfigError::ZeroShrinkStep);
        }
        if self.initial_dimension < self.min_dimension {
            return Err(LodConfigError::InitialBelowFloor {
                initial: self.initial_dimension,
                min: self.min_dimension,
            });
        }
        Ok(())
    }
}

/// Running sum of frame times since the last recalibration.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTimer {
    /// Seconds accumulated in the current window.
    pub total_elapsed: f64,
    /// Frames accumulated in the current window.
    pub frame_count: u32,
}

impl FrameTimer {
    /// Add one frame.
    pub fn tick(&mut self, delta_time: f64) {
        self.total_elapsed += delta_time;
        self.frame_count += 1;
    }

    /// Whether the accumulated time has reached `window` seconds.
    pub fn is_complete(&self, window: f64) -> bool {
        self.total_elapsed + WINDOW_EPSILON >= window
    }

    /// Average frame time over the accumulated frames.
    pub fn average(&self) -> f64 {
        if self.frame_count == 0 {
            0.0
        } else {
            self.total_elapsed / self.frame_count as f64
        }
    }

    /// Start a new window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The value the controller adjusts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodState {
    /// Grid side length.
    pub dimension: u32,
    /// Average frame time of the last closed window, in seconds.
    pub average_frame_time: f64,
}

/// What happened to the dimension when a window closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LodChange {
    Grew,
    Shrank,
    Held,
}

/// Frame-time driven dimension controller.
///
/// Call [`AdaptiveLod::update`] exactly once per rendered frame. Once the
/// accumulated frame time reaches the configured window the average frame
/// time decides whether the dimension grows, shrinks or stays put, and the
/// window restarts. The dimension never drops below
/// [`LodConfig::min_dimension`].
#[derive(Debug, Clone)]
pub struct AdaptiveLod {
    config: LodConfig,
    timer: FrameTimer,
    state: LodState,
}

impl AdaptiveLod {
    /// Create a controller, validating the config first.
    pub fn new(config: LodConfig) -> Result<Self, LodConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            timer: FrameTimer::default(),
            state: LodState {
                dimension: config.initial_dimension,
                average_frame_time: 0.0,
            },
        })
    }

    /// Feed one frame's delta time and return the dimension to render with.
    pub fn update(&mut self, delta_time: f64) -> u32 {
        self.timer.tick(delta_time);
        if self.timer.is_complete(self.config.window_secs) {
            let average = self.timer.average();
            let change = self.recalibrate(average);
            tracing::debug!(
                average_ms = average * 1000.0,
                dimension = self.state.dimension,
                ?change,
                "lod window closed"
            );
            self.timer.reset();
        }
        self.state.dimension
    }

    fn recalibrate(&mut self, average: f64) -> LodChange {
        self.state.average_frame_time = average;
        let dimension = self.state.dimension;
        if average < self.config.fast_frame_time() {
            self.state.dimension = dimension.saturating_add(self.config.grow_step);
            LodChange::Grew
        } else if average > self.config.slow_frame_time() && dimension > self.config.min_dimension
        {
            self.state.dimension = dimension
                .saturating_sub(self.config.shrink_step)
                .max(self.config.min_dimension);
            LodChange::Shrank
        } else {
            LodChange::Held
        }
    }

    /// Current grid side length.
    pub fn dimension(&self) -> u32 {
        self.state.dimension
    }

    /// Number of objects a cube grid of the current dimension holds.
    pub fn object_count(&self) -> u64 {
        let dim = self.state.dimension as u64;
        dim * dim * dim
    }

    /// Average frame time of the last closed window, in seconds.
    pub fn average_frame_time(&self) -> f64 {
        self.state.average_frame_time
    }

    /// Current adjusted state.
    pub fn state(&self) -> LodState {
        self.state
    }

    /// The in-progress accumulation window.
    pub fn timer(&self) -> FrameTimer {
        self.timer
    }

    /// The controller's parameters.
    pub fn config(&self) -> &LodConfig {
        &self.config
    }
}

impl Default for AdaptiveLod {
    fn default() -> Self {
        let config = LodConfig::default();
        Self {
            config,
            timer: FrameTimer::default(),
            state: LodState {
                dimension: config.initial_dimension,
                average_frame_time: 0.0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(lod: &mut AdaptiveLod, frames: usize, dt: f64) -> u32 {
        let mut dim = lod.dimension();
        for _ in 0..frames {
            dim = lod.update(dt);
        }
        dim
    }

    #[test]
    fn test_slow_frames_shrink_by_one() {
        let mut lod = AdaptiveLod::default();
        assert_eq!(feed(&mut lod, 60, 1.0 / 50.0), 11);
        assert!((lod.average_frame_time() - 1.0 / 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_fast_frames_grow_by_two() {
        let mut lod = AdaptiveLod::default();
        assert_eq!(feed(&mut lod, 70, 1.0 / 70.0), 14);
    }

    #[test]
    fn test_window_closes_on_reaching_threshold() {
        let mut lod = AdaptiveLod::default();
        assert_eq!(feed(&mut lod, 49, 1.0 / 50.0), 12);
        assert_eq!(lod.update(1.0 / 50.0), 11);
        assert_eq!(lod.timer().frame_count, 0);
    }

    #[test]
    fn test_at_most_one_adjustment_per_window() {
        let mut lod = AdaptiveLod::default();
        // Many tiny frames followed by a single long one still close one window.
        feed(&mut lod, 10, 0.001);
        assert_eq!(lod.update(5.0), 11);
        assert_eq!(lod.timer(), FrameTimer::default());
    }

    #[test]
    fn test_in_band_frames_hold() {
        let mut lod = AdaptiveLod::default();
        assert_eq!(feed(&mut lod, 600, 1.0 / 60.0), 12);
    }

    #[test]
    fn test_grows_without_bound() {
        let mut lod = AdaptiveLod::default();
        let mut previous = lod.dimension();
        for _ in 0..20 {
            let dim = feed(&mut lod, 100, 0.01);
            assert_eq!(dim, previous + 2);
            previous = dim;
        }
        assert_eq!(lod.dimension(), 52);
    }

    #[test]
    fn test_shrinks_to_floor_and_holds() {
        let mut lod = AdaptiveLod::new(LodConfig::new().initial_dimension(5)).unwrap();
        let mut seen = Vec::new();
        for _ in 0..6 {
            seen.push(feed(&mut lod, 10, 0.1));
        }
        assert_eq!(seen, vec![4, 3, 2, 2, 2, 2]);
    }

    #[test]
    fn test_never_below_floor_with_large_shrink_step() {
        let config = LodConfig::new()
            .initial_dimension(4)
            .min_dimension(3)
            .steps(2, 5);
        let mut lod = AdaptiveLod::new(config).unwrap();
        assert_eq!(feed(&mut lod, 10, 0.1), 3);
        assert_eq!(feed(&mut lod, 10, 0.1), 3);
    }

    #[test]
    fn test_object_count_is_cubed() {
        let lod = AdaptiveLod::default();
        assert_eq!(lod.object_count(), 1728);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = LodConfig::new().target_fps(25.0, 35.0).window_secs(0.5);
        let mut lod = AdaptiveLod::new(config).unwrap();
        // 1/40 s per frame is faster than 35 fps.
        assert_eq!(feed(&mut lod, 20, 1.0 / 40.0), 14);
        // 1/30 s per frame sits inside the band.
        assert_eq!(feed(&mut lod, 15, 1.0 / 30.0), 14);
    }

    #[test]
    fn test_config_validation() {
        assert!(LodConfig::default().validate().is_ok());
        assert_eq!(
            LodConfig::new().window_secs(0.0).validate(),
            Err(LodConfigError::InvalidWindow(0.0))
        );
        assert!(matches!(
            LodConfig::new().target_fps(65.0, 57.0).validate(),
            Err(LodConfigError::InvertedRates { .. })
        ));
        assert!(matches!(
            LodConfig::new().target_fps(-1.0, 57.0).validate(),
            Err(LodConfigError::NonPositiveRate { .. })
        ));
        assert_eq!(
            LodConfig::new().min_dimension(0).validate(),
            Err(LodConfigError::ZeroFloor)
        );
        assert_eq!(
            LodConfig::new().steps(0, 1).validate(),
            Err(LodConfigError::ZeroGrowStep)
        );
        assert_eq!(
            LodConfig::new().steps(2, 0).validate(),
            Err(LodConfigError::ZeroShrinkStep)
        );
        assert!(AdaptiveLod::new(LodConfig::new().steps(2, 0)).is_err());
        assert!(AdaptiveLod::new(LodConfig::new().initial_dimension(1)).is_err());
    }
}
