//! Asteroid and world configuration with validating builders
//!
//! Everything needed to rebuild a world is a small value: the per-body
//! generation parameters live in [`AsteroidConfig`] and the placement volume
//! in [`WorldSettings`]. Both are shared unchanged by the authority and every
//! peer of a session.

use serde::{Deserialize, Serialize};

use crate::error::{AsteroidError, Result};

/// Asteroid size presets
///
/// Each preset maps to a base radius and a mesh complexity (sector count of
/// the surface lattice). The per-body size multiplier scales the radius on
/// top of the preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AsteroidSize {
    /// Small rocks: radius 3.0, complexity 16
    Small,
    /// Medium rocks: radius 5.0, complexity 24 (default)
    Medium,
    /// Large rocks: radius 8.0, complexity 32
    Large,
    /// Custom radius and complexity
    Custom {
        /// Base body radius in world units
        radius: f32,
        /// Number of sectors around the surface lattice
        complexity: u32,
    },
}

impl AsteroidSize {
    /// Base radius before the per-body size multiplier
    pub fn base_radius(self) -> f32 {
        match self {
            AsteroidSize::Small => 3.0,
            AsteroidSize::Medium => 5.0,
            AsteroidSize::Large => 8.0,
            AsteroidSize::Custom { radius, .. } => radius,
        }
    }

    /// Surface sector count; rings are half of it
    pub fn complexity(self) -> u32 {
        match self {
            AsteroidSize::Small => 16,
            AsteroidSize::Medium => 24,
            AsteroidSize::Large => 32,
            AsteroidSize::Custom { complexity, .. } => complexity,
        }
    }

    /// Get a human-readable name for this size
    pub fn name(self) -> &'static str {
        match self {
            AsteroidSize::Small => "Small",
            AsteroidSize::Medium => "Medium",
            AsteroidSize::Large => "Large",
            AsteroidSize::Custom { .. } => "Custom",
        }
    }
}

impl Default for AsteroidSize {
    fn default() -> Self {
        AsteroidSize::Medium
    }
}

/// Per-body generation parameters
///
/// The body seed and size multiplier come from the spawn record; everything
/// else comes from here. Two participants with equal configs and equal
/// records produce bit-identical meshes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AsteroidConfig {
    /// Size preset (base radius and complexity)
    pub size: AsteroidSize,

    /// Strength of the low-frequency shape displacement
    ///
    /// - 0.0: perfect sphere (plus secondary detail)
    /// - 0.3: lumpy rock (default)
    /// - 0.6+: very irregular, may fold near tunnel mouths
    pub radius_variation: f32,

    /// Frequency of the smooth shape field on the unit sphere
    pub shape_frequency: f32,

    /// Frequency of the cellular field used for tunnel wall texture
    pub hole_frequency: f32,

    /// Upper bound on tunnels per body before the hard cap of two
    ///
    /// 0 disables tunnels entirely.
    pub max_holes: u32,

    /// Number of rings along each tunnel
    pub tunnel_rings: u32,

    /// Number of vertices around each tunnel ring
    pub tunnel_segments: u32,

    /// Whether bodies carry a concave collision shape
    pub build_collision: bool,
}

impl AsteroidConfig {
    /// Base radius for this configuration
    #[inline]
    pub fn base_radius(&self) -> f32 {
        self.size.base_radius()
    }

    /// Surface sector count for this configuration
    #[inline]
    pub fn complexity(&self) -> u32 {
        self.size.complexity()
    }

    /// Number of latitude rings in the surface lattice
    #[inline]
    pub fn surface_rings(&self) -> u32 {
        self.complexity() / 2
    }

    /// Number of surface vertices before tunnel walls are appended
    #[inline]
    pub fn surface_vertex_count(&self) -> usize {
        ((self.surface_rings() + 1) * (self.complexity() + 1)) as usize
    }
}

impl Default for AsteroidConfig {
    fn default() -> Self {
        Self {
            size: AsteroidSize::default(),
            radius_variation: 0.3,
            shape_frequency: 1.5,
            hole_frequency: 2.0,
            max_holes: 2,
            tunnel_rings: 12,
            tunnel_segments: 16,
            build_collision: true,
        }
    }
}

/// Builder for creating AsteroidConfig with validation
///
/// # Example
///
/// ```rust
/// use rust_asteroid_field::*;
///
/// let config = AsteroidConfigBuilder::new()
///     .size(AsteroidSize::Large)
///     .radius_variation(0.4)
///     .unwrap()
///     .max_holes(1)
///     .build()
///     .unwrap();
/// assert_eq!(config.complexity(), 32);
/// ```
#[derive(Debug, Clone)]
pub struct AsteroidConfigBuilder {
    config: AsteroidConfig,
}

impl AsteroidConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: AsteroidConfig::default(),
        }
    }

    /// Set the size preset
    pub fn size(mut self, size: AsteroidSize) -> Self {
        self.config.size = size;
        self
    }

    /// Set the shape displacement strength
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0.0 <= variation < 1.0
    pub fn radius_variation(mut self, variation: f32) -> Result<Self> {
        if !(0.0..1.0).contains(&variation) {
            return Err(AsteroidError::InvalidConfig(format!(
                "radius variation must be in [0, 1) (got {})",
                variation
            )));
        }
        self.config.radius_variation = variation;
        Ok(self)
    }

    /// Set the smooth shape field frequency
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if frequency <= 0.0
    pub fn shape_frequency(mut self, frequency: f32) -> Result<Self> {
        self.config.shape_frequency = positive("shape frequency", frequency)?;
        Ok(self)
    }

    /// Set the cellular field frequency
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if frequency <= 0.0
    pub fn hole_frequency(mut self, frequency: f32) -> Result<Self> {
        self.config.hole_frequency = positive("hole frequency", frequency)?;
        Ok(self)
    }

    /// Set the maximum tunnel count (capped at two during planning)
    pub fn max_holes(mut self, max_holes: u32) -> Self {
        self.config.max_holes = max_holes;
        self
    }

    /// Set the tunnel lattice resolution
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if rings < 2 or segments < 3
    pub fn tunnel_resolution(mut self, rings: u32, segments: u32) -> Result<Self> {
        if rings < 2 || segments < 3 {
            return Err(AsteroidError::InvalidConfig(format!(
                "tunnel lattice needs >= 2 rings and >= 3 segments (got {}x{})",
                rings, segments
            )));
        }
        self.config.tunnel_rings = rings;
        self.config.tunnel_segments = segments;
        Ok(self)
    }

    /// Enable or disable collision shape derivation
    pub fn build_collision(mut self, enabled: bool) -> Self {
        self.config.build_collision = enabled;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the size preset has a non-positive radius
    /// or a complexity below 4
    pub fn build(self) -> Result<AsteroidConfig> {
        let size = self.config.size;
        if size.base_radius() <= 0.0 || !size.base_radius().is_finite() {
            return Err(AsteroidError::InvalidConfig(format!(
                "asteroid radius must be positive (got {})",
                size.base_radius()
            )));
        }
        if size.complexity() < 4 {
            return Err(AsteroidError::InvalidConfig(format!(
                "asteroid complexity must be >= 4 (got {})",
                size.complexity()
            )));
        }
        Ok(self.config)
    }
}

impl Default for AsteroidConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest body count a world may request
pub const MAX_BODY_COUNT: usize = 4096;

/// Placement volume and body count for one world generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldSettings {
    /// Edge length of the world cube; coordinates wrap at ±world_size/2
    pub world_size: f32,
    /// Number of bodies requested from the placement solver
    pub body_count: usize,
    /// Minimum distance between any two body centers
    ///
    /// The spawn zone around the origin is kept clear out to twice this.
    pub min_separation: f32,
    /// Distance kept free along each world face
    pub margin: f32,
    /// Fraction of the remaining half-extent that bodies may occupy
    pub bound_factor: f32,
    /// Smallest size multiplier handed to a body
    pub min_size_multiplier: f32,
    /// Largest size multiplier handed to a body
    pub max_size_multiplier: f32,
}

impl WorldSettings {
    /// Half-extent of the cube that placement samples from
    #[inline]
    pub fn placement_half_extent(&self) -> f32 {
        (self.world_size * 0.5 - self.margin).max(0.0) * self.bound_factor
    }

    /// Body count placement actually aims for, capped at [`MAX_BODY_COUNT`]
    #[inline]
    pub fn placement_target(&self) -> usize {
        self.body_count.min(MAX_BODY_COUNT)
    }

    /// Maximum number of placement attempts
    #[inline]
    pub fn max_attempts(&self) -> usize {
        self.placement_target() * 10
    }
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            world_size: 100.0,
            body_count: 4,
            min_separation: 8.0,
            margin: 5.0,
            bound_factor: 0.8,
            min_size_multiplier: 0.6,
            max_size_multiplier: 1.4,
        }
    }
}

/// Builder for creating WorldSettings with validation
///
/// # Example
///
/// ```rust
/// use rust_asteroid_field::*;
///
/// let settings = WorldSettingsBuilder::new()
///     .world_size(200.0)
///     .unwrap()
///     .body_count(12)
///     .build()
///     .unwrap();
/// assert_eq!(settings.max_attempts(), 120);
/// ```
#[derive(Debug, Clone)]
pub struct WorldSettingsBuilder {
    settings: WorldSettings,
}

impl WorldSettingsBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults: 100 unit world, 4 bodies, separation 8, margin 5,
    /// bound factor 0.8, size multipliers in [0.6, 1.4].
    pub fn new() -> Self {
        Self {
            settings: WorldSettings::default(),
        }
    }

    /// Set the world cube edge length
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size <= 0.0
    pub fn world_size(mut self, size: f32) -> Result<Self> {
        self.settings.world_size = positive("world size", size)?;
        Ok(self)
    }

    /// Set the number of bodies to place
    ///
    /// Checked against [`MAX_BODY_COUNT`] in [`WorldSettingsBuilder::build`].
    pub fn body_count(mut self, count: usize) -> Self {
        self.settings.body_count = count;
        self
    }

    /// Set the minimum separation between body centers
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if separation is negative
    pub fn min_separation(mut self, separation: f32) -> Result<Self> {
        self.settings.min_separation = non_negative("min separation", separation)?;
        Ok(self)
    }

    /// Set the margin kept free along each world face
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if margin is negative
    pub fn margin(mut self, margin: f32) -> Result<Self> {
        self.settings.margin = non_negative("margin", margin)?;
        Ok(self)
    }

    /// Set the fraction of the half-extent that bodies may occupy
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0.0 < factor <= 1.0
    pub fn bound_factor(mut self, factor: f32) -> Result<Self> {
        if !(factor > 0.0 && factor <= 1.0) {
            return Err(AsteroidError::InvalidConfig(format!(
                "bound factor must be in (0, 1] (got {})",
                factor
            )));
        }
        self.settings.bound_factor = factor;
        Ok(self)
    }

    /// Set the size multiplier range
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` unless 0.0 < min <= max
    pub fn size_multiplier_range(mut self, min: f32, max: f32) -> Result<Self> {
        if !(min > 0.0 && min <= max) {
            return Err(AsteroidError::InvalidConfig(format!(
                "size multiplier range must satisfy 0 < min <= max (got {}..{})",
                min, max
            )));
        }
        self.settings.min_size_multiplier = min;
        self.settings.max_size_multiplier = max;
        Ok(self)
    }

    /// Build the settings
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if body_count > [`MAX_BODY_COUNT`]
    pub fn build(self) -> Result<WorldSettings> {
        if self.settings.body_count > MAX_BODY_COUNT {
            return Err(AsteroidError::InvalidConfig(format!(
                "body count must be <= {} (got {})",
                MAX_BODY_COUNT, self.settings.body_count
            )));
        }
        Ok(self.settings)
    }
}

impl Default for WorldSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn positive(name: &str, value: f32) -> Result<f32> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(AsteroidError::InvalidConfig(format!(
            "{} must be positive (got {})",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f32) -> Result<f32> {
    if value >= 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(AsteroidError::InvalidConfig(format!(
            "{} must be >= 0 (got {})",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_presets() {
        assert_eq!(AsteroidSize::Small.base_radius(), 3.0);
        assert_eq!(AsteroidSize::Medium.base_radius(), 5.0);
        assert_eq!(AsteroidSize::Large.base_radius(), 8.0);
        assert_eq!(AsteroidSize::Medium.complexity(), 24);
        assert_eq!(AsteroidSize::default(), AsteroidSize::Medium);
    }

    #[test]
    fn test_size_custom() {
        let custom = AsteroidSize::Custom {
            radius: 12.0,
            complexity: 40,
        };
        assert_eq!(custom.base_radius(), 12.0);
        assert_eq!(custom.complexity(), 40);
        assert_eq!(custom.name(), "Custom");
    }

    #[test]
    fn test_surface_vertex_count() {
        let config = AsteroidConfig::default();
        assert_eq!(config.surface_rings(), 12);
        assert_eq!(config.surface_vertex_count(), 325);
    }

    #[test]
    fn test_builder_defaults() {
        let config = AsteroidConfigBuilder::new().build().unwrap();
        assert_eq!(config, AsteroidConfig::default());
        assert_eq!(config.max_holes, 2);
        assert!(config.build_collision);
    }

    #[test]
    fn test_builder_rejects_low_complexity() {
        let result = AsteroidConfigBuilder::new()
            .size(AsteroidSize::Custom {
                radius: 1.0,
                complexity: 3,
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_rejects_bad_radius() {
        let result = AsteroidConfigBuilder::new()
            .size(AsteroidSize::Custom {
                radius: 0.0,
                complexity: 8,
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_invalid_values() {
        assert!(AsteroidConfigBuilder::new().radius_variation(1.0).is_err());
        assert!(AsteroidConfigBuilder::new().radius_variation(-0.1).is_err());
        assert!(AsteroidConfigBuilder::new().shape_frequency(0.0).is_err());
        assert!(AsteroidConfigBuilder::new().hole_frequency(-1.0).is_err());
        assert!(AsteroidConfigBuilder::new().tunnel_resolution(1, 8).is_err());
        assert!(AsteroidConfigBuilder::new().tunnel_resolution(4, 2).is_err());
    }

    #[test]
    fn test_world_settings_defaults() {
        let settings = WorldSettingsBuilder::new().build().unwrap();
        assert_eq!(settings.world_size, 100.0);
        assert_eq!(settings.min_separation, 8.0);
        assert_eq!(settings.max_attempts(), 40);
        assert!((settings.placement_half_extent() - 36.0).abs() < 1e-5);
    }

    #[test]
    fn test_half_extent_never_negative() {
        let settings = WorldSettingsBuilder::new()
            .world_size(4.0)
            .unwrap()
            .margin(10.0)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(settings.placement_half_extent(), 0.0);
    }

    #[test]
    fn test_world_settings_body_count_cap() {
        assert!(WorldSettingsBuilder::new().body_count(MAX_BODY_COUNT).build().is_ok());
        let result = WorldSettingsBuilder::new().body_count(usize::MAX / 8).build();
        assert!(matches!(result, Err(AsteroidError::InvalidConfig(_))));
    }

    #[test]
    fn test_max_attempts_uses_capped_target() {
        let settings = WorldSettings {
            body_count: usize::MAX,
            ..WorldSettings::default()
        };
        assert_eq!(settings.placement_target(), MAX_BODY_COUNT);
        assert_eq!(settings.max_attempts(), MAX_BODY_COUNT * 10);
    }

    #[test]
    fn test_world_settings_invalid_values() {
        assert!(WorldSettingsBuilder::new().world_size(0.0).is_err());
        assert!(WorldSettingsBuilder::new().min_separation(-1.0).is_err());
        assert!(WorldSettingsBuilder::new().margin(f32::NAN).is_err());
        assert!(WorldSettingsBuilder::new().bound_factor(0.0).is_err());
        assert!(WorldSettingsBuilder::new().bound_factor(1.5).is_err());
        assert!(WorldSettingsBuilder::new()
            .size_multiplier_range(2.0, 1.0)
            .is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AsteroidConfigBuilder::new()
            .size(AsteroidSize::Small)
            .max_holes(1)
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: AsteroidConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);

        let settings = WorldSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let restored: WorldSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, restored);
    }
}
