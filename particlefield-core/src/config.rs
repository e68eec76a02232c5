//! Particle field configuration
//!
//! Every option group carries a complete default. A user override is a partial
//! JSON document that gets deep-merged over the serialized defaults and then read
//! back into the typed schema, so misspelled option names are rejected instead of
//! silently ignored. Ranges are not validated here; the engine clamps what it
//! cannot use.

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::deep_merge;

/// Fully resolved configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub particles: ParticleOptions,
    pub interactivity: InteractivityOptions,
    /// Double the backing store on high-density displays
    pub retina_detect: bool,
}

impl Config {
    /// Resolve an optional override against the defaults
    pub fn resolve(overrides: Option<&Value>) -> ConfigResult<Self> {
        let mut merged = serde_json::to_value(Self::default())?;
        if let Some(overrides) = overrides {
            match overrides {
                Value::Object(_) => deep_merge(&mut merged, overrides),
                Value::Null => {}
                Value::Array(_) => return Err(ConfigError::NotAMapping("an array")),
                Value::String(_) => return Err(ConfigError::NotAMapping("a string")),
                Value::Number(_) => return Err(ConfigError::NotAMapping("a number")),
                Value::Bool(_) => return Err(ConfigError::NotAMapping("a boolean")),
            }
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// Resolve an override given as JSON text; empty text means "no override"
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        if text.trim().is_empty() {
            return Self::resolve(None);
        }
        let overrides: Value = serde_json::from_str(text)?;
        Self::resolve(Some(&overrides))
    }

    /// Serialize back to the document form the override is merged into
    pub fn to_value(&self) -> ConfigResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Options that shape each particle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleOptions {
    pub number: NumberOptions,
    pub color: ColorOptions,
    pub shape: ShapeOptions,
    pub opacity: OpacityOptions,
    pub size: SizeOptions,
    pub line_linked: LineLinkedOptions,
    #[serde(rename = "move")]
    pub movement: MoveOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberOptions {
    /// Particle count. Negative values are treated as zero.
    pub value: i64,
    pub density: DensityOptions,
}

impl Default for NumberOptions {
    fn default() -> Self {
        Self {
            value: 80,
            density: DensityOptions::default(),
        }
    }
}

/// Area-driven count: `value` particles per `value_area` thousand square units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DensityOptions {
    pub enable: bool,
    pub value_area: f64,
}

impl Default for DensityOptions {
    fn default() -> Self {
        Self {
            enable: false,
            value_area: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorOptions {
    pub value: ColorValue,
}

/// A single CSS color, a palette to pick from, or `"random"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorValue {
    One(String),
    Palette(Vec<String>),
}

impl Default for ColorValue {
    fn default() -> Self {
        Self::One("#000000".to_string())
    }
}

impl ColorValue {
    /// Pick the color for a newly created particle
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        match self {
            Self::One(color) if color.eq_ignore_ascii_case("random") => random_hex(rng),
            Self::One(color) => color.clone(),
            Self::Palette(colors) if colors.is_empty() => Self::default().pick(rng),
            Self::Palette(colors) => {
                let color = &colors[rng.gen_range(0..colors.len())];
                Self::One(color.clone()).pick(rng)
            }
        }
    }
}

fn random_hex<R: Rng + ?Sized>(rng: &mut R) -> String {
    let [r, g, b]: [u8; 3] = rng.r#gen();
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShapeOptions {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    pub stroke: StrokeOptions,
    pub polygon: PolygonOptions,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Circle,
    #[serde(alias = "edge")]
    Square,
    Triangle,
    Polygon,
}

/// Outline drawn after the fill when `width > 0`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StrokeOptions {
    pub width: f64,
    pub color: String,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            width: 0.0,
            color: "#000000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolygonOptions {
    /// Polygons with fewer than three sides are not drawn
    pub nb_sides: i64,
}

impl Default for PolygonOptions {
    fn default() -> Self {
        Self { nb_sides: 5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpacityOptions {
    pub value: f64,
    /// Start each particle at a uniformly random opacity instead of `value`
    pub random: bool,
    pub anim: OpacityAnimation,
}

impl Default for OpacityOptions {
    fn default() -> Self {
        Self {
            value: 1.0,
            random: false,
            anim: OpacityAnimation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpacityAnimation {
    pub enable: bool,
    pub speed: f64,
    pub opacity_min: f64,
    pub sync: bool,
}

impl Default for OpacityAnimation {
    fn default() -> Self {
        Self {
            enable: false,
            speed: 2.0,
            opacity_min: 0.0,
            sync: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeOptions {
    /// Base radius
    pub value: f64,
    /// Scale each particle's radius by a uniformly random factor
    pub random: bool,
    pub anim: SizeAnimation,
}

impl Default for SizeOptions {
    fn default() -> Self {
        Self {
            value: 20.0,
            random: false,
            anim: SizeAnimation::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SizeAnimation {
    pub enable: bool,
    pub speed: f64,
    pub size_min: f64,
    pub sync: bool,
}

impl Default for SizeAnimation {
    fn default() -> Self {
        Self {
            enable: false,
            speed: 20.0,
            size_min: 0.0,
            sync: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LineLinkedOptions {
    pub enable: bool,
    /// Link threshold; zero or negative disables linking
    pub distance: f64,
    pub color: String,
    pub opacity: f64,
    pub width: f64,
}

impl Default for LineLinkedOptions {
    fn default() -> Self {
        Self {
            enable: true,
            distance: 100.0,
            color: "#000000".to_string(),
            opacity: 1.0,
            width: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoveOptions {
    pub enable: bool,
    pub speed: f64,
    pub direction: Direction,
    /// Scale each particle's speed by a uniformly random factor
    pub random: bool,
    /// With direction `none`, keep the heading sampled at creation
    pub straight: bool,
    pub out_mode: OutMode,
    /// Particle-to-particle bounce. Accepted but not simulated.
    pub bounce: bool,
    pub attract: AttractOptions,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            enable: true,
            speed: 2.0,
            direction: Direction::None,
            random: false,
            straight: false,
            out_mode: OutMode::Out,
            bounce: false,
            attract: AttractOptions::default(),
        }
    }
}

/// Heading of every particle; `None` samples a random angle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    None,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    TopLeft,
}

/// What happens to a particle leaving the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutMode {
    /// Wrap around to the opposite edge
    #[default]
    Out,
    /// Reflect off the edge
    Bounce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttractOptions {
    pub enable: bool,
    #[serde(rename = "rotateX")]
    pub rotate_x: f64,
    #[serde(rename = "rotateY")]
    pub rotate_y: f64,
}

impl Default for AttractOptions {
    fn default() -> Self {
        Self {
            enable: false,
            rotate_x: 3000.0,
            rotate_y: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractivityOptions {
    pub detect_on: DetectOn,
    pub events: EventOptions,
    pub modes: ModeOptions,
}

/// Where pointer input is evaluated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectOn {
    /// Only while the pointer is over the canvas
    #[default]
    Canvas,
    /// Anywhere in the viewport
    Window,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventOptions {
    pub onhover: EventToggle,
    pub onclick: EventToggle,
    /// Resample particles when the window resizes
    pub resize: bool,
}

impl Default for EventOptions {
    fn default() -> Self {
        Self {
            onhover: EventToggle {
                enable: true,
                mode: InteractMode::Grab,
            },
            onclick: EventToggle {
                enable: true,
                mode: InteractMode::Push,
            },
            resize: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventToggle {
    pub enable: bool,
    pub mode: InteractMode,
}

impl Default for EventToggle {
    fn default() -> Self {
        Self {
            enable: false,
            mode: InteractMode::Grab,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractMode {
    Grab,
    Bubble,
    Repulse,
    Push,
    Remove,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModeOptions {
    pub grab: GrabOptions,
    pub bubble: BubbleOptions,
    pub repulse: RepulseOptions,
    pub push: PushOptions,
    pub remove: RemoveOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrabOptions {
    pub distance: f64,
    pub line_linked: GrabLineOptions,
}

impl Default for GrabOptions {
    fn default() -> Self {
        Self {
            distance: 100.0,
            line_linked: GrabLineOptions::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrabLineOptions {
    pub opacity: f64,
}

impl Default for GrabLineOptions {
    fn default() -> Self {
        Self { opacity: 1.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BubbleOptions {
    pub distance: f64,
    /// Target radius at the pointer
    pub size: f64,
    /// Seconds for a click bubble to grow (and again to shrink back)
    pub duration: f64,
    /// Target opacity at the pointer
    pub opacity: f64,
}

impl Default for BubbleOptions {
    fn default() -> Self {
        Self {
            distance: 200.0,
            size: 80.0,
            duration: 0.4,
            opacity: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepulseOptions {
    pub distance: f64,
    /// Seconds for a click repulse to decay
    pub duration: f64,
}

impl Default for RepulseOptions {
    fn default() -> Self {
        Self {
            distance: 200.0,
            duration: 0.4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PushOptions {
    pub particles_nb: i64,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self { particles_nb: 4 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RemoveOptions {
    pub particles_nb: i64,
}

impl Default for RemoveOptions {
    fn default() -> Self {
        Self { particles_nb: 2 }
    }
}
