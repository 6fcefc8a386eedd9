use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlinkModeSetting {
    Sharp,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundModeSetting {
    White,
    Textured,
}

impl<'de> Deserialize<'de> for BackgroundModeSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_background_mode(&raw).map_err(de::Error::custom)
    }
}

pub fn parse_background_mode(raw: &str) -> Result<BackgroundModeSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "white" | "whitefill" | "white-fill" | "white_fill" => Ok(BackgroundModeSetting::White),
        "textured" | "texture" => Ok(BackgroundModeSetting::Textured),
        other => Err(format!(
            "invalid background mode '{other}'; expected white or textured"
        )),
    }
}

pub fn parse_blink_mode(raw: &str) -> Result<BlinkModeSetting, String> {
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "sharp" | "quick" => Ok(BlinkModeSetting::Sharp),
        "smooth" | "relaxed" => Ok(BlinkModeSetting::Smooth),
        other => Err(format!(
            "invalid blink mode '{other}'; expected sharp or smooth"
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternSetting {
    Checker,
    Gradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterSetting {
    Nearest,
    #[default]
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlphaSetting {
    #[default]
    Transparent,
    Opaque,
}

/// Root of an effect configuration file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EffectFile {
    pub version: u32,
    #[serde(default)]
    pub blink: BlinkSection,
    #[serde(default)]
    pub background: BackgroundSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub playback: PlaybackSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BlinkSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<BlinkModeSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharp_amplitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smooth_amplitude: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_floor: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BackgroundSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<BackgroundModeSetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<TextureSection>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TextureSection {
    #[serde(default = "default_pattern")]
    pub pattern: PatternSetting,
    #[serde(default = "default_texture_size")]
    pub width: u32,
    #[serde(default = "default_texture_size")]
    pub height: u32,
    #[serde(default = "default_cells")]
    pub cells: u32,
    #[serde(default)]
    pub filter: FilterSetting,
    #[serde(default = "default_colors")]
    pub colors: [[f32; 3]; 2],
}

/// Largest texture width or height accepted from a config file.
pub const MAX_TEXTURE_SIZE: u32 = 16384;

impl Default for TextureSection {
    fn default() -> Self {
        Self {
            pattern: default_pattern(),
            width: default_texture_size(),
            height: default_texture_size(),
            cells: default_cells(),
            filter: FilterSetting::default(),
            colors: default_colors(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct OutputSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<AlphaSetting>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PlaybackSection {
    #[serde(
        default,
        deserialize_with = "deserialize_duration_opt",
        serialize_with = "serialize_duration_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub still_time: Option<Duration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f32>,
}

fn default_pattern() -> PatternSetting {
    PatternSetting::Checker
}

fn default_texture_size() -> u32 {
    256
}

fn default_cells() -> u32 {
    8
}

fn default_colors() -> [[f32; 3]; 2] {
    [[0.9, 0.9, 0.9], [0.2, 0.2, 0.2]]
}

fn deserialize_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_secs(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Some(Duration::from_secs(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if !v.is_finite() || v.is_sign_negative() {
                return Err(E::custom("duration must be finite and non-negative"));
            }
            Duration::try_from_secs_f64(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration {v}: {err}")))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Visitor)
}

fn serialize_duration_opt<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(duration) => serializer.serialize_f64(duration.as_secs_f64()),
        None => serializer.serialize_none(),
    }
}

impl Default for EffectFile {
    fn default() -> Self {
        Self {
            version: 1,
            blink: BlinkSection::default(),
            background: BackgroundSection::default(),
            output: OutputSection::default(),
            playback: PlaybackSection::default(),
        }
    }
}

impl EffectFile {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: EffectFile = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Still-frame timestamp in seconds, if configured.
    pub fn still_time_secs(&self) -> Option<f32> {
        self.playback.still_time.map(|d| d.as_secs_f32())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != 1 {
            return Err(ConfigError::Invalid(format!(
                "unsupported config version {}; expected 1",
                self.version
            )));
        }

        let tuning = [
            ("blink.speed", self.blink.speed),
            ("blink.sharp_amplitude", self.blink.sharp_amplitude),
            ("blink.smooth_amplitude", self.blink.smooth_amplitude),
            ("blink.wave_floor", self.blink.wave_floor),
        ];
        for (name, value) in tuning {
            if let Some(value) = value {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConfigError::Invalid(format!(
                        "{name} must be finite and greater than zero"
                    )));
                }
            }
        }

        if let Some(texture) = &self.background.texture {
            if texture.width == 0 || texture.height == 0 {
                return Err(ConfigError::Invalid(
                    "background.texture width and height must be greater than zero".into(),
                ));
            }
            if texture.width > MAX_TEXTURE_SIZE || texture.height > MAX_TEXTURE_SIZE {
                return Err(ConfigError::Invalid(format!(
                    "background.texture {}x{} exceeds {MAX_TEXTURE_SIZE} texels per axis",
                    texture.width, texture.height
                )));
            }
            if texture.cells == 0 {
                return Err(ConfigError::Invalid(
                    "background.texture cells must be greater than zero".into(),
                ));
            }
            for color in &texture.colors {
                if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                    return Err(ConfigError::Invalid(format!(
                        "background.texture color {color:?} has channels outside [0, 1]"
                    )));
                }
            }
        }

        if let Some(fps) = self.playback.fps {
            if !fps.is_finite() || fps < 0.0 {
                return Err(ConfigError::Invalid("playback.fps must be >= 0".into()));
            }
        }

        Ok(())
    }
}
