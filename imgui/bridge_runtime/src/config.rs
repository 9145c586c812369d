use serde::{Deserialize, Serialize};

const DEFAULT_TEXT_CAPACITY: usize = 256;
const DEFAULT_MULTILINE_CAPACITY: usize = 1024;
const DEFAULT_MAX_TEXT_BUFFER_BYTES: usize = 64 * 1024;
const DEFAULT_SCRATCH_CAPACITY: usize = 4096;

/// Renderer limits. `from_env` overrides each field from an `IMGUI_BRIDGE_*` variable;
/// `from_json` reads the same fields as camelCase keys, missing keys keeping defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    /// Default `maxLength`, in characters, of single-line text inputs.
    pub text_capacity: usize,
    /// Default `maxLength`, in characters, of multiline text inputs.
    pub multiline_capacity: usize,
    /// Upper bound on any editable text buffer handed to the native library.
    pub max_text_buffer_bytes: usize,
    /// Initial size of the frame scratch arena.
    pub scratch_capacity: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            text_capacity: DEFAULT_TEXT_CAPACITY,
            multiline_capacity: DEFAULT_MULTILINE_CAPACITY,
            max_text_buffer_bytes: DEFAULT_MAX_TEXT_BUFFER_BYTES,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
        }
    }
}

impl RendererConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let capacity = |key: &str, default: usize| parse_capacity(lookup(key), default);

        Self {
            text_capacity: capacity("IMGUI_BRIDGE_TEXT_CAPACITY", DEFAULT_TEXT_CAPACITY),
            multiline_capacity: capacity(
                "IMGUI_BRIDGE_MULTILINE_CAPACITY",
                DEFAULT_MULTILINE_CAPACITY,
            ),
            max_text_buffer_bytes: capacity(
                "IMGUI_BRIDGE_MAX_TEXT_BYTES",
                DEFAULT_MAX_TEXT_BUFFER_BYTES,
            ),
            scratch_capacity: capacity("IMGUI_BRIDGE_SCRATCH_CAPACITY", DEFAULT_SCRATCH_CAPACITY),
        }
    }

    /// Zero limits are replaced by their defaults, like zero environment values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.with_positive_limits())
    }

    fn with_positive_limits(self) -> Self {
        let defaults = Self::default();
        let positive = |value: usize, default: usize| if value > 0 { value } else { default };
        Self {
            text_capacity: positive(self.text_capacity, defaults.text_capacity),
            multiline_capacity: positive(self.multiline_capacity, defaults.multiline_capacity),
            max_text_buffer_bytes: positive(
                self.max_text_buffer_bytes,
                defaults.max_text_buffer_bytes,
            ),
            scratch_capacity: positive(self.scratch_capacity, defaults.scratch_capacity),
        }
    }

    /// Bytes needed to edit up to `max_chars` characters plus the NUL terminator.
    pub fn text_buffer_len(&self, max_chars: usize) -> usize {
        max_chars
            .saturating_mul(4)
            .saturating_add(1)
            .min(self.max_text_buffer_bytes.max(1))
    }
}

fn parse_capacity(raw: Option<String>, default: usize) -> usize {
    raw.and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(default)
}
