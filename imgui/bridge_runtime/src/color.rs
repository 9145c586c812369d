use serde_json::Value;

/// An 8-bit RGBA color as accepted from props: `#RRGGBB`, `#RRGGBBAA` or `{r,g,b,a}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Rgba {
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parses a prop value. Anything unparseable is opaque white.
    pub fn from_value(value: &Value) -> Self {
        let parsed = match value {
            Value::String(hex) => Self::parse_hex(hex),
            Value::Object(map) => {
                let channel = |key: &str, missing: Option<f64>| {
                    map.get(key)
                        .and_then(crate::props::coerce_number)
                        .or(missing)
                        .and_then(channel_byte)
                };
                match (
                    channel("r", None),
                    channel("g", None),
                    channel("b", None),
                    channel("a", Some(255.0)),
                ) {
                    (Some(r), Some(g), Some(b), Some(a)) => Some(Self::new(r, g, b, a)),
                    _ => None,
                }
            }
            _ => None,
        };

        parsed.unwrap_or(Self::WHITE)
    }

    fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.strip_prefix('#')?;
        if hex.len() != 6 && hex.len() != 8 {
            return None;
        }

        let byte = |at: usize| {
            hex.get(at..at + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
        };
        let alpha = if hex.len() == 8 { byte(6)? } else { 255 };
        Some(Self::new(byte(0)?, byte(2)?, byte(4)?, alpha))
    }

    /// Channels scaled to `0.0..=1.0`, as native color widgets take them.
    pub fn to_vec4(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| f32::from(c) / 255.0)
    }

    /// Draw-list encoding: `A << 24 | B << 16 | G << 8 | R`.
    pub fn to_packed(self) -> u32 {
        u32::from_le_bytes([self.r, self.g, self.b, self.a])
    }

    /// Reads back a normalized color written by a native widget.
    pub fn from_vec4(color: [f32; 4]) -> Self {
        let [r, g, b, a] = color.map(normalized_byte);
        Self::new(r, g, b, a)
    }

    pub fn to_value(self, with_alpha: bool) -> Value {
        if with_alpha {
            serde_json::json!({ "r": self.r, "g": self.g, "b": self.b, "a": self.a })
        } else {
            serde_json::json!({ "r": self.r, "g": self.g, "b": self.b })
        }
    }
}

fn channel_byte(value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn normalized_byte(component: f32) -> u8 {
    if !component.is_finite() {
        return 0;
    }
    (component * 255.0).round().clamp(0.0, 255.0) as u8
}
