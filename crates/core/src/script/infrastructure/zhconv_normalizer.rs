use zhconv::{zhconv, Variant};

use crate::script::domain::script_normalizer::ScriptNormalizer;

/// Converts Simplified Chinese to Traditional Chinese as written in Taiwan,
/// including regional vocabulary (e.g. 软件 → 軟體), using the conversion
/// tables compiled into zhconv.
pub struct ZhconvNormalizer {
    variant: Variant,
}

impl ZhconvNormalizer {
    pub fn taiwan() -> Self {
        Self {
            variant: Variant::ZhTW,
        }
    }
}

impl Default for ZhconvNormalizer {
    fn default() -> Self {
        Self::taiwan()
    }
}

impl ScriptNormalizer for ZhconvNormalizer {
    fn normalize(&self, text: &str) -> String {
        zhconv(text, self.variant)
    }
}
