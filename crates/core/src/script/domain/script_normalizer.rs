/// Domain interface for deterministic character-variant conversion.
///
/// Normalization is a pure table lookup: it cannot fail and the same input
/// always produces the same output.
pub trait ScriptNormalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Normalizer that returns its input unchanged.
pub struct IdentityNormalizer;

impl ScriptNormalizer for IdentityNormalizer {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_returns_input() {
        assert_eq!(IdentityNormalizer.normalize("简体 hello"), "简体 hello");
    }
}
