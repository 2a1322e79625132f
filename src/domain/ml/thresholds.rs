use serde::{Deserialize, Serialize};

/// Strict comparison against a fixed cutoff, used by the rule tables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Threshold {
    Above(f64),
    Below(f64),
}

impl Threshold {
    pub fn matches(self, value: f64) -> bool {
        match self {
            Threshold::Above(cutoff) => value > cutoff,
            Threshold::Below(cutoff) => value < cutoff,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_are_strict() {
        assert!(Threshold::Above(2.0).matches(2.01));
        assert!(!Threshold::Above(2.0).matches(2.0));
        assert!(Threshold::Below(30.0).matches(29.99));
        assert!(!Threshold::Below(30.0).matches(30.0));
    }
}
