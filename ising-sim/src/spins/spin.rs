use serde::{Deserialize, Serialize};

/// Binary site state. Numerically `Up = +1`, `Down = -1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spin {
    Up,
    Down,
}

impl Spin {
    #[inline]
    pub fn value(self) -> i8 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_and_flip() {
        assert_eq!(Spin::Up.value(), 1);
        assert_eq!(Spin::Down.value(), -1);
        assert_eq!(Spin::Up.flipped(), Spin::Down);
        assert_eq!(Spin::Down.flipped().flipped(), Spin::Down);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&Spin::Up).unwrap(), "\"up\"");
        assert_eq!(serde_json::to_string(&Spin::Down).unwrap(), "\"down\"");
    }
}
