use crate::Fan;
use serde::Deserialize;
use serde::Serialize;

/// How the fans of several matched patterns fold into one value.
/// A hand matching no pattern is always worth 1. Folding saturates at
/// `Fan::MAX` rather than wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    #[default]
    Additive,
    Multiplicative,
}

impl Combination {
    pub fn combine<I>(&self, fans: I) -> Fan
    where
        I: IntoIterator<Item = Fan>,
    {
        let mut fans = fans.into_iter().peekable();
        if fans.peek().is_none() {
            return 1;
        }
        match self {
            Combination::Additive => fans.fold(0, Fan::saturating_add),
            Combination::Multiplicative => fans.fold(1, Fan::saturating_mul),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn empty_is_one() {
        assert_eq!(Combination::Additive.combine([]), 1);
        assert_eq!(Combination::Multiplicative.combine([]), 1);
    }
    #[test]
    fn additive_sums() {
        assert_eq!(Combination::Additive.combine([2, 4, 1]), 7);
    }
    #[test]
    fn multiplicative_multiplies() {
        assert_eq!(Combination::Multiplicative.combine([2, 4, 1]), 8);
        assert_eq!(Combination::Multiplicative.combine([2]), 2);
    }
    #[test]
    fn huge_fans_saturate() {
        assert_eq!(Combination::Multiplicative.combine([70_000, 70_000]), Fan::MAX);
        assert_eq!(Combination::Additive.combine([Fan::MAX, 1]), Fan::MAX);
    }
}
