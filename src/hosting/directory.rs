use crate::ID;
use crate::Member;
use std::collections::HashMap;

/// Maps a bearer credential to the player it authenticates.
/// Identity is issued elsewhere; rooms only ever see the resolved ID.
pub trait Directory: Send + Sync {
    fn resolve(&self, token: &str) -> Option<ID<Member>>;
}

/// Accepts any well-formed player ID as its own credential.
/// Only suitable behind a gateway that has already authenticated.
#[derive(Debug, Default, Clone, Copy)]
pub struct Trusting;

impl Directory for Trusting {
    fn resolve(&self, token: &str) -> Option<ID<Member>> {
        ID::try_from(token).ok()
    }
}

/// Fixed token table.
#[derive(Debug, Default, Clone)]
pub struct Roster(HashMap<String, ID<Member>>);

impl Roster {
    pub fn insert(&mut self, token: impl Into<String>, player: ID<Member>) {
        self.0.insert(token.into(), player);
    }
}

impl Directory for Roster {
    fn resolve(&self, token: &str) -> Option<ID<Member>> {
        self.0.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn trusting_parses_ids() {
        let id = ID::<Member>::default();
        assert_eq!(Trusting.resolve(&id.to_string()), Some(id));
        assert_eq!(Trusting.resolve("nobody"), None);
    }
    #[test]
    fn roster_knows_only_its_tokens() {
        let id = ID::<Member>::default();
        let mut roster = Roster::default();
        roster.insert("abc", id);
        assert_eq!(roster.resolve("abc"), Some(id));
        assert_eq!(roster.resolve(&id.to_string()), None);
    }
}
