use dashmap::DashMap;

/// In-memory set of revoked token ids.
///
/// Entries remember the token's `exp` so they can be pruned once the token
/// would have been rejected anyway. Tokens without `exp` stay listed for the
/// life of the process.
#[derive(Debug, Default)]
pub struct RevocationList {
    entries: DashMap<String, Option<i64>>,
}

impl RevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revoke(&self, jti: &str, exp: Option<i64>) {
        self.entries.insert(jti.to_owned(), exp);
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.entries.contains_key(jti)
    }

    /// Drop entries whose token expired before `now` (unix seconds).
    pub fn prune(&self, now: i64) {
        self.entries
            .retain(|_, exp| exp.is_none_or(|exp| exp >= now));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
