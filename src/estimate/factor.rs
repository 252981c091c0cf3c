//! Multiplier lookup with an explicit fallback branch.
//!
//! Unknown store names or frequency buckets never fail an estimate. Instead
//! the lookup returns `Factor::Fallback`, which contributes a neutral `1.0`
//! and is visible to callers (and in logs).

use tracing::debug;

/// Value contributed by an unknown key.
pub const NEUTRAL_FACTOR: f64 = 1.0;

/// Result of a multiplier lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Factor {
    /// The key was found in the table.
    Known(f64),
    /// The key was not recognized; the neutral multiplier applies.
    Fallback,
}

impl Factor {
    pub fn value(self) -> f64 {
        match self {
            Factor::Known(v) => v,
            Factor::Fallback => NEUTRAL_FACTOR,
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Factor::Fallback)
    }
}

/// Look `key` up in `table`, comparing normalized keys.
///
/// `what` names the table in the debug line emitted on fallback.
pub fn lookup(table: &[(&str, f64)], key: &str, what: &str) -> Factor {
    let wanted = normalize_key(key);
    match table.iter().find(|(k, _)| normalize_key(k) == wanted) {
        Some((_, v)) => Factor::Known(*v),
        None => {
            debug!(table = what, key, "unknown key; using neutral multiplier");
            Factor::Fallback
        }
    }
}

/// Case-insensitive key form: trimmed, lowercase, `_` as space, en/em dashes
/// as `-`, internal whitespace collapsed.
pub fn normalize_key(key: &str) -> String {
    key.trim()
        .to_lowercase()
        .replace(['\u{2013}', '\u{2014}'], "-")
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: [(&str, f64); 2] = [("Super C", 0.95), ("1-2x", 1.05)];

    #[test]
    fn known_keys_match_loosely() {
        assert_eq!(lookup(&TABLE, "super_c", "store"), Factor::Known(0.95));
        assert_eq!(lookup(&TABLE, "  SUPER   c ", "store"), Factor::Known(0.95));
        assert_eq!(lookup(&TABLE, "1\u{2013}2x", "freq"), Factor::Known(1.05));
    }

    #[test]
    fn unknown_keys_fall_back_to_neutral() {
        let f = lookup(&TABLE, "Whole Foods", "store");
        assert!(f.is_fallback());
        assert_eq!(f.value(), 1.0);
    }
}
