//! Fixed command ordinals used to name per-step log files
//!
//! The ordinal prefixes the log file name (`log/<ordinal>.<command>`), so a
//! directory listing of the log directory sorts in lifecycle order.

/// Ordinal for any command not listed in [`ORDINALS`].
pub const UNKNOWN_ORDINAL: u8 = 95;

/// Known commands and their ordinals.
pub static ORDINALS: &[(&str, u8)] = &[
    ("download", 0),
    ("prep", 1),
    ("compile", 2),
    ("test", 3),
    ("build", 4),
    ("install", 5),
    ("package", 6),
    ("package-test", 7),
    ("upload", 8),
    ("announce", 9),
    ("finish", 90),
    ("unknown", UNKNOWN_ORDINAL),
    ("all", 99),
];

/// Read-only view over a command → ordinal table.
#[derive(Debug, Clone, Copy)]
pub struct OrdinalTable {
    entries: &'static [(&'static str, u8)],
    unknown: u8,
}

impl OrdinalTable {
    /// The table shipped with cygport's command set.
    pub const fn standard() -> Self {
        Self {
            entries: ORDINALS,
            unknown: UNKNOWN_ORDINAL,
        }
    }

    /// Ordinal for `command`, or the unknown ordinal. Never fails.
    pub fn lookup(&self, command: &str) -> u8 {
        self.entries
            .iter()
            .find(|(name, _)| *name == command)
            .map(|(_, n)| *n)
            .unwrap_or(self.unknown)
    }

    /// Whether `command` has its own entry.
    pub fn is_known(&self, command: &str) -> bool {
        self.entries.iter().any(|(name, _)| *name == command)
    }
}

impl Default for OrdinalTable {
    fn default() -> Self {
        Self::standard()
    }
}
