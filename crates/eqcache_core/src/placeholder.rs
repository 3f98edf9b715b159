//! Placeholder tokens standing in for equations in document text.
//!
//! A token looks like `XEQUATIONX42XEQUATIONX`: plain ASCII letters and
//! digits, so it survives markdown and HTML processing untouched and needs
//! no escaping wherever it is embedded.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;

/// Marker surrounding the index of every placeholder token.
pub const PLACEHOLDER_MARKER: &str = "XEQUATIONX";

static PLACEHOLDER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn pattern() -> &'static Regex {
    PLACEHOLDER_PATTERN.get_or_init(|| {
        Regex::new(r"XEQUATIONX([0-9]+)XEQUATIONX").expect("Invalid placeholder pattern")
    })
}

/// A placeholder for one pending equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Placeholder(u64);

impl Placeholder {
    /// Returns the index of this placeholder.
    pub fn index(&self) -> u64 {
        self.0
    }

    /// Parses a complete token.
    pub fn parse(token: &str) -> Option<Self> {
        let digits = token
            .strip_prefix(PLACEHOLDER_MARKER)?
            .strip_suffix(PLACEHOLDER_MARKER)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok().map(Self)
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PLACEHOLDER_MARKER}{}{PLACEHOLDER_MARKER}", self.0)
    }
}

/// Finds every token in `text`, in order of appearance.
///
/// Tokens whose index does not fit in a `u64` are skipped.
pub fn find_placeholders(text: &str) -> Vec<(Range<usize>, Placeholder)> {
    pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let index = caps.get(1)?.as_str().parse().ok()?;
            Some((whole.range(), Placeholder(index)))
        })
        .collect()
}

/// An equation waiting to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEquation {
    /// TeX source as it appeared in the document.
    pub tex: String,
    /// Whether the equation is inline rather than display math.
    pub inline: bool,
}

/// Placeholders minted so far and the equations they stand for.
#[derive(Debug, Default)]
pub(crate) struct PlaceholderTable {
    next: u64,
    pending: HashMap<Placeholder, PendingEquation>,
}

impl PlaceholderTable {
    /// Records an equation under a fresh placeholder.
    pub(crate) fn mint(&mut self, tex: &str, inline: bool) -> Placeholder {
        let placeholder = Placeholder(self.next);
        self.next += 1;
        self.pending.insert(
            placeholder,
            PendingEquation {
                tex: tex.to_string(),
                inline,
            },
        );
        placeholder
    }

    pub(crate) fn get(&self, placeholder: Placeholder) -> Option<&PendingEquation> {
        self.pending.get(&placeholder)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
