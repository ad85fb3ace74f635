use crate::error::TaskdeskError;

pub const TASK_PREFIX: &str = "T";
pub const TASK_GROUP_PREFIX: &str = "TG";

/// Monotonic display-id generator (`T-001`, `TG-012`, ...).
///
/// The counter only ever moves forward: every id that enters a store is
/// observed, so a freshly minted suffix is one past the highest suffix seen in
/// this session, and deleting a record never frees its id for reuse. Once the
/// counter reaches `u32::MAX` nothing more can be minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    prefix: &'static str,
    highest: u32,
}

impl IdSequence {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, highest: 0 }
    }

    pub fn tasks() -> Self {
        Self::new(TASK_PREFIX)
    }

    pub fn task_groups() -> Self {
        Self::new(TASK_GROUP_PREFIX)
    }

    /// Id the next call to [`IdSequence::mint`] would return.
    pub fn peek(&self) -> Option<String> {
        let next = self.highest.checked_add(1)?;
        Some(format_id(self.prefix, next))
    }

    pub fn mint(&mut self) -> Result<String, TaskdeskError> {
        let next = self
            .highest
            .checked_add(1)
            .ok_or_else(|| TaskdeskError::ids_exhausted(self.prefix))?;
        self.highest = next;
        Ok(format_id(self.prefix, next))
    }

    /// How many more ids can be minted.
    pub fn remaining(&self) -> u32 {
        u32::MAX - self.highest
    }

    /// Raise the counter past `id` if it carries this sequence's prefix.
    pub fn observe(&mut self, id: &str) {
        if let Some(n) = parse_suffix(self.prefix, id) {
            self.highest = self.highest.max(n);
        }
    }
}

pub fn format_id(prefix: &str, n: u32) -> String {
    format!("{prefix}-{n:03}")
}

/// Numeric suffix of `PREFIX-NNN`, or `None` for anything else.
pub fn parse_suffix(prefix: &str, id: &str) -> Option<u32> {
    let rest = id.strip_prefix(prefix)?.strip_prefix('-')?;
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}
