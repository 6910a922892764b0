//! Stopping policy

/// How many records a run emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopPolicy {
    /// Exactly this many records, every record to every sink
    Exact(u64),
    /// Until cancelled; bounded sinks take only the first `bounded_cap` records
    Unbounded { bounded_cap: u64 },
}

impl StopPolicy {
    /// Decide the policy from the configured limit
    ///
    /// - `limit > 0`: exactly `limit` records
    /// - `limit == 0` with a queue sink: unbounded, bounded sinks capped at `ceiling`
    /// - `limit == 0` otherwise: `ceiling` records
    pub fn resolve(limit: u64, ceiling: u64, has_unbounded_sink: bool) -> Self {
        if limit > 0 {
            Self::Exact(limit)
        } else if has_unbounded_sink {
            Self::Unbounded {
                bounded_cap: ceiling,
            }
        } else {
            Self::Exact(ceiling)
        }
    }

    /// Record count at which the run completes by itself
    pub fn target(self) -> Option<u64> {
        match self {
            Self::Exact(n) => Some(n),
            Self::Unbounded { .. } => None,
        }
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded { .. })
    }
}
