/// Default page size when the caller supplies none (or garbage).
pub const DEFAULT_LIMIT: usize = 100;
/// Hard ceiling on page size, regardless of what the caller asks for.
pub const MAX_LIMIT: usize = 1000;

/// The (offset, limit) slice of a collection returned by one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: usize,
    pub offset: usize,
}

impl PageWindow {
    /// Derive a bounded window from raw query parameters.
    ///
    /// Parameters arrive as raw strings so that non-numeric input falls back
    /// to the default instead of being rejected at extraction time. A negative
    /// `limit` is treated the same as unparseable input; `offset` has no upper
    /// bound — a window past the end of a collection just yields zero rows.
    pub fn from_params(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit
            .and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|l| *l >= 0)
            .map(|l| l as usize)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);

        let offset = offset
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(|o| o.max(0) as usize)
            .unwrap_or(0);

        Self { limit, offset }
    }
}
