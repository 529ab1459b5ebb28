//! Filters for the invocation-log view.

use super::StoreError;

/// Allowed page sizes for the log view.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

/// Widest day range accepted. SQLite date arithmetic yields NULL far past this.
pub const MAX_DAYS: u32 = 36_500;

/// Day range, tool-name filter and pagination for [`Store::invocations`](super::Store::invocations).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Only records from the last `days` days (1 to [`MAX_DAYS`])
    pub days: u32,
    /// Substring match on the tool name
    pub tool_filter: Option<String>,
    /// One of [`PAGE_SIZES`]
    pub per_page: usize,
    /// 1-based page number
    pub page: usize,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            days: 7,
            tool_filter: None,
            per_page: 25,
            page: 1,
        }
    }
}

impl LogQuery {
    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        if self.days == 0 {
            return Err(StoreError::InvalidQuery("days must be at least 1".to_string()));
        }
        if self.days > MAX_DAYS {
            return Err(StoreError::InvalidQuery(format!(
                "days must be at most {}, got {}",
                MAX_DAYS, self.days
            )));
        }
        if self.page == 0 {
            return Err(StoreError::InvalidQuery("page must be at least 1".to_string()));
        }
        if !PAGE_SIZES.contains(&self.per_page) {
            return Err(StoreError::InvalidQuery(format!(
                "per_page must be one of {:?}, got {}",
                PAGE_SIZES, self.per_page
            )));
        }
        self.offset().map(|_| ())
    }

    pub(crate) fn offset(&self) -> Result<usize, StoreError> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.per_page)
            .ok_or_else(|| StoreError::InvalidQuery(format!("page {} is out of range", self.page)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based_from_page() {
        let q = LogQuery {
            per_page: 25,
            page: 3,
            ..LogQuery::default()
        };
        assert_eq!(q.offset().unwrap(), 50);
    }

    #[test]
    fn huge_page_is_rejected_instead_of_overflowing() {
        let q = LogQuery {
            per_page: 10,
            page: usize::MAX,
            ..LogQuery::default()
        };
        assert!(matches!(q.offset(), Err(StoreError::InvalidQuery(_))));
        assert!(matches!(q.validate(), Err(StoreError::InvalidQuery(_))));
    }

    #[test]
    fn days_beyond_the_cap_are_invalid() {
        let at_cap = LogQuery {
            days: MAX_DAYS,
            ..LogQuery::default()
        };
        assert!(at_cap.validate().is_ok());

        let past_cap = LogQuery {
            days: MAX_DAYS + 1,
            ..LogQuery::default()
        };
        assert!(matches!(past_cap.validate(), Err(StoreError::InvalidQuery(_))));
    }

    #[test]
    fn zero_days_is_invalid() {
        let q = LogQuery {
            days: 0,
            ..LogQuery::default()
        };
        assert!(q.validate().is_err());
        assert!(LogQuery::default().validate().is_ok());
    }
}
