use time::{Date, Duration, OffsetDateTime};
use uuid::Uuid;

/// The server's current calendar day. Standups are keyed by this, never by a
/// client-supplied date.
pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Filters for the team view, applied in a fixed order: date equality, then
/// week range, then user membership. All are independently combinable; a
/// `date` outside the week range legitimately yields nothing.
#[derive(Debug, Clone)]
pub struct TeamQuery {
    pub date: Option<Date>,
    /// Anchor day for `range=week`; the range is the 7 days ending here.
    pub week_of: Option<Date>,
    pub user_ids: Vec<Uuid>,
}

impl TeamQuery {
    /// No filter supplied at all. This is the branch point for the team
    /// snapshot: unfiltered queries collapse to the latest standup per user,
    /// while any filter returns every matching row ungrouped.
    pub fn is_unfiltered(&self) -> bool {
        self.date.is_none() && self.week_of.is_none() && self.user_ids.is_empty()
    }

    /// Inclusive `[anchor - 6 days, anchor]` bounds when a week range is set.
    pub fn week_bounds(&self) -> Option<(Date, Date)> {
        self.week_of.map(|end| (end - Duration::days(6), end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn no_filters_means_snapshot() {
        let q = TeamQuery {
            date: None,
            week_of: None,
            user_ids: vec![],
        };
        assert!(q.is_unfiltered());
    }

    #[test]
    fn any_filter_suppresses_grouping() {
        let base = TeamQuery {
            date: None,
            week_of: None,
            user_ids: vec![],
        };

        let by_date = TeamQuery {
            date: Some(date!(2025 - 04 - 29)),
            ..base.clone()
        };
        assert!(!by_date.is_unfiltered());

        let by_week = TeamQuery {
            week_of: Some(date!(2025 - 04 - 29)),
            ..base.clone()
        };
        assert!(!by_week.is_unfiltered());

        let by_user = TeamQuery {
            user_ids: vec![Uuid::new_v4()],
            ..base
        };
        assert!(!by_user.is_unfiltered());
    }

    #[test]
    fn week_bounds_cover_seven_days_inclusive() {
        let q = TeamQuery {
            date: None,
            week_of: Some(date!(2025 - 04 - 29)),
            user_ids: vec![],
        };
        let (start, end) = q.week_bounds().unwrap();
        assert_eq!(start, date!(2025 - 04 - 23));
        assert_eq!(end, date!(2025 - 04 - 29));
        assert_eq!((end - start).whole_days(), 6);
    }

    #[test]
    fn week_bounds_cross_month_boundary() {
        let q = TeamQuery {
            date: None,
            week_of: Some(date!(2025 - 05 - 02)),
            user_ids: vec![],
        };
        let (start, _) = q.week_bounds().unwrap();
        assert_eq!(start, date!(2025 - 04 - 26));
    }

    #[test]
    fn no_week_filter_means_no_bounds() {
        let q = TeamQuery {
            date: Some(date!(2025 - 04 - 29)),
            week_of: None,
            user_ids: vec![],
        };
        assert!(q.week_bounds().is_none());
    }
}
