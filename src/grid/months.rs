use chrono::Months;

use crate::models::Month;

/// Every month from `start` to `end`, both inclusive.
///
/// An inverted range yields an empty sequence, which leaves the grid with no
/// month columns rather than failing.
pub(crate) fn generate(start: Month, end: Month) -> Vec<Month> {
    let mut months = Vec::new();
    if end < start {
        return months;
    }
    let (Some(mut current), Some(last)) = (start.first_day(), end.first_day()) else {
        return months;
    };

    while current <= last {
        months.push(Month::from_date(current));
        match current.checked_add_months(Months::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    months
}
