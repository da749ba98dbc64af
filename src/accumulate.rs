use chrono::naive::NaiveDate;

use super::DailySeries;


/// Running totals. Consecutive entries with the same date share one slot.
pub fn cumsum(data: &DailySeries) -> DailySeries {
    let mut result : DailySeries = Vec::with_capacity(data.len());
    let mut sum = 0;
    for (date,delta) in data {
	sum += delta;
	match result.last_mut() {
	    Some((last,total)) if last == date => *total = sum,
	    _ => result.push((*date, sum))
	}
    }
    result
}


/// Per-day deltas of a running total; the first entry is kept as is.
/// Deltas are taken from the highest total seen so far, so a downward
/// revision gives a zero delta and the sum of the deltas never passes
/// the reported total.
pub fn daily(data: &DailySeries) -> DailySeries {
    let mut previous = 0;
    data.iter().map(|(date,total)| {
	let delta = total.saturating_sub(previous);
	previous = previous.max(*total);
	(*date, delta)
    }).collect()
}


/// Deltas from dated cumulative reports where some cells may be missing.
/// Reports before the first non-zero total are dropped.
pub fn from_cumulative(rows: &[(NaiveDate,Option<u64>)]) -> DailySeries {
    let reports : DailySeries = rows.iter()
	.filter_map(|(date,total)| total.map(|total| (*date, total)))
	.skip_while(|(_,total)| *total == 0)
	.collect();
    daily(&reports)
}
