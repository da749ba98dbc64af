use std::collections::HashMap;

use super::error::{Result,Error};
use super::{DailySeries,NaiveDateRange};


/// Dense series: entry `i` is elapsed day `i`. Days without a report get a
/// zero count dated `first date + i`. The result spans at least up to
/// `min_span`. When several entries share a day, the first one wins.
pub fn fill_gaps(series: &DailySeries, days: &[i64], min_span: i64) -> Result<DailySeries> {

    if series.len() != days.len() {
	return Err(Error::domain(format!("{} entries but {} elapsed days",
					 series.len(), days.len())));
    }

    let (first, _) = series.first()
	.ok_or_else(|| Error::domain("cannot fill gaps of an empty series"))?;
    let last = days.iter().copied().max().unwrap_or(0).max(min_span);

    let mut by_day = HashMap::new();
    for (i, day) in days.iter().enumerate() {
	by_day.entry(*day).or_insert(i);
    }

    Ok(NaiveDateRange(*first, None).zip(0..=last).map(
	|(date, day)| match by_day.get(&day) {
	    Some(i) => series[*i],
	    None => (date, 0)
	}
    ).collect())

}


#[cfg(test)]
mod tests {
    use super::*;
    use chrono::naive::NaiveDate;

    fn date(s: &str) -> NaiveDate {
	NaiveDate::parse_from_str(s, "%Y%m%d").unwrap()
    }

    #[test]
    fn missing_days_become_zero() {
	let series = vec![(date("20200101"), 5), (date("20200104"), 2)];
	let dense = fill_gaps(&series, &[0, 3], 0).unwrap();
	assert_eq!(dense, vec![(date("20200101"), 5), (date("20200102"), 0),
			       (date("20200103"), 0), (date("20200104"), 2)]);
    }

    #[test]
    fn extends_to_minimum_span() {
	let series = vec![(date("20200410"), 1)];
	let dense = fill_gaps(&series, &[0], 3).unwrap();
	assert_eq!(dense.len(), 4);
	assert_eq!(dense[3], (date("20200413"), 0));
	assert_eq!(fill_gaps(&series, &[0], -5).unwrap(), series);
    }

    #[test]
    fn dense_input_is_unchanged() {
	let series = vec![(date("20200229"), 1), (date("20200301"), 4), (date("20200302"), 0)];
	assert_eq!(fill_gaps(&series, &[0, 1, 2], 1).unwrap(), series);
    }

    #[test]
    fn empty_series_fails_fast() {
	assert!(matches!(fill_gaps(&vec![], &[], 10), Err(Error::Domain(_))));
	let series = vec![(date("20200101"), 5)];
	assert!(matches!(fill_gaps(&series, &[0, 1], 0), Err(Error::Domain(_))));
    }
}
