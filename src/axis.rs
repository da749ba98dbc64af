use chrono::naive::NaiveDate;

use super::error::{Result,Error};
use super::DailySeries;


/// Elapsed-day index of every date, the first one being day 0.
///
/// Each step adds the absolute calendar distance to the previous distinct
/// date, so a repeated date keeps the index of the entry before it.
pub fn elapsed_days(dates: &[NaiveDate]) -> Vec<i64> {

    let mut previous : Option<(NaiveDate,i64)> = None;

    dates.iter().map(|date| {
	let day = match previous {
	    None => 0,
	    Some((prev, day)) if prev == *date => day,
	    Some((prev, day)) => day + (*date - prev).num_days().abs()
	};
	previous = Some((*date, day));
	day
    }).collect()

}

pub fn series_days(series: &DailySeries) -> Vec<i64> {
    elapsed_days(&series.iter().map(|(date,_)| *date).collect::<Vec<_>>())
}


/// Calendar distance between the first dates of two series.
pub fn day_offset(reference: &DailySeries, other: &DailySeries) -> Result<i64> {
    let (first, _) = reference.first().ok_or(Error::MissingData)?;
    let (other_first, _) = other.first().ok_or(Error::MissingData)?;
    Ok((*other_first - *first).num_days().abs())
}


/// Moves an elapsed-day axis onto another series' axis.
pub fn shift(days: &[i64], offset: i64) -> Vec<i64> {
    days.iter().map(|day| day + offset).collect()
}
