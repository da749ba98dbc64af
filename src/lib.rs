//! Daily COVID-19 case and death reports per municipality: parsing,
//! day alignment, running totals, trailing averages, demographic
//! breakdowns and exponential growth fits.

pub mod error;
pub mod config;
pub mod records;
pub mod axis;
pub mod gaps;
pub mod accumulate;
pub mod average;
pub mod demographics;
pub mod growth;
pub mod marks;
pub mod seade;
pub mod municipality;
pub mod graph;

use chrono::naive::NaiveDate;

pub use error::{Result,Error};


/// One consolidated entry per report date, in file order.
pub type DailySeries = Vec<(NaiveDate,u64)>;


/// Inclusive calendar-day iterator; open ended when no end is given.
#[derive(Clone,Debug)]
pub struct NaiveDateRange(pub NaiveDate, pub Option<NaiveDate>);

impl Iterator for NaiveDateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<NaiveDate> {
	match self.1.map_or(true, |end| self.0 <= end) {
	    false => None,
	    true => {
		let current = self.0;
		self.0 = self.0.succ_opt()?;
		Some(current)
	    }
	}
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_is_inclusive() {
	let start = NaiveDate::from_ymd_opt(2020, 2, 27).unwrap();
	let end = NaiveDate::from_ymd_opt(2020, 3, 2).unwrap();
	let days : Vec<_> = NaiveDateRange(start, Some(end)).collect();
	assert_eq!(days.len(), 5);
	assert_eq!(days[2], NaiveDate::from_ymd_opt(2020, 2, 29).unwrap());
	assert_eq!(days.last(), Some(&end));
    }

    #[test]
    fn open_range_keeps_going() {
	let start = NaiveDate::from_ymd_opt(2020, 12, 30).unwrap();
	let days : Vec<_> = NaiveDateRange(start, None).take(4).collect();
	assert_eq!(days[3], NaiveDate::from_ymd_opt(2021, 1, 2).unwrap());
    }
}
