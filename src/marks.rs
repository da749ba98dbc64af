use std::collections::BTreeMap;

use chrono::Datelike;
use chrono::naive::NaiveDate;


/// A labelled point on a chart's day axis.
#[derive(Clone,Debug,PartialEq)]
pub struct Mark {
    pub day: i64,
    pub date: NaiveDate,
    pub value: f64,
}

impl Mark {
    pub fn label(&self) -> String {
	format!("{}", self.date.format("%d/%m"))
    }
}


/// Marks the first and last entries, and any entry on the 1st or 15th.
pub fn mark_dates(days: &[i64], dates: &[NaiveDate], values: &[f64]) -> Vec<Mark> {
    let last = days.len().min(dates.len()).min(values.len());
    (0..last).filter(
	|i| *i == 0 || *i + 1 == last || dates[*i].day() == 1 || dates[*i].day() == 15
    ).map(|i| Mark { day: days[i], date: dates[i], value: values[i] }).collect()
}


/// Marks every `step`-th entry and the last one.
pub fn every(days: &[i64], dates: &[NaiveDate], values: &[f64], step: usize) -> Vec<Mark> {
    let last = days.len().min(dates.len()).min(values.len());
    (0..last).filter(
	|i| *i % step.max(1) == 0 || *i + 1 == last
    ).map(|i| Mark { day: days[i], date: dates[i], value: values[i] }).collect()
}


/// Union of mark lists ordered by day; the first mark seen for a day wins.
pub fn merge(lists: &[&[Mark]]) -> Vec<Mark> {
    let mut by_day = BTreeMap::new();
    for mark in lists.iter().flat_map(|list| list.iter()) {
	by_day.entry(mark.day).or_insert_with(|| mark.clone());
    }
    by_day.into_iter().map(|(_,mark)| mark).collect()
}
