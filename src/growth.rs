//! Exponential growth fits on running totals.
//!
//! The model is `value = amplitude * e^(rate * day)`, fitted as a straight
//! line through `(day, ln value)` by ordinary least squares.

use std::f64::consts::LN_2;

use super::error::{Result,Error};


#[derive(Clone,Debug,PartialEq)]
pub struct FitResult {
    /// Slope of the log-linear fit, per day.
    pub rate: f64,
    pub intercept: f64,
    pub amplitude: f64,
    /// Days for the total to double; `None` when it is not growing.
    pub doubling_time: Option<f64>,
    /// Factor by which the total grows in 30 days.
    pub growth_30d: f64,
    pub points: usize,
    pub first_day: i64,
    pub last_day: i64,
}

impl FitResult {

    pub fn project(&self, day: i64) -> f64 {
	self.amplitude * (self.rate * day as f64).exp()
    }

    /// Projected value for every day from `from` to `to`, inclusive.
    pub fn curve(&self, from: i64, to: i64) -> Vec<(i64,f64)> {
	(from..=to).map(|day| (day, self.project(day))).collect()
    }

}


/// The points within `window` calendar days of the last day, or all of
/// them without a window.
pub fn select_window(days: &[i64], values: &[u64], window: Option<usize>) -> Vec<(i64,u64)> {
    let last = days.iter().copied().max().unwrap_or(0);
    days.iter().copied().zip(values.iter().copied()).filter(
	|(day,_)| window.map_or(true, |w| *day >= last - w as i64)
    ).collect()
}


pub fn fit(days: &[i64], values: &[u64], window: Option<usize>) -> Result<FitResult> {

    if days.len() != values.len() {
	return Err(Error::domain(format!("{} days but {} values", days.len(), values.len())));
    }

    let points = select_window(days, values, window);

    if points.len() < 2 {
	return Err(Error::domain(format!("need at least 2 points to fit, got {}", points.len())));
    }
    if let Some((day,_)) = points.iter().find(|(_,value)| *value == 0) {
	return Err(Error::domain(format!("cannot fit a zero total (day {})", day)));
    }

    let n = points.len() as f64;
    let sum_t : f64 = points.iter().map(|(t,_)| *t as f64).sum();
    let sum_y : f64 = points.iter().map(|(_,v)| (*v as f64).ln()).sum();
    let sum_t2 : f64 = points.iter().map(|(t,_)| (*t as f64).powi(2)).sum();
    let sum_ty : f64 = points.iter().map(|(t,v)| *t as f64 * (*v as f64).ln()).sum();

    let denominator = n * sum_t2 - sum_t * sum_t;
    if denominator.abs() < 1e-10 {
	return Err(Error::domain("all fit points fall on the same day"));
    }

    let rate = (n * sum_ty - sum_t * sum_y) / denominator;
    let intercept = (sum_y - rate * sum_t) / n;

    Ok(FitResult {
	rate,
	intercept,
	amplitude: intercept.exp(),
	doubling_time: match rate > 0.0 {
	    true => Some(LN_2 / rate),
	    false => None
	},
	growth_30d: (rate * 30.0).exp(),
	points: points.len(),
	first_day: points[0].0,
	last_day: points[points.len() - 1].0,
    })

}


/// Days past `last_day` to label on a projection, every `step` days.
pub fn milestones(last_day: i64, horizon: i64, step: i64) -> Vec<i64> {
    (1..=horizon / step.max(1)).map(|i| last_day + i * step.max(1)).collect()
}
