/// Trailing mean for every elapsed day in `days`.
///
/// `values` is indexed by elapsed day, so it is expected to be dense. The
/// window holds at most `window` entries and is cut short at the start of
/// the series; the divisor is the number of entries actually summed.
pub fn trailing_average(days: &[i64], values: &[u64], window: usize) -> Vec<f64> {

    let reach = window.max(1) as i64 - 1;

    days.iter().map(|day| {
	let start = (day - reach).max(0) as usize;
	let end = ((day + 1).max(0) as usize).min(values.len());
	let terms = values.get(start..end).unwrap_or(&[]);
	let sum : u64 = terms.iter().sum();
	sum as f64 / terms.len().max(1) as f64
    }).collect()

}


/// Trailing mean of a dense series, one value per entry.
pub fn dense_average(values: &[u64], window: usize) -> Vec<f64> {
    let days : Vec<i64> = (0..values.len() as i64).collect();
    trailing_average(&days, values, window)
}
