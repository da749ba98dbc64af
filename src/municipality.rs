use std::path::PathBuf;

use chrono::naive::NaiveDate;
use log::{info,warn};
use unidecode::unidecode;

use super::error::{Result,Error};
use super::records::{self,Marker,DemographicRecord};
use super::seade::FeedRow;
use super::demographics::{self,Demographics};
use super::growth::{self,FitResult};
use super::marks::{self,Mark};
use super::{accumulate,average,axis,gaps,DailySeries};


/// Where the reports of a municipality come from.
pub enum Source {
    /// Line-oriented report file kept by hand, with detailed records.
    LocalFile(PathBuf),
    /// Rows of the state-wide SEADE feed, cumulative counts only.
    RemoteFeed(Vec<FeedRow>),
}

impl Source {

    pub fn label(&self, name: &str) -> String {
	match self {
	    Self::LocalFile(_) => format!("Prefeitura de {}", name),
	    Self::RemoteFeed(_) => "SEADE/SP".to_string()
	}
    }

    pub fn suffix(&self) -> &'static str {
	match self {
	    Self::LocalFile(_) => "",
	    Self::RemoteFeed(_) => "-SEADE"
	}
    }

}


#[derive(Clone,Debug)]
pub struct Options {
    pub average_window: usize,
    pub recovery_days: i64,
}

impl Default for Options {
    fn default() -> Self {
	Options { average_window: 7, recovery_days: 14 }
    }
}


/// Every derived series of one municipality.
///
/// Deaths are gap-filled and have their own day axis starting at the first
/// death; `aligned_death_days` puts them on the case axis.
#[derive(Clone,Debug)]
pub struct Municipality {
    pub name: String,
    pub label: String,
    pub suffix: &'static str,
    pub cases: DailySeries,
    pub deaths: DailySeries,
    pub case_days: Vec<i64>,
    pub death_days: Vec<i64>,
    pub aligned_death_days: Vec<i64>,
    pub offset: i64,
    pub total_cases: DailySeries,
    pub total_deaths: DailySeries,
    pub case_average: Vec<f64>,
    pub death_average: Vec<f64>,
    pub demographics: Option<Demographics>,
}


pub fn values(series: &DailySeries) -> Vec<u64> {
    series.iter().map(|(_,v)| *v).collect()
}

pub fn dates(series: &DailySeries) -> Vec<NaiveDate> {
    series.iter().map(|(d,_)| *d).collect()
}


/// Case and death deltas of `name` from the cumulative feed.
pub fn feed_series(name: &str, rows: &[FeedRow]) -> Result<(DailySeries,DailySeries)> {

    let rows : Vec<&FeedRow> = rows.iter().filter(|row| row.municipality == name).collect();

    if rows.is_empty() {
	return Err(Error::MissingMunicipality(name.to_string()));
    }

    let cases = accumulate::from_cumulative(
	&rows.iter().map(|row| (row.date, row.cases)).collect::<Vec<_>>());
    let deaths = accumulate::from_cumulative(
	&rows.iter().map(|row| (row.date, row.deaths)).collect::<Vec<_>>());

    Ok((cases, deaths))

}


impl Municipality {

    pub fn load(name: &str, source: &Source, options: &Options) -> Result<Self> {

	let (cases, deaths, detailed) = match source {
	    Source::LocalFile(path) => {
		info!("Reading reports for {} from {}", name, path.display());
		let text = records::load_source(path)?;
		(records::parse_daily(&text, Marker::Case)?,
		 records::parse_daily(&text, Marker::Death)?,
		 Some((records::parse_detailed(&text, Marker::Case)?,
		       records::parse_detailed(&text, Marker::Death)?)))
	    },
	    Source::RemoteFeed(rows) => {
		info!("Taking reports for {} from the SEADE feed", name);
		let (cases, deaths) = feed_series(name, rows)?;
		(cases, deaths, None)
	    }
	};

	Self::from_series(name, source, cases, deaths, detailed, options)

    }

    pub fn from_series(name: &str, source: &Source, cases: DailySeries, deaths: DailySeries,
		       detailed: Option<(Vec<DemographicRecord>,Vec<DemographicRecord>)>,
		       options: &Options) -> Result<Self> {

	if cases.is_empty() {
	    warn!("No case reports found for {}", name);
	    return Err(Error::MissingData);
	}
	if deaths.is_empty() {
	    warn!("No death reports found for {}", name);
	    return Err(Error::MissingData);
	}

	let case_days = axis::series_days(&cases);
	let offset = axis::day_offset(&cases, &deaths)?;
	let last_case_day = case_days.iter().copied().max().unwrap_or(0);
	let deaths = gaps::fill_gaps(&deaths, &axis::series_days(&deaths),
				     last_case_day - offset)?;
	let death_days : Vec<i64> = (0..deaths.len() as i64).collect();

	let dense_cases = gaps::fill_gaps(&cases, &case_days, 0)?;
	let case_average = average::trailing_average(&case_days, &values(&dense_cases),
						     options.average_window);
	let death_average = average::dense_average(&values(&deaths), options.average_window);

	let demographics = detailed.map(
	    |(c,d)| demographics::aggregate(&c, &d, options.recovery_days));

	Ok(Municipality {
	    name: name.to_string(),
	    label: source.label(name),
	    suffix: source.suffix(),
	    total_cases: accumulate::cumsum(&cases),
	    total_deaths: accumulate::cumsum(&deaths),
	    aligned_death_days: axis::shift(&death_days, offset),
	    cases, deaths, case_days, death_days, offset,
	    case_average, death_average, demographics
	})

    }

    /// Name fit for a directory: ASCII only, no spaces.
    pub fn slug(&self) -> String {
	format!("{}{}", unidecode(&self.name).replace(' ', "_"), self.suffix)
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
	let case = self.cases.iter().map(|(d,_)| *d).max();
	let death = self.deaths.iter().map(|(d,_)| *d).max();
	case.max(death)
    }

    /// Exponential fits of total cases and total deaths, deaths on the
    /// case axis.
    pub fn fit(&self, window: Option<usize>) -> Result<(FitResult,FitResult)> {
	let cases = growth::fit(&self.case_days, &values(&self.total_cases), window)?;
	let deaths = growth::fit(&self.aligned_death_days, &values(&self.total_deaths), window)?;
	Ok((cases, deaths))
    }

    pub fn case_marks(&self) -> Vec<Mark> {
	marks::mark_dates(&self.case_days, &dates(&self.total_cases),
			  &values(&self.total_cases).iter().map(|v| *v as f64).collect::<Vec<_>>())
    }

    pub fn death_marks(&self, aligned: bool) -> Vec<Mark> {
	let days = match aligned {
	    true => &self.aligned_death_days,
	    false => &self.death_days
	};
	marks::mark_dates(days, &dates(&self.total_deaths),
			  &values(&self.total_deaths).iter().map(|v| *v as f64).collect::<Vec<_>>())
    }

    /// Case and death marks on the shared axis.
    pub fn marks(&self) -> Vec<Mark> {
	marks::merge(&[&self.case_marks()[..], &self.death_marks(true)[..]])
    }

}


#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
	NaiveDate::parse_from_str(s, "%Y%m%d").unwrap()
    }

    fn local() -> Source {
	Source::LocalFile(PathBuf::from("Piracicaba.txt"))
    }

    #[test]
    fn deaths_are_filled_and_aligned() {
	let cases = vec![(date("20200320"), 1), (date("20200321"), 2),
			 (date("20200322"), 0), (date("20200323"), 4),
			 (date("20200324"), 1), (date("20200325"), 3)];
	let deaths = vec![(date("20200322"), 1), (date("20200324"), 1)];
	let muni = Municipality::from_series("Piracicaba", &local(), cases, deaths,
					     None, &Options::default()).unwrap();
	assert_eq!(muni.offset, 2);
	assert_eq!(values(&muni.deaths), vec![1, 0, 1, 0]);
	assert_eq!(muni.death_days, vec![0, 1, 2, 3]);
	assert_eq!(muni.aligned_death_days, vec![2, 3, 4, 5]);
	assert_eq!(values(&muni.total_deaths), vec![1, 1, 2, 2]);
	assert_eq!(values(&muni.total_cases), vec![1, 3, 3, 7, 8, 11]);
	assert_eq!(muni.case_average[1], 1.5);
	assert_eq!(muni.death_average[3], 0.5);
	assert_eq!(muni.latest_date(), Some(date("20200325")));
	assert!(muni.demographics.is_none());
    }

    #[test]
    fn empty_series_are_missing_data() {
	let cases = vec![(date("20200320"), 1)];
	let result = Municipality::from_series("Limeira", &local(), cases, vec![],
					       None, &Options::default());
	assert!(matches!(result, Err(Error::MissingData)));
    }

    #[test]
    fn feed_rows_become_deltas() {
	let row = |name: &str, day: u32, cases: Option<u64>, deaths: Option<u64>| FeedRow {
	    municipality: name.to_string(),
	    date: NaiveDate::from_ymd_opt(2020, 4, day).unwrap(),
	    cases, deaths
	};
	let rows = vec![row("Campinas", 1, Some(0), Some(0)),
			row("Limeira", 1, Some(9), Some(0)),
			row("Campinas", 2, Some(2), Some(0)),
			row("Campinas", 3, Some(5), Some(1)),
			row("Campinas", 4, None, Some(1)),
			row("Campinas", 5, Some(9), Some(3))];
	let (cases, deaths) = feed_series("Campinas", &rows).unwrap();
	assert_eq!(values(&cases), vec![2, 3, 4]);
	assert_eq!(dates(&deaths), vec![date("20200403"), date("20200404"), date("20200405")]);
	assert_eq!(values(&deaths), vec![1, 0, 2]);
	assert!(matches!(feed_series("Americana", &rows),
			 Err(Error::MissingMunicipality(_))));

	let source = Source::RemoteFeed(rows);
	let muni = Municipality::load("Campinas", &source, &Options::default()).unwrap();
	assert_eq!(muni.slug(), "Campinas-SEADE");
	assert_eq!(muni.label, "SEADE/SP");
	assert_eq!(muni.offset, 1);
    }

    #[test]
    fn missing_feed_days_average_as_zero() {
	let row = |day: u32, cases: Option<u64>| FeedRow {
	    municipality: "Limeira".to_string(),
	    date: NaiveDate::from_ymd_opt(2020, 4, day).unwrap(),
	    cases, deaths: Some(1)
	};
	let rows = vec![row(1, Some(4)), row(2, None), row(3, Some(8)), row(4, Some(108))];
	let muni = Municipality::load("Limeira", &Source::RemoteFeed(rows),
				      &Options::default()).unwrap();
	assert_eq!(muni.case_days, vec![0, 2, 3]);
	assert_eq!(values(&muni.cases), vec![4, 4, 100]);
	assert_eq!(muni.case_average.len(), 3);
	assert_eq!(muni.case_average[0], 4.0);
	// day 1 has no report and counts as zero; day 3 stays out of day 2
	assert!((muni.case_average[1] - 8.0 / 3.0).abs() < 1e-9);
	assert_eq!(muni.case_average[2], 27.0);
    }

    #[test]
    fn slug_is_ascii() {
	let cases = vec![(date("20200320"), 1), (date("20200321"), 1)];
	let deaths = vec![(date("20200321"), 1)];
	let muni = Municipality::from_series("Ribeirão Preto", &local(), cases, deaths,
					     None, &Options::default()).unwrap();
	assert_eq!(muni.slug(), "Ribeirao_Preto");
	assert_eq!(muni.label, "Prefeitura de Ribeirão Preto");
    }

    #[test]
    fn fits_share_the_case_axis() {
	let cases : DailySeries = crate::NaiveDateRange(date("20200301"), None).take(15)
	    .enumerate().map(|(i,d)| (d, 2 + i as u64)).collect();
	let deaths : DailySeries = crate::NaiveDateRange(date("20200306"), None).take(10)
	    .map(|d| (d, 1)).collect();
	let muni = Municipality::from_series("Piracicaba", &local(), cases, deaths,
					     None, &Options::default()).unwrap();
	let (case_fit, death_fit) = muni.fit(Some(7)).unwrap();
	assert_eq!((case_fit.first_day, case_fit.last_day), (7, 14));
	assert_eq!((death_fit.first_day, death_fit.last_day), (7, 14));
	assert!(case_fit.rate > 0.0 && death_fit.rate > 0.0);
	let marks = muni.marks();
	assert_eq!(marks.first().map(|m| m.day), Some(0));
	assert_eq!(marks.last().map(|m| m.day), Some(14));
	assert!(marks.iter().any(|m| m.day == 5));
    }
}
