use std::fs;
use std::path::Path;

use chrono::naive::NaiveDate;
use encoding_rs::mem::decode_latin1;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use super::error::Result;
use super::DailySeries;


lazy_static! {
    static ref NEW_CASE: Regex = Regex::new(
	r"^\s*([0-9]{8})\s+P\s+([0-9]+)").unwrap();
    static ref NEW_DEATH: Regex = Regex::new(
	r"^\s*([0-9]{8})\s+M\s+([0-9]+)").unwrap();
    static ref DETAILED_CASE: Regex = Regex::new(
	r"^\s*([0-9]{8})\s+P\s+([0-9]+)\s+([MF-])\s+([0-9-]+)").unwrap();
    static ref DETAILED_DEATH: Regex = Regex::new(
	r"^\s*([0-9]{8})\s+M\s+([0-9]+)\s+([MF-])\s+([0-9-]+)").unwrap();
}


/// Record-kind marker as written in the input files.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Marker {
    Case,
    Death
}

impl Marker {

    pub fn symbol(&self) -> char {
	match self {
	    Self::Case => 'P',
	    Self::Death => 'M'
	}
    }

    pub fn name(&self) -> &'static str {
	match self {
	    Self::Case => "case",
	    Self::Death => "death"
	}
    }

}


#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Kind {
    NewCase,
    NewDeath,
    DetailedCase,
    DetailedDeath
}

impl Kind {

    pub fn new(marker: Marker, detailed: bool) -> Self {
	match (marker, detailed) {
	    (Marker::Case, false) => Self::NewCase,
	    (Marker::Death, false) => Self::NewDeath,
	    (Marker::Case, true) => Self::DetailedCase,
	    (Marker::Death, true) => Self::DetailedDeath
	}
    }

    pub fn is_detailed(&self) -> bool {
	matches!(self, Self::DetailedCase | Self::DetailedDeath)
    }

    fn pattern(&self) -> &'static Regex {
	match self {
	    Self::NewCase => &NEW_CASE,
	    Self::NewDeath => &NEW_DEATH,
	    Self::DetailedCase => &DETAILED_CASE,
	    Self::DetailedDeath => &DETAILED_DEATH
	}
    }

}


#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum Sex {
    Male,
    Female,
    Unknown
}

impl Sex {

    pub fn name(&self) -> &'static str {
	match self {
	    Self::Male => "male",
	    Self::Female => "female",
	    Self::Unknown => "unknown"
	}
    }

    fn from_token(token: &str) -> Self {
	match token {
	    "M" => Self::Male,
	    "F" => Self::Female,
	    _ => Self::Unknown
	}
    }

}


/// One matched line, before consolidation.
#[derive(Clone,Debug,PartialEq)]
pub struct RawRecord {
    pub date: NaiveDate,
    pub kind: Kind,
    pub count: u64,
    pub sex: Option<Sex>,
    pub age: Option<u32>,
}

/// Consolidated detailed record. `age` is `None` when unknown.
#[derive(Clone,Debug,PartialEq)]
pub struct DemographicRecord {
    pub date: NaiveDate,
    pub count: u64,
    pub sex: Sex,
    pub age: Option<u32>,
}


/// Reads a report file; non UTF-8 files are taken to be Latin-1.
pub fn load_source(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
	Ok(text) => Ok(text),
	Err(err) => Ok(decode_latin1(err.as_bytes()).into_owned())
    }
}


/// Every line of `text` matching the pattern of `kind`, in file order.
/// Lines that do not match are skipped.
pub fn raw_records(text: &str, kind: Kind) -> Result<Vec<RawRecord>> {
    text.lines().filter_map(|line| kind.pattern().captures(line)).map(|cap| -> Result<RawRecord> {
	let age = match kind.is_detailed() {
	    false => None,
	    true => match cap[4].starts_with(|c: char| !c.is_ascii_digit()) {
		true => None,
		false => Some(cap[4].parse()?)
	    }
	};
	Ok(RawRecord {
	    date: NaiveDate::parse_from_str(&cap[1], "%Y%m%d")?,
	    kind,
	    count: cap[2].parse()?,
	    sex: match kind.is_detailed() {
		true => Some(Sex::from_token(&cap[3])),
		false => None
	    },
	    age
	})
    }).collect()
}


/// Per-day counts for `marker`. Only adjacent lines with the same date
/// are merged: a date that reappears later starts a new entry.
pub fn parse_daily(text: &str, marker: Marker) -> Result<DailySeries> {

    let mut series : DailySeries = Vec::new();

    for record in raw_records(text, Kind::new(marker, false))? {
	match series.last_mut() {
	    Some((date, count)) if *date == record.date => *count += record.count,
	    _ => series.push((record.date, record.count))
	}
    }

    debug!("parsed {} daily {} entries ({})", series.len(), marker.name(), marker.symbol());
    Ok(series)

}


/// Detailed records for `marker`, adjacent lines merged on (date, sex, age).
pub fn parse_detailed(text: &str, marker: Marker) -> Result<Vec<DemographicRecord>> {

    let mut records : Vec<DemographicRecord> = Vec::new();

    for raw in raw_records(text, Kind::new(marker, true))? {
	let sex = raw.sex.unwrap_or(Sex::Unknown);
	match records.last_mut() {
	    Some(last) if last.date == raw.date && last.sex == sex && last.age == raw.age =>
		last.count += raw.count,
	    _ => records.push(DemographicRecord {
		date: raw.date, count: raw.count, sex, age: raw.age
	    })
	}
    }

    debug!("parsed {} detailed {} records ({})", records.len(), marker.name(), marker.symbol());
    Ok(records)

}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use crate::error::Error;

    fn date(s: &str) -> NaiveDate {
	NaiveDate::parse_from_str(s, "%Y%m%d").unwrap()
    }

    #[test]
    fn non_adjacent_duplicates_stay_apart() {
	let text = "20200101 P 5\n20200102 P 3\n20200101 P 2\n";
	let series = parse_daily(text, Marker::Case).unwrap();
	assert_eq!(series, vec![(date("20200101"), 5),
				(date("20200102"), 3),
				(date("20200101"), 2)]);
    }

    #[test]
    fn adjacent_duplicates_are_summed() {
	let text = "20200325 P 1 primeiro caso\n20200325 P 2\n\n20200326 P 4\n";
	let series = parse_daily(text, Marker::Case).unwrap();
	assert_eq!(series, vec![(date("20200325"), 3), (date("20200326"), 4)]);
    }

    #[test]
    fn other_markers_and_noise_are_skipped() {
	let text = "# boletim\n20200325 M 1\n  20200326\tP   7 notas\nlixo 20200327 P 1\n20200328 X 3\n";
	assert_eq!(parse_daily(text, Marker::Case).unwrap(), vec![(date("20200326"), 7)]);
	assert_eq!(parse_daily(text, Marker::Death).unwrap(), vec![(date("20200325"), 1)]);
	assert!(parse_daily("", Marker::Case).unwrap().is_empty());
    }

    #[test]
    fn detailed_lines_count_as_daily_reports() {
	let text = "20200401 P 1 M 34\n20200401 P 1 F -\n";
	assert_eq!(parse_daily(text, Marker::Case).unwrap(), vec![(date("20200401"), 2)]);
    }

    #[test]
    fn detailed_records_keep_sex_and_age() {
	let text = "20200401 P 1 M 34\n20200401 P 2 M 34\n20200401 P 1 F -\n20200402 M 1 - 91\n";
	let cases = parse_detailed(text, Marker::Case).unwrap();
	assert_eq!(cases, vec![
	    DemographicRecord { date: date("20200401"), count: 3, sex: Sex::Male, age: Some(34) },
	    DemographicRecord { date: date("20200401"), count: 1, sex: Sex::Female, age: None },
	]);
	let deaths = parse_detailed(text, Marker::Death).unwrap();
	assert_eq!(deaths, vec![
	    DemographicRecord { date: date("20200402"), count: 1, sex: Sex::Unknown, age: Some(91) },
	]);
    }

    #[test]
    fn detailed_merge_needs_matching_key() {
	let text = "20200401 P 1 M 34\n20200401 P 1 M 35\n20200401 P 1 M 34\n";
	assert_eq!(parse_detailed(text, Marker::Case).unwrap().len(), 3);
    }

    #[test]
    fn raw_records_carry_kind() {
	let records = raw_records("20200401 M 2 F 80\n", Kind::DetailedDeath).unwrap();
	assert_eq!(records, vec![RawRecord {
	    date: date("20200401"), kind: Kind::DetailedDeath, count: 2,
	    sex: Some(Sex::Female), age: Some(80)
	}]);
    }

    #[test]
    fn impossible_date_is_an_error() {
	match parse_daily("20201340 P 1\n", Marker::Case) {
	    Err(Error::ParseDate(_)) => (),
	    other => panic!("unexpected result: {:?}", other)
	}
    }

    #[test]
    fn missing_file_is_an_io_error() {
	let dir = tempfile::tempdir().unwrap();
	match load_source(&dir.path().join("nada.txt")) {
	    Err(Error::IO(_)) => (),
	    other => panic!("unexpected result: {:?}", other)
	}
    }

    #[test]
    fn latin1_files_are_decoded() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(b"# Ribeir\xe3o Preto\n20200401 P 3\n").unwrap();
	let text = load_source(file.path()).unwrap();
	assert!(text.starts_with("# Ribeirão Preto"));
	assert_eq!(parse_daily(&text, Marker::Case).unwrap(),
		   vec![(date("20200401"), 3)]);
    }
}
