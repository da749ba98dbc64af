use chrono::Duration;
use chrono::naive::NaiveDate;

use super::records::{DemographicRecord,Sex};


pub const BANDS : usize = 11;
pub const BAND_LABELS : [&str; BANDS] = ["-", "0-9", "10-19", "20-29", "30-39", "40-49",
					 "50-59", "60-69", "70-79", "80-89", "90+"];
pub const SEXES : [Sex; 3] = [Sex::Male, Sex::Female, Sex::Unknown];

pub type Bands = [u64; BANDS];


/// Age band index; unknown ages go to band 0 and everyone over 89 to band 10.
pub fn band(age: Option<u32>) -> usize {
    match age {
	None => 0,
	Some(age) => (age as usize / 10 + 1).min(BANDS - 1)
    }
}

fn sex_index(sex: Sex) -> usize {
    match sex {
	Sex::Male => 0,
	Sex::Female => 1,
	Sex::Unknown => 2
    }
}


#[derive(Clone,Debug,Default,PartialEq)]
pub struct BySex {
    pub male: Bands,
    pub female: Bands,
    pub unknown: Bands,
}

impl BySex {

    pub fn get(&self, sex: Sex) -> &Bands {
	match sex {
	    Sex::Male => &self.male,
	    Sex::Female => &self.female,
	    Sex::Unknown => &self.unknown
	}
    }

    fn get_mut(&mut self, sex: Sex) -> &mut Bands {
	match sex {
	    Sex::Male => &mut self.male,
	    Sex::Female => &mut self.female,
	    Sex::Unknown => &mut self.unknown
	}
    }

    /// Both sexes and the unknown ones summed per band.
    pub fn per_band(&self) -> Bands {
	let mut result = [0; BANDS];
	for i in 0..BANDS {
	    result[i] = self.male[i] + self.female[i] + self.unknown[i];
	}
	result
    }

    pub fn total(&self) -> u64 {
	self.per_band().iter().sum()
    }

}


#[derive(Clone,Debug,Default,PartialEq)]
pub struct Demographics {
    pub confirmed: BySex,
    pub deaths: BySex,
    pub recovered: BySex,
    /// Cases dated before this day count as recovered unless dead.
    pub recovery_cutoff: Option<NaiveDate>,
}


/// Buckets detailed records by age band and sex.
///
/// Recovered is an estimate: cases reported more than `recovery_days`
/// before the latest case report, minus the deaths of the same bucket,
/// never below zero.
pub fn aggregate(cases: &[DemographicRecord], deaths: &[DemographicRecord],
		 recovery_days: i64) -> Demographics {

    let recovery_cutoff = cases.iter().map(|r| r.date).max()
	.and_then(|latest| latest.checked_sub_signed(Duration::days(recovery_days)));

    let mut result = Demographics { recovery_cutoff, ..Default::default() };
    let mut recovered = [[0i64; BANDS]; 3];

    for record in cases {
	let b = band(record.age);
	result.confirmed.get_mut(record.sex)[b] += record.count;
	if recovery_cutoff.map_or(false, |cutoff| record.date < cutoff) {
	    recovered[sex_index(record.sex)][b] += record.count as i64;
	}
    }

    for record in deaths {
	let b = band(record.age);
	result.deaths.get_mut(record.sex)[b] += record.count;
	recovered[sex_index(record.sex)][b] -= record.count as i64;
    }

    for sex in SEXES.iter() {
	let bands = result.recovered.get_mut(*sex);
	for (i, count) in recovered[sex_index(*sex)].iter().enumerate() {
	    bands[i] = (*count).max(0) as u64;
	}
    }

    result

}


/// Truncated percentage of the grand total held by each band.
pub fn shares(bands: &Bands) -> [u64; BANDS] {
    let total : u64 = bands.iter().sum();
    let mut result = [0; BANDS];
    if total > 0 {
	for i in 0..BANDS {
	    result[i] = bands[i] * 100 / total;
	}
    }
    result
}


/// Truncated percentage of deaths among closed cases, 0 without deaths.
pub fn mortality(deaths: &Bands, recovered: &Bands) -> [u64; BANDS] {
    let mut result = [0; BANDS];
    for i in 0..BANDS {
	if deaths[i] != 0 {
	    result[i] = deaths[i] * 100 / (deaths[i] + recovered[i]);
	}
    }
    result
}
