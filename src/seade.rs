use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::naive::NaiveDate;
use log::{info,debug};
use serde::Deserialize;

use super::error::{Result,Error};


#[derive(Deserialize,Debug)]
struct Row {
    nome_munic: String,
    datahora: String,
    casos: String,
    obitos: String
}

/// One municipality-day of the SEADE feed, with cumulative counts.
#[derive(Clone,Debug,PartialEq)]
pub struct FeedRow {
    pub municipality: String,
    pub date: NaiveDate,
    pub cases: Option<u64>,
    pub deaths: Option<u64>,
}


fn count(cell: &str) -> Result<Option<u64>> {
    match cell.trim() {
	"" | "NA" => Ok(None),
	value => Ok(Some(value.parse()?))
    }
}


pub fn parse_feed(text: &str) -> Result<Vec<FeedRow>> {
    csv::ReaderBuilder::new().delimiter(b';').quoting(false)
	.from_reader(text.as_bytes()).deserialize::<Row>().map(|row| -> Result<FeedRow> {
	    let row = row?;
	    Ok(FeedRow {
		municipality: row.nome_munic,
		date: NaiveDate::parse_from_str(&row.datahora, "%Y-%m-%d")?,
		cases: count(&row.casos)?,
		deaths: count(&row.obitos)?
	    })
	}).collect()
}


/// The feed rows, from the cache when it is younger than `max_age`.
pub fn feed(url: &str, cache_path: &Path, max_age: Duration) -> Result<Vec<FeedRow>> {

    let cache_path = cache_path.join("seade");
    let cache_file = cache_path.join("dados_covid_sp.csv");

    if cache_file.exists() && fs::metadata(&cache_file)?.modified()?.elapsed()? < max_age {
	debug!("Using cached {}", cache_file.display());
	return parse_feed(&fs::read_to_string(&cache_file)?);
    }

    let text = download_feed(url)?;
    fs::create_dir_all(&cache_path)?;
    fs::write(&cache_file, &text)?;
    parse_feed(&text)

}


fn download_feed(url: &str) -> Result<String> {

    info!("Downloading {}...", url);

    let res = reqwest::blocking::get(url)?;

    match res.status().as_u16() {
	200 => Ok(res.text()?),
	_ => Err(Error::Download(url.to_string(), res.status())),
    }

}
