use std::io;
use std::fs::File;
use std::path::{Path,PathBuf};

use serde::Deserialize;

use super::error::Result;


pub const SEADE_URL : &str = "https://raw.githubusercontent.com/seade-R/dados-covid-sp\
			      /master/data/dados_covid_sp.csv";


#[derive(Deserialize,Debug,Clone,PartialEq)]
pub struct LocalSource {
    pub name: String,
    pub path: PathBuf,
}

#[derive(Deserialize,Debug,Clone)]
#[serde(default)]
pub struct Config {
    pub graph_path: PathBuf,
    pub cache_path: PathBuf,
    pub local: Vec<LocalSource>,
    pub feed_url: String,
    pub feed_municipalities: Vec<String>,
    pub fit_windows: Vec<usize>,
    pub projection_days: i64,
    pub average_window: usize,
    pub recovery_days: i64,
    pub cache_minutes: i64,
}

impl Default for Config {
    fn default() -> Self {
	Config {
	    graph_path: PathBuf::from("graphs"),
	    cache_path: PathBuf::from("cache"),
	    local: vec![
		LocalSource { name: "Piracicaba".to_string(), path: PathBuf::from("Piracicaba.txt") },
		LocalSource { name: "Campinas".to_string(), path: PathBuf::from("Campinas.txt") },
	    ],
	    feed_url: SEADE_URL.to_string(),
	    feed_municipalities: vec!["Campinas", "São Paulo", "Piracicaba",
				      "Limeira", "Ribeirão Preto"]
		.into_iter().map(String::from).collect(),
	    fit_windows: vec![7, 14, 21, 28],
	    projection_days: 28,
	    average_window: 7,
	    recovery_days: 14,
	    cache_minutes: 30,
	}
    }
}

impl Config {

    /// Reads the JSON config at `path`; missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
	Ok(serde_json::from_reader(io::BufReader::new(File::open(path)?))?)
    }

    /// Like `from_file`, but falls back to the defaults when there is no file.
    pub fn load(path: &Path) -> Result<Self> {
	match path.exists() {
	    true => Self::from_file(path),
	    false => Ok(Self::default()),
	}
    }

}
