use std::{io,time,num,fmt};


pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    IO(io::Error),
    CSV(csv::Error),
    JSON(serde_json::Error),
    Reqwest(reqwest::Error),
    /// Feed url and the status it answered with.
    Download(String, reqwest::StatusCode),
    CacheAge(time::SystemTimeError),
    ParseInt(num::ParseIntError),
    ParseDate(chrono::format::ParseError),
    /// Input a computation cannot work with.
    Domain(String),
    MissingMunicipality(String),
    MissingData,
}

impl Error {
    pub fn domain<S: Into<String>>(msg: S) -> Self {
	Self::Domain(msg.into())
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
	Self::IO(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
	Self::CSV(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
	Self::JSON(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
	Self::Reqwest(err)
    }
}

impl From<time::SystemTimeError> for Error {
    fn from(err: time::SystemTimeError) -> Self {
	Self::CacheAge(err)
    }
}

impl From<num::ParseIntError> for Error {
    fn from(err: num::ParseIntError) -> Self {
	Self::ParseInt(err)
    }
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
	Self::ParseDate(err)
    }
}


impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
	match self {
	    Self::IO(err) => write!(f, "cannot read or write: {}", err),
	    Self::CSV(err) => write!(f, "bad feed row: {}", err),
	    Self::JSON(err) => write!(f, "bad config: {}", err),
	    Self::Reqwest(err) => write!(f, "download failed: {}", err),
	    Self::Download(url, status) => write!(f, "{} answered {}", url, status),
	    Self::CacheAge(err) => write!(f, "cache file from the future: {}", err),
	    Self::ParseInt(err) => write!(f, "bad count: {}", err),
	    Self::ParseDate(err) => write!(f, "bad date: {}", err),
	    Self::Domain(msg) => write!(f, "{}", msg),
	    Self::MissingMunicipality(name) => write!(f, "no feed rows for {}", name),
	    Self::MissingData => write!(f, "no reports"),
	}
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
	match self {
	    Self::IO(err) => Some(err),
	    Self::CSV(err) => Some(err),
	    Self::JSON(err) => Some(err),
	    Self::Reqwest(err) => Some(err),
	    Self::CacheAge(err) => Some(err),
	    Self::ParseInt(err) => Some(err),
	    Self::ParseDate(err) => Some(err),
	    _ => None,
	}
    }
}
