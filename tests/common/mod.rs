use std::fs;
use std::path::{Path,PathBuf};


pub const REPORTS : &str = "# Piracicaba\n\
			    20200320 P 1 M 45\n\
			    20200321 P 2 F 30\n\
			    20200321 P 1 - -\n\
			    20200323 P 3 M 61\n\
			    20200325 M 1 M 61\n\
			    20200326 P 2 F 70\n\
			    20200328 P 4 M 20\n\
			    20200328 M 1 F 70\n\
			    20200402 P 5 F 35\n\
			    20200405 P 2 M 50\n";

pub const FEED : &str = "nome_munic;codigo_ibge;datahora;casos;obitos\n\
			 Limeira;3526902;2020-04-01;0;0\n\
			 Limeira;3526902;2020-04-02;2;0\n\
			 Limeira;3526902;2020-04-03;3;1\n\
			 Limeira;3526902;2020-04-04;3;1\n\
			 Limeira;3526902;2020-04-05;5;1\n\
			 Limeira;3526902;2020-04-06;8;2\n\
			 Limeira;3526902;2020-04-07;8;2\n\
			 Limeira;3526902;2020-04-08;12;2\n";


/// Writes the report file and a config pointing at it, returns the config path.
pub fn write_config(dir: &Path) -> PathBuf {
    let reports = dir.join("Piracicaba.txt");
    fs::write(&reports, REPORTS).unwrap();
    let config = serde_json::json!({
	"graph_path": dir.join("graphs"),
	"cache_path": dir.join("cache"),
	"local": [{"name": "Piracicaba", "path": reports}],
	"feed_municipalities": [],
	"fit_windows": [7, 14]
    });
    let path = dir.join("covid.json");
    fs::write(&path, config.to_string()).unwrap();
    path
}
