mod common;

use std::fs;
use std::time::Duration;

use covid19_muni::config::Config;
use covid19_muni::graph;
use covid19_muni::municipality::{Municipality,Options,Source};
use covid19_muni::seade;


#[test]
fn local_reports_render_every_chart() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = common::write_config(dir.path());
    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.local.len(), 1);

    let local = &config.local[0];
    let muni = Municipality::load(&local.name, &Source::LocalFile(local.path.clone()),
				  &Options::default()).unwrap();
    assert_eq!(muni.offset, 5);
    assert_eq!(muni.deaths.len(), 12);
    assert_eq!(muni.total_cases.last().map(|(_,v)| *v), Some(20));

    let data = muni.demographics.as_ref().unwrap();
    assert_eq!(data.confirmed.total(), 20);
    assert_eq!(data.deaths.total(), 2);
    assert_eq!(data.recovered.total(), 4);

    let mut charts = graph::daily_charts(&muni);
    charts.extend(graph::demographic_charts(&muni, data));
    for window in &config.fit_windows {
	let fits = muni.fit(Some(*window)).unwrap();
	charts.push(graph::projection_chart(&muni, *window, config.projection_days, &fits));
    }
    let written = graph::write_charts(&config.graph_path, &muni, &charts).unwrap();
    assert_eq!(written.len(), 7 + 6 + 2);

    let out = config.graph_path.join("Piracicaba");
    for file in &["overview.html", "cases.html", "demographics-confirmed.html",
		  "status-total.html", "projection-7-28.html", "projection-14-28.html"] {
	assert!(out.join(file).exists(), "missing {}", file);
    }
    let html = fs::read_to_string(out.join("projection-14-28.html")).unwrap();
    assert!(html.contains("Prefeitura de Piracicaba"));
}


#[test]
fn cached_feed_renders_under_its_own_slug() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("cache");
    fs::create_dir_all(cache.join("seade")).unwrap();
    fs::write(cache.join("seade/dados_covid_sp.csv"), common::FEED).unwrap();

    let rows = seade::feed("http://invalid.localhost/", &cache, Duration::from_secs(600)).unwrap();
    let source = Source::RemoteFeed(rows);
    let muni = Municipality::load("Limeira", &source, &Options::default()).unwrap();
    assert_eq!(muni.offset, 1);
    assert_eq!(muni.cases.iter().map(|(_,v)| *v).collect::<Vec<_>>(), vec![2, 1, 0, 2, 3, 0, 4]);
    assert!(muni.demographics.is_none());

    let graphs = dir.path().join("graphs");
    graph::write_charts(&graphs, &muni, &graph::daily_charts(&muni)).unwrap();
    let html = fs::read_to_string(graphs.join("Limeira-SEADE/overview.html")).unwrap();
    assert!(html.contains("SEADE/SP"));

    assert!(Municipality::load("Americana", &source, &Options::default()).is_err());
}
