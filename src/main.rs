use std::{env,fs};
use std::path::PathBuf;
use std::time::Duration;

use log::{info,warn,error};

use covid19_muni::{Result,graph,seade};
use covid19_muni::config::{Config,LocalSource};
use covid19_muni::growth::FitResult;
use covid19_muni::municipality::{Municipality,Options,Source};


fn main() -> Result<()> {

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = env::args().nth(1).map(PathBuf::from)
	.unwrap_or_else(|| PathBuf::from("covid.json"));
    let config = Config::load(&config_path)?;
    let options = Options {
	average_window: config.average_window,
	recovery_days: config.recovery_days
    };

    fs::create_dir_all(&config.graph_path)?;

    for local in &config.local {
	if let Err(err) = local_graphs(&config, &options, local) {
	    error!("{}: local graphs: {}", local.name, err);
	}
    }

    if let Err(err) = feed_graphs(&config, &options) {
	error!("SEADE graphs: {}", err);
    }

    Ok(())

}


fn local_graphs(config: &Config, options: &Options, local: &LocalSource) -> Result<()> {
    let source = Source::LocalFile(local.path.clone());
    let muni = Municipality::load(&local.name, &source, options)?;
    municipality_graphs(config, &muni)
}


fn feed_graphs(config: &Config, options: &Options) -> Result<()> {

    let max_age = Duration::from_secs(config.cache_minutes.max(0) as u64 * 60);
    let source = Source::RemoteFeed(seade::feed(&config.feed_url, &config.cache_path, max_age)?);

    for name in &config.feed_municipalities {
	if let Err(err) = Municipality::load(name, &source, options)
	    .and_then(|muni| municipality_graphs(config, &muni)) {
		error!("{}: SEADE graphs: {}", name, err);
	    }
    }

    Ok(())

}


fn log_fit(muni: &Municipality, window: usize, what: &str, fit: &FitResult) {
    match fit.doubling_time {
	Some(days) => info!("{}: {} over {} days: rate {:.4}, doubling in {:.1} days, x{:.2} in 30 days",
			    muni.name, what, window, fit.rate, days, fit.growth_30d),
	None => info!("{}: {} over {} days: rate {:.4}, not growing, x{:.2} in 30 days",
		      muni.name, what, window, fit.rate, fit.growth_30d)
    }
}


fn municipality_graphs(config: &Config, muni: &Municipality) -> Result<()> {

    if let Some(date) = muni.latest_date() {
	info!("{}: reports up to {}", muni.name, date.format("%d/%m/%Y"));
    }

    let mut charts = graph::daily_charts(muni);

    if let Some(data) = &muni.demographics {
	info!("{}: {} confirmed, {} deaths, {} recovered", muni.name,
	      data.confirmed.total(), data.deaths.total(), data.recovered.total());
	charts.extend(graph::demographic_charts(muni, data));
    }

    for window in &config.fit_windows {
	match muni.fit(Some(*window)) {
	    Ok(fits) => {
		log_fit(muni, *window, "cases", &fits.0);
		log_fit(muni, *window, "deaths", &fits.1);
		charts.push(graph::projection_chart(muni, *window, config.projection_days, &fits));
	    },
	    Err(err) => warn!("{}: no fit over {} days: {}", muni.name, window, err)
	}
    }

    let written = graph::write_charts(&config.graph_path, muni, &charts)?;
    info!("{}: wrote {} graphs", muni.slug(), written.len());

    Ok(())

}
