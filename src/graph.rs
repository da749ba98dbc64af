use std::{io,fs};
use std::fs::File;
use std::io::Write;
use std::path::{Path,PathBuf};

use chrono::Duration;
use chrono::naive::NaiveDate;
use log::debug;
use serde_json::{Value,json};

use super::error::Result;
use super::records::{Marker,Sex};
use super::demographics::{self,Bands,Demographics,BAND_LABELS,BANDS,SEXES};
use super::growth::{self,FitResult};
use super::marks::{self,Mark};
use super::municipality::{Municipality,values,dates};


const SCHEMA : &str = "https://vega.github.io/schema/vega-lite/v5.json";


/// One page worth of vega-lite.
#[derive(Clone,Debug)]
pub struct Chart {
    pub file: String,
    pub title: String,
    pub spec: Value,
}

struct Colors {
    total: &'static str,
    new: &'static str,
    average: &'static str,
}

fn colors(marker: Marker) -> Colors {
    match marker {
	Marker::Case => Colors { total: "#d62728", new: "#1f77b4", average: "#9467bd" },
	Marker::Death => Colors { total: "black", new: "#ff7f0e", average: "#8c564b" }
    }
}

fn noun(marker: Marker) -> (&'static str, &'static str) {
    match marker {
	Marker::Case => ("cases", "Cases"),
	Marker::Death => ("deaths", "Deaths")
    }
}

fn date_str(date: &NaiveDate) -> String {
    format!("{}", date.format("%Y-%m-%d"))
}

fn x_axis() -> Value {
    json!({
	"field": "Date",
	"timeUnit": "utcyearmonthdate",
	"title": "Date",
	"type": "temporal"
    })
}


/// Rows for one series, skipping days without a finite average.
fn daily_rows(dates: &[NaiveDate], new: &[u64], average: &[f64], total: &[u64]) -> Vec<Value> {
    dates.iter().zip(new).zip(average).zip(total).filter_map(
	|(((date,new),average),total)| match average.is_finite() {
	    false => None,
	    true => Some(json!({
		"Date": date_str(date),
		"New": new,
		"Average": average,
		"Total": total
	    }))
	}
    ).collect()
}

fn series_rows(muni: &Municipality, marker: Marker) -> Vec<Value> {
    match marker {
	Marker::Case => daily_rows(&dates(&muni.cases), &values(&muni.cases),
				   &muni.case_average, &values(&muni.total_cases)),
	Marker::Death => daily_rows(&dates(&muni.deaths), &values(&muni.deaths),
				    &muni.death_average, &values(&muni.total_deaths))
    }
}

fn weekly_marks(muni: &Municipality, marker: Marker) -> Vec<Mark> {
    let (days, totals) = match marker {
	Marker::Case => (&muni.case_days, &muni.total_cases),
	Marker::Death => (&muni.death_days, &muni.total_deaths)
    };
    marks::every(days, &dates(totals),
		 &values(totals).iter().map(|v| *v as f64).collect::<Vec<_>>(), 7)
}

fn mark_rows(marks: &[Mark]) -> Vec<Value> {
    marks.iter().map(|mark| json!({
	"Date": date_str(&mark.date),
	"Value": mark.value,
	"Label": format!("{} ({})", mark.value as u64, mark.label())
    })).collect()
}


fn new_layer(rows: Vec<Value>, colors: &Colors, title: &str, right: bool) -> Value {
    let orient = match right {
	true => "right",
	false => "left"
    };
    json!({
	"data": {"values": rows},
	"encoding": {"x": x_axis()},
	"layer": [
	    {
		"mark": {"type": "bar", "color": colors.new},
		"encoding": {
		    "y": {
			"field": "New",
			"type": "quantitative",
			"axis": {
			    "title": title,
			    "titleColor": colors.new,
			    "orient": orient
			}
		    },
		    "tooltip": [
			{"field": "Date", "type": "temporal"},
			{"field": "New", "type": "quantitative"},
			{"field": "Average", "type": "quantitative", "format": ".1f"}
		    ]
		}
	    },
	    {
		"mark": {"type": "line", "color": colors.average},
		"encoding": {
		    "y": {"field": "Average", "type": "quantitative"}
		}
	    }
	]
    })
}

fn total_layer(rows: Vec<Value>, colors: &Colors, title: &str) -> Value {
    json!({
	"data": {"values": rows},
	"mark": {"type": "point", "filled": true, "color": colors.total},
	"encoding": {
	    "x": x_axis(),
	    "y": {
		"field": "Total",
		"type": "quantitative",
		"scale": {"type": "log"},
		"axis": {"title": title, "titleColor": colors.total}
	    },
	    "tooltip": [
		{"field": "Date", "type": "temporal"},
		{"field": "Total", "type": "quantitative"}
	    ]
	}
    })
}

fn marks_layer(marks: &[Mark], color: &str) -> Value {
    json!({
	"data": {"values": mark_rows(marks)},
	"encoding": {"x": x_axis()},
	"layer": [
	    {
		"mark": {"type": "rule", "color": "gray", "strokeDash": [4, 4], "size": 1}
	    },
	    {
		"mark": {"type": "text", "color": color, "align": "left", "dx": 4, "dy": -6},
		"encoding": {
		    "y": {"field": "Value", "type": "quantitative", "scale": {"type": "log"}},
		    "text": {"field": "Label"}
		}
	    }
	]
    })
}


fn chart(file: String, title: String, body: Value) -> Chart {
    let mut spec = json!({
	"$schema": SCHEMA,
	"height": "container",
	"width": "container",
	"title": title
    });
    if let (Some(spec), Value::Object(body)) = (spec.as_object_mut(), body) {
	spec.extend(body);
    }
    Chart { file, title, spec }
}


pub fn daily_chart(muni: &Municipality, marker: Marker) -> Chart {
    let (name, cap) = noun(marker);
    chart(format!("daily-{}.html", name),
	  format!("New {} of COVID-19 per day in {}", name, muni.name),
	  json!({"layer": [new_layer(series_rows(muni, marker), &colors(marker),
				     &format!("New {} per day", name), false)]}))
	.with_subtitle(&format!("{} and trailing average", cap))
}

pub fn total_chart(muni: &Municipality, marker: Marker) -> Chart {
    let (name, cap) = noun(marker);
    chart(format!("total-{}.html", name),
	  format!("Total {} of COVID-19 in {}", name, muni.name),
	  json!({"layer": [total_layer(series_rows(muni, marker), &colors(marker),
				       &format!("Total {}", cap)),
			   marks_layer(&weekly_marks(muni, marker), "gray")]}))
}

/// Totals on a log axis with the daily counts on a second axis.
pub fn combined_chart(muni: &Municipality, marker: Marker) -> Chart {
    let (name, cap) = noun(marker);
    let colors = colors(marker);
    let marks = match marker {
	Marker::Case => muni.case_marks(),
	Marker::Death => muni.death_marks(false)
    };
    chart(format!("{}.html", name),
	  format!("{} of COVID-19 in {}", cap, muni.name),
	  json!({
	      "layer": [
		  total_layer(series_rows(muni, marker), &colors, &format!("Total {}", cap)),
		  marks_layer(&marks, colors.total),
		  new_layer(series_rows(muni, marker), &colors,
			    &format!("New {} per day", name), true)
	      ],
	      "resolve": {"scale": {"y": "independent"}}
	  }))
}

/// Cases and deaths together, deaths placed on the case axis.
pub fn overview_chart(muni: &Municipality) -> Chart {
    let cases = colors(Marker::Case);
    let deaths = colors(Marker::Death);
    chart("overview.html".to_string(),
	  format!("Confirmed cases and deaths of COVID-19 in {}", muni.name),
	  json!({
	      "layer": [
		  {
		      "layer": [
			  total_layer(series_rows(muni, Marker::Case), &cases, "Total cases and deaths"),
			  total_layer(series_rows(muni, Marker::Death), &deaths, "Total cases and deaths"),
			  marks_layer(&muni.marks(), "gray")
		      ]
		  },
		  {
		      "layer": [
			  new_layer(series_rows(muni, Marker::Case), &cases, "New cases and deaths per day", true),
			  new_layer(series_rows(muni, Marker::Death), &deaths, "New cases and deaths per day", true)
		      ]
		  }
	      ],
	      "resolve": {"scale": {"y": "independent"}}
	  }))
}


fn sex_name(sex: Sex) -> &'static str {
    match sex {
	Sex::Male => "Men",
	Sex::Female => "Women",
	Sex::Unknown => "Not identified"
    }
}

fn band_labels(percentages: &[u64; BANDS]) -> Vec<String> {
    (0..BANDS).map(|i| format!("{} {}%", BAND_LABELS[i], percentages[i])).collect()
}

fn grouped_bars(rows: Vec<Value>, order: &[String], group: &str, colors: Value,
		xtitle: &str, ytitle: &str) -> Value {
    json!({
	"data": {"values": rows},
	"mark": {"type": "bar", "tooltip": true},
	"encoding": {
	    "x": {"field": "Band", "type": "nominal", "sort": order,
		  "title": xtitle, "axis": {"labelAngle": 0}},
	    "xOffset": {"field": group, "type": "nominal"},
	    "y": {"field": "Count", "type": "quantitative", "title": ytitle},
	    "color": {"field": group, "type": "nominal", "scale": colors}
	}
    })
}

/// Counts by age band and sex, bands labelled with their share.
pub fn by_sex_chart(muni: &Municipality, file: &str, what: &str, data: &demographics::BySex) -> Chart {
    let labels = band_labels(&demographics::shares(&data.per_band()));
    let rows = SEXES.iter().flat_map(|sex| {
	let bands = data.get(*sex);
	labels.iter().zip(bands.iter()).map(move |(label,count)| json!({
	    "Band": label, "Sex": sex_name(*sex), "Count": count
	}))
    }).collect();
    chart(format!("{}.html", file),
	  format!("{} of COVID-19 in {}", what, muni.name),
	  grouped_bars(rows, &labels, "Sex",
		       json!({"domain": ["Not identified", "Men", "Women"],
			      "range": ["orange", "blue", "red"]}),
		       "Age / share", what))
}

/// Confirmed, recovered and dead per age band, bands labelled with mortality.
pub fn status_chart(muni: &Municipality, file: &str, who: &str,
		    confirmed: &Bands, recovered: &Bands, deaths: &Bands) -> Chart {
    let labels = band_labels(&demographics::mortality(deaths, recovered));
    let rows = vec![("Confirmed", confirmed), ("Recovered", recovered), ("Deaths", deaths)]
	.into_iter().flat_map(|(status,bands)| {
	    labels.iter().zip(bands.iter()).map(move |(label,count)| json!({
		"Band": label, "Status": status, "Count": count
	    }))
	}).collect();
    chart(format!("{}.html", file),
	  format!("Status of {} with COVID-19 in {}", who, muni.name),
	  grouped_bars(rows, &labels, "Status",
		       json!({"domain": ["Confirmed", "Recovered", "Deaths"],
			      "range": ["#d62728", "#2ca02c", "black"]}),
		       "Age / mortality", "Patients"))
}

pub fn demographic_charts(muni: &Municipality, data: &Demographics) -> Vec<Chart> {
    let total = |by: &demographics::BySex| by.per_band();
    vec![
	by_sex_chart(muni, "demographics-confirmed", "Confirmed cases", &data.confirmed),
	by_sex_chart(muni, "demographics-deaths", "Deaths", &data.deaths),
	by_sex_chart(muni, "demographics-recovered", "Recovered patients", &data.recovered),
	status_chart(muni, "status-men", "men",
		     &data.confirmed.male, &data.recovered.male, &data.deaths.male),
	status_chart(muni, "status-women", "women",
		     &data.confirmed.female, &data.recovered.female, &data.deaths.female),
	status_chart(muni, "status-total", "patients",
		     &total(&data.confirmed), &total(&data.recovered), &total(&data.deaths)),
    ]
}


fn describe(what: &str, fit: &FitResult) -> String {
    match fit.doubling_time {
	Some(days) => format!("{} double in {} days, growth in a month: {:.2} times",
			      what, days as i64, fit.growth_30d),
	None => format!("{} are not growing, growth in a month: {:.2} times",
			what, fit.growth_30d)
    }
}

fn projection_rows(first: NaiveDate, kind: &str, curve: &[(i64,f64)], field: &str) -> Vec<Value> {
    curve.iter().filter(|(_,v)| v.is_finite()).filter_map(
	|(day,value)| first.checked_add_signed(Duration::days(*day)).map(|date| json!({
	    "Date": date_str(&date), "Kind": kind, field: value
	}))
    ).collect()
}

/// Totals with the fitted curves extended `horizon` days past the data.
pub fn projection_chart(muni: &Municipality, window: usize, horizon: i64,
			fits: &(FitResult,FitResult)) -> Chart {

    let (case_fit, death_fit) = fits;
    let first = muni.cases[0].0;
    let last_day = case_fit.last_day.max(death_fit.last_day);

    let mut observed = Vec::new();
    for (kind, days, totals) in vec![("Cases", &muni.case_days, &muni.total_cases),
				     ("Deaths", &muni.aligned_death_days, &muni.total_deaths)] {
	observed.extend(projection_rows(first, kind, &days.iter().copied().zip(
	    values(totals).into_iter().map(|v| v as f64)).collect::<Vec<_>>(), "Total"));
    }

    let mut fitted = Vec::new();
    let mut labels = Vec::new();
    for (kind, fit) in vec![("Cases", case_fit), ("Deaths", death_fit)] {
	fitted.extend(projection_rows(first, kind, &fit.curve(0, last_day + horizon), "Fit"));
	labels.extend(projection_rows(first, kind, &growth::milestones(last_day, horizon, 7)
				      .into_iter().map(|day| (day, fit.project(day))).collect::<Vec<_>>(),
				      "Fit"));
    }

    let kinds = json!({"domain": ["Cases", "Deaths"], "range": ["#d62728", "black"]});

    chart(format!("projection-{}-{}.html", window, horizon),
	  format!("Projection of cases and deaths in {}", muni.name),
	  json!({
	      "layer": [
		  {
		      "data": {"values": observed},
		      "mark": {"type": "point", "filled": true},
		      "encoding": {
			  "x": x_axis(),
			  "y": {"field": "Total", "type": "quantitative", "scale": {"type": "log"},
				"title": "Total cases and deaths"},
			  "color": {"field": "Kind", "type": "nominal", "scale": kinds}
		      }
		  },
		  {
		      "data": {"values": fitted},
		      "mark": {"type": "line", "strokeDash": [6, 4]},
		      "encoding": {
			  "x": x_axis(),
			  "y": {"field": "Fit", "type": "quantitative", "scale": {"type": "log"}},
			  "color": {"field": "Kind", "type": "nominal", "scale": kinds}
		      }
		  },
		  {
		      "data": {"values": labels},
		      "mark": {"type": "text", "align": "right", "dx": -2, "dy": -4, "format": ".0f"},
		      "encoding": {
			  "x": x_axis(),
			  "y": {"field": "Fit", "type": "quantitative", "scale": {"type": "log"}},
			  "text": {"field": "Fit", "type": "quantitative", "format": ".0f"},
			  "color": {"field": "Kind", "type": "nominal", "scale": kinds}
		      }
		  }
	      ]
	  }))
	.with_subtitle(&format!("Fit over the last {} days, projection of {} days", window, horizon))
	.with_subtitle(&describe("Cases", case_fit))
	.with_subtitle(&describe("Deaths", death_fit))

}


pub fn daily_charts(muni: &Municipality) -> Vec<Chart> {
    vec![
	daily_chart(muni, Marker::Case),
	total_chart(muni, Marker::Case),
	combined_chart(muni, Marker::Case),
	daily_chart(muni, Marker::Death),
	total_chart(muni, Marker::Death),
	combined_chart(muni, Marker::Death),
	overview_chart(muni),
    ]
}


impl Chart {

    /// Appends a line to the title block.
    pub fn with_subtitle(mut self, line: &str) -> Self {
	let title = match self.spec.get("title") {
	    Some(Value::Object(title)) => {
		let mut title = title.clone();
		let mut lines = match title.remove("subtitle") {
		    Some(Value::Array(lines)) => lines,
		    _ => vec![]
		};
		lines.push(json!(line));
		title.insert("subtitle".to_string(), Value::Array(lines));
		Value::Object(title)
	    },
	    _ => json!({"text": self.title, "subtitle": [line]})
	};
	self.spec["title"] = title;
	self
    }

}


/// Writes every chart as `<graph_path>/<slug>/<file>`.
pub fn write_charts(graph_path: &Path, muni: &Municipality, charts: &[Chart]) -> Result<Vec<PathBuf>> {
    let graph_path = graph_path.join(muni.slug());
    fs::create_dir_all(&graph_path)?;
    charts.iter().map(|chart| {
	let path = graph_path.join(&chart.file);
	page(&path, &chart.title, &muni.label, &chart.spec)?;
	debug!("Wrote {}", path.display());
	Ok(path)
    }).collect()
}


fn page(path: &Path, title: &str, source: &str, spec: &Value) -> Result<()> {

    let mut out = io::BufWriter::new(File::create(path)?);

    write!(out, "<!DOCTYPE html><html><head>")?;
    write!(out, "<meta charset=\"UTF-8\">")?;
    write!(out, "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">")?;
    write!(out, "<title>{}</title>", title)?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega@5\"></script>")?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega-lite@5\"></script>")?;
    write!(out, "<script src=\"https://cdn.jsdelivr.net/npm/vega-embed\"></script>")?;
    write!(out, "</head>")?;
    write!(out, "<body>")?;
    write!(out, "<div id=\"vis\" style=\"overflow: hidden; position: absolute;top: 0; left: 0; right: 0; bottom: 1.5em;\"></div>")?;
    write!(out, "<div style=\"position: absolute; right: 0.5em; bottom: 0; font: 0.7em monospace;\">Source: {}</div>", source)?;
    write!(out, "<script type=\"text/javascript\">")?;
    write!(out, "var spec = ")?;

    serde_json::to_writer_pretty(out.by_ref(), spec)?;

    write!(out, ";vegaEmbed('#vis', spec,{{}}).then(function(result) {{")?;
    write!(out, "}}).catch(console.error);")?;
    write!(out, "</script>")?;
    write!(out, "</body></html>")?;

    out.flush()?;
    Ok(())

}
