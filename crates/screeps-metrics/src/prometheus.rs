//! Prometheus text exposition format.
//!
//! Renders the store's gauge families and the processing-time histogram
//! for scraping by a Prometheus server or compatible agent.

use std::collections::BTreeMap;

use crate::gauge::{Gauge, METRIC_PREFIX};
use crate::store::{Histogram, Series};

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{value}")
    }
}

fn format_labels(names: &[&str], values: &[String]) -> String {
    let parts: Vec<String> = names
        .iter()
        .zip(values)
        .map(|(name, value)| format!("{name}=\"{}\"", escape_label_value(value)))
        .collect();
    parts.join(",")
}

/// Render gauge families and the processing-time histogram.
///
/// Every family gets its HELP/TYPE header even when it has no series.
pub fn render_prometheus(gauges: &BTreeMap<Gauge, Series>, processing_time: &Histogram) -> String {
    let mut out = String::new();

    for gauge in Gauge::ALL {
        let name = gauge.name();
        out.push_str(&format!("# HELP {name} {}\n", gauge.help()));
        out.push_str(&format!("# TYPE {name} gauge\n"));
        let Some(series) = gauges.get(&gauge) else {
            continue;
        };
        for (values, value) in series {
            out.push_str(&format!(
                "{name}{{{}}} {}\n",
                format_labels(gauge.label_names(), values),
                format_value(*value)
            ));
        }
    }

    let name = format!("{METRIC_PREFIX}stats_processing_time");
    out.push_str(&format!(
        "# HELP {name} Time it has taken to process stats\n"
    ));
    out.push_str(&format!("# TYPE {name} histogram\n"));
    for (bound, count) in processing_time.cumulative() {
        out.push_str(&format!(
            "{name}_bucket{{le=\"{}\"}} {count}\n",
            format_value(bound)
        ));
    }
    out.push_str(&format!(
        "{name}_bucket{{le=\"+Inf\"}} {}\n",
        processing_time.count()
    ));
    out.push_str(&format!(
        "{name}_sum {}\n",
        format_value(processing_time.sum())
    ));
    out.push_str(&format!("{name}_count {}\n", processing_time.count()));

    out
}
