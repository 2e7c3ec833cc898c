//! Renderers for the detached optimization report. Each surface consumes the
//! same `OptimizationReport`, which carries the main view's `Recommendation`
//! when one exists.

use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::{DensityArea, VehicleType};
use crate::derivation::{self, OptimizationSummary, Recommendation};
use crate::weather::Weather;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationReport {
    pub summary: OptimizationSummary,
    pub recommendation: Option<Recommendation>,
}

impl OptimizationReport {
    pub fn new(area: &DensityArea, vehicle: Option<&VehicleType>, weather: Weather) -> Self {
        Self {
            summary: OptimizationSummary::for_area(area, vehicle),
            recommendation: vehicle.map(|v| derivation::derive(v, area, weather)),
        }
    }

    fn metrics(&self) -> [(&'static str, String); 8] {
        let s = &self.summary;
        [
            ("Weather", s.weather.to_string()),
            ("Demand Level", format!("{}%", s.demand)),
            ("Fuel Savings", s.fuel_savings.to_string()),
            ("Time Reduction", s.time_reduction.to_string()),
            ("Demand Increase", s.demand_increase.to_string()),
            ("Optimal Route", s.route.to_string()),
            ("Traffic Avoidance", s.traffic_avoidance.to_string()),
            ("Weather Impact", s.weather_impact.to_string()),
        ]
    }
}

pub trait Surface {
    fn render(&self, report: &OptimizationReport) -> String;
}

/// A complete standalone HTML page with inline styles.
pub struct HtmlSurface;

/// Plain text for terminals.
pub struct TextSurface;

const PAGE_STYLE: &str = "body { font-family: system-ui, sans-serif; padding: 20px; \
background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; } \
.card { background: rgba(255,255,255,0.1); border-radius: 12px; padding: 20px; margin: 10px 0; } \
.metric { display: flex; justify-content: space-between; margin: 8px 0; } \
.value { font-weight: bold; color: #60a5fa; } \
h1, h2 { text-shadow: 0 0 10px rgba(255,255,255,0.5); }";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn html_list(out: &mut String, title: &str, items: &[&str]) {
    let _ = write!(out, "<h3>{}</h3><ul>", escape_html(title));
    for item in items {
        let _ = write!(out, "<li>{}</li>", escape_html(item));
    }
    out.push_str("</ul>");
}

impl Surface for HtmlSurface {
    fn render(&self, report: &OptimizationReport) -> String {
        let s = &report.summary;
        let mut out = String::new();
        let _ = write!(
            out,
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
             <title>Optimization Details - {area}</title><style>{PAGE_STYLE}</style></head><body>\
             <h1>AI Optimization Details</h1><div class=\"card\"><h2>{area} - {vehicle}</h2>",
            area = escape_html(s.area),
            vehicle = escape_html(s.vehicle),
        );
        for (label, value) in report.metrics().iter().take(2) {
            let _ = write!(
                out,
                "<div class=\"metric\"><span>{label}:</span><span class=\"value\">{}</span></div>",
                escape_html(value)
            );
        }
        out.push_str("</div><div class=\"card\"><h2>Optimization Results</h2>");
        for (label, value) in report.metrics().iter().skip(2) {
            let _ = write!(
                out,
                "<div class=\"metric\"><span>{label}:</span><span class=\"value\">{}</span></div>",
                escape_html(value)
            );
        }
        let _ = write!(
            out,
            "</div><div class=\"card\"><h2>AI Recommendation</h2><p>{}</p></div>",
            escape_html(s.tip)
        );
        if let Some(rec) = &report.recommendation {
            let _ = write!(
                out,
                "<div class=\"card\"><h2>Route Analysis</h2><p>{} to {} in {} weather: {} ({})</p>",
                escape_html(rec.vehicle),
                escape_html(rec.area),
                rec.weather,
                escape_html(rec.route),
                escape_html(rec.eta)
            );
            html_list(&mut out, "Advantages", &rec.pros);
            html_list(&mut out, "Considerations", &rec.cons);
            out.push_str("</div>");
        }
        out.push_str("</body></html>");
        out
    }
}

impl Surface for TextSurface {
    fn render(&self, report: &OptimizationReport) -> String {
        let s = &report.summary;
        let mut out = String::new();
        let _ = writeln!(out, "Optimization details: {} - {}", s.area, s.vehicle);
        for (label, value) in report.metrics() {
            let _ = writeln!(out, "  {label:<18} {value}");
        }
        let _ = writeln!(out, "  Tip: {}", s.tip);
        if let Some(rec) = &report.recommendation {
            let _ = writeln!(
                out,
                "Recommended route: {} (ETA {}, fuel {}, demand served {}, confidence {:?})",
                rec.route, rec.eta, rec.fuel_savings, rec.demand_served, rec.confidence
            );
            let _ = writeln!(out, "Advantages:");
            for pro in &rec.pros {
                let _ = writeln!(out, "  + {pro}");
            }
            let _ = writeln!(out, "Considerations:");
            for con in &rec.cons {
                let _ = writeln!(out, "  - {con}");
            }
        }
        out
    }
}
