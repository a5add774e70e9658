//! Chart widgets
//!
//! Two static illustrative charts, described as Chart.js-shaped
//! configurations and handed to a [`ChartHost`] when their mount point
//! exists. The host owns the chart afterwards.

use serde::Serialize;

use crate::dom::Document;
use crate::error::BehaviorResult;

/// Doughnut slice colors
pub const WASTE_PALETTE: [&str; 4] = ["#4facfe", "#fa709a", "#667eea", "#ff9a9e"];

const WHITE: &str = "#ffffff";
const TREND_LINE: &str = "#4facfe";
const TREND_FILL: &str = "rgba(79, 172, 254, 0.1)";
const GRID_LINE: &str = "rgba(255, 255, 255, 0.1)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Doughnut,
    Line,
}

/// One color for the whole series, or one per data point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<ColorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendPosition {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub family: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendLabels {
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<LegendPosition>,
    pub labels: LegendLabels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plugins {
    pub legend: Legend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub begin_at_zero: Option<bool>,
    pub grid: ColorStyle,
    pub ticks: ColorStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    pub responsive: bool,
    pub maintain_aspect_ratio: bool,
    pub plugins: Plugins,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scales: Option<Scales>,
}

/// Declarative chart description, serialized in the Chart.js layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartConfig {
    pub fn to_json(&self) -> BehaviorResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// How tracked items ended up: donated, repurposed, recycled or wasted
pub fn waste_breakdown() -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: labels(&["Donated", "Repurposed", "Recycled", "Wasted"]),
            datasets: vec![Dataset {
                label: None,
                data: vec![30.0, 25.0, 35.0, 10.0],
                background_color: Some(ColorSpec::PerPoint(labels(&WASTE_PALETTE))),
                border_color: None,
                border_width: Some(0),
                tension: None,
                fill: None,
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: Plugins {
                legend: Legend {
                    position: Some(LegendPosition::Bottom),
                    labels: LegendLabels {
                        color: WHITE.to_string(),
                        font: Some(Font {
                            family: "Poppins".to_string(),
                        }),
                    },
                },
            },
            scales: None,
        },
    }
}

/// Monthly waste reduction, January to June
pub fn reduction_trend() -> ChartConfig {
    let axis = |begin_at_zero| Axis {
        begin_at_zero,
        grid: ColorStyle {
            color: GRID_LINE.to_string(),
        },
        ticks: ColorStyle {
            color: WHITE.to_string(),
        },
    };

    ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: labels(&["Jan", "Feb", "Mar", "Apr", "May", "Jun"]),
            datasets: vec![Dataset {
                label: Some("Waste Reduction (%)".to_string()),
                data: vec![0.0, 15.0, 25.0, 40.0, 55.0, 70.0],
                background_color: Some(ColorSpec::Single(TREND_FILL.to_string())),
                border_color: Some(TREND_LINE.to_string()),
                border_width: None,
                tension: Some(0.4),
                fill: Some(true),
            }],
        },
        options: ChartOptions {
            responsive: true,
            maintain_aspect_ratio: false,
            plugins: Plugins {
                legend: Legend {
                    position: None,
                    labels: LegendLabels {
                        color: WHITE.to_string(),
                        font: None,
                    },
                },
            },
            scales: Some(Scales {
                x: axis(None),
                y: axis(Some(true)),
            }),
        },
    }
}

/// External charting collaborator that renders into a mount point
pub trait ChartHost<E> {
    fn render(&self, mount: &E, config: &ChartConfig) -> BehaviorResult<()>;
}

/// Render both charts whose mount points exist. Host failures are logged
/// and skipped. Returns the number of charts rendered.
pub fn install_charts<D: Document, H: ChartHost<D::Element>>(
    document: &D,
    host: &H,
    waste_mount_id: &str,
    trend_mount_id: &str,
) -> usize {
    let charts: [(&str, fn() -> ChartConfig); 2] = [
        (waste_mount_id, waste_breakdown),
        (trend_mount_id, reduction_trend),
    ];

    let mut rendered = 0;
    for (mount_id, build) in charts {
        let Some(mount) = document.element_by_id(mount_id) else {
            tracing::debug!("No #{} mount point, skipping chart", mount_id);
            continue;
        };

        match host.render(&mount, &build()) {
            Ok(()) => rendered += 1,
            Err(e) => tracing::warn!("Chart #{} not rendered: {}", mount_id, e),
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BehaviorError;
    use crate::headless::{HeadlessDocument, HeadlessElement};
    use serde_json::{json, Value};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingHost {
        rendered: RefCell<Vec<(Option<String>, ChartKind)>>,
    }

    impl ChartHost<HeadlessElement> for RecordingHost {
        fn render(&self, mount: &HeadlessElement, config: &ChartConfig) -> BehaviorResult<()> {
            self.rendered.borrow_mut().push((mount.id(), config.kind));
            Ok(())
        }
    }

    struct UnavailableHost;

    impl ChartHost<HeadlessElement> for UnavailableHost {
        fn render(&self, _mount: &HeadlessElement, _config: &ChartConfig) -> BehaviorResult<()> {
            Err(BehaviorError::Chart("Chart.js is not loaded".to_string()))
        }
    }

    #[test]
    fn test_waste_breakdown_json() {
        let value: Value = serde_json::from_str(&waste_breakdown().to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "doughnut");
        assert_eq!(value["data"]["labels"], json!(["Donated", "Repurposed", "Recycled", "Wasted"]));
        assert_eq!(value["data"]["datasets"][0]["data"], json!([30.0, 25.0, 35.0, 10.0]));
        assert_eq!(value["data"]["datasets"][0]["backgroundColor"], json!(WASTE_PALETTE));
        assert_eq!(value["data"]["datasets"][0]["borderWidth"], 0);
        assert_eq!(value["options"]["maintainAspectRatio"], false);
        assert_eq!(value["options"]["plugins"]["legend"]["position"], "bottom");
        assert_eq!(value["options"]["plugins"]["legend"]["labels"]["color"], "#ffffff");
        assert!(value["options"].get("scales").is_none());
    }

    #[test]
    fn test_reduction_trend_json() {
        let value: Value = serde_json::from_str(&reduction_trend().to_json().unwrap()).unwrap();

        assert_eq!(value["type"], "line");
        assert_eq!(value["data"]["labels"].as_array().unwrap().len(), 6);

        let dataset = &value["data"]["datasets"][0];
        assert_eq!(dataset["data"], json!([0.0, 15.0, 25.0, 40.0, 55.0, 70.0]));
        assert_eq!(dataset["fill"], true);
        assert_eq!(dataset["tension"], 0.4);
        assert_eq!(dataset["backgroundColor"], TREND_FILL);

        let scales = &value["options"]["scales"];
        assert_eq!(scales["y"]["beginAtZero"], true);
        assert!(scales["x"].get("beginAtZero").is_none());
        assert_eq!(scales["x"]["grid"]["color"], GRID_LINE);
        assert_eq!(scales["y"]["ticks"]["color"], "#ffffff");
        assert!(value["options"]["plugins"]["legend"].get("position").is_none());
    }

    #[test]
    fn test_renders_only_existing_mounts() {
        let doc = HeadlessDocument::new();
        doc.body_element().child("canvas").with_id("trendChart");

        let host = RecordingHost::default();
        assert_eq!(install_charts(&doc, &host, "wasteChart", "trendChart"), 1);
        assert_eq!(
            *host.rendered.borrow(),
            vec![(Some("trendChart".to_string()), ChartKind::Line)]
        );
    }

    #[test]
    fn test_both_mounts() {
        let doc = HeadlessDocument::new();
        doc.body_element().child("canvas").with_id("wasteChart");
        doc.body_element().child("canvas").with_id("trendChart");

        let host = RecordingHost::default();
        assert_eq!(install_charts(&doc, &host, "wasteChart", "trendChart"), 2);
        assert_eq!(host.rendered.borrow()[0].1, ChartKind::Doughnut);
    }

    #[test]
    fn test_host_failure_is_skipped() {
        let doc = HeadlessDocument::new();
        doc.body_element().child("canvas").with_id("wasteChart");

        assert_eq!(install_charts(&doc, &UnavailableHost, "wasteChart", "trendChart"), 0);
    }
}
