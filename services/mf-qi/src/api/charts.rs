//! 服务端 SVG 图表
//!
//! 生成内联到看板页面的 `<svg>` 片段。数据为空时输出占位图，
//! 所有文本都经过 XML 转义。

use std::fmt::Write;

use crate::domain::services::ControlLimitsOutcome;
use crate::domain::views::ControlChart;

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 96.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 64.0;
const MAX_X_LABELS: usize = 10;
const Y_TICKS: usize = 5;

pub const COLOR_RECEIVED: &str = "#1f77b4";
pub const COLOR_BAD: &str = "#d62728";
const COLOR_CENTER: &str = "#2ca02c";
const COLOR_LIMIT: &str = "#d62728";
const COLOR_AXIS: &str = "#444";
const COLOR_GRID: &str = "#e5e5e5";

/// 折线图中的一条数据序列
#[derive(Debug, Clone)]
pub struct Series<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub values: Vec<f64>,
}

pub fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// 绘图区坐标映射
struct Frame {
    count: usize,
    min: f64,
    max: f64,
}

impl Frame {
    fn new(count: usize, values: impl IntoIterator<Item = f64>) -> Self {
        let (mut min, mut max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });

        if !min.is_finite() || !max.is_finite() {
            min = 0.0;
            max = 1.0;
        }
        if (max - min).abs() < f64::EPSILON {
            min -= 1.0;
            max += 1.0;
        }
        let pad = (max - min) * 0.05;

        Self {
            count,
            min: min - pad,
            max: max + pad,
        }
    }

    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, index: usize) -> f64 {
        if self.count <= 1 {
            MARGIN_LEFT + Self::plot_width() / 2.0
        } else {
            MARGIN_LEFT + index as f64 * Self::plot_width() / (self.count - 1) as f64
        }
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + (self.max - value) / (self.max - self.min) * Self::plot_height()
    }

    fn baseline(&self) -> f64 {
        self.y(self.min.max(0.0).min(self.max))
    }
}

fn open_svg(svg: &mut String, title: &str) {
    let _ = writeln!(
        svg,
        "<svg xmlns='http://www.w3.org/2000/svg' width='100%' viewBox='0 0 {:.0} {:.0}' role='img' aria-label='{}'>",
        WIDTH,
        HEIGHT,
        xml_escape(title)
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='24' font-size='16' font-weight='bold' fill='{}'>{}</text>",
        MARGIN_LEFT,
        COLOR_AXIS,
        xml_escape(title)
    );
}

fn draw_axes(svg: &mut String, frame: &Frame, labels: &[String]) {
    for tick in 0..=Y_TICKS {
        let value = frame.min + (frame.max - frame.min) * tick as f64 / Y_TICKS as f64;
        let y = frame.y(value);
        let _ = writeln!(
            svg,
            "  <line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='{}'/>",
            MARGIN_LEFT,
            y,
            WIDTH - MARGIN_RIGHT,
            y,
            COLOR_GRID
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' font-size='11' text-anchor='end' fill='{}'>{}</text>",
            MARGIN_LEFT - 6.0,
            y + 4.0,
            COLOR_AXIS,
            format_tick(value)
        );
    }

    let _ = writeln!(
        svg,
        "  <line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='{}'/>",
        MARGIN_LEFT,
        HEIGHT - MARGIN_BOTTOM,
        WIDTH - MARGIN_RIGHT,
        HEIGHT - MARGIN_BOTTOM,
        COLOR_AXIS
    );

    let step = labels.len().div_ceil(MAX_X_LABELS).max(1);
    for (index, label) in labels.iter().enumerate().step_by(step) {
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' font-size='11' text-anchor='middle' fill='{}'>{}</text>",
            frame.x(index),
            HEIGHT - MARGIN_BOTTOM + 18.0,
            COLOR_AXIS,
            xml_escape(label)
        );
    }
}

fn draw_legend(svg: &mut String, entries: &[(&str, &str)]) {
    for (row, (name, color)) in entries.iter().enumerate() {
        let y = MARGIN_TOP + 8.0 + row as f64 * 18.0;
        let x = WIDTH - MARGIN_RIGHT + 10.0;
        let _ = writeln!(
            svg,
            "  <rect x='{:.1}' y='{:.1}' width='12' height='12' fill='{}'/>",
            x,
            y - 10.0,
            color
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' font-size='11' fill='{}'>{}</text>",
            x + 16.0,
            y,
            COLOR_AXIS,
            xml_escape(name)
        );
    }
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}

fn polyline_points(frame: &Frame, values: &[f64]) -> String {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| format!("{:.1},{:.1}", frame.x(i), frame.y(*v)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// 没有数据时的占位图
pub fn placeholder(title: &str, message: &str) -> String {
    let mut svg = String::new();
    open_svg(&mut svg, title);
    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='{:.1}' font-size='14' text-anchor='middle' fill='#888'>{}</text>",
        WIDTH / 2.0,
        HEIGHT / 2.0,
        xml_escape(message)
    );
    svg.push_str("</svg>\n");
    svg
}

/// 多序列折线图，所有序列共用 `labels` 作为 x 轴
pub fn line_chart(title: &str, labels: &[String], series: &[Series<'_>]) -> String {
    if labels.is_empty() || series.iter().all(|s| s.values.is_empty()) {
        return placeholder(title, "No data");
    }

    let frame = Frame::new(
        labels.len(),
        series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .chain(std::iter::once(0.0)),
    );

    let mut svg = String::new();
    open_svg(&mut svg, title);
    draw_axes(&mut svg, &frame, labels);

    for s in series {
        let _ = writeln!(
            svg,
            "  <polyline fill='none' stroke='{}' stroke-width='2' points='{}'/>",
            s.color,
            polyline_points(&frame, &s.values)
        );
        if s.values.len() == 1 {
            let _ = writeln!(
                svg,
                "  <circle cx='{:.1}' cy='{:.1}' r='3' fill='{}'/>",
                frame.x(0),
                frame.y(s.values[0]),
                s.color
            );
        }
    }

    let legend: Vec<(&str, &str)> = series.iter().map(|s| (s.name, s.color)).collect();
    draw_legend(&mut svg, &legend);

    svg.push_str("</svg>\n");
    svg
}

/// 纵向柱状图
pub fn bar_chart(title: &str, labels: &[String], values: &[f64], color: &str) -> String {
    if labels.is_empty() || values.is_empty() {
        return placeholder(title, "No data");
    }

    let count = labels.len().min(values.len());
    let frame = Frame::new(count, values.iter().copied().chain(std::iter::once(0.0)));
    let slot = Frame::plot_width() / count as f64;
    let bar_width = slot * 0.7;

    let mut svg = String::new();
    open_svg(&mut svg, title);
    draw_axes(&mut svg, &frame, &[]);

    let baseline = frame.baseline();
    for (index, (label, value)) in labels.iter().zip(values).enumerate() {
        let center = MARGIN_LEFT + slot * (index as f64 + 0.5);
        let top = frame.y(*value);
        let _ = writeln!(
            svg,
            "  <rect x='{:.1}' y='{:.1}' width='{:.1}' height='{:.1}' fill='{}'><title>{}: {}</title></rect>",
            center - bar_width / 2.0,
            top.min(baseline),
            bar_width,
            (baseline - top).abs(),
            color,
            xml_escape(label),
            value
        );
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' font-size='11' text-anchor='end' transform='rotate(-35 {:.1} {:.1})' fill='{}'>{}</text>",
            center,
            HEIGHT - MARGIN_BOTTOM + 14.0,
            center,
            HEIGHT - MARGIN_BOTTOM + 14.0,
            COLOR_AXIS,
            xml_escape(label)
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn horizontal_line(svg: &mut String, frame: &Frame, value: f64, color: &str, label: &str) {
    let y = frame.y(value);
    let _ = writeln!(
        svg,
        "  <line x1='{:.1}' y1='{:.1}' x2='{:.1}' y2='{:.1}' stroke='{}' stroke-width='1.5' stroke-dasharray='6 4'/>",
        MARGIN_LEFT,
        y,
        WIDTH - MARGIN_RIGHT,
        y,
        color
    );
    let _ = writeln!(
        svg,
        "  <text x='{:.1}' y='{:.1}' font-size='11' fill='{}'>{}</text>",
        WIDTH - MARGIN_RIGHT + 6.0,
        y + 4.0,
        color,
        xml_escape(label)
    );
}

/// 控制图：测量折线、中心线与 UCL/LCL
///
/// 超出控制限的点以红色标出；控制限未定义时只画中心线并附说明
pub fn control_chart(title: &str, chart: &ControlChart) -> String {
    if chart.points.is_empty() {
        return placeholder(title, "No data");
    }

    let labels: Vec<String> = chart
        .points
        .iter()
        .map(|p| p.date.format("%m-%d").to_string())
        .collect();
    let values: Vec<f64> = chart.points.iter().map(|p| p.value).collect();

    let mut bounds = values.clone();
    match &chart.limits {
        ControlLimitsOutcome::Defined(limits) => {
            bounds.push(limits.upper);
            bounds.push(limits.lower);
        }
        ControlLimitsOutcome::Undefined { center } => bounds.push(*center),
    }
    let frame = Frame::new(values.len(), bounds);

    let mut svg = String::new();
    open_svg(&mut svg, title);
    draw_axes(&mut svg, &frame, &labels);

    let center = chart.limits.center();
    horizontal_line(&mut svg, &frame, center, COLOR_CENTER, &format!("CL {:.2}", center));
    if let Some(limits) = chart.limits.limits() {
        horizontal_line(&mut svg, &frame, limits.upper, COLOR_LIMIT, &format!("UCL {:.2}", limits.upper));
        horizontal_line(&mut svg, &frame, limits.lower, COLOR_LIMIT, &format!("LCL {:.2}", limits.lower));
    } else {
        let _ = writeln!(
            svg,
            "  <text x='{:.1}' y='{:.1}' font-size='12' fill='#888'>Control limits need at least two periods</text>",
            MARGIN_LEFT + 8.0,
            MARGIN_TOP + 14.0
        );
    }

    let _ = writeln!(
        svg,
        "  <polyline fill='none' stroke='{}' stroke-width='1.5' points='{}'/>",
        COLOR_RECEIVED,
        polyline_points(&frame, &values)
    );
    for (index, point) in chart.points.iter().enumerate() {
        let (color, radius) = if point.out_of_control {
            (COLOR_LIMIT, 5.0)
        } else {
            (COLOR_RECEIVED, 3.0)
        };
        let _ = writeln!(
            svg,
            "  <circle cx='{:.1}' cy='{:.1}' r='{:.1}' fill='{}'><title>{}: {:.3}</title></circle>",
            frame.x(index),
            frame.y(point.value),
            radius,
            color,
            point.date,
            point.value
        );
    }

    let mut legend = vec![("Daily mean defects", COLOR_RECEIVED), ("Center line", COLOR_CENTER)];
    if chart.limits.is_defined() {
        legend.push(("UCL / LCL", COLOR_LIMIT));
    }
    draw_legend(&mut svg, &legend);

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::build_control_chart;
    use crate::domain::views::DailyDefectMean;
    use chrono::NaiveDate;

    fn means(values: &[f64]) -> Vec<DailyDefectMean> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| DailyDefectMean {
                date: NaiveDate::from_ymd_opt(2023, 1, 1 + i as u32).unwrap(),
                mean_bad_qty: *v,
            })
            .collect()
    }

    #[test]
    fn test_escape() {
        assert_eq!(xml_escape("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }

    #[test]
    fn test_empty_series_renders_placeholder() {
        let svg = line_chart("Daily", &[], &[]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("No data"));

        let svg = bar_chart("Items", &[], &[], COLOR_BAD);
        assert!(svg.contains("No data"));
    }

    #[test]
    fn test_line_chart_has_series_and_legend() {
        let labels = vec!["2023-01".to_string(), "2023-02".to_string()];
        let svg = line_chart(
            "Monthly",
            &labels,
            &[
                Series { name: "Received", color: COLOR_RECEIVED, values: vec![10.0, 20.0] },
                Series { name: "Bad", color: COLOR_BAD, values: vec![1.0, 3.0] },
            ],
        );
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Received"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_bar_chart_escapes_labels() {
        let svg = bar_chart("Items", &["A<1>".to_string()], &[4.0], COLOR_BAD);
        assert!(svg.contains("A&lt;1&gt;"));
        assert!(!svg.contains("A<1>"));
    }

    #[test]
    fn test_control_chart_defined() {
        let mut values = vec![1.0; 20];
        values.push(40.0);
        let chart = build_control_chart(2023, means(&values)).unwrap();
        let svg = control_chart("Control", &chart);
        assert!(svg.contains("UCL"));
        assert!(svg.contains("LCL"));
        assert!(svg.contains("CL "));
        assert!(svg.contains("r='5.0'"));
    }

    #[test]
    fn test_control_chart_undefined() {
        let chart = build_control_chart(2023, means(&[3.0])).unwrap();
        let svg = control_chart("Control", &chart);
        assert!(svg.contains("CL 3.00"));
        assert!(!svg.contains("UCL"));
        assert!(svg.contains("at least two periods"));
    }
}
