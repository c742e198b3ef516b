//! 看板页面
//!
//! 各区块独立计算：某个区块的年份无数据或不合法时只在该区块显示警告，
//! 其余区块照常渲染

use qms_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tera::Tera;
use tracing::{debug, warn};

use crate::application::{ItemRankingQuery, ServiceHandler, YearQuery};
use crate::domain::views::{ControlChart, DailyInspection, ItemDefectCount, ItemDefectRanking, MonthlyInspection};
use crate::error::{InspectionError, ServiceResult};

use super::charts::{self, COLOR_BAD, COLOR_RECEIVED, Series};

const TEMPLATE_NAME: &str = "dashboard.html";
const PAGE_TITLE: &str = "Quality Inspection Dashboard";
pub const EXPORT_URL: &str = "/api/inspection/export.csv";

/// 页面上的三个年份输入框；原样接收字符串，解析失败显示为警告
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub ranking_year: Option<String>,
    pub monthly_year: Option<String>,
    pub control_year: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct Section {
    svg: Option<String>,
    warning: Option<String>,
    error: Option<String>,
}

impl Section {
    fn from_error(err: &InspectionError) -> Self {
        if err.is_user_recoverable() {
            Self {
                warning: Some(err.to_string()),
                ..Default::default()
            }
        } else {
            warn!(error = %err, "Dashboard section failed");
            Self {
                error: Some(err.to_string()),
                ..Default::default()
            }
        }
    }

    fn warning(message: String) -> Self {
        Self {
            warning: Some(message),
            ..Default::default()
        }
    }

    fn chart(svg: String) -> Self {
        Self {
            svg: Some(svg),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct YearInputs {
    ranking: String,
    monthly: String,
    control: String,
    min: i32,
    max: i32,
}

#[derive(Debug, Serialize)]
struct LimitsSummary {
    defined: bool,
    center: f64,
    upper: Option<f64>,
    lower: Option<f64>,
    out_of_control: usize,
    periods: usize,
}

impl LimitsSummary {
    fn from_chart(chart: &ControlChart) -> Self {
        let limits = chart.limits.limits();
        Self {
            defined: limits.is_some(),
            center: chart.limits.center(),
            upper: limits.map(|l| l.upper),
            lower: limits.map(|l| l.lower),
            out_of_control: chart.out_of_control_count(),
            periods: chart.points.len(),
        }
    }
}

/// 年份输入：缺省或为空时取默认值
enum YearInput {
    Year(i32),
    Invalid(String),
}

impl YearInput {
    fn parse(raw: Option<&str>, default_year: i32) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Year(default_year),
            Some(text) => match text.parse::<i32>() {
                Ok(year) => Self::Year(year),
                Err(_) => Self::Invalid(text.to_string()),
            },
        }
    }

    fn display(&self) -> String {
        match self {
            Self::Year(year) => year.to_string(),
            Self::Invalid(text) => text.clone(),
        }
    }

    fn invalid_warning(text: &str) -> String {
        format!("{:?} is not a valid year", text)
    }
}

pub struct DashboardPage {
    tera: Tera,
}

impl DashboardPage {
    pub fn new() -> AppResult<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template(TEMPLATE_NAME, include_str!("../../templates/dashboard.html"))
            .map_err(|e| AppError::internal(format!("Failed to add template {}: {}", TEMPLATE_NAME, e)))?;

        Ok(Self { tera })
    }

    pub async fn render(&self, handler: &ServiceHandler, params: &DashboardParams) -> AppResult<String> {
        let config = handler.config();
        let ranking_input = YearInput::parse(params.ranking_year.as_deref(), config.default_year);
        let monthly_input = YearInput::parse(params.monthly_year.as_deref(), config.default_year);
        let control_input = YearInput::parse(params.control_year.as_deref(), config.default_year);

        let (daily, ranking, monthly, control) = tokio::join!(
            handler.daily_inspection(),
            async {
                match &ranking_input {
                    YearInput::Year(year) => Some(handler.item_defect_ranking(ItemRankingQuery::new(*year)).await),
                    YearInput::Invalid(_) => None,
                }
            },
            async {
                match &monthly_input {
                    YearInput::Year(year) => Some(handler.monthly_inspection(YearQuery::new(*year)).await),
                    YearInput::Invalid(_) => None,
                }
            },
            async {
                match &control_input {
                    YearInput::Year(year) => Some(handler.control_chart(YearQuery::new(*year)).await),
                    YearInput::Invalid(_) => None,
                }
            },
        );

        let mut context = tera::Context::new();
        context.insert("title", PAGE_TITLE);
        context.insert("export_url", EXPORT_URL);
        context.insert("export_file_name", &config.export_file_name);
        context.insert(
            "years",
            &YearInputs {
                ranking: ranking_input.display(),
                monthly: monthly_input.display(),
                control: control_input.display(),
                min: config.min_year,
                max: config.max_year,
            },
        );

        context.insert("daily", &daily_section(daily));

        let (ranking_section, ranking_rows) = ranking_section(&ranking_input, ranking);
        context.insert("ranking", &ranking_section);
        context.insert("ranking_rows", &ranking_rows);

        context.insert("monthly", &monthly_section(&monthly_input, monthly));

        let (control_section, limits) = control_section(&control_input, control);
        context.insert("control", &control_section);
        context.insert("limits", &limits);

        let html = self.tera.render(TEMPLATE_NAME, &context).map_err(|e| {
            AppError::internal(format!("Failed to render template {}: {}", TEMPLATE_NAME, e))
        })?;

        metrics::counter!("qi_dashboard_renders_total").increment(1);
        debug!(bytes = html.len(), "Dashboard rendered");

        Ok(html)
    }
}

fn daily_section(result: ServiceResult<Vec<DailyInspection>>) -> Section {
    match result {
        Ok(daily) => {
            let labels: Vec<String> = daily.iter().map(|d| d.date.to_string()).collect();
            Section::chart(charts::line_chart(
                "Daily inspection results",
                &labels,
                &[
                    Series {
                        name: "Received",
                        color: COLOR_RECEIVED,
                        values: daily.iter().map(|d| d.received_qty).collect(),
                    },
                    Series {
                        name: "Defective",
                        color: COLOR_BAD,
                        values: daily.iter().map(|d| d.bad_qty).collect(),
                    },
                ],
            ))
        }
        Err(e) => Section::from_error(&e),
    }
}

fn ranking_section(
    input: &YearInput,
    result: Option<ServiceResult<ItemDefectRanking>>,
) -> (Section, Vec<ItemDefectCount>) {
    match (input, result) {
        (YearInput::Year(year), Some(Ok(ranking))) => {
            let labels: Vec<String> = ranking.top.iter().map(|i| i.item_code.to_string()).collect();
            let values: Vec<f64> = ranking.top.iter().map(|i| i.bad_qty).collect();
            let svg = charts::bar_chart(
                &format!("Top {} items by defect quantity ({})", ranking.top.len(), year),
                &labels,
                &values,
                COLOR_BAD,
            );
            (Section::chart(svg), ranking.items)
        }
        (YearInput::Year(_), Some(Err(e))) => (Section::from_error(&e), Vec::new()),
        (input, _) => (Section::warning(YearInput::invalid_warning(&input.display())), Vec::new()),
    }
}

fn monthly_section(input: &YearInput, result: Option<ServiceResult<Vec<MonthlyInspection>>>) -> Section {
    match (input, result) {
        (YearInput::Year(year), Some(Ok(monthly))) => {
            let labels: Vec<String> = monthly.iter().map(|m| m.period_label()).collect();
            Section::chart(charts::line_chart(
                &format!("Monthly inspection results ({})", year),
                &labels,
                &[
                    Series {
                        name: "Received",
                        color: COLOR_RECEIVED,
                        values: monthly.iter().map(|m| m.received_qty).collect(),
                    },
                    Series {
                        name: "Defective",
                        color: COLOR_BAD,
                        values: monthly.iter().map(|m| m.bad_qty).collect(),
                    },
                ],
            ))
        }
        (YearInput::Year(_), Some(Err(e))) => Section::from_error(&e),
        (input, _) => Section::warning(YearInput::invalid_warning(&input.display())),
    }
}

fn control_section(
    input: &YearInput,
    result: Option<ServiceResult<ControlChart>>,
) -> (Section, Option<LimitsSummary>) {
    match (input, result) {
        (YearInput::Year(year), Some(Ok(chart))) => {
            let svg = charts::control_chart(&format!("Daily mean defects control chart ({})", year), &chart);
            (Section::chart(svg), Some(LimitsSummary::from_chart(&chart)))
        }
        (YearInput::Year(_), Some(Err(e))) => (Section::from_error(&e), None),
        (input, _) => (Section::warning(YearInput::invalid_warning(&input.display())), None),
    }
}
