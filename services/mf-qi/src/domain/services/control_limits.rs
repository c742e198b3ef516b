//! 控制限计算
//!
//! Shewhart 个值控制图的中心线与 ±3σ 控制限：
//!
//! - CL  = 各期间测量值的算术平均
//! - σ   = 样本标准差（n − 1 自由度）
//! - UCL = CL + 3σ
//! - LCL = CL − 3σ
//!
//! 只有一个期间时样本标准差无定义，此时只返回中心线，
//! 不会用 σ = 0 代替。
//!
//! 均值与离差都按缩放后的值计算，极大的有限输入不会在中间步骤溢出；
//! 控制限本身超出 f64 范围时返回 `ControlLimitError::Overflow`。

use serde::Serialize;
use thiserror::Error;

/// 控制限距中心线的标准差倍数
pub const SIGMA_MULTIPLIER: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ControlLimitError {
    #[error("control limits need at least one period")]
    Empty,

    #[error("measurement at period {index} is not finite ({value})")]
    NonFinite { index: usize, value: f64 },

    #[error("control limits exceed the representable range")]
    Overflow,
}

/// 已定义的控制限
///
/// 不变量：`lower <= center <= upper`，且全部为有限值
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControlLimits {
    pub center: f64,
    pub sigma: f64,
    pub upper: f64,
    pub lower: f64,
}

impl ControlLimits {
    /// 测量值严格超出上限或低于下限
    pub fn is_out_of_control(&self, value: f64) -> bool {
        value > self.upper || value < self.lower
    }
}

/// 控制限计算结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ControlLimitsOutcome {
    /// 至少两个期间，控制限可用
    Defined(ControlLimits),
    /// 只有一个期间：只有中心线，控制限无定义
    Undefined { center: f64 },
}

impl ControlLimitsOutcome {
    pub fn center(&self) -> f64 {
        match self {
            Self::Defined(limits) => limits.center,
            Self::Undefined { center } => *center,
        }
    }

    pub fn limits(&self) -> Option<&ControlLimits> {
        match self {
            Self::Defined(limits) => Some(limits),
            Self::Undefined { .. } => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Self::Defined(_))
    }
}

/// 计算一组按期间排序的测量值的控制限
///
/// 空输入和非有限值（NaN、±∞）在计算前即被拒绝。
pub fn compute_control_limits(values: &[f64]) -> Result<ControlLimitsOutcome, ControlLimitError> {
    if values.is_empty() {
        return Err(ControlLimitError::Empty);
    }

    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(ControlLimitError::NonFinite { index, value });
    }

    let center = mean(values);

    if values.len() < 2 {
        return Ok(ControlLimitsOutcome::Undefined { center });
    }

    let sigma = sample_std_dev(values, center);
    let spread = SIGMA_MULTIPLIER * sigma;
    let limits = ControlLimits {
        center,
        sigma,
        upper: center + spread,
        lower: center - spread,
    };

    if !(limits.sigma.is_finite() && limits.upper.is_finite() && limits.lower.is_finite()) {
        return Err(ControlLimitError::Overflow);
    }

    Ok(ControlLimitsOutcome::Defined(limits))
}

// 增量均值：每步只加 x/k - mean/k，结果不超出输入的取值范围；
// 常数序列的增量恒为 0，均值精确等于该常数
fn mean(values: &[f64]) -> f64 {
    let mut mean = 0.0;
    for (i, v) in values.iter().enumerate() {
        let k = (i + 1) as f64;
        mean += v / k - mean / k;
    }
    mean
}

// 以最大绝对值缩放后求离差平方和，再乘回缩放系数
fn sample_std_dev(values: &[f64], center: f64) -> f64 {
    let scale = values.iter().fold(center.abs(), |acc, v| acc.max(v.abs()));
    if scale == 0.0 {
        return 0.0;
    }

    let sum_sq: f64 = values
        .iter()
        .map(|v| (v / scale - center / scale).powi(2))
        .sum();
    scale * (sum_sq / (values.len() - 1) as f64).sqrt()
}
