//! 服务错误定义

use qms_errors::AppError;
use thiserror::Error;

use crate::domain::services::ControlLimitError;

pub type ServiceResult<T> = Result<T, InspectionError>;

#[derive(Debug, Error)]
pub enum InspectionError {
    #[error("No inspection records for year {0}")]
    NoRecordsForYear(i32),

    #[error("Year {year} is outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("Item limit must be at least 1")]
    InvalidLimit,

    #[error(transparent)]
    ControlLimits(#[from] ControlLimitError),

    #[error(transparent)]
    App(#[from] AppError),
}

impl InspectionError {
    /// 换一个年份即可恢复，看板上显示为警告而非错误
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            Self::NoRecordsForYear(_) | Self::YearOutOfRange { .. } | Self::InvalidLimit => true,
            Self::ControlLimits(_) => false,
            Self::App(e) => e.is_user_recoverable(),
        }
    }
}

impl From<InspectionError> for AppError {
    fn from(err: InspectionError) -> Self {
        match err {
            InspectionError::NoRecordsForYear(_) => AppError::not_found(err.to_string()),
            InspectionError::YearOutOfRange { .. } | InspectionError::InvalidLimit => {
                AppError::validation(err.to_string())
            }
            InspectionError::ControlLimits(e) => {
                AppError::internal(format!("Control limit calculation failed: {}", e))
            }
            InspectionError::App(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::from(InspectionError::NoRecordsForYear(2031)).status_code(), 404);
        assert_eq!(
            AppError::from(InspectionError::YearOutOfRange { year: 1990, min: 2000, max: 2100 })
                .status_code(),
            400
        );
        assert_eq!(
            AppError::from(InspectionError::ControlLimits(ControlLimitError::Empty)).status_code(),
            500
        );
        assert_eq!(
            AppError::from(InspectionError::App(AppError::database("down"))).status_code(),
            500
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(InspectionError::NoRecordsForYear(2031).is_user_recoverable());
        assert!(!InspectionError::App(AppError::database("down")).is_user_recoverable());
    }
}
