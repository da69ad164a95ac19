//! Query parameter types for the habit listing endpoint.
//!
//! Parameters arrive as raw strings and are mapped onto
//! [`HabitListQuery`] here, so an unknown value is reported as a 400
//! validation error naming the parameter instead of a generic rejection.

use habits_core::error::CoreError;
use habits_core::habit::HabitStatus;
use habits_core::query::{HabitListQuery, HabitOrder, StatusFilter};
use habits_core::types::DbId;
use serde::Deserialize;

/// `GET /api/v1/habits?filterStatus=&categoryId=&orderBy=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitListParams {
    /// `todos`, `ativos`, `inativos`, `concluidos`, or a single status value.
    pub filter_status: Option<String>,
    /// A category id, or `none` for habits without a category.
    pub category_id: Option<String>,
    /// One of the [`HabitOrder`] wire values.
    pub order_by: Option<String>,
}

impl HabitListParams {
    /// Map the raw parameters onto a [`HabitListQuery`]. Blank values are
    /// treated as absent.
    pub fn into_query(self) -> Result<HabitListQuery, CoreError> {
        let status = match non_blank(self.filter_status.as_deref()) {
            None => StatusFilter::All,
            Some(raw) => parse_status_filter(raw)?,
        };

        let category = match non_blank(self.category_id.as_deref()) {
            None => None,
            Some(raw) if raw.eq_ignore_ascii_case("none") => Some(None),
            Some(raw) => match raw.parse::<DbId>() {
                Ok(id) if id > 0 => Some(Some(id)),
                _ => {
                    return Err(CoreError::Validation(format!(
                        "categoryId must be a positive integer or 'none', got '{raw}'"
                    )))
                }
            },
        };

        let order = non_blank(self.order_by.as_deref())
            .map(|raw| {
                raw.parse::<HabitOrder>()
                    .map_err(|e| CoreError::Validation(format!("orderBy: {e}")))
            })
            .transpose()?;

        Ok(HabitListQuery {
            status,
            category,
            order,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_status_filter(raw: &str) -> Result<StatusFilter, CoreError> {
    match raw {
        "todos" => Ok(StatusFilter::All),
        "ativos" => Ok(StatusFilter::Only(HabitStatus::Active)),
        "inativos" => Ok(StatusFilter::Only(HabitStatus::Inactive)),
        "concluidos" | "concluídos" => Ok(StatusFilter::Only(HabitStatus::Completed)),
        other => other
            .parse::<HabitStatus>()
            .map(StatusFilter::Only)
            .map_err(|e| CoreError::Validation(format!("filterStatus: {e}"))),
    }
}
