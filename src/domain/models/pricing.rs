use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::AppError;
use super::capacity::weekday_index;

/// One case per rule kind; a rule cannot carry fields that do not belong to
/// its kind. Percentage values are whole percents, the rest integer cents.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Adjustment {
    PercentageDiscount(i64),
    FixedDiscount(i64),
    Surcharge(i64),
}

impl Adjustment {
    pub fn from_parts(kind: &str, value: i64) -> Result<Self, AppError> {
        if value < 0 {
            return Err(AppError::Validation("Pricing rule value must not be negative".into()));
        }
        match kind {
            "percentage_discount" => {
                if value > 100 {
                    return Err(AppError::Validation("Percentage must be between 0 and 100".into()));
                }
                Ok(Self::PercentageDiscount(value))
            }
            "fixed_discount" => Ok(Self::FixedDiscount(value)),
            "surcharge" => Ok(Self::Surcharge(value)),
            other => Err(AppError::Validation(format!("Unknown pricing rule kind: {other}"))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PercentageDiscount(_) => "percentage_discount",
            Self::FixedDiscount(_) => "fixed_discount",
            Self::Surcharge(_) => "surcharge",
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            Self::PercentageDiscount(v) | Self::FixedDiscount(v) | Self::Surcharge(v) => *v,
        }
    }
}

/// Conditional price adjustment. Higher priority applies first. Rules scoped
/// to a membership plan are the billing collaborator's business and never
/// apply here.
#[derive(Debug, Serialize, Clone)]
pub struct PricingRule {
    pub id: String,
    pub service_type_id: String,
    #[serde(flatten)]
    pub adjustment: Adjustment,
    pub day_of_week: Option<i32>,
    pub min_animals: Option<i32>,
    pub membership_plan_id: Option<String>,
    pub active: bool,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

impl PricingRule {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        service_type_id: String,
        adjustment: Adjustment,
        day_of_week: Option<i32>,
        min_animals: Option<i32>,
        membership_plan_id: Option<String>,
        priority: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            service_type_id,
            adjustment,
            day_of_week,
            min_animals,
            membership_plan_id,
            active: true,
            priority,
            created_at: Utc::now(),
        }
    }

    pub fn applies(&self, date: NaiveDate, animal_count: i64) -> bool {
        if self.membership_plan_id.is_some() {
            return false;
        }
        if let Some(dow) = self.day_of_week
            && dow != weekday_index(date)
        {
            return false;
        }
        if let Some(min) = self.min_animals
            && animal_count < min as i64
        {
            return false;
        }
        true
    }
}

/// Raw row shape. The kind/value column pair is decoded into [`Adjustment`]
/// right here at the repository boundary so unknown kinds never reach the
/// pricing engine.
#[derive(Debug, FromRow)]
pub struct PricingRuleRow {
    pub id: String,
    pub service_type_id: String,
    pub kind: String,
    pub value: i64,
    pub day_of_week: Option<i32>,
    pub min_animals: Option<i32>,
    pub membership_plan_id: Option<String>,
    pub active: bool,
    pub priority: i32,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PricingRuleRow> for PricingRule {
    type Error = AppError;

    fn try_from(row: PricingRuleRow) -> Result<Self, AppError> {
        Ok(PricingRule {
            adjustment: Adjustment::from_parts(&row.kind, row.value)?,
            id: row.id,
            service_type_id: row.service_type_id,
            day_of_week: row.day_of_week,
            min_animals: row.min_animals,
            membership_plan_id: row.membership_plan_id,
            active: row.active,
            priority: row.priority,
            created_at: row.created_at,
        })
    }
}
