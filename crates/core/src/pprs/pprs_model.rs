//! Budget program (PPR) hierarchy models.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::{PPR_CODE_MAX_LEN, PPR_NAME_MAX_LEN};
use crate::errors::{Error, Result};
use crate::schedules::{CeplanSchedule, MonthlyValues, PprSchedule};

/// Lifecycle of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PprStatus {
    #[default]
    Activo,
    Cerrado,
}

impl PprStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PprStatus::Activo => "activo",
            PprStatus::Cerrado => "cerrado",
        }
    }
}

impl fmt::Display for PprStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PprStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "activo" => Ok(PprStatus::Activo),
            "cerrado" => Ok(PprStatus::Cerrado),
            other => Err(Error::invalid(format!("Estado de PPR inválido: {other}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ppr {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub year: i32,
    pub status: PprStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

/// Input for creating or fully replacing a program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPpr {
    pub code: String,
    pub name: String,
    pub year: i32,
    #[serde(default)]
    pub status: PprStatus,
}

impl NewPpr {
    pub fn validate(&self) -> Result<()> {
        let code = self.code.trim();
        if code.is_empty() {
            return Err(Error::invalid("El código del PPR es obligatorio"));
        }
        if code.chars().count() > PPR_CODE_MAX_LEN {
            return Err(Error::invalid(format!(
                "El código del PPR no puede exceder {PPR_CODE_MAX_LEN} caracteres"
            )));
        }
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::invalid("El nombre del PPR es obligatorio"));
        }
        if name.chars().count() > PPR_NAME_MAX_LEN {
            return Err(Error::invalid(format!(
                "El nombre del PPR no puede exceder {PPR_NAME_MAX_LEN} caracteres"
            )));
        }
        if self.year <= 0 {
            return Err(Error::invalid("El año del PPR es obligatorio"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub ppr_id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i32,
    pub product_id: i32,
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubProduct {
    pub id: i32,
    pub activity_id: i32,
    pub code: String,
    pub name: String,
    pub unit_of_measure: String,
}

/// Flat rows of one program's hierarchy, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PprHierarchy {
    pub products: Vec<Product>,
    pub activities: Vec<Activity>,
    pub sub_products: Vec<SubProduct>,
}

impl PprHierarchy {
    pub fn sub_product_ids(&self) -> Vec<i32> {
        self.sub_products.iter().map(|s| s.id).collect()
    }

    /// Sub-products paired with their parent activity and product.
    pub fn sub_products_with_parents(&self) -> Vec<(&SubProduct, &Activity, &Product)> {
        let activities: HashMap<i32, &Activity> =
            self.activities.iter().map(|a| (a.id, a)).collect();
        let products: HashMap<i32, &Product> = self.products.iter().map(|p| (p.id, p)).collect();
        self.sub_products
            .iter()
            .filter_map(|sub| {
                let activity = activities.get(&sub.activity_id)?;
                let product = products.get(&activity.product_id)?;
                Some((sub, *activity, *product))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityNode {
    #[serde(flatten)]
    pub activity: Activity,
    pub sub_products: Vec<SubProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    #[serde(flatten)]
    pub product: Product,
    pub activities: Vec<ActivityNode>,
}

/// A program with its products, activities and sub-products nested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PprDetail {
    #[serde(flatten)]
    pub ppr: Ppr,
    pub products: Vec<ProductNode>,
}

impl PprDetail {
    pub fn assemble(ppr: Ppr, hierarchy: PprHierarchy) -> Self {
        let PprHierarchy {
            products,
            activities,
            sub_products,
        } = hierarchy;

        let mut subs_by_activity: HashMap<i32, Vec<SubProduct>> = HashMap::new();
        for sub in sub_products {
            subs_by_activity.entry(sub.activity_id).or_default().push(sub);
        }
        let mut activities_by_product: HashMap<i32, Vec<ActivityNode>> = HashMap::new();
        for activity in activities {
            let sub_products = subs_by_activity.remove(&activity.id).unwrap_or_default();
            activities_by_product
                .entry(activity.product_id)
                .or_default()
                .push(ActivityNode {
                    activity,
                    sub_products,
                });
        }
        let products = products
            .into_iter()
            .map(|product| ProductNode {
                activities: activities_by_product.remove(&product.id).unwrap_or_default(),
                product,
            })
            .collect();

        PprDetail { ppr, products }
    }
}

/// Schedule figures shown next to a sub-product in the structure view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub annual_target: f64,
    pub programmed: MonthlyValues,
    pub executed: MonthlyValues,
}

impl From<&PprSchedule> for ScheduleView {
    fn from(s: &PprSchedule) -> Self {
        ScheduleView {
            annual_target: s.annual_target.unwrap_or(0.0),
            programmed: s.programmed.filled(),
            executed: s.executed.filled(),
        }
    }
}

impl From<&CeplanSchedule> for ScheduleView {
    fn from(s: &CeplanSchedule) -> Self {
        ScheduleView {
            annual_target: s.annual_target(),
            programmed: s.programmed.filled(),
            executed: s.executed.filled(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSubProduct {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub unit_of_measure: String,
    pub ppr_schedule: Option<ScheduleView>,
    pub ceplan_schedule: Option<ScheduleView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureActivity {
    pub code: String,
    pub name: String,
    pub sub_products: Vec<StructureSubProduct>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureProduct {
    pub code: String,
    pub name: String,
    pub activities: Vec<StructureActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PprStructure {
    pub ppr: Ppr,
    pub products: Vec<StructureProduct>,
}
