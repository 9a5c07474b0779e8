//! Service portfolio ("cartera de servicios") models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One flat row of the portfolio as read from the workbook.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCarteraEntry {
    pub program_code: String,
    pub program_name: String,
    pub product_code: String,
    pub product_name: String,
    pub activity_code: String,
    pub activity_name: String,
    pub sub_product_code: String,
    pub sub_product_name: String,
    pub tracer: String,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarteraEntry {
    pub id: i32,
    #[serde(flatten)]
    pub entry: NewCarteraEntry,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarteraSubProduct {
    pub code: String,
    pub name: String,
    pub unit_of_measure: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarteraActivity {
    pub code: String,
    pub name: String,
    pub sub_products: Vec<CarteraSubProduct>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CarteraProduct {
    pub code: String,
    pub name: String,
    pub activities: Vec<CarteraActivity>,
}

/// A program rebuilt from the flat portfolio rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CarteraProgram {
    pub code: String,
    pub name: String,
    pub products: Vec<CarteraProduct>,
}

impl CarteraProgram {
    pub fn sub_product_count(&self) -> usize {
        self.products
            .iter()
            .flat_map(|p| &p.activities)
            .map(|a| a.sub_products.len())
            .sum()
    }
}

/// Finds the node with `code` or appends a new one built by `make`.
fn find_or_push<'a, T>(
    nodes: &'a mut Vec<T>,
    code: &str,
    key: impl Fn(&T) -> &str,
    make: impl FnOnce() -> T,
) -> &'a mut T {
    let index = match nodes.iter().position(|n| key(n) == code) {
        Some(index) => index,
        None => {
            nodes.push(make());
            nodes.len() - 1
        }
    };
    &mut nodes[index]
}

/// Groups rows into program trees. Order and names follow first appearance.
pub fn group_entries<'a>(entries: impl IntoIterator<Item = &'a NewCarteraEntry>) -> Vec<CarteraProgram> {
    let mut programs: Vec<CarteraProgram> = Vec::new();

    for entry in entries {
        let program = find_or_push(
            &mut programs,
            &entry.program_code,
            |p| p.code.as_str(),
            || CarteraProgram {
                code: entry.program_code.clone(),
                name: entry.program_name.clone(),
                products: Vec::new(),
            },
        );
        let product = find_or_push(
            &mut program.products,
            &entry.product_code,
            |p| p.code.as_str(),
            || CarteraProduct {
                code: entry.product_code.clone(),
                name: entry.product_name.clone(),
                activities: Vec::new(),
            },
        );
        let activity = find_or_push(
            &mut product.activities,
            &entry.activity_code,
            |a| a.code.as_str(),
            || CarteraActivity {
                code: entry.activity_code.clone(),
                name: entry.activity_name.clone(),
                sub_products: Vec::new(),
            },
        );
        find_or_push(
            &mut activity.sub_products,
            &entry.sub_product_code,
            |s| s.code.as_str(),
            || CarteraSubProduct {
                code: entry.sub_product_code.clone(),
                name: entry.sub_product_name.clone(),
                unit_of_measure: entry.unit_of_measure.clone(),
            },
        );
    }

    programs
}

/// A program created from the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPpr {
    pub id: i32,
    pub code: String,
    pub name: String,
    #[serde(skip)]
    pub sub_product_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarteraPprCreation {
    pub created_pprs: Vec<CreatedPpr>,
    pub total_pprs: usize,
    pub total_sub_products: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(program: &str, product: &str, activity: &str, sub: &str, name: &str) -> NewCarteraEntry {
        NewCarteraEntry {
            program_code: program.to_string(),
            program_name: format!("Programa {program}"),
            product_code: product.to_string(),
            product_name: format!("Producto {product}"),
            activity_code: activity.to_string(),
            activity_name: format!("Actividad {activity}"),
            sub_product_code: sub.to_string(),
            sub_product_name: name.to_string(),
            tracer: String::new(),
            unit_of_measure: "PERSONA".to_string(),
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let entries = vec![
            entry("0002", "3000001", "5000001", "0001", "primero"),
            entry("0131", "3000100", "5000100", "0100", "otro programa"),
            entry("0002", "3000001", "5000001", "0002", "segundo"),
            entry("0002", "3000001", "5000001", "0001", "repetido"),
            entry("0002", "3000002", "5000003", "0003", "tercero"),
        ];
        let programs = group_entries(&entries);

        assert_eq!(programs.len(), 2);
        assert_eq!(programs[0].code, "0002");
        assert_eq!(programs[1].code, "0131");
        assert_eq!(programs[0].products.len(), 2);
        assert_eq!(programs[0].sub_product_count(), 3);

        let subs = &programs[0].products[0].activities[0].sub_products;
        assert_eq!(subs[0].name, "primero");
        assert_eq!(subs[1].code, "0002");
    }

    #[test]
    fn entry_serializes_flat() {
        let stored = CarteraEntry {
            id: 7,
            entry: entry("0002", "3000001", "5000001", "0001", "x"),
            created_at: chrono::NaiveDate::from_ymd_opt(2025, 1, 2)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            updated_at: None,
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["programCode"], "0002");
        assert_eq!(json["unitOfMeasure"], "PERSONA");
    }
}
