use chrono::{Datelike, NaiveDate};
use log::info;
use std::sync::Arc;

use super::schedules_model::{
    trailing_months, Month, MonthSnapshot, PprSchedule, ProgressUpdate, ScheduleOverrideRequest,
};
use super::schedules_traits::{ScheduleRepositoryTrait, ScheduleServiceTrait};
use crate::errors::{Error, Result};

/// Service for reading and editing monthly schedules
pub struct ScheduleService {
    repository: Arc<dyn ScheduleRepositoryTrait>,
}

impl ScheduleService {
    pub fn new(repository: Arc<dyn ScheduleRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl ScheduleServiceTrait for ScheduleService {
    async fn update_progress(
        &self,
        sub_product_id: i32,
        update: ProgressUpdate,
    ) -> Result<PprSchedule> {
        let mut schedule = self
            .repository
            .ppr_schedules_for(&[sub_product_id])?
            .into_iter()
            .find(|s| s.year == update.year)
            .ok_or_else(|| {
                Error::not_found(
                    "Programación PPR no encontrada para el subproducto y año especificados",
                )
            })?;
        let month = Month::try_from_number(update.month)?;

        if let Some(programmed) = update.programmed {
            schedule.programmed.set(month, Some(programmed));
        }
        if let Some(executed) = update.executed {
            schedule.executed.set(month, Some(executed));
        }
        let saved = self.repository.save_ppr_schedule(schedule).await?;
        info!(
            "Updated progress of sub-product {} for {}/{}",
            sub_product_id, update.month, update.year
        );
        Ok(saved)
    }

    fn recent_months(&self, sub_product_id: i32, today: NaiveDate) -> Result<Vec<MonthSnapshot>> {
        let current = Month::try_from_number(today.month())?;
        let schedules = self.repository.ppr_schedules_for(&[sub_product_id])?;

        Ok(trailing_months(today.year(), current)
            .into_iter()
            .map(|(year, month)| {
                let schedule = schedules.iter().find(|s| s.year == year);
                MonthSnapshot {
                    month: month.number(),
                    year,
                    month_name: month.full_name().to_string(),
                    programmed: schedule.map_or(0.0, |s| s.programmed.value_or_zero(month)),
                    executed: schedule.map_or(0.0, |s| s.executed.value_or_zero(month)),
                }
            })
            .collect())
    }

    async fn override_schedule(
        &self,
        sub_product_id: i32,
        request: ScheduleOverrideRequest,
    ) -> Result<Option<PprSchedule>> {
        let overrides = request.ppr;
        let mut parsed = Vec::new();
        for (code, value) in &overrides.programmed {
            parsed.push((true, code.parse::<Month>()?, *value));
        }
        for (code, value) in &overrides.executed {
            parsed.push((false, code.parse::<Month>()?, *value));
        }

        let Some(mut schedule) = self
            .repository
            .ppr_schedules_for(&[sub_product_id])?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        for (is_programmed, month, value) in parsed {
            if is_programmed {
                schedule.programmed.set(month, Some(value));
            } else {
                schedule.executed.set(month, Some(value));
            }
        }
        self.repository.save_ppr_schedule(schedule).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedules::{CeplanSchedule, MonthlyValues, ScheduleOverride};
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct MemorySchedules {
        rows: Mutex<Vec<PprSchedule>>,
    }

    #[async_trait]
    impl ScheduleRepositoryTrait for MemorySchedules {
        fn ppr_schedules_for(&self, ids: &[i32]) -> Result<Vec<PprSchedule>> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|s| ids.contains(&s.sub_product_id))
                .cloned()
                .collect())
        }
        fn ceplan_schedules_for(&self, _ids: &[i32]) -> Result<Vec<CeplanSchedule>> {
            Ok(Vec::new())
        }
        async fn save_ppr_schedule(&self, schedule: PprSchedule) -> Result<PprSchedule> {
            let mut rows = self.rows.lock().unwrap();
            let slot = rows.iter_mut().find(|s| s.id == schedule.id).unwrap();
            *slot = schedule.clone();
            Ok(schedule)
        }
    }

    fn schedule(id: i32, year: i32) -> PprSchedule {
        PprSchedule {
            id,
            sub_product_id: 7,
            year,
            annual_target: Some(120.0),
            programmed: MonthlyValues::from_array([10.0; 12]),
            executed: MonthlyValues::from_array([4.0; 12]),
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            updated_at: None,
        }
    }

    fn service(rows: Vec<PprSchedule>) -> ScheduleService {
        ScheduleService::new(Arc::new(MemorySchedules {
            rows: Mutex::new(rows),
        }))
    }

    #[tokio::test]
    async fn update_progress_touches_only_given_values() {
        let svc = service(vec![schedule(1, 2024), schedule(2, 2025)]);
        let saved = svc
            .update_progress(
                7,
                ProgressUpdate {
                    month: 3,
                    year: 2025,
                    programmed: None,
                    executed: Some(9.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(saved.id, 2);
        assert_eq!(saved.executed.get(Month::Mar), Some(9.0));
        assert_eq!(saved.programmed.get(Month::Mar), Some(10.0));
    }

    #[tokio::test]
    async fn update_progress_errors() {
        let svc = service(vec![schedule(1, 2025)]);
        let bad_month = ProgressUpdate {
            month: 13,
            year: 2025,
            programmed: None,
            executed: None,
        };
        assert!(matches!(
            svc.update_progress(7, bad_month).await,
            Err(Error::Validation(_))
        ));
        let missing_year = ProgressUpdate {
            month: 1,
            year: 2030,
            programmed: Some(1.0),
            executed: None,
        };
        assert!(matches!(
            svc.update_progress(7, missing_year).await,
            Err(Error::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn missing_schedule_wins_over_a_bad_month() {
        let svc = service(vec![schedule(1, 2025)]);
        let update = ProgressUpdate {
            month: 13,
            year: 2025,
            programmed: Some(1.0),
            executed: None,
        };
        assert!(matches!(
            svc.update_progress(99, update).await,
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn recent_months_read_across_years() {
        let mut last_year = schedule(1, 2024);
        last_year.executed.set(Month::Dic, Some(33.0));
        let svc = service(vec![last_year, schedule(2, 2025)]);
        let months = svc
            .recent_months(7, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
            .unwrap();
        assert_eq!(months.len(), 3);
        assert_eq!(months[0].month_name, "Enero");
        assert_eq!((months[1].month, months[1].year), (12, 2024));
        assert_eq!(months[1].executed, 33.0);
        assert_eq!((months[2].month, months[2].year), (11, 2024));
    }

    #[tokio::test]
    async fn override_rejects_unknown_months_and_ignores_missing_schedule() {
        let svc = service(vec![]);
        let mut programmed = BTreeMap::new();
        programmed.insert("ene".to_string(), 5.0);
        let request = ScheduleOverrideRequest {
            ppr: ScheduleOverride {
                programmed,
                executed: BTreeMap::new(),
            },
        };
        assert!(svc.override_schedule(7, request.clone()).await.unwrap().is_none());

        let mut bad = request;
        bad.ppr.executed.insert("enero".to_string(), 1.0);
        assert!(svc.override_schedule(7, bad).await.is_err());
    }
}
