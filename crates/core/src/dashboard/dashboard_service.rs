use log::{debug, warn};
use std::collections::HashMap;
use std::sync::Arc;

use super::dashboard_model::{
    DashboardMetrics, MetricsTally, PprProgressSummary, ScheduleFilter, ScheduleSelection,
    SubProductProgress,
};
use super::dashboard_traits::DashboardServiceTrait;
use crate::assignments::AssignmentServiceTrait;
use crate::errors::{Error, Result};
use crate::pprs::{ppr_not_found, Ppr, PprHierarchy, PprRepositoryTrait};
use crate::schedules::{PprSchedule, ScheduleRepositoryTrait};
use crate::users::User;

/// Schedules of a set of sub-products, indexed by sub-product.
struct ScheduleIndex {
    schedules: Vec<PprSchedule>,
}

impl ScheduleIndex {
    fn by_sub_product(&self) -> HashMap<i32, Vec<&PprSchedule>> {
        let mut map: HashMap<i32, Vec<&PprSchedule>> = HashMap::new();
        for schedule in &self.schedules {
            map.entry(schedule.sub_product_id).or_default().push(schedule);
        }
        map
    }
}

pub struct DashboardService {
    pprs: Arc<dyn PprRepositoryTrait>,
    schedules: Arc<dyn ScheduleRepositoryTrait>,
    assignments: Arc<dyn AssignmentServiceTrait>,
}

impl DashboardService {
    pub fn new(
        pprs: Arc<dyn PprRepositoryTrait>,
        schedules: Arc<dyn ScheduleRepositoryTrait>,
        assignments: Arc<dyn AssignmentServiceTrait>,
    ) -> Self {
        Self {
            pprs,
            schedules,
            assignments,
        }
    }

    /// Program the user may read; assignment is checked before existence.
    fn accessible_ppr(&self, user: &User, ppr_id: i32) -> Result<Ppr> {
        if !self.assignments.can_view(user, ppr_id)? {
            warn!(
                "User {} attempted to access unauthorized PPR {}",
                user.email, ppr_id
            );
            return Err(Error::forbidden("No tiene permisos para acceder a este PPR"));
        }
        self.pprs.get_by_id(ppr_id).map_err(ppr_not_found)
    }

    fn hierarchies(&self, pprs: &[Ppr]) -> Result<Vec<PprHierarchy>> {
        pprs.iter()
            .map(|ppr| self.pprs.load_hierarchy(ppr.id))
            .collect()
    }

    fn schedules_of<'a>(
        &self,
        hierarchies: impl IntoIterator<Item = &'a PprHierarchy>,
    ) -> Result<ScheduleIndex> {
        let ids: Vec<i32> = hierarchies
            .into_iter()
            .flat_map(PprHierarchy::sub_product_ids)
            .collect();
        Ok(ScheduleIndex {
            schedules: self.schedules.ppr_schedules_for(&ids)?,
        })
    }

    fn tally(
        hierarchies: &[PprHierarchy],
        index: &ScheduleIndex,
        filter: ScheduleFilter,
    ) -> DashboardMetrics {
        let by_sub = index.by_sub_product();
        let mut tally = MetricsTally::default();
        for sub in hierarchies.iter().flat_map(|h| &h.sub_products) {
            let candidates = by_sub.get(&sub.id).map(Vec::as_slice).unwrap_or_default();
            match filter.select(candidates) {
                ScheduleSelection::Skipped => {
                    warn!("Invalid month {:?} ignored for dashboard metrics", filter.month);
                }
                ScheduleSelection::Missing => tally.record(None),
                ScheduleSelection::Found(schedule) => tally.record(Some(schedule)),
            }
        }
        tally.finish()
    }

    fn rows(
        hierarchies: &[PprHierarchy],
        index: &ScheduleIndex,
        filter: ScheduleFilter,
    ) -> Vec<SubProductProgress> {
        let by_sub = index.by_sub_product();
        hierarchies
            .iter()
            .flat_map(PprHierarchy::sub_products_with_parents)
            .filter_map(|(sub, activity, product)| {
                let candidates = by_sub.get(&sub.id).map(Vec::as_slice).unwrap_or_default();
                let schedule = match filter.select(candidates) {
                    ScheduleSelection::Skipped => return None,
                    ScheduleSelection::Missing if filter.is_month_filtered() => return None,
                    ScheduleSelection::Missing => None,
                    ScheduleSelection::Found(schedule) => Some(schedule),
                };
                Some(SubProductProgress::build(sub, activity, product, schedule))
            })
            .collect()
    }
}

impl DashboardServiceTrait for DashboardService {
    fn assigned_pprs(&self, user: &User) -> Result<Vec<Ppr>> {
        let pprs = self.assignments.visible_pprs(user)?;
        debug!("User {} sees {} PPRs", user.email, pprs.len());
        Ok(pprs)
    }

    fn assigned_summary(&self, user: &User) -> Result<Vec<PprProgressSummary>> {
        let pprs = self.assignments.visible_pprs(user)?;
        let hierarchies = self.hierarchies(&pprs)?;
        let index = self.schedules_of(&hierarchies)?;

        Ok(pprs
            .into_iter()
            .zip(hierarchies.iter())
            .map(|(ppr, hierarchy)| PprProgressSummary {
                id: ppr.id,
                name: ppr.name,
                metrics: Self::tally(
                    std::slice::from_ref(hierarchy),
                    &index,
                    ScheduleFilter::default(),
                ),
            })
            .collect())
    }

    fn ppr_metrics(
        &self,
        user: &User,
        ppr_id: i32,
        filter: ScheduleFilter,
    ) -> Result<DashboardMetrics> {
        let ppr = self.accessible_ppr(user, ppr_id)?;
        let hierarchies = self.hierarchies(std::slice::from_ref(&ppr))?;
        let index = self.schedules_of(&hierarchies)?;
        Ok(Self::tally(&hierarchies, &index, filter))
    }

    fn general_metrics(&self, user: &User, filter: ScheduleFilter) -> Result<DashboardMetrics> {
        let pprs = self.assignments.visible_pprs(user)?;
        let hierarchies = self.hierarchies(&pprs)?;
        let index = self.schedules_of(&hierarchies)?;
        Ok(Self::tally(&hierarchies, &index, filter))
    }

    fn ppr_sub_products(
        &self,
        user: &User,
        ppr_id: i32,
        filter: ScheduleFilter,
    ) -> Result<Vec<SubProductProgress>> {
        let ppr = self.accessible_ppr(user, ppr_id)?;
        let hierarchies = self.hierarchies(std::slice::from_ref(&ppr))?;
        let index = self.schedules_of(&hierarchies)?;
        Ok(Self::rows(&hierarchies, &index, filter))
    }

    fn all_sub_products(&self, user: &User) -> Result<Vec<SubProductProgress>> {
        let pprs = self.assignments.visible_pprs(user)?;
        let hierarchies = self.hierarchies(&pprs)?;
        let index = self.schedules_of(&hierarchies)?;
        Ok(Self::rows(&hierarchies, &index, ScheduleFilter::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pprs::{Activity, NewPpr, PprStatus, Product, SubProduct};
    use crate::schedules::{Month, MonthlyValues};
    use crate::users::Role;
    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 2, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn user(id: i32, role: Role) -> User {
        User {
            id,
            name: format!("user {id}"),
            email: format!("user{id}@example.org"),
            role,
            password_hash: String::new(),
            is_active: true,
            created_at: at(),
            updated_at: None,
        }
    }

    fn ppr(id: i32) -> Ppr {
        Ppr {
            id,
            code: format!("00{id}"),
            name: format!("Programa {id}"),
            year: 2025,
            status: PprStatus::Activo,
            created_at: at(),
            updated_at: None,
        }
    }

    /// Two programs; program N owns sub-products N*10 and N*10+1.
    struct TwoPprs;

    #[async_trait]
    impl PprRepositoryTrait for TwoPprs {
        fn list(&self) -> Result<Vec<Ppr>> {
            Ok(vec![ppr(1), ppr(2)])
        }
        fn list_by_ids(&self, ids: &[i32]) -> Result<Vec<Ppr>> {
            Ok(self.list()?.into_iter().filter(|p| ids.contains(&p.id)).collect())
        }
        fn get_by_id(&self, ppr_id: i32) -> Result<Ppr> {
            self.list()?
                .into_iter()
                .find(|p| p.id == ppr_id)
                .ok_or_else(|| Error::not_found("missing"))
        }
        fn find_by_code_and_year(&self, _code: &str, _year: i32) -> Result<Option<Ppr>> {
            Ok(None)
        }
        fn list_products(&self, ppr_id: i32) -> Result<Vec<Product>> {
            Ok(self.load_hierarchy(ppr_id)?.products)
        }
        fn load_hierarchy(&self, ppr_id: i32) -> Result<PprHierarchy> {
            Ok(PprHierarchy {
                products: vec![Product {
                    id: ppr_id,
                    ppr_id,
                    code: format!("300000{ppr_id}"),
                    name: format!("Producto {ppr_id}"),
                }],
                activities: vec![Activity {
                    id: ppr_id,
                    product_id: ppr_id,
                    code: format!("500000{ppr_id}"),
                    name: format!("Actividad {ppr_id}"),
                }],
                sub_products: [ppr_id * 10, ppr_id * 10 + 1]
                    .into_iter()
                    .map(|id| SubProduct {
                        id,
                        activity_id: ppr_id,
                        code: format!("0{id}00"),
                        name: format!("Sub {id}"),
                        unit_of_measure: "INFORME".into(),
                    })
                    .collect(),
            })
        }
        fn get_sub_product(&self, _id: i32) -> Result<SubProduct> {
            Err(Error::not_found("missing"))
        }
        async fn create(&self, _new_ppr: NewPpr) -> Result<Ppr> {
            unimplemented!()
        }
        async fn update(&self, _ppr_id: i32, _changes: NewPpr) -> Result<Ppr> {
            unimplemented!()
        }
        async fn delete(&self, _ppr_id: i32) -> Result<usize> {
            unimplemented!()
        }
        async fn delete_by_year(&self, _year: i32) -> Result<usize> {
            unimplemented!()
        }
    }

    /// Sub-product 10 is at 100%, 11 at 50% with March programmed, 20 has no
    /// target and 21 has no schedule at all.
    struct Schedules;

    #[async_trait]
    impl ScheduleRepositoryTrait for Schedules {
        fn ppr_schedules_for(&self, ids: &[i32]) -> Result<Vec<PprSchedule>> {
            let make = |sub_product_id: i32, target: Option<f64>, executed: f64| {
                let mut programmed = MonthlyValues::zeros();
                if sub_product_id == 11 {
                    programmed.set(Month::Mar, Some(2.0));
                }
                let mut done = MonthlyValues::zeros();
                done.set(Month::Ene, Some(executed));
                PprSchedule {
                    id: sub_product_id,
                    sub_product_id,
                    year: 2025,
                    annual_target: target,
                    programmed,
                    executed: done,
                    created_at: at(),
                    updated_at: None,
                }
            };
            Ok([
                make(10, Some(4.0), 4.0),
                make(11, Some(4.0), 2.0),
                make(20, None, 1.0),
            ]
            .into_iter()
            .filter(|s| ids.contains(&s.sub_product_id))
            .collect())
        }
        fn ceplan_schedules_for(&self, _ids: &[i32]) -> Result<Vec<crate::schedules::CeplanSchedule>> {
            Ok(Vec::new())
        }
        async fn save_ppr_schedule(&self, schedule: PprSchedule) -> Result<PprSchedule> {
            Ok(schedule)
        }
    }

    /// User 7 is assigned to program 1 only.
    struct Assignments;

    #[async_trait]
    impl AssignmentServiceTrait for Assignments {
        fn list_ppr_managers(&self) -> Result<Vec<User>> {
            Ok(Vec::new())
        }
        fn managers_of(&self, _ppr_id: i32) -> Result<Vec<User>> {
            Ok(Vec::new())
        }
        async fn assign(&self, _ppr_id: i32, _user_id: i32) -> Result<()> {
            Ok(())
        }
        async fn unassign(&self, _ppr_id: i32, _user_id: i32) -> Result<()> {
            Ok(())
        }
        fn visible_pprs(&self, user: &User) -> Result<Vec<Ppr>> {
            if user.is_admin() {
                TwoPprs.list()
            } else {
                TwoPprs.list_by_ids(&[1])
            }
        }
        fn can_view(&self, user: &User, ppr_id: i32) -> Result<bool> {
            Ok(user.is_admin() || ppr_id == 1)
        }
    }

    fn service() -> DashboardService {
        DashboardService::new(Arc::new(TwoPprs), Arc::new(Schedules), Arc::new(Assignments))
    }

    #[test]
    fn metrics_cover_visible_programs() {
        let service = service();
        let admin = user(1, Role::Admin);
        let manager = user(7, Role::ResponsablePpr);

        let general = service
            .general_metrics(&admin, ScheduleFilter::default())
            .unwrap();
        assert_eq!(general.overall_progress, 75.0);
        assert_eq!((general.critical, general.ok, general.attention), (1, 1, 2));

        let own = service
            .general_metrics(&manager, ScheduleFilter::default())
            .unwrap();
        assert_eq!((own.critical, own.ok, own.attention), (1, 1, 0));

        let summary = service.assigned_summary(&admin).unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[1].metrics.overall_progress, 0.0);
        assert_eq!(summary[1].metrics.attention, 2);
    }

    #[test]
    fn month_filter_narrows_schedules() {
        let service = service();
        let admin = user(1, Role::Admin);
        let march = ScheduleFilter {
            month: Some(3),
            year: Some(2025),
        };

        let metrics = service.ppr_metrics(&admin, 1, march).unwrap();
        assert_eq!(metrics.overall_progress, 50.0);
        assert_eq!((metrics.critical, metrics.attention), (1, 1));

        let rows = service.ppr_sub_products(&admin, 1, march).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 11);
        assert_eq!(rows[0].gap, 2.0);
        assert_eq!(rows[0].activity_name, "Actividad 1");

        let bogus = ScheduleFilter {
            month: Some(14),
            year: None,
        };
        assert!(service.ppr_sub_products(&admin, 1, bogus).unwrap().is_empty());
        assert_eq!(service.ppr_metrics(&admin, 1, bogus).unwrap().attention, 0);
    }

    #[test]
    fn unassigned_or_missing_programs_are_rejected() {
        let service = service();
        let manager = user(7, Role::ResponsablePpr);
        let admin = user(1, Role::Admin);

        let denied = service
            .ppr_metrics(&manager, 2, ScheduleFilter::default())
            .unwrap_err();
        assert!(matches!(denied, Error::PermissionDenied(_)));

        let missing = service
            .ppr_sub_products(&admin, 9, ScheduleFilter::default())
            .unwrap_err();
        assert!(missing.is_not_found());
    }

    #[test]
    fn unfiltered_rows_include_unscheduled_sub_products() {
        let rows = service().all_sub_products(&user(1, Role::Admin)).unwrap();
        assert_eq!(rows.len(), 4);
        let unscheduled = rows.iter().find(|r| r.id == 21).unwrap();
        assert_eq!(unscheduled.annual_target, 0.0);
        assert_eq!(unscheduled.progress_percentage, 0.0);
    }
}
