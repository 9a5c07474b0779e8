//! Database model for user-to-program assignments.

use diesel::prelude::*;

#[derive(Queryable, Insertable, Selectable, PartialEq, Eq, Debug, Clone, Copy)]
#[diesel(table_name = crate::schema::ppr_assignments)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssignmentDB {
    pub user_id: i32,
    pub ppr_id: i32,
}
