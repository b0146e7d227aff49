//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{role::PermissionSet, user, User},
    infra::{
        database::{self, postgres::Connection as _, Postgres},
        Database,
    },
};

impl Database<Select<By<Option<User>, user::Id>>> for Postgres {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT u.id, u.email, u.first_name, u.last_name, \
                   u.agency_id::TEXT AS agency_id, \
                   a.name AS agency_name, \
                   r.name AS role_name, \
                   r.permissions \
            FROM agency_users AS u \
            LEFT JOIN agencies AS a ON a.id = u.agency_id \
            LEFT JOIN agency_user_roles AS r ON r.id = u.role_id \
            WHERE u.id = $1::UUID \
              AND u.is_active \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| User {
                id: row.get("id"),
                email: row.get("email"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                agency_id: row.get("agency_id"),
                agency_name: row.get("agency_name"),
                role: row.get("role_name"),
                permissions: row
                    .get::<_, Option<serde_json::Value>>("permissions")
                    .and_then(PermissionSet::from_json),
            }))
    }
}
