//! [`Session`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select, Update};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::Session;
use crate::{
    domain::user::{
        self,
        session::{
            record::{self, Revocation},
            Record, Token,
        },
    },
    infra::{
        database::{self, postgres::Connection as _, Postgres},
        Database,
    },
};

impl Database<Select<By<Option<Record>, (Token, user::Id)>>> for Postgres {
    type Ok = Option<Record>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Record>, (Token, user::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (token, user_id) = by.into_inner();

        const SQL: &str = "\
            SELECT id, session_token, agency_user_id, \
                   is_active, expires_at, \
                   ip_address, user_agent, \
                   created_at \
            FROM agency_sessions \
            WHERE session_token = $1::VARCHAR \
              AND agency_user_id = $2::UUID \
              AND is_active \
            LIMIT 1";
        Ok(self
            .query_opt(SQL, &[&token, &user_id])
            .await
            .map_err(tracerr::wrap!())?
            .map(|row| Record {
                id: row.get("id"),
                token: row.get("session_token"),
                user_id: row.get("agency_user_id"),
                is_active: row.get("is_active"),
                expires_at: row.get("expires_at"),
                client_address: row.get("ip_address"),
                user_agent: row.get("user_agent"),
                created_at: row.get("created_at"),
            }))
    }
}

impl Database<Insert<Record>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(record): Insert<Record>,
    ) -> Result<Self::Ok, Self::Err> {
        let Record {
            id,
            token,
            user_id,
            is_active,
            expires_at,
            client_address,
            user_agent,
            created_at,
        } = record;

        const SQL: &str = "\
            INSERT INTO agency_sessions (\
                id, session_token, agency_user_id, \
                is_active, expires_at, \
                ip_address, user_agent, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::VARCHAR, $3::UUID, \
                $4::BOOL, $5::TIMESTAMPTZ, \
                $6::VARCHAR, $7::VARCHAR, \
                $8::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &token,
                &user_id,
                &is_active,
                &expires_at,
                &client_address,
                &user_agent,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl Database<Update<By<Revocation, record::Id>>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Revocation, record::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            UPDATE agency_sessions \
            SET is_active = FALSE \
            WHERE id = $1::UUID";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl Database<Update<By<Revocation, Token>>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(by): Update<By<Revocation, Token>>,
    ) -> Result<Self::Ok, Self::Err> {
        let token = by.into_inner();

        const SQL: &str = "\
            UPDATE agency_sessions \
            SET is_active = FALSE \
            WHERE session_token = $1::VARCHAR";
        self.exec(SQL, &[&token])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
