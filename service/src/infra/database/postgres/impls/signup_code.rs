//! [`SignupCode`]-related [`Database`] implementations.

use common::operations::{By, Delete, Insert, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        signup_code::{Code, Handout, Redemption},
        SignupCode,
    },
    infra::{
        database::{self, postgres::Connection as _, Postgres},
        Database,
    },
};

/// Columns selected for building a [`SignupCode`] out of a [`Row`].
macro_rules! columns {
    () => {
        "code, used, given_out, given_by, comment, \
         used_by, used_at, created_at"
    };
}

/// Builds a [`SignupCode`] out of the provided [`Row`].
fn from_row(row: &Row) -> SignupCode {
    SignupCode {
        code: row.get("code"),
        used: row.get("used"),
        given_out: row.get("given_out"),
        given_by: row.get("given_by"),
        comment: row.get("comment"),
        used_by: row.get("used_by"),
        used_at: row.get("used_at"),
        created_at: row.get("created_at"),
    }
}

impl Database<Insert<Vec<SignupCode>>> for Postgres {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(codes): Insert<Vec<SignupCode>>,
    ) -> Result<Self::Ok, Self::Err> {
        if codes.is_empty() {
            return Ok(());
        }
        let (codes, created_at): (Vec<_>, Vec<_>) =
            codes.into_iter().map(|c| (c.code, c.created_at)).unzip();

        const SQL: &str = "\
            INSERT INTO signup_codes (code, used, given_out, created_at) \
            SELECT c.code, FALSE, FALSE, c.created_at \
            FROM unnest($1::VARCHAR[], $2::TIMESTAMPTZ[]) \
                 AS c(code, created_at)";
        self.exec(SQL, &[&codes, &created_at])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl Database<Select<By<Vec<SignupCode>, ()>>> for Postgres {
    type Ok = Vec<SignupCode>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Select<By<Vec<SignupCode>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = concat!(
            "SELECT ",
            columns!(),
            " FROM signup_codes \
             ORDER BY created_at DESC",
        );
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl Database<Update<Handout>> for Postgres {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(handout): Update<Handout>,
    ) -> Result<Self::Ok, Self::Err> {
        let Handout {
            code,
            given_out,
            given_by,
            comment,
        } = handout;

        const SQL: &str = "\
            UPDATE signup_codes \
            SET given_out = $2::BOOL, \
                given_by = COALESCE($3::VARCHAR, given_by), \
                comment = COALESCE($4::TEXT, comment) \
            WHERE code = $1::VARCHAR";
        self.exec(SQL, &[&code, &given_out, &given_by, &comment])
            .await
            .map_err(tracerr::wrap!())
            .map(|updated| updated > 0)
    }
}

impl Database<Delete<By<SignupCode, Code>>> for Postgres {
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<SignupCode, Code>>,
    ) -> Result<Self::Ok, Self::Err> {
        let code = by.into_inner();

        const SQL: &str = "\
            DELETE FROM signup_codes \
            WHERE code = $1::VARCHAR";
        self.exec(SQL, &[&code])
            .await
            .map_err(tracerr::wrap!())
            .map(|deleted| deleted > 0)
    }
}

impl Database<Update<Redemption>> for Postgres {
    type Ok = Option<SignupCode>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(redemption): Update<Redemption>,
    ) -> Result<Self::Ok, Self::Err> {
        let Redemption {
            code,
            used_by,
            used_at,
        } = redemption;

        // Checking and marking happen in one statement, so a code is
        // redeemed at most once.
        const SQL: &str = concat!(
            "UPDATE signup_codes \
             SET used = TRUE, \
                 used_by = $2::VARCHAR, \
                 used_at = $3::TIMESTAMPTZ \
             WHERE code = $1::VARCHAR \
               AND NOT used \
             RETURNING ",
            columns!(),
        );
        Ok(self
            .query_opt(SQL, &[&code, &used_by, &used_at])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}
