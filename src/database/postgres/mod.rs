mod donors;
mod requests;

pub use donors::PgDonorRepository;
pub use requests::PgRequestRepository;

use sqlx::postgres::PgArguments;
use sqlx::{FromRow, Postgres};

use crate::filter::SqlResult;

/// Bind rendered filter parameters onto a typed query
fn bind_params<'q, O>(
    mut q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    sql: &'q SqlResult,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    for p in sql.params.iter() {
        q = q.bind(p);
    }
    q
}
