//! Postgres-backed alumni store
//!
//! Expects an `alumni` table with one column per [`AlumniRecord`] field plus
//! `id bigserial primary key`, `created_at timestamptz default now()`, and a
//! unique constraint on `alumni_id`. Schema management is out of scope here;
//! the table is provisioned by the hosting platform.

use async_trait::async_trait;
use sqlx::{PgPool, QueryBuilder, Row};

use super::{AlumniStore, StoreError, StoredAlumni};
use crate::record::AlumniRecord;

/// Store client over an injected connection pool.
///
/// The pool is created once per process run by the caller and closed after
/// the run completes or fails fatally.
#[derive(Debug, Clone)]
pub struct PgAlumniStore {
    pool: PgPool,
}

impl PgAlumniStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlumniStore for PgAlumniStore {
    async fn insert_batch(&self, records: &[AlumniRecord]) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut builder: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
            "INSERT INTO alumni (alumni_id, institution_id, admission_number, admission_date, \
             full_name, date_of_birth, sex, profile_picture_url, biography, field_of_study, \
             phone, email, facebook_handle, twitter_handle, linkedin_handle, current_position, \
             current_company, parent_guardian_names, note, address_at_school, \
             last_school_attended, graduation_date, graduation_year, combined_fields) ",
        );

        builder.push_values(records, |mut row, record| {
            row.push_bind(&record.alumni_id)
                .push_bind(record.institution_id)
                .push_bind(&record.admission_number)
                .push_bind(record.admission_date)
                .push_bind(&record.full_name)
                .push_bind(record.date_of_birth)
                .push_bind(record.sex.map(|s| s.as_str()))
                .push_bind(&record.profile_picture_url)
                .push_bind(&record.biography)
                .push_bind(&record.field_of_study)
                .push_bind(&record.phone)
                .push_bind(&record.email)
                .push_bind(&record.facebook_handle)
                .push_bind(&record.twitter_handle)
                .push_bind(&record.linkedin_handle)
                .push_bind(&record.current_position)
                .push_bind(&record.current_company)
                .push_bind(&record.parent_guardian_names)
                .push_bind(&record.note)
                .push_bind(&record.address_at_school)
                .push_bind(&record.last_school_attended)
                .push_bind(record.graduation_date)
                .push_bind(record.graduation_year)
                .push_bind(&record.combined_fields);
        });

        // Re-imports hit the alumni_id uniqueness constraint; upsert so the
        // latest export wins.
        builder.push(
            " ON CONFLICT (alumni_id) DO UPDATE SET \
             institution_id = EXCLUDED.institution_id, \
             admission_number = EXCLUDED.admission_number, \
             admission_date = EXCLUDED.admission_date, \
             full_name = EXCLUDED.full_name, \
             date_of_birth = EXCLUDED.date_of_birth, \
             sex = EXCLUDED.sex, \
             profile_picture_url = EXCLUDED.profile_picture_url, \
             biography = EXCLUDED.biography, \
             field_of_study = EXCLUDED.field_of_study, \
             phone = EXCLUDED.phone, \
             email = EXCLUDED.email, \
             facebook_handle = EXCLUDED.facebook_handle, \
             twitter_handle = EXCLUDED.twitter_handle, \
             linkedin_handle = EXCLUDED.linkedin_handle, \
             current_position = EXCLUDED.current_position, \
             current_company = EXCLUDED.current_company, \
             parent_guardian_names = EXCLUDED.parent_guardian_names, \
             note = EXCLUDED.note, \
             address_at_school = EXCLUDED.address_at_school, \
             last_school_attended = EXCLUDED.last_school_attended, \
             graduation_date = EXCLUDED.graduation_date, \
             graduation_year = EXCLUDED.graduation_year, \
             combined_fields = EXCLUDED.combined_fields",
        );

        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn count_missing_graduation_year(&self) -> Result<i64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM alumni \
             WHERE graduation_date IS NOT NULL AND graduation_year IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get::<i64, _>("count")?)
    }

    async fn fetch_missing_graduation_year(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<StoredAlumni>, StoreError> {
        let rows = sqlx::query_as::<_, StoredAlumni>(
            "SELECT alumni_id, graduation_date FROM alumni \
             WHERE graduation_date IS NOT NULL AND graduation_year IS NULL \
             ORDER BY created_at ASC, id ASC \
             LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn set_graduation_year(&self, alumni_id: &str, year: i32) -> Result<(), StoreError> {
        sqlx::query("UPDATE alumni SET graduation_year = $1 WHERE alumni_id = $2")
            .bind(year)
            .bind(alumni_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count_with_graduation_year(&self) -> Result<i64, StoreError> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM alumni WHERE graduation_year IS NOT NULL",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get::<i64, _>("count")?)
    }
}
