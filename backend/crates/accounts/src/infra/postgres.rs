//! PostgreSQL Repository Implementation
//!
//! One table per [`AccountKind`]. Common columns are shared by name across
//! tables; the role columns are read through one row type per kind.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::domain::entity::{
    AcademicRecord, Account, CompanyProfile, LegacyProfile, Profile, StudentProfile,
    SuperAdminProfile, TpoProfile,
};
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_kind::AccountKind, account_status::AccountStatus, contact_number::ContactNumber,
    email::Email, one_time_code::OneTimeCode, password::PasswordHash,
    reset_token::ResetTokenDigest, role::Role,
};
use crate::error::{AuthError, AuthResult};

const COMMON_COLUMNS: &str = "id, email, password_hash, status, is_verified, google_id, \
     email_otp_code, email_otp_expires_at, reset_token_hash, reset_token_expires_at, \
     profile_picture, last_login, created_at, updated_at";

const COMMON_COLUMN_COUNT: usize = 14;

/// PostgreSQL-backed account repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn select(&self, kind: AccountKind, filter: Filter) -> AuthResult<Vec<Account>> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY created_at DESC",
            kind.table(),
            filter.clause(kind)
        );

        match kind {
            AccountKind::Student => self.fetch_rows::<StudentRow>(&sql, filter).await,
            AccountKind::Company => self.fetch_rows::<CompanyRow>(&sql, filter).await,
            AccountKind::Tpo => self.fetch_rows::<TpoRow>(&sql, filter).await,
            AccountKind::SuperAdmin => self.fetch_rows::<SuperAdminRow>(&sql, filter).await,
            AccountKind::Legacy => self.fetch_rows::<LegacyRow>(&sql, filter).await,
        }
    }

    async fn fetch_rows<T>(&self, sql: &str, filter: Filter) -> AuthResult<Vec<Account>>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + IntoAccount + Send + Unpin,
    {
        let query = sqlx::query_as::<_, T>(sql);
        let query = match filter {
            Filter::Id(id) => query.bind(id),
            Filter::Email(email) | Filter::ResetHash(email) | Filter::College(email) => {
                query.bind(email)
            }
            Filter::Status(status) => query.bind(status.code()),
        };

        query
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(IntoAccount::into_account)
            .collect()
    }

    async fn select_one(&self, kind: AccountKind, filter: Filter) -> AuthResult<Option<Account>> {
        Ok(self.select(kind, filter).await?.into_iter().next())
    }
}

// ============================================================================
// Query filters
// ============================================================================

enum Filter {
    Id(Uuid),
    Email(String),
    ResetHash(String),
    Status(AccountStatus),
    College(String),
}

impl Filter {
    fn clause(&self, kind: AccountKind) -> &'static str {
        match (self, kind) {
            (Filter::Id(_), _) => "id = $1",
            (Filter::Email(_), _) => "email = $1",
            (Filter::ResetHash(_), _) => "reset_token_hash = $1",
            (Filter::Status(_), _) => "status = $1",
            (Filter::College(_), AccountKind::Legacy) => {
                "role = 'student' AND lower(trim(student_college_name)) = lower(trim($1))"
            }
            (Filter::College(_), _) => "lower(trim(college_name)) = lower(trim($1))",
        }
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountRepository {
    async fn create(&self, account: &Account) -> AuthResult<()> {
        let kind = account.kind();
        let (extra_columns, extra_count) = extra_columns(kind);
        let placeholders = (1..=COMMON_COLUMN_COUNT + extra_count)
            .map(|n| format!("${}", n))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES ({})",
            kind.table(),
            COMMON_COLUMNS,
            extra_columns,
            placeholders
        );

        let query = bind_common(sqlx::query(&sql), account);
        let query = match &account.profile {
            Profile::Student(p) => query
                .bind(&p.name)
                .bind(&p.academic.roll_number)
                .bind(&p.academic.branch)
                .bind(p.academic.graduation_year)
                .bind(&p.academic.college_name)
                .bind(p.is_active),
            Profile::Company(p) => query
                .bind(&p.company_name)
                .bind(p.contact_number.as_str())
                .bind(p.industry.as_deref()),
            Profile::Tpo(p) => query
                .bind(&p.name)
                .bind(&p.institute_name)
                .bind(p.contact_number.as_str())
                .bind(p.designation.as_deref()),
            Profile::SuperAdmin(p) => query.bind(&p.name),
            Profile::Legacy(p) => {
                let student = p.student.as_ref();
                let company = p.company.as_ref();
                let tpo = p.tpo.as_ref();
                query
                    .bind(p.role.code())
                    .bind(&p.name)
                    .bind(student.map(|s| s.roll_number.as_str()))
                    .bind(student.map(|s| s.branch.as_str()))
                    .bind(student.map(|s| s.graduation_year))
                    .bind(student.map(|s| s.college_name.as_str()))
                    .bind(company.map(|c| c.company_name.as_str()))
                    .bind(company.map(|c| c.contact_number.as_str()))
                    .bind(company.and_then(|c| c.industry.as_deref()))
                    .bind(tpo.map(|t| t.institute_name.as_str()))
                    .bind(tpo.map(|t| t.contact_number.as_str()))
                    .bind(tpo.and_then(|t| t.designation.as_deref()))
            }
        };

        query
            .execute(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        Ok(())
    }

    async fn find_by_id(&self, kind: AccountKind, id: &AccountId) -> AuthResult<Option<Account>> {
        self.select_one(kind, Filter::Id(*id.as_uuid())).await
    }

    async fn find_by_email(
        &self,
        kind: AccountKind,
        email: &Email,
    ) -> AuthResult<Option<Account>> {
        self.select_one(kind, Filter::Email(email.as_str().to_string()))
            .await
    }

    async fn exists_by_email(&self, kind: AccountKind, email: &Email) -> AuthResult<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE email = $1)",
            kind.table()
        );
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(email.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn roll_number_taken(&self, roll_number: &str) -> AuthResult<bool> {
        let taken = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM students WHERE roll_number = $1)
                OR EXISTS(SELECT 1 FROM users WHERE student_roll_number = $1)
            "#,
        )
        .bind(roll_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn find_by_reset_token(
        &self,
        kind: AccountKind,
        token_hash: &str,
    ) -> AuthResult<Option<Account>> {
        self.select_one(kind, Filter::ResetHash(token_hash.to_string()))
            .await
    }

    async fn update(&self, account: &Account) -> AuthResult<()> {
        let kind = account.kind();
        let student_active = match &account.profile {
            Profile::Student(p) => Some(p.is_active),
            _ => None,
        };
        let sql = format!(
            r#"
            UPDATE {} SET
                email = $2,
                password_hash = $3,
                status = $4,
                is_verified = $5,
                google_id = $6,
                email_otp_code = $7,
                email_otp_expires_at = $8,
                reset_token_hash = $9,
                reset_token_expires_at = $10,
                profile_picture = $11,
                last_login = $12,
                updated_at = $13{}
            WHERE id = $1
            "#,
            kind.table(),
            if student_active.is_some() {
                ",\n                is_active = $14"
            } else {
                ""
            }
        );

        let otp = account.email_otp.as_ref();
        let reset = account.password_reset.as_ref();
        let mut query = sqlx::query(&sql)
            .bind(account.id.as_uuid())
            .bind(account.email.as_str())
            .bind(account.password_hash.as_str())
            .bind(account.status.code())
            .bind(account.is_verified)
            .bind(account.google_id.as_deref())
            .bind(otp.map(|o| o.code()))
            .bind(otp.map(|o| o.expires_at()))
            .bind(reset.map(|r| r.token_hash.as_str()))
            .bind(reset.map(|r| r.expires_at))
            .bind(account.profile_picture.as_deref())
            .bind(account.last_login)
            .bind(account.updated_at);
        if let Some(is_active) = student_active {
            query = query.bind(is_active);
        }

        query.execute(&self.pool).await?;

        Ok(())
    }

    async fn transition_status(
        &self,
        kind: AccountKind,
        id: &AccountId,
        target: AccountStatus,
    ) -> AuthResult<u64> {
        let now = Utc::now();

        let result = if kind == AccountKind::Student {
            sqlx::query(
                r#"
                UPDATE students SET status = $2, is_active = $3, updated_at = $4
                WHERE id = $1 AND status = 'pending'
                "#,
            )
            .bind(id.as_uuid())
            .bind(target.code())
            .bind(target == AccountStatus::Active)
            .bind(now)
            .execute(&self.pool)
            .await?
        } else {
            let sql = format!(
                "UPDATE {} SET status = $2, updated_at = $3 WHERE id = $1 AND status = 'pending'",
                kind.table()
            );
            sqlx::query(&sql)
                .bind(id.as_uuid())
                .bind(target.code())
                .bind(now)
                .execute(&self.pool)
                .await?
        };

        Ok(result.rows_affected())
    }

    async fn list_by_status(
        &self,
        kind: AccountKind,
        status: AccountStatus,
    ) -> AuthResult<Vec<Account>> {
        self.select(kind, Filter::Status(status)).await
    }

    async fn list_students_by_college(&self, college_name: &str) -> AuthResult<Vec<Account>> {
        let mut students = self
            .select(AccountKind::Student, Filter::College(college_name.to_string()))
            .await?;
        students.extend(
            self.select(AccountKind::Legacy, Filter::College(college_name.to_string()))
                .await?,
        );
        students.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(students)
    }

    async fn delete(&self, kind: AccountKind, id: &AccountId) -> AuthResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let deleted = sqlx::query(&sql)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn clear_expired_tokens(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let mut cleared = 0;

        for kind in AccountKind::ALL {
            let otp_sql = format!(
                "UPDATE {} SET email_otp_code = NULL, email_otp_expires_at = NULL \
                 WHERE email_otp_expires_at < $1",
                kind.table()
            );
            cleared += sqlx::query(&otp_sql)
                .bind(now)
                .execute(&self.pool)
                .await?
                .rows_affected();

            let reset_sql = format!(
                "UPDATE {} SET reset_token_hash = NULL, reset_token_expires_at = NULL \
                 WHERE reset_token_expires_at < $1",
                kind.table()
            );
            cleared += sqlx::query(&reset_sql)
                .bind(now)
                .execute(&self.pool)
                .await?
                .rows_affected();
        }

        Ok(cleared)
    }
}

fn extra_columns(kind: AccountKind) -> (&'static str, usize) {
    match kind {
        AccountKind::Student => (
            "name, roll_number, branch, graduation_year, college_name, is_active",
            6,
        ),
        AccountKind::Company => ("company_name, contact_number, industry", 3),
        AccountKind::Tpo => ("name, institute_name, contact_number, designation", 4),
        AccountKind::SuperAdmin => ("name", 1),
        AccountKind::Legacy => (
            "role, name, student_roll_number, student_branch, student_graduation_year, \
             student_college_name, company_name, company_contact_number, company_industry, \
             tpo_institute_name, tpo_contact_number, tpo_designation",
            12,
        ),
    }
}

fn bind_common<'q>(
    query: Query<'q, Postgres, PgArguments>,
    account: &'q Account,
) -> Query<'q, Postgres, PgArguments> {
    let otp = account.email_otp.as_ref();
    let reset = account.password_reset.as_ref();
    query
        .bind(account.id.as_uuid())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.status.code())
        .bind(account.is_verified)
        .bind(account.google_id.as_deref())
        .bind(otp.map(|o| o.code()))
        .bind(otp.map(|o| o.expires_at()))
        .bind(reset.map(|r| r.token_hash.as_str()))
        .bind(reset.map(|r| r.expires_at))
        .bind(account.profile_picture.as_deref())
        .bind(account.last_login)
        .bind(account.created_at)
        .bind(account.updated_at)
}

/// Unique violations on insert become the matching conflict
fn map_unique_violation(err: sqlx::Error) -> AuthError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let roll_number = db_err
                .constraint()
                .is_some_and(|name| name.contains("roll_number"));
            return if roll_number {
                AuthError::RollNumberTaken
            } else {
                AuthError::EmailTaken
            };
        }
    }
    AuthError::Database(err)
}

// ============================================================================
// Row Types
// ============================================================================

trait IntoAccount {
    fn into_account(self) -> AuthResult<Account>;
}

#[derive(sqlx::FromRow)]
struct CommonRow {
    id: Uuid,
    email: String,
    password_hash: String,
    status: String,
    is_verified: bool,
    google_id: Option<String>,
    email_otp_code: Option<String>,
    email_otp_expires_at: Option<DateTime<Utc>>,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    profile_picture: Option<String>,
    last_login: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommonRow {
    fn into_account(self, profile: Profile) -> AuthResult<Account> {
        let status = AccountStatus::from_code(&self.status)
            .ok_or_else(|| AuthError::Internal(format!("Invalid status: {}", self.status)))?;

        let email_otp = match (self.email_otp_code, self.email_otp_expires_at) {
            (Some(code), Some(expires_at)) => Some(OneTimeCode::from_db(code, expires_at)),
            _ => None,
        };
        let password_reset = match (self.reset_token_hash, self.reset_token_expires_at) {
            (Some(token_hash), Some(expires_at)) => Some(ResetTokenDigest {
                token_hash,
                expires_at,
            }),
            _ => None,
        };

        Ok(Account {
            id: AccountId::from_uuid(self.id),
            email: Email::from_db(self.email),
            password_hash: PasswordHash::from_db(self.password_hash)?,
            status,
            is_verified: self.is_verified,
            google_id: self.google_id,
            email_otp,
            password_reset,
            profile_picture: self.profile_picture,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
            profile,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StudentRow {
    #[sqlx(flatten)]
    common: CommonRow,
    name: String,
    roll_number: String,
    branch: String,
    graduation_year: i32,
    college_name: String,
    is_active: bool,
}

impl IntoAccount for StudentRow {
    fn into_account(self) -> AuthResult<Account> {
        self.common.into_account(Profile::Student(StudentProfile {
            name: self.name,
            academic: AcademicRecord {
                roll_number: self.roll_number,
                branch: self.branch,
                graduation_year: self.graduation_year,
                college_name: self.college_name,
            },
            is_active: self.is_active,
        }))
    }
}

#[derive(sqlx::FromRow)]
struct CompanyRow {
    #[sqlx(flatten)]
    common: CommonRow,
    company_name: String,
    contact_number: String,
    industry: Option<String>,
}

impl IntoAccount for CompanyRow {
    fn into_account(self) -> AuthResult<Account> {
        self.common.into_account(Profile::Company(CompanyProfile {
            company_name: self.company_name,
            contact_number: ContactNumber::from_db(self.contact_number),
            industry: self.industry,
        }))
    }
}

#[derive(sqlx::FromRow)]
struct TpoRow {
    #[sqlx(flatten)]
    common: CommonRow,
    name: String,
    institute_name: String,
    contact_number: String,
    designation: Option<String>,
}

impl IntoAccount for TpoRow {
    fn into_account(self) -> AuthResult<Account> {
        self.common.into_account(Profile::Tpo(TpoProfile {
            name: self.name,
            institute_name: self.institute_name,
            contact_number: ContactNumber::from_db(self.contact_number),
            designation: self.designation,
        }))
    }
}

#[derive(sqlx::FromRow)]
struct SuperAdminRow {
    #[sqlx(flatten)]
    common: CommonRow,
    name: String,
}

impl IntoAccount for SuperAdminRow {
    fn into_account(self) -> AuthResult<Account> {
        self.common
            .into_account(Profile::SuperAdmin(SuperAdminProfile { name: self.name }))
    }
}

#[derive(sqlx::FromRow)]
struct LegacyRow {
    #[sqlx(flatten)]
    common: CommonRow,
    role: String,
    name: String,
    student_roll_number: Option<String>,
    student_branch: Option<String>,
    student_graduation_year: Option<i32>,
    student_college_name: Option<String>,
    company_name: Option<String>,
    company_contact_number: Option<String>,
    company_industry: Option<String>,
    tpo_institute_name: Option<String>,
    tpo_contact_number: Option<String>,
    tpo_designation: Option<String>,
}

impl IntoAccount for LegacyRow {
    fn into_account(self) -> AuthResult<Account> {
        let role = Role::from_code(&self.role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role: {}", self.role)))?;

        let student = match (
            self.student_roll_number,
            self.student_branch,
            self.student_graduation_year,
            self.student_college_name,
        ) {
            (Some(roll_number), Some(branch), Some(graduation_year), Some(college_name)) => {
                Some(AcademicRecord {
                    roll_number,
                    branch,
                    graduation_year,
                    college_name,
                })
            }
            _ => None,
        };
        let company = self.company_name.map(|company_name| CompanyProfile {
            company_name,
            contact_number: ContactNumber::from_db(
                self.company_contact_number.unwrap_or_default(),
            ),
            industry: self.company_industry,
        });
        let tpo = self.tpo_institute_name.map(|institute_name| TpoProfile {
            name: self.name.clone(),
            institute_name,
            contact_number: ContactNumber::from_db(self.tpo_contact_number.unwrap_or_default()),
            designation: self.tpo_designation,
        });

        self.common.into_account(Profile::Legacy(LegacyProfile {
            role,
            name: self.name,
            student,
            company,
            tpo,
        }))
    }
}
