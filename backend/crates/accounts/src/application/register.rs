//! Register Use Case
//!
//! Creates a pending, unverified account and emails its verification code.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use kernel::error::app_error::AppResult;
use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::domain::directory;
use crate::domain::entity::{
    AcademicRecord, Account, CompanyProfile, Profile, StudentProfile, TpoProfile,
};
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::domain::value_object::{
    account_status::AccountStatus,
    contact_number::ContactNumber,
    email::Email,
    one_time_code::OneTimeCode,
    password::{PasswordHash, RawPassword},
    role::Role,
};
use crate::error::{AuthError, AuthResult, FieldError};

const COMPANY_NAME_MIN: usize = 2;
const COMPANY_NAME_MAX: usize = 100;
const GRADUATION_WINDOW_YEARS: i32 = 10;

/// Register input. Role-specific fields are optional at this level and
/// checked against the chosen role.
#[derive(Default)]
pub struct RegisterInput {
    pub role: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub branch: Option<String>,
    pub graduation_year: Option<i32>,
    pub college_name: Option<String>,
    pub company_name: Option<String>,
    pub contact_number: Option<String>,
    pub industry: Option<String>,
    pub institute_name: Option<String>,
    pub designation: Option<String>,
}

#[derive(Debug)]
pub struct RegisterOutput {
    pub user_id: AccountId,
    pub role: Role,
    pub status: AccountStatus,
}

pub struct RegisterUseCase<R, N>
where
    R: AccountRepository,
    N: EmailNotifier,
{
    repo: Arc<R>,
    notifier: Arc<N>,
    config: Arc<AuthConfig>,
}

impl<R, N> RegisterUseCase<R, N>
where
    R: AccountRepository,
    N: EmailNotifier,
{
    pub fn new(repo: Arc<R>, notifier: Arc<N>, config: Arc<AuthConfig>) -> Self {
        Self {
            repo,
            notifier,
            config,
        }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        let (email, password, profile) = validate(input)?;

        if directory::email_registered(self.repo.as_ref(), &email).await? {
            return Err(AuthError::EmailTaken);
        }

        if let Some(academic) = profile.academic() {
            if self.repo.roll_number_taken(&academic.roll_number).await? {
                return Err(AuthError::RollNumberTaken);
            }
        }

        let password_hash = PasswordHash::from_raw(&password, self.config.bcrypt_cost)?;
        let otp = OneTimeCode::generate(self.config.otp_ttl());
        let account = Account::register(email, password_hash, profile, otp.clone());

        self.repo.create(&account).await?;

        tracing::info!(
            user_id = %account.id,
            role = %account.role(),
            "Account registered"
        );

        let sent = self
            .notifier
            .send_verification_code(&account.email, account.profile.display_name(), otp.code())
            .await;
        self.config
            .email_delivery
            .settle(sent, "verification code")?;

        Ok(RegisterOutput {
            user_id: account.id,
            role: account.role(),
            status: account.status,
        })
    }
}

/// Collects every field problem before failing
struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn new() -> Self {
        Self { errors: Vec::new() }
    }

    fn value<T>(&mut self, field: &'static str, result: AppResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(FieldError::new(field, e.message()));
                None
            }
        }
    }

    fn required(&mut self, field: &'static str, label: &str, value: Option<String>) -> Option<String> {
        match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.fail(field, format!("{} is required", label));
                None
            }
        }
    }

    fn fail(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn validate(mut input: RegisterInput) -> AuthResult<(Email, RawPassword, Profile)> {
    let mut checks = Checks::new();

    let role = Role::from_registration_code(&input.role);
    if role.is_none() {
        checks.fail("role", "Role must be one of student, company, tpo");
    }

    let email = checks.value("email", Email::new(&input.email));
    let password = checks.value(
        "password",
        RawPassword::new(std::mem::take(&mut input.password)),
    );
    let confirm = RawPassword::for_comparison(std::mem::take(&mut input.confirm_password));
    if let Some(password) = &password {
        if !password.matches(&confirm) {
            checks.fail("confirmPassword", "Passwords do not match");
        }
    }

    let profile = match role {
        Some(Role::Student) => student_profile(&mut checks, &input),
        Some(Role::Company) => company_profile(&mut checks, &input),
        Some(Role::Tpo) => tpo_profile(&mut checks, &input),
        _ => None,
    };

    match (email, password, profile) {
        (Some(email), Some(password), Some(profile)) if checks.errors.is_empty() => {
            Ok((email, password, profile))
        }
        _ => Err(AuthError::Validation(checks.errors)),
    }
}

fn student_profile(checks: &mut Checks, input: &RegisterInput) -> Option<Profile> {
    let name = checks.required("name", "Name", input.name.clone());
    let roll_number = checks.required("rollNumber", "Roll number", input.roll_number.clone());
    let branch = checks.required("branch", "Branch", input.branch.clone());
    let college_name = checks.required("collegeName", "College name", input.college_name.clone());

    let this_year = Utc::now().year();
    let graduation_year = match input.graduation_year {
        Some(year) if (this_year..=this_year + GRADUATION_WINDOW_YEARS).contains(&year) => Some(year),
        Some(_) => {
            checks.fail(
                "graduationYear",
                format!(
                    "Graduation year must be between {} and {}",
                    this_year,
                    this_year + GRADUATION_WINDOW_YEARS
                ),
            );
            None
        }
        None => {
            checks.fail("graduationYear", "Graduation year is required");
            None
        }
    };

    Some(Profile::Student(StudentProfile {
        name: name?,
        academic: AcademicRecord {
            roll_number: roll_number?,
            branch: branch?,
            graduation_year: graduation_year?,
            college_name: college_name?,
        },
        is_active: false,
    }))
}

fn company_profile(checks: &mut Checks, input: &RegisterInput) -> Option<Profile> {
    let company_name = checks.required("companyName", "Company name", input.company_name.clone());
    let company_name = company_name.and_then(|name| {
        let len = name.chars().count();
        if (COMPANY_NAME_MIN..=COMPANY_NAME_MAX).contains(&len) {
            Some(name)
        } else {
            checks.fail(
                "companyName",
                format!(
                    "Company name must be between {} and {} characters",
                    COMPANY_NAME_MIN, COMPANY_NAME_MAX
                ),
            );
            None
        }
    });
    let contact_number = contact(checks, input);

    Some(Profile::Company(CompanyProfile {
        company_name: company_name?,
        contact_number: contact_number?,
        industry: optional(input.industry.clone()),
    }))
}

fn tpo_profile(checks: &mut Checks, input: &RegisterInput) -> Option<Profile> {
    let name = checks.required("name", "Name", input.name.clone());
    let institute_name =
        checks.required("instituteName", "Institute name", input.institute_name.clone());
    let contact_number = contact(checks, input);

    Some(Profile::Tpo(TpoProfile {
        name: name?,
        institute_name: institute_name?,
        contact_number: contact_number?,
        designation: optional(input.designation.clone()),
    }))
}

fn contact(checks: &mut Checks, input: &RegisterInput) -> Option<ContactNumber> {
    let raw = input.contact_number.clone().unwrap_or_default();
    checks.value("contactNumber", ContactNumber::new(raw))
}
