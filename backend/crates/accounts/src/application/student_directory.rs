//! Student Directory Use Case
//!
//! Institute-scoped student lookups for TPO accounts.

use std::sync::Arc;

use kernel::id::AccountId;

use crate::domain::directory::{self, STUDENT_STORES};
use crate::domain::entity::{Account, profile::same_institute};
use crate::domain::repository::AccountRepository;
use crate::error::{AuthError, AuthResult};

pub struct StudentDirectoryUseCase<R>
where
    R: AccountRepository,
{
    repo: Arc<R>,
}

impl<R> StudentDirectoryUseCase<R>
where
    R: AccountRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(&self, institute: &str) -> AuthResult<Vec<Account>> {
        self.repo.list_students_by_college(institute).await
    }

    /// One student, only if enrolled at `institute`
    pub async fn get(&self, institute: &str, student_id: &str) -> AuthResult<Account> {
        let id = AccountId::parse_str(student_id)
            .map_err(|_| AuthError::NotFound("Student not found"))?;

        let student = directory::find_by_id(self.repo.as_ref(), &STUDENT_STORES, &id)
            .await?
            .ok_or(AuthError::NotFound("Student not found"))?;

        let academic = student
            .profile
            .academic()
            .ok_or(AuthError::NotFound("Student not found"))?;

        if !same_institute(&academic.college_name, institute) {
            return Err(AuthError::Forbidden(
                "Access denied. Student belongs to a different institute",
            ));
        }

        Ok(student)
    }
}
