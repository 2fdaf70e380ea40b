//! HTTP Handlers for `/api/tpo`
//!
//! Every route runs inside the caller's institute scope.

use axum::Json;
use axum::extract::{Extension, Path, State};

use crate::application::StudentDirectoryUseCase;
use crate::domain::entity::AccountView;
use crate::domain::notifier::EmailNotifier;
use crate::domain::repository::AccountRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{StudentListResponse, StudentResponse};
use crate::presentation::handlers::AccountsState;
use crate::presentation::middleware::InstituteScope;

/// GET /api/tpo/students
pub async fn list_students<R, N>(
    State(state): State<AccountsState<R, N>>,
    Extension(InstituteScope(institute)): Extension<InstituteScope>,
) -> AuthResult<Json<StudentListResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let students = StudentDirectoryUseCase::new(state.repo.clone())
        .list(&institute)
        .await?;

    Ok(Json(StudentListResponse {
        success: true,
        count: students.len(),
        students: students.iter().map(AccountView::from).collect(),
    }))
}

/// GET /api/tpo/students/{student_id}
pub async fn get_student<R, N>(
    State(state): State<AccountsState<R, N>>,
    Extension(InstituteScope(institute)): Extension<InstituteScope>,
    Path(student_id): Path<String>,
) -> AuthResult<Json<StudentResponse>>
where
    R: AccountRepository + Sync + 'static,
    N: EmailNotifier + Sync + 'static,
{
    let student = StudentDirectoryUseCase::new(state.repo.clone())
        .get(&institute, &student_id)
        .await?;

    Ok(Json(StudentResponse {
        success: true,
        student: AccountView::from(&student),
    }))
}
