//! Workflow tests for the accounts crate
//!
//! Use cases run over the in-memory repository with a recording notifier;
//! the HTTP tests drive the assembled routers with `oneshot`.

#[cfg(test)]
mod support {
    use std::sync::{Arc, Mutex};

    use chrono::{Datelike, Utc};
    use platform::password::MIN_BCRYPT_COST;

    use crate::application::{
        AuthConfig, BootstrapInput, BootstrapSuperAdminUseCase, EmailDeliveryPolicy,
        RegisterInput, RegisterUseCase,
    };
    use crate::domain::entity::{AcademicRecord, Account, CompanyProfile, LegacyProfile, Profile};
    use crate::domain::notifier::{EmailNotifier, NotifyError};
    use crate::domain::repository::AccountRepository;
    use crate::domain::value_object::{
        contact_number::ContactNumber,
        email::Email,
        one_time_code::OneTimeCode,
        password::{PasswordHash, RawPassword},
        role::Role,
    };
    use crate::infra::InMemoryAccountRepository;
    use crate::presentation::AccountsState;

    pub const SUPERADMIN_EMAIL: &str = "root@portal.test";
    pub const SUPERADMIN_PASSWORD: &str = "rootpass";

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Sent {
        Code { to: String, code: String },
        Reset { to: String, link: String },
    }

    /// Keeps every outgoing email; optionally fails every send
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<Sent>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn last_code(&self, email: &str) -> String {
            self.sent
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find_map(|sent| match sent {
                    Sent::Code { to, code } if to == email => Some(code.clone()),
                    _ => None,
                })
                .expect("no verification code sent")
        }

        pub fn last_reset_token(&self, email: &str) -> String {
            let link = self
                .sent
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find_map(|sent| match sent {
                    Sent::Reset { to, link } if to == email => Some(link.clone()),
                    _ => None,
                })
                .expect("no reset link sent");
            link.rsplit('/').next().unwrap().to_string()
        }

        pub fn count(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    impl EmailNotifier for RecordingNotifier {
        async fn send_verification_code(
            &self,
            to: &Email,
            _name: &str,
            code: &str,
        ) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Delivery("smtp down".into()));
            }
            self.sent.lock().unwrap().push(Sent::Code {
                to: to.to_string(),
                code: code.to_string(),
            });
            Ok(())
        }

        async fn send_password_reset(
            &self,
            to: &Email,
            reset_link: &str,
        ) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::Delivery("smtp down".into()));
            }
            self.sent.lock().unwrap().push(Sent::Reset {
                to: to.to_string(),
                link: reset_link.to_string(),
            });
            Ok(())
        }
    }

    pub fn test_config() -> AuthConfig {
        AuthConfig {
            bcrypt_cost: MIN_BCRYPT_COST,
            email_delivery: EmailDeliveryPolicy::Strict,
            ..AuthConfig::development()
        }
    }

    pub struct Harness {
        pub repo: Arc<InMemoryAccountRepository>,
        pub notifier: Arc<RecordingNotifier>,
        pub config: Arc<AuthConfig>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_notifier(RecordingNotifier::default(), test_config())
        }

        pub fn with_notifier(notifier: RecordingNotifier, config: AuthConfig) -> Self {
            Self {
                repo: Arc::new(InMemoryAccountRepository::new()),
                notifier: Arc::new(notifier),
                config: Arc::new(config),
            }
        }

        pub fn state(&self) -> AccountsState<InMemoryAccountRepository, RecordingNotifier> {
            AccountsState {
                repo: self.repo.clone(),
                notifier: self.notifier.clone(),
                config: self.config.clone(),
            }
        }

        pub fn register_use_case(
            &self,
        ) -> RegisterUseCase<InMemoryAccountRepository, RecordingNotifier> {
            RegisterUseCase::new(
                self.repo.clone(),
                self.notifier.clone(),
                self.config.clone(),
            )
        }

        pub async fn register(&self, input: RegisterInput) -> Account {
            let output = self.register_use_case().execute(input).await.unwrap();
            self.account(&output.user_id.to_string()).await
        }

        pub async fn account(&self, id: &str) -> Account {
            let id = kernel::id::AccountId::parse_str(id).unwrap();
            crate::domain::directory::find_by_id(
                self.repo.as_ref(),
                &crate::domain::directory::AUTH_LOOKUP_ORDER,
                &id,
            )
            .await
            .unwrap()
            .expect("account exists")
        }

        pub async fn superadmin(&self) -> Account {
            BootstrapSuperAdminUseCase::new(self.repo.clone(), self.config.clone())
                .execute(BootstrapInput {
                    email: SUPERADMIN_EMAIL.into(),
                    password: SUPERADMIN_PASSWORD.into(),
                    name: "Root".into(),
                })
                .await
                .unwrap();
            let email = Email::new(SUPERADMIN_EMAIL).unwrap();
            crate::domain::directory::find_by_email(self.repo.as_ref(), &email)
                .await
                .unwrap()
                .unwrap()
        }

        /// Active, verified admin from the legacy table
        pub async fn legacy_admin(&self) -> Account {
            let raw = RawPassword::new("adminpass".into()).unwrap();
            let account = Account::seeded(
                Email::new("admin@portal.test").unwrap(),
                PasswordHash::from_raw(&raw, MIN_BCRYPT_COST).unwrap(),
                Profile::Legacy(LegacyProfile {
                    role: Role::Admin,
                    name: "Admin".into(),
                    student: None,
                    company: None,
                    tpo: None,
                }),
            );
            self.repo.create(&account).await.unwrap();
            account
        }

        /// Pending, unverified record in the legacy unified table
        pub async fn pending_legacy(&self, email: &str, profile: LegacyProfile) -> Account {
            let raw = RawPassword::new("abcdef".into()).unwrap();
            let account = Account::register(
                Email::new(email).unwrap(),
                PasswordHash::from_raw(&raw, MIN_BCRYPT_COST).unwrap(),
                Profile::Legacy(profile),
                OneTimeCode::generate(chrono::Duration::minutes(10)),
            );
            self.repo.create(&account).await.unwrap();
            account
        }
    }

    pub fn legacy_student(name: &str, roll_number: &str) -> LegacyProfile {
        LegacyProfile {
            role: Role::Student,
            name: name.into(),
            student: Some(AcademicRecord {
                roll_number: roll_number.into(),
                branch: "ME".into(),
                graduation_year: Utc::now().year(),
                college_name: "X".into(),
            }),
            company: None,
            tpo: None,
        }
    }

    /// Legacy company record without a top-level name
    pub fn legacy_company(company_name: &str) -> LegacyProfile {
        LegacyProfile {
            role: Role::Company,
            name: String::new(),
            student: None,
            company: Some(CompanyProfile {
                company_name: company_name.into(),
                contact_number: ContactNumber::from_db("9876543210"),
                industry: None,
            }),
            tpo: None,
        }
    }

    pub fn student_input(email: &str, roll_number: &str, college: &str) -> RegisterInput {
        RegisterInput {
            role: "student".into(),
            email: email.into(),
            password: "abcdef".into(),
            confirm_password: "abcdef".into(),
            name: Some("Asha".into()),
            roll_number: Some(roll_number.into()),
            branch: Some("CS".into()),
            graduation_year: Some(Utc::now().year()),
            college_name: Some(college.into()),
            ..Default::default()
        }
    }

    pub fn company_input(email: &str) -> RegisterInput {
        RegisterInput {
            role: "company".into(),
            email: email.into(),
            password: "abcdef".into(),
            confirm_password: "abcdef".into(),
            company_name: Some("Acme Corp".into()),
            contact_number: Some("+91 98765 43210".into()),
            ..Default::default()
        }
    }

    pub fn tpo_input(email: &str, institute: &str) -> RegisterInput {
        RegisterInput {
            role: "tpo".into(),
            email: email.into(),
            password: "abcdef".into(),
            confirm_password: "abcdef".into(),
            name: Some("Officer".into()),
            institute_name: Some(institute.into()),
            contact_number: Some("9876543210".into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod registration_tests {
    use super::support::*;
    use crate::application::EmailDeliveryPolicy;
    use crate::domain::value_object::{account_status::AccountStatus, role::Role};
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_register_creates_pending_unverified_account() {
        let h = Harness::new();
        let account = h.register(student_input("a@x.com", "R1", "X")).await;

        assert_eq!(account.status, AccountStatus::Pending);
        assert!(!account.is_verified);
        assert!(!account.is_active());
        assert_eq!(account.role(), Role::Student);
        assert!(account.email_otp.is_some());
        assert_eq!(h.notifier.last_code("a@x.com").len(), 6);
    }

    #[tokio::test]
    async fn test_email_is_unique_across_account_kinds() {
        let h = Harness::new();
        h.register(student_input("a@x.com", "R1", "X")).await;

        let err = h
            .register_use_case()
            .execute(company_input("A@X.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_duplicate_roll_number() {
        let h = Harness::new();
        h.register(student_input("a@x.com", "R1", "X")).await;

        let err = h
            .register_use_case()
            .execute(student_input("b@x.com", "R1", "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RollNumberTaken));
    }

    #[tokio::test]
    async fn test_roll_number_taken_by_legacy_student() {
        let h = Harness::new();
        h.pending_legacy("old@x.com", legacy_student("Ravi", "R9")).await;

        let err = h
            .register_use_case()
            .execute(student_input("new@x.com", "R9", "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RollNumberTaken));

        let output = h
            .register_use_case()
            .execute(student_input("new@x.com", "R10", "X"))
            .await
            .unwrap();
        assert_eq!(output.status, AccountStatus::Pending);
    }

    #[tokio::test]
    async fn test_strict_delivery_fails_registration() {
        let h = Harness::with_notifier(RecordingNotifier::failing(), test_config());
        let err = h
            .register_use_case()
            .execute(company_input("hr@acme.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailDelivery(_)));
    }

    #[tokio::test]
    async fn test_best_effort_delivery_keeps_registration() {
        let config = crate::application::AuthConfig {
            email_delivery: EmailDeliveryPolicy::BestEffort,
            ..test_config()
        };
        let h = Harness::with_notifier(RecordingNotifier::failing(), config);
        let output = h
            .register_use_case()
            .execute(company_input("hr@acme.com"))
            .await
            .unwrap();
        assert_eq!(output.status, AccountStatus::Pending);
        assert_eq!(output.role, Role::Company);
    }
}

#[cfg(test)]
mod verification_tests {
    use chrono::{Duration, Utc};

    use super::support::*;
    use crate::application::VerifyEmailUseCase;
    use crate::domain::repository::AccountRepository;
    use crate::domain::value_object::{account_status::AccountStatus, one_time_code::OneTimeCode};
    use crate::error::AuthError;

    fn use_case(
        h: &Harness,
    ) -> VerifyEmailUseCase<crate::infra::InMemoryAccountRepository, RecordingNotifier> {
        VerifyEmailUseCase::new(h.repo.clone(), h.notifier.clone(), h.config.clone())
    }

    #[tokio::test]
    async fn test_correct_code_verifies_once() {
        let h = Harness::new();
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        let code = h.notifier.last_code("a@x.com");
        let id = account.id.to_string();

        let verified = use_case(&h).verify(&id, &code).await.unwrap();
        assert!(verified.is_verified);
        assert!(verified.email_otp.is_none());
        assert_eq!(verified.status, AccountStatus::Pending);

        let again = use_case(&h).verify(&id, &code).await.unwrap_err();
        assert!(matches!(again, AuthError::AlreadyVerified));
    }

    #[tokio::test]
    async fn test_wrong_code() {
        let h = Harness::new();
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        let code = h.notifier.last_code("a@x.com");
        let wrong = if code == "111111" { "222222" } else { "111111" };

        let err = use_case(&h)
            .verify(&account.id.to_string(), wrong)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));
    }

    #[tokio::test]
    async fn test_malformed_code_and_unknown_user() {
        let h = Harness::new();
        let account = h.register(student_input("a@x.com", "R1", "X")).await;

        let err = use_case(&h)
            .verify(&account.id.to_string(), "12ab56")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));

        let err = use_case(&h)
            .verify(&kernel::id::AccountId::new().to_string(), "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_expired_code() {
        let h = Harness::new();
        let mut account = h.register(student_input("a@x.com", "R1", "X")).await;
        account.issue_otp(OneTimeCode::from_db(
            "123456".into(),
            Utc::now() - Duration::minutes(1),
        ));
        h.repo.update(&account).await.unwrap();

        let err = use_case(&h)
            .verify(&account.id.to_string(), "123456")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[tokio::test]
    async fn test_resend_replaces_code() {
        let h = Harness::new();
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        let before = h.notifier.count();

        use_case(&h).resend("a@x.com").await.unwrap();
        assert_eq!(h.notifier.count(), before + 1);

        let code = h.notifier.last_code("a@x.com");
        let stored = h.account(&account.id.to_string()).await;
        assert_eq!(stored.email_otp.unwrap().code(), code);

        let err = use_case(&h).resend("nobody@x.com").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }
}

#[cfg(test)]
mod sign_in_tests {
    use super::support::*;
    use crate::application::{ApprovalUseCase, SignInInput, SignInUseCase, VerifyEmailUseCase};
    use crate::domain::entity::Account;
    use crate::domain::value_object::role::Role;
    use crate::error::AuthError;

    fn sign_in(h: &Harness) -> SignInUseCase<crate::infra::InMemoryAccountRepository> {
        SignInUseCase::new(h.repo.clone(), h.config.clone())
    }

    fn credentials(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.into(),
            password: password.into(),
        }
    }

    async fn verify(h: &Harness, account: &Account) {
        let code = h.notifier.last_code(account.email.as_str());
        VerifyEmailUseCase::new(h.repo.clone(), h.notifier.clone(), h.config.clone())
            .verify(&account.id.to_string(), &code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_look_the_same() {
        let h = Harness::new();
        h.register(student_input("a@x.com", "R1", "X")).await;

        let unknown = sign_in(&h)
            .execute(credentials("nobody@x.com", "abcdef"))
            .await
            .unwrap_err();
        let wrong = sign_in(&h)
            .execute(credentials("a@x.com", "abcdeg"))
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_pending_student_gets_generic_message() {
        let h = Harness::new();
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        verify(&h, &account).await;

        let err = sign_in(&h)
            .execute(credentials("a@x.com", "abcdef"))
            .await
            .unwrap_err();
        match &err {
            AuthError::PendingApproval { user_id, tpo } => {
                assert_eq!(user_id, &account.id.to_string());
                assert!(!tpo);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!err.to_string().contains("superadmin"));
    }

    #[tokio::test]
    async fn test_pending_tpo_mentions_superadmin_approval() {
        let h = Harness::new();
        h.register(tpo_input("tpo@iit.ac.in", "IIT")).await;

        let err = sign_in(&h)
            .execute(credentials("tpo@iit.ac.in", "abcdef"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::PendingApproval { tpo: true, .. }));
        assert!(err.to_string().contains("superadmin approval"));
    }

    #[tokio::test]
    async fn test_approved_but_unverified_is_refused() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let account = h.register(company_input("hr@acme.com")).await;
        ApprovalUseCase::new(h.repo.clone())
            .approve(&admin, &account.id.to_string())
            .await
            .unwrap();

        let err = sign_in(&h)
            .execute(credentials("hr@acme.com", "abcdef"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailNotVerified { .. }));
    }

    #[tokio::test]
    async fn test_rejected_account_never_signs_in() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        verify(&h, &account).await;
        ApprovalUseCase::new(h.repo.clone())
            .reject(&admin, &account.id.to_string())
            .await
            .unwrap();

        let err = sign_in(&h)
            .execute(credentials("a@x.com", "abcdef"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::RegistrationRejected { .. }));
    }

    #[tokio::test]
    async fn test_full_flow_issues_token_and_records_login() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        verify(&h, &account).await;
        ApprovalUseCase::new(h.repo.clone())
            .approve(&admin, &account.id.to_string())
            .await
            .unwrap();

        let output = sign_in(&h)
            .execute(credentials("A@x.com", "abcdef"))
            .await
            .unwrap();
        assert_eq!(output.account.role(), Role::Student);
        assert!(output.account.is_active());
        assert!(output.account.last_login.is_some());

        let claims = platform::jwt::verify(&h.config.jwt_secret, &output.token).unwrap();
        assert_eq!(claims.user_id, account.id.to_string());
    }

    #[tokio::test]
    async fn test_superadmin_is_exempt_from_gates() {
        let h = Harness::new();
        h.superadmin().await;
        let output = sign_in(&h)
            .execute(credentials(SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD))
            .await
            .unwrap();
        assert_eq!(output.account.role(), Role::SuperAdmin);
    }
}

#[cfg(test)]
mod approval_tests {
    use super::support::*;
    use crate::application::ApprovalUseCase;
    use crate::domain::repository::AccountRepository;
    use crate::domain::value_object::{
        account_kind::AccountKind, account_status::AccountStatus, role::Role,
    };
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_approve_twice_reports_already_approved() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        let approval = ApprovalUseCase::new(h.repo.clone());
        let id = account.id.to_string();

        approval.approve(&admin, &id).await.unwrap();
        let stored = h.account(&id).await;
        assert_eq!(stored.status, AccountStatus::Active);
        assert!(stored.is_active());

        let err = approval.approve(&admin, &id).await.unwrap_err();
        assert_eq!(err.to_string(), "User is already approved");

        let err = approval.reject(&admin, &id).await.unwrap_err();
        assert_eq!(err.to_string(), "User is already approved");
        assert_eq!(h.account(&id).await.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_reject_then_approve_is_refused() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let account = h.register(company_input("hr@acme.com")).await;
        let approval = ApprovalUseCase::new(h.repo.clone());
        let id = account.id.to_string();

        approval.reject(&admin, &id).await.unwrap();
        let err = approval.approve(&admin, &id).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyProcessed("User is already rejected")));
    }

    #[tokio::test]
    async fn test_unknown_or_malformed_id() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let approval = ApprovalUseCase::new(h.repo.clone());

        for id in ["not-a-uuid".to_string(), kernel::id::AccountId::new().to_string()] {
            let err = approval.approve(&admin, &id).await.unwrap_err();
            assert!(matches!(err, AuthError::NotFound("User not found")));
        }
    }

    #[tokio::test]
    async fn test_only_superadmin_decides_tpo_registrations() {
        let h = Harness::new();
        let admin = h.legacy_admin().await;
        let superadmin = h.superadmin().await;
        let tpo = h.register(tpo_input("tpo@iit.ac.in", "IIT")).await;
        let approval = ApprovalUseCase::new(h.repo.clone());
        let id = tpo.id.to_string();

        let err = approval.approve(&admin, &id).await.unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));
        assert_eq!(h.account(&id).await.status, AccountStatus::Pending);

        approval.approve(&superadmin, &id).await.unwrap();
        assert_eq!(h.account(&id).await.status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_legacy_record_is_approved_in_place() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let legacy = h.pending_legacy("old@x.com", legacy_student("Ravi", "R9")).await;
        let approval = ApprovalUseCase::new(h.repo.clone());
        let id = legacy.id.to_string();

        approval.approve(&admin, &id).await.unwrap();

        let stored = h
            .repo
            .find_by_id(AccountKind::Legacy, &legacy.id)
            .await
            .unwrap()
            .expect("still in the legacy table");
        assert_eq!(stored.status, AccountStatus::Active);
        assert!(stored.is_active());

        let err = approval.reject(&admin, &id).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyProcessed("User is already approved")));
    }

    #[tokio::test]
    async fn test_pending_listing_includes_legacy_records() {
        let h = Harness::new();
        let student = h.pending_legacy("old@x.com", legacy_student("Ravi", "R9")).await;
        let company = h.pending_legacy("hr@old.com", legacy_company("Old Corp")).await;
        let approval = ApprovalUseCase::new(h.repo.clone());

        let pending = approval.pending().await.unwrap();
        assert_eq!(pending.len(), 2);

        let by_id = |id| pending.iter().find(|p| p.id == id).unwrap();
        let listed_student = by_id(student.id);
        assert_eq!(listed_student.source, "legacy");
        assert_eq!(listed_student.role, Role::Student);
        assert_eq!(listed_student.name, "Ravi");

        let listed_company = by_id(company.id);
        assert_eq!(listed_company.source, "legacy");
        assert_eq!(listed_company.role, Role::Company);
        assert_eq!(listed_company.name, "Old Corp");
    }

    #[tokio::test]
    async fn test_bulk_approve_counts_modified_records() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let a = h.register(student_input("a@x.com", "R1", "X")).await;
        let b = h.register(company_input("hr@acme.com")).await;
        let approval = ApprovalUseCase::new(h.repo.clone());

        let ids = vec![a.id.to_string(), b.id.to_string(), "missing".to_string()];
        let output = approval.bulk_approve(&admin, &ids).await;
        assert_eq!(output.requested, 3);
        assert_eq!(output.modified, 2);
    }

    #[tokio::test]
    async fn test_pending_listing_merges_stores_newest_first() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let student = h.register(student_input("a@x.com", "R1", "X")).await;
        let company = h.register(company_input("hr@acme.com")).await;
        let tpo = h.register(tpo_input("tpo@iit.ac.in", "IIT")).await;
        let approval = ApprovalUseCase::new(h.repo.clone());

        approval
            .approve(&admin, &company.id.to_string())
            .await
            .unwrap();

        let pending = approval.pending().await.unwrap();
        let ids: Vec<_> = pending.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![tpo.id, student.id]);
        assert_eq!(pending[0].source, "tpo");
        assert_eq!(pending[0].name, "Officer");
        assert_eq!(pending[1].source, "student");
        assert!(pending.windows(2).all(|w| w[0].created_at >= w[1].created_at));
    }
}

#[cfg(test)]
mod gate_tests {
    use chrono::Utc;
    use platform::jwt::{self, Claims};

    use super::support::*;
    use crate::application::{ApprovalUseCase, AuthenticateUseCase};
    use crate::error::AuthError;

    fn gate(h: &Harness) -> AuthenticateUseCase<crate::infra::InMemoryAccountRepository> {
        AuthenticateUseCase::new(h.repo.clone(), h.config.clone())
    }

    fn token_for(h: &Harness, user_id: &str) -> String {
        jwt::issue(&h.config.jwt_secret, user_id, chrono::Duration::days(7)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_invalid_and_expired_tokens() {
        let h = Harness::new();
        let admin = h.superadmin().await;

        assert!(matches!(
            gate(&h).execute(None).await.unwrap_err(),
            AuthError::MissingToken
        ));
        assert!(matches!(
            gate(&h).execute(Some("garbage")).await.unwrap_err(),
            AuthError::TokenInvalid
        ));

        let now = Utc::now().timestamp();
        let expired = jwt::encode_claims(
            &h.config.jwt_secret,
            &Claims {
                user_id: admin.id.to_string(),
                iat: now - 7200,
                exp: now - 3600,
            },
        )
        .unwrap();
        assert!(matches!(
            gate(&h).execute(Some(&expired)).await.unwrap_err(),
            AuthError::TokenExpired
        ));

        let foreign = jwt::issue(b"another-secret", &admin.id.to_string(), chrono::Duration::days(1))
            .unwrap();
        assert!(matches!(
            gate(&h).execute(Some(&foreign)).await.unwrap_err(),
            AuthError::TokenInvalid
        ));
    }

    #[tokio::test]
    async fn test_deleted_subject() {
        let h = Harness::new();
        let token = token_for(&h, &kernel::id::AccountId::new().to_string());
        assert!(matches!(
            gate(&h).execute(Some(&token)).await.unwrap_err(),
            AuthError::SubjectNotFound
        ));
    }

    #[tokio::test]
    async fn test_gate_applies_approval_and_verification() {
        let h = Harness::new();
        let admin = h.superadmin().await;
        let account = h.register(student_input("a@x.com", "R1", "X")).await;
        let token = token_for(&h, &account.id.to_string());

        assert!(matches!(
            gate(&h).execute(Some(&token)).await.unwrap_err(),
            AuthError::PendingApproval { .. }
        ));

        ApprovalUseCase::new(h.repo.clone())
            .approve(&admin, &account.id.to_string())
            .await
            .unwrap();
        assert!(matches!(
            gate(&h).execute(Some(&token)).await.unwrap_err(),
            AuthError::EmailNotVerified { .. }
        ));
    }

    #[tokio::test]
    async fn test_unverified_admin_passes() {
        let h = Harness::new();
        let mut admin = h.legacy_admin().await;
        admin.is_verified = false;
        crate::domain::repository::AccountRepository::update(h.repo.as_ref(), &admin)
            .await
            .unwrap();

        let token = token_for(&h, &admin.id.to_string());
        let resolved = gate(&h).execute(Some(&token)).await.unwrap();
        assert_eq!(resolved.id, admin.id);
    }
}

#[cfg(test)]
mod password_tests {
    use chrono::{Duration, Utc};

    use super::support::*;
    use crate::application::{
        AccountSettingsUseCase, ChangePasswordInput, PasswordResetUseCase, ResetPasswordInput,
    };
    use crate::domain::repository::AccountRepository;
    use crate::domain::value_object::{
        password::RawPassword, reset_token::ResetTokenDigest,
    };
    use crate::error::AuthError;
    use crate::infra::InMemoryAccountRepository;

    fn reset(h: &Harness) -> PasswordResetUseCase<InMemoryAccountRepository, RecordingNotifier> {
        PasswordResetUseCase::new(h.repo.clone(), h.notifier.clone(), h.config.clone())
    }

    fn reset_input(token: &str, password: &str) -> ResetPasswordInput {
        ResetPasswordInput {
            token: token.into(),
            password: password.into(),
            confirm_password: None,
        }
    }

    #[tokio::test]
    async fn test_forgot_unknown_email_sends_nothing() {
        let h = Harness::new();
        let before = h.notifier.count();
        reset(&h).forgot("nobody@x.com").await.unwrap();
        assert_eq!(h.notifier.count(), before);

        let err = reset(&h).forgot("not-an-email").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let h = Harness::new();
        let account = h.register(company_input("hr@acme.com")).await;

        reset(&h).forgot("hr@acme.com").await.unwrap();
        let token = h.notifier.last_reset_token("hr@acme.com");

        let stored = h.account(&account.id.to_string()).await;
        let digest = stored.password_reset.expect("digest stored");
        assert_ne!(digest.token_hash, token);

        reset(&h)
            .reset(reset_input(&token, "newpass1"))
            .await
            .unwrap();

        let updated = h.account(&account.id.to_string()).await;
        assert!(updated.password_reset.is_none());
        assert!(updated
            .password_hash
            .verify(&RawPassword::for_comparison("newpass1".into())));

        let err = reset(&h)
            .reset(reset_input(&token, "another1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_reset_rejects_expired_token_and_bad_password() {
        let h = Harness::new();
        let mut account = h.register(company_input("hr@acme.com")).await;

        reset(&h).forgot("hr@acme.com").await.unwrap();
        let token = h.notifier.last_reset_token("hr@acme.com");

        let err = reset(&h).reset(reset_input(&token, "abc")).await.unwrap_err();
        match err {
            AuthError::Validation(errors) => assert_eq!(errors[0].field, "password"),
            other => panic!("unexpected {other:?}"),
        }

        let mismatch = ResetPasswordInput {
            confirm_password: Some("different".into()),
            ..reset_input(&token, "newpass1")
        };
        let err = reset(&h).reset(mismatch).await.unwrap_err();
        match err {
            AuthError::Validation(errors) => assert_eq!(errors[0].field, "confirmPassword"),
            other => panic!("unexpected {other:?}"),
        }

        account = h.account(&account.id.to_string()).await;
        let digest = account.password_reset.clone().unwrap();
        account.set_password_reset(ResetTokenDigest {
            expires_at: Utc::now() - Duration::minutes(1),
            ..digest
        });
        h.repo.update(&account).await.unwrap();

        let err = reset(&h)
            .reset(reset_input(&token, "newpass1"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidResetToken));
    }

    #[tokio::test]
    async fn test_change_password_requires_current() {
        let h = Harness::new();
        let account = h.register(company_input("hr@acme.com")).await;
        let settings = AccountSettingsUseCase::new(h.repo.clone(), h.config.clone());

        let err = settings
            .change_password(
                &account,
                ChangePasswordInput {
                    current_password: "wrong!".into(),
                    new_password: "newpass1".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IncorrectPassword));

        settings
            .change_password(
                &account,
                ChangePasswordInput {
                    current_password: "abcdef".into(),
                    new_password: "newpass1".into(),
                },
            )
            .await
            .unwrap();
        let updated = h.account(&account.id.to_string()).await;
        assert!(updated
            .password_hash
            .verify(&RawPassword::for_comparison("newpass1".into())));
    }

    #[tokio::test]
    async fn test_delete_account_requires_password() {
        let h = Harness::new();
        let account = h.register(company_input("hr@acme.com")).await;
        let settings = AccountSettingsUseCase::new(h.repo.clone(), h.config.clone());

        let err = settings
            .delete_account(&account, "wrong!".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::IncorrectPassword));

        settings
            .delete_account(&account, "abcdef".into())
            .await
            .unwrap();
        assert!(
            h.repo
                .find_by_id(account.kind(), &account.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_clear_expired_tokens() {
        let h = Harness::new();
        let mut account = h.register(company_input("hr@acme.com")).await;
        account.issue_otp(crate::domain::value_object::one_time_code::OneTimeCode::from_db(
            "123456".into(),
            Utc::now() - Duration::minutes(5),
        ));
        h.repo.update(&account).await.unwrap();

        let cleared = h.repo.clear_expired_tokens(Utc::now()).await.unwrap();
        assert_eq!(cleared, 1);
        assert!(h.account(&account.id.to_string()).await.email_otp.is_none());
    }
}

#[cfg(test)]
mod directory_tests {
    use super::support::*;
    use crate::application::{BootstrapInput, BootstrapSuperAdminUseCase, StudentDirectoryUseCase};
    use crate::error::AuthError;

    #[tokio::test]
    async fn test_students_are_scoped_to_institute() {
        let h = Harness::new();
        let ours = h.register(student_input("a@x.com", "R1", "  IIT Delhi ")).await;
        let theirs = h.register(student_input("b@x.com", "R2", "NIT")).await;
        let directory = StudentDirectoryUseCase::new(h.repo.clone());

        let listed = directory.list("iit delhi").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ours.id);

        let found = directory
            .get("IIT Delhi", &ours.id.to_string())
            .await
            .unwrap();
        assert_eq!(found.id, ours.id);

        let err = directory
            .get("IIT Delhi", &theirs.id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Forbidden(_)));

        let err = directory.get("IIT Delhi", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::NotFound("Student not found")));
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let h = Harness::new();
        let bootstrap = BootstrapSuperAdminUseCase::new(h.repo.clone(), h.config.clone());
        let input = || BootstrapInput {
            email: SUPERADMIN_EMAIL.into(),
            password: SUPERADMIN_PASSWORD.into(),
            name: "Root".into(),
        };

        assert!(bootstrap.execute(input()).await.unwrap());
        assert!(!bootstrap.execute(input()).await.unwrap());
    }
}

#[cfg(test)]
mod http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, StatusCode, header};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::presentation::api_router;
    use crate::presentation::middleware::{require_auth, require_super_admin};

    async fn call(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_bearer(mut req: Request<Body>, token: &str) -> Request<Body> {
        req.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        );
        req
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, HeaderMap, Value) {
        call(app, post("/api/auth/login", json!({"email": email, "password": password}))).await
    }

    async fn superadmin_token(h: &Harness, app: &Router) -> String {
        h.superadmin().await;
        let (status, _, body) = login(app, SUPERADMIN_EMAIL, SUPERADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    fn student_body(email: &str, roll_number: &str, college: &str) -> Value {
        json!({
            "role": "student",
            "email": email,
            "password": "abcdef",
            "confirmPassword": "abcdef",
            "name": "Asha",
            "rollNumber": roll_number,
            "branch": "CS",
            "graduationYear": chrono::Datelike::year(&chrono::Utc::now()),
            "collegeName": college,
        })
    }

    /// Register, verify, and approve; returns the user id
    async fn onboard(h: &Harness, app: &Router, admin_token: &str, body: Value) -> String {
        let email = body["email"].as_str().unwrap().to_string();
        let (status, _, registered) = call(app, post("/api/auth/register", body)).await;
        assert_eq!(status, StatusCode::CREATED);
        let user_id = registered["userId"].as_str().unwrap().to_string();

        let code = h.notifier.last_code(&email);
        let (status, _, _) = call(
            app,
            post("/api/auth/verify-otp", json!({"userId": user_id, "otp": code})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = call(
            app,
            with_bearer(
                post(&format!("/api/admin/approve-user/{}", user_id), json!({})),
                admin_token,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        user_id
    }

    #[tokio::test]
    async fn test_student_scenario_end_to_end() {
        let h = Harness::new();
        let app = api_router(h.state());

        let (status, _, body) = call(
            &app,
            post("/api/auth/register", student_body("a@x.com", "R1", "X")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["status"], "pending");
        assert_eq!(body["role"], "student");
        let user_id = body["userId"].as_str().unwrap().to_string();

        let code = h.notifier.last_code("a@x.com");
        let (status, _, body) = call(
            &app,
            post("/api/auth/verify-otp", json!({"userId": user_id, "otp": code})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["isVerified"], true);
        assert_eq!(body["user"]["status"], "pending");

        let (status, _, body) = login(&app, "a@x.com", "abcdef").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["requiresApproval"], true);
        assert_eq!(body["userId"], user_id.as_str());
        assert_eq!(body["success"], false);

        let admin_token = superadmin_token(&h, &app).await;
        let (status, _, body) = call(
            &app,
            with_bearer(
                post(&format!("/api/admin/approve-user/{}", user_id), json!({})),
                &admin_token,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "User approved successfully");

        let (status, headers, body) = login(&app, "a@x.com", "abcdef").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["role"], "student");
        assert!(body["token"].as_str().is_some());

        let cookie = headers
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("token="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=604800"));

        let session = cookie.split(';').next().unwrap().to_string();
        let req = Request::builder()
            .uri("/api/auth/me")
            .header(header::COOKIE, session)
            .body(Body::empty())
            .unwrap();
        let (status, _, body) = call(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "a@x.com");
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("passwordHash").is_none());
        assert!(body["user"].get("emailOtp").is_none());
    }

    #[tokio::test]
    async fn test_tpo_pending_login_message() {
        let h = Harness::new();
        let app = api_router(h.state());

        let body = json!({
            "role": "tpo",
            "email": "tpo@iit.ac.in",
            "password": "abcdef",
            "confirmPassword": "abcdef",
            "name": "Officer",
            "instituteName": "IIT",
            "contactNumber": "9876543210",
        });
        let (status, _, _) = call(&app, post("/api/auth/register", body)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _, body) = login(&app, "tpo@iit.ac.in", "abcdef").await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("superadmin approval")
        );
    }

    #[tokio::test]
    async fn test_validation_errors_list_fields() {
        let h = Harness::new();
        let app = api_router(h.state());

        let (status, _, body) = call(
            &app,
            post("/api/auth/register", json!({"role": "student", "email": "bad"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"email"));
        assert!(fields.contains(&"password"));
        assert!(fields.contains(&"rollNumber"));
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_validation_errors() {
        let h = Harness::new();
        let app = api_router(h.state());

        let mut student = student_body("a@x.com", "R1", "X");
        student["graduationYear"] = json!("2026");

        let cases = [
            ("/api/auth/login", json!({"email": "a@x.com"})),
            (
                "/api/auth/verify-otp",
                json!({"userId": kernel::id::AccountId::new().to_string(), "otp": 123456}),
            ),
            ("/api/auth/register", student),
        ];

        for (uri, body) in cases {
            let (status, _, body) = call(&app, post(uri, body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["success"], false, "{uri}");
            assert_eq!(body["error"], "ValidationError", "{uri}");
            assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_protected_routes_need_token() {
        let h = Harness::new();
        let app = api_router(h.state());

        let (status, _, body) = call(&app, get_req("/api/auth/me")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "No token, authorization denied");

        let (status, _, _) = call(
            &app,
            with_bearer(get_req("/api/admin/pending-registrations"), "not.a.jwt"),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_routes_refuse_students() {
        let h = Harness::new();
        let app = api_router(h.state());
        let admin_token = superadmin_token(&h, &app).await;
        onboard(&h, &app, &admin_token, student_body("a@x.com", "R1", "X")).await;

        let (_, _, body) = login(&app, "a@x.com", "abcdef").await;
        let token = body["token"].as_str().unwrap();

        let (status, _, _) = call(
            &app,
            with_bearer(get_req("/api/admin/pending-registrations"), token),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, body) = call(
            &app,
            with_bearer(get_req("/api/admin/pending-registrations"), &admin_token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn test_tpo_routes_are_institute_scoped() {
        let h = Harness::new();
        let app = api_router(h.state());
        let admin_token = superadmin_token(&h, &app).await;

        let ours = onboard(&h, &app, &admin_token, student_body("a@x.com", "R1", "IIT")).await;
        let theirs = onboard(&h, &app, &admin_token, student_body("b@x.com", "R2", "NIT")).await;
        let tpo_body = json!({
            "role": "tpo",
            "email": "tpo@iit.ac.in",
            "password": "abcdef",
            "confirmPassword": "abcdef",
            "name": "Officer",
            "instituteName": "iit",
            "contactNumber": "9876543210",
        });
        onboard(&h, &app, &admin_token, tpo_body).await;

        let (status, _, body) = login(&app, "tpo@iit.ac.in", "abcdef").await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, _, body) =
            call(&app, with_bearer(get_req("/api/tpo/students"), &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["students"][0]["id"], ours.as_str());

        let (status, _, _) = call(
            &app,
            with_bearer(get_req(&format!("/api/tpo/students/{}", ours)), &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, _) = call(
            &app,
            with_bearer(get_req(&format!("/api/tpo/students/{}", theirs)), &token),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _, _) = call(&app, with_bearer(get_req("/api/tpo/students"), &admin_token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_logout_and_delete_clear_cookie() {
        let h = Harness::new();
        let app = api_router(h.state());
        let admin_token = superadmin_token(&h, &app).await;
        onboard(&h, &app, &admin_token, student_body("a@x.com", "R1", "X")).await;

        let (status, headers, _) = call(&app, post("/api/auth/logout", json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.contains("Max-Age=0"));

        let (_, _, body) = login(&app, "a@x.com", "abcdef").await;
        let token = body["token"].as_str().unwrap().to_string();

        let mut req = with_bearer(
            Request::builder()
                .method("DELETE")
                .uri("/api/auth/account")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"password": "abcdef"}).to_string()))
                .unwrap(),
            &token,
        );
        req.headers_mut()
            .insert(header::ACCEPT, "application/json".parse().unwrap());
        let (status, headers, _) = call(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers.get(header::SET_COOKIE).is_some());

        let (status, _, _) = login(&app, "a@x.com", "abcdef").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_forgot_password_answers_the_same() {
        let h = Harness::new();
        let app = api_router(h.state());
        call(&app, post("/api/auth/register", student_body("a@x.com", "R1", "X"))).await;

        let (known_status, _, known) = call(
            &app,
            post("/api/auth/forgot-password", json!({"email": "a@x.com"})),
        )
        .await;
        let (unknown_status, _, unknown) = call(
            &app,
            post("/api/auth/forgot-password", json!({"email": "nobody@x.com"})),
        )
        .await;
        assert_eq!(known_status, StatusCode::OK);
        assert_eq!(unknown_status, StatusCode::OK);
        assert_eq!(known, unknown);

        let token = h.notifier.last_reset_token("a@x.com");
        let (status, _, _) = call(
            &app,
            post(
                "/api/auth/reset-password",
                json!({"token": token, "password": "newpass1", "confirmPassword": "newpass1"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _, body) = call(
            &app,
            post(
                "/api/auth/reset-password",
                json!({"token": token, "password": "newpass2"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid or expired reset token");
    }

    #[tokio::test]
    async fn test_super_admin_guard() {
        let h = Harness::new();
        let state = h.state();
        let app = Router::new()
            .route("/root-only", get(|| async { "ok" }))
            .route_layer(from_fn(require_super_admin))
            .route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_auth::<crate::infra::InMemoryAccountRepository, RecordingNotifier>,
            ))
            .with_state(state);

        let admin = h.legacy_admin().await;
        let admin_token =
            platform::jwt::issue(&h.config.jwt_secret, &admin.id.to_string(), chrono::Duration::hours(1))
                .unwrap();
        let res = app
            .clone()
            .oneshot(with_bearer(get_req("/root-only"), &admin_token))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);

        let root = h.superadmin().await;
        let root_token =
            platform::jwt::issue(&h.config.jwt_secret, &root.id.to_string(), chrono::Duration::hours(1))
                .unwrap();
        let res = app
            .oneshot(with_bearer(get_req("/root-only"), &root_token))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
