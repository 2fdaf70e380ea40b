//! Account Entity
//!
//! Common account state plus the role profile. Secrets (password hash,
//! verification code, reset token digest) live here but never leave through
//! serialization: `Serialize` goes through [`AccountView`].

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use serde::{Serialize, Serializer};

use crate::domain::entity::profile::Profile;
use crate::domain::value_object::{
    account_kind::AccountKind, account_status::AccountStatus, email::Email,
    one_time_code::OneTimeCode, password::PasswordHash, reset_token::ResetTokenDigest,
    role::Role,
};

#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub email: Email,
    pub password_hash: PasswordHash,
    pub status: AccountStatus,
    pub is_verified: bool,
    /// Set for accounts created through Google sign-in
    pub google_id: Option<String>,
    pub email_otp: Option<OneTimeCode>,
    pub password_reset: Option<ResetTokenDigest>,
    pub profile_picture: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub profile: Profile,
}

impl Account {
    /// New self-registered account: pending and unverified
    pub fn register(
        email: Email,
        password_hash: PasswordHash,
        profile: Profile,
        email_otp: OneTimeCode,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            email,
            password_hash,
            status: AccountStatus::Pending,
            is_verified: false,
            google_id: None,
            email_otp: Some(email_otp),
            password_reset: None,
            profile_picture: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            profile,
        }
    }

    /// Seeded operator account: active and verified from the start
    pub fn seeded(email: Email, password_hash: PasswordHash, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            email,
            password_hash,
            status: AccountStatus::Active,
            is_verified: true,
            google_id: None,
            email_otp: None,
            password_reset: None,
            profile_picture: None,
            last_login: None,
            created_at: now,
            updated_at: now,
            profile,
        }
    }

    pub fn kind(&self) -> AccountKind {
        self.profile.kind()
    }

    pub fn role(&self) -> Role {
        self.profile.role()
    }

    /// Whether the account passes the approval gate.
    ///
    /// Students carry their own flag; every other store reads `status`.
    pub fn is_active(&self) -> bool {
        match &self.profile {
            Profile::Student(student) => student.is_active,
            _ => self.status == AccountStatus::Active,
        }
    }

    /// Verified email, or ownership proven by an external identity
    pub fn has_confirmed_email(&self) -> bool {
        self.is_verified || self.google_id.is_some()
    }

    pub fn set_status(&mut self, status: AccountStatus) {
        self.status = status;
        if let Profile::Student(student) = &mut self.profile {
            student.is_active = status == AccountStatus::Active;
        }
        self.touch();
    }

    pub fn issue_otp(&mut self, otp: OneTimeCode) {
        self.email_otp = Some(otp);
        self.touch();
    }

    /// Flip verification on; the code is consumed
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.email_otp = None;
        self.touch();
    }

    pub fn set_password_reset(&mut self, digest: ResetTokenDigest) {
        self.password_reset = Some(digest);
        self.touch();
    }

    /// Replace the password hash and drop any pending reset token
    pub fn change_password(&mut self, password_hash: PasswordHash) {
        self.password_hash = password_hash;
        self.password_reset = None;
        self.touch();
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login = Some(now);
        self.updated_at = now;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Serialize for Account {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        AccountView::from(self).serialize(serializer)
    }
}

/// Sanitized projection returned to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    pub is_verified: bool,
    pub profile_picture: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: Profile,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.as_str().to_string(),
            role: account.role(),
            status: account.status,
            is_verified: account.is_verified,
            profile_picture: account.profile_picture.clone(),
            last_login: account.last_login,
            created_at: account.created_at,
            updated_at: account.updated_at,
            profile: account.profile.clone(),
        }
    }
}
