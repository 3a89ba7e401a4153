//! Wire DTOs for the marketplace REST backend.
//!
//! DESIGN
//! ======
//! Response types mirror the backend serializers and default every optional
//! field, so a partially populated payload still decodes. Request types skip
//! unset fields so partial updates stay partial on the wire.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

use crate::state::session::{AdminStatus, Role, Session};

// =============================================================================
// AUTH
// =============================================================================

/// Raw `/login/` payload. Presence of `access` and `user_id` is checked by
/// [`LoginResponse::into_grant`], not by serde.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub admin_status: Option<AdminStatus>,
}

/// A validated login: bearer token plus the session it authenticates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub session: Session,
}

impl LoginResponse {
    /// Validate the payload into a [`LoginGrant`].
    ///
    /// # Errors
    ///
    /// Returns a description of the missing piece when the token or user id is absent.
    pub fn into_grant(self) -> Result<LoginGrant, String> {
        let token = self.access.filter(|t| !t.is_empty());
        let (token, user_id) = match (token, self.user_id) {
            (Some(token), Some(user_id)) => (token, user_id),
            (None, None) => return Err("missing access token and user id".to_owned()),
            (None, Some(_)) => return Err("missing access token".to_owned()),
            (Some(_), None) => return Err("missing user id".to_owned()),
        };
        let session = Session {
            user_id,
            email: self.email.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            is_admin: self.is_admin,
            admin_status: self.admin_status,
        };
        Ok(LoginGrant { token, session })
    }
}

/// `/register/` request body. Role-specific fields are optional.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub capacity: Option<i32>,
}

/// Partial profile change; unset fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
}

/// Full profile form as submitted from the profile view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub experience: Option<String>,
    pub capacity: Option<i32>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Wire body built from a [`ProfileForm`]; blank text fields are sent as `""`
/// and the password pair only when a new password is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct ProfileFormBody<'a> {
    name: &'a str,
    email: &'a str,
    address: &'a str,
    experience: &'a str,
    capacity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    current_password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    new_password: Option<&'a str>,
}

impl<'a> From<&'a ProfileForm> for ProfileFormBody<'a> {
    fn from(form: &'a ProfileForm) -> Self {
        let new_password = form.new_password.as_deref().filter(|p| !p.is_empty());
        Self {
            name: &form.name,
            email: &form.email,
            address: form.address.as_deref().unwrap_or(""),
            experience: form.experience.as_deref().unwrap_or(""),
            capacity: form.capacity,
            current_password: new_password.and(form.current_password.as_deref()),
            new_password,
        }
    }
}

// =============================================================================
// ANIMALS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalType {
    #[default]
    Dog,
    Cat,
    Other,
}

impl std::str::FromStr for AnimalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dog" => Ok(Self::Dog),
            "cat" => Ok(Self::Cat),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown animal type '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animal {
    pub id: i64,
    pub owner: i64,
    pub name: String,
    #[serde(default)]
    pub animal_type: AnimalType,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub maladie: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewAnimal {
    pub owner: i64,
    pub name: String,
    pub animal_type: AnimalType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maladie: Option<String>,
}

// =============================================================================
// BOOKINGS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
    Cancelled,
    Paid,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
            Self::Cancelled => "cancelled",
            Self::Paid => "paid",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "refused" => Ok(Self::Refused),
            "cancelled" => Ok(Self::Cancelled),
            "paid" => Ok(Self::Paid),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

/// Owner-to-sitter booking. Dates are `YYYY-MM-DD`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub animal: i64,
    pub sitter: i64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub total_days: Option<i64>,
    #[serde(default)]
    pub total_price: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewBooking {
    pub animal: i64,
    pub sitter: i64,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Formation,
    Consultation,
    Collaboration,
}

/// Sitter-to-company professional booking.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetSitterCompanyBooking {
    pub id: i64,
    pub petsitter: i64,
    pub company: i64,
    pub service_type: ServiceType,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewPetSitterCompanyBooking {
    pub petsitter: i64,
    pub company: i64,
    pub service_type: ServiceType,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub details: String,
}

// =============================================================================
// PAYMENTS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    #[default]
    Card,
    Paypal,
    Transfer,
}

impl std::str::FromStr for PaymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(Self::Card),
            "paypal" => Ok(Self::Paypal),
            "transfer" => Ok(Self::Transfer),
            other => Err(format!("unknown payment type '{other}'")),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    #[serde(default)]
    pub booking: Option<i64>,
    #[serde(default)]
    pub company_booking: Option<i64>,
    /// Decimal amount as rendered by the backend (e.g. `"70.00"`).
    pub amount: String,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub transaction_id: Option<String>,
}

/// `/payments/process_payment/` body: exactly one booking reference is expected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_booking: Option<i64>,
    pub payment_type: PaymentType,
}

/// Stages of the company payment handshake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStage {
    Init,
    Process,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct CompanyPaymentBody {
    pub payment_stage: PaymentStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<PaymentType>,
}
