//! REST gateway to the marketplace backend.
//!
//! Every call attaches the persisted bearer token. A 401 answer clears the
//! session and sends the router to the login view, once per request, no
//! matter which method issued it.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx answers surface as [`ApiError::Backend`] with the decoded body, so
//! callers can read the backend's own validation payload. Only `login`
//! rewrites its 401 into [`ApiError::InvalidCredentials`].

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use super::types::{
    Animal, Booking, BookingStatus, CompanyPaymentBody, LoginGrant, LoginResponse, NewAnimal, NewBooking,
    NewPetSitterCompanyBooking, NewUser, Payment, PaymentRequest, PaymentStage, PaymentType, PetSitterCompanyBooking,
    ProfileForm, ProfileFormBody, ProfileUpdate, User,
};
use crate::router::{Location, Navigator, RouteName};
use crate::state::session::{Role, SessionCell};

pub const UNAUTHORIZED: u16 = 401;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] TransportError),
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("invalid response from the server: {0}")]
    MalformedResponse(String),
    #[error("authentication expired")]
    AuthenticationExpired { body: Value },
    #[error("backend returned status {status}")]
    Backend { status: u16, body: Value },
    #[error("response decode failed: {0}")]
    Decode(String),
    #[error("request encode failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// Decoded error body, when the backend sent one.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::AuthenticationExpired { body } | Self::Backend { body, .. } => Some(body),
            _ => None,
        }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::AuthenticationExpired { .. } | Self::InvalidCredentials => Some(UNAUTHORIZED),
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One outgoing request and its single-use logout-on-401 flag.
#[derive(Debug)]
pub(crate) struct PendingRequest {
    pub(crate) http: HttpRequest,
    pub(crate) retried: bool,
}

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    session: Arc<SessionCell>,
    navigator: Navigator,
}

impl ApiClient {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, session: Arc<SessionCell>, navigator: Navigator) -> Self {
        Self { transport, session, navigator }
    }

    // =========================================================================
    // AUTH
    // =========================================================================

    /// Exchange credentials for a validated [`LoginGrant`]. Does not touch
    /// session state; the session store installs the grant.
    ///
    /// # Errors
    ///
    /// [`ApiError::InvalidCredentials`] on 401, [`ApiError::MalformedResponse`]
    /// when the token or user id is missing, or any transport/backend error.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginGrant, ApiError> {
        let body = json!({ "email": email, "password": password });
        let response: LoginResponse = match self.send_json(Method::Post, "/login/", &[], Some(body)).await {
            Ok(response) => response,
            Err(ApiError::AuthenticationExpired { .. }) => return Err(ApiError::InvalidCredentials),
            Err(e) => return Err(e),
        };
        response.into_grant().map_err(ApiError::MalformedResponse)
    }

    /// # Errors
    ///
    /// Returns the backend's validation payload as [`ApiError::Backend`].
    pub async fn register(&self, user: &NewUser) -> Result<User, ApiError> {
        self.send_json(Method::Post, "/register/", &[], Some(encode(user)?)).await
    }

    /// Drop the persisted credentials. Never fails.
    pub fn logout(&self) {
        self.session.clear();
    }

    // =========================================================================
    // PROFILE
    // =========================================================================

    /// Patch the caller's profile and merge the changed name/email into the
    /// cached session.
    ///
    /// # Errors
    ///
    /// Propagates transport and backend errors; the session is untouched on error.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Value, ApiError> {
        let response: Value = self
            .send_json(Method::Patch, "/users/profile/", &[], Some(encode(update)?))
            .await?;
        self.session.update(|session| {
            if let Some(name) = &update.name {
                session.name.clone_from(name);
            }
            if let Some(email) = &update.email {
                session.email.clone_from(email);
            }
        });
        Ok(response)
    }

    /// Submit the full profile form, including an optional password change.
    ///
    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn update_user_profile(&self, form: &ProfileForm) -> Result<User, ApiError> {
        let body = encode(&ProfileFormBody::from(form))?;
        self.send_json(Method::Patch, "/users/profile/", &[], Some(body)).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn request_password_reset(&self, email: &str) -> Result<Value, ApiError> {
        self.send_json(Method::Post, "/users/password-reset/", &[], Some(json!({ "email": email })))
            .await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn verify_reset_code(&self, email: &str, code: &str) -> Result<Value, ApiError> {
        let body = json!({ "email": email, "code": code });
        self.send_json(Method::Post, "/users/verify-reset-code/", &[], Some(body)).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn reset_password(&self, email: &str, code: &str, new_password: &str) -> Result<Value, ApiError> {
        let body = json!({ "email": email, "code": code, "new_password": new_password });
        self.send_json(Method::Post, "/users/reset-password/", &[], Some(body)).await
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_all_users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(Method::Get, "/users/", &[], None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_user_by_id(&self, id: i64) -> Result<User, ApiError> {
        self.send_json(Method::Get, &format!("/users/{id}/"), &[], None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_users_by_role(&self, role: Role) -> Result<Vec<User>, ApiError> {
        self.send_json(Method::Get, "/users/", &[("role", role.as_str().to_owned())], None)
            .await
    }

    /// Companies with remaining capacity.
    ///
    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_available_companies(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(Method::Get, "/users/available_companies/", &[], None).await
    }

    // =========================================================================
    // ANIMALS
    // =========================================================================

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_all_animals(&self) -> Result<Vec<Animal>, ApiError> {
        self.send_json(Method::Get, "/animals/", &[], None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_animal_by_id(&self, id: i64) -> Result<Animal, ApiError> {
        self.send_json(Method::Get, &format!("/animals/{id}/"), &[], None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_animals_by_owner(&self, owner_id: i64) -> Result<Vec<Animal>, ApiError> {
        self.send_json(Method::Get, "/animals/", &[("owner", owner_id.to_string())], None)
            .await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn create_animal(&self, animal: &NewAnimal) -> Result<Animal, ApiError> {
        self.send_json(Method::Post, "/animals/", &[], Some(encode(animal)?)).await
    }

    // =========================================================================
    // BOOKINGS
    // =========================================================================

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_all_bookings(&self) -> Result<Vec<Booking>, ApiError> {
        self.send_json(Method::Get, "/bookings/", &[], None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_booking_by_id(&self, id: i64) -> Result<Booking, ApiError> {
        self.send_json(Method::Get, &format!("/bookings/{id}/"), &[], None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn create_booking(&self, booking: &NewBooking) -> Result<Booking, ApiError> {
        self.send_json(Method::Post, "/bookings/", &[], Some(encode(booking)?)).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn update_booking_status(&self, id: i64, status: BookingStatus) -> Result<Value, ApiError> {
        let path = format!("/bookings/{id}/update_status/");
        self.send_json(Method::Patch, &path, &[], Some(json!({ "status": status }))).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn delete_booking(&self, id: i64) -> Result<(), ApiError> {
        self.send(Method::Delete, &format!("/bookings/{id}/"), &[], None).await?;
        Ok(())
    }

    // =========================================================================
    // PET SITTER / COMPANY BOOKINGS
    // =========================================================================

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn create_petsitter_company_booking(
        &self,
        booking: &NewPetSitterCompanyBooking,
    ) -> Result<PetSitterCompanyBooking, ApiError> {
        self.send_json(Method::Post, "/petsitter-company-bookings/", &[], Some(encode(booking)?))
            .await
    }

    /// List sitter/company bookings, optionally filtered by either party.
    ///
    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_petsitter_company_bookings(
        &self,
        petsitter: Option<i64>,
        company: Option<i64>,
    ) -> Result<Vec<PetSitterCompanyBooking>, ApiError> {
        let query = petsitter_company_filters(petsitter, company);
        self.send_json(Method::Get, "/petsitter-company-bookings/", &query, None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn update_petsitter_company_booking_status(
        &self,
        id: i64,
        status: BookingStatus,
    ) -> Result<Value, ApiError> {
        let path = format!("/petsitter-company-bookings/{id}/update_status/");
        self.send_json(Method::Patch, &path, &[], Some(json!({ "status": status }))).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn process_shared_payment(&self, id: i64, payment: &Value) -> Result<Value, ApiError> {
        let path = format!("/petsitter-company-bookings/{id}/shared_payment/");
        self.send_json(Method::Post, &path, &[], Some(payment.clone())).await
    }

    // =========================================================================
    // PAYMENTS
    // =========================================================================

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn process_payment(&self, payment: &PaymentRequest) -> Result<Value, ApiError> {
        self.send_json(Method::Post, "/payments/process_payment/", &[], Some(encode(payment)?))
            .await
    }

    /// Two-stage company payment: `init` fetches the amount, `process` charges it.
    ///
    /// # Errors
    ///
    /// Fails on the first stage that errors; `process` is not attempted if `init` fails.
    pub async fn process_company_payment(&self, booking_id: i64, payment_type: PaymentType) -> Result<Value, ApiError> {
        let path = format!("/process-company-payment/{booking_id}/");
        let init = CompanyPaymentBody { payment_stage: PaymentStage::Init, payment_type: None };
        let details: Value = self.send_json(Method::Post, &path, &[], Some(encode(&init)?)).await?;
        tracing::debug!(booking_id, details = %details, "company payment initialized");

        let process = CompanyPaymentBody { payment_stage: PaymentStage::Process, payment_type: Some(payment_type) };
        self.send_json(Method::Post, &path, &[], Some(encode(&process)?)).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_my_payments(&self) -> Result<Vec<Payment>, ApiError> {
        self.send_json(Method::Get, "/payments/my_payments/", &[], None).await
    }

    /// # Errors
    ///
    /// Propagates transport and backend errors.
    pub async fn get_payment_by_id(&self, id: i64) -> Result<Payment, ApiError> {
        self.send_json(Method::Get, &format!("/payments/{id}/"), &[], None).await
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, path, query, body).await?;
        decode(&response)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let mut request = PendingRequest {
            http: HttpRequest {
                method,
                path: path.to_owned(),
                query: query.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect(),
                bearer: self.session.token(),
                body,
            },
            retried: false,
        };

        let response = self.transport.send(&request.http).await.inspect_err(|e| {
            tracing::warn!(%method, path, error = %e, "request failed");
        })?;

        if response.status == UNAUTHORIZED {
            self.handle_unauthorized(&mut request);
            return Err(ApiError::AuthenticationExpired { body: parse_body(&response.body) });
        }
        if !response.is_success() {
            tracing::debug!(%method, path, status = response.status, "backend error");
            return Err(ApiError::Backend { status: response.status, body: parse_body(&response.body) });
        }
        Ok(response)
    }

    /// React to a 401: clear the session and route to login, at most once per
    /// request and only when a token was actually rejected. Returns whether
    /// the forced logout ran.
    pub(crate) fn handle_unauthorized(&self, request: &mut PendingRequest) -> bool {
        if request.retried {
            return false;
        }
        request.retried = true;

        if self.session.token().is_none() {
            return false;
        }
        tracing::warn!(path = %request.http.path, "bearer token rejected, forcing logout");
        self.session.clear();
        self.navigator.push(Location::named(RouteName::Login));
        true
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    let raw = if response.body.trim().is_empty() { "null" } else { response.body.as_str() };
    serde_json::from_str(raw).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Decode an error body; non-JSON text is kept as a JSON string.
pub(crate) fn parse_body(raw: &str) -> Value {
    if raw.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}

pub(crate) fn petsitter_company_filters(petsitter: Option<i64>, company: Option<i64>) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(id) = petsitter {
        query.push(("petsitter", id.to_string()));
    }
    if let Some(id) = company {
        query.push(("company", id.to_string()));
    }
    query
}
