use super::*;
use serde_json::json;

// =============================================================================
// LoginResponse::into_grant
// =============================================================================

#[test]
fn into_grant_minimal_payload() {
    let response: LoginResponse =
        serde_json::from_value(json!({"access": "t1", "user_id": 1, "role": "petowner"})).unwrap();
    let grant = response.into_grant().unwrap();
    assert_eq!(grant.token, "t1");
    assert_eq!(grant.session.user_id, 1);
    assert_eq!(grant.session.role(), Some(Role::PetOwner));
    assert!(!grant.session.grants_admin());
}

#[test]
fn into_grant_carries_admin_status() {
    let response: LoginResponse = serde_json::from_value(json!({
        "access": "t2",
        "refresh": "r2",
        "user_id": 9,
        "email": "boss@x.com",
        "name": "Boss",
        "role": "company",
        "is_admin": false,
        "admin_status": {"is_staff": true, "is_superuser": false, "permissions": ["core.view_user"]}
    }))
    .unwrap();
    let grant = response.into_grant().unwrap();
    assert_eq!(grant.session.email, "boss@x.com");
    assert!(grant.session.grants_admin());
}

#[test]
fn into_grant_rejects_missing_token_and_user() {
    let err = LoginResponse::default().into_grant().unwrap_err();
    assert!(err.contains("access token and user id"));
}

#[test]
fn into_grant_rejects_empty_token() {
    let response = LoginResponse { access: Some(String::new()), user_id: Some(3), ..LoginResponse::default() };
    assert_eq!(response.into_grant().unwrap_err(), "missing access token");
}

#[test]
fn into_grant_rejects_missing_user_id() {
    let response = LoginResponse { access: Some("t".into()), ..LoginResponse::default() };
    assert_eq!(response.into_grant().unwrap_err(), "missing user id");
}

// =============================================================================
// request bodies
// =============================================================================

#[test]
fn new_user_skips_unset_role_fields() {
    let user = NewUser {
        email: "sit@x.com".into(),
        password: "pw".into(),
        name: "Sam".into(),
        role: Role::PetSitter,
        address: None,
        experience: Some("5 years".into()),
        capacity: None,
    };
    assert_eq!(
        serde_json::to_value(&user).unwrap(),
        json!({"email": "sit@x.com", "password": "pw", "name": "Sam", "role": "petsitter", "experience": "5 years"})
    );
}

#[test]
fn profile_update_serializes_only_set_fields() {
    let update = ProfileUpdate { name: Some("New".into()), ..ProfileUpdate::default() };
    assert_eq!(serde_json::to_value(&update).unwrap(), json!({"name": "New"}));
}

#[test]
fn profile_form_body_without_password_change() {
    let form = ProfileForm {
        name: "A".into(),
        email: "a@x.com".into(),
        current_password: Some("old".into()),
        ..ProfileForm::default()
    };
    assert_eq!(
        serde_json::to_value(ProfileFormBody::from(&form)).unwrap(),
        json!({"name": "A", "email": "a@x.com", "address": "", "experience": "", "capacity": null})
    );
}

#[test]
fn profile_form_body_with_password_change() {
    let form = ProfileForm {
        name: "A".into(),
        email: "a@x.com".into(),
        address: Some("1 rue".into()),
        capacity: Some(4),
        current_password: Some("old".into()),
        new_password: Some("new".into()),
        ..ProfileForm::default()
    };
    let body = serde_json::to_value(ProfileFormBody::from(&form)).unwrap();
    assert_eq!(body["current_password"], "old");
    assert_eq!(body["new_password"], "new");
    assert_eq!(body["capacity"], 4);
}

#[test]
fn company_payment_body_stages() {
    let init = CompanyPaymentBody { payment_stage: PaymentStage::Init, payment_type: None };
    assert_eq!(serde_json::to_value(&init).unwrap(), json!({"payment_stage": "init"}));
    let process = CompanyPaymentBody { payment_stage: PaymentStage::Process, payment_type: Some(PaymentType::Paypal) };
    assert_eq!(
        serde_json::to_value(&process).unwrap(),
        json!({"payment_stage": "process", "payment_type": "paypal"})
    );
}

// =============================================================================
// response payloads
// =============================================================================

#[test]
fn booking_decodes_backend_shape() {
    let booking: Booking = serde_json::from_value(json!({
        "id": 4, "animal": 2, "sitter": 3,
        "start_date": "2025-06-01", "end_date": "2025-06-07",
        "status": "accepted", "total_days": 7, "total_price": 70
    }))
    .unwrap();
    assert_eq!(booking.status, BookingStatus::Accepted);
    assert_eq!(booking.total_price, Some(70));
}

#[test]
fn payment_decodes_decimal_amount_string() {
    let payment: Payment = serde_json::from_value(json!({
        "id": 1, "booking": 4, "company_booking": null, "amount": "70.00",
        "payment_date": "2025-06-01T10:00:00Z", "payment_status": "completed",
        "payment_type": "card", "transaction_id": "tx-1"
    }))
    .unwrap();
    assert_eq!(payment.amount, "70.00");
    assert_eq!(payment.payment_status, PaymentStatus::Completed);
}

#[test]
fn animal_type_defaults_to_dog() {
    let animal: Animal = serde_json::from_value(json!({"id": 1, "owner": 2, "name": "Rex"})).unwrap();
    assert_eq!(animal.animal_type, AnimalType::Dog);
}

#[test]
fn booking_status_parses_every_wire_value() {
    for status in [
        BookingStatus::Pending,
        BookingStatus::Accepted,
        BookingStatus::Refused,
        BookingStatus::Cancelled,
        BookingStatus::Paid,
    ] {
        assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
    }
    assert!("lost".parse::<BookingStatus>().is_err());
}
