use super::*;
use serde_json::json;

fn alice() -> UserRecord {
    UserRecord::from_value(
        &json!({
            "name1": "Alice",
            "age": 30,
            "gender": "Female",
            "react_js_assignment": "Todo app",
            "company_name": "Acme"
        }),
        "alice",
    )
}

// =============================================================================
// UserRecord
// =============================================================================

#[test]
fn from_value_reads_wire_keys() {
    let record = alice();
    assert_eq!(record.name, "Alice");
    assert_eq!(record.age, "30");
    assert_eq!(record.gender, "Female");
    assert_eq!(record.assignment_text, "Todo app");
    assert_eq!(record.company_name, "Acme");
}

#[test]
fn from_value_uses_alternate_keys_and_fallback() {
    let record = UserRecord::from_value(&json!({ "name": "bob", "react_assignment": "Blog" }), "fallback");
    assert_eq!(record.name, "bob");
    assert_eq!(record.assignment_text, "Blog");

    let record = UserRecord::from_value(&json!({ "age": null, "gender": false }), "fallback");
    assert_eq!(record.name, "fallback");
    assert_eq!(record.age, "");
    assert_eq!(record.gender, "");
}

#[test]
fn from_value_keeps_zero_and_empty_values() {
    let record = UserRecord::from_value(&json!({ "name1": "", "age": 0, "company_name": "" }), "fallback");
    assert_eq!(record.name, "fallback");
    assert_eq!(record.age, "0");
    assert_eq!(record.company_name, "");
}

#[test]
fn update_body_uses_wire_keys() {
    assert_eq!(
        alice().to_update_body(),
        json!({
            "name1": "Alice",
            "age": "30",
            "gender": "Female",
            "react_js_assignment": "Todo app",
            "company_name": "Acme"
        })
    );
}

#[test]
fn merged_over_keeps_unedited_server_fields() {
    let merged = alice().merged_over(&json!({ "name": "ASSIGN-0001", "age": 29, "owner": "admin" }));
    assert_eq!(merged["name"], json!("ASSIGN-0001"));
    assert_eq!(merged["owner"], json!("admin"));
    assert_eq!(merged["age"], json!("30"));
}

#[test]
fn field_names_parse_from_cli_and_wire_forms() {
    assert_eq!("company".parse::<UserField>(), Ok(UserField::CompanyName));
    assert_eq!("react_js_assignment".parse::<UserField>(), Ok(UserField::AssignmentText));
    assert!(matches!("salary".parse::<UserField>(), Err(FormError::UnknownField(_))));
    assert_eq!(UserField::Name.to_string(), "name1");
}

// =============================================================================
// UserForm
// =============================================================================

#[test]
fn new_form_is_clean() {
    let form = UserForm::new(alice());
    assert!(!form.is_dirty());
    assert_eq!(form.values(), form.baseline());
}

#[test]
fn editing_a_field_marks_dirty_and_reverting_cleans() {
    let mut form = UserForm::new(alice());
    form.set(UserField::CompanyName, "Globex").unwrap();
    assert!(form.is_dirty());

    form.set(UserField::CompanyName, "Acme").unwrap();
    assert!(!form.is_dirty());
}

#[test]
fn reset_adopts_new_baseline() {
    let mut form = UserForm::new(alice());
    form.set(UserField::Age, "31").unwrap();

    let saved = form.values().clone();
    form.reset(saved.clone());
    assert!(!form.is_dirty());
    assert_eq!(form.baseline(), &saved);
}

#[test]
fn set_validates_like_the_form_inputs() {
    let mut form = UserForm::new(alice());
    assert_eq!(form.set(UserField::Name, "  "), Err(FormError::NameRequired));
    assert_eq!(form.set(UserField::Age, "-1"), Err(FormError::InvalidAge));
    assert_eq!(form.set(UserField::Age, "abc"), Err(FormError::InvalidAge));
    assert_eq!(form.set(UserField::Gender, "Robot"), Err(FormError::InvalidGender));
    assert!(!form.is_dirty());

    form.set(UserField::Age, " 42 ").unwrap();
    assert_eq!(form.values().age, "42");
    form.set(UserField::Gender, "").unwrap();
    form.set(UserField::Age, "").unwrap();
    assert!(form.is_dirty());
}

// =============================================================================
// UserCard
// =============================================================================

#[test]
fn card_name_priority_and_optional_meta() {
    let card = UserCard::from_value(&json!({ "user_name": "u", "name": "ASSIGN-1", "age": 0, "gender": "Male" }));
    assert_eq!(card.name, "u");
    assert_eq!(card.age, None);
    assert_eq!(card.gender.as_deref(), Some("Male"));
    assert_eq!(card.company_name, None);
}

#[test]
fn card_href_points_at_detail_route() {
    let card = UserCard::from_value(&json!({ "name1": "Jane Doe" }));
    assert_eq!(card.href(), "/users/Jane%20Doe");
}
