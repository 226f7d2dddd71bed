use super::*;

fn filled() -> RegisterForm {
    RegisterForm {
        full_name: " Ana Ruiz ".to_owned(),
        email: "ana@example.com ".to_owned(),
        password: "correct-horse".to_owned(),
        confirm: "correct-horse".to_owned(),
        phone: "  ".to_owned(),
        renter: true,
    }
}

#[test]
fn valid_form_becomes_register_fields() {
    let fields = filled().validate().unwrap();
    assert_eq!(fields.full_name, "Ana Ruiz");
    assert_eq!(fields.email, "ana@example.com");
    assert_eq!(fields.phone, None);
    assert_eq!(fields.role, Some(Role::Renter));
}

#[test]
fn unchecked_box_requests_plain_user() {
    let form = RegisterForm { renter: false, phone: "+51 999".to_owned(), ..filled() };
    let fields = form.validate().unwrap();
    assert_eq!(fields.role, Some(Role::User));
    assert_eq!(fields.phone.as_deref(), Some("+51 999"));
}

#[test]
fn validation_messages() {
    assert_eq!(
        RegisterForm { full_name: String::new(), ..filled() }.validate(),
        Err("Name, email and password are required.")
    );
    assert_eq!(
        RegisterForm { email: "ana".to_owned(), ..filled() }.validate(),
        Err("Enter a valid email address.")
    );
    assert_eq!(
        RegisterForm { password: "short".to_owned(), confirm: "short".to_owned(), ..filled() }.validate(),
        Err("Password must be at least 8 characters.")
    );
    assert_eq!(
        RegisterForm { confirm: "different-pw".to_owned(), ..filled() }.validate(),
        Err("Passwords do not match.")
    );
}
