use super::*;

#[test]
fn greeting_uses_label_when_present() {
    assert_eq!(greeting(Some("Ana")), "Welcome back, Ana");
    assert_eq!(greeting(Some("  ")), "Welcome back");
    assert_eq!(greeting(None), "Welcome back");
}

#[test]
fn role_dashboard_link_only_for_specialised_roles() {
    assert_eq!(role_dashboard_link(Role::Admin).map(|(href, _)| href), Some("/dashboard/admin"));
    assert_eq!(role_dashboard_link(Role::Renter).map(|(href, _)| href), Some("/dashboard/renter"));
    assert_eq!(role_dashboard_link(Role::User), None);
}
