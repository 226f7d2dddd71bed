use super::*;

#[test]
fn home_target_prefers_role_dashboard_when_signed_in() {
    assert_eq!(home_target(true, "/dashboard/renter"), "/dashboard/renter");
}

#[test]
fn home_target_is_root_when_anonymous() {
    assert_eq!(home_target(false, "/dashboard"), "/");
}
