//! Signed-in dashboards.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server lets a request through to these routes when it carries a
//! session marker; it never checks the role. Each page therefore wraps its
//! content in `RoleGate`: `/dashboard` admits any session, the admin and
//! renter pages admit exactly their role.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;
use wheelhouse_session::Role;

use crate::components::account_bar::AccountBar;
use crate::components::role_gate::RoleGate;
use crate::state::session::SessionContext;

/// Heading text for the signed-in user.
pub fn greeting(label: Option<&str>) -> String {
    match label.map(str::trim).filter(|l| !l.is_empty()) {
        Some(label) => format!("Welcome back, {label}"),
        None => "Welcome back".to_owned(),
    }
}

/// The role-specific dashboard reachable from the general one, if any.
pub fn role_dashboard_link(role: Role) -> Option<(&'static str, &'static str)> {
    match role {
        Role::Admin => Some((role.landing_path(), "Open fleet administration")),
        Role::Renter => Some((role.landing_path(), "Manage your listings")),
        Role::User => None,
    }
}

#[component]
fn Loading() -> impl IntoView {
    view! { <p class="dashboard__loading">"Loading your session..."</p> }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();

    view! {
        <RoleGate pending=|| view! { <Loading/> }>
            <AccountBar/>
            <main class="dashboard">
                <h1>{move || greeting(session.label().as_deref())}</h1>
                <p>"Browse cars near you and keep track of your bookings."</p>
                {move || {
                    role_dashboard_link(session.role()).map(|(href, text)| {
                        view! { <a class="button" href=href>{text}</a> }
                    })
                }}
            </main>
        </RoleGate>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    view! {
        <RoleGate required=Role::Admin pending=|| view! { <Loading/> }>
            <AccountBar/>
            <main class="dashboard dashboard--admin">
                <h1>"Fleet administration"</h1>
                <section class="dashboard__panel">
                    <h2>"Pending listings"</h2>
                    <p>"Review cars submitted by renters before they go live."</p>
                </section>
                <section class="dashboard__panel">
                    <h2>"Accounts"</h2>
                    <p>"Suspend or restore user and renter accounts."</p>
                </section>
            </main>
        </RoleGate>
    }
}

#[component]
pub fn RenterDashboardPage() -> impl IntoView {
    view! {
        <RoleGate required=Role::Renter pending=|| view! { <Loading/> }>
            <AccountBar/>
            <main class="dashboard dashboard--renter">
                <h1>"Your listings"</h1>
                <section class="dashboard__panel">
                    <h2>"Cars"</h2>
                    <p>"Add a car, set its availability and daily rate."</p>
                </section>
                <section class="dashboard__panel">
                    <h2>"Booking requests"</h2>
                    <p>"Accept or decline requests from drivers."</p>
                </section>
            </main>
        </RoleGate>
    }
}
