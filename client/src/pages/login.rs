//! Email + password login page.
//!
//! A `returnTo` query parameter (set by the edge interceptor) is honoured
//! after sign-in when it is a same-origin path.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use wheelhouse_session::IdentityError;

/// Trim the email and require both fields.
pub fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// User-facing text for a failed sign-in.
pub fn login_error_message(err: &IdentityError) -> String {
    match err {
        IdentityError::Status { status: 400 | 401 | 403 } => "Invalid email or password.".to_owned(),
        IdentityError::Status { status } => format!("Sign-in failed ({status}). Try again."),
        IdentityError::Network(_) | IdentityError::Unavailable(_) => {
            "Cannot reach the sign-in service. Try again.".to_owned()
        }
        IdentityError::Decode(_) => "Unexpected response from the sign-in service.".to_owned(),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let session = expect_context::<crate::state::session::SessionContext>();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();
    #[cfg(feature = "hydrate")]
    let query = leptos_router::hooks::use_query_map();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            let return_to = query.with_untracked(|q| q.get(wheelhouse_session::config::RETURN_TO_PARAM));
            let store = session.store();
            leptos::task::spawn_local(async move {
                let identity = crate::net::api::HttpIdentityService::from_build_env();
                let result = wheelhouse_session::actions::login(
                    &store,
                    &identity,
                    &email_value,
                    &password_value,
                    return_to.as_deref(),
                )
                .await;
                match result {
                    Ok(landing) => navigate(&landing, leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        tracing::warn!(error = %e, "login failed");
                        info.set(login_error_message(&e));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (email_value, password_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Wheelhouse"</h1>
                <p class="login-card__subtitle">"Sign in to your account"</p>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        autocomplete="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign in"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <p class="login-card__links">
                    <a href="/register">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
