//! Account registration page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use leptos::prelude::*;
use wheelhouse_session::Role;
use wheelhouse_session::identity::RegisterFields;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Raw form values as typed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm: String,
    pub phone: String,
    pub renter: bool,
}

impl RegisterForm {
    /// Validate and convert into the fields sent to the identity server.
    pub fn validate(&self) -> Result<RegisterFields, &'static str> {
        let full_name = self.full_name.trim();
        let email = self.email.trim();
        if full_name.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err("Name, email and password are required.");
        }
        if !email.contains('@') {
            return Err("Enter a valid email address.");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("Password must be at least 8 characters.");
        }
        if self.password != self.confirm {
            return Err("Passwords do not match.");
        }
        let phone = self.phone.trim();
        Ok(RegisterFields {
            full_name: full_name.to_owned(),
            email: email.to_owned(),
            password: self.password.clone(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
            role: Some(if self.renter { Role::Renter } else { Role::User }),
        })
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let form = RwSignal::new(RegisterForm::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let session = expect_context::<crate::state::session::SessionContext>();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let fields = match form.with(RegisterForm::validate) {
            Ok(fields) => fields,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Creating your account...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            let store = session.store();
            leptos::task::spawn_local(async move {
                let identity = crate::net::api::HttpIdentityService::from_build_env();
                match wheelhouse_session::actions::register(&store, &identity, &fields).await {
                    Ok(landing) => navigate(&landing, leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        tracing::warn!(error = %e, "registration failed");
                        info.set(crate::pages::login::login_error_message(&e));
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = fields;
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Create your account"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        autocomplete="name"
                        placeholder="Full name"
                        prop:value=move || form.with(|f| f.full_name.clone())
                        on:input=move |ev| form.update(|f| f.full_name = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="email"
                        autocomplete="email"
                        placeholder="you@example.com"
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="tel"
                        autocomplete="tel"
                        placeholder="Phone (optional)"
                        prop:value=move || form.with(|f| f.phone.clone())
                        on:input=move |ev| form.update(|f| f.phone = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Password"
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Confirm password"
                        prop:value=move || form.with(|f| f.confirm.clone())
                        on:input=move |ev| form.update(|f| f.confirm = event_target_value(&ev))
                    />
                    <label class="login-check">
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.renter)
                            on:change=move |ev| form.update(|f| f.renter = event_target_checked(&ev))
                        />
                        "I want to list my cars for rent"
                    </label>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Create account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <p class="login-card__links">
                    "Already registered? " <a href="/login">"Sign in"</a>
                </p>
            </div>
        </div>
    }
}
