//! Landing route for the external identity redirect.
//!
//! The bootstrap sequence consumes the `token` parameter wherever it lands;
//! this page only gives it somewhere quiet to happen.

use leptos::prelude::*;

use crate::state::session::SessionContext;

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let settled_anonymous = move || session.snapshot().with(|s| s.hydrated && s.state.is_empty());

    view! {
        <main class="auth-callback">
            <p>"Signing you in..."</p>
            <Show when=settled_anonymous>
                <p class="auth-callback__hint">
                    "Still here? " <a href="/login">"Sign in manually"</a>
                </p>
            </Show>
        </main>
    }
}
