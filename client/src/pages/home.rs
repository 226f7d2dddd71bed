//! Public landing page.

use leptos::prelude::*;

use crate::state::session::SessionContext;

#[component]
pub fn HomePage() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let signed_in = move || session.snapshot().with(|s| s.hydrated && !s.state.is_empty());

    view! {
        <main class="home">
            <h1>"Wheelhouse"</h1>
            <p class="home__tagline">"Rent a car from people nearby, or list your own."</p>
            <Show
                when=signed_in
                fallback=|| view! {
                    <nav class="home__actions">
                        <a class="button" href="/login">"Sign in"</a>
                        <a class="button button--secondary" href="/register">"Create account"</a>
                    </nav>
                }
            >
                <nav class="home__actions">
                    <a class="button" href=move || session.role().landing_path()>
                        "Continue to your dashboard"
                    </a>
                </nav>
            </Show>
        </main>
    }
}
