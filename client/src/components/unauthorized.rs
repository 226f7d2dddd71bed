//! Fixed view shown when a gate refuses the current session.

#[cfg(test)]
#[path = "unauthorized_test.rs"]
mod unauthorized_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::session::SessionContext;

/// Where "go home" leads: the role's dashboard when signed in, else `/`.
pub fn home_target(has_session: bool, landing: &str) -> String {
    if has_session { landing.to_owned() } else { "/".to_owned() }
}

#[component]
pub fn Unauthorized() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let navigate = use_navigate();

    let on_back = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let went_back = web_sys::window()
                .and_then(|w| w.history().ok())
                .map(|h| h.back());
            if let Some(Err(e)) = went_back {
                tracing::warn!(error = ?e, "history.back failed");
            }
        }
    };
    let on_home = move |_| {
        let target = home_target(session.has_session(), session.role().landing_path());
        navigate(&target, NavigateOptions::default());
    };

    view! {
        <div class="unauthorized">
            <h1>"Access denied"</h1>
            <p>"Your account does not have access to this page."</p>
            <div class="unauthorized__actions">
                <button class="button button--secondary" on:click=on_back>"Go back"</button>
                <button class="button" on:click=on_home>"Go home"</button>
            </div>
        </div>
    }
}
