//! Header strip with the signed-in label and a logout button.
//!
//! Logout clears every local surface first, then asks the identity server,
//! then leaves through the server's `/auth/logout` endpoint.

use leptos::prelude::*;

use crate::state::session::SessionContext;

#[component]
pub fn AccountBar() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let busy = RwSignal::new(false);
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_logout = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        #[cfg(feature = "hydrate")]
        {
            use wheelhouse_session::actions;

            use crate::net::api::HttpIdentityService;
            use crate::util::location::{BrowserLocation, in_app_navigation};

            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let store = session.store();
                let identity = HttpIdentityService::from_build_env();
                let location = BrowserLocation::new(in_app_navigation(navigate));
                actions::logout(&store, &identity, &location).await;
            });
        }
    };

    view! {
        <header class="account-bar">
            <a class="account-bar__brand" href="/">"Wheelhouse"</a>
            <span class="account-bar__role">{move || session.role().as_str()}</span>
            <span class="account-bar__user">{move || session.label().unwrap_or_default()}</span>
            <button class="button button--secondary" on:click=on_logout disabled=move || busy.get()>
                "Log out"
            </button>
        </header>
    }
}
