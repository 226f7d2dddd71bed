//! Root application component with routing and the session context.
//!
//! SYSTEM CONTEXT
//! ==============
//! `App` builds the tab's one [`wheelhouse_session::SessionStore`] and
//! provides it through [`SessionContext`]. `SessionBootstrap` sits inside
//! the router so it can navigate; after mount it hydrates the store and
//! runs the one-shot bootstrap sequence.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::pages::auth_callback::AuthCallbackPage;
use crate::pages::dashboard::{AdminDashboardPage, DashboardPage, RenterDashboardPage};
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::register::RegisterPage;
use crate::state::session::SessionContext;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_context(SessionContext::install());

    view! {
        <Stylesheet id="leptos" href="/pkg/wheelhouse.css"/>
        <Title text="Wheelhouse"/>

        <Router>
            <SessionBootstrap/>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route path=(StaticSegment("auth"), StaticSegment("callback")) view=AuthCallbackPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
                <Route path=(StaticSegment("dashboard"), StaticSegment("admin")) view=AdminDashboardPage/>
                <Route path=(StaticSegment("dashboard"), StaticSegment("renter")) view=RenterDashboardPage/>
            </Routes>
        </Router>
    }
}

/// Hydrate the session and run the bootstrap sequence once per page load.
#[component]
fn SessionBootstrap() -> impl IntoView {
    #[cfg(feature = "hydrate")]
    {
        use std::rc::Rc;

        use leptos_router::hooks::use_navigate;
        use wheelhouse_session::bootstrap::BootstrapSequencer;

        use crate::net::api::HttpIdentityService;
        use crate::util::location::{BrowserLocation, in_app_navigation};

        let session = expect_context::<SessionContext>();
        let navigate = use_navigate();
        let store = session.store();
        let sequencer = Rc::new(BootstrapSequencer::new(store.mirror().config()));
        let cancel_handle = StoredValue::new_local(Rc::clone(&sequencer));

        Effect::new(move |_| {
            let store = store.clone();
            let sequencer = Rc::clone(&sequencer);
            let navigate = navigate.clone();
            store.hydrate();
            leptos::task::spawn_local(async move {
                let identity = HttpIdentityService::from_build_env();
                let location = BrowserLocation::new(in_app_navigation(navigate));
                sequencer.run(&store, &identity, &location).await;
            });
        });
        on_cleanup(move || {
            cancel_handle.try_with_value(|sequencer| sequencer.cancel());
        });
    }
}
