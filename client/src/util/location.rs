//! The location bar as a [`PageLocation`](wheelhouse_session::identity::PageLocation).

#[cfg(test)]
#[path = "location_test.rs"]
mod location_test;

use leptos_router::NavigateOptions;

/// `path?query#hash` as shown in the location bar.
pub fn visible_url(pathname: &str, search: &str, hash: &str) -> String {
    format!("{pathname}{search}{hash}")
}

/// Adapt the router's `navigate` into the in-app redirect a
/// `BrowserLocation` performs. Pushes a history entry with default options.
pub fn in_app_navigation(navigate: impl Fn(&str, NavigateOptions) + 'static) -> impl Fn(&str) + 'static {
    move |path: &str| navigate(path, NavigateOptions::default())
}

#[cfg(feature = "hydrate")]
pub use browser::BrowserLocation;

#[cfg(feature = "hydrate")]
mod browser {
    use wasm_bindgen::JsValue;
    use wheelhouse_session::identity::{PageLocation, parse_query_param, remove_query_param};

    use super::visible_url;

    /// `window.location` plus the router's in-app navigation.
    pub struct BrowserLocation {
        navigate: Box<dyn Fn(&str)>,
    }

    impl BrowserLocation {
        pub fn new(navigate: impl Fn(&str) + 'static) -> Self {
            Self { navigate: Box::new(navigate) }
        }
    }

    fn location() -> Option<web_sys::Location> {
        web_sys::window().map(|w| w.location())
    }

    impl PageLocation for BrowserLocation {
        fn query_param(&self, name: &str) -> Option<String> {
            let search = location()?.search().ok()?;
            parse_query_param(&search, name)
        }

        fn strip_query_param(&self, name: &str) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let loc = window.location();
            let current = visible_url(
                &loc.pathname().unwrap_or_default(),
                &loc.search().unwrap_or_default(),
                &loc.hash().unwrap_or_default(),
            );
            let next = remove_query_param(&current, name);
            let replaced = window
                .history()
                .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(&next)));
            if let Err(e) = replaced {
                tracing::warn!(error = ?e, param = name, "could not rewrite the visible URL");
            }
        }

        fn redirect(&self, path: &str) {
            (self.navigate)(path);
        }

        fn navigate_top_level(&self, url: &str) {
            let Some(loc) = location() else {
                return;
            };
            if let Err(e) = loc.set_href(url) {
                tracing::error!(error = ?e, url, "top-level navigation failed");
            }
        }
    }
}
