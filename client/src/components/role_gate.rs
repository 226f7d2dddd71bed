//! Component-level role gate.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps a subtree that needs a session, and optionally an exact role.
//! Decisions come from `wheelhouse_session::gate` and are re-evaluated on
//! every snapshot change, so a logout in another tab swaps the subtree for
//! the unauthorized view without a reload.
//!
//! Until the store has hydrated the gate renders `pending`, never the
//! unauthorized view: on first paint storage has not been read yet.

use leptos::prelude::*;
use wheelhouse_session::{GateDecision, Role};

use crate::components::unauthorized::Unauthorized;
use crate::state::session::SessionContext;

#[component]
pub fn RoleGate(
    /// Exact role the subtree needs; `None` admits any session.
    #[prop(optional)]
    required: Option<Role>,
    /// Rendered while the session is still being read.
    #[prop(optional, into)]
    pending: ViewFn,
    children: ChildrenFn,
) -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let decision = Memo::new(move |_| session.decision(required));

    move || match decision.get() {
        GateDecision::Pending => pending.run(),
        GateDecision::Unauthorized => view! { <Unauthorized/> }.into_any(),
        GateDecision::Granted => children().into_any(),
    }
}
