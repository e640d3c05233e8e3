//! Session context and the route guard.

use dioxus::prelude::*;
use store::{guard, Access, Id, Session};

/// The session signal provided by [`AuthProvider`].
pub fn use_auth() -> Signal<Session> {
    use_context::<Signal<Session>>()
}

/// Id of the signed-in user, if any.
pub fn use_user_id() -> Memo<Option<Id>> {
    let auth = use_auth();
    use_memo(move || auth.read().user().map(|u| u.id))
}

/// Owns the session for everything below it.
/// Verifies the session cookie once on mount; logout clears it.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut session = use_context_provider(|| Signal::new(Session::initializing()));

    let _ = use_resource(move || async move {
        let verified = match api::client() {
            Ok(client) => client.verify().await,
            Err(e) => Err(e),
        };
        session.write().resolve(verified);
    });

    rsx! {
        {children}
    }
}

/// Renders `children` for a signed-in user, a loading screen while the session is
/// being verified, and calls `on_unauthenticated` otherwise.
#[component]
pub fn ProtectedRoute(on_unauthenticated: EventHandler<()>, children: Element) -> Element {
    let auth = use_auth();
    let access = use_memo(move || guard(&auth.read()));

    use_effect(move || {
        if access() == Access::Redirect {
            tracing::debug!("no session; leaving protected page");
            on_unauthenticated.call(());
        }
    });

    match access() {
        Access::Pending => rsx! {
            div {
                class: "loading-screen",
                div { class: "spinner" }
                p { "Loading..." }
            }
        },
        Access::Redirect => rsx! {},
        Access::Granted => rsx! {
            {children}
        },
    }
}

/// Signs the user out locally and calls `on_logout`.
#[component]
pub fn LogoutButton(
    on_logout: EventHandler<()>,
    #[props(default = "Sign Out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut session = use_auth();

    rsx! {
        button {
            class: "{class}",
            onclick: move |_| {
                session.write().clear();
                tracing::info!("signed out");
                on_logout.call(());
            },
            "{label}"
        }
    }
}
