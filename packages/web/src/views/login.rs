//! Login page view with email and password.

use dioxus::prelude::*;
use store::{LoginDraft, MutationFlow};
use ui::{use_auth, LoginFields};

use crate::Route;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let mut auth = use_auth();
    let nav = use_navigator();
    let mut flow = use_signal(|| {
        let mut flow = MutationFlow::new();
        flow.open_add(LoginDraft::default());
        flow
    });

    // If already logged in, go to the dashboard
    use_effect(move || {
        if auth.read().user.is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    let on_submit = move |_| {
        let credentials = match flow.write().submit() {
            Ok(submission) => submission.payload,
            Err(e) => {
                tracing::debug!("login not sent: {e}");
                return;
            }
        };
        spawn(async move {
            let result = match api::client() {
                Ok(client) => client.login(&credentials).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(user) => {
                    tracing::info!("signed in as user {}", user.id);
                    let _ = flow.write().complete(Ok(()));
                    auth.write().sign_in(user);
                    nav.replace(Route::Dashboard {});
                }
                Err(e) => {
                    let _ = flow.write().complete(Err(e));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { "Welcome back" }
                p { class: "subtitle", "Sign in to your LifeDesk account" }
                LoginFields { flow, on_submit }
                div {
                    class: "auth-links",
                    Link { to: Route::ForgotPassword {}, "Forgot password?" }
                    Link { to: Route::Register {}, "Create an account" }
                }
            }
        }
    }
}
