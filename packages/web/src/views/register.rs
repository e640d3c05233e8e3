use dioxus::prelude::*;
use store::{MutationFlow, RegisterDraft};
use ui::{use_auth, RegisterFields};

use crate::Route;

#[component]
pub fn Register() -> Element {
    let mut auth = use_auth();
    let nav = use_navigator();
    let mut flow = use_signal(|| {
        let mut flow = MutationFlow::new();
        flow.open_add(RegisterDraft::default());
        flow
    });

    use_effect(move || {
        if auth.read().user.is_some() {
            nav.replace(Route::Dashboard {});
        }
    });

    let on_submit = move |_| {
        let Ok(submission) = flow.write().submit() else {
            return;
        };
        spawn(async move {
            let result = match api::client() {
                Ok(client) => client.register(&submission.payload).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(user) => {
                    tracing::info!("registered user {}", user.id);
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
                h1 { "Create account" }
                p { class: "subtitle", "Track your tasks and loans in one place" }
                RegisterFields { flow, on_submit }
                div {
                    class: "auth-links",
                    span { class: "muted", "Already registered?" }
                    Link { to: Route::Login {}, "Sign in" }
                }
            }
        }
    }
}
