use dioxus::prelude::*;
use store::{ForgotPasswordDraft, MutationFlow};
use ui::ForgotPasswordFields;

use crate::Route;

#[component]
pub fn ForgotPassword() -> Element {
    let mut flow = use_signal(|| {
        let mut flow = MutationFlow::new();
        flow.open_add(ForgotPasswordDraft::default());
        flow
    });
    let mut sent_to = use_signal(|| Option::<String>::None);

    let on_submit = move |_| {
        let reset = match flow.write().submit() {
            Ok(submission) => submission.payload,
            Err(e) => {
                tracing::debug!("reset request not sent: {e}");
                return;
            }
        };
        spawn(async move {
            let result = match api::client() {
                Ok(client) => client.forgot_password(&reset).await,
                Err(e) => Err(e),
            };
            if let Err(e) = &result {
                tracing::warn!("password reset request failed: {e}");
            }
            let sent = result.is_ok();
            let _ = flow.write().complete(result);
            if sent {
                sent_to.set(Some(reset.email));
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h1 { "Reset password" }
                p { class: "subtitle", "We will email you a link to choose a new password." }
                if let Some(address) = sent_to() {
                    p { class: "notice", "If an account exists for {address}, a reset link is on its way." }
                } else {
                    ForgotPasswordFields { flow, on_submit }
                }
                div {
                    class: "auth-links",
                    Link { to: Route::Login {}, "Back to sign in" }
                }
            }
        }
    }
}
