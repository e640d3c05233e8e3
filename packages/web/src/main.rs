use dioxus::prelude::*;

use views::{Dashboard, ForgotPassword, Loans, Login, NotFound, Register, Shell, Tasks};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/forgot-password")]
    ForgotPassword {},
    #[layout(Shell)]
        #[route("/")]
        Dashboard {},
        #[route("/tasks")]
        Tasks {},
        #[route("/loans")]
        Loans {},
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");
const CONFIG_TOML: &str = include_str!("../lifedesk.toml");

fn main() {
    let config = api::load_config(CONFIG_TOML);
    if let Err(e) = api::init(config) {
        tracing::error!("Failed to set up the backend client: {}", e);
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(|| Signal::new(ui::ActivityLog::default()));

    rsx! {
        // Global app resources
        document::Link { rel: "stylesheet", href: ui::APP_CSS }
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        ui::AuthProvider {
            Router::<Route> {}
        }
    }
}
