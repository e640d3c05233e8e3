use dioxus::prelude::*;
use ui::{use_auth, ActivityLogPanel, NavItem, ProtectedRoute, Sidebar, Topbar};

use crate::Route;

/// Sidebar, topbar and the current page, for signed-in users only.
#[component]
pub fn Shell() -> Element {
    let nav = use_navigator();
    let auth = use_auth();
    let route = use_route::<Route>();

    let active = match route {
        Route::Dashboard {} => Some(NavItem::Dashboard),
        Route::Tasks {} => Some(NavItem::Tasks),
        Route::Loans {} => Some(NavItem::Loans),
        _ => None,
    };
    let user = auth.read().user.clone();

    rsx! {
        ProtectedRoute {
            on_unauthenticated: move |_| {
                nav.replace(Route::Login {});
            },
            div {
                class: "shell",
                Sidebar {
                    active,
                    on_select: move |item: NavItem| {
                        let target = match item {
                            NavItem::Dashboard => Route::Dashboard {},
                            NavItem::Tasks => Route::Tasks {},
                            NavItem::Loans => Route::Loans {},
                        };
                        nav.push(target);
                    },
                }
                div {
                    class: "shell-main",
                    Topbar {
                        user,
                        on_logout: move |_| {
                            nav.replace(Route::Login {});
                        },
                    }
                    main {
                        class: "shell-content",
                        Outlet::<Route> {}
                    }
                }
            }
            ActivityLogPanel {}
        }
    }
}
