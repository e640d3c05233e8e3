use dioxus::prelude::*;
use store::UserInfo;

use crate::auth::LogoutButton;
use crate::{icons, ActivityLogToggle, Icon};

const SIDEBAR_CSS: Asset = asset!("/assets/styling/sidebar.css");

/// Pages reachable from the sidebar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavItem {
    Dashboard,
    Tasks,
    Loans,
}

impl NavItem {
    pub const ALL: [NavItem; 3] = [NavItem::Dashboard, NavItem::Tasks, NavItem::Loans];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tasks => "To-Do List",
            Self::Loans => "Loans",
        }
    }
}

#[component]
fn NavIcon(item: NavItem) -> Element {
    match item {
        NavItem::Dashboard => rsx! { Icon { icon: icons::FaHouse, width: 16, height: 16 } },
        NavItem::Tasks => rsx! { Icon { icon: icons::FaListCheck, width: 16, height: 16 } },
        NavItem::Loans => rsx! { Icon { icon: icons::FaBoxArchive, width: 16, height: 16 } },
    }
}

#[component]
pub fn Sidebar(active: Option<NavItem>, on_select: EventHandler<NavItem>) -> Element {
    rsx! {
        document::Stylesheet { href: SIDEBAR_CSS }

        nav {
            class: "sidebar",
            div { class: "sidebar-brand", "LifeDesk" }
            ul {
                class: "sidebar-links",
                for item in NavItem::ALL {
                    li {
                        key: "{item.label()}",
                        class: if active == Some(item) { "sidebar-link active" } else { "sidebar-link" },
                        onclick: move |_| on_select.call(item),
                        NavIcon { item }
                        span { "{item.label()}" }
                    }
                }
            }
        }
    }
}

/// Header with the signed-in user and the sign-out button.
#[component]
pub fn Topbar(user: Option<UserInfo>, on_logout: EventHandler<()>) -> Element {
    let (name, email) = match &user {
        Some(u) => (u.display_name().to_string(), u.email.clone()),
        None => ("User".to_string(), String::new()),
    };
    let initial = name
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "U".to_string());

    rsx! {
        header {
            class: "topbar",
            ActivityLogToggle {}
            div {
                class: "topbar-user",
                div {
                    class: "topbar-user-text",
                    span { class: "topbar-user-name", "{name}" }
                    span { class: "topbar-user-email", "{email}" }
                }
                div { class: "avatar", "{initial}" }
                LogoutButton {
                    class: "btn btn-secondary",
                    on_logout: move |_| on_logout.call(()),
                }
            }
        }
    }
}
