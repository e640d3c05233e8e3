use dioxus::prelude::*;
use store::{LoanStatus, PriorityBand};

/// Color accent of a [`MetricCard`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Tone {
    #[default]
    Indigo,
    Red,
    Yellow,
    Green,
}

impl Tone {
    fn class(&self) -> &'static str {
        match self {
            Self::Indigo => "metric-card tone-indigo",
            Self::Red => "metric-card tone-red",
            Self::Yellow => "metric-card tone-yellow",
            Self::Green => "metric-card tone-green",
        }
    }
}

#[component]
pub fn MetricCard(name: String, value: String, #[props(default)] tone: Tone) -> Element {
    rsx! {
        div {
            class: tone.class(),
            p { class: "metric-name", "{name}" }
            h2 { class: "metric-value", "{value}" }
        }
    }
}

#[component]
pub fn StatusBadge(status: LoanStatus) -> Element {
    let class = match status {
        LoanStatus::Active => "badge badge-yellow",
        LoanStatus::PaidOff => "badge badge-green",
        LoanStatus::Default => "badge badge-red",
    };
    rsx! {
        span { class, "{status}" }
    }
}

/// "High (9)"
#[component]
pub fn PriorityBadge(priority: u8) -> Element {
    let band = PriorityBand::of(priority);
    let class = match band {
        PriorityBand::High => "badge badge-red",
        PriorityBand::Medium => "badge badge-yellow",
        PriorityBand::Low => "badge badge-green",
    };
    rsx! {
        span { class, "{band.label()} ({priority})" }
    }
}

/// Inline message under a form field.
#[component]
pub fn FieldError(message: Option<String>) -> Element {
    match message {
        Some(message) => rsx! {
            p { class: "field-error", "{message}" }
        },
        None => rsx! {},
    }
}

/// Dismissable error banner for page-level failures.
#[component]
pub fn ErrorBanner(message: String, on_dismiss: EventHandler<()>) -> Element {
    rsx! {
        div {
            class: "error-banner",
            role: "alert",
            span { "{message}" }
            button { onclick: move |_| on_dismiss.call(()), "Dismiss" }
        }
    }
}
