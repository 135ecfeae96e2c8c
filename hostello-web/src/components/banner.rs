//! Inline status banner.
//!
//! Errors stay until dismissed; successes and announcements expire on their own.

use gloo_timers::callback::Timeout;
use std::time::Duration;
use yew::{Callback, Html, Properties, classes, function_component, html, use_effect_with};

use crate::config::{ARRIVAL_BANNER, SUCCESS_BANNER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    /// New notifications arrived.
    Announcement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: BannerKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    pub fn announcement(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Announcement,
            message: message.into(),
        }
    }

    /// How long the banner stays up; `None` until dismissed.
    pub fn lifetime(&self) -> Option<Duration> {
        match self.kind {
            BannerKind::Success => Some(SUCCESS_BANNER),
            BannerKind::Announcement => Some(ARRIVAL_BANNER),
            BannerKind::Error => None,
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct BannerProps {
    pub notice: Option<Notice>,
    pub on_dismiss: Callback<()>,
}

#[function_component(Banner)]
pub fn banner(props: &BannerProps) -> Html {
    {
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(props.notice.clone(), move |notice| {
            let timer = notice.as_ref().and_then(Notice::lifetime).map(|lifetime| {
                let millis = u32::try_from(lifetime.as_millis()).unwrap_or(u32::MAX);
                Timeout::new(millis, move || on_dismiss.emit(()))
            });
            move || drop(timer)
        });
    }

    let Some(notice) = props.notice.as_ref() else {
        return html! {};
    };

    let tone = match notice.kind {
        BannerKind::Success => "alert-success",
        BannerKind::Error => "alert-error",
        BannerKind::Announcement => "alert-info",
    };
    let dismiss = props.on_dismiss.reform(|_| ());

    html! {
        <div role="alert" class={classes!("alert", tone, "flex", "justify-between", "mb-4")}>
            <span>{ notice.message.clone() }</span>
            <button class="btn btn-ghost btn-xs" aria-label="Dismiss" onclick={dismiss}>{"✕"}</button>
        </div>
    }
}
