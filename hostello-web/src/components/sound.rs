//! Audible cue for newly arrived notifications. Best effort: every failure is logged and dropped.

use tracing::debug;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::HtmlAudioElement;

const ALERT_SOUND_URL: &str = match option_env!("HOSTELLO_ALERT_SOUND_URL") {
    Some(url) => url,
    None => "/notification.mp3",
};

pub fn play_alert() {
    let audio = match HtmlAudioElement::new_with_src(ALERT_SOUND_URL) {
        Ok(audio) => audio,
        Err(error) => {
            debug!(error = ?error, "alert sound unavailable");
            return;
        }
    };
    let playback = match audio.play() {
        Ok(promise) => promise,
        Err(error) => {
            debug!(error = ?error, "alert sound refused to start");
            return;
        }
    };
    spawn_local(async move {
        if let Err(error) = JsFuture::from(playback).await {
            debug!(error = ?error, "alert sound playback rejected");
        }
    });
}
