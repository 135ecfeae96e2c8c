use web_sys::HtmlInputElement;
use yew::{Callback, InputEvent, TargetCast, UseStateHandle};

/// `oninput` handler that mirrors an input's value into `state`.
pub fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |event: InputEvent| {
        if let Some(input) = event.target_dyn_into::<HtmlInputElement>() {
            state.set(input.value());
        }
    })
}
