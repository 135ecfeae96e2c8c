mod api;
mod app;
mod components;
mod config;
mod containers;
mod logging;
mod models;
mod pages;
mod routes;
mod storage;


use app::App;
use tracing::{error, info};
use yew::Renderer;
use yew::{Html, function_component, html};
use yewdux::YewduxRoot;

#[function_component(Root)]
fn root() -> Html {
    html! {
        <YewduxRoot>
            <App />
        </YewduxRoot>
    }
}

fn main() {
    logging::init();

    std::panic::set_hook(Box::new(|info| {
        let payload = info
            .payload()
            .downcast_ref::<String>()
            .map(String::as_str)
            .or_else(|| info.payload().downcast_ref::<&str>().copied())
            .unwrap_or("unknown panic");
        match info.location() {
            Some(location) => error!(
                file = location.file(),
                line = location.line(),
                column = location.column(),
                "panic: {payload}"
            ),
            None => error!("panic: {payload}"),
        }
    }));

    info!("starting Hostello");
    Renderer::<Root>::new().render();
}
