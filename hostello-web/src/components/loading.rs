use yew::{AttrValue, Html, Properties, function_component, html};

#[derive(Properties, PartialEq)]
pub struct LoadingProps {
    #[prop_or(AttrValue::Static("Loading"))]
    pub label: AttrValue,
}

#[function_component(Loading)]
pub fn loading(props: &LoadingProps) -> Html {
    html! {
        <div class="flex flex-col items-center justify-center h-full animate-fadeIn">
            <div class="bg-base-200 p-6 rounded-lg shadow-md flex flex-col items-center">
                <div class="text-xl font-medium flex items-center gap-2">
                    <span class="loading loading-spinner text-primary"></span>
                    <span>{"Hostello"}</span>
                </div>
                <div class="mt-3 flex items-center">
                    <span>{ props.label.clone() }</span>
                </div>
            </div>
        </div>
    }
}
