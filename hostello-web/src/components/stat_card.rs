use yew::{AttrValue, Html, Properties, function_component, html};
use yew_icons::{Icon, IconId};

#[derive(Properties, PartialEq)]
pub struct StatCardProps {
    pub title: AttrValue,
    pub value: AttrValue,
    pub icon: IconId,
    #[prop_or_default]
    pub description: Option<AttrValue>,
}

#[function_component(StatCard)]
pub fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="stat">
            <div class="stat-figure text-primary">
                <Icon icon_id={props.icon.clone()} class="w-8 h-8" />
            </div>
            <div class="stat-title">{ props.title.clone() }</div>
            <div class="stat-value">{ props.value.clone() }</div>
            if let Some(description) = props.description.clone() {
                <div class="stat-desc">{ description }</div>
            }
        </div>
    }
}
