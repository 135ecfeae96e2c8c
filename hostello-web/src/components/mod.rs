pub(crate) mod banner;
pub(crate) mod form;
pub(crate) mod loading;
pub(crate) mod notification_badge;
pub(crate) mod protected_route;
pub(crate) mod sound;
pub(crate) mod stat_card;

pub use banner::{Banner, BannerKind, Notice};
pub use form::bind_input;
pub use loading::Loading;
pub use stat_card::StatCard;
