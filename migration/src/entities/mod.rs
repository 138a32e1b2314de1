pub mod click_event;
pub mod identity;
pub mod link;
pub mod share_grant;

pub use click_event::Entity as ClickEventEntity;
pub use identity::Entity as IdentityEntity;
pub use link::Entity as LinkEntity;
pub use share_grant::Entity as ShareGrantEntity;
