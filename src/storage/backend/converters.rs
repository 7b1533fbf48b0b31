use crate::analytics::ClickEvent;
use crate::storage::ShortLink;
use migration::entities::{click_event, short_link};

/// 将 Sea-ORM Model 转换为 ShortLink
pub fn model_to_link(model: short_link::Model) -> ShortLink {
    ShortLink {
        slug: model.slug,
        target_url: model.target_url,
        created_at: model.created_at,
    }
}

/// 将 ShortLink 转换为 ActiveModel（仅用于插入，映射不会被更新）
pub fn link_to_active_model(link: &ShortLink) -> short_link::ActiveModel {
    use sea_orm::ActiveValue::Set;

    short_link::ActiveModel {
        slug: Set(link.slug.clone()),
        target_url: Set(link.target_url.clone()),
        created_at: Set(link.created_at),
    }
}

/// 将 Sea-ORM Model 转换为 ClickEvent
pub fn model_to_event(model: click_event::Model) -> ClickEvent {
    ClickEvent {
        slug: model.slug,
        timestamp: model.clicked_at,
        referrer: model.referrer,
        user_agent: model.user_agent,
    }
}

/// 将 ClickEvent 转换为 ActiveModel（id 由数据库自增分配）
pub fn event_to_active_model(event: &ClickEvent) -> click_event::ActiveModel {
    use sea_orm::ActiveValue::{NotSet, Set};

    click_event::ActiveModel {
        id: NotSet,
        slug: Set(event.slug.clone()),
        clicked_at: Set(event.timestamp),
        referrer: Set(event.referrer.clone()),
        user_agent: Set(event.user_agent.clone()),
    }
}
