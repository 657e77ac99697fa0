use std::sync::Arc;
use tracing::info;

use crate::event::{handler::ReplyHandler, store::EventStore, tags::ReplyTag};

use super::error_reply::ErrorReplyHandler;

/// Startup wiring: each recognized tag and whether its entry is about the
/// local user's own action
pub const DEFAULT_HANDLERS: &[(ReplyTag, bool)] = &[
    (ReplyTag::NoSuchNick, true),
    (ReplyTag::NoSuchChannel, true),
    (ReplyTag::CannotSendToChan, true),
    (ReplyTag::TooManyChannels, true),
    (ReplyTag::UnknownCommand, true),
    (ReplyTag::ErroneousNickname, true),
    (ReplyTag::NicknameInUse, true),
    (ReplyTag::UserNotInChannel, true),
    (ReplyTag::NotOnChannel, true),
    (ReplyTag::UserOnChannel, true),
    (ReplyTag::NeedMoreParams, true),
    (ReplyTag::ChannelIsFull, true),
    (ReplyTag::InviteOnlyChan, true),
    (ReplyTag::BannedFromChan, true),
    (ReplyTag::BadChannelKey, true),
    (ReplyTag::ChanOpPrivsNeeded, true),
];

/// Build one handler per entry in `DEFAULT_HANDLERS` and register each
/// exactly once
pub fn register_default_handlers(store: &Arc<EventStore>) -> Vec<Arc<ErrorReplyHandler>> {
    let handlers: Vec<Arc<ErrorReplyHandler>> = DEFAULT_HANDLERS
        .iter()
        .map(|&(tag, is_me)| Arc::new(ErrorReplyHandler::new(store, tag).with_is_me(is_me)))
        .collect();

    for handler in &handlers {
        handler.clone().listen();
    }

    info!(handler_count = handlers.len(), "Registered default reply handlers");
    handlers
}
