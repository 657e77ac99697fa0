use serde::{Serialize, Serializer};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Reply codes the client knows how to route
///
/// Tags arrive out of band from the payload body. They parse from either
/// the symbolic name (`ERR_NOTONCHANNEL`) or the numeric (`442`) and always
/// display as the symbolic name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter)]
pub enum ReplyTag {
    #[strum(to_string = "ERR_NOSUCHNICK", serialize = "401")]
    NoSuchNick,
    #[strum(to_string = "ERR_NOSUCHCHANNEL", serialize = "403")]
    NoSuchChannel,
    #[strum(to_string = "ERR_CANNOTSENDTOCHAN", serialize = "404")]
    CannotSendToChan,
    #[strum(to_string = "ERR_TOOMANYCHANNELS", serialize = "405")]
    TooManyChannels,
    #[strum(to_string = "ERR_UNKNOWNCOMMAND", serialize = "421")]
    UnknownCommand,
    #[strum(to_string = "ERR_ERRONEUSNICKNAME", serialize = "432")]
    ErroneousNickname,
    #[strum(to_string = "ERR_NICKNAMEINUSE", serialize = "433")]
    NicknameInUse,
    #[strum(to_string = "ERR_USERNOTINCHANNEL", serialize = "441")]
    UserNotInChannel,
    #[strum(to_string = "ERR_NOTONCHANNEL", serialize = "442")]
    NotOnChannel,
    #[strum(to_string = "ERR_USERONCHANNEL", serialize = "443")]
    UserOnChannel,
    #[strum(to_string = "ERR_NEEDMOREPARAMS", serialize = "461")]
    NeedMoreParams,
    #[strum(to_string = "ERR_CHANNELISFULL", serialize = "471")]
    ChannelIsFull,
    #[strum(to_string = "ERR_INVITEONLYCHAN", serialize = "473")]
    InviteOnlyChan,
    #[strum(to_string = "ERR_BANNEDFROMCHAN", serialize = "474")]
    BannedFromChan,
    #[strum(to_string = "ERR_BADCHANNELKEY", serialize = "475")]
    BadChannelKey,
    #[strum(to_string = "ERR_CHANOPRIVSNEEDED", serialize = "482")]
    ChanOpPrivsNeeded,
}

impl ReplyTag {
    /// Three-digit numeric the server sends for this reply
    pub fn numeric(&self) -> u16 {
        match self {
            ReplyTag::NoSuchNick => 401,
            ReplyTag::NoSuchChannel => 403,
            ReplyTag::CannotSendToChan => 404,
            ReplyTag::TooManyChannels => 405,
            ReplyTag::UnknownCommand => 421,
            ReplyTag::ErroneousNickname => 432,
            ReplyTag::NicknameInUse => 433,
            ReplyTag::UserNotInChannel => 441,
            ReplyTag::NotOnChannel => 442,
            ReplyTag::UserOnChannel => 443,
            ReplyTag::NeedMoreParams => 461,
            ReplyTag::ChannelIsFull => 471,
            ReplyTag::InviteOnlyChan => 473,
            ReplyTag::BannedFromChan => 474,
            ReplyTag::BadChannelKey => 475,
            ReplyTag::ChanOpPrivsNeeded => 482,
        }
    }

    /// Log entry kind for this reply, e.g. `error:err_notonchannel`
    pub fn event_kind(&self) -> String {
        format!("error:{}", self.to_string().to_lowercase())
    }

    pub fn all() -> impl Iterator<Item = ReplyTag> {
        ReplyTag::iter()
    }
}

impl Serialize for ReplyTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
