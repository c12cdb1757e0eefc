use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

/// `Threads` keeps a conversation list. `Single` talks to the legacy
/// endpoints with one implicit thread and no sidebar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ChatMode {
    #[default]
    Threads,
    Single,
}

impl ChatMode {
    pub fn parse(text: String) -> Option<ChatMode> {
        return ChatMode::iter().find(|e| return e.to_string() == text);
    }
}
