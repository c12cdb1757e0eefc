use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

impl Role {
    /// Label shown above a chat bubble.
    pub fn label(&self, username: Option<&str>) -> String {
        match self {
            Role::User => {
                if let Some(name) = username {
                    if !name.is_empty() {
                        return name.to_string();
                    }
                }
                return "You".to_string();
            }
            Role::Bot => return "JaviAI".to_string(),
        }
    }
}
