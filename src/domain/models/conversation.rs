use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub title: String,
}

impl Conversation {
    pub fn new(id: &str, title: &str) -> Conversation {
        return Conversation {
            id: id.to_string(),
            title: title.to_string(),
        };
    }
}
