use strum::EnumIter;

/// Authenticated identity held by the client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Keys persisted in the session store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionKey {
    Token,
    Username,
}
