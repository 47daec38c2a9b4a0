//! Identifier generation

/// Generate a new entity id (ULID string, sortable by creation time)
pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

/// Generate an unguessable token (used for workspace invites)
pub fn new_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
