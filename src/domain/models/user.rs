/// A user account.
///
/// The password is an opaque string; hashing or any other credential
/// policy belongs to the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub fullname: String,
    pub password: String,
}
