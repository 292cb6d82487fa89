//! Signed-in user

use mockall::automock;
use moonbeam::ids::TypedUuid;

/// User identifier
pub type UserId = TypedUuid<User>;

/// A signed-in customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// User id
    pub id: UserId,

    /// Name shown on pickup orders
    pub name: String,

    /// Contact email
    pub email: String,
}

/// Who is using the session, if anyone.
#[automock]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, or `None` for a guest.
    fn current_user(&self) -> Option<User>;
}

/// A fixed identity, for guests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<User>,
}

impl StaticIdentity {
    /// No one is signed in.
    pub fn guest() -> Self {
        Self::default()
    }

    /// `user` is signed in.
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
