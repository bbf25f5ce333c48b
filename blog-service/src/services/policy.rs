/// Access policy - the single decision function for identity- and
/// ownership-gated actions.
///
/// Handlers never re-derive these rules; they ask once and act on the
/// decision. A refused edit is a redirect to the post's read view, not an
/// error page.
use uuid::Uuid;

use crate::domain::Identity;

/// A gated action, carrying whatever the decision needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    CreatePost,
    EditPost { post_id: Uuid, author_id: Uuid },
    DeletePost { post_id: Uuid, author_id: Uuid },
    AddComment,
    Follow,
    Unfollow,
    ViewFollowFeed,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Anonymous attempt at an identity-gated action
    RedirectToLogin,
    /// Non-owner mutation attempt: bounce to the post's detail view
    RedirectToPost(Uuid),
}

pub fn authorize(identity: Identity, action: &Action) -> Decision {
    match action {
        Action::CreatePost
        | Action::AddComment
        | Action::Follow
        | Action::Unfollow
        | Action::ViewFollowFeed => match identity {
            Identity::Anonymous => Decision::RedirectToLogin,
            Identity::User(_) => Decision::Allow,
        },
        Action::EditPost { post_id, author_id }
        | Action::DeletePost { post_id, author_id } => match identity {
            Identity::User(user) if user == *author_id => Decision::Allow,
            // Anonymous and non-owner alike bounce to the read view.
            _ => Decision::RedirectToPost(*post_id),
        },
    }
}
