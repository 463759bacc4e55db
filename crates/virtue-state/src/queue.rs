//! Admin review queue: pending deeds annotated with the submitter's name.

use serde::Serialize;
use utoipa::ToSchema;

use crate::deed::Deed;
use crate::store::{DeedStore, UserStore};

/// Shown when a pending deed's submitter no longer exists.
pub const UNKNOWN_USER: &str = "Unknown User";

/// A pending deed as the review queue presents it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingDeed {
    #[serde(flatten)]
    pub deed: Deed,
    pub user_name: String,
}

/// All pending deeds, oldest first.
pub fn pending_queue<S>(store: &S) -> Vec<PendingDeed>
where
    S: UserStore + DeedStore + ?Sized,
{
    let mut pending: Vec<Deed> = store.deeds().into_iter().filter(Deed::is_pending).collect();
    pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    pending
        .into_iter()
        .map(|deed| {
            let user_name = store
                .user(&deed.user_id)
                .map_or_else(|| UNKNOWN_USER.to_string(), |u| u.name);
            PendingDeed { deed, user_name }
        })
        .collect()
}
