//! # Leaderboard Projection
//!
//! Ranks non-admin users by credit balance.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use virtue_core::{User, UserId};

/// Maximum number of ranked entries.
pub const LEADERBOARD_SIZE: usize = 10;

/// One ranked user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LeaderboardEntry {
    pub id: UserId,
    pub name: String,
    pub credits: u64,
}

/// Top [`LEADERBOARD_SIZE`] non-admin users by credits, descending.
///
/// Ties are broken by user id ascending so the result does not depend on
/// store iteration order.
pub fn leaderboard<I>(users: I) -> Vec<LeaderboardEntry>
where
    I: IntoIterator<Item = User>,
{
    let mut ranked: Vec<User> = users.into_iter().filter(|u| !u.role.is_admin()).collect();
    ranked.sort_by(|a, b| b.credits.cmp(&a.credits).then_with(|| a.id.cmp(&b.id)));
    ranked
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .map(|u| LeaderboardEntry {
            id: u.id,
            name: u.name,
            credits: u.credits,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use virtue_core::{PasswordHash, Role};

    use super::*;

    fn user(id: &str, role: Role, credits: u64) -> User {
        User {
            id: UserId::from(id),
            name: id.to_string(),
            email: format!("{id}@example.com"),
            role,
            credits,
            password_hash: PasswordHash::default(),
        }
    }

    #[test]
    fn orders_by_credits_descending() {
        let board = leaderboard(vec![
            user("a", Role::User, 3),
            user("b", Role::User, 12),
            user("c", Role::User, 8),
        ]);
        let ids: Vec<_> = board.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn excludes_admins_even_with_most_credits() {
        let board = leaderboard(vec![user("admin", Role::Admin, 1_000), user("a", Role::User, 1)]);
        assert_eq!(board.len(), 1);
        assert_eq!(board[0].id.as_str(), "a");
    }

    #[test]
    fn truncates_to_ten() {
        let users = (0..25).map(|i| user(&format!("u{i:02}"), Role::User, i));
        let board = leaderboard(users);
        assert_eq!(board.len(), LEADERBOARD_SIZE);
        assert_eq!(board[0].credits, 24);
        assert_eq!(board[9].credits, 15);
    }

    #[test]
    fn ties_broken_by_id() {
        let board = leaderboard(vec![
            user("zed", Role::User, 5),
            user("amy", Role::User, 5),
            user("kim", Role::User, 5),
        ]);
        let ids: Vec<_> = board.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["amy", "kim", "zed"]);
    }

    #[test]
    fn empty_input_gives_empty_board() {
        assert!(leaderboard(Vec::new()).is_empty());
    }

    #[test]
    fn entry_serializes_only_public_fields() {
        let board = leaderboard(vec![user("a", Role::User, 2)]);
        let json = serde_json::to_value(&board[0]).unwrap();
        assert_eq!(json, serde_json::json!({"id": "a", "name": "a", "credits": 2}));
    }

    proptest! {
        #[test]
        fn leaderboard_shape_holds(
            specs in prop::collection::vec((any::<bool>(), 0u64..50), 0..40)
        ) {
            let users: Vec<User> = specs
                .iter()
                .enumerate()
                .map(|(i, (admin, credits))| {
                    let role = if *admin { Role::Admin } else { Role::User };
                    user(&format!("u{i:03}"), role, *credits)
                })
                .collect();
            let admins: Vec<UserId> = users
                .iter()
                .filter(|u| u.role.is_admin())
                .map(|u| u.id.clone())
                .collect();
            let non_admins = users.len() - admins.len();

            let board = leaderboard(users);

            prop_assert!(board.len() <= LEADERBOARD_SIZE);
            prop_assert_eq!(board.len(), non_admins.min(LEADERBOARD_SIZE));
            prop_assert!(board.iter().all(|e| !admins.contains(&e.id)));
            prop_assert!(board.windows(2).all(|w| w[0].credits >= w[1].credits));
        }
    }
}
