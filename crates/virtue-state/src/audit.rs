//! # Credit Audit
//!
//! Recomputes every balance from scratch and compares it to the stored
//! counter. The verification workflow only ever increments; this is the
//! independent check that the increments add up.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use virtue_core::{User, UserId};

use crate::deed::{Deed, DeedStatus};

/// A user whose stored balance disagrees with their verified deeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDiscrepancy {
    pub user_id: UserId,
    /// Balance held on the user record.
    pub recorded: u64,
    /// Sum of `creditsAwarded` over the user's verified deeds.
    pub expected: u64,
}

/// Sum of awarded credits per submitter over verified deeds.
pub fn expected_balances(deeds: &[Deed]) -> HashMap<UserId, u64> {
    let mut totals: HashMap<UserId, u64> = HashMap::new();
    for deed in deeds.iter().filter(|d| d.status == DeedStatus::Verified) {
        let total = totals.entry(deed.user_id.clone()).or_default();
        *total = total.saturating_add(deed.credits_awarded);
    }
    totals
}

/// Users whose balance differs from the recomputed value, ordered by id.
pub fn audit_balances(users: &[User], deeds: &[Deed]) -> Vec<BalanceDiscrepancy> {
    let expected = expected_balances(deeds);
    let mut discrepancies: Vec<BalanceDiscrepancy> = users
        .iter()
        .filter_map(|user| {
            let want = expected.get(&user.id).copied().unwrap_or(0);
            (want != user.credits).then(|| BalanceDiscrepancy {
                user_id: user.id.clone(),
                recorded: user.credits,
                expected: want,
            })
        })
        .collect();
    discrepancies.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    discrepancies
}
