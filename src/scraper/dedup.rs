use std::collections::HashSet;

use crate::accounts::Account;

/// Identifiers already accounted for during one deduplication pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenSet(HashSet<String>);

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `did` was not present before.
    pub fn insert(&mut self, did: &str) -> bool {
        self.0.insert(did.to_string())
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

impl<S: AsRef<str>> Extend<S> for SeenSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(|s| s.as_ref().to_string()));
    }
}

impl<S: AsRef<str>> FromIterator<S> for SeenSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = SeenSet::new();
        seen.extend(iter);
        seen
    }
}

/// Keep the first occurrence of every identifier not already in `seen`,
/// preserving input order. Survivors are added to the returned set, so a
/// second pass with it removes everything.
pub fn deduplicate(accounts: Vec<Account>, mut seen: SeenSet) -> (Vec<Account>, SeenSet) {
    let survivors = accounts
        .into_iter()
        .filter(|account| seen.insert(&account.did))
        .collect();

    (survivors, seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bluesky::testing::actor;

    fn accounts(dids: &[&str]) -> Vec<Account> {
        dids.iter()
            .map(|did| Account::from_actor(actor(did), "kw"))
            .collect()
    }

    fn dids(accounts: &[Account]) -> Vec<&str> {
        accounts.iter().map(|a| a.did.as_str()).collect()
    }

    #[test]
    fn prior_identifiers_are_removed() {
        let seen: SeenSet = ["did:plc:b"].into_iter().collect();
        let (kept, _) = deduplicate(accounts(&["did:plc:a", "did:plc:b", "did:plc:c"]), seen);
        assert_eq!(dids(&kept), vec!["did:plc:a", "did:plc:c"]);
    }

    #[test]
    fn repeats_within_batch_keep_first_occurrence_in_order() {
        let input = accounts(&["did:plc:c", "did:plc:a", "did:plc:c", "did:plc:b", "did:plc:a"]);
        let (kept, seen) = deduplicate(input, SeenSet::new());
        assert_eq!(dids(&kept), vec!["did:plc:c", "did:plc:a", "did:plc:b"]);
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn first_occurrence_carries_its_own_keyword() {
        let mut input = accounts(&["did:plc:a"]);
        let mut later = Account::from_actor(actor("did:plc:a"), "other");
        later.display_name = "second".into();
        input.push(later);

        let (kept, _) = deduplicate(input, SeenSet::new());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].keyword, "kw");
    }

    #[test]
    fn second_pass_removes_nothing_further() {
        let input = accounts(&["did:plc:a", "did:plc:b", "did:plc:a"]);
        let (once, _) = deduplicate(input, SeenSet::new());
        let (twice, _) = deduplicate(once.clone(), SeenSet::new());
        assert_eq!(once, twice);
    }

    #[test]
    fn returned_set_rejects_a_replay_of_the_same_batch() {
        let (kept, seen) = deduplicate(accounts(&["did:plc:a", "did:plc:b"]), SeenSet::new());
        let (replayed, _) = deduplicate(kept, seen);
        assert!(replayed.is_empty());
    }

    #[test]
    fn empty_input_leaves_seed_untouched() {
        let seen: SeenSet = ["did:plc:x"].into_iter().collect();
        let (kept, after) = deduplicate(Vec::new(), seen.clone());
        assert!(kept.is_empty());
        assert_eq!(after, seen);
    }
}
