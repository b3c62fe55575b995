//! Logical actions and the link relations each one tries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A logical hypermedia action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Read,
    ReadDefault,
    Refresh,
    Create,
    Update,
    Save,
    Delete,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::Read,
        Action::ReadDefault,
        Action::Refresh,
        Action::Create,
        Action::Update,
        Action::Save,
        Action::Delete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::ReadDefault => "readDefault",
            Action::Refresh => "refresh",
            Action::Create => "create",
            Action::Update => "update",
            Action::Save => "save",
            Action::Delete => "delete",
        }
    }

    /// The "before" and "after" notification names for node-bound actions.
    pub fn lifecycle(self) -> Option<(&'static str, &'static str)> {
        match self {
            Action::Read | Action::ReadDefault => None,
            Action::Refresh => Some(("refreshing", "refreshed")),
            Action::Create => Some(("creating", "created")),
            Action::Update => Some(("updating", "updated")),
            Action::Save => Some(("saving", "saved")),
            Action::Delete => Some(("deleting", "deleted")),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

/// Priority lists of rels per action.
///
/// `save` has no list of its own unless one is set: it tries the `update`
/// rels, then the `create` rels, so overriding either affects `save` too.
#[derive(Debug, Clone, PartialEq)]
pub struct RelPolicy {
    rels: BTreeMap<Action, Vec<String>>,
}

impl Default for RelPolicy {
    fn default() -> Self {
        let table: [(Action, &[&str]); 6] = [
            (Action::Read, &["instances"]),
            (Action::ReadDefault, &["create-form", "new", "default"]),
            (Action::Refresh, &["edit-form", "self", "full"]),
            (Action::Create, &["create"]),
            (Action::Update, &["edit", "update"]),
            (Action::Delete, &["self", "full", "delete"]),
        ];
        Self {
            rels: table
                .into_iter()
                .map(|(action, rels)| (action, rels.iter().map(|r| r.to_string()).collect()))
                .collect(),
        }
    }
}

impl RelPolicy {
    /// Replace the rels tried for `action`.
    pub fn set_rels<I, S>(&mut self, action: Action, rels: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rels
            .insert(action, rels.into_iter().map(Into::into).collect());
        self
    }

    /// The rels tried for `action`, in priority order.
    pub fn rels(&self, action: Action) -> Vec<String> {
        match (action, self.rels.get(&action)) {
            (_, Some(rels)) => rels.clone(),
            (Action::Save, None) => {
                let mut rels = self.rels(Action::Update);
                rels.extend(self.rels(Action::Create));
                rels
            }
            (_, None) => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        let policy = RelPolicy::default();
        assert_eq!(policy.rels(Action::Read), vec!["instances"]);
        assert_eq!(policy.rels(Action::Save), vec!["edit", "update", "create"]);
        assert_eq!(policy.rels(Action::Delete), vec!["self", "full", "delete"]);
        assert_eq!(
            policy.rels(Action::ReadDefault),
            vec!["create-form", "new", "default"]
        );
    }

    #[test]
    fn save_follows_update_and_create_overrides() {
        let mut policy = RelPolicy::default();
        policy.set_rels(Action::Create, ["post"]);
        assert_eq!(policy.rels(Action::Save), vec!["edit", "update", "post"]);
        policy.set_rels(Action::Save, ["put"]);
        assert_eq!(policy.rels(Action::Save), vec!["put"]);
    }

    #[test]
    fn action_names_parse_back() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>(), Ok(action));
        }
        assert!("patch".parse::<Action>().is_err());
        assert_eq!(Action::Read.lifecycle(), None);
        assert_eq!(Action::Save.lifecycle(), Some(("saving", "saved")));
    }
}
