//! Group resource implementation.

use serde::{Deserialize, Serialize};

use crate::rest::ResourceKind;

/// A named set of users sharing permissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Group {
    /// The unique identifier of the group.
    /// Read-only field.
    pub id: Option<u64>,

    /// The name of the group.
    pub name: String,
}

impl ResourceKind for Group {
    type Cache = ();

    const NAME: &'static str = "Group";
    const ENDPOINT: &'static str = "group";

    const WRITABLE_FIELDS: &'static [&'static str] = &["name"];
    const READ_ONLY_FIELDS: &'static [&'static str] = &["id"];

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn clear_id(&mut self) {
        self.id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::resources::test_support::assert_field_sets;

    #[test]
    fn test_group_field_classes_cover_all_fields() {
        assert_field_sets::<Group>();
    }
}
