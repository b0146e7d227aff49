//! Agency user role definitions.

use std::collections::BTreeMap;

use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{
    ser::SerializeMap as _, Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::{Map, Value};

/// Name of a role.
#[derive(
    AsRef,
    Clone,
    Debug,
    Deserialize,
    Display,
    Eq,
    From,
    Into,
    PartialEq,
    Serialize,
)]
#[as_ref(str)]
#[from(&str, String)]
#[serde(transparent)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

/// Node of a [`PermissionSet`] tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PermissionNode {
    /// Leaf granting (`true`) or denying (`false`) a permission.
    Boolean(bool),

    /// Nested group of named permissions.
    Group(BTreeMap<String, PermissionNode>),
}

impl From<Value> for PermissionNode {
    /// Converts a JSON value into a [`PermissionNode`].
    ///
    /// Leaves which are neither booleans nor objects never grant anything, so
    /// they become a denying [`PermissionNode::Boolean`].
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(granted) => Self::Boolean(granted),
            Value::Object(map) => Self::Group(
                map.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
            Value::Null
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_) => Self::Boolean(false),
        }
    }
}

impl Serialize for PermissionNode {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match self {
            Self::Boolean(granted) => serializer.serialize_bool(*granted),
            Self::Group(group) => serializer.collect_map(group),
        }
    }
}

impl<'de> Deserialize<'de> for PermissionNode {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Set of permissions attached to a role.
///
/// Serialized as a JSON object, where a top-level `"all": true` entry grants
/// every permission regardless of the rest of the tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PermissionSet {
    /// Indicator whether every permission is granted.
    all: bool,

    /// Tree of the permissions.
    nodes: BTreeMap<String, PermissionNode>,
}

impl PermissionSet {
    /// Key of the top-level entry granting every permission.
    pub const ALL: &'static str = "all";

    /// Creates a new [`PermissionSet`] granting exactly the provided `nodes`.
    #[must_use]
    pub fn new(nodes: BTreeMap<String, PermissionNode>) -> Self {
        Self { all: false, nodes }
    }

    /// Creates a new [`PermissionSet`] granting every permission.
    #[must_use]
    pub fn all() -> Self {
        Self {
            all: true,
            nodes: BTreeMap::new(),
        }
    }

    /// Creates a new [`PermissionSet`] out of the provided JSON `value`.
    ///
    /// [`None`] is returned if the `value` is not a JSON object.
    #[must_use]
    pub fn from_json(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(map.into()),
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::String(_)
            | Value::Array(_) => None,
        }
    }

    /// Indicates whether this [`PermissionSet`] grants every permission.
    #[must_use]
    pub fn grants_all(&self) -> bool {
        self.all
    }

    /// Checks whether this [`PermissionSet`] grants the permission at the
    /// provided dot-separated `path` (like `reports.view`).
    #[must_use]
    pub fn grants(&self, path: &str) -> bool {
        if self.all {
            return true;
        }

        let mut segments = path.split('.');
        let Some(mut node) = segments.next().and_then(|s| self.nodes.get(s))
        else {
            return false;
        };
        for segment in segments {
            node = match node {
                PermissionNode::Group(group) => match group.get(segment) {
                    Some(n) => n,
                    None => return false,
                },
                PermissionNode::Boolean(_) => return false,
            };
        }

        *node == PermissionNode::Boolean(true)
    }
}

impl From<Map<String, Value>> for PermissionSet {
    fn from(mut map: Map<String, Value>) -> Self {
        let all = map.get(Self::ALL) == Some(&Value::Bool(true));
        if all {
            _ = map.remove(Self::ALL);
        }
        Self {
            all,
            nodes: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl Serialize for PermissionSet {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let len = self.nodes.len() + usize::from(self.all);
        let mut map = serializer.serialize_map(Some(len))?;
        if self.all {
            map.serialize_entry(Self::ALL, &true)?;
        }
        for (key, node) in &self.nodes {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PermissionSet {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::from)
    }
}
