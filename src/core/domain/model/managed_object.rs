//! Managed object references, the handles the vSphere API uses for every server-side object.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A reference to a server-side object, e.g. `{"type": "Folder", "value": "group-v3"}`.
///
/// On the wire the reference also carries `"_typeName": "ManagedObjectReference"`,
/// which is required in request bodies and ignored when reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct ManagedObjectReference {
    /// Managed object type (`Folder`, `Datacenter`, `HostSystem`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Server-assigned identifier (`group-v3`, `host-12`, ...).
    pub value: String,
}

impl ManagedObjectReference {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    /// Path of a property or method of this object, relative to the `vim25` root.
    #[must_use]
    pub fn member_path(&self, member: &str) -> String {
        format!("{}/{}/{}", self.kind, self.value, member)
    }
}

impl Serialize for ManagedObjectReference {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("ManagedObjectReference", 3)?;
        state.serialize_field("_typeName", "ManagedObjectReference")?;
        state.serialize_field("type", &self.kind)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

impl fmt::Display for ManagedObjectReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// A reference together with the object's display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedReference {
    pub reference: ManagedObjectReference,
    pub name: String,
}

impl NamedReference {
    pub fn new(reference: ManagedObjectReference, name: impl Into<String>) -> Self {
        Self {
            reference,
            name: name.into(),
        }
    }
}
