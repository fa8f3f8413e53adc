//! Access levels, gated modules and the resources requests address.

use core::str::FromStr;

use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AuthzError;

/// Maximum capability granted on a project or module.
///
/// Totally ordered: `None < View < Edit`.
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    #[default]
    None,
    View,
    Edit,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::None => "none",
            AccessLevel::View => "view",
            AccessLevel::Edit => "edit",
        }
    }
}

impl core::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Independently gated resource categories inside a project.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ModuleName {
    Invoices,
    Orders,
    Suppliers,
    Files,
}

impl ModuleName {
    pub const ALL: [ModuleName; 4] = [
        ModuleName::Invoices,
        ModuleName::Orders,
        ModuleName::Suppliers,
        ModuleName::Files,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleName::Invoices => "invoices",
            ModuleName::Orders => "orders",
            ModuleName::Suppliers => "suppliers",
            ModuleName::Files => "files",
        }
    }

    fn index(self) -> usize {
        match self {
            ModuleName::Invoices => 0,
            ModuleName::Orders => 1,
            ModuleName::Suppliers => 2,
            ModuleName::Files => 3,
        }
    }
}

impl core::fmt::Display for ModuleName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleName {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleName::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AuthzError::misconfigured(format!("unknown module '{s}'")))
    }
}

/// Aggregated level for every module (a total function `ModuleName -> AccessLevel`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModuleLevels([AccessLevel; 4]);

impl ModuleLevels {
    pub fn uniform(level: AccessLevel) -> Self {
        Self([level; 4])
    }

    pub fn get(&self, module: ModuleName) -> AccessLevel {
        self.0[module.index()]
    }

    /// Raise `module` to `level` if it is higher; never lowers.
    pub fn raise(&mut self, module: ModuleName, level: AccessLevel) {
        let slot = &mut self.0[module.index()];
        if level > *slot {
            *slot = level;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModuleName, AccessLevel)> + '_ {
        ModuleName::ALL.into_iter().map(|m| (m, self.get(m)))
    }
}

impl Serialize for ModuleLevels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ModuleName::ALL.len()))?;
        for (module, level) in self.iter() {
            map.serialize_entry(module.as_str(), &level)?;
        }
        map.end()
    }
}

/// The resource a request addresses: projects themselves or one module.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Resource {
    Projects,
    Module(ModuleName),
}

impl Resource {
    pub const INVOICES: Resource = Resource::Module(ModuleName::Invoices);
    pub const ORDERS: Resource = Resource::Module(ModuleName::Orders);
    pub const SUPPLIERS: Resource = Resource::Module(ModuleName::Suppliers);
    pub const FILES: Resource = Resource::Module(ModuleName::Files);

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Projects => "projects",
            Resource::Module(m) => m.as_str(),
        }
    }

    pub fn module(&self) -> Option<ModuleName> {
        match self {
            Resource::Projects => None,
            Resource::Module(m) => Some(*m),
        }
    }
}

impl From<ModuleName> for Resource {
    fn from(value: ModuleName) -> Self {
        Resource::Module(value)
    }
}

impl core::fmt::Display for Resource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = AuthzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "projects" {
            return Ok(Resource::Projects);
        }
        s.parse::<ModuleName>()
            .map(Resource::Module)
            .map_err(|_| AuthzError::misconfigured(format!("unknown resource '{s}'")))
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_are_totally_ordered() {
        assert!(AccessLevel::None < AccessLevel::View);
        assert!(AccessLevel::View < AccessLevel::Edit);
        assert_eq!(AccessLevel::View.max(AccessLevel::Edit), AccessLevel::Edit);
    }

    #[test]
    fn raise_never_lowers() {
        let mut levels = ModuleLevels::uniform(AccessLevel::View);
        levels.raise(ModuleName::Orders, AccessLevel::None);
        assert_eq!(levels.get(ModuleName::Orders), AccessLevel::View);

        levels.raise(ModuleName::Orders, AccessLevel::Edit);
        assert_eq!(levels.get(ModuleName::Orders), AccessLevel::Edit);
        assert_eq!(levels.get(ModuleName::Files), AccessLevel::View);
    }

    #[test]
    fn unknown_resource_name_is_misconfigured() {
        assert_eq!("projects".parse::<Resource>().unwrap(), Resource::Projects);
        assert_eq!("orders".parse::<Resource>().unwrap(), Resource::ORDERS);

        let err = "timesheets".parse::<Resource>().unwrap_err();
        assert!(matches!(err, AuthzError::Misconfigured(_)));
    }

    #[test]
    fn unknown_module_key_fails_deserialization() {
        let ok: ModuleName = serde_json::from_str("\"suppliers\"").unwrap();
        assert_eq!(ok, ModuleName::Suppliers);
        assert!(serde_json::from_str::<ModuleName>("\"timesheets\"").is_err());
    }

    #[test]
    fn module_levels_serialize_as_map() {
        let mut levels = ModuleLevels::uniform(AccessLevel::View);
        levels.raise(ModuleName::Invoices, AccessLevel::Edit);
        let json = serde_json::to_value(levels).unwrap();
        assert_eq!(json["invoices"], "edit");
        assert_eq!(json["files"], "view");
    }
}
