//! # roster-core: data model for group membership boards
//!
//! Actors (people, locations, …) and the groups they belong to, plus the
//! two pure derivations every board is built on:
//!
//! - [`partition`]: split a roster into members / available candidates
//! - [`filter`]: case-insensitive display-name matching for the
//!   available list
//!
//! Actors are owned by the roster collaborator and groups by the remote
//! store. Nothing in this crate mutates either.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod filter;
pub mod partition;

pub use filter::{matches, visible};
pub use partition::{partition, MemberOrder, Partition};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Actor type tag is empty")]
    EmptyActorType,
}

// ───────────────────────────────────────────────────────────────────
// Identifiers
// ───────────────────────────────────────────────────────────────────

/// Stable, opaque actor identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stable, opaque group identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub Uuid);

impl GroupId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ───────────────────────────────────────────────────────────────────
// Actor
// ───────────────────────────────────────────────────────────────────

/// Kind of actor. Serialized as an upper-case tag (`"HUMAN"`, `"LOCATION"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActorType {
    Human,
    Location,
    Other(String),
}

impl ActorType {
    /// Whether an actor of this type may be offered in the available list.
    ///
    /// Locations never are. A location that is already a member stays a
    /// member.
    pub fn can_be_available(&self) -> bool {
        !matches!(self, ActorType::Location)
    }

    pub fn as_str(&self) -> &str {
        match self {
            ActorType::Human => "HUMAN",
            ActorType::Location => "LOCATION",
            ActorType::Other(tag) => tag,
        }
    }
}

impl FromStr for ActorType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_uppercase();
        match tag.as_str() {
            "" => Err(ModelError::EmptyActorType),
            "HUMAN" => Ok(ActorType::Human),
            "LOCATION" => Ok(ActorType::Location),
            _ => Ok(ActorType::Other(tag)),
        }
    }
}

impl TryFrom<String> for ActorType {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActorType> for String {
    fn from(value: ActorType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person or location that can belong to a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub id: ActorId,
    #[serde(rename = "type")]
    pub actor_type: ActorType,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl Actor {
    pub fn human(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            actor_type: ActorType::Human,
            first_name: Some(first_name.into()),
            last_name: Some(last_name.into()),
            name: None,
            photo: None,
        }
    }

    pub fn location(name: impl Into<String>) -> Self {
        Self::other(ActorType::Location, name)
    }

    pub fn other(actor_type: ActorType, name: impl Into<String>) -> Self {
        Self {
            id: ActorId::new(),
            actor_type,
            first_name: None,
            last_name: None,
            name: Some(name.into()),
            photo: None,
        }
    }

    /// Replace the generated id (fixtures and tests).
    pub fn with_id(mut self, id: ActorId) -> Self {
        self.id = id;
        self
    }

    pub fn with_photo(mut self, uri: impl Into<String>) -> Self {
        self.photo = Some(uri.into());
        self
    }

    /// Name shown in list rows and matched by the filter.
    ///
    /// Humans render as `"first last"` (trimmed), everything else uses
    /// `name`. Missing fields count as empty strings.
    pub fn display_name(&self) -> String {
        match self.actor_type {
            ActorType::Human => {
                let first = self.first_name.as_deref().unwrap_or("");
                let last = self.last_name.as_deref().unwrap_or("");
                format!("{first} {last}").trim().to_string()
            }
            _ => self.name.clone().unwrap_or_default(),
        }
    }
}

// ───────────────────────────────────────────────────────────────────
// Group
// ───────────────────────────────────────────────────────────────────

/// A named group with an ordered, duplicate-free member id list.
///
/// `members` may reference actors missing from the roster; consumers drop
/// those at partition time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub members: Vec<ActorId>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            description: String::new(),
            members: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_members(mut self, members: Vec<ActorId>) -> Self {
        self.members = members;
        self
    }

    pub fn has_member(&self, id: ActorId) -> bool {
        self.members.contains(&id)
    }

    pub fn member_set(&self) -> rustc_hash::FxHashSet<ActorId> {
        self.members.iter().copied().collect()
    }
}
