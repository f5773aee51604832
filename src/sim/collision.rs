//! Collision semantics and query results
//!
//! Queries never fail: "nothing there" is a result with `hit == false`.

use serde::{Deserialize, Serialize};

use super::object::ObjectRef;

/// What an overlap with an object means, ordered by blocking strength
///
/// The derived `Ord` is the reduction order used by every query, so a single
/// `BlockAll` overlap dominates any number of weaker ones.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u32", into = "u32")]
#[repr(u32)]
pub enum CollisionType {
    /// Overlaps are ignored
    #[default]
    NoCollision = 0,
    /// Overlaps are reported but never block
    EventsOnly = 1,
    /// Only AI queries care about this object
    AiObstacleMarker = 2,
    /// Blocks dynamic movement
    BlockAll = 3,
}

impl CollisionType {
    pub const ALL: [CollisionType; 4] = [
        CollisionType::NoCollision,
        CollisionType::EventsOnly,
        CollisionType::AiObstacleMarker,
        CollisionType::BlockAll,
    ];

    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Human readable name for editor pickers
    pub fn label(self) -> &'static str {
        match self {
            CollisionType::NoCollision => "No Collision",
            CollisionType::EventsOnly => "Events Only",
            CollisionType::AiObstacleMarker => "AI Obstacle Marker",
            CollisionType::BlockAll => "Block All",
        }
    }
}

impl TryFrom<u32> for CollisionType {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or_else(|| format!("unknown collision type {value}"))
    }
}

impl From<CollisionType> for u32 {
    fn from(value: CollisionType) -> Self {
        value as u32
    }
}

/// Result of an area or ray query
#[derive(Clone)]
pub struct CollisionHit {
    /// Anything overlapped at all
    pub hit: bool,
    /// Walkable flag of the deepest object hit (ray casts: any object hit)
    pub walkable: bool,
    /// Everything hit; ray casts order this by distance from the ray start
    pub objects: Vec<ObjectRef>,
    /// Strongest collision type among the objects hit
    pub max_collider_status: CollisionType,
}

impl CollisionHit {
    pub fn miss() -> Self {
        Self {
            hit: false,
            walkable: false,
            objects: Vec::new(),
            max_collider_status: CollisionType::NoCollision,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.max_collider_status == CollisionType::BlockAll
    }

    /// Fold one more object into the result
    pub(crate) fn accumulate(&mut self, entry: &ObjectRef) {
        self.hit = true;
        self.max_collider_status = self.max_collider_status.max(entry.body.collision_type());
        self.objects.push(entry.clone());
    }
}

impl Default for CollisionHit {
    fn default() -> Self {
        Self::miss()
    }
}

impl std::fmt::Debug for CollisionHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionHit")
            .field("hit", &self.hit)
            .field("walkable", &self.walkable)
            .field("objects", &self.objects.iter().map(ObjectRef::id).collect::<Vec<_>>())
            .field("max_collider_status", &self.max_collider_status)
            .finish()
    }
}

/// Result of a point query: at most one object
#[derive(Clone, Default)]
pub struct SimpleHit {
    pub hit: bool,
    pub walkable: bool,
    pub object: Option<ObjectRef>,
    pub collision_type: CollisionType,
}

impl SimpleHit {
    pub fn miss() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for SimpleHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleHit")
            .field("hit", &self.hit)
            .field("walkable", &self.walkable)
            .field("object", &self.object.as_ref().map(ObjectRef::id))
            .field("collision_type", &self.collision_type)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(CollisionType::NoCollision < CollisionType::EventsOnly);
        assert!(CollisionType::EventsOnly < CollisionType::AiObstacleMarker);
        assert!(CollisionType::AiObstacleMarker < CollisionType::BlockAll);
    }

    #[test]
    fn test_u32_mapping() {
        for kind in CollisionType::ALL {
            assert_eq!(CollisionType::from_u32(kind as u32), Some(kind));
        }
        assert_eq!(CollisionType::from_u32(4), None);
        assert!(serde_json::from_str::<CollisionType>("3").is_ok());
        assert!(serde_json::from_str::<CollisionType>("7").is_err());
    }

    #[test]
    fn test_miss_is_empty() {
        let miss = CollisionHit::miss();
        assert!(!miss.hit);
        assert!(!miss.is_blocking());
        assert!(miss.objects.is_empty());
    }
}
