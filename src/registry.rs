//! Live room registry
//!
//! This module maps room codes to live [`Room`] instances. It owns room
//! creation (including code collision retry) and deletion; everything
//! between those two points goes through [`RoomRegistry::get_mut`].

use std::collections::HashMap;

use crate::{code::RoomCode, room::Room, session::Id};

/// The set of currently-live rooms, keyed by code
///
/// Codes are unique among live rooms only; once a room is removed its code
/// can be handed out again.
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
}

impl RoomRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room hosted by `host` and returns its code
    ///
    /// Codes are drawn at random until one not currently in use comes up.
    /// With a 36^6 code space and a handful of live rooms, retries are
    /// vanishingly rare.
    pub fn create(&mut self, host: Id, host_name: String) -> RoomCode {
        let code = loop {
            let candidate = RoomCode::random();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
        };
        self.rooms.insert(code, Room::new(code, host, host_name));
        code
    }

    /// Looks up a live room by code
    pub fn get(&self, code: RoomCode) -> Option<&Room> {
        self.rooms.get(&code)
    }

    /// Looks up a live room by code for mutation
    pub fn get_mut(&mut self, code: RoomCode) -> Option<&mut Room> {
        self.rooms.get_mut(&code)
    }

    /// Removes a room, returning it if it was live
    pub fn remove(&mut self, code: RoomCode) -> Option<Room> {
        self.rooms.remove(&code)
    }

    /// Codes of every live room, in no particular order
    ///
    /// Snapshot, so the caller may mutate the registry while iterating.
    pub fn codes(&self) -> Vec<RoomCode> {
        self.rooms.keys().copied().collect()
    }

    /// Number of live rooms
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no rooms are live
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_get() {
        let mut registry = RoomRegistry::new();
        let host = Id::new();

        let code = registry.create(host, "Host".to_owned());

        let room = registry.get(code).unwrap();
        assert_eq!(room.code(), code);
        assert!(room.is_host(host));
        assert_eq!(room.host_name(), "Host");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_unknown_code() {
        let registry = RoomRegistry::new();
        assert!(registry.get(RoomCode::random()).is_none());
    }

    #[test]
    fn test_codes_unique_among_live_rooms() {
        let mut registry = RoomRegistry::new();
        let codes: Vec<_> = (0..100)
            .map(|_| registry.create(Id::new(), "Host".to_owned()))
            .collect();

        let mut deduped = codes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), codes.len());
        assert_eq!(registry.len(), 100);
    }

    #[test]
    fn test_codes_snapshot_all_live_rooms() {
        let mut registry = RoomRegistry::new();
        let a = registry.create(Id::new(), "Host".to_owned());
        let b = registry.create(Id::new(), "Host".to_owned());

        let mut codes = registry.codes();
        codes.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(codes, expected);
    }

    #[test]
    fn test_remove_frees_the_code() {
        let mut registry = RoomRegistry::new();
        let code = registry.create(Id::new(), "Host".to_owned());

        let removed = registry.remove(code).unwrap();
        assert_eq!(removed.code(), code);
        assert!(registry.get(code).is_none());
        assert!(registry.is_empty());
        assert!(registry.remove(code).is_none());
    }
}
