//! Room state and data model
//!
//! This module defines the per-session state: the host, the player roster,
//! the configured settings, the selected question list, and the lifecycle
//! phase. All mutation goes through the engine operations in
//! [`crate::engine`]; this module only provides the data model and the
//! small accessors those operations are built from.

use std::collections::HashMap;

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
    bank::{Question, QuestionId},
    code::RoomCode,
    constants::room::DEFAULT_LEVEL,
    session::Id,
};

/// The lifecycle phase of a room
///
/// A room only ever moves forward: `Idle` to `Running` to `Finished`.
/// `Finished` is terminal; a finished room accepts no further mutation
/// and is eligible for deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Created, waiting for settings and players
    Idle,
    /// Questions are being presented
    Running,
    /// The game ended, naturally or by the host
    Finished,
}

/// A player's recorded submission for one question
#[derive(Debug, Clone)]
pub struct AnswerRecord {
    /// The value the player submitted
    pub answer: String,
    /// Whether the submission matched the correct answer
    pub correct: bool,
}

/// A player in a room
#[derive(Debug, Clone)]
pub struct Player {
    /// The player's display name
    pub name: String,
    /// Cumulative score; only ever increases
    pub score: u64,
    /// Submissions for the currently active question, keyed by question ID;
    /// cleared each time a new question is presented
    pub answered: HashMap<QuestionId, AnswerRecord>,
}

impl Player {
    /// Creates a player with a zero score
    pub fn new(name: String) -> Self {
        Self {
            name,
            score: 0,
            answered: HashMap::new(),
        }
    }
}

/// Host-chosen session settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Product names whose questions make up the session
    #[garde(skip)]
    pub products: Vec<String>,
    /// Maximum difficulty level of included questions
    #[garde(range(min = 1))]
    pub level: u8,
}

impl Default for Settings {
    /// No products selected, level 1
    fn default() -> Self {
        Self {
            products: Vec::new(),
            level: DEFAULT_LEVEL,
        }
    }
}

/// A name-and-score snapshot of one player, as sent to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerEntry {
    /// The player's display name
    pub name: String,
    /// The player's current score
    pub score: u64,
}

/// One independent quiz session
///
/// The host connection that created the room is its sole authority over
/// settings, start, advance, and end; host identity never changes.
#[derive(Debug)]
pub struct Room {
    /// The room's code in the registry
    code: RoomCode,
    /// Connection that created the room
    host: Id,
    /// The host's display name
    host_name: String,
    /// Player roster keyed by connection
    players: HashMap<Id, Player>,
    /// Current session settings
    settings: Settings,
    /// Questions selected for this session, fixed once computed
    questions: Vec<Question>,
    /// Index of the active question; `None` before the first question
    current: Option<usize>,
    /// Lifecycle phase
    phase: Phase,
}

impl Room {
    /// Creates an idle room owned by `host`
    pub fn new(code: RoomCode, host: Id, host_name: String) -> Self {
        Self {
            code,
            host,
            host_name,
            players: HashMap::new(),
            settings: Settings::default(),
            questions: Vec::new(),
            current: None,
            phase: Phase::Idle,
        }
    }

    /// The room's code
    pub fn code(&self) -> RoomCode {
        self.code
    }

    /// The host's display name
    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    /// Whether `connection` is the room's host
    pub fn is_host(&self, connection: Id) -> bool {
        self.host == connection
    }

    /// The current lifecycle phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The current session settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Number of players currently in the room
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Looks up a player by connection
    pub fn player(&self, connection: Id) -> Option<&Player> {
        self.players.get(&connection)
    }

    /// Adds a player to the roster
    pub fn add_player(&mut self, connection: Id, name: String) {
        self.players.insert(connection, Player::new(name));
    }

    /// Removes a player from the roster, returning it if present
    pub fn remove_player(&mut self, connection: Id) -> Option<Player> {
        self.players.remove(&connection)
    }

    /// Connections of everyone in the room, host included
    pub fn member_connections(&self) -> Vec<Id> {
        std::iter::once(self.host)
            .chain(self.players.keys().copied())
            .collect()
    }

    /// The question currently accepting answers, if any
    pub fn active_question(&self) -> Option<&Question> {
        if self.phase != Phase::Running {
            return None;
        }
        self.questions.get(self.current?)
    }

    /// Snapshot of all players' names and scores, highest score first
    pub fn leaderboard(&self) -> Vec<PlayerEntry> {
        self.players
            .values()
            .map(|player| PlayerEntry {
                name: player.name.clone(),
                score: player.score,
            })
            .sorted_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)))
            .collect_vec()
    }

    // Crate-internal accessors for the engine operations.

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub(crate) fn set_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    pub(crate) fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub(crate) fn current(&self) -> Option<usize> {
        self.current
    }

    pub(crate) fn set_current(&mut self, current: Option<usize>) {
        self.current = current;
    }

    pub(crate) fn player_mut(&mut self, connection: Id) -> Option<&mut Player> {
        self.players.get_mut(&connection)
    }

    pub(crate) fn clear_answers(&mut self) {
        for player in self.players.values_mut() {
            player.answered.clear();
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn test_room() -> (Room, Id) {
        let host = Id::new();
        (Room::new(RoomCode::random(), host, "Host".to_owned()), host)
    }

    #[test]
    fn test_new_room_is_idle() {
        let (room, host) = test_room();
        assert_eq!(room.phase(), Phase::Idle);
        assert!(room.is_host(host));
        assert!(!room.is_host(Id::new()));
        assert_eq!(room.current(), None);
        assert!(room.active_question().is_none());
    }

    #[test]
    fn test_add_and_remove_player() {
        let (mut room, _) = test_room();
        let player = Id::new();

        room.add_player(player, "A".to_owned());
        assert_eq!(room.player_count(), 1);
        assert_eq!(room.player(player).unwrap().name, "A");

        let removed = room.remove_player(player).unwrap();
        assert_eq!(removed.name, "A");
        assert_eq!(room.player_count(), 0);
        assert!(room.remove_player(player).is_none());
    }

    #[test]
    fn test_member_connections_include_host() {
        let (mut room, host) = test_room();
        let player = Id::new();
        room.add_player(player, "A".to_owned());

        let members = room.member_connections();
        assert_eq!(members.len(), 2);
        assert!(members.contains(&host));
        assert!(members.contains(&player));
    }

    #[test]
    fn test_leaderboard_sorted_by_score_descending() {
        let (mut room, _) = test_room();
        let a = Id::new();
        let b = Id::new();
        room.add_player(a, "A".to_owned());
        room.add_player(b, "B".to_owned());
        room.player_mut(b).unwrap().score = 100;

        let board = room.leaderboard();
        assert_eq!(board[0], PlayerEntry { name: "B".to_owned(), score: 100 });
        assert_eq!(board[1], PlayerEntry { name: "A".to_owned(), score: 0 });
    }

    #[test]
    fn test_settings_default_level() {
        assert_eq!(Settings::default().level, DEFAULT_LEVEL);
        assert!(Settings::default().products.is_empty());
    }

    #[test]
    fn test_settings_validation_rejects_level_zero() {
        use garde::Validate;

        let settings = Settings {
            products: Vec::new(),
            level: 0,
        };
        assert!(settings.validate().is_err());
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_active_question_requires_running_phase() {
        let (mut room, _) = test_room();
        room.set_questions(crate::bank::QuestionBank::builtin().select(
            &["Money Saver 14/6".to_owned()],
            1,
        ));
        room.set_current(Some(0));
        assert!(room.active_question().is_none());

        room.set_phase(Phase::Running);
        assert!(room.active_question().is_some());

        room.set_phase(Phase::Finished);
        assert!(room.active_question().is_none());
    }
}
