//! Room state machine operations
//!
//! This module contains the engine that drives a quiz session: applying
//! settings, starting the game, advancing through questions, scoring
//! answers, ending the game, and the deferred answer reveal. Every
//! operation validates the acting connection, mutates the [`Room`] state
//! machine, and emits outbound events through tunnel-finder closures, the
//! same communication seam the rest of the crate uses.
//!
//! Host-only operations invoked by a non-host connection are silently
//! ignored; a stale or malicious client is indistinguishable from a
//! legitimate one, so there is nothing useful to report back.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use web_time::Duration;

use crate::{
    bank::{QuestionBank, QuestionId},
    code::RoomCode,
    constants::question::{POINTS_PER_CORRECT, REVEAL_GRACE_MILLIS, TIME_LIMIT_SECONDS},
    room::{AnswerRecord, Phase, PlayerEntry, Room, Settings},
    session::{Id, Tunnel},
};

/// Messages received from clients
///
/// Variant and field names follow the wire protocol, which uses camelCase
/// event names carried as JSON.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum IncomingMessage {
    /// Create a new room with the sender as host
    CreateRoom {
        /// Requested host display name
        host_name: Option<String>,
    },
    /// Join an existing room as a player
    JoinRoom {
        /// Code of the room to join
        room_code: RoomCode,
        /// Requested player display name
        player_name: Option<String>,
    },
    /// (HOST ONLY) Choose products and difficulty for the session
    SetSettings {
        /// Code of the target room
        room_code: RoomCode,
        /// Selected product names; duplicates are kept
        products: Vec<String>,
        /// Maximum difficulty level, defaulting to 1
        level: Option<u8>,
    },
    /// (HOST ONLY) Start the game
    StartGame {
        /// Code of the target room
        room_code: RoomCode,
    },
    /// (HOST ONLY) Advance to the next question
    NextQuestion {
        /// Code of the target room
        room_code: RoomCode,
    },
    /// Submit an answer to the active question
    SubmitAnswer {
        /// Code of the target room
        room_code: RoomCode,
        /// Identifier of the question being answered
        #[serde(rename = "qId")]
        q_id: QuestionId,
        /// The chosen answer value
        answer: String,
    },
    /// (HOST ONLY) End the game early
    EndGame {
        /// Code of the target room
        room_code: RoomCode,
    },
}

/// Events sent to clients
///
/// Whether an event is broadcast to the whole room or unicast to one
/// connection is decided by the operation that emits it.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum UpdateMessage {
    /// (TO CREATOR) The room was created
    RoomCreated {
        /// Code for players to join with
        room_code: RoomCode,
        /// The host's display name
        host_name: String,
    },
    /// The roster changed
    RoomUpdate {
        /// Code of the room
        room_code: RoomCode,
        /// The host's display name
        host_name: String,
        /// Current players with their scores
        players: Vec<PlayerEntry>,
    },
    /// Settings were applied and the question list rebuilt
    SettingsSaved {
        /// Selected product names
        products: Vec<String>,
        /// Maximum difficulty level
        level: u8,
        /// Number of questions selected
        total_questions: usize,
    },
    /// The game started
    GameStarted,
    /// A new question is being presented
    Question {
        /// Identifier of the question
        #[serde(rename = "qId")]
        q_id: QuestionId,
        /// 1-based position of this question
        index: usize,
        /// Total number of questions this session
        total: usize,
        /// The question text
        #[serde(rename = "q")]
        question: String,
        /// The answer options
        options: Vec<String>,
        /// Time players have to answer
        #[serde_as(as = "serde_with::DurationSeconds<u64>")]
        timer: Duration,
    },
    /// The answer window closed and the correct answer is revealed
    Reveal {
        /// Identifier of the revealed question
        #[serde(rename = "qId")]
        q_id: QuestionId,
        /// The correct answer value
        correct_answer: String,
        /// Current standings
        leaderboard: Vec<PlayerEntry>,
    },
    /// Standings changed after a scored answer
    Leaderboard {
        /// Current standings
        players: Vec<PlayerEntry>,
    },
    /// (TO SUBMITTER) Verdict on a submitted answer
    AnswerResult {
        /// Whether the submission was correct
        correct: bool,
        /// The correct answer value
        correct_answer: String,
    },
    /// The game ended
    GameEnded {
        /// Final standings
        leaderboard: Vec<PlayerEntry>,
    },
    /// (UNICAST) Human-readable failure notice
    ErrorMsg(String),
}

impl UpdateMessage {
    /// Converts the message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Messages scheduled to fire after a delay
///
/// Alarms carry the room code and question ID they were scheduled for, not
/// references to the state itself; whoever routes them back re-fetches the
/// room and re-validates before acting, so a fired alarm for a room that
/// was deleted or has moved on is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Reveal the correct answer once the answer window has elapsed
    Reveal {
        /// Code of the room the question belongs to
        room_code: RoomCode,
        /// The question that was active when the alarm was scheduled
        question_id: QuestionId,
    },
}

/// Sends a message to a single connection, if it is still reachable
fn send_to<T: Tunnel, F: Fn(Id) -> Option<T>>(
    tunnel_finder: &F,
    connection: Id,
    message: &UpdateMessage,
) {
    if let Some(tunnel) = tunnel_finder(connection) {
        tunnel.send_message(message);
    }
}

impl Room {
    /// Sends a message to every member of the room, host included
    fn broadcast<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &self,
        message: &UpdateMessage,
        tunnel_finder: &F,
    ) {
        for connection in self.member_connections() {
            send_to(tunnel_finder, connection, message);
        }
    }

    /// Broadcasts the current roster to the room
    ///
    /// Sent whenever a player joins or leaves.
    pub fn announce_roster<T: Tunnel, F: Fn(Id) -> Option<T>>(&self, tunnel_finder: F) {
        self.broadcast(
            &UpdateMessage::RoomUpdate {
                room_code: self.code(),
                host_name: self.host_name().to_owned(),
                players: self.leaderboard(),
            },
            &tunnel_finder,
        );
    }

    /// Notifies the room that it is closing because the host left
    ///
    /// Sent to the remaining members during teardown; the room itself is
    /// deleted by the caller immediately afterwards.
    pub fn announce_closed<T: Tunnel, F: Fn(Id) -> Option<T>>(&self, tunnel_finder: F) {
        self.broadcast(
            &UpdateMessage::ErrorMsg("Host disconnected — ห้องปิดการใช้งาน".to_owned()),
            &tunnel_finder,
        );
    }

    /// Applies session settings and rebuilds the question list
    ///
    /// Selects every chosen product's questions with level at most the
    /// requested level, in product order, then shuffles the combined list
    /// so repeated configuration yields a fresh random order. Resets the
    /// question cursor. An empty selection is accepted here and only
    /// rejected at [`Room::start_game`].
    ///
    /// # Arguments
    ///
    /// * `actor` - Connection requesting the change; ignored unless host
    /// * `bank` - The question bank to select from
    /// * `settings` - Validated settings to apply
    /// * `tunnel_finder` - Function to find tunnels for room members
    pub fn apply_settings<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &mut self,
        actor: Id,
        bank: &QuestionBank,
        settings: Settings,
        tunnel_finder: F,
    ) {
        if !self.is_host(actor) || self.phase() == Phase::Finished {
            return;
        }

        let mut questions = bank.select(&settings.products, settings.level);
        fastrand::shuffle(&mut questions);

        let total_questions = questions.len();
        self.set_questions(questions);
        self.set_current(None);

        let message = UpdateMessage::SettingsSaved {
            products: settings.products.clone(),
            level: settings.level,
            total_questions,
        };
        self.set_settings(settings);
        self.broadcast(&message, &tunnel_finder);
    }

    /// Starts the game and presents the first question
    ///
    /// Fails with an error notice to the host alone if no questions are
    /// selected; the rest of the room never learns the attempt happened.
    ///
    /// # Arguments
    ///
    /// * `actor` - Connection requesting the start; ignored unless host
    /// * `schedule_message` - Function to schedule the deferred reveal
    /// * `tunnel_finder` - Function to find tunnels for room members
    pub fn start_game<T: Tunnel, F: Fn(Id) -> Option<T>, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        actor: Id,
        schedule_message: S,
        tunnel_finder: F,
    ) {
        if !self.is_host(actor) || self.phase() == Phase::Finished {
            return;
        }
        if self.questions().is_empty() {
            send_to(
                &tunnel_finder,
                actor,
                &UpdateMessage::ErrorMsg(
                    "ไม่มีคำถามในห้องนี้ — กรุณาเลือกสินค้า/ระดับความยาก".to_owned(),
                ),
            );
            return;
        }

        self.set_phase(Phase::Running);
        self.set_current(None);
        self.broadcast(&UpdateMessage::GameStarted, &tunnel_finder);
        self.advance_question(schedule_message, tunnel_finder);
    }

    /// Advances to the next question, or finishes the game
    ///
    /// Only meaningful while the game is running; an idle or finished room
    /// ignores the call. Moving past the last question transitions the
    /// room to `Finished` and broadcasts the final standings. Otherwise
    /// every player's answered set is cleared, the question is broadcast,
    /// and a reveal alarm is scheduled for this exact question.
    ///
    /// # Arguments
    ///
    /// * `schedule_message` - Function to schedule the deferred reveal
    /// * `tunnel_finder` - Function to find tunnels for room members
    pub fn advance_question<T: Tunnel, F: Fn(Id) -> Option<T>, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        mut schedule_message: S,
        tunnel_finder: F,
    ) {
        if self.phase() != Phase::Running {
            return;
        }

        let next = self.current().map_or(0, |index| index + 1);
        self.set_current(Some(next));

        if next >= self.questions().len() {
            self.set_phase(Phase::Finished);
            self.broadcast(
                &UpdateMessage::GameEnded {
                    leaderboard: self.leaderboard(),
                },
                &tunnel_finder,
            );
            return;
        }

        self.clear_answers();

        let question = &self.questions()[next];
        let message = UpdateMessage::Question {
            q_id: question.id,
            index: next + 1,
            total: self.questions().len(),
            question: question.prompt.clone(),
            options: question.options.clone(),
            timer: Duration::from_secs(TIME_LIMIT_SECONDS),
        };
        let alarm = AlarmMessage::Reveal {
            room_code: self.code(),
            question_id: question.id,
        };
        self.broadcast(&message, &tunnel_finder);

        // Reveal slightly after the client-side countdown ends.
        schedule_message(
            alarm,
            Duration::from_secs(TIME_LIMIT_SECONDS) + Duration::from_millis(REVEAL_GRACE_MILLIS),
        );
    }

    /// Scores a player's answer to the active question
    ///
    /// Submissions from unknown connections, for a non-active question, or
    /// when no question is active are dropped without a reply; they
    /// indicate a race, not a user-correctable condition. Scoring is
    /// idempotent per player and question: the first submission is
    /// authoritative, and a repeat only re-sends the recorded verdict so
    /// the client does not hang waiting for an acknowledgment.
    ///
    /// # Arguments
    ///
    /// * `actor` - Connection submitting the answer
    /// * `question_id` - The question the client believes is active
    /// * `answer` - The chosen answer value
    /// * `tunnel_finder` - Function to find tunnels for room members
    pub fn submit_answer<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &mut self,
        actor: Id,
        question_id: QuestionId,
        answer: String,
        tunnel_finder: F,
    ) {
        let correct_answer = match self.active_question() {
            Some(question) if question.id == question_id => question.answer.clone(),
            _ => return,
        };

        let Some(player) = self.player_mut(actor) else {
            return;
        };

        if let Some(record) = player.answered.get(&question_id) {
            let repeat_ack = UpdateMessage::AnswerResult {
                correct: record.correct,
                correct_answer,
            };
            send_to(&tunnel_finder, actor, &repeat_ack);
            return;
        }

        let correct = answer == correct_answer;
        if correct {
            player.score += POINTS_PER_CORRECT;
        }
        player.answered.insert(question_id, AnswerRecord { answer, correct });

        self.broadcast(
            &UpdateMessage::Leaderboard {
                players: self.leaderboard(),
            },
            &tunnel_finder,
        );
        send_to(
            &tunnel_finder,
            actor,
            &UpdateMessage::AnswerResult {
                correct,
                correct_answer,
            },
        );
    }

    /// Ends the game, regardless of remaining questions
    ///
    /// # Arguments
    ///
    /// * `actor` - Connection requesting the end; ignored unless host
    /// * `tunnel_finder` - Function to find tunnels for room members
    pub fn end_game<T: Tunnel, F: Fn(Id) -> Option<T>>(&mut self, actor: Id, tunnel_finder: F) {
        if !self.is_host(actor) || self.phase() == Phase::Finished {
            return;
        }

        self.set_phase(Phase::Finished);
        self.broadcast(
            &UpdateMessage::GameEnded {
                leaderboard: self.leaderboard(),
            },
            &tunnel_finder,
        );
    }

    /// Reveals the correct answer for a question whose alarm fired
    ///
    /// Validity is checked at fire time: if the question is no longer the
    /// active one, because the host advanced, ended the game, or the game
    /// finished naturally, nothing is emitted. Revealing never advances
    /// the question cursor; that stays host-driven.
    ///
    /// # Arguments
    ///
    /// * `question_id` - The question the alarm was scheduled for
    /// * `tunnel_finder` - Function to find tunnels for room members
    pub fn reveal<T: Tunnel, F: Fn(Id) -> Option<T>>(
        &self,
        question_id: QuestionId,
        tunnel_finder: F,
    ) {
        let Some(question) = self.active_question() else {
            return;
        };
        if question.id != question_id {
            return;
        }

        self.broadcast(
            &UpdateMessage::Reveal {
                q_id: question.id,
                correct_answer: question.answer.clone(),
                leaderboard: self.leaderboard(),
            },
            &tunnel_finder,
        );
    }
}
