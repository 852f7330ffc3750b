//! Connection-facing session gateway
//!
//! This module ties the transport to the room machinery. It keeps the
//! tunnel for every connected client, decodes [`IncomingMessage`] values
//! into engine operations, routes fired alarms back to their room, and
//! handles disconnects, including tearing the whole room down when the
//! host drops.
//!
//! The gateway is transport-agnostic: whoever drives it supplies the
//! tunnels and delivers scheduled alarms back through
//! [`SessionGateway::receive_alarm`] when their delay elapses.

use std::collections::HashMap;

use garde::Validate;
use web_time::Duration;

use crate::{
    bank::QuestionBank,
    constants::room::{DEFAULT_LEVEL, MAX_PLAYER_COUNT},
    engine::{AlarmMessage, IncomingMessage, UpdateMessage},
    names,
    registry::RoomRegistry,
    room::Settings,
    session::{Id, Tunnel},
};

/// Routes client messages to rooms and room events back to clients
///
/// One gateway serves every room; rooms never talk to the transport
/// directly, they reach clients through the tunnels the gateway holds.
pub struct SessionGateway<T> {
    registry: RoomRegistry,
    bank: QuestionBank,
    tunnels: HashMap<Id, T>,
}

impl<T: Tunnel + Clone> SessionGateway<T> {
    /// Creates a gateway serving questions from `bank`
    pub fn new(bank: QuestionBank) -> Self {
        Self {
            registry: RoomRegistry::new(),
            bank,
            tunnels: HashMap::new(),
        }
    }

    /// Registers a newly connected client's tunnel
    pub fn connect(&mut self, connection: Id, tunnel: T) {
        self.tunnels.insert(connection, tunnel);
    }

    /// Number of currently live rooms
    pub fn room_count(&self) -> usize {
        self.registry.len()
    }

    /// Sends a message to a single connection, if it is still reachable
    fn unicast(&self, connection: Id, message: &UpdateMessage) {
        if let Some(tunnel) = self.tunnels.get(&connection) {
            tunnel.send_message(message);
        }
    }

    /// Tells a connection the room code it used does not match a live room
    fn missing_room(&self, connection: Id) {
        self.unicast(
            connection,
            &UpdateMessage::ErrorMsg("ไม่พบห้องนี้".to_owned()),
        );
    }

    /// Handles a message received from a client
    ///
    /// Unknown room codes produce an error notice to the sender; every
    /// other misuse (wrong phase, non-host actor) is decided inside the
    /// room operations themselves.
    ///
    /// # Arguments
    ///
    /// * `connection` - The sending connection
    /// * `message` - The decoded message
    /// * `schedule_message` - Function to schedule alarms for later delivery
    pub fn receive_message<S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        connection: Id,
        message: IncomingMessage,
        schedule_message: S,
    ) {
        let tunnels = &self.tunnels;
        let tunnel_finder = |id: Id| tunnels.get(&id).cloned();

        match message {
            IncomingMessage::CreateRoom { host_name } => {
                let host_name = host_name
                    .and_then(|name| names::clean(&name).ok())
                    .unwrap_or_else(|| "Host".to_owned());

                let code = self.registry.create(connection, host_name.clone());

                self.unicast(
                    connection,
                    &UpdateMessage::RoomCreated {
                        room_code: code,
                        host_name,
                    },
                );
                if let Some(room) = self.registry.get(code) {
                    room.announce_roster(tunnel_finder);
                }
            }
            IncomingMessage::JoinRoom {
                room_code,
                player_name,
            } => {
                let Some(room) = self.registry.get_mut(room_code) else {
                    self.missing_room(connection);
                    return;
                };
                if room.player_count() >= MAX_PLAYER_COUNT {
                    self.unicast(
                        connection,
                        &UpdateMessage::ErrorMsg("ห้องเต็มแล้ว".to_owned()),
                    );
                    return;
                }

                let name = player_name
                    .and_then(|name| names::clean(&name).ok())
                    .unwrap_or_else(names::generated);

                room.add_player(connection, name);
                room.announce_roster(tunnel_finder);
            }
            IncomingMessage::SetSettings {
                room_code,
                products,
                level,
            } => {
                let settings = Settings {
                    products,
                    level: level.unwrap_or(DEFAULT_LEVEL),
                };
                if let Err(error) = settings.validate() {
                    self.unicast(connection, &UpdateMessage::ErrorMsg(error.to_string()));
                    return;
                }

                let Some(room) = self.registry.get_mut(room_code) else {
                    self.missing_room(connection);
                    return;
                };
                room.apply_settings(connection, &self.bank, settings, tunnel_finder);
            }
            IncomingMessage::StartGame { room_code } => {
                let Some(room) = self.registry.get_mut(room_code) else {
                    self.missing_room(connection);
                    return;
                };
                room.start_game(connection, schedule_message, tunnel_finder);
            }
            IncomingMessage::NextQuestion { room_code } => {
                let Some(room) = self.registry.get_mut(room_code) else {
                    self.missing_room(connection);
                    return;
                };
                if room.is_host(connection) {
                    room.advance_question(schedule_message, tunnel_finder);
                }
            }
            IncomingMessage::SubmitAnswer {
                room_code,
                q_id,
                answer,
            } => {
                let Some(room) = self.registry.get_mut(room_code) else {
                    self.missing_room(connection);
                    return;
                };
                room.submit_answer(connection, q_id, answer, tunnel_finder);
            }
            IncomingMessage::EndGame { room_code } => {
                let Some(room) = self.registry.get_mut(room_code) else {
                    self.missing_room(connection);
                    return;
                };
                room.end_game(connection, tunnel_finder);
            }
        }
    }

    /// Handles an alarm whose delay has elapsed
    ///
    /// Alarms for rooms that no longer exist are dropped; the room
    /// operation re-validates everything else.
    pub fn receive_alarm(&mut self, message: AlarmMessage) {
        let tunnels = &self.tunnels;
        let tunnel_finder = |id: Id| tunnels.get(&id).cloned();

        match message {
            AlarmMessage::Reveal {
                room_code,
                question_id,
            } => {
                if let Some(room) = self.registry.get(room_code) {
                    room.reveal(question_id, tunnel_finder);
                }
            }
        }
    }

    /// Handles a client disconnect
    ///
    /// Every live room is swept: a room hosted by the departing connection
    /// is torn down entirely (the remaining members are notified and the
    /// room is deleted), and a room it played in drops it from the roster
    /// and sees an updated roster. A connection can be in several rooms at
    /// once, so the sweep covers all of them. Remaining members' tunnels
    /// stay open; their connections remain usable for other rooms.
    pub fn disconnect(&mut self, connection: Id) {
        if let Some(tunnel) = self.tunnels.remove(&connection) {
            tunnel.close();
        }

        let tunnels = &self.tunnels;
        let tunnel_finder = |id: Id| tunnels.get(&id).cloned();

        for code in self.registry.codes() {
            let Some(room) = self.registry.get_mut(code) else {
                continue;
            };
            if room.is_host(connection) {
                room.announce_closed(tunnel_finder);
                self.registry.remove(code);
            } else if room.remove_player(connection).is_some() {
                room.announce_roster(tunnel_finder);
            }
        }
    }
}
