// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-channel match coordination
//!
//! One [`GameArena`] serves one chat channel. It owns the pending challenge,
//! the AI offer and the running session, and serializes every mutation
//! through a single mutex so near-simultaneous commands, timer firings and
//! AI moves can never race each other. Background waits (challenge expiry,
//! AI thinking, move-timeout polling, overlay teardown) run as spawned tasks
//! that re-validate the state generation when they wake, so a stale timer is
//! a detectable no-op.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use gridduel_core::{heuristic, notation, GameError, Mark, Move, MoveOutcome, Variant};

use crate::command::{parse_command, Command, User};
use crate::config::ArenaConfig;
use crate::overlay::{self, OverlaySink, OverlaySnapshot};
use crate::session::Session;

/// Identifier reported to the overlay in snapshots and events
pub const GAME_ID: &str = "gridduel";

/// Events emitted by the arena
#[derive(Debug, Clone)]
pub enum ArenaEvent {
    /// Outbound chat text for the transport to deliver
    Chat(String),
}

/// A pending invitation to start a match
#[derive(Debug, Clone)]
pub struct Challenge {
    pub kind: ChallengeKind,
    pub challenger: String,
    pub issued_at: Instant,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeKind {
    /// Anyone may accept
    Open,
    /// Only the named target may accept
    Direct { target: String },
}

/// The follow-up offer to play the AI after a challenge expired
#[derive(Debug, Clone)]
pub struct AiOffer {
    pub offered_to: String,
    pub deadline: Instant,
    generation: u64,
}

/// Mutable channel state; only ever touched with the arena mutex held
struct ChannelState {
    challenge: Option<Challenge>,
    ai_offer: Option<AiOffer>,
    session: Option<Session>,
    /// Bumped on every state transition; stale timers check it and bail
    generation: u64,
    /// Handle of the running move-timeout supervisor, if any
    move_timer: Option<JoinHandle<()>>,
}

struct ArenaInner {
    channel: String,
    cfg: ArenaConfig,
    state: Mutex<ChannelState>,
    events_tx: broadcast::Sender<ArenaEvent>,
    /// Keep a receiver alive to prevent channel closure
    _events_rx: broadcast::Receiver<ArenaEvent>,
    overlay: Arc<dyn OverlaySink>,
}

/// Handle to one channel's arena; cheap to clone, all clones share state
#[derive(Clone)]
pub struct GameArena {
    inner: Arc<ArenaInner>,
}

impl GameArena {
    pub fn new(channel: impl Into<String>, cfg: ArenaConfig, overlay: Arc<dyn OverlaySink>) -> Self {
        let (events_tx, events_rx) = broadcast::channel(100);
        Self {
            inner: Arc::new(ArenaInner {
                channel: channel.into(),
                cfg,
                state: Mutex::new(ChannelState {
                    challenge: None,
                    ai_offer: None,
                    session: None,
                    generation: 0,
                    move_timer: None,
                }),
                events_tx,
                _events_rx: events_rx,
                overlay,
            }),
        }
    }

    /// Get a receiver for arena events
    pub fn subscribe(&self) -> broadcast::Receiver<ArenaEvent> {
        self.inner.events_tx.subscribe()
    }

    /// Parse and dispatch one chat line; unknown input is ignored
    pub async fn handle_chat(&self, user: &User, line: &str) {
        let Some(command) = parse_command(line) else {
            return;
        };
        match command {
            Command::Challenge { target } => self.issue_challenge(user, target.as_deref()).await,
            Command::Accept => self.accept_challenge(user).await,
            Command::AcceptAi => self.accept_ai_offer(user).await,
            Command::Move { coord } => self.make_move(user, coord.as_deref()).await,
            Command::Stop => self.stop(user).await,
        }
    }

    /// Register a new challenge and arm its expiry timer
    pub async fn issue_challenge(&self, user: &User, target: Option<&str>) {
        let mut st = self.inner.state.lock().await;
        if st.session.as_ref().is_some_and(|s| s.active()) {
            self.say("❌ A game is already running.");
            return;
        }
        if st.challenge.is_some() {
            self.say("⚠️ A challenge is already pending!");
            return;
        }
        // A finished session may still be in its overlay grace window;
        // tear it down now so the challenge has the channel to itself.
        if st.session.take().is_some() {
            self.cancel_move_timer(&mut st);
            self.clear_overlay();
        }

        st.generation += 1;
        let generation = st.generation;
        let kind = match target {
            Some(name) => {
                self.say(format!(
                    "🎯 {} challenges {}! Type !accept to take it.",
                    user.name, name
                ));
                ChallengeKind::Direct {
                    target: name.to_string(),
                }
            }
            None => {
                self.say(format!(
                    "📢 Open challenge from {}! Type !accept to play.",
                    user.name
                ));
                ChallengeKind::Open
            }
        };
        tracing::info!(
            channel = %self.inner.channel,
            challenger = %user.name,
            ?kind,
            "challenge issued"
        );
        st.challenge = Some(Challenge {
            kind,
            challenger: user.name.clone(),
            issued_at: Instant::now(),
            generation,
        });
        drop(st);

        let arena = self.clone();
        let timeout = self.inner.cfg.challenge_timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            arena.expire_challenge(generation).await;
        });
    }

    /// Accept the pending challenge and start a match
    pub async fn accept_challenge(&self, user: &User) {
        let mut st = self.inner.state.lock().await;
        let Some(challenge) = st.challenge.take() else {
            self.say("❌ There is no pending challenge.");
            return;
        };
        if let ChallengeKind::Direct { target } = &challenge.kind {
            if !target.eq_ignore_ascii_case(&user.name) {
                self.say("❌ That challenge is not meant for you.");
                st.challenge = Some(challenge);
                return;
            }
        }
        self.start_session(&mut st, challenge.challenger, user.name.clone(), false);
    }

    /// Accept the pending AI offer; only the original challenger may, and
    /// only before the deadline. Anything else is silently ignored.
    pub async fn accept_ai_offer(&self, user: &User) {
        let mut st = self.inner.state.lock().await;
        let Some(offer) = st.ai_offer.as_ref() else {
            return;
        };
        if !offer.offered_to.eq_ignore_ascii_case(&user.name) {
            return;
        }
        if Instant::now() >= offer.deadline {
            self.say("⌛ The AI offer expired.");
            st.ai_offer = None;
            return;
        }
        let challenger = offer.offered_to.clone();
        let opponent = self.inner.cfg.ai_name.clone();
        self.start_session(&mut st, challenger, opponent, true);
    }

    /// Apply a move for `user`. Reports a missing game and illegal moves;
    /// out-of-turn input is dropped silently to keep chat noise down.
    pub async fn make_move(&self, user: &User, coord: Option<&str>) {
        let mut st = self.inner.state.lock().await;
        let generation = st.generation;
        let Some(session) = st.session.as_mut() else {
            self.say("❌ No game is running.");
            return;
        };
        if !session.active() {
            self.say("❌ No game is running.");
            return;
        }
        let variant = session.board().variant();
        let Some(coord) = coord else {
            self.say(usage(variant));
            return;
        };
        if !session.is_turn(&user.name) {
            return;
        }
        let mv = match notation::parse_move(variant, coord) {
            Ok(mv) => mv,
            Err(err) => {
                self.say(format!("❌ {err}. {}", usage(variant)));
                return;
            }
        };
        match self.apply_session_move(session, generation, mv) {
            Ok(outcome) => self.after_move(&mut st, outcome),
            Err(err) => self.say(format!("❌ {err}.")),
        }
    }

    /// Privileged teardown of everything, valid from any state
    pub async fn stop(&self, user: &User) {
        if !user.privileged {
            return;
        }
        let mut st = self.inner.state.lock().await;
        st.challenge = None;
        st.ai_offer = None;
        st.session = None;
        st.generation += 1;
        self.cancel_move_timer(&mut st);
        self.clear_overlay();
        self.say("⚙️ Gridduel stopped.");
        tracing::info!(channel = %self.inner.channel, by = %user.name, "arena torn down");
    }

    // --- state inspection ---------------------------------------------------

    /// True when no challenge, offer or session exists
    pub async fn is_idle(&self) -> bool {
        let st = self.inner.state.lock().await;
        st.challenge.is_none() && st.ai_offer.is_none() && st.session.is_none()
    }

    pub async fn has_pending_challenge(&self) -> bool {
        self.inner.state.lock().await.challenge.is_some()
    }

    pub async fn has_pending_ai_offer(&self) -> bool {
        self.inner.state.lock().await.ai_offer.is_some()
    }

    /// True while a match is in progress
    pub async fn session_active(&self) -> bool {
        self.inner
            .state
            .lock()
            .await
            .session
            .as_ref()
            .is_some_and(|s| s.active())
    }

    /// Name of the player to move, while a match is in progress
    pub async fn current_player(&self) -> Option<String> {
        let st = self.inner.state.lock().await;
        st.session
            .as_ref()
            .filter(|s| s.active())
            .map(|s| s.current_player_name().to_string())
    }

    // --- internals ----------------------------------------------------------

    /// Consume the pending challenge into an AI offer, unless the state
    /// already moved on.
    async fn expire_challenge(&self, generation: u64) {
        let mut st = self.inner.state.lock().await;
        let still_pending = st
            .challenge
            .as_ref()
            .is_some_and(|c| c.generation == generation);
        if !still_pending {
            return;
        }
        let challenge = match st.challenge.take() {
            Some(c) => c,
            None => return,
        };
        st.generation += 1;
        let offer_generation = st.generation;
        let deadline = Instant::now() + self.inner.cfg.ai_reply_window;
        tracing::info!(
            channel = %self.inner.channel,
            challenger = %challenge.challenger,
            "challenge expired, offering an AI match"
        );
        self.say(format!(
            "⏳ Nobody accepted the challenge. {}, want to play the AI? Type !yes",
            challenge.challenger
        ));
        st.ai_offer = Some(AiOffer {
            offered_to: challenge.challenger,
            deadline,
            generation: offer_generation,
        });
        drop(st);

        let arena = self.clone();
        let window = self.inner.cfg.ai_reply_window;
        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            arena.expire_ai_offer(offer_generation).await;
        });
    }

    /// Drop the AI offer if it is still the one this timer was armed for
    async fn expire_ai_offer(&self, generation: u64) {
        let mut st = self.inner.state.lock().await;
        let still_pending = st
            .ai_offer
            .as_ref()
            .is_some_and(|o| o.generation == generation);
        if !still_pending {
            return;
        }
        st.ai_offer = None;
        st.generation += 1;
        self.say("⌛ The AI offer expired.");
    }

    /// Build a session from an accepted challenge or AI offer. The board
    /// type is drawn uniformly from the configured pool.
    fn start_session(
        &self,
        st: &mut ChannelState,
        challenger: String,
        opponent: String,
        vs_ai: bool,
    ) {
        let board_type = self
            .inner
            .cfg
            .board_types
            .choose(&mut rand::thread_rng())
            .copied()
            .unwrap_or_default();
        st.challenge = None;
        st.ai_offer = None;
        st.generation += 1;

        let session = Session::new(challenger, opponent, vs_ai, board_type.build());
        tracing::info!(
            channel = %self.inner.channel,
            session = %session.id(),
            started_at = %session.started_at(),
            variant = %session.board().variant(),
            vs_ai,
            "match started"
        );
        self.say(format!(
            "🎮 Game on: {} (X) vs {} (O) — {}. {} starts!",
            session.player_name(Mark::Cross),
            session.player_name(Mark::Nought),
            session.board().describe(),
            session.current_player_name(),
        ));
        self.publish_snapshot(&session, overlay::EVENT_NEW_GAME);
        st.session = Some(session);
        self.restart_move_timer(st);
    }

    /// Apply a move for the session's current player and announce the
    /// outcome. Shared by human moves, AI moves and timeout-forced moves so
    /// all three get identical validation and broadcasts.
    fn apply_session_move(
        &self,
        session: &mut Session,
        generation: u64,
        mv: Move,
    ) -> Result<MoveOutcome, GameError> {
        let mark = session.current_mark();
        let mover = session.current_player_name().to_string();
        let mv_text = notation::format_move(session.board().variant(), mv);
        let outcome = session.apply_current(mv)?;
        match outcome {
            MoveOutcome::Continue => {
                self.say(format!(
                    "✅ {} on {} — {} to move.",
                    mark.symbol(),
                    mv_text,
                    session.current_player_name()
                ));
                self.publish_snapshot(session, overlay::EVENT_REFRESH);
            }
            MoveOutcome::Win(_) => {
                self.say(format!("🏆 {} wins! ({})", mover, mark.symbol()));
                tracing::info!(session = %session.id(), winner = %mover, "match won");
                self.publish_snapshot(session, overlay::EVENT_GAME_OVER);
                self.schedule_overlay_clear(generation);
            }
            MoveOutcome::Draw => {
                self.say("🤝 It's a draw!");
                tracing::info!(session = %session.id(), "match drawn");
                self.publish_snapshot(session, overlay::EVENT_GAME_OVER);
                self.schedule_overlay_clear(generation);
            }
        }
        Ok(outcome)
    }

    /// Post-move bookkeeping: keep the supervisor fresh and hand the turn to
    /// the AI when it is up next.
    fn after_move(&self, st: &mut ChannelState, outcome: MoveOutcome) {
        match outcome {
            MoveOutcome::Continue => {
                self.restart_move_timer(st);
                self.maybe_schedule_ai_turn(st);
            }
            MoveOutcome::Win(_) | MoveOutcome::Draw => {
                self.cancel_move_timer(st);
            }
        }
    }

    /// Arm the AI "thinking" pause when the AI opponent is to move
    fn maybe_schedule_ai_turn(&self, st: &mut ChannelState) {
        let ai_name = &self.inner.cfg.ai_name;
        let due = st
            .session
            .as_ref()
            .is_some_and(|s| s.vs_ai() && s.is_turn(ai_name));
        if !due {
            return;
        }
        let min = self.inner.cfg.ai_think_delay_min.as_secs_f64();
        let max = self.inner.cfg.ai_think_delay_max.as_secs_f64();
        let delay = std::time::Duration::from_secs_f64(if max > min {
            rand::thread_rng().gen_range(min..=max)
        } else {
            min
        });
        let generation = st.generation;
        let arena = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            arena.take_ai_turn(generation).await;
        });
    }

    /// The AI's move, applied through the same path as everyone else's
    async fn take_ai_turn(&self, generation: u64) {
        let mut st = self.inner.state.lock().await;
        if st.generation != generation {
            return;
        }
        let ai_name = self.inner.cfg.ai_name.clone();
        let defense_weight = self.inner.cfg.defense_weight;
        let Some(session) = st.session.as_mut() else {
            return;
        };
        if !session.active() || !session.is_turn(&ai_name) {
            return;
        }
        let Some(mv) = heuristic::best_move(session.board(), session.current_mark(), defense_weight)
        else {
            return;
        };
        let mv_text = notation::format_move(session.board().variant(), mv);
        self.say(format!("🤖 {ai_name} plays {mv_text}"));
        match self.apply_session_move(session, generation, mv) {
            Ok(outcome) => self.after_move(&mut st, outcome),
            Err(err) => tracing::error!(%err, "AI proposed an illegal move"),
        }
    }

    /// Cancel-and-relaunch the move-timeout supervisor so exactly one
    /// instance watches the session.
    fn restart_move_timer(&self, st: &mut ChannelState) {
        self.cancel_move_timer(st);
        let arena = self.clone();
        let generation = st.generation;
        st.move_timer = Some(tokio::spawn(async move {
            arena.run_move_timer(generation).await;
        }));
    }

    fn cancel_move_timer(&self, st: &mut ChannelState) {
        if let Some(handle) = st.move_timer.take() {
            handle.abort();
        }
    }

    /// Supervisor loop: poll until the current player stalls past the move
    /// timeout, then force a heuristic move for them. Exits when the session
    /// ends or the state moves on; exits quietly when no legal move is left.
    async fn run_move_timer(&self, generation: u64) {
        let poll = self.inner.cfg.poll_interval;
        let move_timeout = self.inner.cfg.move_timeout;
        let defense_weight = self.inner.cfg.defense_weight;
        loop {
            tokio::time::sleep(poll).await;
            let mut st = self.inner.state.lock().await;
            if st.generation != generation {
                return;
            }
            let Some(session) = st.session.as_mut() else {
                return;
            };
            if !session.active() {
                return;
            }
            if session.idle_time() < move_timeout {
                continue;
            }
            let who = session.current_player_name().to_string();
            let Some(mv) =
                heuristic::best_move(session.board(), session.current_mark(), defense_weight)
            else {
                return;
            };
            let mv_text = notation::format_move(session.board().variant(), mv);
            tracing::info!(session = %session.id(), player = %who, "move timed out, forcing one");
            self.say(format!(
                "⏰ {who} took too long — automatic move: {mv_text}"
            ));
            match self.apply_session_move(session, generation, mv) {
                Ok(outcome) => self.after_move(&mut st, outcome),
                Err(err) => tracing::error!(%err, "forced move was illegal"),
            }
            // A fresh supervisor was started by after_move (or the game
            // ended); this instance is done either way.
            return;
        }
    }

    /// Drop the finished session and empty the overlay once the grace delay
    /// passed, unless the channel already moved on.
    fn schedule_overlay_clear(&self, generation: u64) {
        let arena = self.clone();
        let delay = self.inner.cfg.overlay_clear_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut st = arena.inner.state.lock().await;
            if st.generation != generation {
                return;
            }
            if st.session.take().is_some() {
                arena.clear_overlay();
            }
        });
    }

    fn say(&self, text: impl Into<String>) {
        let text = text.into();
        if let Err(e) = self.inner.events_tx.send(ArenaEvent::Chat(text)) {
            tracing::warn!("Failed to broadcast chat reply: {}", e);
        }
    }

    fn publish_snapshot(&self, session: &Session, event: &str) {
        let snapshot = session.snapshot(GAME_ID);
        if let Err(e) = self.inner.overlay.write_snapshot(&snapshot) {
            tracing::warn!("Overlay snapshot write failed: {:#}", e);
        }
        if let Err(e) = self.inner.overlay.broadcast_event(GAME_ID, event) {
            tracing::warn!("Overlay event broadcast failed: {:#}", e);
        }
    }

    fn clear_overlay(&self) {
        if let Err(e) = self.inner.overlay.write_snapshot(&OverlaySnapshot::cleared()) {
            tracing::warn!("Overlay clear failed: {:#}", e);
        }
        if let Err(e) = self
            .inner
            .overlay
            .broadcast_event(GAME_ID, overlay::EVENT_REFRESH)
        {
            tracing::warn!("Overlay event broadcast failed: {:#}", e);
        }
    }
}

fn usage(variant: Variant) -> &'static str {
    match variant {
        Variant::OpenGrid => "Usage: move <letter><number>, e.g. move C4",
        Variant::ColumnDrop => "Usage: move <column>, e.g. move 3 or move C",
    }
}
