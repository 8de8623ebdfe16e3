use super::*;
use crate::ID;
use crate::Member;
use crate::Points;
use crate::Position;
use crate::claims::*;
use crate::config::Config;
use crate::dismiss::*;
use crate::hand::*;
use crate::scoring::*;
use crate::tiles::*;
use crate::trustee::Trustee;
use crate::turn::*;
use std::collections::BTreeMap;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

/// How a match stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Every configured round was played.
    Completed,
    /// Dismiss vote passed or the room sat idle too long.
    Dissolved,
    /// Internal bookkeeping failed; nothing from the live round counts.
    Aborted,
}

/// Internal failure of one step: either the player's fault, which leaves
/// state untouched, or ours, which ends the match.
enum Fault {
    Rejected(ActionError),
    Broken(InvariantViolation),
}

impl From<ActionError> for Fault {
    fn from(e: ActionError) -> Self {
        Self::Rejected(e)
    }
}
impl From<InvariantViolation> for Fault {
    fn from(e: InvariantViolation) -> Self {
        Self::Broken(e)
    }
}

/// Functional core for one live match.
///
/// Sole owner of the wall, hands, turn state, claim window and dismiss
/// vote. Entirely synchronous: the caller supplies the clock to
/// [`Session::submit`] and [`Session::advance`], sleeps until
/// [`Session::deadline`], and forwards whatever [`Session::drain`]
/// returns. Driven by [`Room`] (imperative shell) in production and
/// directly by tests on a virtual clock.
#[derive(Debug)]
pub struct Session {
    id: ID<Room>,
    config: Arc<Config>,
    players: Vec<ID<Member>>,
    seed: u64,
    walls: VecDeque<Wall>,
    timers: Box<dyn Scheduler>,
    started: bool,
    ending: Option<Ending>,
    turn: TurnState,
    round: Round,
    window: Option<ClaimWindow>,
    windows: u32,
    trustee: Trustee,
    dismissal: Dismissal,
    ledger: Vec<Payment>,
    standings: Vec<Points>,
    history: Vec<MatchResult>,
    unarchived: Vec<MatchResult>,
    outbox: Vec<Notice>,
}

impl Session {
    /// `players` are seated in order; seat 0 deals first.
    /// Walls are shuffled from `seed` unless stacked with [`Session::with_walls`].
    pub fn new(id: ID<Room>, config: Arc<Config>, players: Vec<ID<Member>>, seed: u64) -> Self {
        let n = config.players;
        Self {
            id,
            players,
            seed,
            walls: VecDeque::new(),
            timers: Box::new(Timers::default()),
            started: false,
            ending: None,
            turn: TurnState::new(0, 0),
            round: Round::idle(config.tiles, n),
            window: None,
            windows: 0,
            trustee: Trustee::new(n),
            dismissal: Dismissal::default(),
            ledger: Vec::new(),
            standings: vec![0; n],
            history: Vec::new(),
            unarchived: Vec::new(),
            outbox: Vec::new(),
            config,
        }
    }
    /// Walls used for the first rounds, in order, before falling back to
    /// seeded shuffles.
    pub fn with_walls(mut self, walls: Vec<Wall>) -> Self {
        self.walls = walls.into();
        self
    }
    pub fn with_scheduler(mut self, timers: Box<dyn Scheduler>) -> Self {
        self.timers = timers;
        self
    }
}

/// Public state accessors.
impl Session {
    pub fn id(&self) -> ID<Room> {
        self.id
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    pub fn players(&self) -> &[ID<Member>] {
        &self.players
    }
    pub fn seat(&self, player: ID<Member>) -> Result<Position, ActionError> {
        self.players
            .iter()
            .position(|p| *p == player)
            .ok_or_else(|| ActionError::UnknownPlayer(player.to_string()))
    }
    pub fn turn(&self) -> TurnState {
        self.turn
    }
    pub fn round(&self) -> &Round {
        &self.round
    }
    pub fn window(&self) -> Option<&ClaimWindow> {
        self.window.as_ref()
    }
    pub fn trustee(&self) -> &Trustee {
        &self.trustee
    }
    pub fn dismissal(&self) -> &Dismissal {
        &self.dismissal
    }
    /// Running totals, including kong bonuses already paid in the live
    /// round.
    pub fn standings(&self) -> &[Points] {
        &self.standings
    }
    pub fn history(&self) -> &[MatchResult] {
        &self.history
    }
    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }
    pub fn is_over(&self) -> bool {
        self.ending.is_some()
    }
}

/// Driving the session: the only entry points that mutate it.
impl Session {
    /// Deals the first round.
    pub fn start(&mut self, now: Duration) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!(
            "[session {}] starting {} seats, {} rounds",
            self.id,
            self.config.players,
            self.config.rounds
        );
        self.touch(now);
        let result = self.deal(0, 0).and_then(|_| self.proceed(now));
        if let Err(e) = self.settle(result) {
            log::warn!("[session {}] start rejected: {}", self.id, e);
        }
    }
    /// Applies one player request. Rejections leave the game state
    /// unchanged, though any request from a seat under trustee control
    /// hands that seat back to its player first.
    pub fn submit(
        &mut self,
        player: ID<Member>,
        command: Command,
        now: Duration,
    ) -> Result<(), ActionError> {
        let seat = self.seat(player)?;
        self.reclaim(seat);
        let result = self.act(seat, command, now);
        if let Err(Fault::Rejected(ref e)) = result {
            match e {
                ActionError::TimingViolation(_) => log::warn!("[session {}] P{} {}", self.id, seat, e),
                _ => log::debug!("[session {}] P{} {}", self.id, seat, e),
            }
        }
        self.settle(result)
    }
    /// Fires every timer due at `now`.
    pub fn advance(&mut self, now: Duration) {
        if !self.started {
            return;
        }
        while self.ending.is_none() {
            let Some(timer) = self.timers.due(now) else {
                break;
            };
            log::debug!("[session {}] {} expired", self.id, timer);
            let result = self.fire(timer, now).and_then(|_| self.proceed(now));
            if let Err(e) = self.settle(result) {
                log::warn!("[session {}] {} fallback rejected: {}", self.id, timer, e);
            }
        }
    }
    /// When [`Session::advance`] next has work to do.
    pub fn deadline(&self) -> Option<Duration> {
        self.timers.deadline()
    }
    /// Announcements produced since the last drain.
    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.outbox)
    }
    /// Round results produced since the last call, for the archive.
    pub fn settled(&mut self) -> Vec<MatchResult> {
        std::mem::take(&mut self.unarchived)
    }
}

/// Request handling.
impl Session {
    fn act(&mut self, seat: Position, command: Command, now: Duration) -> Result<(), Fault> {
        if !self.started {
            return Err(ActionError::invalid("match has not started").into());
        }
        if self.ending.is_some() {
            return Err(ActionError::invalid("match is over").into());
        }
        let own = self.window.is_none() && self.turn.is_awaiting(seat);
        match command {
            Command::CastDismissVote { agree } => self.vote(seat, agree, now)?,
            Command::Discard { tile } => self.discard(seat, tile, now)?,
            Command::Gang { tile, window: None } if own => self.declare_kong(seat, tile, now)?,
            Command::Hu { window: None } if own => self.self_drawn(seat)?,
            claim => self.claim(seat, claim, now)?,
        }
        self.manual(seat, now);
        self.proceed(now)
    }
    fn discard(&mut self, seat: Position, tile: Tile, now: Duration) -> Result<(), Fault> {
        if !self.turn.is_awaiting(seat) {
            return Err(ActionError::invalid(format!("P{} is not due to discard", seat)).into());
        }
        self.round.discard(seat, tile)?;
        self.discarded(seat, tile, false, now)
    }
    fn claim(&mut self, seat: Position, command: Command, now: Duration) -> Result<(), Fault> {
        let Some(window) = self.window.as_mut() else {
            return Err(ActionError::late("no claim window is open").into());
        };
        if let Some(seq) = command.window().filter(|seq| *seq != window.seq()) {
            return Err(ActionError::late(format!("window {} is closed", seq)).into());
        }
        let tile = window.tile();
        let request = |kind, chow| ClaimRequest {
            seat,
            tile,
            kind,
            chow,
            at: now,
        };
        let decision = match command {
            Command::Pass { .. } => Decision::Pass,
            Command::Hu { .. } => Decision::Claim(request(ClaimKind::Hu, None)),
            Command::Peng { tile: t, .. } | Command::Gang { tile: t, .. } if t != tile => {
                return Err(ActionError::invalid(format!("window {} is on {}, not {}", window.seq(), tile, t)).into());
            }
            Command::Peng { .. } => Decision::Claim(request(ClaimKind::Peng, None)),
            Command::Gang { .. } => Decision::Claim(request(ClaimKind::Gang, None)),
            Command::Chi { tile: start, .. } => Decision::Claim(request(ClaimKind::Chi, Some(start))),
            Command::Discard { .. } | Command::CastDismissVote { .. } => {
                return Err(ActionError::invalid("not a claim").into());
            }
        };
        window.decide(seat, decision)?;
        log::debug!("[session {}] P{} {:?} on window {}", self.id, seat, decision, window.seq());
        Ok(())
    }
    fn declare_kong(&mut self, seat: Position, tile: Tile, now: Duration) -> Result<(), Fault> {
        let config = self.config.clone();
        let eval = Evaluator::new(&config);
        let hand = self.round.hand(seat);
        let concealed = eval.concealed_kongs(hand).contains(&tile);
        let promoted = eval.promotable(hand).contains(&tile);
        let meld = match (concealed, promoted) {
            (true, _) => self.round.concealed_kong(seat, tile)?,
            (_, true) => self.round.added_kong(seat, tile)?,
            _ => {
                return Err(ActionError::invalid(format!("P{} cannot declare kong on {}", seat, tile)).into());
            }
        };
        self.timers.cancel(Timer::Turn(seat));
        self.declared(seat, meld);
        self.replace(seat, now);
        Ok(())
    }
    fn self_drawn(&mut self, seat: Position) -> Result<(), Fault> {
        let config = self.config.clone();
        let hand = self.round.hand(seat);
        let tile = hand
            .drawn()
            .ok_or_else(|| ActionError::invalid(format!("P{} has no drawn tile to win on", seat)))?;
        let mut rest = hand.clone();
        rest.remove(tile);
        let verdict = Evaluator::new(&config)
            .verdict(&rest, tile)
            .ok_or_else(|| ActionError::invalid(format!("P{} hand is not complete", seat)))?;
        self.timers.cancel(Timer::Turn(seat));
        self.conclude(WinType::SelfDrawn, vec![(seat, tile, verdict, rest)]);
        Ok(())
    }
    fn vote(&mut self, seat: Position, agree: bool, now: Duration) -> Result<(), Fault> {
        let update = self
            .dismissal
            .cast(seat, agree, now, &self.config.dismiss, self.config.players)?;
        log::info!("[session {}] P{} dismiss vote {:?}", self.id, seat, update.outcome);
        match update.outcome {
            Outcome::Opened => {
                let deadline = self.dismissal.deadline().unwrap_or(now);
                self.timers.schedule(Timer::Vote, deadline);
            }
            Outcome::Rejected | Outcome::Dissolved => {
                self.timers.cancel(Timer::Vote);
            }
            Outcome::Recorded | Outcome::Expired => {}
        }
        let outcome = update.outcome;
        self.emit(
            Audience::All,
            Event::DismissVoteUpdated {
                outcome,
                ballots: update.ballots,
            },
        );
        if outcome == Outcome::Dissolved {
            self.dissolve("vote");
        }
        Ok(())
    }
    /// Hands an engaged seat back to its player. Any request counts, even
    /// one the trustee has already made moot.
    fn reclaim(&mut self, seat: Position) {
        if !self.started || self.ending.is_some() {
            return;
        }
        if self.trustee.release(seat) {
            log::info!("[session {}] P{} back from trustee", self.id, seat);
            self.emit(Audience::All, Event::TrusteeReleased { seat });
        }
    }
    /// Bookkeeping for every accepted manual action.
    fn manual(&mut self, seat: Position, now: Duration) {
        if self.ending.is_some() {
            return;
        }
        self.timers.cancel(Timer::Idle(seat));
        self.touch(now);
    }
    /// Restarts the inactivity countdown.
    fn touch(&mut self, now: Duration) {
        if let Some(limit) = self.config.dismiss.inactivity() {
            self.timers.schedule(Timer::Dissolve, now + limit);
        }
    }
}

/// Automatic progression between player decisions.
impl Session {
    /// Runs every step that needs no input, auditing tile conservation
    /// before each one.
    fn proceed(&mut self, now: Duration) -> Result<(), Fault> {
        loop {
            self.round.audit()?;
            if self.ending.is_some() {
                return Ok(());
            }
            match self.turn.phase {
                Phase::WaitingForDraw => self.draw(now),
                Phase::AwaitingDiscard if self.trustee.is_engaged(self.turn.active) => {
                    self.force(self.turn.active, now)?
                }
                Phase::ClaimWindowOpen if self.ready() => self.turn.phase = Phase::ResolvingClaims,
                Phase::ResolvingClaims => self.resolve(now)?,
                Phase::RoundEnd => self.next_round()?,
                Phase::AwaitingDiscard | Phase::ClaimWindowOpen | Phase::MatchEnd => return Ok(()),
            }
        }
    }
    fn ready(&self) -> bool {
        self.window
            .as_ref()
            .is_none_or(|w| Arbiter::from(self.config.as_ref()).decisive(w))
    }
    fn draw(&mut self, now: Duration) {
        let seat = self.turn.active;
        match self.round.draw(seat) {
            Some(tile) => {
                self.drawn(seat, tile);
                self.await_discard(seat, now);
            }
            None => self.exhaust(),
        }
    }
    /// Replacement draw after a kong.
    fn replace(&mut self, seat: Position, now: Duration) {
        self.turn.active = seat;
        self.draw(now);
    }
    fn drawn(&mut self, seat: Position, tile: Tile) {
        let remaining = self.round.remaining();
        self.emit(
            Audience::Seat(seat),
            Event::TileDrawn {
                seat,
                tile: Some(tile),
                remaining,
            },
        );
        self.emit(
            Audience::Others(seat),
            Event::TileDrawn {
                seat,
                tile: None,
                remaining,
            },
        );
    }
    fn await_discard(&mut self, seat: Position, now: Duration) {
        self.turn.active = seat;
        self.turn.phase = Phase::AwaitingDiscard;
        if self.config.timing.auto_trustee {
            self.timers.schedule(Timer::Turn(seat), now + self.config.timing.turn());
        }
    }
    /// Trustee discard on behalf of a seat.
    fn force(&mut self, seat: Position, now: Duration) -> Result<(), Fault> {
        let tile = self
            .trustee
            .discard(self.round.hand(seat))
            .ok_or_else(|| InvariantViolation(format!("P{} has nothing to discard", seat)))?;
        log::info!("[session {}] trustee discards {} for P{}", self.id, tile, seat);
        self.round
            .discard(seat, tile)
            .map_err(|e| InvariantViolation(e.to_string()))?;
        self.discarded(seat, tile, true, now)
    }
    fn discarded(&mut self, seat: Position, tile: Tile, forced: bool, now: Duration) -> Result<(), Fault> {
        self.timers.cancel(Timer::Turn(seat));
        self.emit(Audience::All, Event::TileDiscarded { seat, tile, forced });
        self.open(seat, tile, now)
    }
    /// Opens a claim window on the discard, or passes the turn if no
    /// seat could claim it.
    fn open(&mut self, discarder: Position, tile: Tile, now: Duration) -> Result<(), Fault> {
        let config = self.config.clone();
        let eval = Evaluator::new(&config);
        let n = config.players;
        let options = (0..n)
            .filter(|s| *s != discarder)
            .map(|s| {
                let hand = self.round.hand(s);
                let options = Options {
                    hu: eval.completes(hand, tile),
                    gang: eval.can_gang(hand, tile),
                    peng: eval.can_peng(hand, tile),
                    chows: match s == (discarder + 1) % n {
                        true => eval.chows(hand, tile),
                        false => Vec::new(),
                    },
                };
                (s, options)
            })
            .collect::<BTreeMap<_, _>>();
        let closes = now + config.timing.action();
        let mut window = ClaimWindow::new(self.windows + 1, discarder, tile, now, closes, options);
        if window.is_empty() {
            self.pass(discarder);
            return Ok(());
        }
        self.windows += 1;
        for seat in window.pending() {
            if self.trustee.is_engaged(seat) {
                window
                    .decide(seat, Decision::Pass)
                    .map_err(|e| InvariantViolation(format!("trustee pass refused: {}", e)))?;
            }
        }
        log::debug!(
            "[session {}] window {} on {} for {:?}",
            self.id,
            window.seq(),
            tile,
            window.eligible()
        );
        self.emit(
            Audience::All,
            Event::ClaimWindowOpened {
                window: window.seq(),
                discarder,
                tile,
                eligible: window.eligible(),
                closes_in_ms: window.closes().saturating_sub(window.opened()).as_millis() as u64,
            },
        );
        self.timers.schedule(Timer::Window(window.seq()), window.closes());
        self.window = Some(window);
        self.turn.phase = Phase::ClaimWindowOpen;
        Ok(())
    }
    fn pass(&mut self, discarder: Position) {
        self.turn.active = (discarder + 1) % self.config.players;
        self.turn.phase = Phase::WaitingForDraw;
    }
    fn resolve(&mut self, now: Duration) -> Result<(), Fault> {
        let window = self
            .window
            .take()
            .ok_or_else(|| InvariantViolation("resolving without a window".to_string()))?;
        self.timers.cancel(Timer::Window(window.seq()));
        let ruling = Arbiter::from(self.config.as_ref()).rule(&window);
        let (kind, seats) = match &ruling {
            Ruling::Nothing => (None, Vec::new()),
            Ruling::Meld(r) => (Some(r.kind), vec![r.seat]),
            Ruling::Hu(rs) => (Some(ClaimKind::Hu), rs.iter().map(|r| r.seat).collect()),
        };
        log::debug!("[session {}] window {} ruled {:?}", self.id, window.seq(), ruling);
        self.emit(
            Audience::All,
            Event::ClaimResolved {
                window: window.seq(),
                tile: window.tile(),
                kind,
                seats,
            },
        );
        match ruling {
            Ruling::Nothing => {
                self.pass(window.discarder());
                Ok(())
            }
            Ruling::Meld(request) => self.meld(request, window.discarder(), now),
            Ruling::Hu(requests) => self.win(requests, window.discarder(), window.tile()),
        }
    }
    fn meld(&mut self, request: ClaimRequest, from: Position, now: Duration) -> Result<(), Fault> {
        let seat = request.seat;
        let meld = match request.kind {
            ClaimKind::Peng => self.round.claim_pung(seat, from, request.tile)?,
            ClaimKind::Gang => self.round.claim_kong(seat, from, request.tile)?,
            ClaimKind::Chi => {
                let start = request
                    .chow
                    .ok_or_else(|| InvariantViolation(format!("chi without a sequence: {}", request)))?;
                self.round.claim_chow(seat, from, request.tile, start)?
            }
            ClaimKind::Hu => return Err(InvariantViolation("hu ruled as a meld".to_string()).into()),
        };
        self.declared(seat, meld);
        match meld.is_kong() {
            true => self.replace(seat, now),
            false => self.await_discard(seat, now),
        }
        Ok(())
    }
    fn declared(&mut self, seat: Position, meld: Meld) {
        log::debug!("[session {}] P{} declares {}", self.id, seat, meld);
        self.emit(Audience::All, Event::MeldDeclared { seat, meld });
        if meld.is_kong() {
            let scorer = Scorer::new(&self.config);
            let payments = scorer.kong(seat);
            let deltas = scorer.deltas(&payments);
            self.commit(&deltas);
            self.ledger.extend(payments.iter().copied());
            self.emit(Audience::All, Event::KongBonus { seat, payments });
        }
    }
    fn win(&mut self, requests: Vec<ClaimRequest>, from: Position, tile: Tile) -> Result<(), Fault> {
        let config = self.config.clone();
        let eval = Evaluator::new(&config);
        let winners = requests
            .iter()
            .map(|r| {
                let hand = self.round.hand(r.seat);
                eval.verdict(hand, tile)
                    .map(|v| (r.seat, tile, v, hand.clone()))
                    .ok_or_else(|| InvariantViolation(format!("P{} cannot win on {}", r.seat, tile)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.conclude(WinType::Discard { from }, winners);
        Ok(())
    }
    fn exhaust(&mut self) {
        log::info!("[session {}] wall exhausted", self.id);
        self.conclude(WinType::ExhaustiveDraw, Vec::new());
    }
    /// Scores the round, commits the capped hu settlement and records the
    /// result alongside the kong bonuses already paid.
    fn conclude(&mut self, win: WinType, winners: Vec<(Position, Tile, Verdict, Hand)>) {
        let config = self.config.clone();
        let scorer = Scorer::new(&config);
        let dealer = self.turn.dealer;
        let mut hu = Vec::new();
        let mut breakdowns = Vec::new();
        for (seat, tile, verdict, hand) in winners.iter() {
            hu.extend(scorer.hu(*seat, dealer, verdict.fan(), win));
            breakdowns.push(Breakdown {
                seat: *seat,
                tile: *tile,
                hand: format!("{} +{}", hand, tile),
                patterns: verdict.patterns().to_vec(),
                fan: verdict.fan(),
            });
        }
        let hu = scorer.cap(hu);
        self.commit(&scorer.deltas(&hu));
        let mut payments = std::mem::take(&mut self.ledger);
        payments.extend(hu);
        let deltas = scorer.deltas(&payments);
        let result = MatchResult {
            room: self.id,
            round: self.turn.round,
            dealer,
            win,
            winners: winners.iter().map(|(seat, ..)| *seat).collect(),
            breakdowns,
            payments,
            deltas,
        };
        log::info!(
            "[session {}] round {} over: {:?} winners {:?} deltas {:?}",
            self.id,
            result.round,
            result.win,
            result.winners,
            result.deltas
        );
        self.history.push(result.clone());
        self.unarchived.push(result.clone());
        self.emit(Audience::All, Event::RoundEnded(result));
        for seat in 0..config.players {
            self.timers.cancel(Timer::Turn(seat));
        }
        if let Some(window) = self.window.take() {
            self.timers.cancel(Timer::Window(window.seq()));
        }
        self.turn.phase = Phase::RoundEnd;
    }
    fn next_round(&mut self) -> Result<(), Fault> {
        let round = self.turn.round + 1;
        if round >= self.config.rounds as usize {
            self.finish();
            return Ok(());
        }
        let winners = self
            .history
            .last()
            .map(|r| r.winners.clone())
            .unwrap_or_default();
        let from = self.turn.dealer;
        let dealer = self
            .config
            .rotation
            .next_dealer(from, &winners, self.config.players);
        if dealer != from {
            self.emit(Audience::All, Event::DealerRotated { from, to: dealer });
        }
        self.deal(round, dealer)
    }
    fn deal(&mut self, round: usize, dealer: Position) -> Result<(), Fault> {
        let set = self.config.tiles;
        let wall = self
            .walls
            .pop_front()
            .unwrap_or_else(|| Wall::shuffled(set, self.seed.wrapping_add(round as u64)));
        self.round = Round::deal(set, wall, self.config.players, dealer)?;
        self.ledger.clear();
        self.window = None;
        self.turn = TurnState::new(dealer, round);
        log::info!("[session {}] round {} dealt, dealer P{}", self.id, round, dealer);
        self.emit(
            Audience::All,
            Event::RoundStarted {
                round,
                dealer,
                wall: self.round.remaining(),
            },
        );
        for seat in 0..self.config.players {
            let tiles = self.round.hand(seat).concealed();
            self.emit(Audience::Seat(seat), Event::HandDealt { seat, tiles });
        }
        Ok(())
    }
}

/// Timer fallbacks.
impl Session {
    fn fire(&mut self, timer: Timer, now: Duration) -> Result<(), Fault> {
        match timer {
            Timer::Turn(seat) if self.turn.is_awaiting(seat) && self.window.is_none() => {
                self.lapse(seat, now);
                self.force(seat, now)
            }
            Timer::Window(seq) if self.window.as_ref().is_some_and(|w| w.seq() == seq) => {
                let pending = self.window.as_ref().map(|w| w.pending()).unwrap_or_default();
                pending.into_iter().for_each(|seat| self.lapse(seat, now));
                self.turn.phase = Phase::ResolvingClaims;
                Ok(())
            }
            Timer::Idle(seat) => {
                if self.trustee.engage(seat) {
                    log::info!("[session {}] trustee takes over P{}", self.id, seat);
                    self.emit(Audience::All, Event::TrusteeEngaged { seat });
                    if let Some(window) = self.window.as_mut().filter(|w| w.pending().contains(&seat)) {
                        window.decide(seat, Decision::Pass)?;
                    }
                }
                Ok(())
            }
            Timer::Vote => {
                if let Some(update) = self.dismissal.expire(now) {
                    log::info!("[session {}] dismiss vote expired", self.id);
                    self.emit(
                        Audience::All,
                        Event::DismissVoteUpdated {
                            outcome: update.outcome,
                            ballots: update.ballots,
                        },
                    );
                }
                Ok(())
            }
            Timer::Dissolve => {
                self.dissolve("inactivity");
                Ok(())
            }
            Timer::Turn(_) | Timer::Window(_) => Ok(()),
        }
    }
    /// A seat let a limit expire: start its trustee countdown unless one
    /// is already running.
    fn lapse(&mut self, seat: Position, now: Duration) {
        if !self.config.timing.auto_trustee || self.trustee.is_engaged(seat) {
            return;
        }
        if self.timers.scheduled(Timer::Idle(seat)).is_none() {
            self.timers
                .schedule(Timer::Idle(seat), now + self.config.timing.trustee());
        }
    }
}

/// Terminal transitions.
impl Session {
    fn settle(&mut self, result: Result<(), Fault>) -> Result<(), ActionError> {
        match result {
            Ok(()) => Ok(()),
            Err(Fault::Rejected(e)) => Err(e),
            Err(Fault::Broken(v)) => {
                self.abort(v);
                Ok(())
            }
        }
    }
    fn finish(&mut self) {
        log::info!("[session {}] match complete {:?}", self.id, self.standings);
        self.stop(Ending::Completed);
        let standings = self.standings.clone();
        self.emit(Audience::All, Event::MatchEnded { standings });
    }
    fn dissolve(&mut self, reason: &str) {
        log::info!("[session {}] dissolved by {}", self.id, reason);
        self.dismissal.force();
        self.stop(Ending::Dissolved);
        self.emit(
            Audience::All,
            Event::MatchDissolved {
                reason: reason.to_string(),
            },
        );
    }
    /// Ends the match and refunds the live round's kong bonuses.
    fn abort(&mut self, violation: InvariantViolation) {
        log::error!("[session {}] aborting match: {}", self.id, violation);
        let refund = Scorer::new(&self.config)
            .deltas(&self.ledger)
            .into_iter()
            .map(|delta| delta.saturating_neg())
            .collect::<Vec<_>>();
        self.commit(&refund);
        self.stop(Ending::Aborted);
        self.emit(
            Audience::All,
            Event::MatchAborted {
                reason: violation.to_string(),
            },
        );
    }
    fn stop(&mut self, ending: Ending) {
        self.ending = Some(ending);
        self.turn.phase = Phase::MatchEnd;
        self.window = None;
        self.ledger.clear();
        self.timers.clear();
    }
    fn commit(&mut self, deltas: &[Points]) {
        self.standings
            .iter_mut()
            .zip(deltas.iter())
            .for_each(|(total, delta)| *total = total.saturating_add(*delta));
    }
    fn emit(&mut self, audience: Audience, event: Event) {
        self.outbox.push(Notice { audience, event });
    }
}
