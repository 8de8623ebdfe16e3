use super::*;
use crate::ID;
use crate::Member;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Instant;

/// Traffic from the transport edge into a room.
#[derive(Debug)]
pub enum Inbound {
    /// A connection for an authenticated player; outbound frames go to `tx`.
    Join(ID<Member>, UnboundedSender<String>),
    /// One raw text frame from an authenticated player.
    Frame(ID<Member>, String),
}

/// Async shell around one [`Session`].
///
/// Serializes everything that touches the session through a single task:
/// player frames arrive on the inbox, timer deadlines are turned into
/// tokio sleeps, and every announcement is fanned out through the
/// [`Table`]. Settled rounds are handed to the [`Archive`].
///
/// Ends when the match ends or when every inbox sender is dropped.
pub struct Room {
    session: Session,
    inbox: UnboundedReceiver<Inbound>,
    table: Table,
    archive: Arc<dyn Archive>,
    epoch: Instant,
}

impl Room {
    pub fn new(session: Session, inbox: UnboundedReceiver<Inbound>, archive: Arc<dyn Archive>) -> Self {
        let table = Table::new(session.id().to_string(), session.players().len());
        Self {
            session,
            inbox,
            table,
            archive,
            epoch: Instant::now(),
        }
    }

    /// Drives the match to completion. Returns the finished session.
    pub async fn run(mut self) -> Session {
        self.epoch = Instant::now();
        self.session.start(Duration::ZERO);
        self.flush().await;
        while !self.session.is_over() {
            let alarm = self.session.deadline().map(|at| self.epoch + at);
            tokio::select! {
                biased;
                inbound = self.inbox.recv() => match inbound {
                    Some(inbound) => self.receive(inbound),
                    None => {
                        log::info!("[room {}] every connection handle dropped", self.table.room());
                        break;
                    }
                },
                _ = Self::alarm(alarm) => {
                    let now = self.now();
                    self.session.advance(now);
                }
            }
            self.flush().await;
        }
        log::info!(
            "[room {}] closed with {:?}, standings {:?}",
            self.table.room(),
            self.session.ending(),
            self.session.standings()
        );
        self.session
    }
}

impl Room {
    fn receive(&mut self, inbound: Inbound) {
        match inbound {
            Inbound::Join(player, tx) => match self.session.seat(player) {
                Ok(seat) => {
                    log::info!("[room {}] P{} connected", self.table.room(), seat);
                    self.table.sit(seat, tx);
                }
                Err(e) => {
                    let reply = Envelope::unparsed(self.table.room()).error(e.code(), &e.to_string());
                    let _ = tx.send(reply.to_json());
                }
            },
            Inbound::Frame(player, text) => self.request(player, &text),
        }
    }
    /// Applies one REQ frame and answers with RESP or ERROR.
    fn request(&mut self, player: ID<Member>, text: &str) {
        let Ok(seat) = self.session.seat(player) else {
            log::warn!("[room {}] frame from unseated {}", self.table.room(), player);
            return;
        };
        let envelope = match Protocol::parse(text) {
            Ok(envelope) => envelope,
            Err(e) => {
                let reply = Envelope::unparsed(self.table.room()).error(e.code(), &e.to_string());
                self.table.unicast(seat, &reply);
                return;
            }
        };
        let now = self.now();
        let reply = match Protocol::decode(&envelope) {
            Err(e) => envelope.error(e.code(), &e.to_string()),
            Ok(command) => match self.session.submit(player, command, now) {
                Ok(()) => envelope.reply(serde_json::json!({ "accepted": true })),
                Err(e) => envelope.error(e.code(), &e.to_string()),
            },
        };
        self.table.unicast(seat, &reply);
    }
    async fn flush(&mut self) {
        for notice in self.session.drain() {
            self.table.deliver(&notice);
        }
        for result in self.session.settled() {
            if let Err(e) = self.archive.record(&result).await {
                log::error!("[room {}] failed to archive round {}: {}", self.table.room(), result.round, e);
            }
        }
    }
    fn now(&self) -> Duration {
        Instant::now().saturating_duration_since(self.epoch)
    }
    async fn alarm(at: Option<Instant>) {
        match at {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tokio::sync::mpsc::unbounded_channel;

    fn config() -> Config {
        let mut config = Config::default();
        config.rounds = 1;
        config.dismiss.auto_dissolve_timeout = 0;
        config
    }
    fn room(config: Config) -> (Room, UnboundedSender<Inbound>, Vec<ID<Member>>, Arc<Ledger>) {
        let players = (0..3).map(|_| ID::default()).collect::<Vec<_>>();
        let session = Session::new(ID::default(), config.sealed().unwrap(), players.clone(), 11);
        let (tx, rx) = unbounded_channel();
        let ledger = Arc::new(Ledger::default());
        (Room::new(session, rx, ledger.clone()), tx, players, ledger)
    }
    fn frames(rx: &mut UnboundedReceiver<String>) -> Vec<Envelope> {
        std::iter::from_fn(|| rx.try_recv().ok())
            .filter_map(|json| serde_json::from_str::<Envelope>(&json).ok())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn trustees_finish_an_idle_match() {
        let (room, tx, players, ledger) = room(config());
        let (out, mut rx) = unbounded_channel();
        tx.send(Inbound::Join(players[0], out)).unwrap();
        let session = room.run().await;
        assert!(session.is_over());
        assert_eq!(ledger.len().await, 1);
        let cmds = frames(&mut rx).into_iter().map(|e| e.cmd).collect::<Vec<_>>();
        assert!(cmds.contains(&"TileDiscarded".to_string()));
        assert!(cmds.contains(&"TrusteeEngaged".to_string()));
        assert_eq!(cmds.last().map(String::as_str), Some("MatchEnded"));
    }

    #[tokio::test(start_paused = true)]
    async fn requests_get_correlated_replies() {
        let (room, tx, players, _) = room(config());
        let (out, mut rx) = unbounded_channel();
        tx.send(Inbound::Join(players[1], out)).unwrap();
        let bad = r#"{"type":"REQ","cmd":"Riichi","roomId":"x","seq":3}"#;
        tx.send(Inbound::Frame(players[1], bad.to_string())).unwrap();
        tx.send(Inbound::Frame(players[1], "garbage".to_string())).unwrap();
        let early = r#"{"type":"REQ","cmd":"Discard","roomId":"x","data":{"tile":"1m"},"seq":4}"#;
        tx.send(Inbound::Frame(players[1], early.to_string())).unwrap();
        let vote = r#"{"type":"REQ","cmd":"CastDismissVote","roomId":"x","data":{"agree":true},"seq":5}"#;
        tx.send(Inbound::Frame(players[1], vote.to_string())).unwrap();
        let handle = tokio::spawn(room.run());
        tokio::time::sleep(Duration::from_millis(10)).await;
        let replies = frames(&mut rx)
            .into_iter()
            .filter(|e| e.kind != Kind::Event)
            .collect::<Vec<_>>();
        assert_eq!(replies.len(), 4);
        assert_eq!(replies[0].seq, Some(3));
        assert_eq!(replies[0].data["code"], "UnknownCommand");
        assert_eq!(replies[1].data["code"], "Malformed");
        assert_eq!(replies[2].seq, Some(4));
        assert_eq!(replies[2].data["code"], "InvalidAction");
        assert_eq!(replies[3].kind, Kind::Resp);
        assert_eq!(replies[3].seq, Some(5));
        drop(tx);
        let session = handle.await.unwrap();
        assert!(!session.is_over());
    }

    #[tokio::test(start_paused = true)]
    async fn unanimous_vote_dissolves_room() {
        let (room, tx, players, ledger) = room(config());
        let (out, mut rx) = unbounded_channel();
        tx.send(Inbound::Join(players[2], out)).unwrap();
        let vote = r#"{"type":"REQ","cmd":"CastDismissVote","roomId":"x","data":{"agree":true}}"#;
        for player in players.iter() {
            tx.send(Inbound::Frame(*player, vote.to_string())).unwrap();
        }
        let session = room.run().await;
        assert_eq!(session.ending(), Some(Ending::Dissolved));
        assert_eq!(ledger.len().await, 0);
        assert!(frames(&mut rx).iter().any(|e| e.cmd == "MatchDissolved"));
    }

    #[test]
    fn rooms_run_on_any_worker() {
        fn shared<T: Send + Sync>() {}
        fn spawnable<F: std::future::Future + Send>(_: F) {}
        shared::<Session>();
        shared::<crate::scoring::MatchResult>();
        let (room, _tx, _, _) = room(config());
        spawnable(room.run());
    }

    #[tokio::test(start_paused = true)]
    async fn strangers_are_turned_away() {
        let (room, tx, _, _) = room(config());
        let (out, mut rx) = unbounded_channel();
        tx.send(Inbound::Join(ID::default(), out)).unwrap();
        drop(tx);
        room.run().await;
        let replies = frames(&mut rx);
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].data["code"], "UnknownPlayer");
    }
}
