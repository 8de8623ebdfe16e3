use super::*;
use crate::ID;
use crate::Member;
use crate::config::Config;
use crate::gameroom::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

type Rooms = Arc<RwLock<HashMap<ID<Room>, RoomHandle>>>;

/// Manages active game rooms and their lifecycles.
///
/// Each room runs as its own task and removes itself from the registry
/// when its match ends.
pub struct Casino {
    rooms: Rooms,
    archive: Arc<dyn Archive>,
    directory: Arc<dyn Directory>,
}

impl Default for Casino {
    fn default() -> Self {
        Self::new(Arc::new(Ledger::default()), Arc::new(Trusting))
    }
}

impl Casino {
    pub fn new(archive: Arc<dyn Archive>, directory: Arc<dyn Directory>) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            archive,
            directory,
        }
    }

    /// Validates the rule set, seats `players` in order, and spawns the
    /// room task. Returns the room ID.
    pub async fn open(&self, config: Config, players: Vec<ID<Member>>, seed: u64) -> anyhow::Result<ID<Room>> {
        let config = config.sealed()?;
        if players.len() != config.players {
            return Err(anyhow::anyhow!(
                "{} players for a {} seat room",
                players.len(),
                config.players
            ));
        }
        let id = ID::<Room>::default();
        let (tx, rx) = unbounded_channel::<Inbound>();
        let session = Session::new(id, config, players.clone(), seed);
        let room = Room::new(session, rx, self.archive.clone());
        let rooms = self.rooms.clone();
        let mut registry = self.rooms.write().await;
        let task = tokio::spawn(async move {
            let session = room.run().await;
            log::info!("[casino] room {} finished {:?}", id, session.ending());
            rooms.write().await.remove(&id);
        });
        registry.insert(
            id,
            RoomHandle {
                id,
                players,
                inbox: tx,
                task,
            },
        );
        log::info!("[casino] opened room {}", id);
        Ok(id)
    }

    /// Closes a room and removes it from the casino.
    pub async fn close(&self, id: ID<Room>) -> anyhow::Result<()> {
        self.rooms
            .write()
            .await
            .remove(&id)
            .map(|handle| handle.task.abort())
            .map(|_| log::info!("[casino] closed room {}", id))
            .ok_or_else(|| anyhow::anyhow!("room {} not found", id))
    }

    pub async fn count(&self) -> usize {
        self.rooms.read().await.len()
    }

    pub async fn players(&self, id: ID<Room>) -> Option<Vec<ID<Member>>> {
        self.rooms.read().await.get(&id).map(|h| h.players.clone())
    }

    /// Resolves a bearer credential through the directory.
    pub fn authenticate(&self, token: &str) -> anyhow::Result<ID<Member>> {
        self.directory
            .resolve(token)
            .ok_or_else(|| anyhow::anyhow!("unrecognized credential"))
    }

    /// Gets channel endpoints for WebSocket bridging.
    pub async fn channels(
        &self,
        id: ID<Room>,
        player: ID<Member>,
    ) -> anyhow::Result<(UnboundedSender<Inbound>, UnboundedReceiver<String>)> {
        self.rooms
            .read()
            .await
            .get(&id)
            .ok_or_else(|| anyhow::anyhow!("room {} not found", id))?
            .attach(player)
    }

    /// Spawns WebSocket bridge between an authenticated client and its room.
    #[cfg(feature = "server")]
    pub async fn bridge(
        &self,
        id: ID<Room>,
        player: ID<Member>,
        mut session: actix_ws::Session,
        mut stream: actix_ws::MessageStream,
    ) -> anyhow::Result<()> {
        use futures::StreamExt;
        let (tx, mut rx) = self
            .channels(id, player)
            .await
            .inspect(|_| log::info!("[casino] {} connected to room {}", player, id))?;
        actix_web::rt::spawn(async move {
            'sesh: loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Some(json) => if session.text(json).await.is_err() { break 'sesh },
                        None => break 'sesh,
                    },
                    msg = stream.next() => match msg {
                        Some(Ok(actix_ws::Message::Text(text))) => if tx.send(Inbound::Frame(player, text.to_string())).is_err() { break 'sesh },
                        Some(Ok(actix_ws::Message::Ping(bytes))) => if session.pong(&bytes).await.is_err() { break 'sesh },
                        Some(Ok(actix_ws::Message::Close(_))) => break 'sesh,
                        Some(Err(_)) => break 'sesh,
                        None => break 'sesh,
                        _ => continue 'sesh,
                    },
                }
            }
            log::info!("[casino] {} left room {}", player, id);
            let _ = session.close(None).await;
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick() -> Config {
        let mut config = Config::default();
        config.rounds = 1;
        config.dismiss.auto_dissolve_timeout = 0;
        config
    }
    fn seats() -> Vec<ID<Member>> {
        (0..3).map(|_| ID::default()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn rooms_deregister_when_their_match_ends() {
        let ledger = Arc::new(Ledger::default());
        let casino = Casino::new(ledger.clone(), Arc::new(Trusting));
        let id = casino.open(quick(), seats(), 5).await.unwrap();
        assert_eq!(casino.count().await, 1);
        assert!(casino.players(id).await.is_some());
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        assert_eq!(casino.count().await, 0);
        assert_eq!(ledger.len().await, 1);
    }

    #[tokio::test]
    async fn rejects_invalid_rooms() {
        let casino = Casino::default();
        let mut config = quick();
        config.players = 9;
        assert!(casino.open(config, seats(), 1).await.is_err());
        assert!(casino.open(quick(), seats()[..2].to_vec(), 1).await.is_err());
        assert_eq!(casino.count().await, 0);
    }

    #[tokio::test]
    async fn only_seated_players_attach() {
        let casino = Casino::default();
        let players = seats();
        let id = casino.open(quick(), players.clone(), 1).await.unwrap();
        assert!(casino.channels(id, players[2]).await.is_ok());
        assert!(casino.channels(id, ID::default()).await.is_err());
        assert!(casino.channels(ID::default(), players[2]).await.is_err());
        casino.close(id).await.unwrap();
        assert!(casino.close(id).await.is_err());
    }

    #[tokio::test]
    async fn authenticates_through_directory() {
        let casino = Casino::default();
        let id = ID::<Member>::default();
        assert_eq!(casino.authenticate(&id.to_string()).unwrap(), id);
        assert!(casino.authenticate("??").is_err());
    }
}
