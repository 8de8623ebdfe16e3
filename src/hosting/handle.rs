use crate::ID;
use crate::Member;
use crate::gameroom::Inbound;
use crate::gameroom::Room;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task::JoinHandle;

/// Handle to communicate with a running room.
/// Holds the room's inbox and its task, so closing can cut it short.
#[derive(Debug)]
pub struct RoomHandle {
    pub id: ID<Room>,
    pub players: Vec<ID<Member>>,
    pub inbox: UnboundedSender<Inbound>,
    pub task: JoinHandle<()>,
}

impl RoomHandle {
    /// Registers a connection for `player` and returns the endpoints a
    /// transport bridges: frames in, frames out.
    pub fn attach(
        &self,
        player: ID<Member>,
    ) -> anyhow::Result<(UnboundedSender<Inbound>, UnboundedReceiver<String>)> {
        if !self.players.contains(&player) {
            return Err(anyhow::anyhow!("{} holds no seat in room {}", player, self.id));
        }
        let (tx, rx) = unbounded_channel::<String>();
        self.inbox
            .send(Inbound::Join(player, tx))
            .map_err(|_| anyhow::anyhow!("room {} has finished", self.id))?;
        Ok((self.inbox.clone(), rx))
    }
}
