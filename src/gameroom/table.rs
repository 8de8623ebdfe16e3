use super::*;
use crate::Position;
use tokio::sync::mpsc::UnboundedSender;

/// Outbound connections for every seat in a room.
///
/// A seat holds at most one live connection; sitting again replaces it.
/// Frames for an empty seat are dropped, since the session never waits
/// on delivery.
#[derive(Debug)]
pub struct Table {
    room: String,
    seats: Vec<Option<UnboundedSender<String>>>,
}

impl Table {
    pub fn new(room: String, players: usize) -> Self {
        Self {
            room,
            seats: vec![None; players],
        }
    }
    pub fn sit(&mut self, seat: Position, tx: UnboundedSender<String>) {
        match self.seats.get_mut(seat) {
            Some(slot) => {
                if slot.replace(tx).is_some() {
                    log::debug!("[room {}] P{} reconnected", self.room, seat);
                }
            }
            None => log::warn!("[room {}] no seat P{}", self.room, seat),
        }
    }
    pub fn is_seated(&self, seat: Position) -> bool {
        self.seats
            .get(seat)
            .and_then(Option::as_ref)
            .is_some_and(|tx| !tx.is_closed())
    }
    pub fn room(&self) -> &str {
        &self.room
    }
}

/// Delivery.
impl Table {
    pub fn unicast(&mut self, seat: Position, envelope: &Envelope) {
        let json = envelope.to_json();
        let failed = self
            .seats
            .get(seat)
            .and_then(Option::as_ref)
            .map(|tx| tx.send(json))
            .is_some_and(|res| res.is_err());
        if failed {
            log::warn!("[room {}] failed unicast to P{}, vacating seat", self.room, seat);
            self.seats[seat] = None;
        }
    }
    /// Frames the notice once per seat in its audience.
    pub fn deliver(&mut self, notice: &Notice) {
        log::debug!("[room {}] {} -> {:?}", self.room, notice.event, notice.audience);
        for seat in 0..self.seats.len() {
            if let Some(envelope) = Protocol::encode(&self.room, notice, seat) {
                self.unicast(seat, &envelope);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn private_events_reach_one_seat() {
        let mut table = Table::new("r".to_string(), 3);
        let mut rxs = (0..3)
            .map(|seat| {
                let (tx, rx) = unbounded_channel();
                table.sit(seat, tx);
                rx
            })
            .collect::<Vec<_>>();
        table.deliver(&Notice {
            audience: Audience::Seat(1),
            event: Event::TrusteeEngaged { seat: 1 },
        });
        assert!(rxs[0].try_recv().is_err());
        assert!(rxs[1].try_recv().unwrap().contains("TrusteeEngaged"));
        assert!(rxs[2].try_recv().is_err());
    }

    #[test]
    fn dropped_connections_vacate_seat() {
        let mut table = Table::new("r".to_string(), 2);
        let (tx, rx) = unbounded_channel();
        table.sit(0, tx);
        assert!(table.is_seated(0));
        drop(rx);
        table.deliver(&Notice {
            audience: Audience::All,
            event: Event::TrusteeReleased { seat: 0 },
        });
        assert!(!table.is_seated(0));
        assert!(!table.is_seated(5));
    }
}
