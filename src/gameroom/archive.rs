use crate::scoring::MatchResult;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Archive defines where finished rounds go once a room has settled them.
/// A failed write is logged by the room and never interrupts play.
#[async_trait::async_trait]
pub trait Archive: Send + Sync {
    async fn record(&self, result: &MatchResult) -> anyhow::Result<()>;
}

#[async_trait::async_trait]
impl<A> Archive for Arc<A>
where
    A: Archive + ?Sized,
{
    async fn record(&self, result: &MatchResult) -> anyhow::Result<()> {
        self.as_ref().record(result).await
    }
}

/// In-memory archive, kept for the lifetime of the process.
#[derive(Debug, Default)]
pub struct Ledger {
    results: RwLock<Vec<MatchResult>>,
}

impl Ledger {
    pub async fn results(&self) -> Vec<MatchResult> {
        self.results.read().await.clone()
    }
    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }
}

#[async_trait::async_trait]
impl Archive for Ledger {
    async fn record(&self, result: &MatchResult) -> anyhow::Result<()> {
        let json = result.to_json()?;
        log::debug!("[archive] {}", json);
        self.results.write().await.push(result.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::WinType;

    #[tokio::test]
    async fn ledger_keeps_results_in_order() {
        let ledger = Arc::new(Ledger::default());
        for round in 0..2 {
            let result = MatchResult {
                room: crate::ID::default(),
                round,
                dealer: 0,
                win: WinType::ExhaustiveDraw,
                winners: Vec::new(),
                breakdowns: Vec::new(),
                payments: Vec::new(),
                deltas: vec![0, 0, 0],
            };
            ledger.record(&result).await.unwrap();
        }
        let rounds = ledger.results().await.iter().map(|r| r.round).collect::<Vec<_>>();
        assert_eq!(rounds, vec![0, 1]);
    }
}
