use super::*;
use crate::Fan;
use crate::Points;
use crate::Position;
use crate::config::Config;

/// Converts winning fans and kong declarations into payments.
#[derive(Debug, Clone, Copy)]
pub struct Scorer<'c> {
    config: &'c Config,
}

impl<'c> Scorer<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }
}

impl Scorer<'_> {
    /// Points one payer owes one winner before the cap.
    pub fn amount(
        &self,
        winner: Position,
        payer: Position,
        dealer: Position,
        fan: Fan,
        self_drawn: bool,
    ) -> Points {
        let scoring = &self.config.scoring;
        let dealer_factor = match winner == dealer || payer == dealer {
            true => scoring.dealer_multiplier,
            false => 1.0,
        };
        let draw_factor = match self_drawn && self.config.patterns.self_draw {
            true => scoring.self_draw_bonus,
            false => 1.0,
        };
        let raw = scoring.base_score as f32 * fan as f32 * dealer_factor * draw_factor;
        raw.round() as Points
    }
    /// Uncapped payments for one winner: every other seat on a
    /// self-draw, the discarder alone otherwise.
    pub fn hu(&self, winner: Position, dealer: Position, fan: Fan, win: WinType) -> Vec<Payment> {
        let payers = match win {
            WinType::SelfDrawn => (0..self.config.players).filter(|p| *p != winner).collect(),
            WinType::Discard { from } => vec![from],
            WinType::ExhaustiveDraw => vec![],
        };
        let self_drawn = win == WinType::SelfDrawn;
        payers
            .into_iter()
            .map(|from| Payment {
                from,
                to: winner,
                amount: self.amount(winner, from, dealer, fan, self_drawn),
                reason: Reason::Hu,
            })
            .collect()
    }
    /// Bonus from every other seat to the declarer of a kong.
    pub fn kong(&self, declarer: Position) -> Vec<Payment> {
        (0..self.config.players)
            .filter(|p| *p != declarer)
            .map(|from| Payment {
                from,
                to: declarer,
                amount: self.config.scoring.gang_bonus,
                reason: Reason::Kong,
            })
            .filter(|p| p.amount > 0)
            .collect()
    }
    /// Scales a round's hu payments down until no seat nets more than
    /// the maximum score either way.
    ///
    /// Each winner's takings are capped first, then each payer's bill.
    /// Shares shrink in proportion, leftover points go to the earliest
    /// payments, and every point still moves between two seats, so the
    /// deltas keep summing to zero.
    pub fn cap(&self, mut payments: Vec<Payment>) -> Vec<Payment> {
        let max = self.config.scoring.max_score;
        for seat in 0..self.config.players {
            Self::limit(&mut payments, max, |p| p.to == seat);
        }
        for seat in 0..self.config.players {
            Self::limit(&mut payments, max, |p| p.from == seat);
        }
        payments
    }
    /// Net per-seat deltas of a set of payments.
    pub fn deltas(&self, payments: &[Payment]) -> Vec<Points> {
        let mut deltas = vec![0 as Points; self.config.players];
        for p in payments {
            deltas[p.from] = deltas[p.from].saturating_sub(p.amount);
            deltas[p.to] = deltas[p.to].saturating_add(p.amount);
        }
        deltas
    }
    fn limit<F>(payments: &mut [Payment], max: Points, side: F)
    where
        F: Fn(&Payment) -> bool,
    {
        let total = payments
            .iter()
            .filter(|p| side(p))
            .map(|p| p.amount as i64)
            .sum::<i64>();
        if total <= max as i64 {
            return;
        }
        let mut left = max as i64;
        for p in payments.iter_mut().filter(|p| side(p)) {
            let share = p.amount as i64 * max as i64 / total;
            p.amount = share as Points;
            left -= share;
        }
        for p in payments.iter_mut().filter(|p| side(p)) {
            if left <= 0 {
                break;
            }
            p.amount += 1;
            left -= 1;
        }
    }
}
