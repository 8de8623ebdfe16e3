use crate::hand::Hand;
use crate::tiles::Tile;
use std::cmp::Reverse;

/// How much a concealed tile contributes to the hand. Lower is more
/// disposable.
///
/// 0 isolated honor, 1 isolated terminal, 2 isolated simple,
/// 3 same-suit tile two ranks away, 4 adjacent tile, 5 pair or better.
pub fn usefulness(hand: &Hand, tile: Tile) -> u8 {
    let near = |d: i8| {
        [d, -d]
            .into_iter()
            .filter_map(|d| tile.step(d))
            .any(|t| hand.contains(t))
    };
    match hand.count(tile) {
        n if n >= 2 => 5,
        _ if near(1) => 4,
        _ if near(2) => 3,
        _ if tile.is_honor() => 0,
        _ if tile.is_terminal() => 1,
        _ => 2,
    }
}

/// Deterministic forced discard: least useful tile, highest tile on ties.
/// Never names a tile the hand does not hold.
pub fn heuristic(hand: &Hand) -> Option<Tile> {
    hand.kinds()
        .into_iter()
        .min_by_key(|t| (usefulness(hand, *t), Reverse(*t)))
}
