/// Events emitted by session handlers.
/// The presentation layer consumes these for sound.

use crate::domain::entity::ObstacleKind;
use crate::domain::grid::Position;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Moved { to: Position },
    Spawned { kind: ObstacleKind, col: i32 },
    CloudHit { at: Position },
    Thawed,
    SunHit { at: Position },
    Won,
    /// Landing animation reached the bottom row.
    Landed { col: i32 },
    ReturnedToTitle,
}
