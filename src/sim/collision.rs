/// Collision resolution, run once after every obstacle advance.
///
/// Order:
///   1. Clouds on the avatar cell are removed and freeze the avatar.
///   2. A sun on the avatar cell ends the session; nothing else is checked.
///
/// Both passes look at the same cell, so a cloud and a sun arriving
/// together freeze first and then lose.

use log::debug;

use crate::domain::entity::ObstacleKind;

use super::event::GameEvent;
use super::services::Host;
use super::session::Session;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollisionOutcome {
    Clear,
    Slowed,
    Lost,
}

pub fn resolve<H: Host + ?Sized>(
    session: &mut Session,
    host: &mut H,
    events: &mut Vec<GameEvent>,
) -> CollisionOutcome {
    let at = session.avatar.position();
    let mut outcome = CollisionOutcome::Clear;

    if session.field.take_at(at, ObstacleKind::Cloud) > 0 {
        debug!("cloud collision at {:?}", at);
        host.set_glyph(at, None);
        let duration = session.timing.debuff_duration;
        session.avatar.apply_slowdown(host, &mut session.timers, duration);
        events.push(GameEvent::CloudHit { at });
        outcome = CollisionOutcome::Slowed;
    }

    if session.field.any_at(at, ObstacleKind::Sun) {
        debug!("sun collision at {:?}", at);
        events.push(GameEvent::SunHit { at });
        session.lose(host);
        return CollisionOutcome::Lost;
    }

    // Obstacles that moved off the avatar cell erased its glyph.
    session.avatar.render(host);
    outcome
}
